use thiserror::Error;

pub const DEFAULT_PORT: u16 = 8080;
pub const GREETING: &str = "Hello from Raspberry Pi!";

// Stamped in at build time: SOIL_SERVER_VERSION=1.2.3 cargo build
pub const VERSION: &str = match option_env!("SOIL_SERVER_VERSION") {
    Some(v) => v,
    None => env!("CARGO_PKG_VERSION"),
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    pub port: u16,
}

impl Default for HostConfig {
    fn default() -> Self {
        HostConfig { port: DEFAULT_PORT }
    }
}

impl HostConfig {
    // Listen on all interfaces
    pub fn bind_addr(&self) -> (&'static str, u16) {
        ("0.0.0.0", self.port)
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("flag needs an argument: {0}")]
    MissingValue(String),
    #[error("invalid value {value:?} for flag {flag}: not a valid port")]
    InvalidPort { flag: String, value: String },
    #[error("flag provided but not defined: {0}")]
    UnknownFlag(String),
}

// What the command line asked for
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Run(HostConfig),
    Help,
}

pub fn usage(program: &str) -> String {
    format!(
        "Usage: {program} [--port <port>]\n  --port <port>  the port to listen on (default {DEFAULT_PORT})"
    )
}

// Parse the arguments following the program name.
// Flags may use one or two dashes and take their value inline (--port=9000)
// or as the next argument (--port 9000).
pub fn parse_args<I>(args: I) -> Result<Command, ConfigError>
where
    I: IntoIterator<Item = String>,
{
    let mut config = HostConfig::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        let Some(flag) = arg.strip_prefix("--").or_else(|| arg.strip_prefix('-')) else {
            return Err(ConfigError::UnknownFlag(arg.clone()));
        };
        let (name, inline) = match flag.split_once('=') {
            Some((name, value)) => (name, Some(value.to_string())),
            None => (flag, None),
        };

        match name {
            "h" | "help" => return Ok(Command::Help),
            "port" => {
                let value = match inline {
                    Some(v) => v,
                    None => args.next().ok_or_else(|| ConfigError::MissingValue(arg.clone()))?,
                };
                config.port = value.parse::<u16>().map_err(|_| ConfigError::InvalidPort {
                    flag: arg.clone(),
                    value: value.clone(),
                })?;
            }
            _ => return Err(ConfigError::UnknownFlag(arg.clone())),
        }
    }

    Ok(Command::Run(config))
}
