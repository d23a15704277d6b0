use actix_web::{App, HttpServer, middleware, web};
use env_logger::Env;
use log::{error, info};
use std::env::args;

use soil_moisture_server::api;
use soil_moisture_server::config::{self, Command, HostConfig, VERSION};
use soil_moisture_server::storage::ReadingStore;

// Fetch host configuration from process arguments, exit on bad flags
fn get_config() -> HostConfig {
    let mut args = args();
    let program = args.next().unwrap_or_else(|| "soil-moisture-server".into());
    match config::parse_args(args) {
        Ok(Command::Run(config)) => config,
        Ok(Command::Help) => {
            println!("{}", config::usage(&program));
            std::process::exit(0);
        }
        Err(e) => {
            eprintln!("{e}");
            eprintln!("{}", config::usage(&program));
            std::process::exit(2);
        }
    }
}

// Main function to start the Actix web server
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = get_config();
    info!("Starting server version {VERSION}");

    // One store per process, shared by every worker
    let store = web::Data::new(ReadingStore::new());

    let server = HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(store.clone())
            .configure(api::configure)
    })
    .bind(config.bind_addr())
    .inspect_err(|e| error!("Failed to start server: {e}"))?;

    info!("Server listening on port {}", config.port);
    server.run().await
}
