use actix_web::error::PayloadError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

// Ways a reading upload can be rejected. Each maps straight to an HTTP
// error response; nothing is retried.
#[derive(Error, Debug)]
pub enum IngestError {
    // Anything other than POST on the ingestion route
    #[error("Method not allowed")]
    MethodNotAllowed,

    // The request body could not be read to the end
    #[error("Error reading request body")]
    BodyRead(#[source] PayloadError),

    // The body was read but is not a valid reading document
    #[error("Invalid JSON format")]
    MalformedJson(#[source] serde_json::Error),
}

impl ResponseError for IngestError {
    fn status_code(&self) -> StatusCode {
        match self {
            IngestError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            IngestError::BodyRead(_) | IngestError::MalformedJson(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).body(self.to_string())
    }
}
