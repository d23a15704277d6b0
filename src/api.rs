use actix_web::web::BytesMut;
use actix_web::{HttpResponse, Responder, http::Method, web};
use chrono::Utc;
use futures::StreamExt;
use log::{info, warn};

use crate::config::GREETING;
use crate::error::IngestError;
use crate::reading::ReadingPayload;
use crate::storage::ReadingStore;

// Register every route. Paths the table does not know fall through to the greeting.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").to(greet))
        .service(web::resource("/hello").to(greet))
        .service(
            web::resource("/api/soil-moisture-reading")
                .route(web::post().to(ingest_reading))
                .default_service(web::to(reject_method)),
        )
        .service(web::resource("/api/readings").to(list_readings))
        .default_service(web::to(greet));
}

// Fixed greeting, whatever the method or body
pub async fn greet() -> impl Responder {
    HttpResponse::Ok().content_type("text/plain; charset=utf-8").body(GREETING)
}

async fn reject_method(method: Method) -> Result<HttpResponse, IngestError> {
    warn!("Rejected {method} on the reading ingestion route");
    Err(IngestError::MethodNotAllowed)
}

// Accept one sensor reading. The body is read in full before the store is touched.
pub async fn ingest_reading(
    mut payload: web::Payload,
    store: web::Data<ReadingStore>,
) -> Result<HttpResponse, IngestError> {
    let mut body = BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|e| {
            warn!("Error reading body: {e}");
            IngestError::BodyRead(e)
        })?;
        body.extend_from_slice(&chunk);
    }

    let reading = serde_json::from_slice::<ReadingPayload>(&body)
        .map_err(|e| {
            warn!("Error parsing JSON: {e}");
            IngestError::MalformedJson(e)
        })?
        .stamp(Utc::now());

    info!(
        "Received moisture reading: plant_id={}, moisture={}%, raw={}",
        reading.plant_id, reading.moisture, reading.raw_value
    );
    store.upsert(reading);

    Ok(HttpResponse::Created().finish())
}

// Every current reading as a JSON array
pub async fn list_readings(store: web::Data<ReadingStore>) -> impl Responder {
    HttpResponse::Ok().json(store.list_all())
}
