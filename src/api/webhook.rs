use actix_web::{get, post, web, HttpResponse, Responder, Scope};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::{
    error::Error,
    service::{Outcome, Service},
};

/// Push-webhook providers verify endpoint ownership with a one-time GET
/// carrying these query parameters. Missing parameters count as a mismatch,
/// not a bad request.
#[derive(Debug, Deserialize)]
pub struct HandshakeQuery {
    #[serde(rename = "hub.mode", default)]
    mode: Option<String>,

    #[serde(rename = "hub.verify_token", default)]
    verify_token: Option<String>,

    #[serde(rename = "hub.challenge", default)]
    challenge: Option<String>,
}

#[get("")]
async fn verify(
    service: web::Data<Service>,
    query: web::Query<HandshakeQuery>,
) -> impl Responder {
    let query = query.into_inner();

    let verified = match (&query.mode, &query.verify_token) {
        (Some(mode), Some(token)) => service.verify_handshake(mode, token),
        _ => false,
    };

    if verified {
        info!("webhook endpoint verified");
        HttpResponse::Ok().body(query.challenge.unwrap_or_default())
    } else {
        HttpResponse::Forbidden().finish()
    }
}

#[post("")]
async fn receive(
    service: web::Data<Service>,
    payload: web::Json<Value>,
) -> Result<HttpResponse, Error> {
    match service.reconcile(&payload).await? {
        // 404 tells the provider this endpoint will never accept the shape;
        // everything else is acknowledged so its retry policy stays quiet.
        Outcome::Malformed => Ok(HttpResponse::NotFound().finish()),
        Outcome::NoEvent | Outcome::NotFound | Outcome::Processed => {
            Ok(HttpResponse::Ok().finish())
        }
    }
}

pub fn service() -> Scope {
    web::scope("/webhook").service(verify).service(receive)
}
