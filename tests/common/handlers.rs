//! Routes under test
//!
//! `routes` registers every handler along with a fresh hit counter, so each
//! `init_service` call starts from zero.

use std::collections::BTreeMap;
use std::io;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::task::{Context, Poll};

use actix_web::{
    body::{BodySize, MessageBody},
    http::header::CONTENT_TYPE,
    web, HttpRequest, HttpResponse,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub langs: Vec<String>,
}

impl Profile {
    pub fn sample() -> Self {
        Profile {
            name: "ada".to_string(),
            langs: vec!["rust".to_string(), "go".to_string()],
        }
    }
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::Data::new(AtomicUsize::new(0)))
        .route("/health", web::get().to(health))
        .route("/echo", web::post().to(echo))
        .route("/headers", web::get().to(headers))
        .route("/signed", web::get().to(signed))
        .route("/profile", web::get().to(profile))
        .route("/notjson", web::get().to(notjson))
        .route("/broken", web::get().to(broken))
        .route("/counter", web::get().to(counter));
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().body("ok")
}

/// Sends the request body back with the request's content type.
async fn echo(req: HttpRequest, body: web::Bytes) -> HttpResponse {
    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();

    HttpResponse::Ok()
        .content_type(content_type)
        .insert_header(("X-Echo-Length", body.len().to_string()))
        .body(body)
}

/// Every request header as a JSON object.
async fn headers(req: HttpRequest) -> HttpResponse {
    let seen: BTreeMap<String, String> = req
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();

    HttpResponse::Ok().json(seen)
}

async fn signed(req: HttpRequest) -> HttpResponse {
    match req.headers().get("x-signed") {
        Some(value) if value == "1" => HttpResponse::Ok().body("signed"),
        _ => HttpResponse::Unauthorized().body("unsigned"),
    }
}

async fn profile() -> HttpResponse {
    HttpResponse::Ok().json(Profile::sample())
}

async fn notjson() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("application/json")
        .body("notjson")
}

async fn broken() -> HttpResponse {
    HttpResponse::Ok().body(FailingBody)
}

async fn counter(hits: web::Data<AtomicUsize>) -> HttpResponse {
    let hit = hits.fetch_add(1, Ordering::SeqCst) + 1;
    HttpResponse::Ok().body(hit.to_string())
}

/// A body stream that errors on first poll.
struct FailingBody;

impl MessageBody for FailingBody {
    type Error = io::Error;

    fn size(&self) -> BodySize {
        BodySize::Stream
    }

    fn poll_next(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Bytes, Self::Error>>> {
        Poll::Ready(Some(Err(io::Error::new(
            io::ErrorKind::ConnectionReset,
            "stream reset by handler",
        ))))
    }
}
