//! Table-driven tests for actix-web handlers.
//!
//! Describe each request and the response you expect as a [`TestCase`], then
//! hand the whole table to [`run_http_tests`] or [`assert_http_tests`]
//! together with a service from `actix_web::test::init_service`. Requests are
//! dispatched in-process, one case at a time, in table order.
//!
//! ```ignore
//! use actix_web::{test, web, App, HttpResponse};
//! use httptestkit::{assert_http_tests, TestCase};
//!
//! #[actix_web::test]
//! async fn health() {
//!     let app = test::init_service(
//!         App::new().route("/health", web::get().to(|| async { HttpResponse::Ok().body("ok") })),
//!     )
//!     .await;
//!
//!     assert_http_tests(&app, &[TestCase::get("/health").expect_body("ok")]).await;
//! }
//! ```

pub mod case;
pub mod config;
pub mod json;
pub mod logger;
pub mod report;
pub mod runner;

pub use case::{HeaderTable, RequestSpec, ResponseSpec, TestCase};
pub use config::RunnerConfig;
pub use json::{json_encode, try_json_encode, JsonEncodeError};
pub use logger::init_test_logging;
pub use report::{CaseError, CaseReport, Mismatch, RunReport};
pub use runner::{assert_http_tests, run_http_tests, HttpTestRunner};
