//! Hand-written services
//!
//! Anything implementing actix's `Service` over the test request type can be
//! put under test, not only what `init_service` returns.

use std::future::{ready, Ready};
use std::task::{Context, Poll};

use actix_web::{dev::Service, dev::ServiceResponse, error, Error};

/// Fails every call before producing a response.
pub struct RejectingService;

impl Service<actix_http::Request> for RejectingService {
    type Response = ServiceResponse;
    type Error = Error;
    type Future = Ready<Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&self, _req: actix_http::Request) -> Self::Future {
        ready(Err(error::ErrorForbidden("rejected by gateway")))
    }
}
