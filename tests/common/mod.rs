//! Common test utilities for httptestkit integration tests
//!
//! Sample actix-web handlers to run case tables against, plus a few
//! hand-written services and fixtures for the failure paths.

#![allow(dead_code)] // Each test binary uses a different subset

pub mod handlers;
pub mod services;

use serde::ser::{Error as _, Serializer};
use serde::Serialize;

pub use handlers::{routes, Profile};
pub use services::RejectingService;

/// A fixture value that refuses to serialize.
pub struct Unencodable;

impl Serialize for Unencodable {
    fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
        Err(S::Error::custom("unsupported fixture"))
    }
}
