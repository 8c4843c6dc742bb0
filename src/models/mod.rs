//! Data models for HTTP requests and responses.
//!
//! This module contains the core data structures used throughout the REST
//! tester for representing dispatch-ready requests and received responses.

pub mod request;
pub mod response;

pub use request::{HttpMethod, RequestBody, RequestSpec};
pub use response::HttpResponse;
