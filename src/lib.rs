//! REST Tester
//!
//! A command-line REST testing tool driven by an exported API-collection
//! document. The collection may use any of several incompatible schema
//! versions (v1, v2, v2.1); this crate detects the version once at load and
//! exposes a uniform, indexable descriptor for every API entry, then turns
//! a descriptor plus runtime parameters into a fully resolved HTTP request.
//!
//! # Architecture
//!
//! - **models**: dispatch-ready request and received response shapes
//! - **collection**: schema-version detection and descriptor normalization
//! - **config**: run configuration, loaded once, passed explicitly
//! - **variables**: URI template resolution (endpoint token, path rules,
//!   positional placeholders, trailing query)
//! - **auth**: token resolution with a one-shot login exchange and a fixed
//!   header fallback chain
//! - **request**: per-method body and content-type composition
//! - **executor**: blocking dispatch over reqwest
//! - **formatter**: response rendering for the terminal
//! - **commands**: listing, search, export, and the end-to-end request flow
//!
//! Control flow: collection → descriptor → variables (config + positional
//! parameters) → auth (config + endpoint) → request → executor.
//!
//! The crate is fully synchronous: each invocation performs at most one
//! login exchange followed by the main request. Errors are never recovered
//! internally; everything surfaces as a `Result` and the binary decides
//! exit codes.

pub mod auth;
pub mod collection;
pub mod commands;
pub mod config;
pub mod executor;
pub mod formatter;
pub mod models;
pub mod request;
pub mod variables;
