//! HTTP API: routing, request/response mapping and request logging.
//!
//! The prediction pipeline itself lives in `heartrisk-ai`; this crate only adapts it to
//! JSON over HTTP.

pub mod app;
pub mod context;
pub mod middleware;
