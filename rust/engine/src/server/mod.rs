//! Network front ends.

pub mod http_engine;

pub use http_engine::HttpServer;
