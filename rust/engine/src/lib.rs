//! # SCHEMA CONSTRAINT ENGINE
//!
//! **PURPOSE**: Minimal request host for `schema-constraint`: routes with schema
//! declarations, pre-handler hooks, in-process `inject` and a hyper HTTP/1 server.

pub mod app;
pub mod config;
pub mod error;
pub mod hooks;
pub mod response;
pub mod server;

pub use app::{App, Handler, InjectRequest};
pub use config::EngineConfig;
pub use error::EngineError;
pub use hooks::PreHandlerHook;
pub use response::{HttpResponse, ResponseBody};
pub use server::HttpServer;
