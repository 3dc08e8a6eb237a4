//! API module for HTTP and WebSocket endpoints
//!
//! Read-only REST views and live WebSocket updates for the agent dashboard.

pub mod http;
pub mod rest;
pub mod websocket;

pub use http::{create_router, serve};
