//! Page builder gateway
//!
//! HTTP dispatcher for the visual page builder's save/page-management
//! actions, plus the touch drag emulator that lets the builder's
//! drag-and-drop editing work on touch devices.
//!
//! The gateway server is native-only. On `wasm32` the crate ships just the
//! touch emulator; enable the `web` feature for the browser host.

#[cfg(not(target_arch = "wasm32"))]
pub mod api;
pub mod config;
#[cfg(not(target_arch = "wasm32"))]
pub mod http;
pub mod logger;
#[cfg(not(target_arch = "wasm32"))]
pub mod server;
pub mod touch;
