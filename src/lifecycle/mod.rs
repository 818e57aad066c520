//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → shutdown future resolves → server stops accepting
//!     → in-flight requests drain
//! ```
//!
//! # Design Decisions
//! - The cache lives exactly as long as the server; nothing is persisted
//! - `HttpServer::run` takes any shutdown future; the binary passes
//!   `wait_for_signal`, tests pass a channel receiver

pub mod signals;

pub use signals::wait_for_signal;
