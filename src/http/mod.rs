//! HTTP host for the communication logger.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, connect info, graceful shutdown)
//!     → TraceLayer (request spans)
//!     → CommunicationLogLayer (pipelines: stamp, handle errors, log)
//!     → handlers.rs (demo routes exercising markers and errors)
//!     → Send to client
//! ```

pub mod handlers;
pub mod server;

pub use server::HttpServer;
