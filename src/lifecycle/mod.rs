//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     Ctrl+C / SIGTERM → trigger broadcast → server stops accepting → drain → exit
//! ```
//!
//! # Design Decisions
//! - One broadcast channel; every long-running task subscribes
//! - Tests trigger shutdown directly instead of sending signals

pub mod shutdown;

pub use shutdown::Shutdown;
