//! Host pipeline integration.
//!
//! # Data Flow
//! ```text
//! before_request: [stamp start + request key]
//! handler
//! after_request:  [stamp headers] → ... → [log transaction]
//! on_error:       [stamp headers] → ... → [translate API error / log error]
//! ```
//!
//! # Design Decisions
//! - Hooks are plain synchronous closures over `&mut TransactionContext`
//! - `Pipelines` is host-agnostic; `layer.rs` drives it for axum/tower services
//! - Stamping hooks go first and logging hooks go last, so application hooks
//!   added later still see timing headers and still run before the record is built

pub mod exceptions;
pub mod hooks;
pub mod layer;
pub mod markers;
pub mod stopwatch;

use std::sync::Arc;

use crate::config::SerializationConfig;
use crate::record::TransactionLogger;

pub use exceptions::handle_exceptions;
pub use hooks::{AfterHook, BeforeHook, ErrorHook, HookList, Pipelines};
pub use layer::{CommunicationLogLayer, CommunicationLogService};
pub use markers::{AccountId, AdditionalInfo, CorrelationKey, DisableLogging, RouteLabels};
pub use stopwatch::{
    add_stopwatch_and_request_key_pipelines, read_stopwatch_and_request_key,
    write_stopwatch_and_request_key,
};

/// Register timing, exception handling and transaction logging hooks.
///
/// Adds one before-request hook, two after-request hooks and two on-error hooks.
pub fn add_log_pipelines(
    pipelines: &mut Pipelines,
    logger: Arc<dyn TransactionLogger>,
    serialization: SerializationConfig,
) {
    add_stopwatch_and_request_key_pipelines(pipelines);

    let error_logger = logger.clone();
    pipelines.on_error.add_to_end(move |context, error| {
        handle_exceptions(Some(context), error, &serialization, error_logger.as_ref())
    });

    pipelines.after_request.add_to_end(move |context| {
        if let Err(error) = logger.log_data(Some(&*context), None) {
            tracing::warn!(error = %error, "Failed to log transaction");
        }
    });
}
