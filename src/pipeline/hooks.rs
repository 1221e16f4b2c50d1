//! Ordered hook lists a host runs around each transaction.

use std::fmt;
use std::sync::Arc;

use crate::transaction::{TransactionContext, TransactionError, TransactionResponse};

/// Runs before the handler. Returning a response skips the handler.
pub type BeforeHook =
    Arc<dyn Fn(&mut TransactionContext) -> Option<TransactionResponse> + Send + Sync>;

/// Runs after the handler produced a response.
pub type AfterHook = Arc<dyn Fn(&mut TransactionContext) + Send + Sync>;

/// Runs when the handler failed. Returning a response replaces the host's error response.
pub type ErrorHook = Arc<
    dyn Fn(&mut TransactionContext, &TransactionError) -> Option<TransactionResponse> + Send + Sync,
>;

/// Ordered list of hooks of one kind.
pub struct HookList<H> {
    hooks: Vec<H>,
}

impl<H> Default for HookList<H> {
    fn default() -> Self {
        Self { hooks: Vec::new() }
    }
}

impl<H: Clone> Clone for HookList<H> {
    fn clone(&self) -> Self {
        Self {
            hooks: self.hooks.clone(),
        }
    }
}

impl<H> HookList<H> {
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, H> {
        self.hooks.iter()
    }

    fn push_front(&mut self, hook: H) {
        self.hooks.insert(0, hook);
    }

    fn push_back(&mut self, hook: H) {
        self.hooks.push(hook);
    }
}

impl<H> fmt::Debug for HookList<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookList").field("len", &self.hooks.len()).finish()
    }
}

impl HookList<BeforeHook> {
    pub fn add_to_start<F>(&mut self, hook: F)
    where
        F: Fn(&mut TransactionContext) -> Option<TransactionResponse> + Send + Sync + 'static,
    {
        self.push_front(Arc::new(hook));
    }

    pub fn add_to_end<F>(&mut self, hook: F)
    where
        F: Fn(&mut TransactionContext) -> Option<TransactionResponse> + Send + Sync + 'static,
    {
        self.push_back(Arc::new(hook));
    }
}

impl HookList<AfterHook> {
    pub fn add_to_start<F>(&mut self, hook: F)
    where
        F: Fn(&mut TransactionContext) + Send + Sync + 'static,
    {
        self.push_front(Arc::new(hook));
    }

    pub fn add_to_end<F>(&mut self, hook: F)
    where
        F: Fn(&mut TransactionContext) + Send + Sync + 'static,
    {
        self.push_back(Arc::new(hook));
    }
}

impl HookList<ErrorHook> {
    pub fn add_to_start<F>(&mut self, hook: F)
    where
        F: Fn(&mut TransactionContext, &TransactionError) -> Option<TransactionResponse>
            + Send
            + Sync
            + 'static,
    {
        self.push_front(Arc::new(hook));
    }

    pub fn add_to_end<F>(&mut self, hook: F)
    where
        F: Fn(&mut TransactionContext, &TransactionError) -> Option<TransactionResponse>
            + Send
            + Sync
            + 'static,
    {
        self.push_back(Arc::new(hook));
    }
}

/// The three hook lists of a host pipeline.
#[derive(Clone, Default, Debug)]
pub struct Pipelines {
    pub before_request: HookList<BeforeHook>,
    pub after_request: HookList<AfterHook>,
    pub on_error: HookList<ErrorHook>,
}

impl Pipelines {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run before hooks in order; the first returned response wins.
    pub fn invoke_before_request(
        &self,
        context: &mut TransactionContext,
    ) -> Option<TransactionResponse> {
        for hook in self.before_request.iter() {
            if let Some(response) = hook(context) {
                return Some(response);
            }
        }
        None
    }

    /// Run every after hook in order.
    pub fn invoke_after_request(&self, context: &mut TransactionContext) {
        for hook in self.after_request.iter() {
            hook(context);
        }
    }

    /// Run error hooks in order; the first returned response wins.
    pub fn invoke_on_error(
        &self,
        context: &mut TransactionContext,
        error: &TransactionError,
    ) -> Option<TransactionResponse> {
        for hook in self.on_error.iter() {
            if let Some(response) = hook(context, error) {
                return Some(response);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::ApiError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_add_to_start_and_end_order() {
        let mut pipelines = Pipelines::new();
        pipelines.after_request.add_to_end(|context| context.items.add_info("order", "end"));
        pipelines.after_request.add_to_start(|context| context.items.add_info("order", "start"));

        let mut context = TransactionContext::default();
        pipelines.invoke_after_request(&mut context);

        assert_eq!(context.items.additional_info["order"], "end");
        assert_eq!(pipelines.after_request.len(), 2);
    }

    #[test]
    fn test_before_request_short_circuits() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut pipelines = Pipelines::new();
        pipelines
            .before_request
            .add_to_end(|_| Some(TransactionResponse::new(429)));
        let counter = calls.clone();
        pipelines.before_request.add_to_end(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            None
        });

        let mut context = TransactionContext::default();
        let response = pipelines.invoke_before_request(&mut context);

        assert_eq!(response.map(|response| response.status), Some(429));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_on_error_runs_until_replacement() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut pipelines = Pipelines::new();
        let counter = calls.clone();
        pipelines.on_error.add_to_end(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            None
        });
        pipelines.on_error.add_to_end(|_, error| {
            error
                .as_api()
                .map(|api| TransactionResponse::new(api.status()))
        });

        let mut context = TransactionContext::default();
        let replaced = pipelines.invoke_on_error(&mut context, &ApiError::conflict().into());
        assert_eq!(replaced.map(|response| response.status), Some(409));

        let error = TransactionError::unhandled(std::io::Error::other("boom"));
        assert!(pipelines.invoke_on_error(&mut context, &error).is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
