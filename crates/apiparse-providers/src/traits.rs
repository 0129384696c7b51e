//! Dispatch trait — the seam between callers and the provider layer.

use async_trait::async_trait;

use apiparse_core::DispatchError;

/// Anything that can turn (model, context, prompt) into reply text.
///
/// [`Dispatcher`](crate::Dispatcher) is the real implementation; the
/// evaluation suite runs against this trait so it can be driven by stubs.
#[async_trait]
pub trait ModelDispatch: Send + Sync {
    async fn dispatch(
        &self,
        model: &str,
        context: &str,
        prompt: &str,
    ) -> Result<String, DispatchError>;
}
