use async_trait::async_trait;

use crate::context::PerformContext;
use crate::error::ActionError;
use crate::metadata::ActionDefinition;
use crate::output::ActionOutput;

/// A destination action.
///
/// `C` is what `perform` talks to: a [`RequestClient`](crate::RequestClient)
/// for cloud destinations, the vendor SDK handle for device destinations.
/// Each call performs exactly one outbound operation and never retries.
///
/// # Object Safety
///
/// This trait is object-safe; registries store `Arc<dyn Action<C>>`.
#[async_trait]
pub trait Action<C: ?Sized + Send + Sync>: Send + Sync + 'static {
    /// Static definition: key, title, fields.
    fn definition(&self) -> &ActionDefinition;

    /// Forward the payload to the vendor.
    async fn perform(
        &self,
        client: &C,
        ctx: PerformContext<'_>,
    ) -> Result<ActionOutput, ActionError>;
}
