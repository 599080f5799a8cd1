use serde_json::Value;

use conduit_action::ActionError;

/// The loaded FullStory browser API.
///
/// The v1 methods mirror `FS.event`, `FS.identify`, `FS.setUserVars` and
/// `FS.setVars`; [`FullStory::call`] is the v2 `FS(operation, options)`
/// entry point. Every call carries the integration `source`.
pub trait FullStory: Send + Sync {
    fn event(&self, name: &str, properties: &Value, source: &str) -> Result<(), ActionError>;

    fn identify(&self, uid: &str, vars: &Value, source: &str) -> Result<(), ActionError>;

    fn set_user_vars(&self, vars: &Value, source: &str) -> Result<(), ActionError>;

    fn set_vars(&self, scope: &str, vars: &Value, source: &str) -> Result<(), ActionError>;

    fn call(&self, operation: &str, options: &Value, source: &str) -> Result<(), ActionError>;
}
