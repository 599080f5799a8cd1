use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::action::Action;
use crate::metadata::ActionDefinition;

/// Actions of one destination, keyed by action key.
///
/// Actions are stored as `Arc<dyn Action<C>>` so concurrent invocations
/// can share them. Iteration follows registration order.
pub struct ActionRegistry<C: ?Sized + Send + Sync + 'static> {
    actions: IndexMap<String, Arc<dyn Action<C>>>,
}

impl<C: ?Sized + Send + Sync + 'static> ActionRegistry<C> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            actions: IndexMap::new(),
        }
    }

    /// Register an action. Overwrites any existing action with the same key.
    pub fn register(&mut self, action: Arc<dyn Action<C>>) {
        let key = action.definition().key.as_str().to_owned();
        self.actions.insert(key, action);
    }

    /// Look up an action by its key.
    pub fn get(&self, key: &str) -> Option<&Arc<dyn Action<C>>> {
        self.actions.get(key)
    }

    /// Check whether an action with the given key is registered.
    pub fn contains(&self, key: &str) -> bool {
        self.actions.contains_key(key)
    }

    /// Definitions of all registered actions.
    pub fn list(&self) -> Vec<&ActionDefinition> {
        self.actions.values().map(|a| a.definition()).collect()
    }

    /// Number of registered actions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Returns `true` if no actions are registered.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Iterate over all registered `(key, action)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn Action<C>>)> {
        self.actions.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<C: ?Sized + Send + Sync + 'static> Default for ActionRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ?Sized + Send + Sync + 'static> fmt::Debug for ActionRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionRegistry")
            .field("count", &self.actions.len())
            .field("keys", &self.actions.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use conduit_core::ActionKey;

    use crate::context::PerformContext;
    use crate::error::ActionError;
    use crate::output::ActionOutput;

    struct DummyAction(ActionDefinition);

    #[async_trait]
    impl Action<()> for DummyAction {
        fn definition(&self) -> &ActionDefinition {
            &self.0
        }

        async fn perform(
            &self,
            _client: &(),
            _ctx: PerformContext<'_>,
        ) -> Result<ActionOutput, ActionError> {
            Ok(ActionOutput::Sdk)
        }
    }

    fn make_action(key: &str, title: &str) -> Arc<dyn Action<()>> {
        let key = ActionKey::new(key).unwrap();
        Arc::new(DummyAction(ActionDefinition::new(key, title, "test")))
    }

    #[test]
    fn empty_registry() {
        let reg = ActionRegistry::<()>::new();
        assert!(reg.is_empty());
        assert_eq!(reg.len(), 0);
        assert!(reg.get("anything").is_none());
    }

    #[test]
    fn register_and_get() {
        let mut reg = ActionRegistry::new();
        reg.register(make_action("trackEvent", "Track Event"));

        assert_eq!(reg.len(), 1);
        assert!(reg.contains("trackEvent"));
        assert!(!reg.contains("trackevent"));

        let action = reg.get("trackEvent").unwrap();
        assert_eq!(action.definition().title, "Track Event");
    }

    #[test]
    fn overwrite_existing() {
        let mut reg = ActionRegistry::new();
        reg.register(make_action("x", "Version 1"));
        reg.register(make_action("x", "Version 2"));

        assert_eq!(reg.len(), 1);
        assert_eq!(reg.get("x").unwrap().definition().title, "Version 2");
    }

    #[test]
    fn list_keeps_registration_order() {
        let mut reg = ActionRegistry::new();
        reg.register(make_action("b", "B"));
        reg.register(make_action("a", "A"));

        let titles: Vec<&str> = reg.list().into_iter().map(|d| d.title.as_str()).collect();
        assert_eq!(titles, vec!["B", "A"]);
        let keys: Vec<&str> = reg.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    trait Sdk: Send + Sync {}

    struct SdkAction(ActionDefinition);

    #[async_trait]
    impl Action<dyn Sdk> for SdkAction {
        fn definition(&self) -> &ActionDefinition {
            &self.0
        }

        async fn perform(
            &self,
            _client: &dyn Sdk,
            _ctx: PerformContext<'_>,
        ) -> Result<ActionOutput, ActionError> {
            Ok(ActionOutput::Sdk)
        }
    }

    fn titles<C: ?Sized + Send + Sync + 'static>(reg: &ActionRegistry<C>) -> Vec<String> {
        reg.list().into_iter().map(|d| d.title.clone()).collect()
    }

    #[test]
    fn trait_object_clients() {
        let mut reg = ActionRegistry::<dyn Sdk>::new();
        let key = ActionKey::new("identify").unwrap();
        reg.register(Arc::new(SdkAction(ActionDefinition::new(key, "Identify", ""))));

        assert_eq!(titles(&reg), vec!["Identify".to_owned()]);
        assert_eq!(titles(&ActionRegistry::<()>::new()), Vec::<String>::new());
    }

    #[test]
    fn debug_format() {
        let mut reg = ActionRegistry::new();
        reg.register(make_action("test", "Test"));
        let debug = format!("{reg:?}");
        assert!(debug.contains("ActionRegistry"));
        assert!(debug.contains("count: 1"));
    }
}
