//! Combined hooks for one dashboard group.

use crate::service::{advanced_hook, feature_hook};
use crate::{AiResult, AiService, Feature, FeatureGroup};
use nexus_core::{HookConfig, HookGroup, OperationHook};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// A JSON-typed hook for a feature.
pub type FeatureHook = OperationHook<Value, Value>;

/// One hook per feature of a [`FeatureGroup`], resettable together.
///
/// Advanced features are wired through [`advanced_hook`]; every other group uses
/// [`feature_hook`].
pub struct FeatureSuite {
    group: FeatureGroup,
    hooks: BTreeMap<Feature, FeatureHook>,
    members: HookGroup,
}

impl FeatureSuite {
    /// Create idle hooks for every feature in `group`.
    ///
    /// # Errors
    ///
    /// Returns an error if two features in the group share a slug.
    pub fn for_group(
        service: Arc<dyn AiService>,
        group: FeatureGroup,
        config: &HookConfig,
    ) -> AiResult<Self> {
        let mut hooks = BTreeMap::new();
        let mut members = HookGroup::new();

        for feature in Feature::in_group(group) {
            let factory = match group {
                FeatureGroup::Advanced => {
                    advanced_hook::<Value, Value>(Arc::clone(&service), feature, config.clone())
                }
                _ => feature_hook::<Value, Value>(Arc::clone(&service), feature, config.clone()),
            };
            let hook = factory.create();
            members.insert(hook.label().clone(), hook.clone())?;
            hooks.insert(feature, hook);
        }

        tracing::debug!(group = %group, hooks = hooks.len(), "feature suite created");

        Ok(Self {
            group,
            hooks,
            members,
        })
    }

    pub fn group(&self) -> FeatureGroup {
        self.group
    }

    pub fn hook(&self, feature: Feature) -> Option<&FeatureHook> {
        self.hooks.get(&feature)
    }

    pub fn hooks(&self) -> impl Iterator<Item = (Feature, &FeatureHook)> {
        self.hooks.iter().map(|(feature, hook)| (*feature, hook))
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Reset every hook in the suite.
    pub fn reset_all(&self) {
        self.members.reset_all();
    }
}
