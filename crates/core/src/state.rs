//! Client-visible hook state.

use serde::Serialize;

/// State owned by one hook instance.
///
/// Only [`crate::OperationHook::execute`] and [`crate::OperationHook::reset`] change it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HookState<T> {
    /// Last successfully received result. A failed call leaves it in place.
    pub data: Option<T>,
    /// `true` while a call is in flight.
    pub loading: bool,
    /// Last error message; cleared when a call starts.
    pub error: Option<String>,
    /// Whether `data` came from a cache; cleared when a call starts.
    pub cached: bool,
}

impl<T> Default for HookState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
            cached: false,
        }
    }
}

/// Coarse lifecycle position derived from a [`HookState`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HookStatus {
    Idle,
    Pending,
    Succeeded,
    Failed,
}

impl<T> HookState<T> {
    pub fn status(&self) -> HookStatus {
        if self.loading {
            HookStatus::Pending
        } else if self.error.is_some() {
            HookStatus::Failed
        } else if self.data.is_some() {
            HookStatus::Succeeded
        } else {
            HookStatus::Idle
        }
    }

    pub(crate) fn begin(&mut self) {
        self.loading = true;
        self.error = None;
        self.cached = false;
    }

    pub(crate) fn succeed(&mut self, data: T, cached: bool) {
        self.data = Some(data);
        self.cached = cached;
        self.loading = false;
    }

    pub(crate) fn fail(&mut self, message: String) {
        self.error = Some(message);
        self.loading = false;
    }

    pub(crate) fn clear(&mut self) {
        self.data = None;
        self.error = None;
        self.cached = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_follows_fields() {
        let mut state = HookState::<u32>::default();
        assert_eq!(state.status(), HookStatus::Idle);

        state.begin();
        assert_eq!(state.status(), HookStatus::Pending);

        state.succeed(3, true);
        assert_eq!(state.status(), HookStatus::Succeeded);
        assert!(state.cached);

        state.begin();
        assert!(!state.cached);
        state.fail("E".into());
        assert_eq!(state.status(), HookStatus::Failed);
        assert_eq!(state.data, Some(3));
    }

    #[test]
    fn clear_leaves_loading_alone() {
        let mut state = HookState::<u32>::default();
        state.begin();
        state.clear();
        assert!(state.loading);
        assert_eq!(state.data, None);
        assert_eq!(state.status(), HookStatus::Pending);
    }
}
