//! Named collections of hooks that reset together.

use crate::{CoreError, CoreResult, OperationHook};
use nexus_types::NonEmptyText;

/// Anything whose client-visible state can be cleared.
pub trait Resettable: Send + Sync {
    fn reset(&self);
}

impl<I, R> Resettable for OperationHook<I, R>
where
    I: 'static,
    R: Send + Sync + 'static,
{
    fn reset(&self) {
        OperationHook::reset(self)
    }
}

/// Hooks belonging to one screen, in insertion order.
#[derive(Default)]
pub struct HookGroup {
    members: Vec<(NonEmptyText, Box<dyn Resettable>)>,
}

impl HookGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a member under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DuplicateMember`] if `name` is already taken.
    pub fn insert(&mut self, name: NonEmptyText, member: impl Resettable + 'static) -> CoreResult<()> {
        if self.members.iter().any(|(existing, _)| *existing == name) {
            return Err(CoreError::DuplicateMember(name.into_string()));
        }
        self.members.push((name, Box::new(member)));
        Ok(())
    }

    /// Reset every member.
    pub fn reset_all(&self) {
        for (_, member) in &self.members {
            member.reset();
        }
        tracing::debug!(members = self.members.len(), "reset all hooks in group");
    }

    pub fn names(&self) -> impl Iterator<Item = &NonEmptyText> {
        self.members.iter().map(|(name, _)| name)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_hook, Envelope, HookState, OperationError};

    fn name(text: &str) -> NonEmptyText {
        NonEmptyText::new(text).expect("non-empty")
    }

    #[tokio::test]
    async fn reset_all_clears_every_member() {
        let triage = create_hook(|n: u32| async move {
            Ok::<_, OperationError>(Envelope::cached(n))
        })
        .create();
        let dosage = create_hook(|_: u32| async move {
            Ok::<Envelope<String>, OperationError>(Envelope::failure("dose out of range"))
        })
        .create();

        triage.execute(4).await;
        dosage.execute(1).await;

        let mut group = HookGroup::new();
        group.insert(name("triage"), triage.clone()).expect("insert");
        group.insert(name("dosage"), dosage.clone()).expect("insert");
        assert_eq!(group.len(), 2);

        group.reset_all();
        assert_eq!(triage.state(), HookState::default());
        assert_eq!(dosage.state(), HookState::default());
    }

    #[test]
    fn rejects_duplicate_names() {
        let hook = create_hook(|n: u32| async move {
            Ok::<_, OperationError>(Envelope::fresh(n))
        })
        .create();

        let mut group = HookGroup::new();
        group.insert(name("lab"), hook.clone()).expect("insert");
        let err = group.insert(name(" lab "), hook).expect_err("duplicate");
        assert!(matches!(err, CoreError::DuplicateMember(n) if n == "lab"));
        assert_eq!(group.names().map(NonEmptyText::as_str).collect::<Vec<_>>(), ["lab"]);
    }
}
