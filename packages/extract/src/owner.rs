//! The "current owner" carried across lines and pages.

/// The most recently seen owner heading.
///
/// Starts empty at the beginning of a document and is only ever
/// overwritten, never cleared: a continuation page that does not repeat the
/// owner's name still belongs to the owner from the previous page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnerContext {
    current_owner: Option<String>,
}

impl OwnerContext {
    /// Creates an empty context.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            current_owner: None,
        }
    }

    /// Records a new owner heading.
    pub fn observe(&mut self, owner: &str) {
        match &mut self.current_owner {
            Some(current) => {
                current.clear();
                current.push_str(owner);
            }
            None => self.current_owner = Some(owner.to_owned()),
        }
    }

    /// Returns the owner currently in effect.
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.current_owner.as_deref()
    }
}
