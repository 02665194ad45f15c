//! Typed-name confirmation for destructive actions.

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GateTarget {
    pub id: i64,
    pub name: String,
}

/// Holds the delete modal state. Confirmation is only possible while the
/// typed text, trimmed, equals the target name, trimmed. Comparison is case
/// sensitive.
#[derive(Debug, Default)]
pub struct DeleteGate {
    target: Option<GateTarget>,
    typed: String,
    pending: bool,
}

impl DeleteGate {
    pub fn open(&mut self, id: i64, name: impl Into<String>) {
        self.target = Some(GateTarget {
            id,
            name: name.into(),
        });
        self.typed.clear();
        self.pending = false;
    }

    pub fn is_open(&self) -> bool {
        self.target.is_some()
    }

    pub fn target(&self) -> Option<&GateTarget> {
        self.target.as_ref()
    }

    pub fn typed(&self) -> &str {
        &self.typed
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn push(&mut self, ch: char) {
        if !self.pending {
            self.typed.push(ch);
        }
    }

    pub fn pop(&mut self) {
        if !self.pending {
            self.typed.pop();
        }
    }

    pub fn set_typed(&mut self, typed: impl Into<String>) {
        if !self.pending {
            self.typed = typed.into();
        }
    }

    pub fn can_confirm(&self) -> bool {
        match &self.target {
            Some(target) => {
                let typed = self.typed.trim();
                !self.pending && !typed.is_empty() && typed == target.name.trim()
            }
            None => false,
        }
    }

    /// Returns the id to delete when confirmation is allowed. The modal stays
    /// open, locked, until [`DeleteGate::settle`].
    pub fn confirm(&mut self) -> Option<i64> {
        if !self.can_confirm() {
            return None;
        }
        self.pending = true;
        self.target.as_ref().map(|target| target.id)
    }

    /// Closes the modal and clears the typed text. Ignored while a confirmed
    /// delete is still in flight.
    pub fn cancel(&mut self) {
        if !self.pending {
            self.close();
        }
    }

    /// The delete finished, either way. Closes the modal.
    pub fn settle(&mut self) {
        self.close();
    }

    fn close(&mut self) {
        self.target = None;
        self.typed.clear();
        self.pending = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate(name: &str) -> DeleteGate {
        let mut gate = DeleteGate::default();
        gate.open(4, name);
        gate
    }

    #[test]
    fn confirm_requires_exact_trimmed_match() {
        let mut gate = gate("ABC");
        assert!(!gate.can_confirm());

        gate.set_typed("abc");
        assert!(!gate.can_confirm());

        gate.set_typed("ABCD");
        assert!(!gate.can_confirm());

        gate.set_typed("ABC.");
        assert!(!gate.can_confirm());

        gate.set_typed("  ABC ");
        assert!(gate.can_confirm());
    }

    #[test]
    fn inner_whitespace_matters() {
        let mut gate = gate(" Cold storage ");
        gate.set_typed("Cold  storage");
        assert!(!gate.can_confirm());
        gate.set_typed("Cold storage");
        assert!(gate.can_confirm());
    }

    #[test]
    fn blank_name_never_enables_confirm() {
        let mut gate = gate("   ");
        assert!(!gate.can_confirm());
        gate.set_typed("  ");
        assert!(!gate.can_confirm());
        assert_eq!(gate.confirm(), None);
        assert!(!gate.is_pending());
    }

    #[test]
    fn cancel_clears_typed_text() {
        let mut gate = gate("ABC");
        for ch in "AB".chars() {
            gate.push(ch);
        }
        gate.cancel();
        assert!(!gate.is_open());
        assert_eq!(gate.typed(), "");
        assert_eq!(gate.confirm(), None);
    }

    #[test]
    fn modal_closes_only_after_delete_settles() {
        let mut gate = gate("ABC");
        gate.set_typed("ABC");
        assert_eq!(gate.confirm(), Some(4));
        assert!(gate.is_open());
        assert!(gate.is_pending());
        assert_eq!(gate.confirm(), None);

        gate.cancel();
        assert!(gate.is_open());

        gate.settle();
        assert!(!gate.is_open());
    }
}
