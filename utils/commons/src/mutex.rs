use super::*;

/// Explicit mutual-exclusion flag shared by the state-mutating entrypoints.
/// A nested call arriving while a guarded operation is in progress, for
/// example from a payment recipient, observes the held flag and is
/// rejected before it can touch any fund accounting.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct ReentrancyGuard {
    locked: bool,
}

impl ReentrancyGuard {
    pub fn new() -> Self {
        Self { locked: false }
    }

    /// Acquire the guard. Fails if a guarded operation is already on the
    /// call stack.
    pub fn enter(&mut self) -> Result<(), CustomContractError> {
        ensure!(!self.locked, CustomContractError::ReentrantCall);
        self.locked = true;
        Ok(())
    }

    /// Release the guard. Callers must release on every exit path; a
    /// rejected transaction rolls the flag back with the rest of the state.
    pub fn exit(&mut self) {
        self.locked = false;
    }
}

impl Default for ReentrancyGuard {
    fn default() -> Self {
        Self::new()
    }
}

#[concordium_cfg_test]
mod tests {
    use super::*;

    #[concordium_test]
    fn test_enter_exit_cycle() {
        let mut guard = ReentrancyGuard::new();

        guard.enter().expect_report("First acquisition failed");
        claim_eq!(guard.enter(), Err(CustomContractError::ReentrantCall));

        guard.exit();
        guard.enter().expect_report("Acquisition after release failed");
    }
}
