//! Single-controller access gate.

use crate::error::{OracleError, Result};
use crate::types::Identity;

/// Holds the controller identity; first claim wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessControl {
    controller: Option<Identity>,
}

impl AccessControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a gate whose controller was already fixed.
    pub fn with_controller(controller: Identity) -> Self {
        Self {
            controller: Some(controller),
        }
    }

    pub fn controller(&self) -> Option<&Identity> {
        self.controller.as_ref()
    }

    /// Records `caller` as controller. Fails if one is already set.
    pub fn claim(&mut self, caller: &Identity) -> Result<()> {
        if self.controller.is_some() {
            return Err(OracleError::AlreadyInitialized);
        }
        self.controller = Some(caller.clone());
        Ok(())
    }

    /// Admits only the controller.
    pub fn authorize(&self, caller: &Identity) -> Result<&Identity> {
        match &self.controller {
            None => Err(OracleError::NotInitialized),
            Some(c) if c == caller => Ok(c),
            Some(_) => Err(OracleError::Unauthorized {
                caller: caller.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_claim_wins() {
        let mut gate = AccessControl::new();
        gate.claim(&"alice".into()).unwrap();

        let err = gate.claim(&"bob".into()).unwrap_err();
        assert_eq!(err, OracleError::AlreadyInitialized);
        assert_eq!(gate.controller(), Some(&Identity::from("alice")));
    }

    #[test]
    fn only_controller_is_authorized() {
        let gate = AccessControl::with_controller("alice".into());

        assert!(gate.authorize(&"alice".into()).is_ok());
        assert_eq!(
            gate.authorize(&"mallory".into()),
            Err(OracleError::Unauthorized {
                caller: "mallory".into()
            })
        );
    }

    #[test]
    fn unclaimed_gate_rejects_everyone() {
        let gate = AccessControl::new();
        assert_eq!(
            gate.authorize(&"alice".into()),
            Err(OracleError::NotInitialized)
        );
    }
}
