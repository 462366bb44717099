//! Authorized-number view and mutation outcomes.

use crate::phone::PhoneIdentity;
use std::collections::BTreeSet;

/// Union of the fixed and dynamic sets, consulted on every inbound message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorizedView {
    fixed: BTreeSet<PhoneIdentity>,
    dynamic: BTreeSet<PhoneIdentity>,
}

impl AuthorizedView {
    pub(crate) fn new(fixed: BTreeSet<PhoneIdentity>, dynamic: BTreeSet<PhoneIdentity>) -> Self {
        let dynamic = dynamic.difference(&fixed).cloned().collect();
        Self { fixed, dynamic }
    }

    /// Check whether a sender identity is authorized.
    pub fn contains(&self, number: &str) -> bool {
        let number = number.trim();
        self.fixed.iter().any(|n| n.as_str() == number)
            || self.dynamic.iter().any(|n| n.as_str() == number)
    }

    /// Numbers sourced from configuration.
    pub fn fixed(&self) -> &BTreeSet<PhoneIdentity> {
        &self.fixed
    }

    /// Numbers added at runtime.
    pub fn dynamic(&self) -> &BTreeSet<PhoneIdentity> {
        &self.dynamic
    }

    /// All authorized numbers in ascending order.
    pub fn numbers(&self) -> Vec<&str> {
        self.fixed
            .union(&self.dynamic)
            .map(PhoneIdentity::as_str)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.fixed.len() + self.dynamic.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Result of a successful `add`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Added(PhoneIdentity),
    AlreadyAuthorized(PhoneIdentity),
}

/// Result of a successful `remove`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed(String),
    NotPresent(String),
}
