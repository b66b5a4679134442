//! Delegate registry ("CHO").

use std::collections::HashMap;

use dysnomia_types::{Address, Bao, Soul, User};

/// Delegates keyed by Soul. A later `enter` for the same Soul replaces the
/// earlier record.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    delegates: HashMap<Soul, User>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a delegate with zero entropy and return the stored record.
    pub fn enter(&mut self, token: Address, soul: Soul, on: Bao) -> &User {
        let user = User {
            soul,
            token,
            on,
            entropy: 0,
            username: String::new(),
        };
        self.delegates.insert(soul, user);
        &self.delegates[&soul]
    }

    #[must_use]
    pub fn get(&self, soul: Soul) -> Option<&User> {
        self.delegates.get(&soul)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.delegates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.delegates.is_empty()
    }
}
