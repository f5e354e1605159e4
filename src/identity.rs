//! Identity provider contract.
//!
//! Credential issuance and session verification live outside this service.
//! The engine only consumes a resolved owner id: requests carry an opaque
//! bearer token, the provider maps it to an owner, and an unresolved token
//! fails closed as unauthenticated.

use std::collections::BTreeMap;

/// Maps an opaque bearer token to a stable owner identifier.
pub trait IdentityProvider: Send + Sync {
    fn resolve(&self, token: &str) -> Option<String>;
}

/// Config-backed token table. Deployments hand out long-lived tokens out of
/// band; tests register their own.
#[derive(Debug, Clone, Default)]
pub struct TokenTable {
    tokens: BTreeMap<String, String>,
}

impl TokenTable {
    pub fn new(tokens: BTreeMap<String, String>) -> Self {
        Self { tokens }
    }

    pub fn insert(&mut self, token: impl Into<String>, user: impl Into<String>) {
        self.tokens.insert(token.into(), user.into());
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl IdentityProvider for TokenTable {
    fn resolve(&self, token: &str) -> Option<String> {
        self.tokens.get(token).cloned()
    }
}
