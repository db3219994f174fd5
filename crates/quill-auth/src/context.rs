//! Request-scoped context for authenticated operations.

use crate::config::AuthConfig;
use quill_store::LedgerStub;
use quill_types::UserProfile;

/// Dependency handle constructed per request.
///
/// Carries the ledger stub for the enclosing transaction, the authenticator
/// configuration, and — once [`crate::authenticate`] has run — the ordered
/// list of authenticated signers.
pub struct Context<'a> {
    pub stub: &'a mut dyn LedgerStub,
    pub config: AuthConfig,
    /// Authenticated signers in signature order, deduplicated by alias.
    pub calling_users: Vec<UserProfile>,
}

impl<'a> Context<'a> {
    pub fn new(stub: &'a mut dyn LedgerStub, config: AuthConfig) -> Self {
        Self {
            stub,
            config,
            calling_users: Vec::new(),
        }
    }

    /// The first authenticated signer, if any.
    pub fn calling_user(&self) -> Option<&UserProfile> {
        self.calling_users.first()
    }
}
