//! Per-operation authorization gate.
//!
//! Every authenticated operation declares a policy: how many signatures it
//! demands, which roles every signer must hold, and whether it submits
//! writes or only evaluates. The gate runs after authentication and checks
//! the policy against the signers recorded on the context.

use crate::authenticator::{authenticate, AuthResult};
use crate::context::Context;
use crate::envelope::Envelope;
use crate::uniquetx;
use quill_types::ChainError;

/// Whether an operation is allowed to write.
///
/// EVALUATE-class operations run on a read-only store view; the class does
/// not affect signature validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperationType {
    Submit,
    Evaluate,
}

/// Per-operation authorization policy.
#[derive(Clone, Debug)]
pub struct OperationPolicy {
    pub min_signatures: usize,
    /// Roles every signer must hold.
    pub required_roles: Vec<String>,
    pub op_type: OperationType,
}

impl OperationPolicy {
    pub fn submit() -> Self {
        Self {
            min_signatures: 1,
            required_roles: Vec::new(),
            op_type: OperationType::Submit,
        }
    }

    pub fn evaluate() -> Self {
        Self {
            min_signatures: 1,
            required_roles: Vec::new(),
            op_type: OperationType::Evaluate,
        }
    }

    pub fn with_min_signatures(mut self, min_signatures: usize) -> Self {
        self.min_signatures = min_signatures;
        self
    }

    pub fn with_required_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_roles = roles.into_iter().map(Into::into).collect();
        self
    }
}

/// Check the policy against the authenticated signers on the context.
pub fn authorize(ctx: &Context, policy: &OperationPolicy) -> Result<(), ChainError> {
    if ctx.calling_users.len() < policy.min_signatures {
        return Err(ChainError::Forbidden {
            required: policy.min_signatures,
            received: ctx.calling_users.len(),
        });
    }

    for user in &ctx.calling_users {
        for role in &policy.required_roles {
            if !user.has_role(role) {
                return Err(ChainError::MissingRole {
                    alias: user.alias.clone(),
                    has: user.roles.iter().cloned().collect(),
                    required: policy.required_roles.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Authenticate an envelope, enforce the operation policy, and consume the
/// envelope's unique key when the operation submits writes.
pub fn authenticate_and_authorize(
    ctx: &mut Context,
    envelope: &Envelope,
    policy: &OperationPolicy,
) -> Result<AuthResult, ChainError> {
    let auth = authenticate(ctx, envelope, policy.min_signatures)?;
    authorize(ctx, policy)?;

    if policy.op_type == OperationType::Submit {
        let unique_key = envelope.unique_key.as_deref().ok_or_else(|| {
            ChainError::validation("uniqueKey is required on submit operations")
        })?;
        uniquetx::consume_unique_key(ctx.stub, unique_key)?;
    }
    Ok(auth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthConfig;
    use quill_store::MemStub;
    use quill_types::profile::roles;
    use quill_types::UserProfile;
    use std::collections::BTreeSet;

    fn user(alias: &str, user_roles: &[&str]) -> UserProfile {
        UserProfile::eth(alias, "0xaaa1").with_roles(
            user_roles
                .iter()
                .map(|r| r.to_string())
                .collect::<BTreeSet<_>>(),
        )
    }

    #[test]
    fn too_few_signatures_is_forbidden() {
        let mut stub = MemStub::new();
        let mut ctx = Context::new(&mut stub, AuthConfig::default());
        ctx.calling_users = vec![user("client|u1", &[roles::EVALUATE])];

        let policy = OperationPolicy::submit().with_min_signatures(2);
        let err = authorize(&ctx, &policy).unwrap_err();
        assert_eq!(
            err,
            quill_types::ChainError::Forbidden {
                required: 2,
                received: 1
            }
        );
    }

    #[test]
    fn every_signer_needs_the_required_roles() {
        let mut stub = MemStub::new();
        let mut ctx = Context::new(&mut stub, AuthConfig::default());
        ctx.calling_users = vec![
            user("client|u1", &[roles::CURATOR, roles::EVALUATE]),
            user("client|u2", &[roles::EVALUATE]),
        ];

        let policy = OperationPolicy::submit()
            .with_min_signatures(2)
            .with_required_roles([roles::CURATOR]);
        let err = authorize(&ctx, &policy).unwrap_err();
        assert_eq!(
            err,
            quill_types::ChainError::MissingRole {
                alias: "client|u2".to_string(),
                has: vec![roles::EVALUATE.to_string()],
                required: vec![roles::CURATOR.to_string()],
            }
        );
    }

    #[test]
    fn satisfied_policy_passes() {
        let mut stub = MemStub::new();
        let mut ctx = Context::new(&mut stub, AuthConfig::default());
        ctx.calling_users = vec![user("client|u1", &[roles::CURATOR, roles::SUBMIT])];

        let policy = OperationPolicy::submit().with_required_roles([roles::CURATOR]);
        assert!(authorize(&ctx, &policy).is_ok());
    }
}
