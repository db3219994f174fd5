//! User registration, key rotation and role updates.
//!
//! These operations maintain the records the authenticator reads: a
//! `UserProfile` keyed by signing address and a `PublicKeyRecord` keyed by
//! alias. Rotation never deletes: the old address slot is overwritten with
//! the tombstone profile so stale signatures resolve to an invalidated
//! identity.

use crate::context::Context;
use crate::registry;
use quill_crypto::{eth_address_from_hex, normalize_eth_public_key};
use quill_types::profile::roles;
use quill_types::{alias, ChainError, PublicKeyRecord, SigningScheme, UserProfile};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::info;

/// Register a user under an explicitly chosen alias.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserDto {
    /// `client|` or `eth|` alias for the new user.
    pub user: String,
    /// secp256k1 public key, hex or base64.
    pub public_key: String,
}

/// Register a user whose alias is derived from the key's ETH address.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterEthUserDto {
    pub public_key: String,
}

/// Rotate the calling user's signing key.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePublicKeyDto {
    pub public_key: String,
}

/// Replace a user's role set.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRolesDto {
    /// Signing address of the user to update.
    pub user: String,
    pub roles: Vec<String>,
}

fn register(ctx: &mut Context, user_alias: &str, public_key: &str) -> Result<String, ChainError> {
    alias::validate_custom_alias(user_alias)?;
    let normalized = normalize_eth_public_key(public_key)?;
    let address = eth_address_from_hex(&normalized)?;

    if registry::get_user_profile(ctx.stub, &ctx.config, &address)?.is_some() {
        return Err(ChainError::validation(format!(
            "a user is already registered under address {address}"
        )));
    }
    if registry::get_public_key(ctx.stub, &ctx.config, user_alias)?.is_some() {
        return Err(ChainError::validation(format!(
            "a public key is already registered for {user_alias}"
        )));
    }

    let profile = UserProfile::eth(user_alias, address.clone());
    registry::put_user_profile(ctx.stub, &address, &profile)?;
    registry::put_public_key(
        ctx.stub,
        user_alias,
        &PublicKeyRecord {
            public_key: normalized,
            signing: SigningScheme::Eth,
        },
    )?;

    info!(alias = user_alias, %address, "registered user");
    Ok(user_alias.to_string())
}

/// Register a user under an explicitly chosen alias.
pub fn register_user(ctx: &mut Context, dto: &RegisterUserDto) -> Result<String, ChainError> {
    register(ctx, &dto.user, &dto.public_key)
}

/// Register a user under the alias derived from the key's ETH address.
pub fn register_eth_user(
    ctx: &mut Context,
    dto: &RegisterEthUserDto,
) -> Result<String, ChainError> {
    let normalized = normalize_eth_public_key(&dto.public_key)?;
    let address = eth_address_from_hex(&normalized)?;
    register(ctx, &alias::eth_alias(&address), &dto.public_key)
}

/// Rotate the calling user's key, tombstoning the old address slot.
pub fn update_public_key(
    ctx: &mut Context,
    dto: &UpdatePublicKeyDto,
) -> Result<(), ChainError> {
    let caller = ctx
        .calling_user()
        .cloned()
        .ok_or_else(|| ChainError::Unauthorized {
            message: "key rotation requires an authenticated signer".to_string(),
        })?;
    let old_address = caller
        .eth_address
        .clone()
        .ok_or_else(|| ChainError::validation("calling user has no ETH address"))?;

    let normalized = normalize_eth_public_key(&dto.public_key)?;
    let new_address = eth_address_from_hex(&normalized)?;
    if new_address != old_address
        && registry::get_user_profile(ctx.stub, &ctx.config, &new_address)?.is_some()
    {
        return Err(ChainError::validation(format!(
            "a user is already registered under address {new_address}"
        )));
    }

    registry::invalidate_user_profile(ctx.stub, &old_address)?;

    let mut profile = caller.clone();
    profile.eth_address = Some(new_address.clone());
    registry::put_user_profile(ctx.stub, &new_address, &profile)?;
    registry::put_public_key(
        ctx.stub,
        &caller.alias,
        &PublicKeyRecord {
            public_key: normalized,
            signing: SigningScheme::Eth,
        },
    )?;

    info!(alias = %caller.alias, old = %old_address, new = %new_address, "rotated public key");
    Ok(())
}

/// Replace the role set of the user stored under the given address.
pub fn update_user_roles(
    ctx: &mut Context,
    dto: &UpdateUserRolesDto,
) -> Result<(), ChainError> {
    let mut profile = registry::get_user_profile(ctx.stub, &ctx.config, &dto.user)?
        .ok_or_else(|| ChainError::not_found("user profile", dto.user.clone()))?;
    if profile.alias == alias::INVALIDATED_ALIAS {
        return Err(ChainError::validation(format!(
            "profile under {} has been invalidated",
            dto.user
        )));
    }

    profile.roles = dto.roles.iter().cloned().collect::<BTreeSet<_>>();
    if profile.roles.is_empty() {
        profile.roles = roles::default_roles();
    }
    registry::put_user_profile(ctx.stub, &dto.user, &profile)?;
    Ok(())
}
