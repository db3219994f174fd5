//! Read-through access to stored public keys and user profiles.
//!
//! All reads may synthesize the environment-bootstrapped admin identity:
//! when the looked-up address (or alias) matches the one derived from
//! `DEV_ADMIN_PUBLIC_KEY` and nothing is stored on the ledger, a profile
//! with admin roles is returned by value. Such profiles are never persisted.

use crate::config::AuthConfig;
use quill_crypto::{eth_address_from_hex, normalize_eth_public_key};
use quill_store::{composite_key, LedgerStub, PK_NAMESPACE, PROFILE_NAMESPACE};
use quill_types::alias;
use quill_types::profile::roles;
use quill_types::{ChainError, PublicKeyRecord, SigningScheme, UserProfile};

/// Address written into a tombstoned profile slot.
pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

pub(crate) struct DevAdminIdentity {
    pub address: String,
    pub public_key: String,
    pub alias: String,
}

/// Resolve the bootstrap admin identity from configuration, if present.
pub(crate) fn dev_admin_identity(
    config: &AuthConfig,
) -> Result<Option<DevAdminIdentity>, ChainError> {
    let Some(admin) = &config.dev_admin else {
        return Ok(None);
    };
    let public_key = normalize_eth_public_key(&admin.public_key)?;
    let address = eth_address_from_hex(&public_key)?;
    let alias = match &admin.user_id {
        Some(user_id) => {
            alias::validate_custom_alias(user_id)?;
            user_id.clone()
        }
        None => alias::eth_alias(&address),
    };
    Ok(Some(DevAdminIdentity {
        address,
        public_key,
        alias,
    }))
}

fn profile_key(address: &str) -> String {
    composite_key(PROFILE_NAMESPACE, &[address])
}

fn public_key_key(user_alias: &str) -> String {
    composite_key(PK_NAMESPACE, &[user_alias])
}

/// Load a user profile by signing address.
pub fn get_user_profile(
    stub: &dyn LedgerStub,
    config: &AuthConfig,
    address: &str,
) -> Result<Option<UserProfile>, ChainError> {
    if let Some(bytes) = stub.get_state(&profile_key(address))? {
        return Ok(Some(serde_json::from_slice(&bytes)?));
    }
    if let Some(admin) = dev_admin_identity(config)? {
        if admin.address == address {
            let profile = UserProfile::eth(admin.alias, admin.address)
                .with_roles(roles::admin_roles());
            return Ok(Some(profile));
        }
    }
    Ok(None)
}

/// Batch profile load. The returned list contains only found profiles;
/// order need not match the input.
pub fn get_user_profiles(
    stub: &dyn LedgerStub,
    config: &AuthConfig,
    addresses: &[String],
) -> Result<Vec<UserProfile>, ChainError> {
    let mut profiles = Vec::with_capacity(addresses.len());
    for address in addresses {
        if let Some(profile) = get_user_profile(stub, config, address)? {
            profiles.push(profile);
        }
    }
    Ok(profiles)
}

/// Load a stored public key by user alias.
pub fn get_public_key(
    stub: &dyn LedgerStub,
    config: &AuthConfig,
    user_alias: &str,
) -> Result<Option<PublicKeyRecord>, ChainError> {
    if let Some(bytes) = stub.get_state(&public_key_key(user_alias))? {
        return Ok(Some(serde_json::from_slice(&bytes)?));
    }
    if let Some(admin) = dev_admin_identity(config)? {
        if admin.alias == user_alias {
            return Ok(Some(PublicKeyRecord {
                public_key: admin.public_key,
                signing: SigningScheme::Eth,
            }));
        }
    }
    Ok(None)
}

/// Persist a public key record under the user's alias.
pub fn put_public_key(
    stub: &mut dyn LedgerStub,
    user_alias: &str,
    record: &PublicKeyRecord,
) -> Result<(), ChainError> {
    let bytes = serde_json::to_vec(record)?;
    stub.put_state(&public_key_key(user_alias), bytes)?;
    Ok(())
}

/// Persist a user profile under its signing address.
pub fn put_user_profile(
    stub: &mut dyn LedgerStub,
    address: &str,
    profile: &UserProfile,
) -> Result<(), ChainError> {
    let bytes = serde_json::to_vec(profile)?;
    stub.put_state(&profile_key(address), bytes)?;
    Ok(())
}

/// Overwrite a rotated-away profile slot with the tombstone profile.
pub fn invalidate_user_profile(
    stub: &mut dyn LedgerStub,
    address: &str,
) -> Result<(), ChainError> {
    let tombstone = UserProfile {
        alias: alias::INVALIDATED_ALIAS.to_string(),
        eth_address: Some(ZERO_ADDRESS.to_string()),
        ton_address: None,
        roles: Default::default(),
    };
    put_user_profile(stub, address, &tombstone)
}
