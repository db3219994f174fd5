//! User profiles, stored public keys and the signing-scheme tag.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Supported signing schemes.
///
/// `Eth` signatures are secp256k1 ECDSA and recoverable; `Ton` signatures
/// are ed25519 and carry no recovery information.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SigningScheme {
    #[default]
    #[serde(rename = "ETH")]
    Eth,
    #[serde(rename = "TON")]
    Ton,
}

impl SigningScheme {
    /// Lowercase tag used when synthesizing aliases for unregistered signers.
    pub fn alias_prefix(&self) -> &'static str {
        match self {
            SigningScheme::Eth => "eth",
            SigningScheme::Ton => "ton",
        }
    }
}

impl std::fmt::Display for SigningScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SigningScheme::Eth => write!(f, "ETH"),
            SigningScheme::Ton => write!(f, "TON"),
        }
    }
}

/// Role strings understood by the authorization gate.
pub mod roles {
    use std::collections::BTreeSet;

    pub const CURATOR: &str = "CURATOR";
    pub const EVALUATE: &str = "EVALUATE";
    pub const SUBMIT: &str = "SUBMIT";

    /// Roles granted to a user registered without an explicit role set.
    pub fn default_roles() -> BTreeSet<String> {
        [EVALUATE, SUBMIT].iter().map(|r| r.to_string()).collect()
    }

    /// Roles granted to the environment-bootstrapped admin identity.
    pub fn admin_roles() -> BTreeSet<String> {
        [CURATOR, EVALUATE, SUBMIT]
            .iter()
            .map(|r| r.to_string())
            .collect()
    }
}

/// On-ledger user profile, keyed by signing address.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub alias: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eth_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ton_address: Option<String>,
    #[serde(default)]
    pub roles: BTreeSet<String>,
}

impl UserProfile {
    /// Profile for an Ethereum-addressed user with the default role set.
    pub fn eth(alias: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            eth_address: Some(address.into()),
            ton_address: None,
            roles: roles::default_roles(),
        }
    }

    /// Profile for a TON-addressed user with the default role set.
    pub fn ton(alias: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            eth_address: None,
            ton_address: Some(address.into()),
            roles: roles::default_roles(),
        }
    }

    pub fn with_roles(mut self, roles: BTreeSet<String>) -> Self {
        self.roles = roles;
        self
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    /// The address this profile is stored under, whichever scheme applies.
    pub fn address(&self) -> Option<&str> {
        self.eth_address.as_deref().or(self.ton_address.as_deref())
    }
}

/// Stored public key record, keyed by user alias.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeyRecord {
    /// Non-compact hex for ETH keys, base64 for TON keys.
    pub public_key: String,
    #[serde(default)]
    pub signing: SigningScheme,
}

/// View of the first authenticated signer, exposed on the auth result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallingUser {
    pub alias: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eth_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ton_address: Option<String>,
    #[serde(default)]
    pub roles: BTreeSet<String>,
}

impl From<&UserProfile> for CallingUser {
    fn from(profile: &UserProfile) -> Self {
        Self {
            alias: profile.alias.clone(),
            eth_address: profile.eth_address.clone(),
            ton_address: profile.ton_address.clone(),
            roles: profile.roles.clone(),
        }
    }
}
