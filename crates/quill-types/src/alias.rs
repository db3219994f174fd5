//! User alias handling.
//!
//! The canonical string identity of an on-ledger user has one of three
//! shapes: `eth|<address>` for keys registered through the Ethereum path,
//! `client|<opaque>` for explicitly named users, and `service|<chaincode>`
//! for the origin-chaincode identity.

use crate::error::ChainError;

/// Prefix of aliases derived from an Ethereum address.
pub const ETH_PREFIX: &str = "eth|";

/// Prefix of aliases derived from a TON address.
pub const TON_PREFIX: &str = "ton|";

/// Prefix of explicitly named client aliases.
pub const CLIENT_PREFIX: &str = "client|";

/// Prefix of origin-chaincode identities.
pub const SERVICE_PREFIX: &str = "service|";

/// Alias written over a rotated-away user profile slot.
pub const INVALIDATED_ALIAS: &str = "client|invalidated";

/// Build an `eth|` alias from a canonical Ethereum address.
pub fn eth_alias(address: &str) -> String {
    format!("{ETH_PREFIX}{address}")
}

/// Build a `ton|` alias from a bounceable TON address.
pub fn ton_alias(address: &str) -> String {
    format!("{TON_PREFIX}{address}")
}

/// Build a `client|` alias from an opaque identifier.
pub fn client_alias(id: &str) -> String {
    format!("{CLIENT_PREFIX}{id}")
}

/// True when the alias names another chaincode on the same peer.
pub fn is_service_alias(alias: &str) -> bool {
    alias.starts_with(SERVICE_PREFIX)
}

/// Validate an externally supplied alias override.
///
/// Only `eth|` and `client|` forms may be chosen by configuration; anything
/// else would let a deployment impersonate a service identity.
pub fn validate_custom_alias(alias: &str) -> Result<(), ChainError> {
    if alias.starts_with(ETH_PREFIX) || alias.starts_with(CLIENT_PREFIX) {
        Ok(())
    } else {
        Err(ChainError::Unauthorized {
            message: format!("invalid user alias {alias:?}, expected eth| or client| prefix"),
        })
    }
}
