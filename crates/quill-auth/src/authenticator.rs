//! Signature aggregation and signer resolution.
//!
//! [`authenticate`] validates every signature on an envelope, resolves each
//! signer to an on-ledger user profile and returns the profiles in signature
//! order. Resolution is scheme-dependent: ETH signatures in the 65-byte form
//! are recoverable, so declaring a signer that the signature already proves
//! is an error; TON signatures carry no recovery information and must
//! declare a signer.

use crate::context::Context;
use crate::envelope::{Envelope, SignatureEntry};
use crate::registry;
use quill_crypto::{
    eth_address_from_hex, normalize_eth_address, normalize_eth_public_key, recover_eth,
    verify_signature, PublicKey,
};
use quill_types::{alias, CallingUser, ChainError, SigningScheme, UserProfile};
use std::collections::BTreeSet;
use tracing::debug;

/// Result of a successful authentication.
#[derive(Clone, Debug)]
pub struct AuthResult {
    /// View of the first authenticated signer.
    pub user: CallingUser,
    /// Authenticated signers in signature order, deduplicated by alias.
    pub users: Vec<UserProfile>,
    /// The signature count the enclosing operation demands.
    pub min_signatures: usize,
}

struct ResolvedSigner {
    address: String,
    public_key: Option<PublicKey>,
    signature: String,
    signer_id: String,
}

/// Authenticate an envelope and record the signers on the context.
pub fn authenticate(
    ctx: &mut Context,
    envelope: &Envelope,
    min_signatures: usize,
) -> Result<AuthResult, ChainError> {
    let entries = envelope.entries()?;
    if entries.is_empty() {
        if let Some(signer_address) = envelope.signer_address.as_deref() {
            if alias::is_service_alias(signer_address) {
                return authenticate_origin_chaincode(ctx, signer_address, min_signatures);
            }
        }
        return Err(ChainError::MissingSignature);
    }

    let scheme = envelope.scheme();
    let message = envelope.payload_to_sign()?;

    let mut resolved: Vec<ResolvedSigner> = Vec::with_capacity(entries.len());
    let mut seen_addresses = BTreeSet::new();
    for (index, entry) in entries.iter().enumerate() {
        let signer = match scheme {
            SigningScheme::Eth => resolve_eth_entry(entry, index, &message)?,
            SigningScheme::Ton => resolve_ton_entry(entry, index)?,
        };
        if !seen_addresses.insert(signer.address.clone()) {
            return Err(ChainError::DuplicateSigner {
                address: signer.address,
            });
        }
        resolved.push(signer);
    }

    let addresses: Vec<String> = resolved.iter().map(|s| s.address.clone()).collect();
    let found = registry::get_user_profiles(ctx.stub, &ctx.config, &addresses)?;
    let mut profiles_by_address: std::collections::BTreeMap<String, UserProfile> = found
        .into_iter()
        .filter_map(|profile| {
            let addr = profile.address().map(|a| a.to_string());
            addr.map(|a| (a, profile))
        })
        .collect();

    let mut users: Vec<UserProfile> = Vec::with_capacity(resolved.len());
    let mut seen_aliases = BTreeSet::new();
    for signer in &resolved {
        let (profile, synthesized) = match profiles_by_address.remove(&signer.address) {
            Some(profile) => (profile, false),
            None if ctx.config.allow_non_registered_users && signer.public_key.is_some() => {
                (synthesize_profile(scheme, &signer.address), true)
            }
            None => {
                return Err(ChainError::UserNotRegistered {
                    user_id: signer.address.clone(),
                    signer: signer.signer_id.clone(),
                })
            }
        };

        let public_key = match &signer.public_key {
            Some(key) => key.clone(),
            None => {
                let record = registry::get_public_key(ctx.stub, &ctx.config, &profile.alias)?
                    .ok_or_else(|| ChainError::PkMissing {
                        alias: profile.alias.clone(),
                        signer: signer.signer_id.clone(),
                    })?;
                PublicKey::parse(&record.public_key, record.signing).map_err(|e| {
                    ChainError::validation(format!(
                        "stored public key for {} is invalid: {e} (signer: {})",
                        profile.alias, signer.signer_id
                    ))
                })?
            }
        };

        if verify_signature(&public_key, &signer.signature, &message).is_err() {
            let attributed = if synthesized {
                signer.address.clone()
            } else {
                profile.alias.clone()
            };
            return Err(ChainError::PkInvalidSignature {
                alias: attributed,
                signer: signer.signer_id.clone(),
            });
        }

        // Two addresses can map to one alias (admin bootstrap); the first
        // occurrence wins.
        if seen_aliases.insert(profile.alias.clone()) {
            users.push(profile);
        }
    }

    let user = CallingUser::from(&users[0]);
    ctx.calling_users = users.clone();
    debug!(signers = users.len(), first = %user.alias, "authenticated envelope");
    Ok(AuthResult {
        user,
        users,
        min_signatures,
    })
}

/// The origin-chaincode branch: a `service|<name>` sender with no
/// signatures authenticates through the peer-signed proposal.
fn authenticate_origin_chaincode(
    ctx: &mut Context,
    signer_address: &str,
    min_signatures: usize,
) -> Result<AuthResult, ChainError> {
    let expected = signer_address
        .strip_prefix(alias::SERVICE_PREFIX)
        .unwrap_or_default();
    if expected.is_empty() {
        return Err(ChainError::ChaincodeAuthorization {
            message: "signer address names no chaincode".to_string(),
        });
    }

    let proposal = ctx.stub.get_signed_proposal().ok_or_else(|| {
        ChainError::ChaincodeAuthorization {
            message: "no signed proposal available".to_string(),
        }
    })?;
    let invoked = proposal.invocation_spec.chaincode_name.as_str();
    if invoked.is_empty() {
        return Err(ChainError::ChaincodeAuthorization {
            message: "signed proposal carries no chaincode name".to_string(),
        });
    }
    if invoked != expected {
        return Err(ChainError::ChaincodeAuthorization {
            message: format!("signed proposal invokes chaincode {invoked:?}, expected {expected:?}"),
        });
    }

    debug!(chaincode = expected, "authenticated origin chaincode");
    ctx.calling_users.clear();
    Ok(AuthResult {
        user: CallingUser {
            alias: signer_address.to_string(),
            eth_address: None,
            ton_address: None,
            roles: BTreeSet::new(),
        },
        users: Vec::new(),
        min_signatures,
    })
}

fn resolve_eth_entry(
    entry: &SignatureEntry,
    index: usize,
    message: &[u8],
) -> Result<ResolvedSigner, ChainError> {
    let signer_id = entry.signer_id(index);
    let recovered = recover_eth(&entry.signature, message)
        .map_err(|e| ChainError::validation(format!("{e} (signer: {signer_id})")))?;

    match (&entry.signer_public_key, &entry.signer_address) {
        (Some(provided), Some(_)) => Err(ChainError::RedundantSignerPublicKey {
            recovered: recovered.unwrap_or_default(),
            provided: provided.clone(),
            signer: signer_id,
        }),
        (Some(provided), None) => {
            let provided = normalize_eth_public_key(provided)
                .map_err(|e| ChainError::validation(format!("{e} (signer: {signer_id})")))?;
            match recovered {
                Some(recovered) if recovered != provided => Err(ChainError::PublicKeyMismatch {
                    recovered,
                    provided,
                    signer: signer_id,
                }),
                Some(recovered) => Err(ChainError::RedundantSignerPublicKey {
                    recovered,
                    provided,
                    signer: signer_id,
                }),
                None => {
                    let address = eth_address_from_hex(&provided)
                        .map_err(|e| ChainError::validation(format!("{e} (signer: {signer_id})")))?;
                    let key = PublicKey::parse(&provided, SigningScheme::Eth)
                        .map_err(|e| ChainError::validation(format!("{e} (signer: {signer_id})")))?;
                    Ok(ResolvedSigner {
                        address,
                        public_key: Some(key),
                        signature: entry.signature.clone(),
                        signer_id,
                    })
                }
            }
        }
        (None, Some(provided)) => {
            let address = normalize_eth_address(provided)
                .map_err(|e| ChainError::validation(format!("{e} (signer: {signer_id})")))?;
            match recovered {
                Some(recovered) => {
                    let recovered_address = eth_address_from_hex(&recovered)
                        .map_err(|e| ChainError::validation(format!("{e} (signer: {signer_id})")))?;
                    if recovered_address != address {
                        Err(ChainError::AddressMismatch {
                            recovered: recovered_address,
                            provided: address,
                            signer: signer_id,
                        })
                    } else {
                        Err(ChainError::RedundantSignerAddress {
                            recovered: recovered_address,
                            provided: address,
                            signer: signer_id,
                        })
                    }
                }
                None => Ok(ResolvedSigner {
                    address,
                    public_key: None,
                    signature: entry.signature.clone(),
                    signer_id,
                }),
            }
        }
        (None, None) => match recovered {
            Some(recovered) => {
                let address = eth_address_from_hex(&recovered)
                    .map_err(|e| ChainError::validation(format!("{e} (signer: {signer_id})")))?;
                let key = PublicKey::parse(&recovered, SigningScheme::Eth)
                    .map_err(|e| ChainError::validation(format!("{e} (signer: {signer_id})")))?;
                Ok(ResolvedSigner {
                    address,
                    public_key: Some(key),
                    signature: entry.signature.clone(),
                    signer_id,
                })
            }
            None => Err(ChainError::MissingSigner {
                signature: entry.signature.clone(),
                signer: signer_id,
            }),
        },
    }
}

fn resolve_ton_entry(entry: &SignatureEntry, index: usize) -> Result<ResolvedSigner, ChainError> {
    let signer_id = entry.signer_id(index);
    match (&entry.signer_public_key, &entry.signer_address) {
        (Some(provided), declared_address) => {
            let key = PublicKey::parse(provided, SigningScheme::Ton)
                .map_err(|e| ChainError::validation(format!("{e} (signer: {signer_id})")))?;
            let derived = key.address();
            if let Some(address) = declared_address {
                if *address != derived {
                    return Err(ChainError::AddressMismatch {
                        recovered: derived,
                        provided: address.clone(),
                        signer: signer_id,
                    });
                }
            }
            Ok(ResolvedSigner {
                address: derived,
                public_key: Some(key),
                signature: entry.signature.clone(),
                signer_id,
            })
        }
        (None, Some(address)) => Ok(ResolvedSigner {
            address: address.clone(),
            public_key: None,
            signature: entry.signature.clone(),
            signer_id,
        }),
        (None, None) => Err(ChainError::MissingSigner {
            signature: entry.signature.clone(),
            signer: signer_id,
        }),
    }
}

fn synthesize_profile(scheme: SigningScheme, address: &str) -> UserProfile {
    let alias = format!("{}|{}", scheme.alias_prefix(), address);
    match scheme {
        SigningScheme::Eth => UserProfile::eth(alias, address),
        SigningScheme::Ton => UserProfile::ton(alias, address),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthConfig;
    use crate::registry::{put_public_key, put_user_profile};
    use quill_crypto::eth_address;
    use quill_store::{ChaincodeInvocationSpec, MemStub, SignedProposal};
    use quill_types::PublicKeyRecord;
    use rand::rngs::OsRng;
    use serde_json::json;

    struct TestUser {
        key: k256::ecdsa::SigningKey,
        address: String,
        alias: String,
    }

    fn eth_user(stub: &mut MemStub, name: &str) -> TestUser {
        let key = k256::ecdsa::SigningKey::random(&mut OsRng);
        let address = eth_address(key.verifying_key());
        let alias = format!("client|{name}");
        put_user_profile(stub, &address, &UserProfile::eth(alias.clone(), address.clone()))
            .unwrap();
        let record = PublicKeyRecord {
            public_key: hex::encode(key.verifying_key().to_encoded_point(false).as_bytes()),
            signing: SigningScheme::Eth,
        };
        put_public_key(stub, &alias, &record).unwrap();
        TestUser {
            key,
            address,
            alias,
        }
    }

    fn envelope() -> Envelope {
        Envelope::for_payload(json!({"amount": "1"}))
            .unwrap()
            .with_unique_key("unique-1")
    }

    #[test]
    fn recovers_single_signer_from_signature_alone() {
        let mut stub = MemStub::new();
        let user = eth_user(&mut stub, "u1");
        let mut env = envelope();
        env.sign_eth(&user.key).unwrap();

        let mut ctx = Context::new(&mut stub, AuthConfig::default());
        let result = authenticate(&mut ctx, &env, 1).unwrap();

        assert_eq!(result.users.len(), 1);
        assert_eq!(result.user.alias, user.alias);
        assert_eq!(result.users[0].eth_address.as_deref(), Some(user.address.as_str()));
        assert_eq!(ctx.calling_users, result.users);
    }

    #[test]
    fn missing_signature_without_service_sender() {
        let mut stub = MemStub::new();
        let mut ctx = Context::new(&mut stub, AuthConfig::default());
        let err = authenticate(&mut ctx, &envelope(), 1).unwrap_err();
        assert_eq!(err.key(), "MISSING_SIGNATURE");
    }

    #[test]
    fn redundant_public_key_on_recoverable_signature() {
        let mut stub = MemStub::new();
        let user = eth_user(&mut stub, "u1");
        let mut env = envelope();
        env.sign_eth(&user.key).unwrap();
        env.declare_signer_public_key(hex::encode(
            user.key.verifying_key().to_encoded_point(false).as_bytes(),
        ));

        let mut ctx = Context::new(&mut stub, AuthConfig::default());
        let err = authenticate(&mut ctx, &env, 1).unwrap_err();
        assert_eq!(err.key(), "REDUNDANT_SIGNER_PUBLIC_KEY");
    }

    #[test]
    fn mismatched_public_key_on_recoverable_signature() {
        let mut stub = MemStub::new();
        let user = eth_user(&mut stub, "u1");
        let other = eth_user(&mut stub, "u2");
        let mut env = envelope();
        env.sign_eth(&user.key).unwrap();
        env.declare_signer_public_key(hex::encode(
            other.key.verifying_key().to_encoded_point(false).as_bytes(),
        ));

        let mut ctx = Context::new(&mut stub, AuthConfig::default());
        let err = authenticate(&mut ctx, &env, 1).unwrap_err();
        assert_eq!(err.key(), "PK_MISMATCH");
    }

    #[test]
    fn redundant_address_on_recoverable_signature() {
        let mut stub = MemStub::new();
        let user = eth_user(&mut stub, "u1");
        let mut env = envelope();
        env.sign_eth(&user.key).unwrap();
        env.declare_signer_address(user.address.clone());

        let mut ctx = Context::new(&mut stub, AuthConfig::default());
        let err = authenticate(&mut ctx, &env, 1).unwrap_err();
        assert_eq!(err.key(), "REDUNDANT_SIGNER_ADDRESS");
    }

    #[test]
    fn mismatched_address_on_recoverable_signature() {
        let mut stub = MemStub::new();
        let user = eth_user(&mut stub, "u1");
        let other = eth_user(&mut stub, "u2");
        let mut env = envelope();
        env.sign_eth(&user.key).unwrap();
        env.declare_signer_address(other.address.clone());

        let mut ctx = Context::new(&mut stub, AuthConfig::default());
        let err = authenticate(&mut ctx, &env, 1).unwrap_err();
        assert_eq!(err.key(), "ADDRESS_MISMATCH");
        assert!(err.to_string().ends_with(&format!("(signer: {})", other.address)));
    }

    #[test]
    fn both_declared_fields_rejected() {
        let mut stub = MemStub::new();
        let user = eth_user(&mut stub, "u1");
        let mut env = envelope();
        env.sign_eth(&user.key).unwrap();
        env.declare_signer_address(user.address.clone());
        env.declare_signer_public_key("04aa");

        let mut ctx = Context::new(&mut stub, AuthConfig::default());
        let err = authenticate(&mut ctx, &env, 1).unwrap_err();
        assert_eq!(err.key(), "REDUNDANT_SIGNER_PUBLIC_KEY");
    }

    #[test]
    fn der_signature_with_declared_address_verifies_via_stored_key() {
        let mut stub = MemStub::new();
        let user = eth_user(&mut stub, "u1");
        let mut env = envelope();
        env.sign_eth_der(&user.key).unwrap();
        env.declare_signer_address(user.address.clone());

        let mut ctx = Context::new(&mut stub, AuthConfig::default());
        let result = authenticate(&mut ctx, &env, 1).unwrap();
        assert_eq!(result.user.alias, user.alias);
    }

    #[test]
    fn der_signature_with_wrong_declared_address_fails_verification() {
        let mut stub = MemStub::new();
        let u1 = eth_user(&mut stub, "u1");
        let u2 = eth_user(&mut stub, "u2");
        let mut env = envelope();
        env.sign_eth_der(&u1.key).unwrap();
        env.declare_signer_address(u2.address.clone());

        let mut ctx = Context::new(&mut stub, AuthConfig::default());
        let err = authenticate(&mut ctx, &env, 1).unwrap_err();
        assert_eq!(
            err,
            ChainError::PkInvalidSignature {
                alias: u2.alias.clone(),
                signer: u2.address.clone(),
            }
        );
    }

    #[test]
    fn der_signature_without_signer_is_missing_signer() {
        let mut stub = MemStub::new();
        let user = eth_user(&mut stub, "u1");
        let mut env = envelope();
        env.sign_eth_der(&user.key).unwrap();

        let mut ctx = Context::new(&mut stub, AuthConfig::default());
        let err = authenticate(&mut ctx, &env, 1).unwrap_err();
        assert_eq!(err.key(), "MISSING_SIGNER");
    }

    #[test]
    fn duplicate_signer_is_rejected() {
        let mut stub = MemStub::new();
        let user = eth_user(&mut stub, "u1");
        let mut env = envelope();
        env.sign_eth(&user.key).unwrap();
        env.sign_eth(&user.key).unwrap();

        let mut ctx = Context::new(&mut stub, AuthConfig::default());
        let err = authenticate(&mut ctx, &env, 2).unwrap_err();
        assert_eq!(
            err,
            ChainError::DuplicateSigner {
                address: user.address.clone()
            }
        );
    }

    #[test]
    fn unregistered_signer_is_rejected_by_default() {
        let mut stub = MemStub::new();
        let key = k256::ecdsa::SigningKey::random(&mut OsRng);
        let mut env = envelope();
        env.sign_eth(&key).unwrap();

        let mut ctx = Context::new(&mut stub, AuthConfig::default());
        let err = authenticate(&mut ctx, &env, 1).unwrap_err();
        assert_eq!(err.key(), "USER_NOT_REGISTERED");
    }

    #[test]
    fn unregistered_signer_synthesizes_profile_when_allowed() {
        let mut stub = MemStub::new();
        let key = k256::ecdsa::SigningKey::random(&mut OsRng);
        let address = eth_address(key.verifying_key());
        let mut env = envelope();
        env.sign_eth(&key).unwrap();

        let config = AuthConfig::default().with_allow_non_registered_users(true);
        let mut ctx = Context::new(&mut stub, config);
        let result = authenticate(&mut ctx, &env, 1).unwrap();

        assert_eq!(result.user.alias, format!("eth|{address}"));
        assert_eq!(result.users[0].eth_address.as_deref(), Some(address.as_str()));
        assert!(result.users[0].has_role("SUBMIT"));
    }

    #[test]
    fn synthesis_needs_a_known_public_key() {
        // A declared address with a DER signature leaves the key unknown, so
        // synthesis is not possible even when allowed.
        let mut stub = MemStub::new();
        let key = k256::ecdsa::SigningKey::random(&mut OsRng);
        let address = eth_address(key.verifying_key());
        let mut env = envelope();
        env.sign_eth_der(&key).unwrap();
        env.declare_signer_address(address);

        let config = AuthConfig::default().with_allow_non_registered_users(true);
        let mut ctx = Context::new(&mut stub, config);
        let err = authenticate(&mut ctx, &env, 1).unwrap_err();
        assert_eq!(err.key(), "USER_NOT_REGISTERED");
    }

    #[test]
    fn missing_stored_key_for_declared_address() {
        let mut stub = MemStub::new();
        let key = k256::ecdsa::SigningKey::random(&mut OsRng);
        let address = eth_address(key.verifying_key());
        // Profile exists but no public key record was stored.
        put_user_profile(
            &mut stub,
            &address,
            &UserProfile::eth("client|keyless", address.clone()),
        )
        .unwrap();

        let mut env = envelope();
        env.sign_eth_der(&key).unwrap();
        env.declare_signer_address(address);

        let mut ctx = Context::new(&mut stub, AuthConfig::default());
        let err = authenticate(&mut ctx, &env, 1).unwrap_err();
        assert_eq!(err.key(), "PK_MISSING");
    }

    #[test]
    fn ton_signature_with_declared_public_key() {
        let mut stub = MemStub::new();
        let key = ed25519_dalek::SigningKey::from_bytes(&rand::random::<[u8; 32]>());
        let public = quill_crypto::PublicKey::Ed25519(key.verifying_key());
        let address = public.address();
        put_user_profile(
            &mut stub,
            &address,
            &UserProfile::ton("client|tina", address.clone()),
        )
        .unwrap();

        let mut env = envelope().with_signing(SigningScheme::Ton);
        env.sign_ton(&key).unwrap();
        env.declare_signer_public_key(public.to_stored_string());

        let mut ctx = Context::new(&mut stub, AuthConfig::default());
        let result = authenticate(&mut ctx, &env, 1).unwrap();
        assert_eq!(result.user.alias, "client|tina");
        assert_eq!(result.users[0].ton_address.as_deref(), Some(address.as_str()));
    }

    #[test]
    fn ton_signature_without_declared_signer_is_missing_signer() {
        let mut stub = MemStub::new();
        let key = ed25519_dalek::SigningKey::from_bytes(&rand::random::<[u8; 32]>());
        let mut env = envelope().with_signing(SigningScheme::Ton);
        env.sign_ton(&key).unwrap();

        let mut ctx = Context::new(&mut stub, AuthConfig::default());
        let err = authenticate(&mut ctx, &env, 1).unwrap_err();
        assert_eq!(err.key(), "MISSING_SIGNER");
    }

    #[test]
    fn ton_signature_with_declared_address_uses_stored_key() {
        let mut stub = MemStub::new();
        let key = ed25519_dalek::SigningKey::from_bytes(&rand::random::<[u8; 32]>());
        let public = quill_crypto::PublicKey::Ed25519(key.verifying_key());
        let address = public.address();
        put_user_profile(
            &mut stub,
            &address,
            &UserProfile::ton("client|tina", address.clone()),
        )
        .unwrap();
        put_public_key(
            &mut stub,
            "client|tina",
            &PublicKeyRecord {
                public_key: public.to_stored_string(),
                signing: SigningScheme::Ton,
            },
        )
        .unwrap();

        let mut env = envelope().with_signing(SigningScheme::Ton);
        env.sign_ton(&key).unwrap();
        env.declare_signer_address(address);

        let mut ctx = Context::new(&mut stub, AuthConfig::default());
        let result = authenticate(&mut ctx, &env, 1).unwrap();
        assert_eq!(result.user.alias, "client|tina");
    }

    #[test]
    fn origin_chaincode_requires_matching_proposal() {
        let mut stub = MemStub::new();
        stub.set_signed_proposal(Some(SignedProposal {
            invocation_spec: ChaincodeInvocationSpec {
                chaincode_name: "token".to_string(),
                args: vec![],
            },
        }));

        let mut env = envelope();
        env.signer_address = Some("service|token".to_string());
        let mut ctx = Context::new(&mut stub, AuthConfig::default());
        let result = authenticate(&mut ctx, &env, 1).unwrap();
        assert_eq!(result.user.alias, "service|token");
        assert!(result.user.roles.is_empty());
        assert!(result.users.is_empty());
        assert!(ctx.calling_users.is_empty());
    }

    #[test]
    fn origin_chaincode_name_mismatch_fails() {
        let mut stub = MemStub::new();
        stub.set_signed_proposal(Some(SignedProposal {
            invocation_spec: ChaincodeInvocationSpec {
                chaincode_name: "other".to_string(),
                args: vec![],
            },
        }));

        let mut env = envelope();
        env.signer_address = Some("service|token".to_string());
        let mut ctx = Context::new(&mut stub, AuthConfig::default());
        let err = authenticate(&mut ctx, &env, 1).unwrap_err();
        assert_eq!(err.key(), "CHAINCODE_AUTHORIZATION");
    }

    #[test]
    fn origin_chaincode_without_proposal_fails() {
        let mut stub = MemStub::new();
        let mut env = envelope();
        env.signer_address = Some("service|token".to_string());
        let mut ctx = Context::new(&mut stub, AuthConfig::default());
        let err = authenticate(&mut ctx, &env, 1).unwrap_err();
        assert_eq!(err.key(), "CHAINCODE_AUTHORIZATION");
    }

    #[test]
    fn admin_bootstrap_signer_authenticates_without_registration() {
        let mut stub = MemStub::new();
        let key = k256::ecdsa::SigningKey::random(&mut OsRng);
        let public_hex = hex::encode(key.verifying_key().to_encoded_point(false).as_bytes());

        let mut env = envelope();
        env.sign_eth(&key).unwrap();

        let config = AuthConfig::default().with_dev_admin(public_hex, None);
        let mut ctx = Context::new(&mut stub, config);
        let result = authenticate(&mut ctx, &env, 1).unwrap();
        assert!(result.users[0].has_role("CURATOR"));
    }
}
