//! The signed request envelope.
//!
//! An envelope carries the operation payload, an anti-replay `uniqueKey`,
//! an optional domain-separation `prefix`, and an ordered sequence of
//! signature entries. The legacy single-signature form puts `signature`
//! (and optionally `signerAddress`/`signerPublicKey`) at the top level and
//! is treated as a one-entry `signatures` list.

use quill_crypto::signing_payload;
use quill_types::{ChainError, SigningScheme};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One signature over the envelope's canonical payload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureEntry {
    /// Hex for ETH (recoverable or DER), base64 for TON.
    pub signature: String,
    /// Hex for ETH, base64 for TON.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signer_public_key: Option<String>,
    /// `eth|`-prefixed or raw hex for ETH, bounceable form for TON.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signer_address: Option<String>,
}

impl SignatureEntry {
    pub fn new(signature: impl Into<String>) -> Self {
        Self {
            signature: signature.into(),
            signer_public_key: None,
            signer_address: None,
        }
    }

    /// Identifier used to attribute per-signature errors: the declared
    /// address, the declared public key, or the entry index.
    pub fn signer_id(&self, index: usize) -> String {
        self.signer_address
            .clone()
            .or_else(|| self.signer_public_key.clone())
            .unwrap_or_else(|| index.to_string())
    }
}

/// Signed request envelope.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    /// Signing scheme; defaults to ETH when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signing: Option<SigningScheme>,

    /// Domain-separation string mixed into the signed payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    /// Replay-protection key; required on SUBMIT-class operations and
    /// included in the signed payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_key: Option<String>,

    /// Ordered signature entries (the multi-signature form).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub signatures: Vec<SignatureEntry>,

    /// Legacy top-level signature (single-signature form).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,

    /// Top-level signer address; also the `service|` sender of the
    /// origin-chaincode path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signer_address: Option<String>,

    /// Top-level signer public key (legacy single-signature form).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signer_public_key: Option<String>,

    /// Operation-specific fields.
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl Envelope {
    /// Envelope around an operation payload, which must be a JSON object.
    pub fn for_payload(payload: Value) -> Result<Self, ChainError> {
        match payload {
            Value::Object(payload) => Ok(Self {
                payload,
                ..Self::default()
            }),
            other => Err(ChainError::validation(format!(
                "envelope payload must be a JSON object, got {other}"
            ))),
        }
    }

    pub fn with_unique_key(mut self, unique_key: impl Into<String>) -> Self {
        self.unique_key = Some(unique_key.into());
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_signing(mut self, signing: SigningScheme) -> Self {
        self.signing = Some(signing);
        self
    }

    /// Signing scheme of every signature in this envelope.
    pub fn scheme(&self) -> SigningScheme {
        self.signing.unwrap_or_default()
    }

    /// The bytes every signer of this envelope commits to.
    pub fn payload_to_sign(&self) -> Result<Vec<u8>, ChainError> {
        let value = serde_json::to_value(self)?;
        Ok(signing_payload(&value, self.prefix.as_deref()))
    }

    /// Deserialize the operation payload into a typed DTO.
    pub fn parse_payload<T: serde::de::DeserializeOwned>(&self) -> Result<T, ChainError> {
        Ok(serde_json::from_value(Value::Object(self.payload.clone()))?)
    }

    /// The effective signature entries.
    ///
    /// The legacy top-level `signature` is sugar for a one-entry list; an
    /// envelope carrying both forms is rejected unless they agree.
    pub fn entries(&self) -> Result<Vec<SignatureEntry>, ChainError> {
        match &self.signature {
            Some(top_level) if self.signatures.is_empty() => Ok(vec![SignatureEntry {
                signature: top_level.clone(),
                signer_public_key: self.signer_public_key.clone(),
                signer_address: self.signer_address.clone(),
            }]),
            Some(top_level) => {
                let agrees =
                    self.signatures.len() == 1 && self.signatures[0].signature == *top_level;
                if agrees {
                    Ok(self.signatures.clone())
                } else {
                    Err(ChainError::validation(
                        "envelope carries both a top-level signature and a conflicting signatures list",
                    ))
                }
            }
            None => Ok(self.signatures.clone()),
        }
    }

    /// Sign the canonical payload with the recoverable ETH form and append
    /// the resulting entry.
    pub fn sign_eth(&mut self, key: &k256::ecdsa::SigningKey) -> Result<&mut Self, ChainError> {
        let message = self.payload_to_sign()?;
        let signature = quill_crypto::sign_eth(key, &message)?;
        self.signatures.push(SignatureEntry::new(signature));
        Ok(self)
    }

    /// Sign with the DER (non-recoverable) ETH form and append the entry.
    pub fn sign_eth_der(&mut self, key: &k256::ecdsa::SigningKey) -> Result<&mut Self, ChainError> {
        let message = self.payload_to_sign()?;
        let signature = quill_crypto::sign_eth_der(key, &message)?;
        self.signatures.push(SignatureEntry::new(signature));
        Ok(self)
    }

    /// Sign with the TON scheme and append the entry. TON signatures are
    /// not recoverable, so the entry must later carry a declared signer.
    pub fn sign_ton(&mut self, key: &ed25519_dalek::SigningKey) -> Result<&mut Self, ChainError> {
        let message = self.payload_to_sign()?;
        let signature = quill_crypto::sign_ton(key, &message);
        self.signatures.push(SignatureEntry::new(signature));
        Ok(self)
    }

    /// Set a declared field on the most recently appended entry.
    pub fn declare_signer_address(&mut self, address: impl Into<String>) -> &mut Self {
        if let Some(entry) = self.signatures.last_mut() {
            entry.signer_address = Some(address.into());
        }
        self
    }

    /// Set the declared public key on the most recently appended entry.
    pub fn declare_signer_public_key(&mut self, public_key: impl Into<String>) -> &mut Self {
        if let Some(entry) = self.signatures.last_mut() {
            entry.signer_public_key = Some(public_key.into());
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payload_must_be_an_object() {
        assert!(Envelope::for_payload(json!({"a": 1})).is_ok());
        assert!(Envelope::for_payload(json!([1, 2])).is_err());
        assert!(Envelope::for_payload(json!("str")).is_err());
    }

    #[test]
    fn top_level_signature_becomes_single_entry() {
        let envelope: Envelope = serde_json::from_value(json!({
            "signature": "aabb",
            "signerAddress": "0x1234",
            "amount": "5"
        }))
        .unwrap();

        let entries = envelope.entries().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].signature, "aabb");
        assert_eq!(entries[0].signer_address.as_deref(), Some("0x1234"));
    }

    #[test]
    fn conflicting_signature_forms_are_rejected() {
        let envelope: Envelope = serde_json::from_value(json!({
            "signature": "aabb",
            "signatures": [{"signature": "ccdd"}]
        }))
        .unwrap();
        assert!(envelope.entries().is_err());

        let agreeing: Envelope = serde_json::from_value(json!({
            "signature": "aabb",
            "signatures": [{"signature": "aabb"}]
        }))
        .unwrap();
        assert_eq!(agreeing.entries().unwrap().len(), 1);
    }

    #[test]
    fn signed_bytes_ignore_attached_signatures() {
        let mut envelope = Envelope::for_payload(json!({"amount": "10"}))
            .unwrap()
            .with_unique_key("k1");
        let before = envelope.payload_to_sign().unwrap();

        let key = k256::ecdsa::SigningKey::random(&mut rand::rngs::OsRng);
        envelope.sign_eth(&key).unwrap();
        envelope.sign_eth(&key).unwrap();

        assert_eq!(envelope.payload_to_sign().unwrap(), before);
    }

    #[test]
    fn signed_bytes_include_unique_key_and_scheme() {
        let plain = Envelope::for_payload(json!({"amount": "10"})).unwrap();
        let keyed = Envelope::for_payload(json!({"amount": "10"}))
            .unwrap()
            .with_unique_key("k1");
        let tagged = keyed.clone().with_signing(SigningScheme::Ton);

        let plain_bytes = plain.payload_to_sign().unwrap();
        let keyed_bytes = keyed.payload_to_sign().unwrap();
        let tagged_bytes = tagged.payload_to_sign().unwrap();
        assert_ne!(plain_bytes, keyed_bytes);
        assert_ne!(keyed_bytes, tagged_bytes);
    }

    #[test]
    fn prefix_changes_signed_bytes_but_not_serialized_payload() {
        let without = Envelope::for_payload(json!({"a": 1})).unwrap();
        let with = without.clone().with_prefix("\u{19}quill:");
        assert_ne!(
            without.payload_to_sign().unwrap(),
            with.payload_to_sign().unwrap()
        );
    }

    #[test]
    fn parse_payload_reads_operation_fields() {
        #[derive(serde::Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Dto {
            wallet_id: String,
        }

        let envelope: Envelope =
            serde_json::from_value(json!({"walletId": "W", "uniqueKey": "k"})).unwrap();
        let dto: Dto = envelope.parse_payload().unwrap();
        assert_eq!(dto.wallet_id, "W");
    }
}
