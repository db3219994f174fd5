//! Signature-aggregation authentication for the quill contract platform.
//!
//! This crate turns a signed request envelope into an ordered list of
//! authenticated user profiles, enforces per-operation signature counts and
//! role predicates, and provides the registration/rotation hooks and the
//! replay guard that the authenticated operations build on.

pub mod authenticator;
pub mod config;
pub mod context;
pub mod envelope;
pub mod gate;
pub mod registration;
pub mod registry;
pub mod uniquetx;

pub use authenticator::{authenticate, AuthResult};
pub use config::AuthConfig;
pub use context::Context;
pub use envelope::{Envelope, SignatureEntry};
pub use gate::{authenticate_and_authorize, authorize, OperationPolicy, OperationType};
