//! Authentication configuration and environment bootstrap.

use serde::{Deserialize, Serialize};

/// Environment variable holding the bootstrap admin public key (raw or hex
/// secp256k1). A debug-mode affordance; production deployments omit it.
pub const ENV_DEV_ADMIN_PUBLIC_KEY: &str = "DEV_ADMIN_PUBLIC_KEY";

/// Environment variable overriding the bootstrap admin alias. Must begin
/// with `eth|` or `client|`.
pub const ENV_DEV_ADMIN_USER_ID: &str = "DEV_ADMIN_USER_ID";

/// Environment variable toggling synthesized default profiles for callers
/// without a stored user profile.
pub const ENV_ALLOW_NON_REGISTERED_USERS: &str = "ALLOW_NON_REGISTERED_USERS";

/// Authenticator configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Synthesize a default profile for signers without a stored profile
    /// when their public key is known.
    pub allow_non_registered_users: bool,

    /// Environment-bootstrapped admin identity, if configured.
    pub dev_admin: Option<DevAdminConfig>,
}

/// Bootstrap admin identity configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevAdminConfig {
    /// secp256k1 public key, hex or base64.
    pub public_key: String,
    /// Optional alias override; defaults to `eth|<derived-address>`.
    pub user_id: Option<String>,
}

impl AuthConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Self {
        let allow_non_registered_users = std::env::var(ENV_ALLOW_NON_REGISTERED_USERS)
            .map(|value| value.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let dev_admin = std::env::var(ENV_DEV_ADMIN_PUBLIC_KEY)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .map(|public_key| DevAdminConfig {
                public_key,
                user_id: std::env::var(ENV_DEV_ADMIN_USER_ID).ok(),
            });

        Self {
            allow_non_registered_users,
            dev_admin,
        }
    }

    pub fn with_allow_non_registered_users(mut self, allow: bool) -> Self {
        self.allow_non_registered_users = allow;
        self
    }

    pub fn with_dev_admin(mut self, public_key: impl Into<String>, user_id: Option<String>) -> Self {
        self.dev_admin = Some(DevAdminConfig {
            public_key: public_key.into(),
            user_id,
        });
        self
    }
}
