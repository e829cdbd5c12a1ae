use murmur_core::SettingsProvider;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

use crate::error::{TonConfigError, ValidationIssue};

pub const TON_PRIVATE_KEY: &str = "TON_PRIVATE_KEY";
pub const TON_RPC_URL: &str = "TON_RPC_URL";

/// Validated TON settings.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TonEnvConfig {
    #[serde(rename = "TON_PRIVATE_KEY")]
    pub ton_private_key: String,
    /// May be empty.
    #[serde(rename = "TON_RPC_URL")]
    pub ton_rpc_url: String,
}

impl TonEnvConfig {
    /// Private key with all but the last four characters hidden.
    pub fn masked_private_key(&self) -> String {
        mask(&self.ton_private_key)
    }
}

impl fmt::Debug for TonEnvConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TonEnvConfig")
            .field("ton_private_key", &self.masked_private_key())
            .field("ton_rpc_url", &self.ton_rpc_url)
            .finish()
    }
}

fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let visible: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), visible)
}

/// Reads the TON settings from `provider`, falling back to the process
/// environment, and validates them.
pub async fn validate_env_config(
    provider: &dyn SettingsProvider,
) -> Result<TonEnvConfig, TonConfigError> {
    validate_env_config_with(provider, |key| std::env::var(key).ok()).await
}

/// Like [`validate_env_config`] with an explicit fallback lookup.
pub async fn validate_env_config_with<F>(
    provider: &dyn SettingsProvider,
    env_lookup: F,
) -> Result<TonEnvConfig, TonConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let private_key = resolve(provider, &env_lookup, TON_PRIVATE_KEY).await?;
    let rpc_url = resolve(provider, &env_lookup, TON_RPC_URL).await?;

    let mut issues = Vec::new();

    match &private_key {
        None => issues.push(ValidationIssue::new(TON_PRIVATE_KEY, "Required")),
        Some(key) if key.is_empty() => issues.push(ValidationIssue::new(
            TON_PRIVATE_KEY,
            "Ton private key is required",
        )),
        Some(_) => {}
    }

    if rpc_url.is_none() {
        issues.push(ValidationIssue::new(TON_RPC_URL, "Required"));
    }

    match (private_key, rpc_url) {
        (Some(ton_private_key), Some(ton_rpc_url)) if issues.is_empty() => {
            debug!(rpc_url = %ton_rpc_url, "TON configuration validated");
            Ok(TonEnvConfig {
                ton_private_key,
                ton_rpc_url,
            })
        }
        _ => {
            warn!(failed_fields = issues.len(), "TON configuration invalid");
            Err(TonConfigError::Validation { issues })
        }
    }
}

/// A runtime value wins only when non-empty; otherwise the fallback answers,
/// which may itself yield an empty string.
async fn resolve<F>(
    provider: &dyn SettingsProvider,
    env_lookup: &F,
    key: &str,
) -> Result<Option<String>, TonConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match provider.get_setting(key).await? {
        Some(value) if !value.is_empty() => Ok(Some(value)),
        _ => Ok(env_lookup(key)),
    }
}
