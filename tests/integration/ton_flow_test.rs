use async_trait::async_trait;
use murmur_core::{InMemoryRuntime, MurmurError, MurmurResult, RuntimeOptions, SettingsProvider};
use murmur_plugin_ton::{
    validate_env_config_with, TonConfigError, TonPlugin, TON_PRIVATE_KEY, TON_RPC_URL,
};
use std::collections::HashMap;

fn runtime_with(settings: &[(&str, &str)]) -> InMemoryRuntime {
    let mut options = RuntimeOptions::new("Wallet").without_env_fallback();
    for (key, value) in settings {
        options = options.with_setting(*key, *value);
    }
    InMemoryRuntime::new(options)
}

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

struct TimeoutSettings;

#[async_trait]
impl SettingsProvider for TimeoutSettings {
    async fn get_setting(&self, key: &str) -> MurmurResult<Option<String>> {
        Err(MurmurError::SettingsUnavailable {
            key: key.to_string(),
            message: "settings backend timed out".to_string(),
        })
    }
}

mod runtime_settings_tests {
    use super::*;

    #[tokio::test]
    async fn test_runtime_settings_win() {
        let runtime = runtime_with(&[(TON_PRIVATE_KEY, "abc"), (TON_RPC_URL, "http://x")]);
        let env = env_from(&[(TON_PRIVATE_KEY, "env-key"), (TON_RPC_URL, "http://env")]);

        let config = validate_env_config_with(&runtime, env).await.unwrap();

        assert_eq!(config.ton_private_key, "abc");
        assert_eq!(config.ton_rpc_url, "http://x");
    }

    #[tokio::test]
    async fn test_empty_runtime_setting_falls_back() {
        let runtime = runtime_with(&[(TON_PRIVATE_KEY, ""), (TON_RPC_URL, "http://x")]);
        let env = env_from(&[(TON_PRIVATE_KEY, "env-key")]);

        let config = validate_env_config_with(&runtime, env).await.unwrap();

        assert_eq!(config.ton_private_key, "env-key");
    }

    #[tokio::test]
    async fn test_empty_everywhere_fails_on_private_key_only() {
        let runtime = runtime_with(&[(TON_PRIVATE_KEY, ""), (TON_RPC_URL, "http://x")]);
        let env = env_from(&[(TON_PRIVATE_KEY, "")]);

        let err = validate_env_config_with(&runtime, env).await.unwrap_err();

        assert_eq!(err.issues().len(), 1);
        assert_eq!(err.issues()[0].path, TON_PRIVATE_KEY);
        assert!(err.to_string().starts_with("Ton configuration validation failed:\n"));
    }

    #[tokio::test]
    async fn test_provider_failure_is_not_a_validation_error() {
        let err = validate_env_config_with(&TimeoutSettings, env_from(&[]))
            .await
            .unwrap_err();

        assert!(!err.is_validation());
        assert_eq!(
            err.to_string(),
            "[E3005] Settings lookup failed for 'TON_PRIVATE_KEY': settings backend timed out"
        );
    }
}

mod plugin_lifecycle_tests {
    use super::*;

    #[tokio::test]
    async fn test_plugin_init_and_shutdown() {
        let runtime = runtime_with(&[
            (TON_PRIVATE_KEY, "k3y-material"),
            (TON_RPC_URL, "https://rpc.example"),
        ]);

        let mut plugin = TonPlugin::new();
        plugin.init(&runtime).await.unwrap();

        let config = plugin.config().unwrap();
        assert_eq!(config.ton_rpc_url, "https://rpc.example");
        assert!(!format!("{:?}", config).contains("k3y-material"));

        plugin.shutdown();
        assert!(plugin.config().is_none());
    }

    #[tokio::test]
    async fn test_plugin_init_error_converts_to_anyhow() {
        let runtime = runtime_with(&[]);
        let mut plugin = TonPlugin::new();

        let result: anyhow::Result<()> = plugin.init(&runtime).await.map_err(Into::into);
        let err = result.unwrap_err();

        let ton = err.downcast_ref::<TonConfigError>().unwrap();
        assert!(ton.is_validation());
    }
}
