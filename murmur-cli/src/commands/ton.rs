use colored::Colorize;
use murmur_core::{InMemoryRuntime, RuntimeOptions};
use murmur_plugin_ton::{validate_env_config, TonConfigError, TON_PRIVATE_KEY, TON_RPC_URL};

/// Flags act as runtime settings; anything unset or empty falls back to the
/// process environment.
pub async fn handle_validate_ton_command(
    private_key: Option<String>,
    rpc_url: Option<String>,
) -> anyhow::Result<()> {
    let mut options = RuntimeOptions::new("ton-validator").without_env_fallback();
    if let Some(key) = private_key {
        options = options.with_setting(TON_PRIVATE_KEY, key);
    }
    if let Some(url) = rpc_url {
        options = options.with_setting(TON_RPC_URL, url);
    }
    let runtime = InMemoryRuntime::new(options);

    match validate_env_config(&runtime).await {
        Ok(config) => {
            println!(
                "{} {}",
                "✓".green().bold(),
                "TON configuration is valid".green()
            );
            println!(
                "  {:<18} {}",
                format!("{}:", TON_PRIVATE_KEY).bold(),
                config.masked_private_key()
            );
            let rpc_url = if config.ton_rpc_url.is_empty() {
                "(empty)".dimmed().to_string()
            } else {
                config.ton_rpc_url.clone()
            };
            println!("  {:<18} {}", format!("{}:", TON_RPC_URL).bold(), rpc_url);
            Ok(())
        }
        Err(TonConfigError::Validation { issues }) => {
            println!(
                "{} {}",
                "✗".red().bold(),
                "TON configuration is invalid".red()
            );
            for issue in &issues {
                println!("  {} {}", "→".blue(), issue);
            }
            Err(TonConfigError::Validation { issues }.into())
        }
        Err(e) => Err(e.into()),
    }
}
