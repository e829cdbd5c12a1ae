use clap::{Parser, Subcommand};
use colored::Colorize;
use murmur_core::{CliErrorDisplay, LoggingConfig, MurmurError};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;

use commands::{handle_run_command, handle_validate_ton_command, OutputFormat, RunOptions};
use config::CliConfig;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const NAME: &str = env!("CARGO_PKG_NAME");

#[derive(Parser)]
#[command(name = "murmur")]
#[command(author = "Rohit Ghumare <ghumare64@gmail.com>")]
#[command(version = VERSION)]
#[command(about = "Murmur - scripted conversations between agent runtimes")]
#[command(long_about = r#"
Murmur drives multi-agent conversations for testing. Each agent gets its own
in-memory runtime; a scenario seeds history, sends live messages and prints
what every agent ended up seeing.

Use 'murmur run' for the built-in conversation or 'murmur run --script <file>'
for a TOML scenario. 'murmur validate-ton' checks TON wallet settings.
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true)]
    verbose: bool,

    #[arg(short, long, global = true, help = "Path to a murmur.toml config file")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Run a conversation scenario between in-memory agents")]
    Run {
        #[arg(short, long, help = "TOML scenario script (default: built-in conversation)")]
        script: Option<PathBuf>,

        #[arg(short, long, help = "Comma-separated agent names (e.g., Alice,Bob)")]
        agents: Option<String>,

        #[arg(
            short,
            long,
            value_enum,
            default_value = "text",
            help = "Output format (text, json)"
        )]
        format: OutputFormat,
    },

    #[command(about = "Validate TON plugin settings")]
    ValidateTon {
        #[arg(long, help = "Private key (falls back to TON_PRIVATE_KEY)")]
        private_key: Option<String>,

        #[arg(long, help = "RPC endpoint (falls back to TON_RPC_URL)")]
        rpc_url: Option<String>,
    },

    #[command(about = "Show version information")]
    Version {
        #[arg(short, long)]
        detailed: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = CliConfig::load(cli.config.as_deref());
    let logging = match &config {
        Ok(config) => config.logging().clone(),
        Err(_) => LoggingConfig::default(),
    };
    init_logging(cli.verbose, &logging);

    let result = match config {
        Ok(config) => run(cli.command, config).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(&e);
            ExitCode::FAILURE
        }
    }
}

fn report_error(e: &anyhow::Error) {
    // Context-free core errors are printed with their suggestion.
    match e.downcast_ref::<MurmurError>() {
        Some(core) if e.chain().count() == 1 => {
            eprint!("{}: {}", "Error".red().bold(), CliErrorDisplay::new(core))
        }
        _ => eprintln!("{}: {:#}", "Error".red().bold(), e),
    }
}

fn init_logging(verbose: bool, logging: &LoggingConfig) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level))
    };

    let registry = tracing_subscriber::registry().with(filter);

    if logging.json_format {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

async fn run(command: Commands, config: CliConfig) -> anyhow::Result<()> {
    match command {
        Commands::Run {
            script,
            agents,
            format,
        } => {
            handle_run_command(
                &config,
                RunOptions {
                    script,
                    agents,
                    format,
                },
            )
            .await
        }
        Commands::ValidateTon {
            private_key,
            rpc_url,
        } => handle_validate_ton_command(private_key, rpc_url).await,
        Commands::Version { detailed } => cmd_version(detailed),
    }
}

fn cmd_version(detailed: bool) -> anyhow::Result<()> {
    if detailed {
        println!("{}", "Murmur Version Information".cyan().bold());
        println!("{}", "═".repeat(40).dimmed());
        println!("  {:<15} {}", "Version:".bold(), VERSION);
        println!("  {:<15} {}", "Name:".bold(), NAME);
        println!("  {:<15} Apache-2.0", "License:".bold());
        println!(
            "  {:<15} https://github.com/rohitg00/murmur",
            "Repository:".bold()
        );
        println!();
        println!("  {}", "Plugins:".bold());
        println!("    ◎ ton");
        println!();
        println!("  {}", "Build Information:".bold());
        println!("    Rust Edition: 2021");
        #[cfg(debug_assertions)]
        println!("    Build:        Debug");
        #[cfg(not(debug_assertions))]
        println!("    Build:        Release");
    } else {
        println!("murmur {}", VERSION);
    }

    Ok(())
}
