use anyhow::Result;
use clap::Parser;
use colored::*;
use std::fmt::Display;
use tracing_subscriber::EnvFilter;

mod commands;

use solscribe_summarizer::InvocationRequest;

#[derive(Parser)]
#[command(name = "solscribe")]
#[command(about = "Generate a plain-English summary of a smart contract.")]
#[command(version)]
#[command(after_help = r#"ENVIRONMENT VARIABLES:
    OPENAI_API_KEY       Completion service key
    INFURA_API_KEY       Chain endpoint key
    ETHERSCAN_API_KEY    ABI lookup service key
    SOLSCRIBE_CONFIG     Optional YAML configuration file
    RUST_LOG             Log filter for diagnostics on stderr (default: warn)
"#)]
struct Cli {
    /// Sepolia testnet contract address (e.g., 0x123...)
    #[arg(long, value_name = "ADDRESS")]
    address: Option<String>,

    /// Raw Solidity code (wrap in quotes or provide file path)
    #[arg(long, value_name = "CODE")]
    code: Option<String>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_error(message: impl Display) {
    println!("{} {}", "Error:".red().bold(), message);
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let request = match InvocationRequest::from_flags(cli.address, cli.code) {
        Ok(request) => request,
        Err(e) => {
            print_error(e);
            return Ok(());
        }
    };

    let runtime = tokio::runtime::Runtime::new()?;
    match runtime.block_on(commands::summarize::execute(request)) {
        Ok(report) => println!("{}", report),
        Err(e) => print_error(format!("{:#}", e)),
    }

    Ok(())
}
