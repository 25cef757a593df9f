use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::{error, info, warn};

use homomorphic_aggregate::config::AppConfig;
use homomorphic_aggregate::encoding::FixedPoint;
use homomorphic_aggregate::encrypt::encrypt_signed;
use homomorphic_aggregate::server::{self, SubmitRequest};
use homomorphic_aggregate::{demo, PublicKey};

#[derive(Parser)]
#[command(name = "homomorphic-aggregate", about = "Sum private values without seeing them")]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the banking average and interest-after-tax walkthrough in-process
    Demo {
        /// Modulus size; 1024 and below are insecure
        #[arg(long)]
        bits: Option<usize>,
    },
    /// Serve the aggregation ledger for the given public key
    Serve {
        #[arg(long)]
        public_key: PathBuf,
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Encrypt one amount and print the submission JSON
    Encrypt {
        #[arg(long)]
        public_key: PathBuf,
        #[arg(long, allow_hyphen_values = true)]
        amount: String,
        #[arg(long, default_value = "branch")]
        producer: String,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Command::Demo { bits } => run_demo(&config, bits),
        Command::Serve { public_key, host, port } => {
            let public_key = read_public_key(&public_key)?;
            let host = host.unwrap_or(config.server.host);
            let port = port.unwrap_or(config.server.port);
            actix_web::rt::System::new()
                .block_on(server::run(public_key, &host, port))
                .context("Aggregation server")
        }
        Command::Encrypt { public_key, amount, producer } => {
            let public_key = read_public_key(&public_key)?;
            let units = FixedPoint::CURRENCY.parse(&amount)?;
            let ciphertext = encrypt_signed(&public_key, &units)?;
            println!("{}", serde_json::to_string_pretty(&SubmitRequest { producer, ciphertext })?);
            Ok(())
        }
    }
}

fn run_demo(config: &AppConfig, bits: Option<usize>) -> Result<()> {
    let mut config = config.clone();
    if let Some(bits) = bits {
        config.key_bits = bits;
    }
    if config.key_bits <= 1024 {
        warn!("{}-bit modulus is for demonstration only", config.key_bits);
    }

    let report = match demo::run(&config.key_generator()) {
        Ok(report) => report,
        Err(err) => {
            error!("aggregation halted: {err}");
            return Err(err.into());
        }
    };

    if !report.matches_plaintext() {
        bail!("decrypted average does not match the plaintext average");
    }
    info!("success: decrypted aggregate matches the plaintext computation");
    Ok(())
}

fn read_public_key(path: &Path) -> Result<PublicKey> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Read public key {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Parse public key {}", path.display()))
}
