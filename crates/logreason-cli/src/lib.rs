//! LogReason secrets command-line interface.

pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// LogReason - secret store management
#[derive(Parser)]
#[command(name = "logreason-secrets")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase logging verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to the secrets config file
    #[arg(short, long, env = "LOGREASON_SECRETS_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Print a new random AES-256 key (base64)
    GenKey,

    /// Derive a key from a password
    DeriveKey(commands::keys::DeriveKeyArgs),

    /// List secret names in a plaintext secrets file
    List(commands::file::FileArgs),

    /// Print one secret from a plaintext secrets file
    Get {
        /// Secret name
        name: String,

        #[command(flatten)]
        file: commands::file::FileArgs,
    },

    /// Store a secret in a plaintext secrets file
    Set {
        /// Secret name
        name: String,

        /// Secret value (if omitted, prompts for hidden input)
        #[arg(long)]
        value: Option<String>,

        #[command(flatten)]
        file: commands::file::FileArgs,
    },

    /// Encrypt a plaintext secrets file
    Encrypt(commands::crypt::CryptArgs),

    /// Decrypt an encrypted secrets file
    Decrypt(commands::crypt::CryptArgs),

    /// Load every configured source and report what was found
    Check(commands::check::CheckArgs),

    /// Show version information
    Version,
}

/// Run the CLI with the given arguments.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::GenKey => commands::keys::gen_key(),
        Commands::DeriveKey(args) => commands::keys::derive_key(args, &config),
        Commands::List(file) => commands::file::list(file).await,
        Commands::Get { name, file } => commands::file::get(name, file).await,
        Commands::Set { name, value, file } => commands::file::set(name, value, file).await,
        Commands::Encrypt(args) => commands::crypt::encrypt(args, &config).await,
        Commands::Decrypt(args) => commands::crypt::decrypt(args, &config).await,
        Commands::Check(args) => commands::check::run(args, config).await,
        Commands::Version => {
            println!("logreason-secrets {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
