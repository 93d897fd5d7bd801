//! Encrypt and decrypt secrets files.

use std::path::PathBuf;

use clap::Args;
use logreason_secrets::{SecretStore, SecretsConfig};

use super::blocking;
use super::keys::KeyArgs;

/// Encrypt/decrypt command arguments.
#[derive(Args, Debug)]
pub struct CryptArgs {
    /// File to read
    #[arg(long)]
    pub input: PathBuf,

    /// File to write
    #[arg(long)]
    pub output: PathBuf,

    #[command(flatten)]
    pub key: KeyArgs,
}

/// Read a plaintext secrets file and write it encrypted.
pub async fn encrypt(args: CryptArgs, config: &SecretsConfig) -> anyhow::Result<()> {
    let key = args.key.resolve(&config.kdf)?;
    let (input, output) = (args.input, args.output.clone());

    let count = blocking(move || {
        let store = SecretStore::new();
        let count = store.load_from_file(&input)?;
        store.save_encrypted_to_file(&output, &key)?;
        Ok(count)
    })
    .await?;

    println!("Encrypted {} secret(s) to {}", count, args.output.display());
    Ok(())
}

/// Read an encrypted secrets file and write it as plaintext.
pub async fn decrypt(args: CryptArgs, config: &SecretsConfig) -> anyhow::Result<()> {
    let key = args.key.resolve(&config.kdf)?;
    let (input, output) = (args.input, args.output.clone());

    let count = blocking(move || {
        let store = SecretStore::new();
        let count = store.load_encrypted_from_file(&input, &key)?;
        store.save_to_file(&output)?;
        Ok(count)
    })
    .await?;

    println!("Decrypted {} secret(s) to {}", count, args.output.display());
    Ok(())
}
