//! Plaintext secrets file commands.

use std::path::PathBuf;

use clap::Args;
use logreason_secrets::{paths, SecretError, SecretStore};

use super::blocking;

/// Which plaintext secrets file to operate on.
#[derive(Args, Debug, Default)]
pub struct FileArgs {
    /// Secrets file (defaults to ~/.logreason/secrets.json)
    #[arg(long)]
    pub file: Option<PathBuf>,
}

impl FileArgs {
    pub fn path(&self) -> anyhow::Result<PathBuf> {
        match &self.file {
            Some(path) => Ok(path.clone()),
            None => Ok(paths::secrets_file()?),
        }
    }
}

fn open(path: PathBuf) -> logreason_secrets::Result<SecretStore> {
    let store = SecretStore::new();
    store.load_from_file(&path)?;
    Ok(store)
}

/// List secret names.
pub async fn list(args: FileArgs) -> anyhow::Result<()> {
    let path = args.path()?;
    let store = blocking(move || open(path)).await?;

    if store.is_empty() {
        println!("No secrets stored.");
    } else {
        for name in store.names() {
            println!("{name}");
        }
        println!("\n{} secret(s) total.", store.len());
    }
    Ok(())
}

/// Print a single secret value.
pub async fn get(name: String, args: FileArgs) -> anyhow::Result<()> {
    let path = args.path()?;
    let store = blocking(move || open(path)).await?;

    match store.get(&name) {
        Some(value) => {
            println!("{value}");
            Ok(())
        }
        None => anyhow::bail!("Secret '{}' not found", name),
    }
}

/// Insert or overwrite a secret, creating the file if needed.
pub async fn set(name: String, value: Option<String>, args: FileArgs) -> anyhow::Result<()> {
    if name.trim().is_empty() {
        anyhow::bail!("Secret name must not be empty");
    }

    let value = match value {
        Some(v) => v,
        None => {
            let prompt = format!("Enter value for '{name}': ");
            rpassword::prompt_password(prompt)
                .map_err(|e| anyhow::anyhow!("Failed to read secret: {}", e))?
        }
    };

    let path = args.path()?;
    let display_name = name.clone();
    blocking(move || {
        let store = SecretStore::new();
        match store.load_from_file(&path) {
            Ok(_) | Err(SecretError::NotFound(_)) => {}
            Err(e) => return Err(e),
        }
        store.set(name, value);
        store.save_to_file(&path)
    })
    .await?;

    println!("Secret '{}' stored successfully.", display_name);
    Ok(())
}
