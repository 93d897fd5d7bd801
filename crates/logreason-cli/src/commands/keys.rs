//! Key generation and password key derivation commands.

use clap::Args;
use logreason_secrets::{cipher, kdf, KdfParams, SecretsConfig};
use zeroize::Zeroizing;

/// Environment variable holding the password for non-interactive use.
pub const PASSWORD_ENV: &str = "LOGREASON_SECRETS_PASSWORD";

/// Derive-key command arguments.
#[derive(Args, Debug)]
pub struct DeriveKeyArgs {
    /// Base64 salt from an earlier derivation (a new salt is generated if omitted)
    #[arg(long)]
    pub salt: Option<String>,
}

/// How an encryption key is obtained.
#[derive(Args, Debug, Default)]
pub struct KeyArgs {
    /// Base64 AES-256 key
    #[arg(long, env = "LOGREASON_SECRETS_KEY", hide_env_values = true)]
    pub key: Option<String>,

    /// Base64 salt; the key is derived from a password instead
    #[arg(long)]
    pub salt: Option<String>,
}

impl KeyArgs {
    /// Whether any key material was supplied.
    pub fn is_present(&self) -> bool {
        self.key.is_some() || self.salt.is_some()
    }

    /// Resolve the key, preferring password derivation when a salt is given.
    pub fn resolve(&self, params: &KdfParams) -> anyhow::Result<Zeroizing<Vec<u8>>> {
        if let Some(salt) = &self.salt {
            let salt = kdf::decode_key(salt)
                .map_err(|e| anyhow::anyhow!("Invalid --salt: {}", e))?;
            let password = read_password()?;
            let derived = params.derive(&password, &salt);
            return Ok(Zeroizing::new(derived.key().to_vec()));
        }

        if let Some(key) = &self.key {
            let key = kdf::decode_key(key).map_err(|e| anyhow::anyhow!("Invalid --key: {}", e))?;
            return Ok(Zeroizing::new(key));
        }

        anyhow::bail!("No key supplied: pass --key (or LOGREASON_SECRETS_KEY) or --salt")
    }
}

/// Read the password from the environment or prompt for it.
pub fn read_password() -> anyhow::Result<Zeroizing<String>> {
    let password = match std::env::var(PASSWORD_ENV) {
        Ok(password) => Zeroizing::new(password),
        Err(_) => Zeroizing::new(
            rpassword::prompt_password("Password: ")
                .map_err(|e| anyhow::anyhow!("Failed to read password: {}", e))?,
        ),
    };
    if password.is_empty() {
        anyhow::bail!("Password must not be empty");
    }
    Ok(password)
}

/// Print a new random key.
pub fn gen_key() -> anyhow::Result<()> {
    let key = cipher::generate_key()?;
    println!("{}", kdf::encode_key(&key));
    Ok(())
}

/// Derive a key from a password and print it with its salt.
pub fn derive_key(args: DeriveKeyArgs, config: &SecretsConfig) -> anyhow::Result<()> {
    let password = read_password()?;

    let derived = match args.salt {
        Some(salt) => {
            let salt = kdf::decode_key(&salt)
                .map_err(|e| anyhow::anyhow!("Invalid --salt: {}", e))?;
            config.kdf.derive(&password, &salt)
        }
        None => config.kdf.derive_new(&password)?,
    };

    println!("key:        {}", derived.to_base64());
    println!("salt:       {}", derived.salt_base64());
    println!("iterations: {}", derived.iterations());
    Ok(())
}
