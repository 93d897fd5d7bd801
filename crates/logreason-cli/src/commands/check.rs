//! Load every configured secret source and report the result.

use clap::Args;
use logreason_secrets::{import_best_effort, SecretStore, SecretsConfig};

use super::blocking;
use super::keys::KeyArgs;

/// Check command arguments.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Skip sources that fail to load instead of stopping at the first one
    #[arg(long)]
    pub best_effort: bool,

    #[command(flatten)]
    pub key: KeyArgs,
}

fn entries(count: usize) -> String {
    if count == 1 {
        "1 entry".to_string()
    } else {
        format!("{count} entries")
    }
}

/// Run the check command.
pub async fn run(args: CheckArgs, config: SecretsConfig) -> anyhow::Result<()> {
    let key = if args.key.is_present() {
        Some(args.key.resolve(&config.kdf)?)
    } else {
        None
    };
    let sources = config.sources(key.as_ref().map(|k| k.as_slice()));

    if sources.is_empty() {
        println!("No secret sources configured.");
        return Ok(());
    }

    let (store, failed) = if args.best_effort {
        let (store, report) = blocking(move || {
            let store = SecretStore::new();
            let report = import_best_effort(&store, &sources);
            Ok((store, report))
        })
        .await?;

        for (label, count) in &report.loaded {
            println!("{:<48} {}", label, entries(*count));
        }
        for (label, error) in &report.failed {
            println!("{:<48} FAILED: {}", label, error);
        }
        (store, report.failed.len())
    } else {
        let store = blocking(move || {
            let store = SecretStore::new();
            // SecretStore::load_all, printing each source's count as it loads
            for source in &sources {
                let count = store.load(source)?;
                println!("{:<48} {}", source.label(), entries(count));
            }
            Ok(store)
        })
        .await?;
        (store, 0)
    };

    println!("\n{} secret(s) available.", store.len());
    if failed > 0 {
        anyhow::bail!("{} source(s) failed to load", failed);
    }
    Ok(())
}
