//! ScanVault CLI

use anyhow::Context;
use clap::{Parser, Subcommand};
use scanvault_cli::{decrypt_file, digest_file, init_tracing};
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "scanvault", about = "ScanVault offline tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decrypt a stored blob with the key returned at upload time
    Decrypt {
        /// Hex-encoded one-time key (64 characters)
        #[arg(long, env = "SCANVAULT_KEY")]
        key: String,
        /// Encrypted blob (`.enc` file)
        #[arg(long)]
        input: PathBuf,
        /// Where to write the plaintext; stdout when omitted
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the SHA-256 digest the service computes for a file
    Digest {
        /// File to hash
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Decrypt { key, input, output } => {
            let plaintext = decrypt_file(&key, &input).await?;
            match output {
                Some(path) => {
                    tokio::fs::write(&path, &plaintext)
                        .await
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    tracing::info!(output = %path.display(), size_bytes = plaintext.len(), "Blob decrypted");
                }
                None => {
                    let mut stdout = std::io::stdout().lock();
                    stdout.write_all(&plaintext).context("Failed to write to stdout")?;
                    stdout.flush()?;
                }
            }
        }
        Commands::Digest { file } => {
            let digest = digest_file(&file).await?;
            println!("{}  {}", digest, file.display());
        }
    }

    Ok(())
}
