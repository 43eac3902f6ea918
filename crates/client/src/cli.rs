//! `docvault` command line.
//!
//! ```text
//! docvault seal  [--input FILE]                 plaintext → envelope (local only)
//! docvault open  [--input FILE]                 envelope → plaintext (local only)
//! docvault save  --name NAME [--input FILE]     seal, then store under NAME
//! docvault load  --name NAME                    retrieve NAME once, then open it
//! ```
//!
//! Input defaults to stdin. The passkey comes from `--passkey` or
//! `DOCVAULT_PASSKEY`.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use envelope::EnvelopeError;
use tokio::io::AsyncReadExt;
use tracing::info;

use crate::transfer::{HttpTransfer, TransferError, DEFAULT_SERVER_URL};
use crate::workflow::{self, Editor, WorkflowError};

#[derive(Debug, Parser)]
#[command(name = "docvault", version, about = "Passkey-sealed documents with a read-once store")]
pub struct Cli {
    /// Base URL of the docvault server.
    #[arg(long, global = true, env = "DOCVAULT_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
    pub server: String,

    /// Log filter written to stderr (e.g. `debug`, `docvault_client=trace`).
    #[arg(long, global = true, env = "DOCVAULT_LOG", default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Encrypt a document and print its envelope.
    Seal {
        #[command(flatten)]
        passkey: PasskeyArg,
        /// Read the document from FILE instead of stdin.
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,
    },
    /// Decrypt an envelope and print the document.
    Open {
        #[command(flatten)]
        passkey: PasskeyArg,
        /// Read the envelope from FILE instead of stdin.
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,
    },
    /// Encrypt a document and store it on the server.
    Save {
        /// Name to store the document under.
        #[arg(long)]
        name: String,
        #[command(flatten)]
        passkey: PasskeyArg,
        /// Read the document from FILE instead of stdin.
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,
    },
    /// Fetch a stored document (removing it from the server) and print it.
    Load {
        /// Name the document was stored under.
        #[arg(long)]
        name: String,
        #[command(flatten)]
        passkey: PasskeyArg,
    },
}

#[derive(Args)]
pub struct PasskeyArg {
    /// Passkey used to derive the document key.
    #[arg(long, env = "DOCVAULT_PASSKEY", hide_env_values = true)]
    pub passkey: String,
}

impl fmt::Debug for PasskeyArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasskeyArg")
            .field("passkey", &"[REDACTED]")
            .finish()
    }
}

/// Execute a parsed command line.
///
/// # Errors
///
/// Returns the failing step with a hint for the common causes (wrong
/// passkey, unknown or already loaded name, unreachable server).
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Seal { passkey, input } => {
            let text = read_input(input.as_deref()).await?;
            let wire = workflow::seal(&text, &passkey.passkey)
                .await
                .map_err(explain)?;
            println!("{wire}");
        }
        Command::Open { passkey, input } => {
            let wire = read_input(input.as_deref()).await?;
            let text = workflow::open(wire.trim(), &passkey.passkey)
                .await
                .map_err(explain)?;
            print!("{text}");
        }
        Command::Save {
            name,
            passkey,
            input,
        } => {
            let text = read_input(input.as_deref()).await?;
            let mut editor = Editor::new(HttpTransfer::new(&cli.server)?);
            editor.set_name(name);
            editor.set_text(text)?;
            editor.encrypt(&passkey.passkey).await.map_err(explain)?;
            editor.save().await.map_err(explain)?;
            info!(server = %cli.server, "document stored");
            eprintln!("Document saved successfully");
        }
        Command::Load { name, passkey } => {
            let mut editor = Editor::new(HttpTransfer::new(&cli.server)?);
            editor
                .load(&name, &passkey.passkey)
                .await
                .map_err(|e| match e {
                    WorkflowError::Envelope(EnvelopeError::Authentication) => anyhow::Error::new(e)
                        .context("wrong passkey; the server has already discarded this document"),
                    other => explain(other),
                })?;
            print!("{}", editor.content());
        }
    }
    Ok(())
}

async fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .context("failed to read stdin")?;
            Ok(buf)
        }
    }
}

/// Attach a user-facing hint to the failures people actually hit.
fn explain(err: WorkflowError) -> anyhow::Error {
    let hint = match &err {
        WorkflowError::Envelope(EnvelopeError::Authentication) => {
            Some("the passkey is wrong or the envelope was altered")
        }
        WorkflowError::Transfer(TransferError::NotFound) => {
            Some("nothing is stored under that name; documents can be loaded only once")
        }
        WorkflowError::Transfer(TransferError::Conflict) => {
            Some("that name is taken; choose another")
        }
        WorkflowError::Transfer(TransferError::Http(_)) => {
            Some("could not reach the docvault server")
        }
        _ => None,
    };
    match hint {
        Some(hint) => anyhow::Error::new(err).context(hint),
        None => err.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_parses_name_passkey_and_input() {
        let cli = Cli::try_parse_from([
            "docvault", "save", "--name", "plan", "--passkey", "pk", "--input", "notes.txt",
        ])
        .unwrap();
        match cli.command {
            Command::Save {
                name,
                passkey,
                input,
            } => {
                assert_eq!(name, "plan");
                assert_eq!(passkey.passkey, "pk");
                assert_eq!(input, Some(PathBuf::from("notes.txt")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn server_flag_is_global() {
        let cli = Cli::try_parse_from([
            "docvault",
            "load",
            "--name",
            "plan",
            "--passkey",
            "pk",
            "--server",
            "http://vault.internal:8080",
        ])
        .unwrap();
        assert_eq!(cli.server, "http://vault.internal:8080");
        assert!(matches!(cli.command, Command::Load { .. }));
    }

    #[test]
    fn save_requires_a_name() {
        let err = Cli::try_parse_from(["docvault", "save", "--passkey", "pk"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn passkey_is_redacted_in_debug_output() {
        let cli = Cli::try_parse_from(["docvault", "seal", "--passkey", "hunter2"]).unwrap();
        let debug = format!("{cli:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn authentication_failures_get_a_hint() {
        let err = explain(WorkflowError::Envelope(EnvelopeError::Authentication));
        assert_eq!(
            err.to_string(),
            "the passkey is wrong or the envelope was altered"
        );
        assert!(err
            .chain()
            .any(|cause| cause.to_string() == "envelope authentication failed"));
    }

    #[test]
    fn validation_failures_pass_through() {
        let err = explain(WorkflowError::MissingContent);
        assert_eq!(err.to_string(), "the document content cannot be empty");
    }

    #[tokio::test]
    async fn reads_input_from_file() {
        let path = std::env::temp_dir().join(format!("docvault-cli-{}.txt", std::process::id()));
        tokio::fs::write(&path, "from a file\n").await.unwrap();
        let text = read_input(Some(&path)).await.unwrap();
        tokio::fs::remove_file(&path).await.unwrap();
        assert_eq!(text, "from a file\n");
    }

    #[tokio::test]
    async fn missing_input_file_names_the_path() {
        let err = read_input(Some(Path::new("/nonexistent/docvault.txt")))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/docvault.txt"));
    }
}
