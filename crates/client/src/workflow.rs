//! The client editing workflow.
//!
//! An [`Editor`] is either **Editable** (plaintext visible and mutable) or
//! **Locked** (the serialised envelope visible and frozen):
//!
//! ```text
//!            encrypt(passkey)
//!  Editable ─────────────────▶ Locked ──save()──▶ Editable (empty)
//!     ▲                          │
//!     └──────decrypt(passkey)────┘
//!
//!  load(name, passkey): any state ──▶ Editable (recovered text)
//! ```
//!
//! Every failed transition leaves the editor exactly as it was.
//!
//! Key derivation runs 100,000 PBKDF2 rounds, so all envelope work is moved
//! onto tokio's blocking pool.

use common::protocol::is_reserved_name;
use envelope::EnvelopeError;
use thiserror::Error;
use tokio::task::JoinError;
use tracing::debug;
use zeroize::Zeroizing;

use crate::transfer::{Transfer, TransferError};

/// Why a workflow step was refused or failed.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The passkey was empty.
    #[error("a passkey is required")]
    MissingPasskey,

    /// There is no text to encrypt.
    #[error("the document content cannot be empty")]
    MissingContent,

    /// The document name was empty.
    #[error("a document name is required")]
    MissingName,

    /// The document name is `.` or `..`.
    #[error("a document cannot be named `.` or `..`")]
    InvalidName,

    /// `encrypt` was called on a locked document.
    #[error("this document is already encrypted")]
    AlreadyLocked,

    /// `decrypt` or `save` was called on an editable document.
    #[error("this document is not encrypted")]
    NotLocked,

    /// The text of a locked document cannot change.
    #[error("the document is encrypted and cannot be edited")]
    Locked,

    /// Sealing or opening the envelope failed.
    #[error(transparent)]
    Envelope(#[from] EnvelopeError),

    /// The store refused the request or could not be reached.
    #[error(transparent)]
    Transfer(#[from] TransferError),

    /// The blocking envelope task panicked or was cancelled.
    #[error("envelope task did not complete: {0}")]
    Task(#[from] JoinError),
}

/// What the editor is currently showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorState {
    /// Plaintext, open for editing.
    Editable { text: String },
    /// A serialised envelope, read-only until decrypted or saved.
    Locked { envelope: String },
}

impl Default for EditorState {
    fn default() -> Self {
        Self::Editable {
            text: String::new(),
        }
    }
}

/// Seal `plaintext` with `passkey` on the blocking pool.
///
/// # Errors
///
/// [`WorkflowError::MissingPasskey`] for an empty passkey; envelope failures
/// otherwise.
pub async fn seal(plaintext: &str, passkey: &str) -> Result<String, WorkflowError> {
    let passkey = require_passkey(passkey)?;
    let plaintext = Zeroizing::new(plaintext.to_owned());
    let wire = tokio::task::spawn_blocking(move || envelope::seal(&plaintext, &passkey)).await??;
    Ok(wire)
}

/// Open a serialised envelope with `passkey` on the blocking pool.
///
/// # Errors
///
/// [`WorkflowError::MissingPasskey`] for an empty passkey,
/// [`EnvelopeError::Format`] for malformed input, and
/// [`EnvelopeError::Authentication`] for a wrong passkey.
pub async fn open(wire: &str, passkey: &str) -> Result<String, WorkflowError> {
    let passkey = require_passkey(passkey)?;
    let wire = wire.to_owned();
    let text = tokio::task::spawn_blocking(move || envelope::open(&wire, &passkey)).await??;
    Ok(text)
}

fn require_passkey(passkey: &str) -> Result<Zeroizing<String>, WorkflowError> {
    if passkey.is_empty() {
        return Err(WorkflowError::MissingPasskey);
    }
    Ok(Zeroizing::new(passkey.to_owned()))
}

/// A name must be present and must survive as a URL path segment.
fn check_name(name: &str) -> Result<(), WorkflowError> {
    if name.is_empty() {
        return Err(WorkflowError::MissingName);
    }
    if is_reserved_name(name) {
        return Err(WorkflowError::InvalidName);
    }
    Ok(())
}

/// Editable/Locked document editor backed by a [`Transfer`].
#[derive(Debug)]
pub struct Editor<T> {
    transfer: T,
    name: String,
    state: EditorState,
}

impl<T: Transfer> Editor<T> {
    /// An empty, editable document with no name.
    pub fn new(transfer: T) -> Self {
        Self {
            transfer,
            name: String::new(),
            state: EditorState::default(),
        }
    }

    /// Current Editable/Locked state.
    pub fn state(&self) -> &EditorState {
        &self.state
    }

    /// Document name; empty until set or loaded.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the editor holds an envelope rather than plaintext.
    pub fn is_locked(&self) -> bool {
        matches!(self.state, EditorState::Locked { .. })
    }

    /// What a user would see: the plaintext, or the envelope when locked.
    pub fn content(&self) -> &str {
        match &self.state {
            EditorState::Editable { text } => text,
            EditorState::Locked { envelope } => envelope,
        }
    }

    /// Set the name the document will be saved under.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Replace the plaintext.
    ///
    /// # Errors
    ///
    /// [`WorkflowError::Locked`] while the document is encrypted.
    pub fn set_text(&mut self, text: impl Into<String>) -> Result<(), WorkflowError> {
        match &mut self.state {
            EditorState::Editable { text: current } => {
                *current = text.into();
                Ok(())
            }
            EditorState::Locked { .. } => Err(WorkflowError::Locked),
        }
    }

    /// Editable → Locked.
    ///
    /// Requires a passkey, non-empty text, and a usable document name.
    pub async fn encrypt(&mut self, passkey: &str) -> Result<(), WorkflowError> {
        if passkey.is_empty() {
            return Err(WorkflowError::MissingPasskey);
        }
        let text = match &self.state {
            EditorState::Locked { .. } => return Err(WorkflowError::AlreadyLocked),
            EditorState::Editable { text } => text,
        };
        if text.is_empty() {
            return Err(WorkflowError::MissingContent);
        }
        check_name(&self.name)?;

        let envelope = seal(text, passkey).await?;
        self.state = EditorState::Locked { envelope };
        debug!("document locked");
        Ok(())
    }

    /// Locked → Editable.
    ///
    /// On a wrong passkey the document stays locked.
    pub async fn decrypt(&mut self, passkey: &str) -> Result<(), WorkflowError> {
        let EditorState::Locked { envelope } = &self.state else {
            return Err(WorkflowError::NotLocked);
        };
        let text = open(envelope, passkey).await?;
        self.state = EditorState::Editable { text };
        debug!("document unlocked");
        Ok(())
    }

    /// Submit the locked envelope and reset to an empty, unnamed document.
    ///
    /// Only valid while locked: plaintext never leaves the editor.
    pub async fn save(&mut self) -> Result<(), WorkflowError> {
        check_name(&self.name)?;
        let EditorState::Locked { envelope } = &self.state else {
            return Err(WorkflowError::NotLocked);
        };

        self.transfer.submit(&self.name, envelope).await?;
        self.name.clear();
        self.state = EditorState::default();
        debug!("document saved");
        Ok(())
    }

    /// Retrieve `name`, decrypt it with `passkey`, and show it for editing.
    ///
    /// The store deletes the document as soon as it is retrieved, so a wrong
    /// passkey here leaves nothing to retry against.
    pub async fn load(&mut self, name: &str, passkey: &str) -> Result<(), WorkflowError> {
        check_name(name)?;
        if passkey.is_empty() {
            return Err(WorkflowError::MissingPasskey);
        }

        let wire = self.transfer.retrieve(name).await?;
        let text = open(&wire, passkey).await?;
        self.name = name.to_owned();
        self.state = EditorState::Editable { text };
        debug!("document loaded");
        Ok(())
    }
}
