//! Conversational client
//!
//! - chat: transcript and turn-by-turn driver over the flow engine
//! - transport: submission to the server
//! - pending: single-slot local store for failed submissions
//!
//! A completed diagnosis is submitted exactly once. When the server cannot
//! process it, the full state goes to the pending slot for a later resync.

pub mod chat;
pub mod pending;
pub mod transport;

pub use chat::{ChatMessage, ChatRole, Conversation, Turn};
pub use pending::{PendingStore, PendingStoreError};
pub use transport::{DiagnosisTransport, HttpTransport, SubmissionReceipt, TransportError};

use crate::diagnosis::{self, DiagnosisState};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Diagnosis is not complete ({answered} of {total} answered)")]
    Incomplete { answered: usize, total: usize },

    #[error("Diagnosis already submitted")]
    AlreadySubmitted,

    #[error(transparent)]
    Pending(#[from] PendingStoreError),
}

/// How a submission attempt ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitStatus {
    /// The server processed it; step failures, if any, are in the receipt
    Submitted(SubmissionReceipt),
    /// The server could not be reached or refused it; the state is in the slot
    SavedLocally { error: String },
}

/// Outcome of a resync attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResyncStatus {
    NothingPending,
    Synced(SubmissionReceipt),
    /// Still failing; the slot is kept
    Failed { error: String },
}

fn ensure_complete(state: &DiagnosisState) -> Result<(), ClientError> {
    if diagnosis::is_complete(state) {
        return Ok(());
    }
    Err(ClientError::Incomplete {
        answered: diagnosis::answered_count(state),
        total: diagnosis::TOTAL_QUESTIONS,
    })
}

/// The server has the diagnosis; a stale slot only costs an idempotent resync
fn clear_after_success(store: &PendingStore) {
    if let Err(e) = store.clear() {
        log::warn!(
            "[client] Diagnosis submitted but the pending slot {:?} could not be cleared: {}",
            store.path(),
            e
        );
    }
}

/// Turn a transport result into a status, updating the pending slot
fn settle(
    store: &PendingStore,
    state: &DiagnosisState,
    result: Result<SubmissionReceipt, TransportError>,
) -> Result<SubmitStatus, ClientError> {
    match result {
        Ok(receipt) => {
            clear_after_success(store);
            log::info!(
                "[client] Diagnosis submitted, lead {}",
                receipt.lead_id.as_deref().unwrap_or("?")
            );
            Ok(SubmitStatus::Submitted(receipt))
        }
        Err(e) => {
            log::warn!("[client] Submission failed, saving locally: {}", e);
            store.save(state)?;
            Ok(SubmitStatus::SavedLocally {
                error: e.to_string(),
            })
        }
    }
}

/// Submit a completed diagnosis, writing it to the pending slot on failure.
///
/// A processed submission clears the slot.
pub async fn submit_with_fallback(
    transport: &dyn DiagnosisTransport,
    store: &PendingStore,
    state: &DiagnosisState,
) -> Result<SubmitStatus, ClientError> {
    ensure_complete(state)?;
    let result = transport.submit(state).await;
    settle(store, state, result)
}

/// Resubmit the pending slot, clearing it on success
pub async fn resync(
    transport: &dyn DiagnosisTransport,
    store: &PendingStore,
) -> Result<ResyncStatus, ClientError> {
    let Some(state) = store.load()? else {
        return Ok(ResyncStatus::NothingPending);
    };

    match transport.submit(&state).await {
        Ok(receipt) => {
            clear_after_success(store);
            log::info!("[client] Pending diagnosis synced");
            Ok(ResyncStatus::Synced(receipt))
        }
        Err(e) => {
            log::warn!("[client] Resync failed, keeping pending diagnosis: {}", e);
            Ok(ResyncStatus::Failed {
                error: e.to_string(),
            })
        }
    }
}

/// Drive the completion step of a conversation, adding the outcome to the
/// transcript.
///
/// A conversation is submitted at most once: it counts as submitted as soon
/// as the transport returns, whatever happens to the pending slot afterwards.
pub async fn finish_conversation(
    conversation: &mut Conversation,
    transport: &dyn DiagnosisTransport,
    store: &PendingStore,
) -> Result<SubmitStatus, ClientError> {
    if conversation.is_submitted() {
        return Err(ClientError::AlreadySubmitted);
    }
    ensure_complete(conversation.state())?;

    let result = transport.submit(conversation.state()).await;
    conversation.mark_submitted();

    let status = settle(store, conversation.state(), result)?;
    match &status {
        SubmitStatus::Submitted(_) => conversation.say(chat::SUCCESS_MESSAGE),
        SubmitStatus::SavedLocally { error } => conversation.say(chat::saved_locally_message(error)),
    }
    Ok(status)
}
