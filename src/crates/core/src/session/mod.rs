//! Chat session orchestration
//!
//! Drives one turn end to end: settings check, context serialization,
//! adapter dispatch, normalization, and the pending-batch handshake. Only
//! one turn is in flight at a time; a new response replaces any unapplied
//! batch (no queueing), and nothing is ever applied without an explicit
//! `apply_pending` call.

pub mod prompt;

pub use prompt::build_system_prompt;

use crate::infrastructure::ai::{AIClient, ProviderResponse};
use crate::infrastructure::storage::{HistoryStore, SettingsStore};
use crate::schema::Operation;
use crate::util::errors::{SheetMateError, SheetMateResult};
use crate::util::types::Message;
use crate::workbook::{apply, build_context, ApplyReport, SpreadsheetHost};
use log::{debug, info};
use std::sync::Arc;

/// Phase of the current chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    Idle,
    SerializingContext,
    AwaitingModel,
    Normalizing,
    PendingBatchHeld,
    Applying,
}

pub struct ChatSession {
    client: AIClient,
    host: Arc<dyn SpreadsheetHost>,
    settings: Arc<dyn SettingsStore>,
    history: Arc<dyn HistoryStore>,
    phase: TurnPhase,
    pending: Option<Vec<Operation>>,
}

impl ChatSession {
    pub fn new(
        client: AIClient,
        host: Arc<dyn SpreadsheetHost>,
        settings: Arc<dyn SettingsStore>,
        history: Arc<dyn HistoryStore>,
    ) -> Self {
        Self {
            client,
            host,
            settings,
            history,
            phase: TurnPhase::Idle,
            pending: None,
        }
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// Operations extracted from the most recent response, awaiting an
    /// explicit apply or discard.
    pub fn pending_operations(&self) -> Option<&[Operation]> {
        self.pending.as_deref()
    }

    /// Run one chat turn. Fails fast with `MissingCredential` before any
    /// network call; on a provider error the turn aborts and the stored
    /// history is left untouched.
    pub async fn chat(&mut self, user_text: &str) -> SheetMateResult<ProviderResponse> {
        let settings = self.settings.get_settings()?;
        if settings.api_key.trim().is_empty() {
            return Err(SheetMateError::MissingCredential(
                settings.provider.as_str().to_string(),
            ));
        }

        self.phase = TurnPhase::SerializingContext;
        // Always re-read: the workbook may have changed since the last turn.
        let context = build_context(self.host.as_ref()).await;
        let system_prompt = build_system_prompt(&context, settings.provider);

        let mut history = self.history.get_messages()?;
        history.push(Message::user(user_text));

        self.phase = TurnPhase::AwaitingModel;
        let response = match self.client.send(&settings, &history, &system_prompt).await {
            Ok(response) => response,
            Err(error) => {
                self.phase = TurnPhase::Idle;
                return Err(error);
            }
        };

        self.phase = TurnPhase::Normalizing;
        history.push(Message::assistant(&response.text));
        if let Err(error) = self.history.save_messages(&history) {
            self.phase = TurnPhase::Idle;
            return Err(error);
        }

        if response.operations.is_empty() {
            self.pending = None;
            self.phase = TurnPhase::Idle;
        } else {
            if self.pending.is_some() {
                debug!("Replacing unapplied pending batch with new response");
            }
            self.pending = Some(response.operations.clone());
            self.phase = TurnPhase::PendingBatchHeld;
        }

        Ok(response)
    }

    /// Apply the held batch against the host. No-op when nothing is pending.
    pub async fn apply_pending(&mut self) -> SheetMateResult<ApplyReport> {
        let Some(operations) = self.pending.take() else {
            return Ok(ApplyReport::default());
        };

        self.phase = TurnPhase::Applying;
        let report = apply(self.host.as_ref(), &operations).await;
        info!(
            "Applied pending batch: {}/{} operations succeeded",
            report.applied, report.attempted
        );
        self.phase = TurnPhase::Idle;
        Ok(report)
    }

    pub fn discard_pending(&mut self) {
        if self.pending.take().is_some() {
            debug!("Discarded pending batch");
        }
        self.phase = TurnPhase::Idle;
    }

    pub fn clear_history(&mut self) -> SheetMateResult<()> {
        self.history.clear_messages()
    }
}
