//! Per-screen state holders.
//!
//! Each view model publishes its form state through a [`watch`] channel, so any
//! task can render the latest state. Live lists are followed on a spawned task
//! that stops when the view model is dropped.

use std::sync::Arc;

use futures::StreamExt;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::{
    domain::LiveList,
    workflow::RecordError,
};

pub mod achievement_form;
pub mod match_form;
pub mod player_form;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormPhase {
    #[default]
    Idle,
    Editing,
    Submitting,
}

/// Banner text shown for a failed operation.
pub fn error_banner(error: &RecordError) -> String {
    match error {
        RecordError::Validation(msg) => format!("Validation error: {}", msg),
        RecordError::InvalidCount(msg) => format!("Invalid match count: {}", msg),
        RecordError::InvalidPlayer(msg) => format!("Player error: {}", msg),
        RecordError::NotFound(msg) => format!("Not found: {}", msg),
        RecordError::AlreadyExists(msg) => format!("Duplicate: {}", msg),
        RecordError::Database(msg) => format!("Database error: {}", msg),
    }
}

/// Applies every snapshot of `list` to the state until `cancel` fires or the
/// list ends.
pub(crate) fn follow_list<T, S, F>(
    list: LiveList<T>,
    state: Arc<watch::Sender<S>>,
    cancel: CancellationToken,
    apply: F,
) where
    T: Send + 'static,
    S: Send + Sync + 'static,
    F: Fn(&mut S, Result<Vec<T>, RecordError>) + Send + 'static,
{
    tokio::spawn(async move {
        let mut list = list;
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                next = list.next() => match next {
                    Some(snapshot) => {
                        if let Err(e) = &snapshot {
                            log::error!("Live list failed: {}", e);
                        }
                        let snapshot = snapshot.map_err(RecordError::from);
                        state.send_modify(|s| apply(s, snapshot));
                    }
                    None => break,
                },
            }
        }
    });
}
