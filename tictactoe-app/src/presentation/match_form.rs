use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::StreamExt;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::{
    domain::{MatchId, PlayerId, RecordId, r#match::Match, player::Player},
    ports::clock::Clock,
    presentation::{FormPhase, error_banner, follow_list},
    workflow::{
        RecordError,
        matches::{
            delete::DeleteMatchUseCase,
            list::{ListMatchesUseCase, MatchFilter},
            save::SaveMatchUseCase,
            validate::{PlayerSlot, ValidateMatchUseCase},
        },
        player::list::ListPlayersUseCase,
    },
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchFormState {
    pub phase: FormPhase,
    pub editing: RecordId<MatchId>,
    pub date: DateTime<Utc>,
    pub player1: Option<PlayerId>,
    pub player2: Option<PlayerId>,
    pub winner: Option<PlayerId>,
    pub finished: bool,
    pub date_error: Option<String>,
    pub player1_error: Option<String>,
    pub player2_error: Option<String>,
    pub winner_error: Option<String>,
    pub success_message: Option<String>,
    pub error_message: Option<String>,
    pub matches: Vec<Match>,
    /// Choices for the player pickers.
    pub players: Vec<Player>,
}

impl MatchFormState {
    /// Empty form with the date preset to `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            phase: FormPhase::Idle,
            editing: RecordId::New,
            date: now,
            player1: None,
            player2: None,
            winner: None,
            finished: false,
            date_error: None,
            player1_error: None,
            player2_error: None,
            winner_error: None,
            success_message: None,
            error_message: None,
            matches: Vec::new(),
            players: Vec::new(),
        }
    }

    fn fresh(&mut self, now: DateTime<Utc>, success_message: Option<String>) {
        *self = Self {
            matches: std::mem::take(&mut self.matches),
            players: std::mem::take(&mut self.players),
            success_message,
            ..Self::new(now)
        };
    }

    /// Display name of a player in the picker list.
    pub fn player_name(&self, id: PlayerId) -> Option<&str> {
        self.players
            .iter()
            .find(|p| p.id == RecordId::Existing(id))
            .map(|p| p.name.as_str())
    }

    fn clear_errors(&mut self) {
        self.error_message = None;
        self.phase = FormPhase::Editing;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchFormEvent {
    DateChanged(DateTime<Utc>),
    Player1Changed(Option<PlayerId>),
    Player2Changed(Option<PlayerId>),
    WinnerChanged(Option<PlayerId>),
    FinishedChanged(bool),
    RefreshPlayers,
    Save,
    Clear,
    Delete(MatchId),
    Select(MatchId),
}

pub struct MatchFormViewModel {
    list_players: Arc<dyn ListPlayersUseCase + Send + Sync>,
    save_match: Arc<dyn SaveMatchUseCase + Send + Sync>,
    delete_match: Arc<dyn DeleteMatchUseCase + Send + Sync>,
    validate_match: Arc<dyn ValidateMatchUseCase + Send + Sync>,
    clock: Arc<dyn Clock + Send + Sync>,
    state: Arc<watch::Sender<MatchFormState>>,
    cancel: CancellationToken,
}

impl MatchFormViewModel {
    /// Must be called within a Tokio runtime. Follows both the match list and
    /// the player list. New forms are dated by `clock`.
    pub fn new(
        list_matches: Arc<dyn ListMatchesUseCase + Send + Sync>,
        list_players: Arc<dyn ListPlayersUseCase + Send + Sync>,
        save_match: Arc<dyn SaveMatchUseCase + Send + Sync>,
        delete_match: Arc<dyn DeleteMatchUseCase + Send + Sync>,
        validate_match: Arc<dyn ValidateMatchUseCase + Send + Sync>,
        clock: Arc<dyn Clock + Send + Sync>,
    ) -> Self {
        let (state, _rx) = watch::channel(MatchFormState::new(clock.now()));
        let state = Arc::new(state);
        let cancel = CancellationToken::new();

        follow_list(
            list_matches.list_matches(MatchFilter::All),
            state.clone(),
            cancel.clone(),
            |s: &mut MatchFormState, snapshot| match snapshot {
                Ok(matches) => s.matches = matches,
                Err(e) => s.error_message = Some(error_banner(&e)),
            },
        );
        follow_list(
            list_players.list_players(),
            state.clone(),
            cancel.clone(),
            |s: &mut MatchFormState, snapshot| match snapshot {
                Ok(players) => s.players = players,
                Err(e) => s.error_message = Some(error_banner(&e)),
            },
        );

        Self {
            list_players,
            save_match,
            delete_match,
            validate_match,
            clock,
            state,
            cancel,
        }
    }

    pub fn state(&self) -> watch::Receiver<MatchFormState> {
        self.state.subscribe()
    }

    pub fn current(&self) -> MatchFormState {
        self.state.borrow().clone()
    }

    pub async fn on_event(&self, event: MatchFormEvent) {
        match event {
            MatchFormEvent::DateChanged(date) => self.state.send_modify(|s| {
                s.clear_errors();
                s.date = date;
                s.date_error = None;
            }),
            MatchFormEvent::Player1Changed(player) => self.state.send_modify(|s| {
                s.clear_errors();
                s.player1 = player;
                s.player1_error = None;
                s.player2_error = None;
            }),
            MatchFormEvent::Player2Changed(player) => self.state.send_modify(|s| {
                s.clear_errors();
                s.player2 = player;
                s.player2_error = None;
            }),
            MatchFormEvent::WinnerChanged(winner) => self.state.send_modify(|s| {
                s.clear_errors();
                s.winner = winner;
                s.winner_error = None;
            }),
            MatchFormEvent::FinishedChanged(finished) => self.state.send_modify(|s| {
                s.clear_errors();
                s.finished = finished;
            }),
            MatchFormEvent::RefreshPlayers => self.refresh_players().await,
            MatchFormEvent::Save => self.save().await,
            MatchFormEvent::Clear => {
                let now = self.clock.now();
                self.state.send_modify(|s| s.fresh(now, None))
            }
            MatchFormEvent::Delete(id) => self.delete(id).await,
            MatchFormEvent::Select(id) => self.select(id),
        }
    }

    async fn refresh_players(&self) {
        let snapshot = self.list_players.list_players().next().await;
        self.state.send_modify(|s| match snapshot {
            Some(Ok(players)) => s.players = players,
            Some(Err(e)) => s.error_message = Some(error_banner(&RecordError::from(e))),
            None => {}
        });
    }

    async fn save(&self) {
        let form = self.current();
        self.state.send_modify(|s| {
            s.phase = FormPhase::Submitting;
            s.error_message = None;
        });

        let validate = &self.validate_match;
        let date_error = validate.validate_date(form.date);
        let player1_error = validate
            .validate_player(PlayerSlot::First, form.player1)
            .await;
        let player2_error = validate
            .validate_player(PlayerSlot::Second, form.player2)
            .await
            .or_else(|| validate.validate_distinct_players(form.player1, form.player2));
        let winner_error = validate.validate_winner(form.winner, form.player1, form.player2);

        let valid = date_error.is_none()
            && player1_error.is_none()
            && player2_error.is_none()
            && winner_error.is_none();
        let (Some(player1), Some(player2), true) = (form.player1, form.player2, valid) else {
            self.state.send_modify(|s| {
                s.phase = FormPhase::Editing;
                s.date_error = date_error;
                s.player1_error = player1_error;
                s.player2_error = player2_error;
                s.winner_error = winner_error;
            });
            return;
        };

        let r#match = Match {
            id: form.editing,
            date: form.date,
            player1,
            player2,
            winner: form.winner,
            finished: form.finished || form.winner.is_some(),
        };
        match self.save_match.save_match(r#match).await {
            Ok(_) => {
                let message = if form.editing.is_new() {
                    "Match recorded"
                } else {
                    "Match updated"
                };
                let now = self.clock.now();
                self.state
                    .send_modify(|s| s.fresh(now, Some(message.to_string())));
            }
            Err(e) => self.state.send_modify(|s| {
                s.phase = FormPhase::Editing;
                s.error_message = Some(error_banner(&e));
            }),
        }
    }

    async fn delete(&self, id: MatchId) {
        let phase = self.current().phase;
        self.state.send_modify(|s| {
            s.phase = FormPhase::Submitting;
            s.error_message = None;
        });

        match self.delete_match.delete_match(id).await {
            Ok(()) => self.state.send_modify(|s| {
                if s.editing == RecordId::Existing(id) {
                    s.fresh(self.clock.now(), None);
                } else {
                    // another row went away; unsaved edits stay as they were
                    s.phase = phase;
                }
                s.success_message = Some("Match deleted".to_string());
            }),
            Err(e) => self.state.send_modify(|s| {
                s.phase = FormPhase::Editing;
                s.error_message = Some(error_banner(&e));
            }),
        }
    }

    fn select(&self, id: MatchId) {
        self.state.send_modify(|s| {
            let Some(m) = s
                .matches
                .iter()
                .find(|m| m.id == RecordId::Existing(id))
                .cloned()
            else {
                s.error_message = Some(format!("No match with id {}", id));
                return;
            };
            s.fresh(m.date, None);
            s.phase = FormPhase::Editing;
            s.editing = m.id;
            s.date = m.date;
            s.player1 = Some(m.player1);
            s.player2 = Some(m.player2);
            s.winner = m.winner;
            s.finished = m.finished;
        });
    }
}

impl Drop for MatchFormViewModel {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
