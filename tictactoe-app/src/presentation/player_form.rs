use std::sync::Arc;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::{
    domain::{PlayerId, RecordId, player::Player, rules},
    presentation::{FormPhase, error_banner, follow_list},
    workflow::player::{
        delete::DeletePlayerUseCase, list::ListPlayersUseCase, save::SavePlayerUseCase,
        validate::ValidatePlayerUseCase,
    },
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerFormState {
    pub phase: FormPhase,
    pub editing: RecordId<PlayerId>,
    pub name: String,
    pub match_count: String,
    pub name_error: Option<String>,
    pub match_count_error: Option<String>,
    pub success_message: Option<String>,
    pub error_message: Option<String>,
    pub players: Vec<Player>,
}

impl PlayerFormState {
    fn fresh(players: Vec<Player>, success_message: Option<String>) -> Self {
        Self {
            players,
            success_message,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerFormEvent {
    NameChanged(String),
    MatchCountChanged(String),
    Save,
    Clear,
    Delete(PlayerId),
    Select(PlayerId),
}

pub struct PlayerFormViewModel {
    save_player: Arc<dyn SavePlayerUseCase + Send + Sync>,
    delete_player: Arc<dyn DeletePlayerUseCase + Send + Sync>,
    validate_player: Arc<dyn ValidatePlayerUseCase + Send + Sync>,
    state: Arc<watch::Sender<PlayerFormState>>,
    cancel: CancellationToken,
}

impl PlayerFormViewModel {
    /// Must be called within a Tokio runtime; the player list is followed on a
    /// spawned task.
    pub fn new(
        list_players: Arc<dyn ListPlayersUseCase + Send + Sync>,
        save_player: Arc<dyn SavePlayerUseCase + Send + Sync>,
        delete_player: Arc<dyn DeletePlayerUseCase + Send + Sync>,
        validate_player: Arc<dyn ValidatePlayerUseCase + Send + Sync>,
    ) -> Self {
        let (state, _rx) = watch::channel(PlayerFormState::default());
        let state = Arc::new(state);
        let cancel = CancellationToken::new();

        follow_list(
            list_players.list_players(),
            state.clone(),
            cancel.clone(),
            |s: &mut PlayerFormState, snapshot| match snapshot {
                Ok(players) => s.players = players,
                Err(e) => s.error_message = Some(error_banner(&e)),
            },
        );

        Self {
            save_player,
            delete_player,
            validate_player,
            state,
            cancel,
        }
    }

    pub fn state(&self) -> watch::Receiver<PlayerFormState> {
        self.state.subscribe()
    }

    pub fn current(&self) -> PlayerFormState {
        self.state.borrow().clone()
    }

    pub async fn on_event(&self, event: PlayerFormEvent) {
        match event {
            PlayerFormEvent::NameChanged(name) => self.state.send_modify(|s| {
                s.phase = FormPhase::Editing;
                s.name = name;
                s.name_error = None;
                s.error_message = None;
            }),
            PlayerFormEvent::MatchCountChanged(match_count) => self.state.send_modify(|s| {
                s.phase = FormPhase::Editing;
                s.match_count = match_count;
                s.match_count_error = None;
                s.error_message = None;
            }),
            PlayerFormEvent::Save => self.save().await,
            PlayerFormEvent::Clear => self.state.send_modify(|s| {
                *s = PlayerFormState::fresh(std::mem::take(&mut s.players), None);
            }),
            PlayerFormEvent::Delete(id) => self.delete(id).await,
            PlayerFormEvent::Select(id) => self.select(id),
        }
    }

    async fn save(&self) {
        let form = self.current();
        self.state.send_modify(|s| {
            s.phase = FormPhase::Submitting;
            s.error_message = None;
        });

        let name_error = self
            .validate_player
            .validate_name(&form.name, form.editing)
            .await;
        let match_count_error = self.validate_player.validate_match_count(&form.match_count);
        let match_count = match (&name_error, &match_count_error) {
            (None, None) => rules::parse_match_count(&form.match_count).ok(),
            _ => None,
        };
        let Some(match_count) = match_count else {
            self.state.send_modify(|s| {
                s.phase = FormPhase::Editing;
                s.name_error = name_error;
                s.match_count_error = match_count_error;
            });
            return;
        };

        let player = Player {
            id: form.editing,
            name: form.name.trim().to_string(),
            match_count,
        };
        match self.save_player.save_player(player).await {
            Ok(_) => {
                let message = if form.editing.is_new() {
                    "Player created"
                } else {
                    "Player updated"
                };
                self.state.send_modify(|s| {
                    *s = PlayerFormState::fresh(
                        std::mem::take(&mut s.players),
                        Some(message.to_string()),
                    );
                });
            }
            Err(e) => self.state.send_modify(|s| {
                s.phase = FormPhase::Editing;
                s.error_message = Some(error_banner(&e));
            }),
        }
    }

    async fn delete(&self, id: PlayerId) {
        let phase = self.current().phase;
        self.state.send_modify(|s| {
            s.phase = FormPhase::Submitting;
            s.error_message = None;
        });

        match self.delete_player.delete_player(id).await {
            Ok(()) => self.state.send_modify(|s| {
                if s.editing == RecordId::Existing(id) {
                    *s = PlayerFormState::fresh(std::mem::take(&mut s.players), None);
                } else {
                    s.phase = phase;
                }
                s.success_message = Some("Player deleted".to_string());
            }),
            Err(e) => self.state.send_modify(|s| {
                s.phase = FormPhase::Editing;
                s.error_message = Some(error_banner(&e));
            }),
        }
    }

    fn select(&self, id: PlayerId) {
        self.state.send_modify(|s| {
            let Some(player) = s
                .players
                .iter()
                .find(|p| p.id == RecordId::Existing(id))
                .cloned()
            else {
                s.error_message = Some(format!("No player with id {}", id));
                return;
            };
            let players = std::mem::take(&mut s.players);
            *s = PlayerFormState {
                phase: FormPhase::Editing,
                editing: player.id,
                name: player.name,
                match_count: player.match_count.to_string(),
                players,
                ..Default::default()
            };
        });
    }
}

impl Drop for PlayerFormViewModel {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        domain::mock::{MockStore, seed_player},
        workflow::player::{
            delete::DeletePlayerUseCaseImpl, list::ListPlayersUseCaseImpl,
            save::SavePlayerUseCaseImpl, validate::ValidatePlayerUseCaseImpl,
        },
    };

    use super::*;

    fn view_model(store: &MockStore) -> PlayerFormViewModel {
        let store = Arc::new(store.clone());
        PlayerFormViewModel::new(
            Arc::new(ListPlayersUseCaseImpl::new(store.clone())),
            Arc::new(SavePlayerUseCaseImpl::new(store.clone())),
            Arc::new(DeletePlayerUseCaseImpl::new(store.clone())),
            Arc::new(ValidatePlayerUseCaseImpl::new(store)),
        )
    }

    #[tokio::test]
    async fn test_save_success_resets_form_with_message() {
        let store = MockStore::default();
        let vm = view_model(&store);
        let mut state = vm.state();

        vm.on_event(PlayerFormEvent::NameChanged(" Ana ".to_string()))
            .await;
        vm.on_event(PlayerFormEvent::MatchCountChanged("2".to_string()))
            .await;
        assert_eq!(vm.current().phase, FormPhase::Editing);

        vm.on_event(PlayerFormEvent::Save).await;

        let s = state
            .wait_for(|s| s.players.len() == 1)
            .await
            .unwrap()
            .clone();
        assert_eq!(s.phase, FormPhase::Idle);
        assert_eq!(s.success_message.as_deref(), Some("Player created"));
        assert_eq!(s.name, "");
        assert_eq!(s.players[0].name, "Ana");
        assert_eq!(s.players[0].match_count, 2);
    }

    #[tokio::test]
    async fn test_field_errors_and_clearing() {
        let store = MockStore::default();
        seed_player(&store, "Ana").await;
        let vm = view_model(&store);

        vm.on_event(PlayerFormEvent::NameChanged("Ana".to_string()))
            .await;
        vm.on_event(PlayerFormEvent::MatchCountChanged("-3".to_string()))
            .await;
        vm.on_event(PlayerFormEvent::Save).await;

        let s = vm.current();
        assert_eq!(s.phase, FormPhase::Editing);
        assert!(s.name_error.is_some());
        assert!(s.match_count_error.is_some());
        assert_eq!(store.players().len(), 1);

        vm.on_event(PlayerFormEvent::NameChanged("Bob".to_string()))
            .await;
        let s = vm.current();
        assert_eq!(s.name_error, None);
        assert!(s.match_count_error.is_some());
    }

    #[tokio::test]
    async fn test_select_then_update() {
        let store = MockStore::default();
        let ana = seed_player(&store, "Ana").await;
        let vm = view_model(&store);
        vm.state().wait_for(|s| s.players.len() == 1).await.unwrap();

        vm.on_event(PlayerFormEvent::Select(ana)).await;
        let s = vm.current();
        assert_eq!(s.editing, RecordId::Existing(ana));
        assert_eq!((s.name.as_str(), s.match_count.as_str()), ("Ana", "0"));

        vm.on_event(PlayerFormEvent::MatchCountChanged("5".to_string()))
            .await;
        vm.on_event(PlayerFormEvent::Save).await;

        assert_eq!(
            vm.current().success_message.as_deref(),
            Some("Player updated")
        );
        assert_eq!(store.players(), vec![Player::new("Ana", 5).with_id(ana)]);
    }

    #[tokio::test]
    async fn test_select_unknown_player_shows_banner() {
        let vm = view_model(&MockStore::default());
        vm.on_event(PlayerFormEvent::Select(PlayerId(8))).await;
        assert!(vm.current().error_message.is_some());
    }

    #[tokio::test]
    async fn test_delete_edited_player_clears_form() {
        let store = MockStore::default();
        let ana = seed_player(&store, "Ana").await;
        let vm = view_model(&store);
        vm.state().wait_for(|s| s.players.len() == 1).await.unwrap();
        vm.on_event(PlayerFormEvent::Select(ana)).await;

        vm.on_event(PlayerFormEvent::Delete(ana)).await;
        let s = vm.current();
        assert_eq!(s.editing, RecordId::New);
        assert_eq!(s.name, "");
        assert_eq!(s.success_message.as_deref(), Some("Player deleted"));

        vm.on_event(PlayerFormEvent::Delete(ana)).await;
        let banner = vm.current().error_message.unwrap();
        assert!(banner.starts_with("Not found"));
    }

    #[tokio::test]
    async fn test_storage_failure_surfaces_as_banner() {
        let store = MockStore::default();
        let vm = view_model(&store);
        vm.on_event(PlayerFormEvent::NameChanged("Ana".to_string()))
            .await;
        vm.on_event(PlayerFormEvent::MatchCountChanged("0".to_string()))
            .await;
        store.set_failing(true);

        vm.on_event(PlayerFormEvent::Save).await;
        let s = vm.current();
        assert_eq!(s.phase, FormPhase::Editing);
        assert_eq!(s.name_error, None);
        assert_eq!(s.name, "Ana");
        let banner = s.error_message.unwrap();
        assert!(banner.starts_with("Database error"), "{}", banner);
        assert!(banner.contains("disk I/O error"));
    }

    #[tokio::test]
    async fn test_deleting_another_player_keeps_unsaved_edits() {
        let store = MockStore::default();
        let bob = seed_player(&store, "Bob").await;
        let vm = view_model(&store);

        vm.on_event(PlayerFormEvent::NameChanged("Cleo".to_string()))
            .await;
        vm.on_event(PlayerFormEvent::Delete(bob)).await;

        let s = vm.current();
        assert_eq!(s.phase, FormPhase::Editing);
        assert_eq!(s.name, "Cleo");
        assert_eq!(s.success_message.as_deref(), Some("Player deleted"));
    }
}
