use std::sync::Arc;

use crate::domain::{
    PlayerId, RecordId, rules,
    player::{Player, PlayerRepository},
};

/// Inline checks for the player form. Returns the message to show next to the
/// field, if any.
#[async_trait::async_trait]
pub trait ValidatePlayerUseCase {
    async fn validate_name(&self, name: &str, current: RecordId<PlayerId>) -> Option<String>;
    fn validate_match_count(&self, match_count: &str) -> Option<String>;
}

pub struct ValidatePlayerUseCaseImpl<P: PlayerRepository> {
    player_repository: Arc<P>,
}

impl<P: PlayerRepository> ValidatePlayerUseCaseImpl<P> {
    pub fn new(player_repository: Arc<P>) -> Self {
        Self { player_repository }
    }
}

impl<P: PlayerRepository + Send + Sync + 'static> ValidatePlayerUseCaseImpl<P> {
    async fn name_taken(&self, name: &str, current: RecordId<PlayerId>) -> Result<bool, String> {
        let stored: Option<Player> = match current {
            RecordId::New => None,
            RecordId::Existing(id) => self
                .player_repository
                .get_player(id)
                .await
                .map_err(|e| e.to_string())?,
        };
        if stored.is_some_and(|p| p.name.trim() == name) {
            return Ok(false);
        }
        self.player_repository
            .exists_name(name)
            .await
            .map_err(|e| e.to_string())
    }
}

#[async_trait::async_trait]
impl<P: PlayerRepository + Send + Sync + 'static> ValidatePlayerUseCase
    for ValidatePlayerUseCaseImpl<P>
{
    async fn validate_name(&self, name: &str, current: RecordId<PlayerId>) -> Option<String> {
        if let Some(problem) = rules::player_name_problem(name) {
            return Some(problem);
        }
        match self.name_taken(name.trim(), current).await {
            Ok(true) => Some("A player with that name already exists".to_string()),
            Ok(false) => None,
            Err(e) => {
                // the save itself reports the storage failure
                log::error!("Failed to check player name {:?}: {}", name, e);
                None
            }
        }
    }

    fn validate_match_count(&self, match_count: &str) -> Option<String> {
        rules::parse_match_count(match_count).err()
    }
}
