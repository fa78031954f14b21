use std::sync::Arc;

use crate::{
    domain::{
        PlayerId, RecordId, rules,
        player::{Player, PlayerRepository},
    },
    workflow::{RecordError, RecordResult, storage_failure},
};

/// Inserts a new player or updates an existing one, depending on its id.
#[async_trait::async_trait]
pub trait SavePlayerUseCase {
    async fn save_player(&self, player: Player) -> RecordResult<PlayerId>;
}

pub struct SavePlayerUseCaseImpl<P: PlayerRepository> {
    player_repository: Arc<P>,
}

impl<P: PlayerRepository> SavePlayerUseCaseImpl<P> {
    pub fn new(player_repository: Arc<P>) -> Self {
        Self { player_repository }
    }
}

#[async_trait::async_trait]
impl<P: PlayerRepository + Send + Sync + 'static> SavePlayerUseCase for SavePlayerUseCaseImpl<P> {
    async fn save_player(&self, player: Player) -> RecordResult<PlayerId> {
        if let Some(problem) = rules::player_name_problem(&player.name) {
            log::warn!("Rejected player {:?}: {}", player.name, problem);
            return Err(RecordError::Validation(problem));
        }
        if let Some(problem) = rules::match_count_problem(player.match_count) {
            return Err(RecordError::InvalidCount(problem));
        }

        let name = player.name.trim().to_string();
        let trimmed = Player {
            name: name.clone(),
            ..player
        };

        match trimmed.id {
            RecordId::New => {
                let exists = self
                    .player_repository
                    .exists_name(&name)
                    .await
                    .map_err(|e| storage_failure("check player name", e))?;
                if exists {
                    return Err(RecordError::AlreadyExists(format!(
                        "a player named '{}' already exists",
                        name
                    )));
                }

                let id = self
                    .player_repository
                    .insert_player(&trimmed)
                    .await
                    .map_err(|e| storage_failure("insert player", e))?;
                log::info!("Created player {} ({})", id, name);
                Ok(id)
            }
            RecordId::Existing(id) => {
                let current = self
                    .player_repository
                    .get_player(id)
                    .await
                    .map_err(|e| storage_failure("load player", e))?
                    .ok_or_else(|| {
                        RecordError::Validation(format!("player {} to update was not found", id))
                    })?;

                if current.name.trim() != name {
                    let exists = self
                        .player_repository
                        .exists_name(&name)
                        .await
                        .map_err(|e| storage_failure("check player name", e))?;
                    if exists {
                        return Err(RecordError::AlreadyExists(format!(
                            "a player named '{}' already exists",
                            name
                        )));
                    }
                }

                self.player_repository
                    .update_player(id, &trimmed)
                    .await
                    .map_err(|e| storage_failure("update player", e))?;
                log::info!("Updated player {} ({})", id, name);
                Ok(id)
            }
        }
    }
}
