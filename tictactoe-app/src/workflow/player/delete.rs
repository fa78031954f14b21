use std::sync::Arc;

use crate::{
    domain::{PlayerId, player::PlayerRepository},
    workflow::{RecordError, RecordResult, storage_failure},
};

/// Deletes a player. Matches referencing it are cleaned up by the store.
#[async_trait::async_trait]
pub trait DeletePlayerUseCase {
    async fn delete_player(&self, id: PlayerId) -> RecordResult<()>;
}

pub struct DeletePlayerUseCaseImpl<P: PlayerRepository> {
    player_repository: Arc<P>,
}

impl<P: PlayerRepository> DeletePlayerUseCaseImpl<P> {
    pub fn new(player_repository: Arc<P>) -> Self {
        Self { player_repository }
    }
}

#[async_trait::async_trait]
impl<P: PlayerRepository + Send + Sync + 'static> DeletePlayerUseCase
    for DeletePlayerUseCaseImpl<P>
{
    async fn delete_player(&self, id: PlayerId) -> RecordResult<()> {
        let existing = self
            .player_repository
            .get_player(id)
            .await
            .map_err(|e| storage_failure("load player", e))?;
        if existing.is_none() {
            return Err(RecordError::NotFound(format!("no player with id {}", id)));
        }

        self.player_repository
            .delete_player(id)
            .await
            .map_err(|e| storage_failure("delete player", e))?;
        log::info!("Deleted player {}", id);
        Ok(())
    }
}
