use std::sync::Arc;

use crate::{
    domain::{PlayerId, r#match::MatchRepository, player::PlayerRepository},
    workflow::{RecordError, RecordResult, player::PlayerRecordView, storage_failure},
};

#[async_trait::async_trait]
pub trait GetPlayerRecordUseCase {
    async fn get_record(&self, player_id: PlayerId) -> RecordResult<PlayerRecordView>;
}

pub struct GetPlayerRecordUseCaseImpl<P: PlayerRepository, M: MatchRepository> {
    player_repository: Arc<P>,
    match_repository: Arc<M>,
}

impl<P: PlayerRepository, M: MatchRepository> GetPlayerRecordUseCaseImpl<P, M> {
    pub fn new(player_repository: Arc<P>, match_repository: Arc<M>) -> Self {
        Self {
            player_repository,
            match_repository,
        }
    }
}

#[async_trait::async_trait]
impl<P, M> GetPlayerRecordUseCase for GetPlayerRecordUseCaseImpl<P, M>
where
    P: PlayerRepository + Send + Sync + 'static,
    M: MatchRepository + Send + Sync + 'static,
{
    async fn get_record(&self, player_id: PlayerId) -> RecordResult<PlayerRecordView> {
        let player = self
            .player_repository
            .get_player(player_id)
            .await
            .map_err(|e| storage_failure("load player", e))?
            .ok_or_else(|| RecordError::NotFound(format!("no player with id {}", player_id)))?;

        let matches_played = self
            .match_repository
            .count_matches_of_player(player_id)
            .await
            .map_err(|e| storage_failure("count matches", e))?;
        let wins = self
            .match_repository
            .count_wins(player_id)
            .await
            .map_err(|e| storage_failure("count wins", e))?;

        Ok(PlayerRecordView {
            player_id,
            name: player.name,
            matches_played,
            wins,
        })
    }
}
