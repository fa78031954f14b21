use std::sync::Arc;

use crate::{
    domain::{
        MatchId, PlayerId, RecordId,
        r#match::{Match, MatchRepository},
        player::PlayerRepository,
        rules,
    },
    ports::clock::Clock,
    workflow::{RecordError, RecordResult, storage_failure},
};

/// Records a match between two existing players, or updates a recorded one.
#[async_trait::async_trait]
pub trait SaveMatchUseCase {
    async fn save_match(&self, r#match: Match) -> RecordResult<MatchId>;
}

pub struct SaveMatchUseCaseImpl<M: MatchRepository, P: PlayerRepository, C: Clock> {
    match_repository: Arc<M>,
    player_repository: Arc<P>,
    clock: Arc<C>,
}

impl<M: MatchRepository, P: PlayerRepository, C: Clock> SaveMatchUseCaseImpl<M, P, C> {
    pub fn new(match_repository: Arc<M>, player_repository: Arc<P>, clock: Arc<C>) -> Self {
        Self {
            match_repository,
            player_repository,
            clock,
        }
    }
}

impl<M, P, C> SaveMatchUseCaseImpl<M, P, C>
where
    M: MatchRepository + Send + Sync + 'static,
    P: PlayerRepository + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    async fn require_player(&self, slot: &str, id: PlayerId) -> RecordResult<()> {
        let player = self
            .player_repository
            .get_player(id)
            .await
            .map_err(|e| storage_failure("load player", e))?;
        match player {
            Some(_) => Ok(()),
            None => Err(RecordError::InvalidPlayer(format!(
                "{} does not exist (id {})",
                slot, id
            ))),
        }
    }
}

#[async_trait::async_trait]
impl<M, P, C> SaveMatchUseCase for SaveMatchUseCaseImpl<M, P, C>
where
    M: MatchRepository + Send + Sync + 'static,
    P: PlayerRepository + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    async fn save_match(&self, r#match: Match) -> RecordResult<MatchId> {
        self.require_player("player 1", r#match.player1).await?;
        self.require_player("player 2", r#match.player2).await?;

        let problem = rules::same_players_problem(r#match.player1, r#match.player2)
            .or_else(|| rules::winner_problem(r#match.winner, r#match.player1, r#match.player2))
            .or_else(|| rules::date_problem(r#match.date, self.clock.now()));
        if let Some(problem) = problem {
            log::warn!("Rejected match {:?}: {}", r#match, problem);
            return Err(RecordError::Validation(problem));
        }

        match r#match.id {
            RecordId::New => {
                let id = self
                    .match_repository
                    .insert_match(&r#match)
                    .await
                    .map_err(|e| storage_failure("insert match", e))?;
                log::info!(
                    "Recorded match {} between {} and {}",
                    id,
                    r#match.player1,
                    r#match.player2
                );
                Ok(id)
            }
            RecordId::Existing(id) => {
                let current = self
                    .match_repository
                    .get_match(id)
                    .await
                    .map_err(|e| storage_failure("load match", e))?;
                if current.is_none() {
                    return Err(RecordError::NotFound(format!("no match with id {}", id)));
                }
                self.match_repository
                    .update_match(id, &r#match)
                    .await
                    .map_err(|e| storage_failure("update match", e))?;
                log::info!("Updated match {}", id);
                Ok(id)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, Utc};

    use crate::{
        domain::mock::{MockStore, seed_player},
        ports::clock::FixedClock,
    };

    use super::*;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-03-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn use_case(store: &MockStore) -> SaveMatchUseCaseImpl<MockStore, MockStore, FixedClock> {
        let store = Arc::new(store.clone());
        SaveMatchUseCaseImpl::new(store.clone(), store, Arc::new(FixedClock(now())))
    }

    #[tokio::test]
    async fn test_valid_match_is_recorded() {
        let store = MockStore::default();
        let ana = seed_player(&store, "Ana").await;
        let bob = seed_player(&store, "Bob").await;

        let m = Match::new(now() - Duration::days(1), ana, bob).won_by(ana);
        let id = use_case(&store).save_match(m.clone()).await.expect("save");

        assert_eq!(store.matches(), vec![m.with_id(id)]);
    }

    #[tokio::test]
    async fn test_unknown_players_are_rejected_in_order() {
        let store = MockStore::default();
        let ana = seed_player(&store, "Ana").await;
        let save = use_case(&store);

        match save.save_match(Match::new(now(), PlayerId(77), ana)).await {
            Err(RecordError::InvalidPlayer(msg)) => assert!(msg.starts_with("player 1")),
            other => panic!("unexpected result: {:?}", other),
        }
        match save.save_match(Match::new(now(), ana, PlayerId(77))).await {
            Err(RecordError::InvalidPlayer(msg)) => assert!(msg.starts_with("player 2")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_self_match_is_rejected_even_when_otherwise_valid() {
        let store = MockStore::default();
        let ana = seed_player(&store, "Ana").await;
        let writes = store.write_count();

        for m in [
            Match::new(now(), ana, ana),
            Match::new(now() - Duration::days(3), ana, ana).won_by(ana),
        ] {
            let result = use_case(&store).save_match(m).await;
            assert!(matches!(result, Err(RecordError::Validation(_))));
        }
        assert_eq!(store.write_count(), writes);
    }

    #[tokio::test]
    async fn test_winner_must_be_a_participant() {
        let store = MockStore::default();
        let ana = seed_player(&store, "Ana").await;
        let bob = seed_player(&store, "Bob").await;
        let cleo = seed_player(&store, "Cleo").await;

        let result = use_case(&store)
            .save_match(Match::new(now(), ana, bob).won_by(cleo))
            .await;
        assert!(matches!(result, Err(RecordError::Validation(_))));
    }

    #[tokio::test]
    async fn test_future_date_is_rejected() {
        let store = MockStore::default();
        let ana = seed_player(&store, "Ana").await;
        let bob = seed_player(&store, "Bob").await;
        let save = use_case(&store);

        let result = save
            .save_match(Match::new(now() + Duration::seconds(1), ana, bob))
            .await;
        assert!(matches!(result, Err(RecordError::Validation(_))));

        assert!(save.save_match(Match::new(now(), ana, bob)).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_existing_and_missing_match() {
        let store = MockStore::default();
        let ana = seed_player(&store, "Ana").await;
        let bob = seed_player(&store, "Bob").await;
        let save = use_case(&store);

        let id = save.save_match(Match::new(now(), ana, bob)).await.unwrap();
        let finished = Match::new(now(), ana, bob).with_id(id).won_by(bob);
        assert_eq!(save.save_match(finished.clone()).await, Ok(id));
        assert_eq!(store.matches(), vec![finished]);

        let missing = Match::new(now(), ana, bob).with_id(MatchId(404));
        assert!(matches!(
            save.save_match(missing).await,
            Err(RecordError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_storage_failure_is_wrapped() {
        let store = MockStore::default();
        let ana = seed_player(&store, "Ana").await;
        let bob = seed_player(&store, "Bob").await;
        store.set_failing(true);

        let result = use_case(&store).save_match(Match::new(now(), ana, bob)).await;
        assert!(matches!(result, Err(RecordError::Database(_))));
    }
}
