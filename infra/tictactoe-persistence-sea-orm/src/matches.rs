use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, NotSet,
    PaginatorTrait, QueryFilter, QueryOrder, Select, Set,
};
use tictactoe_app::domain::{
    LiveList, MatchId, PlayerId, RecordId, RepoError,
    r#match::{Match, MatchRepository},
};
use tictactoe_persistence_sea_orm_entities::r#match;

use crate::{live::ChangeHub, storage_error};

pub struct MatchRepositoryImpl {
    db: DatabaseConnection,
    changes: Arc<ChangeHub>,
}

impl MatchRepositoryImpl {
    pub fn new(db: DatabaseConnection, changes: Arc<ChangeHub>) -> Self {
        Self { db, changes }
    }

    fn model_to_match(model: r#match::Model) -> Match {
        Match {
            id: RecordId::Existing(MatchId(model.id)),
            date: model.date,
            player1: PlayerId(model.player1_id),
            player2: PlayerId(model.player2_id),
            winner: model.winner_id.map(PlayerId),
            finished: model.finished,
        }
    }

    fn involving(player: PlayerId) -> Condition {
        Condition::any()
            .add(r#match::Column::Player1Id.eq(player.0))
            .add(r#match::Column::Player2Id.eq(player.0))
    }

    /// Live list of the matches selected by `filter`, newest first.
    fn live<F>(&self, filter: F) -> LiveList<Match>
    where
        F: Fn(Select<r#match::Entity>) -> Select<r#match::Entity> + Send + Sync + 'static,
    {
        self.changes.matches.live(self.db.clone(), move |db| {
            let query = filter(r#match::Entity::find()).order_by_desc(r#match::Column::Date);
            async move {
                let models = query.all(&db).await?;
                Ok::<_, DbErr>(models.into_iter().map(Self::model_to_match).collect())
            }
        })
    }
}

#[async_trait::async_trait]
impl MatchRepository for MatchRepositoryImpl {
    async fn insert_match(&self, r#match: &Match) -> Result<MatchId, RepoError> {
        let new_match = r#match::ActiveModel {
            id: NotSet,
            date: Set(r#match.date),
            player1_id: Set(r#match.player1.0),
            player2_id: Set(r#match.player2.0),
            winner_id: Set(r#match.winner.map(|w| w.0)),
            finished: Set(r#match.finished),
        };
        let model = new_match.insert(&self.db).await.map_err(storage_error)?;
        self.changes.matches.touch();
        Ok(MatchId(model.id))
    }

    async fn update_match(&self, id: MatchId, r#match: &Match) -> Result<(), RepoError> {
        let updated = r#match::ActiveModel {
            id: Set(id.0),
            date: Set(r#match.date),
            player1_id: Set(r#match.player1.0),
            player2_id: Set(r#match.player2.0),
            winner_id: Set(r#match.winner.map(|w| w.0)),
            finished: Set(r#match.finished),
        };
        updated.update(&self.db).await.map_err(storage_error)?;
        self.changes.matches.touch();
        Ok(())
    }

    async fn delete_match(&self, id: MatchId) -> Result<(), RepoError> {
        r#match::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(storage_error)?;
        self.changes.matches.touch();
        Ok(())
    }

    async fn get_match(&self, id: MatchId) -> Result<Option<Match>, RepoError> {
        let model = r#match::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(storage_error)?;
        Ok(model.map(Self::model_to_match))
    }

    fn watch_matches(&self) -> LiveList<Match> {
        self.live(|query| query)
    }

    fn watch_matches_of_player(&self, player: PlayerId) -> LiveList<Match> {
        self.live(move |query| query.filter(Self::involving(player)))
    }

    async fn count_matches_of_player(&self, player: PlayerId) -> Result<u64, RepoError> {
        r#match::Entity::find()
            .filter(Self::involving(player))
            .count(&self.db)
            .await
            .map_err(storage_error)
    }

    fn watch_matches_by_status(&self, finished: bool) -> LiveList<Match> {
        self.live(move |query| query.filter(r#match::Column::Finished.eq(finished)))
    }

    async fn count_wins(&self, player: PlayerId) -> Result<u64, RepoError> {
        r#match::Entity::find()
            .filter(r#match::Column::Finished.eq(true))
            .filter(r#match::Column::WinnerId.eq(player.0))
            .count(&self.db)
            .await
            .map_err(storage_error)
    }

    fn watch_draws(&self) -> LiveList<Match> {
        self.live(|query| {
            query
                .filter(r#match::Column::Finished.eq(true))
                .filter(r#match::Column::WinnerId.is_null())
        })
    }

    fn watch_undecided(&self) -> LiveList<Match> {
        self.live(|query| {
            query
                .filter(r#match::Column::Finished.eq(false))
                .filter(r#match::Column::WinnerId.is_null())
        })
    }
}
