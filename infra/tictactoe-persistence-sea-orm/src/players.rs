use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use tictactoe_app::domain::{
    LiveList, PlayerId, RecordId, RepoError,
    player::{Player, PlayerRepository},
};
use tictactoe_persistence_sea_orm_entities::player;

use crate::{live::ChangeHub, storage_error};

pub struct PlayerRepositoryImpl {
    db: DatabaseConnection,
    changes: Arc<ChangeHub>,
}

impl PlayerRepositoryImpl {
    pub fn new(db: DatabaseConnection, changes: Arc<ChangeHub>) -> Self {
        Self { db, changes }
    }

    fn model_to_player(model: player::Model) -> Player {
        Player {
            id: RecordId::Existing(PlayerId(model.id)),
            name: model.name,
            match_count: model.match_count,
        }
    }
}

#[async_trait::async_trait]
impl PlayerRepository for PlayerRepositoryImpl {
    async fn insert_player(&self, player: &Player) -> Result<PlayerId, RepoError> {
        let new_player = player::ActiveModel {
            id: NotSet,
            name: Set(player.name.clone()),
            match_count: Set(player.match_count),
        };
        let model = new_player.insert(&self.db).await.map_err(storage_error)?;
        self.changes.players.touch();
        Ok(PlayerId(model.id))
    }

    async fn update_player(&self, id: PlayerId, player: &Player) -> Result<(), RepoError> {
        let updated = player::ActiveModel {
            id: Set(id.0),
            name: Set(player.name.clone()),
            match_count: Set(player.match_count),
        };
        updated.update(&self.db).await.map_err(storage_error)?;
        self.changes.players.touch();
        Ok(())
    }

    async fn delete_player(&self, id: PlayerId) -> Result<(), RepoError> {
        player::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(storage_error)?;
        self.changes.players.touch();
        // the foreign keys removed this player's matches as well
        self.changes.matches.touch();
        Ok(())
    }

    async fn get_player(&self, id: PlayerId) -> Result<Option<Player>, RepoError> {
        let model = player::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(storage_error)?;
        Ok(model.map(Self::model_to_player))
    }

    async fn get_player_by_name(&self, name: &str) -> Result<Option<Player>, RepoError> {
        let model = player::Entity::find()
            .filter(player::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(storage_error)?;
        Ok(model.map(Self::model_to_player))
    }

    async fn count_by_name(&self, name: &str) -> Result<u64, RepoError> {
        player::Entity::find()
            .filter(player::Column::Name.eq(name))
            .count(&self.db)
            .await
            .map_err(storage_error)
    }

    fn watch_players(&self) -> LiveList<Player> {
        self.changes.players.live(self.db.clone(), |db| async move {
            let models = player::Entity::find()
                .order_by_asc(player::Column::Id)
                .all(&db)
                .await?;
            Ok::<_, DbErr>(models.into_iter().map(Self::model_to_player).collect())
        })
    }
}
