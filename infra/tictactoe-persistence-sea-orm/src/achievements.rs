use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, NotSet,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use tictactoe_app::domain::{
    AchievementId, LiveList, RecordId, RepoError,
    achievement::{Achievement, AchievementRepository},
};
use tictactoe_persistence_sea_orm_entities::achievement;

use crate::{live::ChangeHub, storage_error};

pub struct AchievementRepositoryImpl {
    db: DatabaseConnection,
    changes: Arc<ChangeHub>,
}

impl AchievementRepositoryImpl {
    pub fn new(db: DatabaseConnection, changes: Arc<ChangeHub>) -> Self {
        Self { db, changes }
    }

    fn model_to_achievement(model: achievement::Model) -> Achievement {
        Achievement {
            id: RecordId::Existing(AchievementId(model.id)),
            name: model.name,
            description: model.description,
        }
    }
}

#[async_trait::async_trait]
impl AchievementRepository for AchievementRepositoryImpl {
    async fn insert_achievement(
        &self,
        achievement: &Achievement,
    ) -> Result<AchievementId, RepoError> {
        let new_achievement = achievement::ActiveModel {
            id: NotSet,
            name: Set(achievement.name.clone()),
            description: Set(achievement.description.clone()),
        };
        let model = new_achievement
            .insert(&self.db)
            .await
            .map_err(storage_error)?;
        self.changes.achievements.touch();
        Ok(AchievementId(model.id))
    }

    async fn update_achievement(
        &self,
        id: AchievementId,
        achievement: &Achievement,
    ) -> Result<(), RepoError> {
        let updated = achievement::ActiveModel {
            id: Set(id.0),
            name: Set(achievement.name.clone()),
            description: Set(achievement.description.clone()),
        };
        updated.update(&self.db).await.map_err(storage_error)?;
        self.changes.achievements.touch();
        Ok(())
    }

    async fn delete_achievement(&self, id: AchievementId) -> Result<(), RepoError> {
        achievement::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(storage_error)?;
        self.changes.achievements.touch();
        Ok(())
    }

    async fn get_achievement(&self, id: AchievementId) -> Result<Option<Achievement>, RepoError> {
        let model = achievement::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(storage_error)?;
        Ok(model.map(Self::model_to_achievement))
    }

    async fn get_achievement_by_name(
        &self,
        name: &str,
    ) -> Result<Option<Achievement>, RepoError> {
        let model = achievement::Entity::find()
            .filter(achievement::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(storage_error)?;
        Ok(model.map(Self::model_to_achievement))
    }

    async fn count_by_name(&self, name: &str) -> Result<u64, RepoError> {
        achievement::Entity::find()
            .filter(achievement::Column::Name.eq(name))
            .count(&self.db)
            .await
            .map_err(storage_error)
    }

    fn watch_achievements(&self) -> LiveList<Achievement> {
        self.changes.achievements.live(self.db.clone(), |db| async move {
            let models = achievement::Entity::find()
                .order_by_asc(achievement::Column::Name)
                .all(&db)
                .await?;
            Ok::<_, DbErr>(models.into_iter().map(Self::model_to_achievement).collect())
        })
    }

    fn search_achievements(&self, query: &str) -> LiveList<Achievement> {
        let query = query.to_string();
        self.changes.achievements.live(self.db.clone(), move |db| {
            let select = achievement::Entity::find()
                .filter(
                    Condition::any()
                        .add(achievement::Column::Name.contains(&query))
                        .add(achievement::Column::Description.contains(&query)),
                )
                .order_by_asc(achievement::Column::Name);
            async move {
                let models = select.all(&db).await?;
                Ok::<_, DbErr>(models.into_iter().map(Self::model_to_achievement).collect())
            }
        })
    }
}
