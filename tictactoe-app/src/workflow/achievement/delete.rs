use std::sync::Arc;

use crate::{
    domain::{AchievementId, achievement::AchievementRepository},
    workflow::{RecordError, RecordResult, storage_failure},
};

#[async_trait::async_trait]
pub trait DeleteAchievementUseCase {
    async fn delete_achievement(&self, id: AchievementId) -> RecordResult<()>;
}

pub struct DeleteAchievementUseCaseImpl<A: AchievementRepository> {
    achievement_repository: Arc<A>,
}

impl<A: AchievementRepository> DeleteAchievementUseCaseImpl<A> {
    pub fn new(achievement_repository: Arc<A>) -> Self {
        Self {
            achievement_repository,
        }
    }
}

#[async_trait::async_trait]
impl<A: AchievementRepository + Send + Sync + 'static> DeleteAchievementUseCase
    for DeleteAchievementUseCaseImpl<A>
{
    async fn delete_achievement(&self, id: AchievementId) -> RecordResult<()> {
        let existing = self
            .achievement_repository
            .get_achievement(id)
            .await
            .map_err(|e| storage_failure("load achievement", e))?;
        if existing.is_none() {
            return Err(RecordError::NotFound(format!("no achievement with id {}", id)));
        }

        self.achievement_repository
            .delete_achievement(id)
            .await
            .map_err(|e| storage_failure("delete achievement", e))?;
        log::info!("Deleted achievement {}", id);
        Ok(())
    }
}
