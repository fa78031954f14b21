use std::sync::Arc;

use crate::{
    domain::{
        AchievementId, RecordId,
        achievement::{Achievement, AchievementRepository},
        rules,
    },
    workflow::{RecordError, RecordResult, storage_failure},
};

#[async_trait::async_trait]
pub trait SaveAchievementUseCase {
    async fn save_achievement(&self, achievement: Achievement) -> RecordResult<AchievementId>;
}

pub struct SaveAchievementUseCaseImpl<A: AchievementRepository> {
    achievement_repository: Arc<A>,
}

impl<A: AchievementRepository> SaveAchievementUseCaseImpl<A> {
    pub fn new(achievement_repository: Arc<A>) -> Self {
        Self {
            achievement_repository,
        }
    }
}

impl<A: AchievementRepository + Send + Sync + 'static> SaveAchievementUseCaseImpl<A> {
    async fn ensure_name_free(&self, name: &str) -> RecordResult<()> {
        let exists = self
            .achievement_repository
            .exists_name(name)
            .await
            .map_err(|e| storage_failure("check achievement name", e))?;
        if exists {
            Err(RecordError::AlreadyExists(format!(
                "an achievement named '{}' already exists",
                name
            )))
        } else {
            Ok(())
        }
    }
}

#[async_trait::async_trait]
impl<A: AchievementRepository + Send + Sync + 'static> SaveAchievementUseCase
    for SaveAchievementUseCaseImpl<A>
{
    async fn save_achievement(&self, achievement: Achievement) -> RecordResult<AchievementId> {
        let problem = rules::achievement_name_problem(&achievement.name)
            .or_else(|| rules::achievement_description_problem(&achievement.description));
        if let Some(problem) = problem {
            log::warn!("Rejected achievement {:?}: {}", achievement.name, problem);
            return Err(RecordError::Validation(problem));
        }

        let trimmed = Achievement {
            id: achievement.id,
            name: achievement.name.trim().to_string(),
            description: achievement.description.trim().to_string(),
        };

        match trimmed.id {
            RecordId::New => {
                self.ensure_name_free(&trimmed.name).await?;
                let id = self
                    .achievement_repository
                    .insert_achievement(&trimmed)
                    .await
                    .map_err(|e| storage_failure("insert achievement", e))?;
                log::info!("Created achievement {} ({})", id, trimmed.name);
                Ok(id)
            }
            RecordId::Existing(id) => {
                let current = self
                    .achievement_repository
                    .get_achievement(id)
                    .await
                    .map_err(|e| storage_failure("load achievement", e))?
                    .ok_or_else(|| {
                        RecordError::Validation(format!(
                            "achievement {} to update was not found",
                            id
                        ))
                    })?;
                if current.name.trim() != trimmed.name {
                    self.ensure_name_free(&trimmed.name).await?;
                }
                self.achievement_repository
                    .update_achievement(id, &trimmed)
                    .await
                    .map_err(|e| storage_failure("update achievement", e))?;
                log::info!("Updated achievement {} ({})", id, trimmed.name);
                Ok(id)
            }
        }
    }
}
