use std::sync::Arc;

use crate::domain::{AchievementId, RecordId, achievement::AchievementRepository, rules};

/// Inline checks for the achievement form.
#[async_trait::async_trait]
pub trait ValidateAchievementUseCase {
    async fn validate_name(&self, name: &str, current: RecordId<AchievementId>) -> Option<String>;
    fn validate_description(&self, description: &str) -> Option<String>;
}

pub struct ValidateAchievementUseCaseImpl<A: AchievementRepository> {
    achievement_repository: Arc<A>,
}

impl<A: AchievementRepository> ValidateAchievementUseCaseImpl<A> {
    pub fn new(achievement_repository: Arc<A>) -> Self {
        Self {
            achievement_repository,
        }
    }
}

#[async_trait::async_trait]
impl<A: AchievementRepository + Send + Sync + 'static> ValidateAchievementUseCase
    for ValidateAchievementUseCaseImpl<A>
{
    async fn validate_name(&self, name: &str, current: RecordId<AchievementId>) -> Option<String> {
        if let Some(problem) = rules::achievement_name_problem(name) {
            return Some(problem);
        }
        let name = name.trim();

        let taken = async {
            if let RecordId::Existing(id) = current {
                let stored = self.achievement_repository.get_achievement(id).await?;
                if stored.is_some_and(|a| a.name.trim() == name) {
                    return Ok(false);
                }
            }
            self.achievement_repository.exists_name(name).await
        };
        match taken.await {
            Ok(true) => Some("An achievement with that name already exists".to_string()),
            Ok(false) => None,
            Err(e) => {
                log::error!("Failed to check achievement name {:?}: {}", name, e);
                None
            }
        }
    }

    fn validate_description(&self, description: &str) -> Option<String> {
        rules::achievement_description_problem(description)
    }
}
