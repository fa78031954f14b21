use crate::domain::{AchievementId, LiveList, RecordId, RepoError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Achievement {
    pub id: RecordId<AchievementId>,
    pub name: String,
    pub description: String,
}

impl Achievement {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: RecordId::New,
            name: name.into(),
            description: description.into(),
        }
    }

    pub fn with_id(mut self, id: AchievementId) -> Self {
        self.id = RecordId::Existing(id);
        self
    }
}

#[async_trait::async_trait]
pub trait AchievementRepository {
    async fn insert_achievement(&self, achievement: &Achievement)
    -> Result<AchievementId, RepoError>;
    async fn update_achievement(
        &self,
        id: AchievementId,
        achievement: &Achievement,
    ) -> Result<(), RepoError>;
    async fn delete_achievement(&self, id: AchievementId) -> Result<(), RepoError>;
    async fn get_achievement(&self, id: AchievementId) -> Result<Option<Achievement>, RepoError>;
    async fn get_achievement_by_name(&self, name: &str)
    -> Result<Option<Achievement>, RepoError>;
    async fn count_by_name(&self, name: &str) -> Result<u64, RepoError>;
    /// Ordered by name.
    fn watch_achievements(&self) -> LiveList<Achievement>;
    /// Achievements whose name or description contains `query`.
    fn search_achievements(&self, query: &str) -> LiveList<Achievement>;

    async fn exists_name(&self, name: &str) -> Result<bool, RepoError> {
        Ok(self.count_by_name(name).await? > 0)
    }
}
