use std::sync::Arc;

use crate::domain::{
    LiveList,
    achievement::{Achievement, AchievementRepository},
};

pub trait ListAchievementsUseCase {
    fn list_achievements(&self) -> LiveList<Achievement>;
    /// Live substring search over name and description. A blank query lists everything.
    fn search_achievements(&self, query: &str) -> LiveList<Achievement>;
}

pub struct ListAchievementsUseCaseImpl<A: AchievementRepository> {
    achievement_repository: Arc<A>,
}

impl<A: AchievementRepository> ListAchievementsUseCaseImpl<A> {
    pub fn new(achievement_repository: Arc<A>) -> Self {
        Self {
            achievement_repository,
        }
    }
}

impl<A: AchievementRepository> ListAchievementsUseCase for ListAchievementsUseCaseImpl<A> {
    fn list_achievements(&self) -> LiveList<Achievement> {
        self.achievement_repository.watch_achievements()
    }

    fn search_achievements(&self, query: &str) -> LiveList<Achievement> {
        let query = query.trim();
        if query.is_empty() {
            self.achievement_repository.watch_achievements()
        } else {
            self.achievement_repository.search_achievements(query)
        }
    }
}
