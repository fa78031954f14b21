use crate::domain::{LiveList, PlayerId, RecordId, RepoError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: RecordId<PlayerId>,
    pub name: String,
    pub match_count: i32,
}

impl Player {
    pub fn new(name: impl Into<String>, match_count: i32) -> Self {
        Self {
            id: RecordId::New,
            name: name.into(),
            match_count,
        }
    }

    pub fn with_id(mut self, id: PlayerId) -> Self {
        self.id = RecordId::Existing(id);
        self
    }
}

#[async_trait::async_trait]
pub trait PlayerRepository {
    /// Inserts a new row and returns the generated id. The id of `player` is ignored.
    async fn insert_player(&self, player: &Player) -> Result<PlayerId, RepoError>;
    async fn update_player(&self, id: PlayerId, player: &Player) -> Result<(), RepoError>;
    async fn delete_player(&self, id: PlayerId) -> Result<(), RepoError>;
    async fn get_player(&self, id: PlayerId) -> Result<Option<Player>, RepoError>;
    async fn get_player_by_name(&self, name: &str) -> Result<Option<Player>, RepoError>;
    async fn count_by_name(&self, name: &str) -> Result<u64, RepoError>;
    fn watch_players(&self) -> LiveList<Player>;

    async fn exists_name(&self, name: &str) -> Result<bool, RepoError> {
        Ok(self.count_by_name(name).await? > 0)
    }
}
