use futures::stream::BoxStream;

pub mod achievement;
pub mod r#match;
pub mod player;
pub mod rules;

#[cfg(test)]
pub mod mock;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(pub i32);

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MatchId(pub i32);

impl std::fmt::Display for MatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AchievementId(pub i32);

impl std::fmt::Display for AchievementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of a record that may not have been persisted yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum RecordId<I> {
    #[default]
    New,
    Existing(I),
}

impl<I: Copy> RecordId<I> {
    pub fn existing(&self) -> Option<I> {
        match self {
            RecordId::New => None,
            RecordId::Existing(id) => Some(*id),
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, RecordId::New)
    }
}

impl<I> From<I> for RecordId<I> {
    fn from(id: I) -> Self {
        RecordId::Existing(id)
    }
}

/// Continuously updating list: the current snapshot first, then a new one after
/// every write to the underlying table.
pub type LiveList<T> = BoxStream<'static, Result<Vec<T>, RepoError>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoError {
    StorageError(String),
}

impl std::fmt::Display for RepoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepoError::StorageError(e) => write!(f, "Storage error: {}", e),
        }
    }
}

impl std::error::Error for RepoError {}
