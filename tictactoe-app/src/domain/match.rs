use chrono::{DateTime, Utc};

use crate::domain::{LiveList, MatchId, PlayerId, RecordId, RepoError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub id: RecordId<MatchId>,
    pub date: DateTime<Utc>,
    pub player1: PlayerId,
    pub player2: PlayerId,
    /// `None` means the match has no winner yet, or ended in a draw.
    pub winner: Option<PlayerId>,
    pub finished: bool,
}

impl Match {
    pub fn new(date: DateTime<Utc>, player1: PlayerId, player2: PlayerId) -> Self {
        Self {
            id: RecordId::New,
            date,
            player1,
            player2,
            winner: None,
            finished: false,
        }
    }

    pub fn with_id(mut self, id: MatchId) -> Self {
        self.id = RecordId::Existing(id);
        self
    }

    pub fn won_by(mut self, winner: PlayerId) -> Self {
        self.winner = Some(winner);
        self.finished = true;
        self
    }

    pub fn involves(&self, player: PlayerId) -> bool {
        self.player1 == player || self.player2 == player
    }
}

#[async_trait::async_trait]
pub trait MatchRepository {
    async fn insert_match(&self, r#match: &Match) -> Result<MatchId, RepoError>;
    async fn update_match(&self, id: MatchId, r#match: &Match) -> Result<(), RepoError>;
    async fn delete_match(&self, id: MatchId) -> Result<(), RepoError>;
    async fn get_match(&self, id: MatchId) -> Result<Option<Match>, RepoError>;
    /// Newest first.
    fn watch_matches(&self) -> LiveList<Match>;
    fn watch_matches_of_player(&self, player: PlayerId) -> LiveList<Match>;
    async fn count_matches_of_player(&self, player: PlayerId) -> Result<u64, RepoError>;
    fn watch_matches_by_status(&self, finished: bool) -> LiveList<Match>;
    /// Finished matches won by `player`.
    async fn count_wins(&self, player: PlayerId) -> Result<u64, RepoError>;
    /// Finished matches without a winner.
    fn watch_draws(&self) -> LiveList<Match>;
    /// Unfinished matches without a winner.
    fn watch_undecided(&self) -> LiveList<Match>;
}
