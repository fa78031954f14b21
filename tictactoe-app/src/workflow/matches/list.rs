use std::sync::Arc;

use crate::domain::{
    LiveList, PlayerId,
    r#match::{Match, MatchRepository},
};

/// Which matches a live list should contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchFilter {
    All,
    OfPlayer(PlayerId),
    Finished(bool),
    /// Finished without a winner.
    Draws,
    /// Not finished and no winner set yet.
    Undecided,
}

pub trait ListMatchesUseCase {
    fn list_matches(&self, filter: MatchFilter) -> LiveList<Match>;
}

pub struct ListMatchesUseCaseImpl<M: MatchRepository> {
    match_repository: Arc<M>,
}

impl<M: MatchRepository> ListMatchesUseCaseImpl<M> {
    pub fn new(match_repository: Arc<M>) -> Self {
        Self { match_repository }
    }
}

impl<M: MatchRepository> ListMatchesUseCase for ListMatchesUseCaseImpl<M> {
    fn list_matches(&self, filter: MatchFilter) -> LiveList<Match> {
        match filter {
            MatchFilter::All => self.match_repository.watch_matches(),
            MatchFilter::OfPlayer(player) => self.match_repository.watch_matches_of_player(player),
            MatchFilter::Finished(finished) => {
                self.match_repository.watch_matches_by_status(finished)
            }
            MatchFilter::Draws => self.match_repository.watch_draws(),
            MatchFilter::Undecided => self.match_repository.watch_undecided(),
        }
    }
}
