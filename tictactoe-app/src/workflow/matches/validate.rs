use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{
    domain::{PlayerId, player::PlayerRepository, rules},
    ports::clock::Clock,
};

/// Which side of the match a player slot refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerSlot {
    First,
    Second,
}

impl PlayerSlot {
    fn label(&self) -> &'static str {
        match self {
            PlayerSlot::First => "Player 1",
            PlayerSlot::Second => "Player 2",
        }
    }
}

/// Inline checks for the match form.
#[async_trait::async_trait]
pub trait ValidateMatchUseCase {
    async fn validate_player(&self, slot: PlayerSlot, player: Option<PlayerId>) -> Option<String>;
    fn validate_distinct_players(
        &self,
        player1: Option<PlayerId>,
        player2: Option<PlayerId>,
    ) -> Option<String>;
    fn validate_winner(
        &self,
        winner: Option<PlayerId>,
        player1: Option<PlayerId>,
        player2: Option<PlayerId>,
    ) -> Option<String>;
    fn validate_date(&self, date: DateTime<Utc>) -> Option<String>;
}

pub struct ValidateMatchUseCaseImpl<P: PlayerRepository, C: Clock> {
    player_repository: Arc<P>,
    clock: Arc<C>,
}

impl<P: PlayerRepository, C: Clock> ValidateMatchUseCaseImpl<P, C> {
    pub fn new(player_repository: Arc<P>, clock: Arc<C>) -> Self {
        Self {
            player_repository,
            clock,
        }
    }
}

#[async_trait::async_trait]
impl<P, C> ValidateMatchUseCase for ValidateMatchUseCaseImpl<P, C>
where
    P: PlayerRepository + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    async fn validate_player(&self, slot: PlayerSlot, player: Option<PlayerId>) -> Option<String> {
        let Some(player) = player else {
            return Some(format!("{} must be selected", slot.label()));
        };
        match self.player_repository.get_player(player).await {
            Ok(Some(_)) => None,
            Ok(None) => Some(format!("The selected {} does not exist", slot.label())),
            Err(e) => {
                log::error!("Failed to look up player {}: {}", player, e);
                None
            }
        }
    }

    fn validate_distinct_players(
        &self,
        player1: Option<PlayerId>,
        player2: Option<PlayerId>,
    ) -> Option<String> {
        match (player1, player2) {
            (Some(p1), Some(p2)) => rules::same_players_problem(p1, p2),
            _ => None,
        }
    }

    fn validate_winner(
        &self,
        winner: Option<PlayerId>,
        player1: Option<PlayerId>,
        player2: Option<PlayerId>,
    ) -> Option<String> {
        let winner = winner?;
        if Some(winner) == player1 || Some(winner) == player2 {
            None
        } else {
            Some("The winner must be one of the match players".to_string())
        }
    }

    fn validate_date(&self, date: DateTime<Utc>) -> Option<String> {
        rules::date_problem(date, self.clock.now())
    }
}
