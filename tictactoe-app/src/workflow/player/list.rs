use std::sync::Arc;

use crate::domain::{
    LiveList,
    player::{Player, PlayerRepository},
};

pub trait ListPlayersUseCase {
    fn list_players(&self) -> LiveList<Player>;
}

pub struct ListPlayersUseCaseImpl<P: PlayerRepository> {
    player_repository: Arc<P>,
}

impl<P: PlayerRepository> ListPlayersUseCaseImpl<P> {
    pub fn new(player_repository: Arc<P>) -> Self {
        Self { player_repository }
    }
}

impl<P: PlayerRepository> ListPlayersUseCase for ListPlayersUseCaseImpl<P> {
    fn list_players(&self) -> LiveList<Player> {
        self.player_repository.watch_players()
    }
}
