use crate::domain::PlayerId;

pub mod delete;
pub mod list;
pub mod record;
pub mod save;
pub mod validate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRecordView {
    pub player_id: PlayerId,
    pub name: String,
    pub matches_played: u64,
    pub wins: u64,
}
