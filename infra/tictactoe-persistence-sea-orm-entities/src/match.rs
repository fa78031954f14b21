use chrono::Utc;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "matches")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = true)]
    pub id: i32,
    pub date: chrono::DateTime<Utc>,
    #[sea_orm(indexed)]
    pub player1_id: i32,
    #[sea_orm(indexed)]
    pub player2_id: i32,
    #[sea_orm(indexed)]
    pub winner_id: Option<i32>,
    pub finished: bool,
}

// Both participants cascade on delete; the winner reference is only cleared.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::player::Entity",
        from = "Column::Player1Id",
        to = "super::player::Column::Id",
        on_delete = "Cascade"
    )]
    Player1,
    #[sea_orm(
        belongs_to = "super::player::Entity",
        from = "Column::Player2Id",
        to = "super::player::Column::Id",
        on_delete = "Cascade"
    )]
    Player2,
    #[sea_orm(
        belongs_to = "super::player::Entity",
        from = "Column::WinnerId",
        to = "super::player::Column::Id",
        on_delete = "SetNull"
    )]
    Winner,
}

impl ActiveModelBehavior for ActiveModel {}
