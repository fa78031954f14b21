pub mod achievement;
pub mod r#match;
pub mod player;
