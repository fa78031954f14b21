pub mod delete;
pub mod list;
pub mod save;
pub mod validate;
