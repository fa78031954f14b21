use std::sync::Arc;

use async_lock::OnceCell;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, EntityTrait, Schema,
};
use tictactoe_app::domain::RepoError;
use tictactoe_persistence_sea_orm_entities::{achievement, r#match, player};

use crate::{
    achievements::AchievementRepositoryImpl, live::ChangeHub, matches::MatchRepositoryImpl,
    players::PlayerRepositoryImpl,
};

pub mod achievements;
pub mod live;
pub mod matches;
pub mod players;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://tictactoe.db?mode=rwc";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

static STORE: OnceCell<Store> = OnceCell::new();

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub database_url: String,
    pub max_connections: u32,
}

impl StoreConfig {
    /// Reads `TICTACTOE_DATABASE_URL` and `TICTACTOE_DB_MAX_CONNECTIONS`,
    /// falling back to a `tictactoe.db` file in the working directory.
    pub fn from_env() -> Self {
        let database_url = std::env::var("TICTACTOE_DATABASE_URL")
            .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        let max_connections = match std::env::var("TICTACTOE_DB_MAX_CONNECTIONS") {
            Ok(value) => value.parse().unwrap_or_else(|_| {
                log::warn!(
                    "Invalid TICTACTOE_DB_MAX_CONNECTIONS {:?}, using {}",
                    value,
                    DEFAULT_MAX_CONNECTIONS
                );
                DEFAULT_MAX_CONNECTIONS
            }),
            Err(_) => DEFAULT_MAX_CONNECTIONS,
        };
        Self {
            database_url,
            max_connections,
        }
    }

    pub fn in_memory() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
        }
    }

    fn is_in_memory(&self) -> bool {
        self.database_url.contains(":memory:") || self.database_url.contains("mode=memory")
    }
}

pub(crate) fn storage_error(e: DbErr) -> RepoError {
    RepoError::StorageError(e.to_string())
}

/// Handle to the database plus the change notifier that drives live lists.
/// Clones share both.
#[derive(Clone)]
pub struct Store {
    db: DatabaseConnection,
    changes: Arc<ChangeHub>,
}

impl Store {
    pub async fn connect(config: &StoreConfig) -> Result<Self, DbErr> {
        let mut opt = ConnectOptions::new(&config.database_url);
        if config.is_in_memory() {
            // every pooled connection would otherwise open its own empty database
            opt.max_connections(1).min_connections(1);
        } else {
            opt.max_connections(config.max_connections.max(1));
        }
        opt.sqlx_logging(false);

        let db = Database::connect(opt).await?;
        db.execute_unprepared("PRAGMA foreign_keys = ON").await?;
        log::info!("Connected to {}", config.database_url);

        Ok(Self {
            db,
            changes: Arc::new(ChangeHub::new()),
        })
    }

    /// Process-wide store configured from the environment, connected on first
    /// use and kept until exit.
    pub async fn shared() -> Result<Store, DbErr> {
        STORE
            .get_or_try_init(|| async { Store::connect(&StoreConfig::from_env()).await })
            .await
            .cloned()
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Creates the tables and match indices that do not exist yet.
    pub async fn create_schema(&self) -> Result<(), DbErr> {
        self.create_table(player::Entity).await?;
        self.create_table(r#match::Entity).await?;
        self.create_table(achievement::Entity).await?;

        let backend = self.db.get_database_backend();
        let schema = Schema::new(backend);
        for mut index in schema.create_index_from_entity(r#match::Entity) {
            index.if_not_exists();
            self.db.execute(backend.build(&index)).await?;
        }
        Ok(())
    }

    async fn create_table<E: EntityTrait>(&self, entity: E) -> Result<(), DbErr> {
        let backend = self.db.get_database_backend();
        let mut table = Schema::new(backend).create_table_from_entity(entity);
        table.if_not_exists();
        self.db.execute(backend.build(&table)).await?;
        Ok(())
    }

    pub fn players(&self) -> PlayerRepositoryImpl {
        PlayerRepositoryImpl::new(self.db.clone(), self.changes.clone())
    }

    pub fn matches(&self) -> MatchRepositoryImpl {
        MatchRepositoryImpl::new(self.db.clone(), self.changes.clone())
    }

    pub fn achievements(&self) -> AchievementRepositoryImpl {
        AchievementRepositoryImpl::new(self.db.clone(), self.changes.clone())
    }
}

#[cfg(test)]
pub(crate) async fn test_store() -> Store {
    let store = Store::connect(&StoreConfig::in_memory())
        .await
        .expect("connect");
    store.create_schema().await.expect("schema");
    store
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use futures::StreamExt;
    use tictactoe_app::{
        build_application,
        domain::{
            PlayerId,
            r#match::{Match, MatchRepository},
            player::Player,
        },
        workflow::{RecordError, matches::list::MatchFilter},
    };

    use super::*;

    #[test]
    fn test_in_memory_detection() {
        assert!(StoreConfig::in_memory().is_in_memory());
        let file = StoreConfig {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: 5,
        };
        assert!(!file.is_in_memory());
    }

    #[tokio::test]
    async fn test_create_schema_is_idempotent() {
        let store = test_store().await;
        store.create_schema().await.expect("second run");
    }

    #[tokio::test]
    async fn test_records_scenario() {
        let store = test_store().await;
        let app = build_application(
            Arc::new(store.players()),
            Arc::new(store.matches()),
            Arc::new(store.achievements()),
        );

        let ana = app
            .player_save_use_case
            .save_player(Player::new("Ana", 0))
            .await
            .unwrap();
        assert_eq!(ana, PlayerId(1));

        assert!(matches!(
            app.player_save_use_case
                .save_player(Player::new("Ana", 0))
                .await,
            Err(RecordError::AlreadyExists(_))
        ));

        let bob = app
            .player_save_use_case
            .save_player(Player::new("Bob", 0))
            .await
            .unwrap();
        assert_eq!(bob, PlayerId(2));

        let played = Match::new(Utc::now() - Duration::days(1), ana, bob).won_by(ana);
        let match_id = app
            .match_save_use_case
            .save_match(played)
            .await
            .unwrap();

        assert!(matches!(
            app.match_save_use_case
                .save_match(Match::new(Utc::now() - Duration::days(1), ana, ana))
                .await,
            Err(RecordError::Validation(_))
        ));

        let mut all = app.match_list_use_case.list_matches(MatchFilter::All);
        assert_eq!(all.next().await.unwrap().unwrap().len(), 1);

        app.player_delete_use_case.delete_player(ana).await.unwrap();

        assert_eq!(store.matches().get_match(match_id).await.unwrap(), None);
        assert!(all.next().await.unwrap().unwrap().is_empty());

        assert!(matches!(
            app.player_delete_use_case.delete_player(ana).await,
            Err(RecordError::NotFound(_))
        ));
    }
}
