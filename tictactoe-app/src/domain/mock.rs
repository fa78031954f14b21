use std::{
    collections::BTreeMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

use futures::StreamExt;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::domain::{
    AchievementId, LiveList, MatchId, PlayerId, RepoError,
    achievement::{Achievement, AchievementRepository},
    r#match::{Match, MatchRepository},
    player::{Player, PlayerRepository},
};

#[derive(Default)]
struct MockTables {
    players: BTreeMap<PlayerId, Player>,
    matches: BTreeMap<MatchId, Match>,
    achievements: BTreeMap<AchievementId, Achievement>,
    next_id: i32,
}

/// In-memory stand-in for all three repositories, with the same cascade rules as the
/// real store.
#[derive(Clone)]
pub struct MockStore {
    tables: Arc<Mutex<MockTables>>,
    changes: Arc<watch::Sender<u64>>,
    fail_storage: Arc<AtomicBool>,
    writes: Arc<AtomicUsize>,
}

impl Default for MockStore {
    fn default() -> Self {
        let (changes, _rx) = watch::channel(0);
        Self {
            tables: Arc::new(Mutex::new(MockTables::default())),
            changes: Arc::new(changes),
            fail_storage: Arc::new(AtomicBool::new(false)),
            writes: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl MockStore {
    pub fn set_failing(&self, failing: bool) {
        self.fail_storage.store(failing, Ordering::SeqCst);
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn players(&self) -> Vec<Player> {
        self.tables.lock().unwrap().players.values().cloned().collect()
    }

    pub fn matches(&self) -> Vec<Match> {
        self.tables.lock().unwrap().matches.values().cloned().collect()
    }

    pub fn achievements(&self) -> Vec<Achievement> {
        self.tables
            .lock()
            .unwrap()
            .achievements
            .values()
            .cloned()
            .collect()
    }

    fn check(&self) -> Result<(), RepoError> {
        if self.fail_storage.load(Ordering::SeqCst) {
            Err(RepoError::StorageError("disk I/O error".to_string()))
        } else {
            Ok(())
        }
    }

    fn write<T>(&self, f: impl FnOnce(&mut MockTables) -> T) -> Result<T, RepoError> {
        self.check()?;
        let result = f(&mut self.tables.lock().unwrap());
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.changes.send_modify(|v| *v += 1);
        Ok(result)
    }

    fn live<T: Send + 'static>(
        &self,
        query: impl Fn(&MockTables) -> Vec<T> + Send + Sync + 'static,
    ) -> LiveList<T> {
        let tables = self.tables.clone();
        WatchStream::new(self.changes.subscribe())
            .map(move |_| Ok(query(&tables.lock().unwrap())))
            .boxed()
    }
}

#[async_trait::async_trait]
impl PlayerRepository for MockStore {
    async fn insert_player(&self, player: &Player) -> Result<PlayerId, RepoError> {
        self.write(|t| {
            t.next_id += 1;
            let id = PlayerId(t.next_id);
            t.players.insert(id, player.clone().with_id(id));
            id
        })
    }

    async fn update_player(&self, id: PlayerId, player: &Player) -> Result<(), RepoError> {
        self.write(|t| {
            t.players.insert(id, player.clone().with_id(id));
        })
    }

    async fn delete_player(&self, id: PlayerId) -> Result<(), RepoError> {
        self.write(|t| {
            t.players.remove(&id);
            t.matches.retain(|_, m| !m.involves(id));
        })
    }

    async fn get_player(&self, id: PlayerId) -> Result<Option<Player>, RepoError> {
        self.check()?;
        Ok(self.tables.lock().unwrap().players.get(&id).cloned())
    }

    async fn get_player_by_name(&self, name: &str) -> Result<Option<Player>, RepoError> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables.players.values().find(|p| p.name == name).cloned())
    }

    async fn count_by_name(&self, name: &str) -> Result<u64, RepoError> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables.players.values().filter(|p| p.name == name).count() as u64)
    }

    fn watch_players(&self) -> LiveList<Player> {
        self.live(|t| t.players.values().cloned().collect())
    }
}

#[async_trait::async_trait]
impl MatchRepository for MockStore {
    async fn insert_match(&self, r#match: &Match) -> Result<MatchId, RepoError> {
        self.write(|t| {
            t.next_id += 1;
            let id = MatchId(t.next_id);
            t.matches.insert(id, r#match.clone().with_id(id));
            id
        })
    }

    async fn update_match(&self, id: MatchId, r#match: &Match) -> Result<(), RepoError> {
        self.write(|t| {
            t.matches.insert(id, r#match.clone().with_id(id));
        })
    }

    async fn delete_match(&self, id: MatchId) -> Result<(), RepoError> {
        self.write(|t| {
            t.matches.remove(&id);
        })
    }

    async fn get_match(&self, id: MatchId) -> Result<Option<Match>, RepoError> {
        self.check()?;
        Ok(self.tables.lock().unwrap().matches.get(&id).cloned())
    }

    fn watch_matches(&self) -> LiveList<Match> {
        self.live(|t| {
            let mut matches: Vec<Match> = t.matches.values().cloned().collect();
            matches.sort_by(|a, b| b.date.cmp(&a.date));
            matches
        })
    }

    fn watch_matches_of_player(&self, player: PlayerId) -> LiveList<Match> {
        self.live(move |t| {
            t.matches
                .values()
                .filter(|m| m.involves(player))
                .cloned()
                .collect()
        })
    }

    async fn count_matches_of_player(&self, player: PlayerId) -> Result<u64, RepoError> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables.matches.values().filter(|m| m.involves(player)).count() as u64)
    }

    fn watch_matches_by_status(&self, finished: bool) -> LiveList<Match> {
        self.live(move |t| {
            t.matches
                .values()
                .filter(|m| m.finished == finished)
                .cloned()
                .collect()
        })
    }

    async fn count_wins(&self, player: PlayerId) -> Result<u64, RepoError> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .matches
            .values()
            .filter(|m| m.finished && m.winner == Some(player))
            .count() as u64)
    }

    fn watch_draws(&self) -> LiveList<Match> {
        self.live(|t| {
            t.matches
                .values()
                .filter(|m| m.finished && m.winner.is_none())
                .cloned()
                .collect()
        })
    }

    fn watch_undecided(&self) -> LiveList<Match> {
        self.live(|t| {
            t.matches
                .values()
                .filter(|m| !m.finished && m.winner.is_none())
                .cloned()
                .collect()
        })
    }
}

#[async_trait::async_trait]
impl AchievementRepository for MockStore {
    async fn insert_achievement(
        &self,
        achievement: &Achievement,
    ) -> Result<AchievementId, RepoError> {
        self.write(|t| {
            t.next_id += 1;
            let id = AchievementId(t.next_id);
            t.achievements.insert(id, achievement.clone().with_id(id));
            id
        })
    }

    async fn update_achievement(
        &self,
        id: AchievementId,
        achievement: &Achievement,
    ) -> Result<(), RepoError> {
        self.write(|t| {
            t.achievements.insert(id, achievement.clone().with_id(id));
        })
    }

    async fn delete_achievement(&self, id: AchievementId) -> Result<(), RepoError> {
        self.write(|t| {
            t.achievements.remove(&id);
        })
    }

    async fn get_achievement(&self, id: AchievementId) -> Result<Option<Achievement>, RepoError> {
        self.check()?;
        Ok(self.tables.lock().unwrap().achievements.get(&id).cloned())
    }

    async fn get_achievement_by_name(
        &self,
        name: &str,
    ) -> Result<Option<Achievement>, RepoError> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables.achievements.values().find(|a| a.name == name).cloned())
    }

    async fn count_by_name(&self, name: &str) -> Result<u64, RepoError> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .achievements
            .values()
            .filter(|a| a.name == name)
            .count() as u64)
    }

    fn watch_achievements(&self) -> LiveList<Achievement> {
        self.live(|t| {
            let mut achievements: Vec<Achievement> = t.achievements.values().cloned().collect();
            achievements.sort_by(|a, b| a.name.cmp(&b.name));
            achievements
        })
    }

    fn search_achievements(&self, query: &str) -> LiveList<Achievement> {
        // LIKE semantics: case-insensitive
        let query = query.to_lowercase();
        self.live(move |t| {
            t.achievements
                .values()
                .filter(|a| {
                    a.name.to_lowercase().contains(&query)
                        || a.description.to_lowercase().contains(&query)
                })
                .cloned()
                .collect()
        })
    }
}

/// Seeds a player directly, bypassing the workflows.
pub async fn seed_player(store: &MockStore, name: &str) -> PlayerId {
    PlayerRepository::insert_player(store, &Player::new(name, 0))
        .await
        .expect("seed player")
}
