//! Live lists over the store.
//!
//! Every table has a change counter that the repositories bump after each
//! successful write. A live list subscribes to the counter and re-runs its
//! query for the current value and again after every change. Intermediate
//! changes are coalesced, so a slow subscriber only sees the latest state.

use std::future::Future;

use futures::StreamExt;
use sea_orm::{DatabaseConnection, DbErr};
use tictactoe_app::domain::LiveList;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::storage_error;

pub struct TableWatch {
    version: watch::Sender<u64>,
}

impl TableWatch {
    fn new() -> Self {
        let (version, _rx) = watch::channel(0);
        Self { version }
    }

    pub fn touch(&self) {
        self.version.send_modify(|v| *v = v.wrapping_add(1));
    }

    pub fn live<T, F, Fut>(&self, db: DatabaseConnection, query: F) -> LiveList<T>
    where
        T: Send + 'static,
        F: Fn(DatabaseConnection) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<T>, DbErr>> + Send + 'static,
    {
        WatchStream::new(self.version.subscribe())
            .then(move |_| {
                let rows = query(db.clone());
                async move { rows.await.map_err(storage_error) }
            })
            .boxed()
    }
}

pub struct ChangeHub {
    pub players: TableWatch,
    pub matches: TableWatch,
    pub achievements: TableWatch,
}

impl ChangeHub {
    pub fn new() -> Self {
        Self {
            players: TableWatch::new(),
            matches: TableWatch::new(),
            achievements: TableWatch::new(),
        }
    }
}

impl Default for ChangeHub {
    fn default() -> Self {
        Self::new()
    }
}
