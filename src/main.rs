use std::sync::Arc;

use futures::StreamExt;
use log::info;
use tictactoe_app::{build_application, domain::LiveList, workflow::matches::list::MatchFilter};
use tictactoe_persistence_sea_orm::Store;

mod logs;

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

fn report<T: Send + 'static>(
    label: &'static str,
    mut list: LiveList<T>,
    describe: impl Fn(&[T]) -> String + Send + 'static,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(snapshot) = list.next().await {
            match snapshot {
                Ok(items) => info!("{} ({}): {}", label, items.len(), describe(items.as_slice())),
                Err(e) => log::error!("Failed to load {}: {}", label, e),
            }
        }
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    logs::init_logger()?;

    let store = Store::shared().await?;
    store.create_schema().await?;

    let app = build_application(
        Arc::new(store.players()),
        Arc::new(store.matches()),
        Arc::new(store.achievements()),
    );

    info!("Starting application");

    let tasks = [
        report("players", app.player_list_use_case.list_players(), |players| {
            players
                .iter()
                .map(|p| format!("{} [{}]", p.name, p.match_count))
                .collect::<Vec<_>>()
                .join(", ")
        }),
        report(
            "matches",
            app.match_list_use_case.list_matches(MatchFilter::All),
            |matches| {
                matches
                    .iter()
                    .map(|m| match m.winner {
                        Some(winner) => format!("{} vs {} won by {}", m.player1, m.player2, winner),
                        None if m.finished => format!("{} vs {} drawn", m.player1, m.player2),
                        None => format!("{} vs {} open", m.player1, m.player2),
                    })
                    .collect::<Vec<_>>()
                    .join(", ")
            },
        ),
        report(
            "achievements",
            app.achievement_list_use_case.list_achievements(),
            |achievements| {
                achievements
                    .iter()
                    .map(|a| a.name.clone())
                    .collect::<Vec<_>>()
                    .join(", ")
            },
        ),
    ];

    shutdown_signal().await;
    for task in tasks {
        task.abort();
    }
    Ok(())
}
