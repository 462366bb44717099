//! Receive loop: one dispatch task per inbound message, graceful drain on
//! shutdown.

use crate::dispatcher::{Dispatcher, Outcome};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio_stream::{Stream, StreamExt};
use tracing::{debug, error, info, warn};
use whatsapp_client::ChatMessage;

/// Counters reported when the loop exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub received: usize,
    pub completed: usize,
    pub aborted: usize,
}

/// Dispatch messages from `messages` until the stream ends or `shutdown`
/// resolves, then wait up to `grace` for in-flight dispatches.
pub async fn run<S, F>(
    messages: S,
    dispatcher: Arc<Dispatcher>,
    shutdown: F,
    grace: Duration,
) -> RunStats
where
    S: Stream<Item = ChatMessage>,
    F: Future<Output = ()>,
{
    let mut stats = RunStats::default();
    let mut tasks: JoinSet<Outcome> = JoinSet::new();

    tokio::pin!(messages);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            maybe = messages.next() => {
                let Some(message) = maybe else {
                    info!("Message stream ended");
                    break;
                };
                stats.received += 1;
                let dispatcher = dispatcher.clone();
                tasks.spawn(async move { dispatcher.dispatch(&message).await });
            }
            Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                record(&mut stats, joined);
            }
            _ = &mut shutdown => {
                info!("Shutdown signal received, no longer accepting messages");
                break;
            }
        }
    }

    if !tasks.is_empty() {
        info!("Waiting up to {:?} for {} in-flight dispatches", grace, tasks.len());
    }

    let drained = tokio::time::timeout(grace, async {
        while let Some(joined) = tasks.join_next().await {
            record(&mut stats, joined);
        }
    })
    .await;

    if drained.is_err() {
        stats.aborted = tasks.len();
        warn!("Aborting {} dispatches after grace period", stats.aborted);
        tasks.abort_all();
    }

    stats
}

fn record(stats: &mut RunStats, joined: Result<Outcome, tokio::task::JoinError>) {
    match joined {
        Ok(outcome) => {
            stats.completed += 1;
            debug!("Dispatch finished: {}", outcome);
        }
        Err(e) => error!("Dispatch task failed: {}", e),
    }
}
