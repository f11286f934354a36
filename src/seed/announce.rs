use crate::config::AnnounceConfig;
use crate::torrent::HashId;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument};

/// Torrent in the engine that can be announced to the DHT.
pub trait AnnounceTarget: Send + Sync {
    fn info_hash(&self) -> HashId;
    fn peer_count(&self) -> usize;
    fn force_dht_announce(&self) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReannounceOutcome {
    PeersFound { attempts: u32 },
    Exhausted { attempts: u32 },
    Cancelled { attempts: u32 },
}

impl ReannounceOutcome {
    pub fn attempts(&self) -> u32 {
        match self {
            Self::PeersFound { attempts }
            | Self::Exhausted { attempts }
            | Self::Cancelled { attempts } => *attempts,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReannounceReport {
    pub info_hash: HashId,
    #[serde(flatten)]
    pub outcome: ReannounceOutcome,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Re-announces a torrent to the DHT until it has peers.
///
/// Every `check_interval` the peer count is checked; with no peers a DHT
/// announce is forced. `wake` runs the check right away, which is what a DHT
/// bootstrap notification should do.
#[derive(Debug)]
pub struct ReannounceTask {
    info_hash: HashId,
    cancel: CancellationToken,
    wake: Arc<Notify>,
    handle: JoinHandle<ReannounceReport>,
}

impl ReannounceTask {
    pub fn spawn(
        target: Arc<dyn AnnounceTarget>,
        config: &AnnounceConfig,
        cancel: CancellationToken,
    ) -> Self {
        let info_hash = target.info_hash();
        let wake = Arc::new(Notify::new());
        let handle = tokio::spawn(run(
            target,
            config.check_interval,
            config.max_attempts,
            cancel.clone(),
            Arc::clone(&wake),
        ));
        Self {
            info_hash,
            cancel,
            wake,
            handle,
        }
    }

    pub fn info_hash(&self) -> &HashId {
        &self.info_hash
    }

    pub fn wake(&self) {
        self.wake.notify_one();
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub async fn join(self) -> Result<ReannounceReport> {
        self.handle
            .await
            .map_err(|err| Error::Generic(format!("reannounce task: {err}")))
    }
}

#[instrument(skip_all, fields(info_hash = %target.info_hash()))]
async fn run(
    target: Arc<dyn AnnounceTarget>,
    interval: Duration,
    max_attempts: Option<u32>,
    cancel: CancellationToken,
    wake: Arc<Notify>,
) -> ReannounceReport {
    let started_at = Utc::now();
    let mut attempts = 0u32;

    let outcome = loop {
        let peers = target.peer_count();
        debug!(peers, attempts, "check peers");
        if peers > 0 {
            info!(peers, attempts, "had peers, stop reannounce");
            break ReannounceOutcome::PeersFound { attempts };
        }
        if max_attempts.map_or(false, |max| attempts >= max) {
            info!(attempts, "no peers, give up reannounce");
            break ReannounceOutcome::Exhausted { attempts };
        }

        info!("had no peers, forcing dht announce");
        if let Err(err) = target.force_dht_announce() {
            error!(?err, "force dht announce");
        }
        attempts += 1;

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = wake.notified() => {
                debug!("woken up");
            }
            _ = cancel.cancelled() => {
                break ReannounceOutcome::Cancelled { attempts };
            }
        }
    };

    ReannounceReport {
        info_hash: target.info_hash(),
        outcome,
        started_at,
        finished_at: Utc::now(),
    }
}
