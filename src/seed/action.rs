use super::announce::{AnnounceTarget, ReannounceTask};
use crate::config::AnnounceConfig;
use crate::torrent::HashId;
use crate::{Error, Result};
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// The BitTorrent engine as seen by the seed action.
pub trait SeedEngine: Send + Sync + 'static {
    fn is_connected(&self) -> bool;
    fn connect(&self) -> Result<()>;
    fn seeding_enabled(&self) -> bool;
    fn seeding_wifi_only(&self) -> bool;
    fn wifi_up(&self) -> bool;
    fn enable_seeding(&self);
    fn add_torrent_file(&self, path: &Path) -> Result<()>;
    /// Builds a torrent for `path`, adds it to the session and returns its
    /// info hash. Hashes the whole file, so it may block.
    fn create_and_seed(&self, path: &Path) -> Result<HashId>;
    fn resume(&self, info_hash: &HashId) -> Result<()>;
    fn remove_transfer(&self, info_hash: &HashId) -> Result<()>;
    fn find_torrent(&self, info_hash: &HashId) -> Option<Arc<dyn AnnounceTarget>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedTarget {
    File(PathBuf),
    Download(HashId),
}

impl SeedTarget {
    fn is_torrent_file(path: &Path) -> bool {
        path.extension()
            .map_or(false, |ext| ext.eq_ignore_ascii_case("torrent"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    ConnectBittorrent,
    EnableSeeding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedDecision {
    Ask(Prompt),
    Seed { warn_no_wifi: bool },
}

#[derive(Debug, Default)]
pub struct SeedReport {
    pub warn_no_wifi: bool,
    pub added: Vec<PathBuf>,
    pub created: Vec<HashId>,
    pub resumed: Vec<HashId>,
    pub failed: Vec<(SeedTarget, String)>,
    pub announcers: Vec<ReannounceTask>,
}

#[derive(Debug)]
pub enum SeedOutcome {
    Seeded(SeedReport),
    Ask(Prompt),
    Declined(&'static str),
}

pub const SEEDING_DECLINED: &str = "the file could not be seeded, enable seeding";
pub const CONNECT_DECLINED: &str =
    "the file could not be seeded, bittorrent will remain disconnected";

/// Seeds local files, `.torrent` files or existing downloads through an
/// injected engine.
pub struct SeedAction {
    engine: Arc<dyn SeedEngine>,
    targets: Vec<SeedTarget>,
    transfer_to_clear: Option<HashId>,
    announce: AnnounceConfig,
    cancel: CancellationToken,
}

impl Debug for SeedAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedAction")
            .field("targets", &self.targets)
            .field("transfer_to_clear", &self.transfer_to_clear)
            .finish_non_exhaustive()
    }
}

impl SeedAction {
    pub fn new(engine: Arc<dyn SeedEngine>, targets: Vec<SeedTarget>, announce: AnnounceConfig) -> Self {
        Self {
            engine,
            targets,
            transfer_to_clear: None,
            announce,
            cancel: CancellationToken::new(),
        }
    }

    /// Transfer removed from the transfer list once seeding started.
    pub fn with_transfer_to_clear(mut self, info_hash: HashId) -> Self {
        self.transfer_to_clear = Some(info_hash);
        self
    }

    pub fn plan(&self) -> SeedDecision {
        if !self.engine.is_connected() {
            return SeedDecision::Ask(Prompt::ConnectBittorrent);
        }
        if !self.engine.seeding_enabled() {
            return SeedDecision::Ask(Prompt::EnableSeeding);
        }
        let warn_no_wifi = self.engine.seeding_wifi_only() && !self.engine.wifi_up();
        SeedDecision::Seed { warn_no_wifi }
    }

    pub async fn run(&self) -> Result<SeedOutcome> {
        match self.plan() {
            SeedDecision::Ask(prompt) => {
                debug!(?prompt, "seed needs confirmation");
                Ok(SeedOutcome::Ask(prompt))
            }
            SeedDecision::Seed { warn_no_wifi } => {
                if warn_no_wifi {
                    warn!("seeding only on wifi but wifi is down");
                }
                let mut report = self.seed_all().await?;
                report.warn_no_wifi = warn_no_wifi;
                Ok(SeedOutcome::Seeded(report))
            }
        }
    }

    pub async fn on_prompt_answer(&self, prompt: Prompt, accepted: bool) -> Result<SeedOutcome> {
        match (prompt, accepted) {
            (Prompt::EnableSeeding, false) => Ok(SeedOutcome::Declined(SEEDING_DECLINED)),
            (Prompt::ConnectBittorrent, false) => Ok(SeedOutcome::Declined(CONNECT_DECLINED)),
            (Prompt::EnableSeeding, true) => {
                self.engine.enable_seeding();
                self.run().await
            }
            (Prompt::ConnectBittorrent, true) => {
                let engine = Arc::clone(&self.engine);
                tokio::task::spawn_blocking(move || engine.connect())
                    .await
                    .map_err(|err| Error::Engine(err.to_string()))??;
                self.run().await
            }
        }
    }

    /// Stops every reannounce task started by this action.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    async fn seed_all(&self) -> Result<SeedReport> {
        let mut report = SeedReport::default();

        for target in self.targets.iter() {
            let result = match target {
                SeedTarget::File(path) if SeedTarget::is_torrent_file(path) => self
                    .engine
                    .add_torrent_file(path)
                    .map(|_| report.added.push(path.clone())),
                SeedTarget::File(path) => match self.create(path).await {
                    Ok(info_hash) => {
                        report.created.push(info_hash);
                        self.start_announce(&info_hash, &mut report);
                        Ok(())
                    }
                    Err(err) => Err(err),
                },
                SeedTarget::Download(info_hash) => {
                    self.engine.resume(info_hash).map(|_| {
                        report.resumed.push(*info_hash);
                        self.start_announce(info_hash, &mut report);
                    })
                }
            };
            if let Err(err) = result {
                error!(?target, ?err, "seed");
                report.failed.push((target.clone(), err.to_string()));
            }
        }

        if let Some(info_hash) = self.transfer_to_clear.as_ref() {
            self.engine.remove_transfer(info_hash)?;
        }

        info!(
            added = report.added.len(),
            created = report.created.len(),
            resumed = report.resumed.len(),
            failed = report.failed.len(),
            "seed"
        );
        Ok(report)
    }

    async fn create(&self, path: &Path) -> Result<HashId> {
        let engine = Arc::clone(&self.engine);
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || engine.create_and_seed(&path))
            .await
            .map_err(|err| Error::Engine(err.to_string()))?
    }

    fn start_announce(&self, info_hash: &HashId, report: &mut SeedReport) {
        match self.engine.find_torrent(info_hash) {
            Some(target) => {
                let task = ReannounceTask::spawn(target, &self.announce, self.cancel.child_token());
                report.announcers.push(task);
            }
            None => warn!(%info_hash, "could not find torrent for reannounce"),
        }
    }
}
