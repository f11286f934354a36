use crate::keyword::KeywordFilter;
use crate::{Error, Result};
use std::fmt::Debug;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Receives the full pipeline after every mutation.
pub trait PipelineListener: Send + Sync {
    fn on_pipeline_changed(&self, pipeline: &[KeywordFilter]);
}

impl<F> PipelineListener for F
where
    F: Fn(&[KeywordFilter]) + Send + Sync,
{
    fn on_pipeline_changed(&self, pipeline: &[KeywordFilter]) {
        self(pipeline)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Ordered list of the keyword filters a user applied to a result set.
///
/// Insertion order is display order. `add` does not deduplicate, callers
/// check `contains_filter` first when they need that.
#[derive(Default)]
pub struct KeywordFilterPipeline {
    filters: Vec<KeywordFilter>,
    listeners: Vec<(SubscriptionId, Box<dyn PipelineListener>)>,
    next_id: u64,
}

impl Debug for KeywordFilterPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeywordFilterPipeline")
            .field("filters", &self.filters)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl KeywordFilterPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl PipelineListener + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    pub fn add(&mut self, filter: KeywordFilter) {
        debug!(filter = %filter, feature = ?filter.feature(), "add keyword filter");
        self.filters.push(filter);
        self.notify();
    }

    /// Removes the entry equal to `filter`. Returns `false` if there was none.
    pub fn remove(&mut self, filter: &KeywordFilter) -> bool {
        match self.position(filter) {
            Some(index) => {
                let removed = self.filters.remove(index);
                debug!(filter = %removed, index, "remove keyword filter");
                self.notify();
                true
            }
            None => false,
        }
    }

    /// Puts `filter` at `index`, keeping length and the order of the others.
    pub fn replace_at(&mut self, index: usize, filter: KeywordFilter) -> Result<KeywordFilter> {
        let len = self.filters.len();
        let slot = self
            .filters
            .get_mut(index)
            .ok_or(Error::IndexOutOfRange { index, len })?;
        let old = std::mem::replace(slot, filter);
        self.notify();
        Ok(old)
    }

    /// Flips the inclusion mode of the entry at `index` and returns the new
    /// filter.
    pub fn toggle_at(&mut self, index: usize) -> Result<KeywordFilter> {
        let len = self.filters.len();
        let toggled = self
            .filters
            .get(index)
            .ok_or(Error::IndexOutOfRange { index, len })?
            .toggle_inclusion();
        debug!(filter = %toggled, index, "toggle keyword filter");
        self.replace_at(index, toggled.clone())?;
        Ok(toggled)
    }

    pub fn position(&self, filter: &KeywordFilter) -> Option<usize> {
        self.filters.iter().position(|f| f == filter)
    }

    /// Keyword membership regardless of feature.
    pub fn contains(&self, keyword: &str) -> bool {
        self.filters.iter().any(|f| f.keyword() == keyword)
    }

    pub fn contains_filter(&self, filter: &KeywordFilter) -> bool {
        self.position(filter).is_some()
    }

    pub fn clear(&mut self) {
        if self.filters.is_empty() {
            return;
        }
        debug!(len = self.filters.len(), "clear keyword filters");
        self.filters.clear();
        self.notify();
    }

    /// Replaces the whole sequence, e.g. with a pipeline owned by the host.
    pub fn set_filters(&mut self, filters: Vec<KeywordFilter>) {
        self.filters = filters;
        self.notify();
    }

    pub fn filters(&self) -> &[KeywordFilter] {
        &self.filters
    }

    pub fn snapshot(&self) -> Vec<KeywordFilter> {
        self.filters.clone()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// True if `text` passes every filter.
    pub fn accepts(&self, text: &str) -> bool {
        self.filters.iter().all(|f| f.accept(text))
    }

    fn notify(&self) {
        for (_, listener) in self.listeners.iter() {
            listener.on_pipeline_changed(&self.filters);
        }
    }
}

/// Pipeline shared between threads. Every read-modify-write goes through one
/// lock.
#[derive(Debug, Clone, Default)]
pub struct SharedPipeline {
    inner: Arc<Mutex<KeywordFilterPipeline>>,
}

impl SharedPipeline {
    pub fn new(pipeline: KeywordFilterPipeline) -> Self {
        Self {
            inner: Arc::new(Mutex::new(pipeline)),
        }
    }

    pub fn lock(&self) -> MutexGuard<'_, KeywordFilterPipeline> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds `filter` unless an equal one is already applied.
    pub fn add_if_absent(&self, filter: KeywordFilter) -> bool {
        let mut pipeline = self.lock();
        if pipeline.contains_filter(&filter) {
            return false;
        }
        pipeline.add(filter);
        true
    }

    pub fn toggle(&self, filter: &KeywordFilter) -> Option<KeywordFilter> {
        let mut pipeline = self.lock();
        let index = pipeline.position(filter)?;
        pipeline.toggle_at(index).ok()
    }

    pub fn snapshot(&self) -> Vec<KeywordFilter> {
        self.lock().snapshot()
    }
}
