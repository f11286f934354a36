//! Headless keyword filter drawer.
//!
//! Owns the applied filter pipeline and one [`TagGroup`] of ranked suggestions
//! per registered feature, and implements the user actions on them. Rendering
//! is left to the host, which reads [`KeywordFilterDrawer::groups`] and
//! [`KeywordFilterDrawer::applied`] after each action.

mod tags;

use crate::keyword::{Feature, FeatureRegistry, KeywordFilter};
use crate::pipeline::{KeywordFilterPipeline, PipelineListener, SubscriptionId};
use crate::ranker::{filter_and_rank, HistogramEntry, SuggestionList};
use crate::Result;
use std::fmt::Debug;
use std::sync::Arc;
use tracing::{debug, warn};

pub use tags::TagGroup;

pub trait DrawerController: Send + Sync {
    fn open_drawer(&self);
    fn close_drawer(&self);
}

pub struct KeywordFilterDrawer {
    registry: FeatureRegistry,
    pipeline: KeywordFilterPipeline,
    groups: Vec<TagGroup>,
    controller: Option<Arc<dyn DrawerController>>,
}

impl Debug for KeywordFilterDrawer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeywordFilterDrawer")
            .field("pipeline", &self.pipeline)
            .field("groups", &self.groups)
            .finish_non_exhaustive()
    }
}

impl KeywordFilterDrawer {
    pub fn new(registry: FeatureRegistry) -> Self {
        let groups = registry.features().iter().map(|f| TagGroup::new(*f)).collect();
        Self {
            registry,
            pipeline: KeywordFilterPipeline::new(),
            groups,
            controller: None,
        }
    }

    pub fn set_controller(&mut self, controller: Arc<dyn DrawerController>) {
        self.controller = Some(controller);
    }

    pub fn subscribe(&mut self, listener: impl PipelineListener + 'static) -> SubscriptionId {
        self.pipeline.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.pipeline.unsubscribe(id)
    }

    pub fn applied(&self) -> &[KeywordFilter] {
        self.pipeline.filters()
    }

    pub fn pipeline(&self) -> &KeywordFilterPipeline {
        &self.pipeline
    }

    pub fn groups(&self) -> &[TagGroup] {
        &self.groups
    }

    pub fn group(&self, feature: Feature) -> Option<&TagGroup> {
        self.groups.iter().find(|g| g.feature() == feature)
    }

    pub fn group_mut(&mut self, feature: Feature) -> Option<&mut TagGroup> {
        self.groups.iter_mut().find(|g| g.feature() == feature)
    }

    /// The "touch a tag" tip and the "clear all" button are shown only while
    /// filters are applied.
    pub fn applied_tips_visible(&self) -> bool {
        !self.pipeline.is_empty()
    }

    /// New histogram for `feature`, optionally with the host's current
    /// pipeline. Histograms of unregistered features are ignored.
    pub fn update_data(
        &mut self,
        pipeline: Option<&[KeywordFilter]>,
        feature: Feature,
        histogram: &[HistogramEntry],
    ) {
        if let Some(filters) = pipeline {
            self.pipeline.set_filters(filters.to_vec());
            self.sync_suggestions();
        }

        let (Some(threshold), Some(group)) = (
            self.registry.threshold(feature),
            self.groups.iter_mut().find(|g| g.feature() == feature),
        ) else {
            warn!(%feature, "no tag group for feature, ignore histogram");
            return;
        };

        if histogram.is_empty() {
            group.hide_header();
            return;
        }

        group.show_header();
        let ranked = filter_and_rank(histogram, threshold);
        group.suggestions = SuggestionList::render(feature, &ranked, &self.pipeline);
        debug!(%feature, suggestions = group.suggestions.len(), "update suggestions");
    }

    /// Keyword typed in the drawer's text box. Blank input is ignored.
    pub fn on_keyword_entered(&mut self, text: &str) -> bool {
        match KeywordFilter::from_user_input(text) {
            Some(filter) => {
                self.pipeline.add(filter);
                self.sync_suggestions();
                true
            }
            None => false,
        }
    }

    /// Applies a suggestion and hides its keyword in every group. Returns
    /// `false` if an equal filter was already applied.
    pub fn on_suggestion_touched(&mut self, feature: Feature, keyword: &str) -> bool {
        let Some(filter) = KeywordFilter::new(keyword, Some(feature), true) else {
            return false;
        };
        let added = if self.pipeline.contains_filter(&filter) {
            false
        } else {
            self.pipeline.add(filter);
            true
        };
        self.sync_suggestions();
        added
    }

    /// Flips the applied filter at `index` between include and exclude.
    pub fn on_applied_filter_touched(&mut self, index: usize) -> Result<KeywordFilter> {
        self.pipeline.toggle_at(index)
    }

    /// Removes an applied filter. Its suggestions show again unless another
    /// applied filter has the same keyword.
    pub fn on_applied_filter_dismissed(&mut self, filter: &KeywordFilter) -> bool {
        let removed = self.pipeline.remove(filter);
        self.sync_suggestions();
        removed
    }

    pub fn clear_applied_filters(&mut self) {
        self.pipeline.clear();
        for group in self.groups.iter_mut() {
            group.restore();
        }
    }

    pub fn reset(&mut self) {
        self.clear_applied_filters();
        for group in self.groups.iter_mut() {
            group.reset();
        }
    }

    fn sync_suggestions(&mut self) {
        for group in self.groups.iter_mut() {
            group.suggestions.sync_hidden(&self.pipeline);
        }
    }

    /// Keeps the result titles that pass the applied filters.
    pub fn filter_results<T: AsRef<str>>(&self, results: impl IntoIterator<Item = T>) -> Vec<T> {
        results
            .into_iter()
            .filter(|r| self.pipeline.accepts(r.as_ref()))
            .collect()
    }

    pub fn open(&self) {
        match self.controller.as_ref() {
            Some(c) => c.open_drawer(),
            None => warn!("keyword filter drawer controller has not been assigned"),
        }
    }

    pub fn close(&self) {
        match self.controller.as_ref() {
            Some(c) => c.close_drawer(),
            None => warn!("keyword filter drawer controller has not been assigned"),
        }
    }
}
