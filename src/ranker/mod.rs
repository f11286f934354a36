use crate::keyword::{Feature, KeywordFilter};
use crate::pipeline::KeywordFilterPipeline;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistogramEntry {
    pub keyword: String,
    pub count: u32,
}

impl HistogramEntry {
    pub fn new(keyword: impl Into<String>, count: u32) -> Self {
        Self {
            keyword: keyword.into(),
            count,
        }
    }
}

impl<S: Into<String>> From<(S, u32)> for HistogramEntry {
    fn from((keyword, count): (S, u32)) -> Self {
        Self::new(keyword, count)
    }
}

/// Histogram as delivered by a keyword detector: either a list of entries or
/// a `keyword -> count` object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Histogram {
    Entries(Vec<HistogramEntry>),
    Counts(BTreeMap<String, u32>),
}

impl Histogram {
    pub fn into_entries(self) -> Vec<HistogramEntry> {
        match self {
            Self::Entries(entries) => entries,
            Self::Counts(counts) => counts.into_iter().map(HistogramEntry::from).collect(),
        }
    }
}

/// High-pass filter over a keyword histogram.
///
/// Each count is normalized by `max + sum`, so the bar rises with the size of
/// the result set. Entries seen once are always dropped. The result is sorted
/// by count, highest first, and ties keep their histogram order.
pub fn filter_and_rank(histogram: &[HistogramEntry], threshold: f32) -> Vec<HistogramEntry> {
    let mut high: u64 = 0;
    let mut total: u64 = 0;
    for entry in histogram {
        let count = entry.count as u64;
        total += count;
        high = high.max(count);
    }

    let denom = high + total;
    if denom == 0 {
        return vec![];
    }

    let mut kept: Vec<HistogramEntry> = histogram
        .iter()
        .filter(|entry| {
            let rate = entry.count as f32 / denom as f32;
            entry.count > 1 && rate >= threshold
        })
        .cloned()
        .collect();

    // stable
    kept.sort_by(|a, b| b.count.cmp(&a.count));

    debug!(
        high,
        total,
        threshold,
        input = histogram.len(),
        kept = kept.len(),
        "rank histogram"
    );
    kept
}

#[derive(Debug, Clone, Serialize)]
pub struct Suggestion {
    pub filter: KeywordFilter,
    pub count: u32,
    pub hidden: bool,
}

/// Ranked suggestions of one feature. Suggestions whose keyword is already
/// applied are hidden, not removed, so they keep their rank.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SuggestionList {
    items: Vec<Suggestion>,
}

impl SuggestionList {
    pub fn render(
        feature: Feature,
        ranked: &[HistogramEntry],
        pipeline: &KeywordFilterPipeline,
    ) -> Self {
        let applied = !pipeline.is_empty();
        let items = ranked
            .iter()
            .filter_map(|entry| {
                let filter = KeywordFilter::new(&entry.keyword, Some(feature), true)?;
                let hidden = applied && pipeline.contains(filter.keyword());
                Some(Suggestion {
                    filter,
                    count: entry.count,
                    hidden,
                })
            })
            .collect();
        Self { items }
    }

    pub fn items(&self) -> &[Suggestion] {
        &self.items
    }

    pub fn visible(&self) -> impl Iterator<Item = &Suggestion> {
        self.items.iter().filter(|s| !s.hidden)
    }

    pub fn get(&self, keyword: &str) -> Option<&Suggestion> {
        self.items.iter().find(|s| s.filter.keyword() == keyword)
    }

    pub fn hide(&mut self, keyword: &str) -> bool {
        self.set_hidden(keyword, true)
    }

    /// Unhides the first suggestion for `keyword`.
    pub fn reveal(&mut self, keyword: &str) -> bool {
        self.set_hidden(keyword, false)
    }

    /// Hides exactly the suggestions whose keyword is in `pipeline`.
    pub fn sync_hidden(&mut self, pipeline: &KeywordFilterPipeline) {
        for s in self.items.iter_mut() {
            s.hidden = pipeline.contains(s.filter.keyword());
        }
    }

    pub fn restore(&mut self) {
        for s in self.items.iter_mut() {
            s.hidden = false;
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn set_hidden(&mut self, keyword: &str, hidden: bool) -> bool {
        match self.items.iter_mut().find(|s| s.filter.keyword() == keyword) {
            Some(s) => {
                s.hidden = hidden;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn histogram(entries: &[(&str, u32)]) -> Vec<HistogramEntry> {
        entries.iter().map(|&(k, c)| HistogramEntry::new(k, c)).collect()
    }

    fn keywords(entries: &[HistogramEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.keyword.as_str()).collect()
    }

    #[test]
    fn test_rank_example() {
        let h = histogram(&[("torrent", 10), ("movie", 8), ("sample", 1), ("x", 1)]);
        let ranked = filter_and_rank(&h, 0.1);
        assert_eq!(keywords(&ranked), vec!["torrent", "movie"]);
        assert_eq!(ranked[0].count, 10);
        assert_eq!(ranked[1].count, 8);
    }

    #[test]
    fn test_rank_sorted_and_kept_condition() {
        let h = histogram(&[
            ("a", 3),
            ("b", 40),
            ("c", 7),
            ("d", 2),
            ("e", 40),
            ("f", 1),
            ("g", 12),
        ]);
        let threshold = 0.02;
        let ranked = filter_and_rank(&h, threshold);

        for pair in ranked.windows(2) {
            assert!(pair[0].count >= pair[1].count);
        }
        let high = 40.0;
        let total: f32 = h.iter().map(|e| e.count as f32).sum();
        for e in ranked.iter() {
            assert!(e.count > 1);
            assert!(e.count as f32 / (high + total) >= threshold);
        }
        // 2/145 < 0.02
        assert_eq!(keywords(&ranked), vec!["b", "e", "g", "c", "a"]);
    }

    #[test]
    fn test_rank_rate_on_boundary() {
        // 3 / (3 + 27) == 0.1 exactly
        let mut h = histogram(&[("edge", 3)]);
        h.extend((0..12).map(|i| HistogramEntry::new(format!("k{i}"), 2)));
        let ranked = filter_and_rank(&h, 0.1);
        assert_eq!(keywords(&ranked), vec!["edge"]);
    }

    #[test]
    fn test_rank_ties_keep_order() {
        let h = histogram(&[("z", 5), ("y", 9), ("x", 5), ("w", 5)]);
        let ranked = filter_and_rank(&h, 0.0);
        assert_eq!(keywords(&ranked), vec!["y", "z", "x", "w"]);
    }

    #[test]
    fn test_rank_empty_and_degenerate() {
        assert!(filter_and_rank(&[], 0.0).is_empty());
        assert!(filter_and_rank(&[], 0.5).is_empty());
        assert!(filter_and_rank(&histogram(&[("a", 0), ("b", 0)]), 0.0).is_empty());
        assert!(filter_and_rank(&histogram(&[("a", 1), ("b", 1), ("c", 0)]), 0.0).is_empty());
    }

    #[test]
    fn test_rank_idempotent_at_zero() {
        let h = histogram(&[("a", 4), ("b", 1), ("c", 9), ("d", 4), ("e", 2)]);
        let once = filter_and_rank(&h, 0.0);
        let twice = filter_and_rank(&once, 0.0);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_histogram_formats() {
        let h: Histogram = serde_json::from_str(r#"[{"keyword":"mkv","count":3}]"#).unwrap();
        assert_eq!(h.into_entries(), histogram(&[("mkv", 3)]));

        let h: Histogram = serde_json::from_str(r#"{"mp4":2,"avi":5}"#).unwrap();
        let mut entries = h.into_entries();
        entries.sort_by(|a, b| a.keyword.cmp(&b.keyword));
        assert_eq!(entries, histogram(&[("avi", 5), ("mp4", 2)]));
    }

    #[test]
    fn test_render_hides_applied() {
        let ranked = histogram(&[("ubuntu", 10), ("server", 6), ("desktop", 4)]);
        let mut pipeline = KeywordFilterPipeline::new();

        let list = SuggestionList::render(Feature::FileName, &ranked, &pipeline);
        assert_eq!(list.visible().count(), 3);

        pipeline.add(KeywordFilter::from_user_input("server").unwrap());
        let mut list = SuggestionList::render(Feature::FileName, &ranked, &pipeline);
        assert_eq!(list.len(), 3);
        assert!(list.items()[1].hidden);
        let visible: Vec<&str> = list.visible().map(|s| s.filter.keyword()).collect();
        assert_eq!(visible, vec!["ubuntu", "desktop"]);
        assert_eq!(list.items()[0].filter.feature(), Some(Feature::FileName));

        assert!(list.reveal("server"));
        assert_eq!(list.visible().count(), 3);
        assert!(list.hide("desktop"));
        assert!(!list.hide("missing"));
        list.restore();
        assert_eq!(list.visible().count(), 3);
    }

    #[test]
    fn test_sync_hidden_follows_pipeline() {
        let ranked = histogram(&[("ubuntu", 10), ("server", 6), ("desktop", 4)]);
        let mut pipeline = KeywordFilterPipeline::new();
        let mut list = SuggestionList::render(Feature::FileName, &ranked, &pipeline);

        // typed filters carry no feature but still hide the suggestion
        let server = KeywordFilter::from_user_input("server").unwrap();
        pipeline.add(server.clone());
        pipeline.add(KeywordFilter::new("ubuntu", Some(Feature::FileExtension), false).unwrap());
        list.sync_hidden(&pipeline);
        let visible: Vec<&str> = list.visible().map(|s| s.filter.keyword()).collect();
        assert_eq!(visible, vec!["desktop"]);

        pipeline.remove(&server);
        list.sync_hidden(&pipeline);
        let visible: Vec<&str> = list.visible().map(|s| s.filter.keyword()).collect();
        assert_eq!(visible, vec!["server", "desktop"]);
    }
}
