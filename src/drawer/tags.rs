use crate::keyword::Feature;
use crate::ranker::SuggestionList;
use serde::Serialize;

/// Header plus suggestion container of one feature.
#[derive(Debug, Clone, Serialize)]
pub struct TagGroup {
    feature: Feature,
    header_visible: bool,
    expanded: bool,
    pub(crate) suggestions: SuggestionList,
}

impl TagGroup {
    pub fn new(feature: Feature) -> Self {
        Self {
            feature,
            header_visible: true,
            expanded: true,
            suggestions: SuggestionList::default(),
        }
    }

    pub fn feature(&self) -> Feature {
        self.feature
    }

    pub fn suggestions(&self) -> &SuggestionList {
        &self.suggestions
    }

    pub fn is_header_visible(&self) -> bool {
        self.header_visible
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn expand(&mut self) {
        self.expanded = true;
    }

    pub fn collapse(&mut self) {
        self.expanded = false;
    }

    pub fn toggle(&mut self) {
        self.expanded = !self.expanded;
    }

    pub fn show_header(&mut self) {
        self.header_visible = true;
    }

    pub fn hide_header(&mut self) {
        self.header_visible = false;
    }

    /// Unhides every suggestion and expands the group.
    pub fn restore(&mut self) {
        self.suggestions.restore();
        self.expand();
    }

    pub fn reset(&mut self) {
        self.suggestions.clear();
        self.expand();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_and_reset() {
        let mut group = TagGroup::new(Feature::FileExtension);
        assert!(group.is_expanded());
        group.toggle();
        assert!(!group.is_expanded());
        group.toggle();
        assert!(group.is_expanded());

        group.collapse();
        group.hide_header();
        group.reset();
        assert!(group.is_expanded());
        assert!(!group.is_header_visible());
        assert!(group.suggestions().is_empty());
    }
}
