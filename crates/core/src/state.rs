use crate::models::{ArticleResult, PlaceId, SearchContext};
use crate::results::ResultList;
use serde::{Deserialize, Serialize};

pub const PAGE_TITLE: &str = "Welcome to Neighborhood Map!";
pub const PAGE_DIRECTIONS: &str = "Directions: Search by address or city, then refine by places of interest. \
A list of results will appear below the map, each of which can be selected to look up a Wikipedia article.";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleStage {
    #[default]
    Idle,
    AddressResolved,
    ResultsLoaded,
    Filtered,
}

/// What the snippet panel shows for the selected place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticlePanel {
    pub place: PlaceId,
    pub header: Option<String>,
    pub articles: Vec<ArticleResult>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Visibility {
    pub refine: bool,
    pub results: bool,
    pub snippet: bool,
}

/// Everything the controller mutates. Owned by the controller and read by the
/// view layer through snapshots.
#[derive(Debug, Default)]
pub struct AppState {
    pub context: SearchContext,
    pub stage: LifecycleStage,
    pub results: ResultList,
    pub filter_text: String,
    pub list_title: String,
    pub list_footer: String,
    pub article: Option<ArticlePanel>,
    pub visibility: Visibility,
    pub selection_token: u64,
}

impl AppState {
    /// Starts a new selection and returns its token. Any lookup holding an
    /// older token is stale from here on.
    pub fn next_selection_token(&mut self) -> u64 {
        self.selection_token += 1;
        self.selection_token
    }

    pub fn is_current_selection(&self, token: u64) -> bool {
        self.selection_token == token
    }

    /// Forgets the article panel and invalidates any lookup in flight.
    pub fn drop_article(&mut self) {
        self.article = None;
        self.visibility.snippet = false;
        self.selection_token += 1;
    }

    pub fn loaded_title(&self) -> String {
        format!(
            "Top {} results for \"{}\" near \"{}\":",
            self.results.len(),
            self.context.refine_query,
            self.context.address_text
        )
    }

    /// Stage to fall back to when the result list is emptied.
    pub fn resting_stage(&self) -> LifecycleStage {
        if self.context.is_resolved() {
            LifecycleStage::AddressResolved
        } else {
            LifecycleStage::Idle
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Coordinates;

    #[test]
    fn dropping_the_article_invalidates_pending_tokens() {
        let mut state = AppState::default();
        let token = state.next_selection_token();
        assert!(state.is_current_selection(token));

        state.drop_article();
        assert!(!state.is_current_selection(token));
    }

    #[test]
    fn resting_stage_follows_resolution() {
        let mut state = AppState::default();
        assert_eq!(state.resting_stage(), LifecycleStage::Idle);

        state.context.resolved_coordinates = Some(Coordinates::new(1.0, 2.0));
        assert_eq!(state.resting_stage(), LifecycleStage::AddressResolved);
    }
}
