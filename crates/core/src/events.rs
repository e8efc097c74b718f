//! View updates published after every controller operation.
//!
//! The controller mutates [`AppState`] and then emits one [`ViewUpdate`] on the
//! [`ViewBus`]. Front ends subscribe and render from the snapshot; they never
//! touch the state or the map directly.

use crate::models::{Coordinates, PlaceId};
use crate::state::{AppState, LifecycleStage, Visibility, PAGE_DIRECTIONS, PAGE_TITLE};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;

pub const NO_DESCRIPTION: &str = "No description available...";

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A user-visible message tied to the operation that produced it.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ListedPlace {
    pub id: PlaceId,
    pub name: String,
    pub coordinates: Coordinates,
    pub selected: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ArticleView {
    pub title: String,
    pub description: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ViewSnapshot {
    pub page_title: String,
    pub page_directions: String,
    pub stage: LifecycleStage,
    pub address: String,
    pub resolved: Option<Coordinates>,
    pub refine: String,
    pub filter: String,
    pub list_title: String,
    pub list_footer: String,
    pub places: Vec<ListedPlace>,
    pub total_places: usize,
    pub visibility: Visibility,
    pub article_header: Option<String>,
    pub articles: Vec<ArticleView>,
}

impl ViewSnapshot {
    pub fn from_state(state: &AppState) -> Self {
        let selected = state.results.selected();
        let places = state
            .results
            .visible(&state.filter_text)
            .map(|place| ListedPlace {
                id: place.id,
                name: place.name.clone(),
                coordinates: place.coordinates,
                selected: selected == Some(place.id),
            })
            .collect();

        let (article_header, articles) = match &state.article {
            Some(panel) => (
                panel.header.clone(),
                panel
                    .articles
                    .iter()
                    .map(|article| ArticleView {
                        title: article.title.clone(),
                        description: if article.snippet.trim().is_empty() {
                            NO_DESCRIPTION.to_string()
                        } else {
                            article.snippet.clone()
                        },
                        url: article.url.clone(),
                    })
                    .collect(),
            ),
            None => (None, Vec::new()),
        };

        Self {
            page_title: PAGE_TITLE.to_string(),
            page_directions: PAGE_DIRECTIONS.to_string(),
            stage: state.stage,
            address: state.context.address_text.clone(),
            resolved: state.context.resolved_coordinates,
            refine: state.context.refine_query.clone(),
            filter: state.filter_text.clone(),
            list_title: state.list_title.clone(),
            list_footer: state.list_footer.clone(),
            places,
            total_places: state.results.len(),
            visibility: state.visibility,
            article_header,
            articles,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ViewUpdate {
    pub revision: u64,
    pub emitted_at: DateTime<Utc>,
    pub snapshot: ViewSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

/// Broadcast channel carrying [`ViewUpdate`]s to every subscribed view.
#[derive(Debug)]
pub struct ViewBus {
    tx: broadcast::Sender<ViewUpdate>,
}

impl ViewBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Updates with no subscriber are dropped.
    pub fn emit(&self, update: ViewUpdate) {
        tracing::debug!(
            revision = update.revision,
            stage = ?update.snapshot.stage,
            subscriber_count = self.tx.receiver_count(),
            "view update"
        );
        let _ = self.tx.send(update);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ViewUpdate> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for ViewBus {
    fn default() -> Self {
        Self::new(64)
    }
}
