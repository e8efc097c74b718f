use crate::config::MapConfig;
use crate::events::{Notice, ViewBus, ViewSnapshot, ViewUpdate};
use crate::map::{MapSurface, MapView};
use crate::models::{ArticleResult, Coordinates, PlaceId, PlaceResult, RawPlace, SearchContext};
use crate::providers::wikipedia::sanitize_article_query;
use crate::results::FilterSummary;
use crate::state::{AppState, ArticlePanel, LifecycleStage};
use crate::traits::{ArticleProvider, PlaceProvider};
use crate::{ControllerError, GeocodeError, LookupError, SearchError};
use chrono::Utc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

pub const LOADED_FOOTER: &str = "Click results to highlight on map & learn more.";
pub const EMPTY_LIST_TITLE: &str = "No markers to display...";
pub const FILTERED_TITLE: &str = "Filtered results:";
pub const FILTERED_EMPTY_TITLE: &str = "No results.";

/// An article lookup started by [`MapController::begin_select`]. Hand it back
/// to [`MapController::complete_select`] together with the provider's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLookup {
    token: u64,
    place: PlaceId,
    query: String,
}

impl PendingLookup {
    pub fn token(&self) -> u64 {
        self.token
    }

    pub fn place(&self) -> PlaceId {
        self.place
    }

    pub fn query(&self) -> &str {
        &self.query
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOutcome {
    Shown,
    /// A newer selection started before this response arrived.
    Discarded,
}

/// Drives the search lifecycle: address, refine, filter, clear and select.
pub struct MapController<P, A, M>
where
    P: PlaceProvider,
    A: ArticleProvider,
    M: MapSurface,
{
    places: P,
    articles: A,
    map: M,
    config: MapConfig,
    state: AppState,
    bus: ViewBus,
    revision: u64,
    next_place_id: u64,
    last_notice: Option<Notice>,
}

impl<P, A, M> MapController<P, A, M>
where
    P: PlaceProvider + Send + Sync,
    A: ArticleProvider + Send + Sync,
    M: MapSurface,
{
    pub fn new(places: P, articles: A, mut map: M, config: MapConfig) -> Self {
        map.set_view(config.initial_view);
        Self {
            places,
            articles,
            map,
            config,
            state: AppState::default(),
            bus: ViewBus::default(),
            revision: 0,
            next_place_id: 1,
            last_notice: None,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn last_notice(&self) -> Option<&Notice> {
        self.last_notice.as_ref()
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot::from_state(&self.state)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ViewUpdate> {
        self.bus.subscribe()
    }

    /// Geocodes `text`. On success any loaded results are destroyed, the map
    /// recenters and the refine input becomes available. On failure nothing
    /// changes apart from the error notice.
    pub async fn submit_address(&mut self, text: &str) -> Result<Coordinates, GeocodeError> {
        let address = text.trim();
        let outcome = if address.is_empty() {
            Err(GeocodeError::EmptyAddress)
        } else {
            self.places.geocode(address).await
        };

        match outcome {
            Ok(coordinates) => {
                self.reset_results();
                self.state.context = SearchContext {
                    address_text: address.to_string(),
                    resolved_coordinates: Some(coordinates),
                    refine_query: String::new(),
                };
                self.state.stage = LifecycleStage::AddressResolved;
                self.state.visibility.refine = true;
                self.map.set_view(MapView {
                    center: coordinates,
                    zoom: self.config.resolved_zoom,
                });
                info!(address = %address, coordinates = %coordinates, "address resolved");
                self.publish(None);
                Ok(coordinates)
            }
            Err(error) => {
                warn!(address = %address, error = %error, "geocode failed");
                self.publish(Some(Notice::error(format!(
                    "Lookup failed. Status: {}",
                    error.reason()
                ))));
                Err(error)
            }
        }
    }

    /// Searches for `text` around the resolved address and replaces the whole
    /// result list. Previous markers are destroyed before the request goes out.
    pub async fn submit_refine(&mut self, text: &str) -> Result<usize, SearchError> {
        let Some(center) = self.state.context.resolved_coordinates else {
            self.publish(Some(Notice::error(
                "Search for an address before refining.",
            )));
            return Err(SearchError::NotResolved);
        };

        let query = text.trim().to_string();
        if query.is_empty() {
            self.publish(Some(Notice::error("Enter places of interest to search for.")));
            return Err(SearchError::EmptyQuery);
        }

        self.reset_results();
        self.state.context.refine_query = query.clone();
        self.state.stage = LifecycleStage::AddressResolved;

        let outcome = self
            .places
            .search(center, self.config.search_radius_meters, &query)
            .await;

        match outcome {
            Ok(raw) => {
                let loaded = self.load_places(raw);
                self.state.stage = LifecycleStage::ResultsLoaded;
                info!(query = %query, result_count = loaded, "results loaded");

                if loaded > 0 {
                    self.state.list_title = self.state.loaded_title();
                    self.state.list_footer = LOADED_FOOTER.to_string();
                    self.state.visibility.results = true;
                    self.publish(None);
                } else {
                    self.state.list_title = EMPTY_LIST_TITLE.to_string();
                    self.publish(Some(Notice::info(format!(
                        "No results for \"{}\" near \"{}\".",
                        query, self.state.context.address_text
                    ))));
                }
                Ok(loaded)
            }
            Err(error) => {
                warn!(query = %query, error = %error, "place search failed");
                self.publish(Some(Notice::error(format!(
                    "Places Service error: {}",
                    error.status()
                ))));
                Err(error)
            }
        }
    }

    /// Recomputes the visible subset from the loaded results. Never refetches.
    pub fn apply_filter(&mut self, text: &str) -> FilterSummary {
        if !matches!(
            self.state.stage,
            LifecycleStage::ResultsLoaded | LifecycleStage::Filtered
        ) {
            debug!(stage = ?self.state.stage, "filter ignored without loaded results");
            return FilterSummary::default();
        }

        self.state.filter_text = text.to_string();
        let summary = self.state.results.apply_filter(text, &mut self.map);

        if text.is_empty() {
            self.state.stage = LifecycleStage::ResultsLoaded;
            self.state.list_title = if self.state.results.is_empty() {
                EMPTY_LIST_TITLE.to_string()
            } else {
                self.state.loaded_title()
            };
        } else {
            self.state.stage = LifecycleStage::Filtered;
            self.state.list_title = if summary.visible > 0 {
                FILTERED_TITLE.to_string()
            } else {
                FILTERED_EMPTY_TITLE.to_string()
            };
        }

        debug!(
            filter = %text,
            visible = summary.visible,
            hidden = summary.hidden,
            "filter applied"
        );
        self.publish(None);
        summary
    }

    /// Empties the result list, removes its markers and resets the refine input.
    pub fn clear(&mut self) {
        self.reset_results();
        self.state.context.refine_query.clear();
        self.state.stage = self.state.resting_stage();
        info!("results cleared");
        self.publish(None);
    }

    /// Selects a place: highlights its marker, shows the snippet panel and
    /// returns the lookup the caller must resolve.
    pub fn begin_select(&mut self, id: PlaceId) -> Result<PendingLookup, ControllerError> {
        let place = self
            .state
            .results
            .select(id)
            .ok_or(ControllerError::UnknownPlace(id))?;
        let query = sanitize_article_query(&place.name, self.config.article_query_encoding);
        if let Some(marker) = &place.marker {
            self.map.open_info_window(marker, &place.name);
        }

        let token = self.state.next_selection_token();
        self.state.article = Some(ArticlePanel {
            place: id,
            header: None,
            articles: Vec::new(),
        });
        self.state.visibility.snippet = true;
        debug!(place = %id, token, "selection started");
        self.publish(None);

        Ok(PendingLookup { token, place: id, query })
    }

    /// Applies a lookup response unless a newer selection superseded it.
    pub fn complete_select(
        &mut self,
        pending: PendingLookup,
        result: Result<Vec<ArticleResult>, LookupError>,
    ) -> SelectionOutcome {
        if !self.state.is_current_selection(pending.token) {
            debug!(
                place = %pending.place,
                token = pending.token,
                current = self.state.selection_token,
                "discarding stale article response"
            );
            return SelectionOutcome::Discarded;
        }

        let query = &pending.query;
        let (header, articles, notice) = match result {
            Ok(mut articles) if !articles.is_empty() => {
                articles.truncate(self.config.max_articles);
                (format!("Wikipedia Articles About {query}:"), articles, None)
            }
            Ok(_) | Err(LookupError::NoMatch { .. }) => (
                format!("No Wikipedia articles about {query}."),
                Vec::new(),
                None,
            ),
            Err(LookupError::Timeout { timeout_ms }) => {
                warn!(query = %query, timeout_ms, "article lookup timed out");
                (
                    "Wikipedia lookup timed out.".to_string(),
                    Vec::new(),
                    Some(Notice::error(format!(
                        "Timed out after {timeout_ms} ms retrieving Wikipedia articles."
                    ))),
                )
            }
            Err(LookupError::Transport(details)) => {
                warn!(query = %query, error = %details, "article lookup failed");
                (
                    "Error retrieving Wikipedia articles.".to_string(),
                    Vec::new(),
                    Some(Notice::error(
                        "Network error. Failed to retrieve Wikipedia articles.",
                    )),
                )
            }
        };

        self.state.article = Some(ArticlePanel {
            place: pending.place,
            header: Some(header),
            articles,
        });
        self.publish(notice);
        SelectionOutcome::Shown
    }

    /// `begin_select`, one lookup, `complete_select`.
    pub async fn select(&mut self, id: PlaceId) -> Result<SelectionOutcome, ControllerError> {
        let pending = self.begin_select(id)?;
        let result = self.lookup_articles(pending.query()).await;
        Ok(self.complete_select(pending, result))
    }

    /// Queries the article provider under the configured timeout. With a
    /// single-article limit only the top ranked match is requested.
    pub async fn lookup_articles(&self, query: &str) -> Result<Vec<ArticleResult>, LookupError> {
        let timeout = self.config.lookup_timeout();
        let lookup = async {
            if self.config.max_articles == 1 {
                self.articles.lookup(query).await.map(|article| vec![article])
            } else {
                self.articles.search_articles(query).await
            }
        };
        match tokio::time::timeout(timeout, lookup).await {
            Ok(result) => result,
            Err(_) => Err(LookupError::Timeout {
                timeout_ms: self.config.lookup_timeout_ms,
            }),
        }
    }

    fn load_places(&mut self, raw: Vec<RawPlace>) -> usize {
        let mut places = Vec::with_capacity(raw.len().min(self.config.max_place_results));
        for place in raw.into_iter().take(self.config.max_place_results) {
            let id = PlaceId(self.next_place_id);
            self.next_place_id += 1;
            let marker = self.map.add_marker(place.coordinates, &place.name);
            places.push(PlaceResult {
                id,
                name: place.name,
                coordinates: place.coordinates,
                raw_metadata: place.metadata,
                marker: Some(marker),
            });
        }

        let loaded = places.len();
        self.state.results.replace(places);
        loaded
    }

    fn reset_results(&mut self) {
        self.state.results.clear(&mut self.map);
        self.state.filter_text.clear();
        self.state.list_title.clear();
        self.state.list_footer.clear();
        self.state.visibility.results = false;
        self.state.drop_article();
    }

    fn publish(&mut self, notice: Option<Notice>) {
        self.revision += 1;
        self.last_notice = notice.clone();
        self.bus.emit(ViewUpdate {
            revision: self.revision,
            emitted_at: Utc::now(),
            snapshot: ViewSnapshot::from_state(&self.state),
            notice,
        });
    }
}
