pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod map;
pub mod models;
pub mod providers;
pub mod results;
pub mod state;
pub mod traits;

pub use config::{MapConfig, QueryEncoding};
pub use controller::{MapController, PendingLookup, SelectionOutcome};
pub use error::{ConfigError, ControllerError, GeocodeError, LookupError, SearchError};
pub use events::{
    ArticleView, ListedPlace, Notice, NoticeLevel, ViewBus, ViewSnapshot, ViewUpdate,
};
pub use map::{HeadlessMap, MapSurface, MapView, MarkerHandle};
pub use models::{ArticleResult, Coordinates, PlaceId, PlaceResult, RawPlace, SearchContext};
pub use providers::{GoogleMapsProvider, WikipediaProvider};
pub use results::{FilterSummary, ResultList};
pub use state::{AppState, LifecycleStage, Visibility};
pub use traits::{ArticleProvider, PlaceProvider};
