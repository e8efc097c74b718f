pub mod google;
pub mod wikipedia;

pub use google::GoogleMapsProvider;
pub use wikipedia::WikipediaProvider;
