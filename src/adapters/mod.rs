// Adapters layer: concrete implementations for external systems (filesystem, tracking store).

pub mod local;
pub mod tracking;

pub use local::{LocalFileSource, LocalStorage};
pub use tracking::{
    tracking_store_from_uri, FileTrackingStore, HttpTrackingStore, TrackingRunSource,
};
