//! Marker index, search/filter engine and view-state synchronization for the
//! vending location map.
//!
//! The crate never renders anything. A concrete widget implements
//! [`MapView`]; [`MapSession`] keeps the store, the visible marker set, the
//! camera target and the presentation mode consistent on top of it.

pub mod boundary;
pub mod camera;
pub mod geo;
pub mod headless;
pub mod presentation;
pub mod record;
pub mod search;
pub mod session;
pub mod store;
pub mod sync;
pub mod view;

pub use boundary::{BoundaryError, BoundaryFeature, BoundaryLayer};
pub use camera::{CameraCommand, CameraTracker, Generation};
pub use geo::{Bounds, Coordinate, Padding};
pub use headless::HeadlessMap;
pub use presentation::{PresentationController, PresentationMode, ThemeMode};
pub use record::{LocationRecord, OpeningHours, RejectReason};
pub use search::{search, search_by_location, search_by_name, SearchField, SearchQuery};
pub use session::{GeolocationError, MapSession, Notice};
pub use store::{DirectoryEntry, IngestReport, LocationStore, StoreEntry};
pub use sync::ViewSync;
pub use view::{Animation, MapEvent, MapView, MarkerHandle, MarkerKind};
