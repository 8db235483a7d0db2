//! Startup data loading for the location map.
//!
//! Both datasets (location records and boundary shapes) are read once, from a
//! local file or an HTTP endpoint. [`load_datasets`] never fails: a dataset
//! that cannot be loaded is logged and left empty.

pub mod client;
pub mod error;
pub mod loader;

pub use client::DataClient;
pub use error::FetchError;
pub use loader::{load_datasets, Datasets};
