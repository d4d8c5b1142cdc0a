pub mod aggregate;
pub mod api;
pub mod cache;
pub mod config;
pub mod enrich;
pub mod growth;
pub mod model;
pub mod output;
pub mod service;
pub mod view;

pub use aggregate::{aggregate_by_author, AuthorStats};
pub use cache::Cache;
pub use config::Config;
pub use enrich::enrich;
pub use growth::{compute_growth, Growth};
pub use model::{DaySnapshot, Extension, History, User};
pub use service::{Listings, StoreService};
