pub mod config;
pub mod controller;
pub mod db;
pub mod error;
pub mod filter;
pub mod models;
pub mod records;
pub mod sort;
pub mod store;
pub mod summary;

pub use controller::{View, ViewController, ViewState};
pub use filter::{FilterCategory, FilterState, filter_jobs};
pub use models::{JobRecord, JobStatus, VisaSponsorship};
pub use sort::{SortDirection, SortField, SortKey, SortState, sort_jobs};
pub use store::{MemoryStore, Persistence, SnapshotStore};
pub use summary::{Summary, summarize};
