pub mod names;
pub mod patterns;
pub mod provider;
pub mod series_cache;
pub mod sqlite_store;

pub use names::NameDirectory;
pub use patterns::{QueryRequest, QueryResponse, QueryService};
pub use provider::{FetchSpan, SeriesProvider, SeriesSource, SourceOutcome};
pub use series_cache::SeriesCache;
pub use sqlite_store::SqliteStore;
