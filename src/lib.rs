pub mod catalog;
pub mod config;
pub mod covers;
pub mod pipeline;
pub mod providers;
pub mod session;

// --- Library API for embedding ---

/// Convenience re-exports for embedders.
pub mod prelude {
    pub use crate::catalog::CatalogEntry;
    pub use crate::config::FetchConfig;
    pub use crate::pipeline::{run, scan_status, RunReport};
    pub use crate::providers::CoverProvider;
    pub use crate::session::{Identity, Session};
}
