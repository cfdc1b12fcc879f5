//! CLI commands implementation

pub mod backup;
pub mod crawl;
pub mod query;
pub mod status;

pub use backup::*;
pub use crawl::*;
pub use query::*;
pub use status::*;
