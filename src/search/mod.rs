//! Query-execution result model: searchers, matches, pooling, and memory
//! accounting.

pub mod collector;
pub mod context;
pub mod document_match;
pub mod explanation;
pub mod location;
pub mod mem_tracker;
pub mod pool;
pub mod scorer;
pub mod searcher;
pub mod size;

pub use self::collector::{CountCollector, TopScoreCollector};
pub use self::context::{SearchContext, SearcherOptions};
pub use self::document_match::{DocumentMatch, DocumentMatchCollection};
pub use self::explanation::Explanation;
pub use self::location::{FieldFragmentMap, FieldTermLocationMap, Location, TermLocationMap};
pub use self::mem_tracker::MemTracker;
pub use self::pool::DocumentMatchPool;
pub use self::searcher::Searcher;
