pub mod engine;
pub mod normalize;
pub mod query;
pub mod quota;

pub use engine::{Collection, Collector, Outcome, Shortfall};
pub use normalize::normalize;
pub use query::{resolve_query, ResolvedQuery};
pub use quota::effective_count;
