pub mod delegated;
pub mod enrich;
pub mod patterns;
pub mod source;
pub mod traits;

pub use delegated::LlmExtractor;
pub use patterns::PatternExtractor;
pub use source::ListingSource;
pub use traits::{ContentSource, ListingExtractor};
