pub mod feed_collector;
pub mod ordered_set;

pub use feed_collector::{FeedCollector, POST_LINK_SELECTOR};
pub use ordered_set::DiscoverySet;
