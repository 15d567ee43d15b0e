//! The article feed: data model, navigation state machine, and article sources.
//!
//! - [`types`] - `Article` and its validation rules
//! - [`navigator`] - `FeedNavigator`, the advance/wrap/random-jump state machine
//! - [`source`] - async `ArticleSource` providers (bundled sample, JSON file)
//!
//! # Example
//!
//! ```
//! use scrollscholar::feed::{sample_articles, Advance, FastRandIndex, FeedNavigator};
//!
//! let mut nav = FeedNavigator::new(Box::new(FastRandIndex::seeded(42)));
//! nav.load(sample_articles());
//! assert_eq!(nav.advance(), Ok(Advance::Next(1)));
//! ```

mod navigator;
mod source;
mod types;

pub use navigator::{Advance, FastRandIndex, FeedEvent, FeedNavigator, RandomIndex};
pub use source::{
    parse_articles, sample_articles, ArticleSource, JsonFileSource, SampleSource, SourceError,
};
pub use types::{validate_articles, Article, FeedError, MAX_QUALITY};

#[cfg(test)]
pub(crate) use types::test_article;
