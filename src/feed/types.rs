use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Feed navigation and validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedError {
    /// Navigation was attempted before any articles were loaded.
    #[error("No articles loaded yet")]
    EmptyFeed,

    /// A direct jump targeted an index past the end of the feed.
    #[error("Article index {index} out of range (feed has {len} articles)")]
    IndexOutOfRange { index: usize, len: usize },

    /// An article failed validation at load time.
    #[error("Invalid article '{id}': {reason}")]
    InvalidArticle { id: String, reason: String },

    /// Two articles in one load share the same id.
    #[error("Duplicate article id '{0}'")]
    DuplicateArticle(String),
}

// ============================================================================
// Article
// ============================================================================

/// Highest possible quality rating.
pub const MAX_QUALITY: f64 = 5.0;

/// A knowledge article shown as one card in the feed.
///
/// Text fields use `Arc<str>` so the UI can hold onto titles (history,
/// reading list) without cloning the backing strings.
///
/// Field names follow the camelCase layout of the article JSON documents.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: Arc<str>,
    pub title: Arc<str>,
    pub excerpt: Arc<str>,
    pub categories: Vec<Arc<str>>,
    /// Estimated reading time in minutes.
    pub reading_time: u32,
    pub view_count: u64,
    pub edit_count: u64,
    /// Community quality rating in [0.0, 5.0].
    pub quality: f64,
    pub thumbnail_url: Arc<str>,
    pub citations: u32,
}

impl Article {
    /// Check the invariants the navigator relies on.
    pub fn validate(&self) -> Result<(), FeedError> {
        let invalid = |reason: &str| FeedError::InvalidArticle {
            id: self.id.to_string(),
            reason: reason.to_string(),
        };

        if self.id.trim().is_empty() {
            return Err(invalid("empty id"));
        }
        if self.categories.is_empty() {
            return Err(invalid("no categories"));
        }
        if self.reading_time == 0 {
            return Err(invalid("reading time must be at least one minute"));
        }
        if !(0.0..=MAX_QUALITY).contains(&self.quality) {
            return Err(invalid("quality must be between 0 and 5"));
        }
        Ok(())
    }

    /// Number of filled stars in the rating display.
    pub fn stars(&self) -> u8 {
        // NaN is rejected by validate(); clamp anyway so rendering never panics
        self.quality.floor().clamp(0.0, MAX_QUALITY) as u8
    }

    /// First category, used by the "Follow" shortcut.
    pub fn primary_category(&self) -> Option<&Arc<str>> {
        self.categories.first()
    }
}

/// Validate every article and reject duplicate ids.
pub fn validate_articles(articles: &[Article]) -> Result<(), FeedError> {
    let mut seen = std::collections::HashSet::with_capacity(articles.len());
    for article in articles {
        article.validate()?;
        if !seen.insert(Arc::clone(&article.id)) {
            return Err(FeedError::DuplicateArticle(article.id.to_string()));
        }
    }
    Ok(())
}

#[cfg(test)]
pub(crate) fn test_article(id: &str, title: &str) -> Article {
    Article {
        id: Arc::from(id),
        title: Arc::from(title),
        excerpt: Arc::from("An excerpt."),
        categories: vec![Arc::from("Science"), Arc::from("History")],
        reading_time: 3,
        view_count: 1200,
        edit_count: 40,
        quality: 4.5,
        thumbnail_url: Arc::from("https://example.com/thumb.jpg"),
        citations: 12,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_article_passes() {
        assert!(test_article("1", "Title").validate().is_ok());
    }

    #[test]
    fn test_empty_categories_rejected() {
        let mut article = test_article("1", "Title");
        article.categories.clear();
        assert!(matches!(
            article.validate(),
            Err(FeedError::InvalidArticle { .. })
        ));
    }

    #[test]
    fn test_zero_reading_time_rejected() {
        let mut article = test_article("1", "Title");
        article.reading_time = 0;
        assert!(article.validate().is_err());
    }

    #[test]
    fn test_quality_out_of_range_rejected() {
        let mut article = test_article("1", "Title");
        article.quality = 5.1;
        assert!(article.validate().is_err());
        article.quality = -0.1;
        assert!(article.validate().is_err());
        article.quality = f64::NAN;
        assert!(article.validate().is_err());
    }

    #[test]
    fn test_stars_floor_quality() {
        let mut article = test_article("1", "Title");
        article.quality = 4.8;
        assert_eq!(article.stars(), 4);
        article.quality = 5.0;
        assert_eq!(article.stars(), 5);
        article.quality = 0.3;
        assert_eq!(article.stars(), 0);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let articles = vec![test_article("1", "A"), test_article("1", "B")];
        assert_eq!(
            validate_articles(&articles),
            Err(FeedError::DuplicateArticle("1".to_string()))
        );
    }

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{
            "id": "7",
            "title": "Deep Ocean Ecosystems",
            "excerpt": "Exploring the deep sea.",
            "categories": ["Biology", "Ocean"],
            "readingTime": 4,
            "viewCount": 8765,
            "editCount": 206,
            "quality": 4.5,
            "thumbnailUrl": "https://example.com/ocean.jpg",
            "citations": 32
        }"#;
        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(&*article.title, "Deep Ocean Ecosystems");
        assert_eq!(article.reading_time, 4);
        assert_eq!(article.view_count, 8765);
        assert_eq!(article.categories.len(), 2);
    }
}
