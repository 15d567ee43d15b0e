//! Article providers.
//!
//! The navigator never fetches anything itself. A source is awaited once per
//! load by a background task and its result handed to `FeedNavigator::load`.

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use super::types::{validate_articles, Article, FeedError};
use crate::util::strip_control_chars;

/// Maximum accepted size of an article JSON file (8 MB).
const MAX_ARTICLES_FILE_SIZE: u64 = 8 * 1_048_576;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to read articles file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid article JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Articles file too large: {0} bytes")]
    TooLarge(u64),

    #[error(transparent)]
    Invalid(#[from] FeedError),
}

/// An asynchronous provider of the initial article list.
#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// Short label for logs.
    fn name(&self) -> &str;

    /// Produce the full article list. Resolves exactly once per call.
    async fn fetch(&self) -> Result<Vec<Article>, SourceError>;
}

// ============================================================================
// Built-in sample feed
// ============================================================================

/// The bundled three-article feed, served after a simulated network delay.
pub struct SampleSource {
    delay: Duration,
}

impl SampleSource {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl ArticleSource for SampleSource {
    fn name(&self) -> &str {
        "sample"
    }

    async fn fetch(&self) -> Result<Vec<Article>, SourceError> {
        tokio::time::sleep(self.delay).await;
        Ok(sample_articles())
    }
}

fn sample_article(
    id: &str,
    title: &str,
    excerpt: &str,
    categories: &[&str],
    stats: (u32, u64, u64, f64, u32),
    thumbnail_url: &str,
) -> Article {
    let (reading_time, view_count, edit_count, quality, citations) = stats;
    Article {
        id: Arc::from(id),
        title: Arc::from(title),
        excerpt: Arc::from(excerpt),
        categories: categories.iter().map(|c| Arc::from(*c)).collect(),
        reading_time,
        view_count,
        edit_count,
        quality,
        thumbnail_url: Arc::from(thumbnail_url),
        citations,
    }
}

/// The sample articles shipped with the application.
pub fn sample_articles() -> Vec<Article> {
    vec![
        sample_article(
            "1",
            "The History of Computing",
            "From early mechanical calculators to modern supercomputers, how computing evolved over centuries.",
            &["Technology", "History", "Science"],
            (3, 12_432, 347, 4.8, 45),
            "https://images.unsplash.com/photo-1486312338219-ce68d2c6f44d",
        ),
        sample_article(
            "2",
            "Deep Ocean Ecosystems",
            "Exploring the mysterious world of deep sea creatures and their unique adaptations.",
            &["Biology", "Ocean", "Ecology"],
            (4, 8_765, 206, 4.5, 32),
            "https://images.unsplash.com/photo-1518020382113-a7e8fc38eac9",
        ),
        sample_article(
            "3",
            "Renaissance Art Movement",
            "The cultural and artistic rebirth across Europe from the 14th to 17th centuries.",
            &["Art", "History", "Culture"],
            (5, 10_932, 289, 4.9, 58),
            "https://images.unsplash.com/photo-1574182245530-967d9b3831af",
        ),
    ]
}

// ============================================================================
// JSON file source
// ============================================================================

/// Reads a JSON array of articles from disk.
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ArticleSource for JsonFileSource {
    fn name(&self) -> &str {
        "json-file"
    }

    async fn fetch(&self) -> Result<Vec<Article>, SourceError> {
        let io_err = |source| SourceError::Io {
            path: self.path.clone(),
            source,
        };

        let meta = tokio::fs::metadata(&self.path).await.map_err(io_err)?;
        if meta.len() > MAX_ARTICLES_FILE_SIZE {
            return Err(SourceError::TooLarge(meta.len()));
        }

        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(io_err)?;
        let articles = parse_articles(&content)?;
        tracing::info!(
            path = %self.path.display(),
            count = articles.len(),
            "Loaded articles from file"
        );
        Ok(articles)
    }
}

/// Parse, sanitize and validate a JSON article list.
pub fn parse_articles(json: &str) -> Result<Vec<Article>, SourceError> {
    let mut articles: Vec<Article> = serde_json::from_str(json)?;
    for article in &mut articles {
        sanitize(article);
    }
    validate_articles(&articles)?;
    Ok(articles)
}

/// Strip terminal control sequences from displayed text.
fn sanitize(article: &mut Article) {
    fn clean(field: &mut Arc<str>) {
        let stripped = match strip_control_chars(field.as_ref()) {
            Cow::Owned(s) => s,
            Cow::Borrowed(_) => return,
        };
        *field = Arc::from(stripped);
    }
    clean(&mut article.title);
    clean(&mut article.excerpt);
    for category in &mut article.categories {
        clean(category);
    }
}
