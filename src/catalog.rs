//! The fixed topic catalog and the search filter over it.
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

/// A selectable subject. Cheap to clone; compared by text.
pub type Topic = Arc<str>;

/// Reference catalog, in display order.
pub const DEFAULT_TOPICS: [&str; 15] = [
    "Ancient Civilizations",
    "Quantum Physics",
    "Renaissance Art",
    "Marine Biology",
    "Space Exploration",
    "World History",
    "Philosophy",
    "Computer Science",
    "Climate Science",
    "Mythology",
    "Architecture",
    "Neuroscience",
    "Economics",
    "Music Theory",
    "Linguistics",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("Topic catalog is empty")]
    Empty,

    #[error("Topic catalog contains a blank entry")]
    BlankTopic,

    #[error("Duplicate topic in catalog: '{0}'")]
    Duplicate(String),
}

/// Ordered, immutable list of topics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicCatalog {
    topics: Arc<[Topic]>,
}

impl TopicCatalog {
    /// Build a catalog, trimming entries and rejecting blanks and
    /// case-insensitive duplicates.
    pub fn new<I, S>(topics: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut list: Vec<Topic> = Vec::new();

        for topic in topics {
            let topic = topic.as_ref().trim();
            if topic.is_empty() {
                return Err(CatalogError::BlankTopic);
            }
            if !seen.insert(topic.to_lowercase()) {
                return Err(CatalogError::Duplicate(topic.to_string()));
            }
            list.push(Arc::from(topic));
        }

        if list.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(Self {
            topics: list.into(),
        })
    }

    /// Catalog entries in order.
    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Look up the catalog's own handle for `name` (exact match).
    pub fn get(&self, name: &str) -> Option<&Topic> {
        self.topics.iter().find(|t| &***t == name)
    }

    /// Topics containing `query` case-insensitively, in catalog order.
    ///
    /// An empty query matches everything.
    pub fn filter(&self, query: &str) -> Vec<Topic> {
        let needle = query.to_lowercase();
        self.topics
            .iter()
            .filter(|t| needle.is_empty() || t.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }
}

impl Default for TopicCatalog {
    fn default() -> Self {
        Self {
            topics: DEFAULT_TOPICS.iter().map(|t| Arc::from(*t)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_default_catalog_has_fifteen_topics() {
        let catalog = TopicCatalog::default();
        assert_eq!(catalog.len(), 15);
        assert_eq!(&*catalog.topics()[0], "Ancient Civilizations");
        assert_eq!(TopicCatalog::new(DEFAULT_TOPICS).unwrap(), catalog);
    }

    #[test]
    fn test_empty_catalog_rejected() {
        assert_eq!(
            TopicCatalog::new(Vec::<String>::new()),
            Err(CatalogError::Empty)
        );
    }

    #[test]
    fn test_duplicate_case_insensitive_rejected() {
        assert_eq!(
            TopicCatalog::new(["Physics", "physics"]),
            Err(CatalogError::Duplicate("physics".to_string()))
        );
    }

    #[test]
    fn test_blank_topic_rejected() {
        assert_eq!(
            TopicCatalog::new(["Art", "   "]),
            Err(CatalogError::BlankTopic)
        );
    }

    #[test]
    fn test_filter_case_insensitive() {
        let catalog = TopicCatalog::default();
        let found: Vec<String> = catalog
            .filter("SCIENCE")
            .iter()
            .map(|t| t.to_string())
            .collect();
        assert_eq!(
            found,
            vec!["Computer Science", "Climate Science", "Neuroscience"]
        );
    }

    #[test]
    fn test_filter_no_match() {
        assert!(TopicCatalog::default().filter("zzz").is_empty());
    }

    #[test]
    fn test_get_returns_catalog_handle() {
        let catalog = TopicCatalog::default();
        assert!(catalog.get("Philosophy").is_some());
        assert!(catalog.get("philosophy").is_none());
    }

    proptest! {
        #[test]
        fn prop_filter_matches_exactly_containing_topics(query in "[a-zA-Z ]{0,6}") {
            let catalog = TopicCatalog::default();
            let filtered = catalog.filter(&query);
            let needle = query.to_lowercase();

            for topic in &filtered {
                prop_assert!(topic.to_lowercase().contains(&needle));
            }
            let expected: Vec<Topic> = catalog
                .topics()
                .iter()
                .filter(|t| t.to_lowercase().contains(&needle))
                .cloned()
                .collect();
            prop_assert_eq!(filtered, expected);
        }
    }
}
