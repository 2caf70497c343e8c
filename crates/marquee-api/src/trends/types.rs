//! Trend document store types and query encoding.

use serde::{Deserialize, Serialize};

use crate::tmdb::{Movie, POSTER_BASE_URL};

/// Poster URL stored for movies that had no poster path.
///
/// Older documents were written by concatenating the base URL with a
/// missing path, so the literal `null` suffix must keep working.
pub const PLACEHOLDER_POSTER_URL: &str = "https://image.tmdb.org/t/p/w500null";

/// Attribute names of the trend collection.
pub(crate) mod attr {
    /// Search term the counter belongs to.
    pub const SEARCH_TERM: &str = "searchTerm";
    /// Number of recorded searches.
    pub const COUNT: &str = "count";
}

/// A counter document as stored in the collection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TrendDocument {
    /// Document ID.
    #[serde(rename = "$id")]
    pub id: String,
    /// Search term the counter belongs to.
    #[serde(rename = "searchTerm")]
    pub search_term: String,
    /// Number of recorded searches.
    #[serde(default)]
    pub count: u64,
    /// TMDB ID of the representative movie.
    #[serde(default)]
    pub movie_id: Option<u64>,
    /// Poster URL of the representative movie.
    #[serde(default)]
    pub poster_url: String,
    /// Title of the representative movie.
    #[serde(default)]
    pub title: String,
}

/// A page of documents returned by the list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentList<T> {
    /// Total number of matching documents.
    #[serde(default)]
    pub total: u64,
    /// Documents on this page.
    #[serde(default = "Vec::new")]
    pub documents: Vec<T>,
}

/// Payload for creating a new counter document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTrendDocument {
    /// Search term the counter belongs to.
    #[serde(rename = "searchTerm")]
    pub search_term: String,
    /// Initial count.
    pub count: u64,
    /// TMDB ID of the representative movie.
    pub movie_id: u64,
    /// Poster URL of the representative movie.
    pub poster_url: String,
    /// Title of the representative movie.
    pub title: String,
}

impl NewTrendDocument {
    /// Builds the first counter document for `term`, represented by `movie`.
    #[must_use]
    pub fn first_search(term: &str, movie: &Movie) -> Self {
        let poster_url = movie.poster_path.as_deref().map_or_else(
            || String::from(PLACEHOLDER_POSTER_URL),
            |path| format!("{POSTER_BASE_URL}{path}"),
        );
        Self {
            search_term: String::from(term),
            count: 1,
            movie_id: movie.id,
            poster_url,
            title: movie.title.clone(),
        }
    }
}

/// A ranked leaderboard entry, projected from a `TrendDocument`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendingEntry {
    /// Document ID.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Poster URL, `None` when the stored URL is the placeholder.
    pub poster_url: Option<String>,
    /// Search term that produced this entry.
    pub search_term: String,
    /// Number of recorded searches.
    pub count: u64,
}

impl From<TrendDocument> for TrendingEntry {
    fn from(doc: TrendDocument) -> Self {
        let poster_url = Some(doc.poster_url)
            .filter(|url| !url.is_empty() && url != PLACEHOLDER_POSTER_URL);
        let title = if doc.title.is_empty() {
            doc.search_term.clone()
        } else {
            doc.title
        };
        Self {
            id: doc.id,
            title,
            poster_url,
            search_term: doc.search_term,
            count: doc.count,
        }
    }
}

/// A document query, serialized to the store's JSON query syntax.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Query {
    /// Query method (`equal`, `orderDesc`, `limit`).
    method: &'static str,
    /// Target attribute.
    #[serde(skip_serializing_if = "Option::is_none")]
    attribute: Option<&'static str>,
    /// Operand values.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    values: Vec<serde_json::Value>,
}

impl Query {
    /// Matches documents whose `attribute` equals `value`.
    #[must_use]
    pub fn equal(attribute: &'static str, value: impl Into<serde_json::Value>) -> Self {
        Self {
            method: "equal",
            attribute: Some(attribute),
            values: vec![value.into()],
        }
    }

    /// Orders documents by `attribute`, highest first.
    #[must_use]
    pub const fn order_desc(attribute: &'static str) -> Self {
        Self {
            method: "orderDesc",
            attribute: Some(attribute),
            values: Vec::new(),
        }
    }

    /// Limits the number of returned documents.
    #[must_use]
    pub fn limit(limit: u32) -> Self {
        Self {
            method: "limit",
            attribute: None,
            values: vec![limit.into()],
        }
    }

    /// Encodes the query as the JSON string sent in `queries[]`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn encode(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;

    #[test]
    fn test_parse_document_list_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/trends/documents_top.json");

        // Act
        let list: DocumentList<TrendDocument> = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(list.total, 2);
        assert_eq!(list.documents[0].search_term, "batman");
        assert_eq!(list.documents[0].count, 12);
        assert_eq!(list.documents[0].movie_id, Some(268));
    }

    #[test]
    fn test_entry_keeps_real_poster() {
        // Arrange
        let json = include_str!("../../../../fixtures/trends/documents_top.json");
        let list: DocumentList<TrendDocument> = serde_json::from_str(json).unwrap();

        // Act
        let entry = TrendingEntry::from(list.documents[0].clone());

        // Assert
        assert_eq!(entry.id, "66a1f0c2003b0e6d1a2f");
        assert_eq!(entry.title, "Batman");
        assert_eq!(
            entry.poster_url.as_deref(),
            Some("https://image.tmdb.org/t/p/w500/cij4dd21v2Rk2YtUQbV5kW69WB2.jpg")
        );
    }

    #[test]
    fn test_entry_maps_placeholder_poster_to_none() {
        // Arrange
        let json = include_str!("../../../../fixtures/trends/documents_top.json");
        let list: DocumentList<TrendDocument> = serde_json::from_str(json).unwrap();

        // Act
        let entry = TrendingEntry::from(list.documents[1].clone());

        // Assert
        assert_eq!(entry.search_term, "godzilla");
        assert!(entry.poster_url.is_none());
    }

    #[test]
    fn test_entry_falls_back_to_search_term_title() {
        // Arrange
        let doc = TrendDocument {
            id: String::from("a"),
            search_term: String::from("alien"),
            count: 1,
            movie_id: None,
            poster_url: String::new(),
            title: String::new(),
        };

        // Act
        let entry = TrendingEntry::from(doc);

        // Assert
        assert_eq!(entry.title, "alien");
        assert!(entry.poster_url.is_none());
    }

    #[test]
    fn test_first_search_document() {
        // Arrange
        let movie: Movie = serde_json::from_str(
            r#"{"id":268,"title":"Batman","poster_path":"/cij4dd21v2Rk2YtUQbV5kW69WB2.jpg"}"#,
        )
        .unwrap();

        // Act
        let doc = NewTrendDocument::first_search("batman", &movie);

        // Assert
        assert_eq!(doc.count, 1);
        assert_eq!(doc.movie_id, 268);
        assert_eq!(
            doc.poster_url,
            "https://image.tmdb.org/t/p/w500/cij4dd21v2Rk2YtUQbV5kW69WB2.jpg"
        );
    }

    #[test]
    fn test_first_search_document_without_poster() {
        // Arrange
        let movie: Movie = serde_json::from_str(r#"{"id":1,"title":"Lost"}"#).unwrap();

        // Act
        let doc = NewTrendDocument::first_search("lost", &movie);

        // Assert
        assert_eq!(doc.poster_url, PLACEHOLDER_POSTER_URL);
    }

    #[test]
    fn test_query_encoding() {
        // Arrange & Act
        let equal = Query::equal(attr::SEARCH_TERM, "batman").encode().unwrap();
        let order = Query::order_desc(attr::COUNT).encode().unwrap();
        let limit = Query::limit(5).encode().unwrap();

        // Assert
        assert_eq!(
            equal,
            r#"{"method":"equal","attribute":"searchTerm","values":["batman"]}"#
        );
        assert_eq!(order, r#"{"method":"orderDesc","attribute":"count"}"#);
        assert_eq!(limit, r#"{"method":"limit","values":[5]}"#);
    }
}
