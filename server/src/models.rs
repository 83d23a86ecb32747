//! Content entities as served to the site. All fields serialize camelCase.
//!
//! An `id` of `0` on an entity handed to the store means "assign one".

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
	Published,
	Draft,
	Review,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
	#[serde(default)]
	pub id: u32,
	pub title: String,
	#[serde(rename = "abstract")]
	pub summary: String,
	pub content: String,
	pub authors: Vec<String>,
	#[serde(default)]
	pub keywords: Vec<String>,
	pub category: String,
	pub status: ArticleStatus,
	pub volume: u32,
	pub issue: u32,
	#[serde(default)]
	pub featured: bool,
	/// Minutes.
	pub read_time: u32,
	#[serde(default)]
	pub citations: u32,
	/// ISO 8601 date, e.g. `2024-03-15`.
	pub published_at: String,
}

impl Article {
	pub fn is_published(&self) -> bool {
		self.status == ArticleStatus::Published
	}

	/// Case-insensitive match over title, abstract, authors and keywords.
	/// `needle` must already be lowercase.
	pub fn matches(&self, needle: &str) -> bool {
		let hit = |text: &str| text.to_lowercase().contains(needle);
		hit(&self.title)
			|| hit(&self.summary)
			|| self.authors.iter().any(|a| hit(a))
			|| self.keywords.iter().any(|k| hit(k))
	}
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
	#[serde(default)]
	pub id: u32,
	pub volume: u32,
	pub issue: u32,
	pub title: String,
	pub description: String,
	#[serde(default)]
	pub current: bool,
	pub published_at: String,
	#[serde(default)]
	pub pdf_url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Editor {
	#[serde(default)]
	pub id: u32,
	pub name: String,
	pub title: String,
	pub specialization: String,
	pub bio: String,
}

/// Derived on every request; never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
	pub published_articles: u64,
	pub authors: u64,
	pub monthly_readers: u64,
	pub total_citations: u64,
}

/// Query string of `GET /api/articles`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ArticleQuery {
	pub category: Option<String>,
	pub search: Option<String>,
	/// Only the literal `true` selects featured articles; anything else,
	/// blank included, is ignored.
	pub featured: Option<String>,
}

/// The single filter an article query resolves to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryMode {
	/// Lowercased search text.
	Search(String),
	Featured,
	Category(String),
	All,
}

impl ArticleQuery {
	/// Search wins over featured, featured over category. Blank strings count
	/// as absent.
	pub fn mode(&self) -> QueryMode {
		let present = |value: &Option<String>| {
			value
				.as_deref()
				.map(str::trim)
				.filter(|v| !v.is_empty())
				.map(str::to_string)
		};

		if let Some(search) = present(&self.search) {
			QueryMode::Search(search.to_lowercase())
		} else if self.featured.as_deref().map(str::trim) == Some("true") {
			QueryMode::Featured
		} else if let Some(category) = present(&self.category) {
			QueryMode::Category(category)
		} else {
			QueryMode::All
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_query_mode_precedence() {
		let query = ArticleQuery {
			category: Some("Neuroscience".into()),
			search: Some("  Memory ".into()),
			featured: Some("true".into()),
		};
		assert_eq!(query.mode(), QueryMode::Search("memory".into()));

		let query = ArticleQuery {
			search: Some("   ".into()),
			..query
		};
		assert_eq!(query.mode(), QueryMode::Featured);

		for featured in ["false", "", "1", "yes"] {
			let query = ArticleQuery {
				featured: Some(featured.into()),
				..query.clone()
			};
			assert_eq!(query.mode(), QueryMode::Category("Neuroscience".into()));
		}

		assert_eq!(ArticleQuery::default().mode(), QueryMode::All);
	}

	#[test]
	fn test_article_json_shape() {
		let json = r#"{
			"title": "T",
			"abstract": "A",
			"content": "C",
			"authors": ["Ada"],
			"category": "Physics",
			"status": "draft",
			"volume": 1,
			"issue": 2,
			"readTime": 7,
			"publishedAt": "2024-01-01"
		}"#;
		let article: Article = serde_json::from_str(json).unwrap();
		assert_eq!(article.id, 0);
		assert_eq!(article.status, ArticleStatus::Draft);
		assert_eq!(article.summary, "A");

		let value = serde_json::to_value(&article).unwrap();
		assert_eq!(value["readTime"], 7);
		assert_eq!(value["abstract"], "A");
		assert_eq!(value["publishedAt"], "2024-01-01");
	}
}
