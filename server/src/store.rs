//! In-memory, insert-only content store.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use super::error::StoreError;
use super::models::{Article, ArticleQuery, Editor, Issue, QueryMode, Stats};
use super::seed::SeedData;

#[derive(Default)]
struct Tables {
	articles: BTreeMap<u32, Article>,
	issues: BTreeMap<u32, Issue>,
	editors: BTreeMap<u32, Editor>,
}

#[derive(Default)]
pub struct Store {
	tables: RwLock<Tables>,
}

/// Picks the id for a new row: the requested one if free, else the next
/// after the largest in use.
fn assign_id<T>(table: &BTreeMap<u32, T>, requested: u32, kind: &'static str) -> Result<u32, StoreError> {
	if requested == 0 {
		return match table.keys().next_back() {
			None => Ok(1),
			Some(&last) => last
				.checked_add(1)
				.ok_or(StoreError::IdsExhausted { kind, last }),
		};
	}
	if table.contains_key(&requested) {
		return Err(StoreError::DuplicateId {
			kind,
			id: requested,
		});
	}
	Ok(requested)
}

impl Store {
	pub fn new() -> Self {
		Self::default()
	}

	/// Builds a store from seed data, failing on the first rejected row.
	pub fn seeded(seed: SeedData) -> Result<Self, StoreError> {
		let store = Self::new();
		for editor in seed.editors {
			store.create_editor(editor)?;
		}
		for issue in seed.issues {
			store.create_issue(issue)?;
		}
		for article in seed.articles {
			store.create_article(article)?;
		}
		Ok(store)
	}

	fn read(&self) -> RwLockReadGuard<'_, Tables> {
		self.tables.read().unwrap_or_else(PoisonError::into_inner)
	}

	fn write(&self) -> RwLockWriteGuard<'_, Tables> {
		self.tables.write().unwrap_or_else(PoisonError::into_inner)
	}

	pub fn create_article(&self, mut article: Article) -> Result<Article, StoreError> {
		let mut tables = self.write();
		article.id = assign_id(&tables.articles, article.id, "article")?;
		debug!("Created article {} ({:?})", article.id, article.status);
		tables.articles.insert(article.id, article.clone());
		Ok(article)
	}

	/// At most one issue may be current; a second is rejected.
	pub fn create_issue(&self, mut issue: Issue) -> Result<Issue, StoreError> {
		let mut tables = self.write();
		let id = assign_id(&tables.issues, issue.id, "issue")?;
		if issue.current {
			if let Some(existing) = tables.issues.values().find(|i| i.current) {
				return Err(StoreError::CurrentIssueConflict {
					existing: existing.id,
					rejected: id,
				});
			}
		}
		issue.id = id;
		debug!("Created issue {} (vol. {} no. {})", id, issue.volume, issue.issue);
		tables.issues.insert(id, issue.clone());
		Ok(issue)
	}

	pub fn create_editor(&self, mut editor: Editor) -> Result<Editor, StoreError> {
		let mut tables = self.write();
		editor.id = assign_id(&tables.editors, editor.id, "editor")?;
		tables.editors.insert(editor.id, editor.clone());
		Ok(editor)
	}

	/// Published articles matching `query`, newest first.
	pub fn articles(&self, query: &ArticleQuery) -> Vec<Article> {
		let mode = query.mode();
		let tables = self.read();
		let mut articles: Vec<Article> = tables
			.articles
			.values()
			.filter(|a| a.is_published())
			.filter(|a| match &mode {
				QueryMode::Search(needle) => a.matches(needle),
				QueryMode::Featured => a.featured,
				QueryMode::Category(category) => a.category == *category,
				QueryMode::All => true,
			})
			.cloned()
			.collect();
		articles.sort_by(|a, b| {
			b.published_at
				.cmp(&a.published_at)
				.then(a.id.cmp(&b.id))
		});
		articles
	}

	/// Any article by id, whatever its status.
	pub fn article(&self, id: u32) -> Option<Article> {
		self.read().articles.get(&id).cloned()
	}

	pub fn editors(&self) -> Vec<Editor> {
		self.read().editors.values().cloned().collect()
	}

	/// Newest volume and issue first.
	pub fn issues(&self) -> Vec<Issue> {
		let mut issues: Vec<Issue> = self.read().issues.values().cloned().collect();
		issues.sort_by(|a, b| {
			(b.volume, b.issue)
				.cmp(&(a.volume, a.issue))
				.then(a.id.cmp(&b.id))
		});
		issues
	}

	pub fn current_issue(&self) -> Option<Issue> {
		self.read().issues.values().find(|i| i.current).cloned()
	}

	pub fn stats(&self, readers_per_article: u64) -> Stats {
		let tables = self.read();
		let published: Vec<&Article> = tables.articles.values().filter(|a| a.is_published()).collect();
		let authors: BTreeSet<&str> = published
			.iter()
			.flat_map(|a| a.authors.iter().map(String::as_str))
			.collect();
		let count = published.len() as u64;

		Stats {
			published_articles: count,
			authors: authors.len() as u64,
			monthly_readers: count.saturating_mul(readers_per_article),
			total_citations: published.iter().map(|a| a.citations as u64).sum(),
		}
	}
}
