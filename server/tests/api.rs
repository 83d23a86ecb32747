#![allow(unused_crate_dependencies)]

use axum::{
	Router,
	body::Body,
	http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use journal_api::{
	config::Config,
	models::{Article, ArticleStatus, Issue},
	router,
	seed::SeedData,
	state::AppState,
	store::Store,
};
use serde_json::Value;
use tower::ServiceExt;

fn app(seed: SeedData) -> Router {
	let store = Store::seeded(seed).unwrap();
	router(AppState::with_store(Config::default(), store))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
	let response = app
		.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
		.await
		.unwrap();
	let status = response.status();
	let bytes = response.into_body().collect().await.unwrap().to_bytes();
	let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
	(status, body)
}

fn titles(body: &Value) -> Vec<&str> {
	body.as_array()
		.unwrap()
		.iter()
		.map(|a| a["title"].as_str().unwrap())
		.collect()
}

fn article(title: &str, status: ArticleStatus, category: &str, featured: bool, date: &str) -> Article {
	Article {
		id: 0,
		title: title.into(),
		summary: format!("Notes on {title}"),
		content: String::new(),
		authors: vec!["Student Author".into()],
		keywords: Vec::new(),
		category: category.into(),
		status,
		volume: 1,
		issue: 1,
		featured,
		read_time: 4,
		citations: 1,
		published_at: date.into(),
	}
}

#[tokio::test]
async fn test_draft_is_listed_nowhere_but_fetchable_by_id() {
	let app = app(SeedData {
		articles: vec![
			article("Draft Work", ArticleStatus::Draft, "Biology", true, "2024-06-01"),
			article("Published Work", ArticleStatus::Published, "Biology", false, "2024-01-01"),
		],
		..SeedData::default()
	});

	let (status, body) = get(app.clone(), "/api/articles").await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(titles(&body), ["Published Work"]);

	for uri in [
		"/api/articles?featured=true",
		"/api/articles?category=Biology",
		"/api/articles?search=draft",
	] {
		let (_, body) = get(app.clone(), uri).await;
		assert!(!titles(&body).contains(&"Draft Work"), "{uri}");
	}

	let (status, body) = get(app, "/api/articles/1").await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["title"], "Draft Work");
	assert_eq!(body["status"], "draft");
}

#[tokio::test]
async fn test_query_modes_take_precedence_in_order() {
	let app = app(SeedData {
		articles: vec![
			article("Featured Physics", ArticleStatus::Published, "Physics", true, "2024-03-01"),
			article("Plain Physics", ArticleStatus::Published, "Physics", false, "2024-02-01"),
			article("Featured Chemistry", ArticleStatus::Published, "Chemistry", true, "2024-01-01"),
		],
		..SeedData::default()
	});

	let (_, body) = get(app.clone(), "/api/articles?search=plain&featured=true&category=Chemistry").await;
	assert_eq!(titles(&body), ["Plain Physics"]);

	let (_, body) = get(app.clone(), "/api/articles?featured=true&category=Physics").await;
	assert_eq!(titles(&body), ["Featured Physics", "Featured Chemistry"]);

	let (_, body) = get(app.clone(), "/api/articles?featured=false&category=Physics").await;
	assert_eq!(titles(&body), ["Featured Physics", "Plain Physics"]);

	let (_, body) = get(app.clone(), "/api/articles?search=").await;
	assert_eq!(body.as_array().unwrap().len(), 3);

	let (status, body) = get(app.clone(), "/api/articles?category=&search=&featured=").await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(
		titles(&body),
		["Featured Physics", "Plain Physics", "Featured Chemistry"]
	);

	let (status, body) = get(app, "/api/articles?featured=1&category=Chemistry").await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(titles(&body), ["Featured Chemistry"]);
}

#[tokio::test]
async fn test_current_issue_and_issue_order() {
	let app = app(SeedData::journal());

	let (status, body) = get(app.clone(), "/api/issues/current").await;
	assert_eq!(status, StatusCode::OK);
	let current: Issue = serde_json::from_value(body).unwrap();
	assert!(current.current);

	let (_, body) = get(app, "/api/issues").await;
	let issues: Vec<Issue> = serde_json::from_value(body).unwrap();
	assert_eq!(issues.iter().filter(|i| i.current).count(), 1);
	assert!(
		issues
			.windows(2)
			.all(|w| (w[0].volume, w[0].issue) >= (w[1].volume, w[1].issue))
	);
	assert!(issues.iter().all(|i| i.pdf_url.is_some()));
}

#[tokio::test]
async fn test_missing_things_are_404() {
	let app = app(SeedData::default());

	let (status, _) = get(app.clone(), "/api/articles/999").await;
	assert_eq!(status, StatusCode::NOT_FOUND);

	let (status, _) = get(app.clone(), "/api/issues/current").await;
	assert_eq!(status, StatusCode::NOT_FOUND);

	let (status, body) = get(app, "/api/editors").await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body, Value::Array(Vec::new()));
}

#[tokio::test]
async fn test_stats_are_derived() {
	let mut reviewed = article("Under Review", ArticleStatus::Review, "Physics", false, "2024-05-01");
	reviewed.citations = 50;
	let mut second = article("Second", ArticleStatus::Published, "Physics", false, "2024-04-01");
	second.authors = vec!["Student Author".into(), "Co Author".into()];
	second.citations = 3;

	let app = app(SeedData {
		articles: vec![
			article("First", ArticleStatus::Published, "Physics", false, "2024-03-01"),
			second,
			reviewed,
		],
		..SeedData::default()
	});

	let (status, body) = get(app, "/api/stats").await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["publishedArticles"], 2);
	assert_eq!(body["authors"], 2);
	assert_eq!(body["monthlyReaders"], 500);
	assert_eq!(body["totalCitations"], 4);
}

#[test]
fn test_two_current_issues_refuse_to_seed() {
	let mut seed = SeedData::journal();
	seed.issues[0].current = true;
	assert!(Store::seeded(seed).is_err());
}
