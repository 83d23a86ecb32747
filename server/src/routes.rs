use std::sync::Arc;

use axum::{
	Json,
	extract::{Path, Query, State},
};

use super::{
	error::AppError,
	models::{Article, ArticleQuery, Editor, Issue, Stats},
	state::AppState,
};

pub async fn articles_handler(
	State(state): State<Arc<AppState>>,
	Query(query): Query<ArticleQuery>,
) -> Json<Vec<Article>> {
	Json(state.store.articles(&query))
}

pub async fn article_handler(
	State(state): State<Arc<AppState>>,
	Path(id): Path<u32>,
) -> Result<Json<Article>, AppError> {
	state
		.store
		.article(id)
		.map(Json)
		.ok_or(AppError::NotFound("Article"))
}

pub async fn editors_handler(State(state): State<Arc<AppState>>) -> Json<Vec<Editor>> {
	Json(state.store.editors())
}

pub async fn issues_handler(State(state): State<Arc<AppState>>) -> Json<Vec<Issue>> {
	Json(state.store.issues())
}

pub async fn current_issue_handler(
	State(state): State<Arc<AppState>>,
) -> Result<Json<Issue>, AppError> {
	state
		.store
		.current_issue()
		.map(Json)
		.ok_or(AppError::NotFound("Current issue"))
}

pub async fn stats_handler(State(state): State<Arc<AppState>>) -> Json<Stats> {
	Json(state.store.stats(state.config.readers_per_article))
}
