use std::io;

use axum::{
	http::StatusCode,
	response::{IntoResponse, Response},
};
use thiserror::Error;

/// Rejected writes to the content store.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum StoreError {
	#[error("Issue {existing} is already current, refusing to mark issue {rejected} current")]
	CurrentIssueConflict { existing: u32, rejected: u32 },

	#[error("Duplicate {kind} id {id}")]
	DuplicateId { kind: &'static str, id: u32 },

	#[error("No {kind} ids left after {last}")]
	IdsExhausted { kind: &'static str, last: u32 },
}

#[derive(Error, Debug)]
pub enum AppError {
	#[error("{0} not found")]
	NotFound(&'static str),

	#[error(transparent)]
	Store(#[from] StoreError),

	#[error("Internal error: {0}")]
	Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl IntoResponse for AppError {
	fn into_response(self) -> Response {
		let status = match self {
			AppError::NotFound { .. } => StatusCode::NOT_FOUND,
			AppError::Store { .. } => StatusCode::CONFLICT,
			AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
		};

		(status, self.to_string()).into_response()
	}
}

/// Failures that stop the server from starting or keep it from serving.
#[derive(Error, Debug)]
pub enum StartupError {
	#[error("Failed to read seed file {path}: {source}")]
	SeedRead { path: String, source: io::Error },

	#[error("Invalid seed file {path}: {source}")]
	SeedParse {
		path: String,
		source: serde_json::Error,
	},

	#[error("Invalid seed data: {0}")]
	Seed(#[from] StoreError),

	#[error("Failed to bind {address}: {source}")]
	Bind { address: String, source: io::Error },

	#[error("Server error: {0}")]
	Serve(#[source] io::Error),
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_status_codes() {
		let status = |e: AppError| e.into_response().status();
		assert_eq!(status(AppError::NotFound("Article")), StatusCode::NOT_FOUND);
		assert_eq!(
			status(AppError::Store(StoreError::DuplicateId { kind: "issue", id: 3 })),
			StatusCode::CONFLICT
		);
		assert_eq!(
			status(AppError::Internal("boom".into())),
			StatusCode::INTERNAL_SERVER_ERROR
		);
	}
}
