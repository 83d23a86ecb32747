// Bin target reuses lib deps, silence noisy lint.
#![allow(unused_crate_dependencies)]

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
	match journal_api::start_server().await {
		Ok(()) => ExitCode::SUCCESS,
		Err(e) => {
			tracing::error!("{e}");
			ExitCode::FAILURE
		}
	}
}
