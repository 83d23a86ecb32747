//! Seed content loaded into the store at startup.

use std::fs::read_to_string;

use serde::Deserialize;
use tracing::info;

use super::error::StartupError;
use super::models::{Article, ArticleStatus, Editor, Issue};

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct SeedData {
	pub articles: Vec<Article>,
	pub issues: Vec<Issue>,
	pub editors: Vec<Editor>,
}

impl SeedData {
	/// Reads a JSON seed file with `articles`, `issues` and `editors` arrays.
	pub fn from_file(path: &str) -> Result<Self, StartupError> {
		let text = read_to_string(path).map_err(|source| StartupError::SeedRead {
			path: path.to_string(),
			source,
		})?;
		let seed: Self = serde_json::from_str(&text).map_err(|source| StartupError::SeedParse {
			path: path.to_string(),
			source,
		})?;
		info!(
			"Loaded seed file {path}: {} articles, {} issues, {} editors",
			seed.articles.len(),
			seed.issues.len(),
			seed.editors.len()
		);
		Ok(seed)
	}

	/// Built-in journal content.
	pub fn journal() -> Self {
		Self {
			articles: journal_articles(),
			issues: journal_issues(),
			editors: journal_editors(),
		}
	}
}

#[allow(clippy::too_many_arguments)]
fn article(
	title: &str,
	summary: &str,
	authors: &[&str],
	keywords: &[&str],
	category: &str,
	status: ArticleStatus,
	(volume, issue): (u32, u32),
	featured: bool,
	(read_time, citations): (u32, u32),
	published_at: &str,
) -> Article {
	Article {
		id: 0,
		title: title.to_string(),
		summary: summary.to_string(),
		content: format!("{summary}\n\nFull text available in the issue PDF."),
		authors: authors.iter().map(|a| a.to_string()).collect(),
		keywords: keywords.iter().map(|k| k.to_string()).collect(),
		category: category.to_string(),
		status,
		volume,
		issue,
		featured,
		read_time,
		citations,
		published_at: published_at.to_string(),
	}
}

fn journal_articles() -> Vec<Article> {
	use ArticleStatus::*;

	vec![
		article(
			"Sleep Spindles and Overnight Memory Consolidation",
			"A replication of spindle-density effects on declarative recall in a sample of 64 undergraduates.",
			&["Maya Chen", "Daniel Okafor"],
			&["sleep", "memory", "EEG"],
			"Neuroscience",
			Published,
			(3, 2),
			true,
			(12, 8),
			"2024-10-14",
		),
		article(
			"Urban Heat Islands on a University Campus",
			"Thermal imaging across three seasons shows a 2.4 °C afternoon excess over paved courtyards.",
			&["Priya Raman"],
			&["climate", "urban planning", "remote sensing"],
			"Environmental Science",
			Published,
			(3, 2),
			false,
			(9, 3),
			"2024-10-14",
		),
		article(
			"Trust in Peer Review Among Early-Career Researchers",
			"Survey results from 412 graduate students on perceived fairness of single- and double-blind review.",
			&["Lucas Moreau", "Maya Chen"],
			&["peer review", "survey", "research culture"],
			"Social Sciences",
			Published,
			(3, 1),
			true,
			(15, 11),
			"2024-04-02",
		),
		article(
			"Low-Cost Microfluidics with Laser-Cut Acrylic",
			"A fabrication workflow for teaching labs that reaches 150 µm channel widths without a clean room.",
			&["Samuel Adeyemi"],
			&["microfluidics", "fabrication", "education"],
			"Engineering",
			Published,
			(3, 1),
			false,
			(11, 5),
			"2024-04-02",
		),
		article(
			"Phage Therapy Attitudes in Student Populations",
			"Interview study on acceptance of bacteriophage treatments versus conventional antibiotics.",
			&["Hannah Lindqvist"],
			&["phage", "antibiotic resistance", "public health"],
			"Biology",
			Published,
			(2, 2),
			false,
			(10, 14),
			"2023-10-09",
		),
		article(
			"Graph Neural Networks for Timetable Conflicts",
			"Work in progress: learning conflict-free exam schedules from enrolment graphs.",
			&["Tomás Rivera"],
			&["machine learning", "scheduling", "graphs"],
			"Computer Science",
			Draft,
			(3, 3),
			false,
			(8, 0),
			"2025-03-01",
		),
		article(
			"Microplastic Counts in Campus Drinking Fountains",
			"Under review: FTIR identification of particles from 40 fountains over six months.",
			&["Priya Raman", "Elif Demir"],
			&["microplastics", "water quality"],
			"Environmental Science",
			Review,
			(3, 3),
			false,
			(7, 0),
			"2025-03-01",
		),
	]
}

fn journal_issues() -> Vec<Issue> {
	let issue = |volume: u32, number: u32, title: &str, description: &str, current: bool, date: &str| Issue {
		id: 0,
		volume,
		issue: number,
		title: title.to_string(),
		description: description.to_string(),
		current,
		published_at: date.to_string(),
		pdf_url: Some(format!("/attached_assets/journal-v{volume}-i{number}.pdf")),
	};

	vec![
		issue(
			2,
			2,
			"Volume 2, Issue 2",
			"Health, microbes and the people who study them.",
			false,
			"2023-10-09",
		),
		issue(
			3,
			1,
			"Volume 3, Issue 1",
			"Research culture, fabrication and the mechanics of review.",
			false,
			"2024-04-02",
		),
		issue(
			3,
			2,
			"Volume 3, Issue 2",
			"Sleep, cities and heat.",
			true,
			"2024-10-14",
		),
	]
}

fn journal_editors() -> Vec<Editor> {
	let editor = |name: &str, title: &str, specialization: &str, bio: &str| Editor {
		id: 0,
		name: name.to_string(),
		title: title.to_string(),
		specialization: specialization.to_string(),
		bio: bio.to_string(),
	};

	vec![
		editor(
			"Maya Chen",
			"Editor-in-Chief",
			"Cognitive Neuroscience",
			"Final-year neuroscience student working on sleep and memory.",
		),
		editor(
			"Samuel Adeyemi",
			"Managing Editor",
			"Mechanical Engineering",
			"Runs the journal's production schedule and typesetting.",
		),
		editor(
			"Elif Demir",
			"Associate Editor",
			"Environmental Chemistry",
			"Coordinates reviewers for the environmental science section.",
		),
	]
}
