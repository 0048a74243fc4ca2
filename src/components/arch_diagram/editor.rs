//! Live editor: safety checks on candidate graph text and the source store.

use std::sync::LazyLock;

use regex::Regex;

use super::engine::RenderEngine;
use super::error::Rejection;

const KEYWORDS: &[&str] = &["graph", "flowchart"];
const DIRECTIONS: &[&str] = &["TB", "TD", "BT", "RL", "LR"];

/// Script tags, `javascript:` links, and `click` directives that call a
/// global function once bound.
static SCRIPT_MARKER: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"(?im)<\s*script|javascript\s*:|(?:^|;)\s*click\s+\S+\s+(?:call|callback)\b")
		.expect("static pattern")
});

/// The diagram text currently committed for rendering.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GraphSource {
	text: String,
}

impl GraphSource {
	pub fn new(text: impl Into<String>) -> Self {
		Self { text: text.into() }
	}

	pub fn text(&self) -> &str {
		&self.text
	}

	fn replace(&mut self, text: String) {
		self.text = text;
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditOutcome {
	Accepted,
	Rejected(Rejection),
}

/// True when the first non-blank line is `graph`/`flowchart` plus a direction.
pub fn has_direction_declaration(text: &str) -> bool {
	let Some(header) = text.lines().map(str::trim).find(|l| !l.is_empty()) else {
		return false;
	};
	let mut tokens = header
		.split(|c: char| c.is_whitespace() || c == ';')
		.filter(|t| !t.is_empty());
	matches!(
		(tokens.next(), tokens.next()),
		(Some(kw), Some(dir)) if KEYWORDS.contains(&kw) && DIRECTIONS.contains(&dir)
	)
}

pub fn contains_script(text: &str) -> bool {
	SCRIPT_MARKER.is_match(text)
}

/// Run the pre-render checks in order: direction first, then script markers.
pub fn check(candidate: &str) -> Result<(), Rejection> {
	if !has_direction_declaration(candidate) {
		return Err(Rejection::MissingDirection);
	}
	if contains_script(candidate) {
		return Err(Rejection::ScriptContent);
	}
	Ok(())
}

/// Commit `candidate` to `source` if it passes [`check`].
pub fn apply(source: &mut GraphSource, candidate: &str) -> EditOutcome {
	match check(candidate) {
		Ok(()) => {
			source.replace(candidate.to_string());
			EditOutcome::Accepted
		}
		Err(reason) => {
			log::warn!("rejected graph edit: {reason}");
			EditOutcome::Rejected(reason)
		}
	}
}

/// Text of the editor's status line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseStatus {
	LooksGood,
	ParseError(String),
	Rejected(Rejection),
	RenderFailed(String),
}

impl ParseStatus {
	pub fn message(&self) -> String {
		match self {
			ParseStatus::LooksGood => "Looks good".into(),
			ParseStatus::ParseError(_) => "Parse error".into(),
			ParseStatus::Rejected(reason) => reason.to_string(),
			ParseStatus::RenderFailed(detail) => format!("Render failed: {detail}"),
		}
	}

	pub fn is_ok(&self) -> bool {
		matches!(self, ParseStatus::LooksGood)
	}
}

/// Advisory check: a throwaway render whose output is discarded.
///
/// Returns `None` while the engine is still loading.
pub async fn validate<E: RenderEngine>(engine: &E, candidate: &str) -> Option<ParseStatus> {
	if !engine.is_ready() {
		return None;
	}
	match engine.render(candidate).await {
		Ok(_) => Some(ParseStatus::LooksGood),
		Err(e) => Some(ParseStatus::ParseError(e.to_string())),
	}
}
