//! Issue branch naming
//!
//! An issue labelled as a requirement gets `req/{n}-{slug}`, one labelled as a fix gets
//! `fix/{n}-{slug}`. Requirement labels win when both are present. Issues carrying
//! neither are skipped.

use once_cell::sync::Lazy;
use regex::Regex;

static TITLE_MARKER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(req|fix):").unwrap_or_else(|e| panic!("invalid marker pattern: {e}"))
});

static NON_SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9-]").unwrap_or_else(|e| panic!("invalid slug pattern: {e}")));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchKind {
    Requirement,
    Fix,
}

impl BranchKind {
    pub fn prefix(self) -> &'static str {
        match self {
            BranchKind::Requirement => "req",
            BranchKind::Fix => "fix",
        }
    }
}

/// Which issue labels select which branch kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelRules {
    pub requirement: Vec<String>,
    pub fix: Vec<String>,
}

impl Default for LabelRules {
    fn default() -> Self {
        Self {
            requirement: vec!["requirements".to_string()],
            fix: vec!["bug".to_string(), "fix".to_string()],
        }
    }
}

impl LabelRules {
    /// Pick the branch kind for an issue's labels, or `None` to skip it.
    ///
    /// Label names compare case-insensitively.
    pub fn classify<S: AsRef<str>>(&self, labels: &[S]) -> Option<BranchKind> {
        let has = |wanted: &[String]| {
            labels.iter().any(|label| {
                let label = label.as_ref().trim();
                wanted.iter().any(|w| w.eq_ignore_ascii_case(label))
            })
        };

        if has(&self.requirement) {
            Some(BranchKind::Requirement)
        } else if has(&self.fix) {
            Some(BranchKind::Fix)
        } else {
            None
        }
    }
}

/// Turn an issue title into a branch-safe slug
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let unmarked = TITLE_MARKER_RE.replace(&lowered, "");
    let spaced = unmarked.split_whitespace().collect::<Vec<_>>().join("-");
    NON_SLUG_RE.replace_all(&spaced, "").into_owned()
}

pub fn branch_name(kind: BranchKind, issue_number: u64, title: &str) -> String {
    format!("{}/{}-{}", kind.prefix(), issue_number, slugify(title))
}

/// Classify and name in one step
pub fn branch_for_issue<S: AsRef<str>>(
    rules: &LabelRules,
    issue_number: u64,
    title: &str,
    labels: &[S],
) -> Option<String> {
    rules
        .classify(labels)
        .map(|kind| branch_name(kind, issue_number, title))
}
