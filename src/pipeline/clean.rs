//! Line cleaning: drop recurring academic boilerplate from extracted text.
//!
//! Journal PDFs repeat the same furniture on every page: a bare page number,
//! a copyright line, "Access provided by …" stamps from the hosting
//! platform, DOI lines and repository URLs. pdftotext and tesseract both
//! emit these as lines of their own, so removal is line-based: a line goes
//! when its trimmed form matches a rule, and every other line is kept
//! byte-for-byte.
//!
//! ## Rule Order
//!
//! Built-in rules run first, in the order below, then caller-supplied
//! patterns in the order given. The first matching rule decides the line's
//! category (reported in DEBUG logs); order does not change *which* lines are
//! removed.
//!
//! Every rule is case-insensitive and anchored at the start of the trimmed
//! line. Blank lines never match.

use crate::error::Pdf2TxtError;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// What kind of boilerplate a rule targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    PageNumber,
    Copyright,
    AccessProvider,
    Doi,
    RepositoryUrl,
    Publisher,
    Custom,
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RuleCategory::PageNumber => "page number",
            RuleCategory::Copyright => "copyright",
            RuleCategory::AccessProvider => "access provider",
            RuleCategory::Doi => "DOI",
            RuleCategory::RepositoryUrl => "repository URL",
            RuleCategory::Publisher => "publisher",
            RuleCategory::Custom => "custom",
        };
        f.write_str(s)
    }
}

/// A single removal rule.
#[derive(Debug, Clone)]
pub struct Rule {
    pub category: RuleCategory,
    regex: Regex,
}

impl Rule {
    /// The compiled pattern.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    fn matches(&self, trimmed: &str) -> bool {
        self.regex.is_match(trimmed)
    }
}

// ── Rule 1: Bare page numbers ────────────────────────────────────────────────
//
// "12", "Page 5", "page 3 of 20". Bare numbers stop at three digits so a year
// standing alone on a line survives.

const PAGE_NUMBER: &str = r"^(?:page\s+\d{1,4}(?:\s+of\s+\d{1,4})?|\d{1,3})$";

// ── Rule 2: Copyright lines ─────────────────────────────────────────────────

const COPYRIGHT: &str = r"^(?:copyright\s*[©®]?|[©®])\s*\d{4}";

// ── Rule 3: Access-provider stamps ──────────────────────────────────────────
//
// Added by hosting platforms at download time: "Access provided by …".

const ACCESS_PROVIDER: &str = r"^access\s+provided\s+by\b";

// ── Rule 4: DOI lines ───────────────────────────────────────────────────────
//
// A line opening with a DOI, whatever follows: "DOI: 10.1353/xyz, pp. 1-20",
// "https://doi.org/10.1000/182". Or a DOI closing a short line after up to
// three words: "See DOI: 10.1/xyz". A DOI cited mid-sentence in body text
// is left alone.

const DOI: &str = concat!(
    r"^(?:https?://(?:dx\.)?)?doi(?::|\.org/)\s*10\.\d",
    r"|^(?:\S+\s+){0,3}(?:https?://(?:dx\.)?)?doi(?::|\.org/)\s*10\.\d{1,9}/\S+$",
);

// ── Rule 5: Repository URLs ─────────────────────────────────────────────────

const REPOSITORY_URL: &str = r"^https?://(?:muse\.jhu\.edu|(?:www\.)?jstor\.org)\b";

// ── Rule 6: Publisher lines ─────────────────────────────────────────────────

const PUBLISHER: &str = r"^published\s+by\s+.*\bpress\b";

static BUILTIN_RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    [
        (RuleCategory::PageNumber, PAGE_NUMBER),
        (RuleCategory::Copyright, COPYRIGHT),
        (RuleCategory::AccessProvider, ACCESS_PROVIDER),
        (RuleCategory::Doi, DOI),
        (RuleCategory::RepositoryUrl, REPOSITORY_URL),
        (RuleCategory::Publisher, PUBLISHER),
    ]
    .into_iter()
    .map(|(category, pattern)| Rule {
        category,
        regex: RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .unwrap(),
    })
    .collect()
});

/// The result of [`Cleaner::clean`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cleaned {
    pub text: String,
    pub removed: usize,
}

/// Ordered set of line-removal rules.
#[derive(Debug, Clone)]
pub struct Cleaner {
    rules: Vec<Rule>,
}

impl Default for Cleaner {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Cleaner {
    /// A cleaner with only the built-in rules.
    pub fn builtin() -> Self {
        Self {
            rules: BUILTIN_RULES.clone(),
        }
    }

    /// A cleaner with the built-in rules followed by `patterns`.
    pub fn with_patterns<I, S>(patterns: I) -> Result<Self, Pdf2TxtError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut cleaner = Self::builtin();
        for pattern in patterns {
            cleaner.add_pattern(pattern.as_ref())?;
        }
        Ok(cleaner)
    }

    /// Append a caller-supplied pattern, matched case-insensitively at the
    /// start of each trimmed line.
    pub fn add_pattern(&mut self, pattern: &str) -> Result<(), Pdf2TxtError> {
        if pattern.trim().is_empty() {
            return Err(Pdf2TxtError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: "pattern is empty and would match every line".into(),
            });
        }
        let regex = RegexBuilder::new(&format!("^(?:{pattern})"))
            .case_insensitive(true)
            .build()
            .map_err(|e| Pdf2TxtError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })?;
        self.rules.push(Rule {
            category: RuleCategory::Custom,
            regex,
        });
        Ok(())
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// The category of the first rule matching `line`, if any.
    pub fn matching_rule(&self, line: &str) -> Option<RuleCategory> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }
        self.rules
            .iter()
            .find(|rule| rule.matches(trimmed))
            .map(|rule| rule.category)
    }

    /// Remove every matching line; all other lines are kept verbatim and in
    /// order.
    pub fn clean(&self, text: &str) -> Cleaned {
        let mut kept = Vec::new();
        let mut removed_by: BTreeMap<RuleCategory, usize> = BTreeMap::new();

        for line in text.split('\n') {
            match self.matching_rule(line) {
                Some(category) => *removed_by.entry(category).or_default() += 1,
                None => kept.push(line),
            }
        }

        for (category, count) in &removed_by {
            debug!("Removed {} {} line(s)", count, category);
        }

        Cleaned {
            text: kept.join("\n"),
            removed: removed_by.values().sum(),
        }
    }
}

// ── Whitespace tidy-up ──────────────────────────────────────────────────────
//
// Runs after line removal. Only blank lines are touched: whitespace-only lines
// become empty, blank lines at either end go, and runs of more than two blank
// lines shrink to two.

static RE_BLANK_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{4,}").unwrap());

/// Normalise blank lines without touching any line that has content.
pub fn tidy_whitespace(text: &str) -> String {
    let lines: Vec<&str> = text
        .split('\n')
        .map(|line| if line.trim().is_empty() { "" } else { line })
        .collect();

    let first = lines.iter().position(|l| !l.is_empty());
    let last = lines.iter().rposition(|l| !l.is_empty());
    let joined = match (first, last) {
        (Some(first), Some(last)) => lines[first..=last].join("\n"),
        _ => String::new(),
    };

    RE_BLANK_RUNS.replace_all(&joined, "\n\n\n").into_owned()
}

// ── Tests ────────────────────────────────────────────────────────────────────
