//! Name normalization: turn an arbitrary base name into its canonical
//! lowercase-hyphenated form.
//!
//! The normalizer is a fixed pipeline of small pure steps applied left to
//! right. Later steps depend on the output of earlier ones (an ampersand
//! between spaces only becomes `-and-` because `&` is expanded before
//! whitespace is folded), so the order in [`PIPELINE`] is part of the contract.
//!
//! Deleting quotes or parentheses can leave a base character directly before
//! a combining mark, so the pipeline ends by composing again. Without that,
//! a second pass would compose the pair and rename the entry once more.
//!
//! Extensions get no special treatment here: `Report.final.docx` normalizes
//! as a whole to `report.final.docx`.

use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Quote characters stripped when no configuration says otherwise.
pub const DEFAULT_QUOTE_CHARS: &[char] = &['\''];

/// One transformation in the normalization pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// NFKC compatibility composition.
    Canonicalize,
    /// Leading whitespace run plus one optional quote.
    StripLeading,
    RemoveQuotes,
    ExpandAmpersands,
    StripParens,
    WhitespaceToHyphens,
    CollapseHyphens,
    FoldCase,
    TrimHyphens,
    /// NFKC again, for pairs made adjacent by earlier deletions.
    Recompose,
}

/// Steps in application order.
pub const PIPELINE: [Step; 10] = [
    Step::Canonicalize,
    Step::StripLeading,
    Step::RemoveQuotes,
    Step::ExpandAmpersands,
    Step::StripParens,
    Step::WhitespaceToHyphens,
    Step::CollapseHyphens,
    Step::FoldCase,
    Step::TrimHyphens,
    Step::Recompose,
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeOptions {
    /// Apostrophe-like characters removed from names.
    pub quote_chars: Vec<char>,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            quote_chars: DEFAULT_QUOTE_CHARS.to_vec(),
        }
    }
}

/// A single step's output, as reported by [`Normalizer::trace`].
#[derive(Debug, Clone, Serialize)]
pub struct StepOutput {
    pub step: Step,
    pub output: String,
}

#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    options: NormalizeOptions,
}

impl Normalizer {
    pub fn new(options: NormalizeOptions) -> Self {
        Self { options }
    }

    pub fn apply(&self, step: Step, input: &str) -> String {
        let quotes = self.options.quote_chars.as_slice();
        match step {
            Step::Canonicalize => canonicalize(input),
            Step::StripLeading => strip_leading(input, quotes),
            Step::RemoveQuotes => remove_quotes(input, quotes),
            Step::ExpandAmpersands => expand_ampersands(input),
            Step::StripParens => strip_parens(input),
            Step::WhitespaceToHyphens => whitespace_to_hyphens(input),
            Step::CollapseHyphens => collapse_hyphens(input),
            Step::FoldCase => fold_case(input),
            Step::TrimHyphens => trim_hyphens(input),
            Step::Recompose => canonicalize(input),
        }
    }

    pub fn normalize(&self, raw: &str) -> String {
        PIPELINE
            .iter()
            .fold(raw.to_string(), |acc, step| self.apply(*step, &acc))
    }

    /// Run the pipeline, keeping every intermediate result.
    pub fn trace(&self, raw: &str) -> Vec<StepOutput> {
        let mut current = raw.to_string();
        let mut outputs = Vec::with_capacity(PIPELINE.len());
        for step in PIPELINE {
            current = self.apply(step, &current);
            outputs.push(StepOutput {
                step,
                output: current.clone(),
            });
        }
        outputs
    }

    pub fn is_normalized(&self, name: &str) -> bool {
        self.normalize(name) == name
    }
}

/// Normalize with the default quote set (ASCII apostrophe only).
pub fn normalize(raw: &str) -> String {
    Normalizer::default().normalize(raw)
}

pub fn is_normalized(name: &str) -> bool {
    Normalizer::default().is_normalized(name)
}

// ============================================================================
// Steps
// ============================================================================

pub fn canonicalize(input: &str) -> String {
    input.nfkc().collect()
}

/// Remove a leading whitespace run and, directly after it, one quote.
///
/// A quote is only taken here when at least one whitespace character precedes
/// it; quotes elsewhere are left for [`remove_quotes`].
pub fn strip_leading(input: &str, quotes: &[char]) -> String {
    let rest = input.trim_start_matches(is_separator);
    if rest.len() == input.len() {
        return input.to_string();
    }

    let mut chars = rest.chars();
    match chars.next() {
        Some(c) if quotes.contains(&c) => chars.as_str().to_string(),
        _ => rest.to_string(),
    }
}

pub fn remove_quotes(input: &str, quotes: &[char]) -> String {
    input.chars().filter(|c| !quotes.contains(c)).collect()
}

pub fn expand_ampersands(input: &str) -> String {
    input.replace('&', "and")
}

pub fn strip_parens(input: &str) -> String {
    input.chars().filter(|c| *c != '(' && *c != ')').collect()
}

/// Unicode whitespace plus the information separators U+001C..U+001F.
pub fn is_separator(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

fn whitespace_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\s\x1C-\x1F]+").expect("whitespace pattern is valid"))
}

fn hyphen_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"-{2,}").expect("hyphen pattern is valid"))
}

pub fn whitespace_to_hyphens(input: &str) -> String {
    whitespace_run().replace_all(input, "-").into_owned()
}

pub fn collapse_hyphens(input: &str) -> String {
    hyphen_run().replace_all(input, "-").into_owned()
}

pub fn fold_case(input: &str) -> String {
    input.to_lowercase()
}

pub fn trim_hyphens(input: &str) -> String {
    input.trim_matches('-').to_string()
}
