//! Markdown structure checks on translated chunks.
//!
//! The model is asked to leave formatting alone, but nothing enforces it. These
//! checks compare elements that should survive translation untouched and report
//! mismatches as warnings. They never fail a run.

use regex::Regex;
use std::sync::OnceLock;

/// Warnings about a translated chunk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

static INLINE_CODE_REGEX: OnceLock<Regex> = OnceLock::new();
static URL_REGEX: OnceLock<Regex> = OnceLock::new();
static MARKDOWN_LINK_REGEX: OnceLock<Regex> = OnceLock::new();
static HEADING_REGEX: OnceLock<Regex> = OnceLock::new();

pub struct TranslationValidator;

impl TranslationValidator {
    /// Compare `original` with `translated` and collect warnings for:
    /// - inline code spans that changed
    /// - URLs that changed
    /// - a different number of markdown links
    /// - a different number of headings
    /// - an empty translation of non-blank text
    pub fn validate(original: &str, translated: &str) -> ValidationReport {
        let mut report = ValidationReport::default();

        if !original.trim().is_empty() && translated.trim().is_empty() {
            report
                .warnings
                .push("Translation is empty for non-empty input".to_string());
            return report;
        }

        let orig_code = Self::extract_inline_code(original);
        let trans_code = Self::extract_inline_code(translated);
        if orig_code != trans_code {
            report.warnings.push(format!(
                "Inline code mismatch: original has {:?}, translation has {:?}",
                orig_code, trans_code
            ));
        }

        let orig_urls = Self::extract_urls(original);
        let trans_urls = Self::extract_urls(translated);
        if orig_urls != trans_urls {
            report.warnings.push(format!(
                "URL mismatch: original has {} URLs, translation has {} URLs",
                orig_urls.len(),
                trans_urls.len()
            ));
        }

        let orig_links = Self::count_markdown_links(original);
        let trans_links = Self::count_markdown_links(translated);
        if orig_links != trans_links {
            report.warnings.push(format!(
                "Markdown link count mismatch: original has {}, translation has {}",
                orig_links, trans_links
            ));
        }

        let orig_headings = Self::count_headings(original);
        let trans_headings = Self::count_headings(translated);
        if orig_headings != trans_headings {
            report.warnings.push(format!(
                "Heading count mismatch: original has {}, translation has {}",
                orig_headings, trans_headings
            ));
        }

        report
    }

    fn extract_inline_code(text: &str) -> Vec<String> {
        let regex = INLINE_CODE_REGEX.get_or_init(|| Regex::new(r"`[^`\n]+`").unwrap());
        regex.find_iter(text).map(|m| m.as_str().to_string()).collect()
    }

    fn extract_urls(text: &str) -> Vec<String> {
        let regex = URL_REGEX.get_or_init(|| Regex::new(r"https?://[^\s)\]>]+").unwrap());
        regex.find_iter(text).map(|m| m.as_str().to_string()).collect()
    }

    fn count_markdown_links(text: &str) -> usize {
        let regex =
            MARKDOWN_LINK_REGEX.get_or_init(|| Regex::new(r"\[[^\]]*\]\([^)]+\)").unwrap());
        regex.find_iter(text).count()
    }

    fn count_headings(text: &str) -> usize {
        let regex = HEADING_REGEX.get_or_init(|| Regex::new(r"(?m)^#{1,6}\s").unwrap());
        regex.find_iter(text).count()
    }
}
