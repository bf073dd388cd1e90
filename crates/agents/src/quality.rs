//! Heuristic quality and optimisation metrics for generated text.
//!
//! Everything here is a pure function of its input; the generators attach
//! the results to their envelopes.

use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;

static H1_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^#\s").unwrap());

static H2_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^##\s").unwrap());

static H3_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^###\s").unwrap());

static LINK_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[.*?\]\(.*?\)").unwrap());

static HASHTAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#\w+").unwrap());

static EMOJI_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\x{1F300}-\x{1F9FF}]").unwrap());

static MARKDOWN_MARKS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[#*_`]").unwrap());

/// Social platforms truncate posts beyond this many characters in the feed.
pub const IDEAL_POST_CHARS: usize = 1300;

const POST_HARD_LIMIT: usize = 3000;

#[derive(Debug, Clone, Serialize)]
pub struct SeoAnalysis {
    pub seo_score: u32,
    /// Occurrences per hundred words, keyed by keyword
    pub keyword_density: BTreeMap<String, f64>,
    pub word_count: usize,
    pub header_count: usize,
    pub readability: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct EngagementAnalysis {
    pub engagement_score: u32,
    pub character_count: usize,
    pub ideal_length: bool,
    pub emoji_count: usize,
    pub hashtag_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct QualityReport {
    pub quality_score: u32,
    pub issues: Vec<String>,
    pub warnings: Vec<String>,
    pub rating: &'static str,
}

impl QualityReport {
    fn scored(issues: Vec<String>, warnings: Vec<String>, issue_cost: u32, rating: &'static str) -> Self {
        let penalty = issues.len() as u32 * issue_cost + warnings.len() as u32 * 5;
        Self {
            quality_score: 100u32.saturating_sub(penalty),
            issues,
            warnings,
            rating,
        }
    }
}

pub fn word_count(content: &str) -> usize {
    content.split_whitespace().count()
}

fn paragraphs(content: &str) -> impl Iterator<Item = &str> {
    content.split("\n\n").map(str::trim).filter(|p| !p.is_empty())
}

pub fn seo_analysis(content: &str, keywords: &[String]) -> SeoAnalysis {
    let words = word_count(content);
    let lower = content.to_lowercase();

    let keyword_density: BTreeMap<String, f64> = keywords
        .iter()
        .map(|kw| {
            let hits = lower.matches(&kw.to_lowercase()).count();
            let density = if words > 0 {
                hits as f64 / words as f64 * 100.0
            } else {
                0.0
            };
            (kw.clone(), density)
        })
        .collect();

    let h2 = H2_PATTERN.find_iter(content).count();
    let h3 = H3_PATTERN.find_iter(content).count();

    let mut score = 0;
    if words > 1000 {
        score += 30;
    }
    if h2 >= 3 {
        score += 20;
    }
    if keyword_density.values().any(|d| *d > 0.5 && *d < 2.5) {
        score += 30;
    }
    if content.matches("\n\n").count() >= 5 {
        score += 20;
    }

    SeoAnalysis {
        seo_score: score.min(100),
        keyword_density,
        word_count: words,
        header_count: h2 + h3,
        readability: if words > 800 { "good" } else { "improve" },
    }
}

pub fn engagement_analysis(content: &str) -> EngagementAnalysis {
    let chars = content.chars().count();
    let line_breaks = content.matches('\n').count();
    let emoji = EMOJI_PATTERN.find_iter(content).count();
    let hashtags = HASHTAG_PATTERN.find_iter(content).count();

    let mut score = 0;
    if chars < IDEAL_POST_CHARS {
        score += 25;
    }
    if line_breaks >= 5 {
        score += 20;
    }
    if (3..=7).contains(&emoji) {
        score += 25;
    }
    if (3..=7).contains(&hashtags) {
        score += 30;
    }

    EngagementAnalysis {
        engagement_score: score,
        character_count: chars,
        ideal_length: chars < IDEAL_POST_CHARS,
        emoji_count: emoji,
        hashtag_count: hashtags,
    }
}

/// First paragraph without markdown markers, truncated to `max_len` chars.
pub fn meta_description(content: &str, max_len: usize) -> String {
    let source = match paragraphs(content).next() {
        Some(first) => MARKDOWN_MARKS.replace_all(first, "").trim().to_string(),
        None => content.to_string(),
    };

    if source.chars().count() <= max_len {
        return source;
    }
    let mut truncated: String = source.chars().take(max_len.saturating_sub(3)).collect();
    truncated.push_str("...");
    truncated
}

pub fn validate_article(content: &str) -> QualityReport {
    let mut issues = Vec::new();
    let mut warnings = Vec::new();

    let words = word_count(content);
    if words < 800 {
        issues.push("Content too short (minimum 800 words)".to_string());
    } else if words > 3000 {
        warnings.push("Content very long (consider splitting)".to_string());
    }

    if !H1_PATTERN.is_match(content) {
        issues.push("Missing H1 title".to_string());
    }
    if H2_PATTERN.find_iter(content).count() < 3 {
        warnings.push("Consider adding more H2 headers".to_string());
    }
    if !LINK_PATTERN.is_match(content) {
        warnings.push("No links found (consider adding references)".to_string());
    }

    let long = paragraphs(content).filter(|p| word_count(p) > 150).count();
    if long > 0 {
        warnings.push(format!("{long} paragraphs are too long"));
    }

    let rating = if issues.is_empty() { "good" } else { "needs_improvement" };
    QualityReport::scored(issues, warnings, 15, rating)
}

pub fn validate_social_post(content: &str) -> QualityReport {
    let mut issues = Vec::new();
    let mut warnings = Vec::new();

    let chars = content.chars().count();
    if chars > POST_HARD_LIMIT {
        issues.push(format!("Post too long (limit is {POST_HARD_LIMIT} characters)"));
    } else if chars < 100 {
        issues.push("Post too short (minimum 100 characters)".to_string());
    }

    match HASHTAG_PATTERN.find_iter(content).count() {
        0 => warnings.push("No hashtags found".to_string()),
        n if n > 10 => warnings.push("Too many hashtags (keep under 10)".to_string()),
        _ => {}
    }
    if !EMOJI_PATTERN.is_match(content) {
        warnings.push("Consider adding emojis for engagement".to_string());
    }
    if !content.contains('?') {
        warnings.push("Consider ending with a question for engagement".to_string());
    }

    let rating = if issues.is_empty() && warnings.len() <= 2 {
        "high"
    } else {
        "medium"
    };
    QualityReport::scored(issues, warnings, 20, rating)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn long_article() -> String {
        let para = "Rust makes systems programming approachable. ".repeat(30);
        let mut doc = String::from("# Rust in Production\n\n");
        for section in ["Ownership", "Concurrency", "Tooling"] {
            doc.push_str(&format!("## {section}\n\n{para}\n\n{para}\n\n"));
        }
        doc.push_str("See [the book](https://doc.rust-lang.org/book/).\n");
        doc
    }

    #[test]
    fn seo_scores_structure_and_density() {
        let article = long_article();
        let analysis = seo_analysis(&article, &["rust".to_string(), "kubernetes".to_string()]);

        assert!(analysis.word_count > 800);
        assert_eq!(analysis.header_count, 3);
        assert_eq!(analysis.keyword_density["kubernetes"], 0.0);
        assert!(analysis.keyword_density["rust"] > 0.0);
        // 3 H2 headers and plenty of paragraph breaks; under 1000 words.
        assert!(analysis.seo_score >= 40);
        assert_eq!(analysis.readability, "good");
    }

    #[test]
    fn seo_on_empty_content_is_zero() {
        let analysis = seo_analysis("", &["rust".to_string()]);
        assert_eq!(analysis.seo_score, 0);
        assert_eq!(analysis.keyword_density["rust"], 0.0);
        assert_eq!(analysis.readability, "improve");
    }

    #[test]
    fn engagement_rewards_short_posts_with_hashtags_and_emoji() {
        let post = "🚀 Big news\n\nLine\nLine\nLine\nLine\n\nWhat do you think? 🎯 💡\n\n#rust #systems #career";
        let analysis = engagement_analysis(post);

        assert_eq!(analysis.hashtag_count, 3);
        assert_eq!(analysis.emoji_count, 3);
        assert!(analysis.ideal_length);
        assert_eq!(analysis.engagement_score, 100);
    }

    #[test]
    fn meta_description_strips_markdown_and_truncates() {
        assert_eq!(meta_description("# **Hello** world\n\nBody", 160), "Hello world");

        let long = "word ".repeat(100);
        let meta = meta_description(&long, 20);
        assert_eq!(meta.chars().count(), 20);
        assert!(meta.ends_with("..."));
    }

    #[test]
    fn article_validation_flags_short_untitled_text() {
        let report = validate_article("just a few words");
        assert_eq!(report.issues.len(), 2);
        assert_eq!(report.rating, "needs_improvement");
        // 2 issues * 15 + 2 warnings (headers, links) * 5
        assert_eq!(report.quality_score, 60);
    }

    #[test]
    fn article_validation_accepts_structured_text() {
        let report = validate_article(&long_article());
        assert!(report.issues.is_empty(), "issues: {:?}", report.issues);
        assert_eq!(report.rating, "good");
    }

    #[test]
    fn social_validation_counts_missing_engagement_cues() {
        let report = validate_social_post(&"a".repeat(150));
        assert!(report.issues.is_empty());
        assert_eq!(report.warnings.len(), 3);
        assert_eq!(report.quality_score, 85);
        assert_eq!(report.rating, "medium");

        let report = validate_social_post("too short #one");
        assert_eq!(report.issues.len(), 1);
    }
}
