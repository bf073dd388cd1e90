//! Intent labels: the closed set of capabilities a request can be routed to.

use crate::{AlchemyError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A content capability a query can be routed to.
///
/// Variant order is the canonical order. Candidate sets are kept in
/// `BTreeSet<IntentLabel>`, so their first element is the canonical first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentLabel {
    /// Research synthesis over web sources
    Research,
    /// Long-form, search-optimised article
    Article,
    /// Short professional social post
    SocialPost,
    /// Generated image
    Image,
    /// Restructuring of supplied text
    Format,
}

impl IntentLabel {
    /// Every label, in canonical order.
    pub const ALL: [IntentLabel; 5] = [
        IntentLabel::Research,
        IntentLabel::Article,
        IntentLabel::SocialPost,
        IntentLabel::Image,
        IntentLabel::Format,
    ];

    /// Labels the tie-break classifier is allowed to answer with.
    pub const TIE_BREAK: [IntentLabel; 4] = [
        IntentLabel::Research,
        IntentLabel::Article,
        IntentLabel::SocialPost,
        IntentLabel::Image,
    ];

    /// Label the matcher falls back to when nothing matches.
    pub const DEFAULT: IntentLabel = IntentLabel::Research;

    pub fn as_str(&self) -> &'static str {
        match self {
            IntentLabel::Research => "research",
            IntentLabel::Article => "article",
            IntentLabel::SocialPost => "social_post",
            IntentLabel::Image => "image",
            IntentLabel::Format => "format",
        }
    }

    pub fn is_tie_break_choice(&self) -> bool {
        Self::TIE_BREAK.contains(self)
    }
}

impl fmt::Display for IntentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntentLabel {
    type Err = AlchemyError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|label| label.as_str() == s)
            .ok_or_else(|| AlchemyError::Triage(format!("Unknown intent label: '{s}'")))
    }
}
