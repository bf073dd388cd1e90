//! Keyword capability matching.

use alchemy_common::IntentLabel;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Trigger phrases per intent label.
///
/// Phrases are stored lower-cased and matched as plain substrings of the
/// lower-cased query, so "post" also matches "outpost".
#[derive(Debug, Clone, Serialize)]
pub struct CapabilitySet {
    triggers: BTreeMap<IntentLabel, Vec<String>>,
}

impl Default for CapabilitySet {
    fn default() -> Self {
        Self::empty()
            .with_triggers(
                IntentLabel::Research,
                ["research", "analyze", "investigate", "study", "explore", "find information"],
            )
            .with_triggers(
                IntentLabel::Article,
                ["blog", "article", "post", "write", "essay", "guide", "tutorial"],
            )
            .with_triggers(
                IntentLabel::SocialPost,
                ["linkedin", "social", "professional post", "networking"],
            )
            .with_triggers(
                IntentLabel::Image,
                ["image", "visual", "picture", "graphic", "illustration", "photo"],
            )
            .with_triggers(IntentLabel::Format, ["organize", "format", "structure", "outline"])
    }
}

impl CapabilitySet {
    /// A set with no triggers; every query falls through to the default label.
    pub fn empty() -> Self {
        Self {
            triggers: BTreeMap::new(),
        }
    }

    /// Replace the trigger phrases for `label`. Blank phrases are ignored.
    pub fn with_triggers<I, S>(mut self, label: IntentLabel, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let phrases: Vec<String> = phrases
            .into_iter()
            .map(|p| p.as_ref().trim().to_lowercase())
            .filter(|p| !p.is_empty())
            .collect();
        self.triggers.insert(label, phrases);
        self
    }

    pub fn triggers(&self, label: IntentLabel) -> &[String] {
        self.triggers.get(&label).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (IntentLabel, &[String])> {
        self.triggers.iter().map(|(label, phrases)| (*label, phrases.as_slice()))
    }

    /// Labels with at least one trigger in `query`. May be empty.
    pub fn matches(&self, query: &str) -> BTreeSet<IntentLabel> {
        let lower = query.to_lowercase();
        self.triggers
            .iter()
            .filter(|(_, phrases)| phrases.iter().any(|p| lower.contains(p.as_str())))
            .map(|(label, _)| *label)
            .collect()
    }

    /// Candidate labels for `query`, never empty: no match yields the default label.
    pub fn match_query(&self, query: &str) -> BTreeSet<IntentLabel> {
        or_default(self.matches(query))
    }
}

/// Substitute the default label for an empty match set.
pub(crate) fn or_default(found: BTreeSet<IntentLabel>) -> BTreeSet<IntentLabel> {
    if found.is_empty() {
        BTreeSet::from([IntentLabel::DEFAULT])
    } else {
        found
    }
}
