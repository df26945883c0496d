//! Normalized category tags used by rubric tag predicates
//!
//! The fact record stores what the user actually said; the scoring engine
//! matches against these canonical tags. Each tag normalizes free text by
//! keyword, so both raw utterances ("my wife and I are deciding together")
//! and already-canonical values ("joint") resolve to the same tag.

use serde::{Deserialize, Serialize};

/// Who holds the purchase decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Authority {
    /// Single decision maker
    Sole,
    /// Decides together with a partner or spouse
    Joint,
    /// Committee, family council, or investor group
    Group,
}

impl Authority {
    /// Normalize free text to an authority tag.
    pub fn from_utterance(text: &str) -> Option<Self> {
        let lower = text.to_lowercase();

        if lower.contains("sole") || lower.contains("myself") || lower.contains("just me")
            || lower.contains("on my own") || lower.contains("alone")
        {
            return Some(Authority::Sole);
        }

        if lower.contains("joint") || lower.contains("spouse") || lower.contains("wife")
            || lower.contains("husband") || lower.contains("partner") || lower.contains("together")
        {
            return Some(Authority::Joint);
        }

        if lower.contains("group") || lower.contains("board") || lower.contains("committee")
            || lower.contains("family") || lower.contains("investors")
        {
            return Some(Authority::Group);
        }

        None
    }

    /// Stable tag string used in rubric criterion tables.
    pub fn as_str(&self) -> &'static str {
        match self {
            Authority::Sole => "sole",
            Authority::Joint => "joint",
            Authority::Group => "group",
        }
    }
}

/// Why the lead is looking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Need {
    /// Needs a property now (new job, lease ending, sold previous home)
    Immediate,
    /// Buying as an investment or rental
    Investment,
    /// Relocating to the area
    Relocation,
    /// Browsing the market without a concrete driver
    Exploring,
}

impl Need {
    /// Normalize free text to a need tag.
    pub fn from_utterance(text: &str) -> Option<Self> {
        let lower = text.to_lowercase();

        if lower.contains("immediate") || lower.contains("urgent") || lower.contains("right away")
            || lower.contains("asap") || lower.contains("lease end") || lower.contains("sold")
        {
            return Some(Need::Immediate);
        }

        if lower.contains("invest") || lower.contains("rental") || lower.contains("rent out")
            || lower.contains("flip")
        {
            return Some(Need::Investment);
        }

        if lower.contains("relocat") || lower.contains("moving") || lower.contains("new job")
            || lower.contains("transfer")
        {
            return Some(Need::Relocation);
        }

        if lower.contains("explor") || lower.contains("browsing") || lower.contains("curious")
            || lower.contains("just looking")
        {
            return Some(Need::Exploring);
        }

        None
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Need::Immediate => "immediate",
            Need::Investment => "investment",
            Need::Relocation => "relocation",
            Need::Exploring => "exploring",
        }
    }
}

/// When the lead intends to transact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timeline {
    /// Ready now
    Immediate,
    /// Within the month
    ThisMonth,
    /// Within the quarter
    ThisQuarter,
    /// Within the year
    ThisYear,
    /// No concrete horizon
    Browsing,
}

impl Timeline {
    /// Normalize free text to a timeline tag.
    pub fn from_utterance(text: &str) -> Option<Self> {
        let lower = text.to_lowercase();

        if lower.contains("immediate") || lower.contains("now") || lower.contains("asap")
            || lower.contains("this week") || lower.contains("urgent")
        {
            return Some(Timeline::Immediate);
        }

        if lower.contains("this_month") || lower.contains("this month")
            || lower.contains("within a month") || lower.contains("few weeks")
        {
            return Some(Timeline::ThisMonth);
        }

        if lower.contains("this_quarter") || lower.contains("this quarter")
            || lower.contains("few months") || lower.contains("next quarter")
        {
            return Some(Timeline::ThisQuarter);
        }

        if lower.contains("this_year") || lower.contains("this year")
            || lower.contains("within a year") || lower.contains("next year")
        {
            return Some(Timeline::ThisYear);
        }

        if lower.contains("browsing") || lower.contains("no rush") || lower.contains("someday")
            || lower.contains("just looking")
        {
            return Some(Timeline::Browsing);
        }

        None
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Timeline::Immediate => "immediate",
            Timeline::ThisMonth => "this_month",
            Timeline::ThisQuarter => "this_quarter",
            Timeline::ThisYear => "this_year",
            Timeline::Browsing => "browsing",
        }
    }
}

/// Completeness of the captured contact record.
///
/// Derived from the fact record rather than extracted; see
/// [`crate::FactRecord::contact_quality`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactQuality {
    /// Name plus both phone and email
    FullVerified,
    /// At least one reachable channel (phone or email)
    Partial,
    /// Only a name
    NameOnly,
}

impl ContactQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactQuality::FullVerified => "full_verified",
            ContactQuality::Partial => "partial",
            ContactQuality::NameOnly => "name_only",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authority_normalization() {
        assert_eq!(Authority::from_utterance("I'm the sole decision maker"), Some(Authority::Sole));
        assert_eq!(Authority::from_utterance("my wife and I decide together"), Some(Authority::Joint));
        assert_eq!(Authority::from_utterance("the family board signs off"), Some(Authority::Group));
        assert_eq!(Authority::from_utterance("not sure yet"), None);
    }

    #[test]
    fn test_canonical_values_roundtrip() {
        // Already-canonical values from the extraction service resolve too.
        assert_eq!(Authority::from_utterance("sole"), Some(Authority::Sole));
        assert_eq!(Need::from_utterance("investment"), Some(Need::Investment));
        assert_eq!(Timeline::from_utterance("this_month"), Some(Timeline::ThisMonth));
    }

    #[test]
    fn test_timeline_normalization() {
        assert_eq!(Timeline::from_utterance("we want to close this month"), Some(Timeline::ThisMonth));
        assert_eq!(Timeline::from_utterance("sometime next year maybe"), Some(Timeline::ThisYear));
        assert_eq!(Timeline::from_utterance("no rush at all"), Some(Timeline::Browsing));
    }

    #[test]
    fn test_need_normalization() {
        assert_eq!(Need::from_utterance("our lease ends soon, we need it urgently"), Some(Need::Immediate));
        assert_eq!(Need::from_utterance("looking for a rental property"), Some(Need::Investment));
        assert_eq!(Need::from_utterance("we are relocating to Austin"), Some(Need::Relocation));
    }
}
