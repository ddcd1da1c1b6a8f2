//! Contact-data extraction.
//!
//! Extraction is stateless: callers pass the whole accumulated user text of a
//! session every turn, so a name given early and an email given later end up
//! in the same [`LeadData`].

use chat_core::LeadData;
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap());

/// Digits in an Argentine number once country code, trunk prefixes and
/// the legacy mobile 15 are removed.
const NATIONAL_DIGITS: usize = 10;

// Argentine number: optional +54, optional mobile 9, area code (optionally
// with trunk 0 or parentheses), optional legacy 15, then the local number.
// A digit right after the local number marks a longer figure (CUIT, order
// number) and is captured so the candidate can be rejected.
static PHONE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:^|[^\d+])(?P<phone>(?:\+?54[\s.-]?)?(?:9[\s.-]?)?\(?0?(?P<area>\d{2,4})\)?[\s.-]?(?:15[\s.-]?)?(?P<local>\d{3,4}[\s.-]?\d{4}))(?P<more>[\s.-]?\d)?",
    )
    .unwrap()
});

static NAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?i:me\s+llamo|mi\s+nombre\s+es|soy)\s+(\p{Lu}\p{Ll}+(?:\s+\p{Lu}\p{Ll}+)?)").unwrap()
});

static INTEREST_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?i:quiero|busco|me\s+interesa|necesito)\s+([^.!?\n]{3,50})").unwrap()
});

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Extract contact data from accumulated conversation text.
///
/// Returns `None` unless at least one of name, email or phone is found; an
/// interest on its own is not a lead.
pub fn extract(text: &str) -> Option<LeadData> {
    let lead = LeadData {
        name: extract_name(text),
        email: extract_email(text),
        phone: extract_phone(text),
        interest: extract_interest(text),
        ..Default::default()
    };

    lead.is_actionable().then_some(lead)
}

/// First email address in the text.
pub fn extract_email(text: &str) -> Option<String> {
    EMAIL_PATTERN.find(text).map(|m| m.as_str().to_string())
}

/// First Argentine phone number in the text, with whitespace removed.
///
/// Candidates whose area code and local number do not add up to ten digits,
/// or that run on into more digits, are skipped.
pub fn extract_phone(text: &str) -> Option<String> {
    PHONE_PATTERN
        .captures_iter(text)
        .filter(|caps| caps.name("more").is_none())
        .filter(|caps| {
            let national = [caps.name("area"), caps.name("local")]
                .into_iter()
                .flatten()
                .flat_map(|m| m.as_str().chars())
                .filter(char::is_ascii_digit)
                .count();
            national == NATIONAL_DIGITS
        })
        .find_map(|caps| caps.name("phone"))
        .map(|m| WHITESPACE.replace_all(m.as_str(), "").into_owned())
}

/// One or two capitalized words after "me llamo", "mi nombre es" or "soy".
pub fn extract_name(text: &str) -> Option<String> {
    NAME_PATTERN
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

fn extract_interest(text: &str) -> Option<String> {
    INTEREST_PATTERN
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| s.chars().count() >= 3)
}
