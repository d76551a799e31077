use std::sync::LazyLock;

use regex::Regex;
use strsim::normalized_levenshtein;
use url::Url;

use super::lead::LeadRecord;

const NAME_SIMILARITY_THRESHOLD: f64 = 0.8;
const MIN_PHONE_DIGITS: usize = 10;

static STRICT_EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

pub fn is_valid_phone(phone: &str) -> bool {
    let digits: String = phone
        .chars()
        .filter(|c| !matches!(c, ' ' | '(' | ')' | '-' | '.'))
        .collect();

    digits.len() >= MIN_PHONE_DIGITS && digits.chars().all(|c| c.is_ascii_digit())
}

pub fn is_valid_email(email: &str) -> bool {
    STRICT_EMAIL.is_match(email)
}

pub fn is_valid_website(website: &str) -> bool {
    match Url::parse(website) {
        Ok(url) => matches!(url.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

/// Completeness score in 0..=100.
pub fn score(lead: &LeadRecord) -> u8 {
    let mut score: u8 = 0;

    if !lead.name.trim().is_empty() {
        score += 20;
    }
    if lead.has_phone() && is_valid_phone(&lead.phone) {
        score += 30;
    }
    if lead.has_email() && is_valid_email(&lead.email) {
        score += 30;
    }
    if lead.has_website() && is_valid_website(&lead.website) {
        score += 10;
    }
    if !lead.city.trim().is_empty() {
        score += 10;
    }

    score.min(100)
}

/// True when `name` is close enough to one already collected to be the same business.
pub fn is_near_duplicate<'a>(name: &str, seen: impl IntoIterator<Item = &'a str>) -> bool {
    let name = name.trim().to_lowercase();
    if name.is_empty() {
        return false;
    }

    seen.into_iter().any(|other| {
        normalized_levenshtein(&name, &other.trim().to_lowercase()) > NAME_SIMILARITY_THRESHOLD
    })
}
