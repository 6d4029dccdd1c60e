//! Client-side filtering over the last search results.
//!
//! Matching is a case-insensitive substring test against username, real name
//! and country. School is deliberately left out: every result already matched
//! the college query.

use leetsearch_types::UserRecord;

/// Trimmed, lowercased filter text. Empty means "no filter".
#[must_use]
pub fn normalize_needle(text: &str) -> String {
    text.trim().to_lowercase()
}

/// The lowercased text a filter needle is matched against.
#[must_use]
pub fn haystack(user: &UserRecord) -> String {
    format!(
        "{} {} {}",
        user.username,
        user.real_name.as_deref().unwrap_or(""),
        user.country.as_deref().unwrap_or("")
    )
    .to_lowercase()
}

/// `needle` must already be normalized.
#[must_use]
pub fn matches(user: &UserRecord, needle: &str) -> bool {
    needle.is_empty() || haystack(user).contains(needle)
}

/// Records matching the raw filter text, in their original order.
#[must_use]
pub fn filter_users<'a>(users: &'a [UserRecord], text: &str) -> Vec<&'a UserRecord> {
    let needle = normalize_needle(text);
    users.iter().filter(|u| matches(u, &needle)).collect()
}
