//! Popup view-model.
//!
//! The controller never builds markup. It produces a [`PopupState`] and hands
//! it to a [`PopupView`], which decides how to draw it (HTML fragments,
//! terminal widgets, plain text).

mod html;

pub use html::{HtmlSurface, escape_html, ids, results_html};

use chrono::{DateTime, Local};
use leetsearch_types::UserRecord;

/// Profile pages live at `{PROFILE_URL_BASE}{username}/`.
pub const PROFILE_URL_BASE: &str = "https://leetcode.com/";

const ANONYMOUS: &str = "Anonymous";
const UNKNOWN_COUNTRY: &str = "Unknown country";
const NO_RANK: &str = "N/A";

/// Display surface the controller pushes state into.
pub trait PopupView {
    /// Called after every state transition, including the busy phase of a search.
    fn render(&mut self, state: &PopupState);
}

/// Fixed user-facing messages shown in place of the result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    EnterQuery,
    NoUsers,
    FetchFailed,
}

impl Notice {
    #[must_use]
    pub fn text(self) -> &'static str {
        match self {
            Self::EnterQuery => "Please enter a college name.",
            Self::NoUsers => "No users found.",
            Self::FetchFailed => "Failed to fetch results. Check backend URL.",
        }
    }

    #[must_use]
    pub fn is_error(self) -> bool {
        matches!(self, Self::FetchFailed)
    }
}

/// One rendered result block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCard {
    pub username: String,
    pub profile_url: String,
    pub rank: String,
    pub display_name: String,
    pub country: String,
    pub school: String,
}

impl From<&UserRecord> for UserCard {
    fn from(user: &UserRecord) -> Self {
        Self {
            username: user.username.clone(),
            profile_url: format!("{PROFILE_URL_BASE}{}/", user.username),
            rank: format_ranking(user.ranking),
            display_name: non_empty_or(user.real_name.as_deref(), ANONYMOUS),
            country: non_empty_or(user.country.as_deref(), UNKNOWN_COUNTRY),
            school: user.school.clone(),
        }
    }
}

fn non_empty_or(value: Option<&str>, fallback: &str) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => fallback.to_string(),
    }
}

/// Content of the results area.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ResultsPane {
    #[default]
    Cleared,
    Notice(Notice),
    Users(Vec<UserCard>),
}

impl ResultsPane {
    #[must_use]
    pub fn cards(&self) -> &[UserCard] {
        match self {
            Self::Users(cards) => cards,
            _ => &[],
        }
    }

    #[must_use]
    pub fn notice(&self) -> Option<Notice> {
        match self {
            Self::Notice(notice) => Some(*notice),
            _ => None,
        }
    }
}

/// Search button state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TriggerState {
    pub busy: bool,
}

impl TriggerState {
    #[must_use]
    pub fn label(self) -> &'static str {
        if self.busy { "Searching..." } else { "Search" }
    }

    #[must_use]
    pub fn is_enabled(self) -> bool {
        !self.busy
    }
}

/// Summary line under the search box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub matched: u64,
    pub filtered: usize,
    pub refreshed_at: DateTime<Local>,
}

impl Stats {
    #[must_use]
    pub fn matched_label(&self) -> String {
        format!("Profiles matched: {}", self.matched)
    }

    #[must_use]
    pub fn filtered_label(&self) -> String {
        format!("Filtered view: {}", self.filtered)
    }

    #[must_use]
    pub fn refreshed_label(&self) -> String {
        format!("Last refreshed: {}", self.refreshed_at.format("%-I:%M:%S %p"))
    }
}

/// Everything a surface needs to draw the popup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopupState {
    pub trigger: TriggerState,
    pub results: ResultsPane,
    pub filter_visible: bool,
    pub stats: Option<Stats>,
}

/// Format a ranking with comma thousands separators, "N/A" when absent.
#[must_use]
pub fn format_ranking(ranking: Option<i64>) -> String {
    let Some(value) = ranking else {
        return NO_RANK.to_string();
    };

    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Turn a list of users into the results-area view-model.
pub fn render_results<'a>(users: impl IntoIterator<Item = &'a UserRecord>) -> ResultsPane {
    let cards: Vec<UserCard> = users.into_iter().map(UserCard::from).collect();
    if cards.is_empty() {
        ResultsPane::Notice(Notice::NoUsers)
    } else {
        ResultsPane::Users(cards)
    }
}
