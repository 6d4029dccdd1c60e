//! HTML fragment surface.
//!
//! Models the popup document as a set of elements addressed by fixed ids.
//! Every render replaces each element's content wholesale.

use super::{Notice, PopupState, PopupView, ResultsPane, UserCard};
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Element ids of the popup document
pub mod ids {
    pub const COLLEGE_INPUT: &str = "collegeInput";
    pub const SEARCH_BUTTON: &str = "searchBtn";
    pub const FILTER_INPUT: &str = "filterInput";
    pub const RESULTS: &str = "results";
    pub const STATS: &str = "stats";
    pub const TOTAL_USERS: &str = "totalUsers";
    pub const ACTIVE_USERS: &str = "activeUsers";
    pub const VARIATIONS: &str = "variations";

    pub const ALL: [&str; 8] = [
        COLLEGE_INPUT,
        SEARCH_BUTTON,
        FILTER_INPUT,
        RESULTS,
        STATS,
        TOTAL_USERS,
        ACTIVE_USERS,
        VARIATIONS,
    ];
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub inner_html: String,
    pub hidden: bool,
    pub disabled: bool,
}

#[derive(Debug, Clone)]
pub struct HtmlSurface {
    elements: BTreeMap<&'static str, Element>,
    renders: usize,
}

impl Default for HtmlSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlSurface {
    /// Fresh document: filter input and stats card start hidden.
    #[must_use]
    pub fn new() -> Self {
        let mut elements: BTreeMap<&'static str, Element> =
            ids::ALL.iter().map(|id| (*id, Element::default())).collect();
        for id in [ids::FILTER_INPUT, ids::STATS] {
            if let Some(el) = elements.get_mut(id) {
                el.hidden = true;
            }
        }
        if let Some(button) = elements.get_mut(ids::SEARCH_BUTTON) {
            button.inner_html = "Search".to_string();
        }
        Self {
            elements,
            renders: 0,
        }
    }

    #[must_use]
    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }

    /// Content of an element, empty for unknown ids.
    #[must_use]
    pub fn inner_html(&self, id: &str) -> &str {
        self.elements.get(id).map_or("", |el| el.inner_html.as_str())
    }

    #[must_use]
    pub fn is_hidden(&self, id: &str) -> bool {
        self.elements.get(id).is_some_and(|el| el.hidden)
    }

    /// Number of renders received so far
    #[must_use]
    pub fn renders(&self) -> usize {
        self.renders
    }

    fn set_html(&mut self, id: &'static str, html: String) {
        self.elements.entry(id).or_default().inner_html = html;
    }
}

impl PopupView for HtmlSurface {
    fn render(&mut self, state: &PopupState) {
        self.renders += 1;

        self.set_html(ids::SEARCH_BUTTON, state.trigger.label().to_string());
        if let Some(button) = self.elements.get_mut(ids::SEARCH_BUTTON) {
            button.disabled = !state.trigger.is_enabled();
        }

        if let Some(filter) = self.elements.get_mut(ids::FILTER_INPUT) {
            filter.hidden = !state.filter_visible;
        }

        self.set_html(ids::RESULTS, results_html(&state.results));

        match &state.stats {
            Some(stats) => {
                self.set_html(ids::TOTAL_USERS, escape_html(&stats.matched_label()));
                self.set_html(ids::ACTIVE_USERS, escape_html(&stats.filtered_label()));
                self.set_html(ids::VARIATIONS, escape_html(&stats.refreshed_label()));
                if let Some(card) = self.elements.get_mut(ids::STATS) {
                    card.hidden = false;
                }
            }
            None => {
                if let Some(card) = self.elements.get_mut(ids::STATS) {
                    card.hidden = true;
                }
            }
        }
    }
}

/// Markup for the results container.
#[must_use]
pub fn results_html(pane: &ResultsPane) -> String {
    match pane {
        ResultsPane::Cleared => String::new(),
        ResultsPane::Notice(notice) => notice_html(*notice),
        ResultsPane::Users(cards) => cards.iter().fold(String::new(), |mut out, card| {
            write_card(&mut out, card);
            out
        }),
    }
}

fn notice_html(notice: Notice) -> String {
    let class = if notice.is_error() { "error" } else { "empty" };
    format!(r#"<p class="{class}">{}</p>"#, escape_html(notice.text()))
}

fn write_card(out: &mut String, card: &UserCard) {
    // Writing into a String cannot fail
    let _ = write!(
        out,
        r#"<div class="userBox"><div class="userHeader"><a href="{url}" target="_blank" rel="noreferrer">{username}</a><span class="rank">Rank: {rank}</span></div><div class="userMeta"><span>{name}</span><span>{country}</span></div><div class="userSchool">{school}</div></div>"#,
        url = escape_html(&card.profile_url),
        username = escape_html(&card.username),
        rank = escape_html(&card.rank),
        name = escape_html(&card.display_name),
        country = escape_html(&card.country),
        school = escape_html(&card.school),
    );
}

/// Escape text for use in element content and double-quoted attributes.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{Stats, TriggerState};
    use chrono::Local;

    fn card(username: &str) -> UserCard {
        UserCard {
            username: username.to_string(),
            profile_url: format!("https://leetcode.com/{username}/"),
            rank: "1,234".to_string(),
            display_name: "Anonymous".to_string(),
            country: "Unknown country".to_string(),
            school: "MIT".to_string(),
        }
    }

    #[test]
    fn test_new_surface_hides_filter_and_stats() {
        let surface = HtmlSurface::new();
        assert!(surface.is_hidden(ids::FILTER_INPUT));
        assert!(surface.is_hidden(ids::STATS));
        assert!(!surface.is_hidden(ids::RESULTS));
        assert_eq!(surface.inner_html(ids::SEARCH_BUTTON), "Search");
        assert_eq!(surface.renders(), 0);
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_results_html_notices() {
        assert_eq!(
            results_html(&ResultsPane::Notice(Notice::NoUsers)),
            r#"<p class="empty">No users found.</p>"#
        );
        assert_eq!(
            results_html(&ResultsPane::Notice(Notice::FetchFailed)),
            r#"<p class="error">Failed to fetch results. Check backend URL.</p>"#
        );
        assert_eq!(results_html(&ResultsPane::Cleared), "");
    }

    #[test]
    fn test_results_html_card_markup() {
        let html = results_html(&ResultsPane::Users(vec![card("alice")]));

        assert_eq!(html.matches(r#"class="userBox""#).count(), 1);
        assert!(html.contains(r#"href="https://leetcode.com/alice/""#));
        assert!(html.contains("Rank: 1,234"));
        assert!(html.contains("<span>Anonymous</span>"));
        assert!(html.contains("<span>Unknown country</span>"));
        assert!(html.contains(r#"<div class="userSchool">MIT</div>"#));
    }

    #[test]
    fn test_results_html_escapes_user_text() {
        let mut evil = card("x");
        evil.display_name = "<script>alert(1)</script>".to_string();
        let html = results_html(&ResultsPane::Users(vec![evil]));

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_render_busy_disables_button() {
        let mut surface = HtmlSurface::new();
        let state = PopupState {
            trigger: TriggerState { busy: true },
            ..Default::default()
        };

        surface.render(&state);

        let button = surface.element(ids::SEARCH_BUTTON).unwrap();
        assert!(button.disabled);
        assert_eq!(button.inner_html, "Searching...");
        assert_eq!(surface.inner_html(ids::RESULTS), "");
        assert_eq!(surface.renders(), 1);
    }

    #[test]
    fn test_render_stats_shows_card() {
        let mut surface = HtmlSurface::new();
        let state = PopupState {
            results: ResultsPane::Users(vec![card("a"), card("b")]),
            filter_visible: true,
            stats: Some(Stats {
                matched: 5,
                filtered: 2,
                refreshed_at: Local::now(),
            }),
            ..Default::default()
        };

        surface.render(&state);

        assert!(!surface.is_hidden(ids::STATS));
        assert!(!surface.is_hidden(ids::FILTER_INPUT));
        assert_eq!(surface.inner_html(ids::TOTAL_USERS), "Profiles matched: 5");
        assert_eq!(surface.inner_html(ids::ACTIVE_USERS), "Filtered view: 2");
        assert!(
            surface
                .inner_html(ids::VARIATIONS)
                .starts_with("Last refreshed: ")
        );
    }
}
