//! Shared types for LeetSearch client components.
//!
//! These mirror the JSON bodies served by the LeetSearch backend. Field names
//! follow the backend's camelCase convention on the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Deserialize a Vec that may be null or missing (both become empty vec)
fn deserialize_null_as_empty_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let opt: Option<Vec<T>> = Option::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}

/// Deserialize a String that may be null or missing (both become empty string)
fn deserialize_null_as_empty_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}

/// One profile returned by a college search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub username: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    #[serde(default, deserialize_with = "deserialize_null_as_empty_string")]
    pub school: String,

    /// Global contest ranking. Zero is a valid rank.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ranking: Option<i64>,
}

impl UserRecord {
    #[must_use]
    pub fn new(username: impl Into<String>, school: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            real_name: None,
            country: None,
            school: school.into(),
            ranking: None,
        }
    }

    #[must_use]
    pub fn with_real_name(mut self, real_name: impl Into<String>) -> Self {
        self.real_name = Some(real_name.into());
        self
    }

    #[must_use]
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    #[must_use]
    pub fn with_ranking(mut self, ranking: i64) -> Self {
        self.ranking = Some(ranking);
        self
    }
}

/// Body of `GET /search/college`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default, deserialize_with = "deserialize_null_as_empty_vec")]
    pub results: Vec<UserRecord>,

    #[serde(default)]
    pub total: u64,

    /// Canonical backend base the server wants clients to use from now on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend_url: Option<String>,

    /// Echo of the submitted query
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

impl SearchResponse {
    /// Returns the redirect target if it differs from `current_base`.
    #[must_use]
    pub fn redirect_from(&self, current_base: &str) -> Option<&str> {
        self.backend_url
            .as_deref()
            .filter(|url| !url.is_empty() && *url != current_base)
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    #[serde(default = "default_health_status")]
    pub status: String,

    #[serde(default)]
    pub profiles_cached: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

fn default_health_status() -> String {
    "ok".to_string()
}

/// Full cached profile as stored by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub username: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about_me: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ranking: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    #[serde(default, deserialize_with = "deserialize_null_as_empty_vec")]
    pub websites: Vec<String>,
}

/// Body of `GET /profiles/{username}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileResponse {
    /// False when the backend just refreshed the profile from the live site
    pub cached: bool,
    pub profile: Profile,
}

/// Largest `pages` the backend accepts for a refresh cycle.
pub const MAX_REFRESH_PAGES: u8 = 10;

/// Largest `max_users` the backend accepts for a refresh cycle.
pub const MAX_REFRESH_USERS: u16 = 200;

/// Body of `POST /refresh`. Field names are snake_case on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshRequest {
    /// Contest ranking pages to scrape, 1..=10
    pub pages: u8,
    /// Profiles to fetch from those pages, 1..=200
    pub max_users: u16,
}

impl Default for RefreshRequest {
    fn default() -> Self {
        Self {
            pages: 2,
            max_users: 25,
        }
    }
}

/// Acknowledgement of `POST /refresh`. The cycle itself runs in the background.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub started: bool,
    pub pages: u8,
    pub max_users: u16,
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_user_record_camel_case_fields() {
        let json = r#"{"username":"alice","realName":"Alice A","country":"US","school":"MIT","ranking":42}"#;
        let user: UserRecord = serde_json::from_str(json).unwrap();

        assert_eq!(user.username, "alice");
        assert_eq!(user.real_name.as_deref(), Some("Alice A"));
        assert_eq!(user.country.as_deref(), Some("US"));
        assert_eq!(user.school, "MIT");
        assert_eq!(user.ranking, Some(42));
    }

    #[test]
    fn test_user_record_optional_fields_absent() {
        let user: UserRecord =
            serde_json::from_str(r#"{"username":"bob","school":"Stanford"}"#).unwrap();

        assert!(user.real_name.is_none());
        assert!(user.country.is_none());
        assert!(user.ranking.is_none());
    }

    #[test]
    fn test_user_record_null_fields() {
        let json = r#"{"username":"bob","realName":null,"school":null,"ranking":null}"#;
        let user: UserRecord = serde_json::from_str(json).unwrap();

        assert!(user.real_name.is_none());
        assert_eq!(user.school, "");
        assert!(user.ranking.is_none());
    }

    #[test]
    fn test_user_record_zero_ranking_is_kept() {
        let user: UserRecord =
            serde_json::from_str(r#"{"username":"z","school":"X","ranking":0}"#).unwrap();
        assert_eq!(user.ranking, Some(0));
    }

    #[test]
    fn test_user_record_serialize_skips_none() {
        let user = UserRecord::new("carol", "CMU");
        let json = serde_json::to_string(&user).unwrap();
        assert_eq!(json, r#"{"username":"carol","school":"CMU"}"#);
    }

    #[test]
    fn test_search_response_results_omitted() {
        let resp: SearchResponse = serde_json::from_str(r#"{"total":3}"#).unwrap();
        assert!(resp.results.is_empty());
        assert_eq!(resp.total, 3);
    }

    #[test]
    fn test_search_response_results_null() {
        let resp: SearchResponse = serde_json::from_str(r#"{"results":null}"#).unwrap();
        assert!(resp.results.is_empty());
        assert_eq!(resp.total, 0);
        assert!(resp.backend_url.is_none());
    }

    #[test]
    fn test_search_response_full() {
        let json = r#"{
            "query": "mit",
            "total": 1,
            "results": [{"username": "alice", "school": "MIT", "ranking": 42}],
            "backendUrl": "https://api.example.com"
        }"#;
        let resp: SearchResponse = serde_json::from_str(json).unwrap();

        assert_eq!(resp.results.len(), 1);
        assert_eq!(resp.query.as_deref(), Some("mit"));
        assert_eq!(resp.backend_url.as_deref(), Some("https://api.example.com"));
    }

    #[test]
    fn test_redirect_from_differs() {
        let resp = SearchResponse {
            backend_url: Some("https://new.example.com".to_string()),
            ..Default::default()
        };
        assert_eq!(
            resp.redirect_from("http://localhost:8000"),
            Some("https://new.example.com")
        );
    }

    #[test]
    fn test_redirect_from_same_or_missing() {
        let same = SearchResponse {
            backend_url: Some("http://localhost:8000".to_string()),
            ..Default::default()
        };
        assert_eq!(same.redirect_from("http://localhost:8000"), None);

        let empty = SearchResponse {
            backend_url: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(empty.redirect_from("http://localhost:8000"), None);

        assert_eq!(
            SearchResponse::default().redirect_from("http://localhost:8000"),
            None
        );
    }

    #[test]
    fn test_health_response_parse() {
        let json = r#"{"status":"ok","profiles_cached":120,"last_updated":"2024-05-01T10:00:00Z"}"#;
        let health: HealthResponse = serde_json::from_str(json).unwrap();

        assert_eq!(health.status, "ok");
        assert_eq!(health.profiles_cached, 120);
        assert!(health.last_updated.is_some());
    }

    #[test]
    fn test_health_response_without_timestamp() {
        let health: HealthResponse =
            serde_json::from_str(r#"{"profiles_cached":0,"last_updated":null}"#).unwrap();
        assert_eq!(health.status, "ok");
        assert!(health.last_updated.is_none());
    }

    #[test]
    fn test_profile_response_parse() {
        let json = r#"{
            "cached": true,
            "profile": {
                "username": "alice",
                "countryName": "Canada",
                "aboutMe": "hi",
                "websites": null
            }
        }"#;
        let resp: ProfileResponse = serde_json::from_str(json).unwrap();

        assert!(resp.cached);
        assert_eq!(resp.profile.country_name.as_deref(), Some("Canada"));
        assert!(resp.profile.websites.is_empty());
    }

    proptest! {
        #[test]
        fn prop_missing_results_is_empty(total in 0u64..1_000_000, with_url in any::<bool>()) {
            let json = if with_url {
                format!(r#"{{"total":{total},"backendUrl":"http://b"}}"#)
            } else {
                format!(r#"{{"total":{total}}}"#)
            };
            let resp: SearchResponse = serde_json::from_str(&json).unwrap();
            prop_assert!(resp.results.is_empty());
            prop_assert_eq!(resp.total, total);
        }
    }

    #[test]
    fn test_refresh_request_uses_snake_case() {
        let json = serde_json::to_value(RefreshRequest::default()).unwrap();
        assert_eq!(json, serde_json::json!({"pages": 2, "max_users": 25}));
    }
}
