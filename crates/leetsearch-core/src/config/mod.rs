mod dirs;
mod store;

pub use dirs::Directories;
pub use store::{ConfigStore, FileStore, MemoryStore};

/// Backend used when nothing has been stored yet.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Storage key for the backend base URL. Kept identical to the default URL
/// so existing stored preferences stay readable.
pub const BACKEND_URL_KEY: &str = "http://localhost:8000";

/// Stored backend base URL, or [`DEFAULT_BACKEND_URL`] when it is unset,
/// blank or unreadable.
pub async fn backend_base_or_default<S: ConfigStore>(store: &S) -> String {
    match store.get(BACKEND_URL_KEY).await {
        Ok(Some(url)) if !url.trim().is_empty() => url,
        Ok(_) => DEFAULT_BACKEND_URL.to_string(),
        Err(e) => {
            tracing::warn!("Failed to read stored backend URL, using default: {}", e);
            DEFAULT_BACKEND_URL.to_string()
        }
    }
}
