//! Test fixtures and helpers

use crate::backend::SearchBackend;
use crate::config::{ConfigStore, MemoryStore};
use crate::view::{PopupState, PopupView};
use crate::{Error, Result};
use leetsearch_types::{SearchResponse, UserRecord};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Create a user with only the required fields
pub fn make_user(username: &str, school: &str) -> UserRecord {
    UserRecord::new(username, school)
}

/// Create a fully populated user
pub fn make_full_user(
    username: &str,
    real_name: &str,
    country: &str,
    school: &str,
    ranking: i64,
) -> UserRecord {
    UserRecord::new(username, school)
        .with_real_name(real_name)
        .with_country(country)
        .with_ranking(ranking)
}

pub fn response_with(results: Vec<UserRecord>) -> SearchResponse {
    SearchResponse {
        total: results.len() as u64,
        results,
        ..Default::default()
    }
}

/// Store that counts reads and writes and can be told to fail
#[derive(Default)]
pub struct SpyStore {
    pub(crate) inner: MemoryStore,
    pub reads: AtomicUsize,
    pub writes: AtomicUsize,
    pub fail_reads: bool,
    pub fail_writes: bool,
}

impl SpyStore {
    pub fn with_value(key: &str, value: &str) -> Self {
        Self {
            inner: MemoryStore::with_value(key, value),
            ..Default::default()
        }
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl ConfigStore for SpyStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads {
            return Err(Error::Config("read failed".to_string()));
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes {
            return Err(Error::Config("write failed".to_string()));
        }
        self.inner.set(key, value).await
    }
}

/// What the stub backend answers with
#[derive(Clone)]
pub enum StubReply {
    Ok(SearchResponse),
    Status(u16),
    BadBody,
}

/// Backend that replays one canned reply and records every call
pub struct StubBackend {
    reply: Mutex<StubReply>,
    calls: Mutex<Vec<(String, String)>>,
}

impl StubBackend {
    pub fn new(reply: StubReply) -> Self {
        Self {
            reply: Mutex::new(reply),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn returning(response: SearchResponse) -> Self {
        Self::new(StubReply::Ok(response))
    }

    pub fn set_reply(&self, reply: StubReply) {
        *self.reply.lock().unwrap() = reply;
    }

    /// (base, query) pairs in call order
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl SearchBackend for StubBackend {
    async fn search(&self, base: &str, query: &str) -> Result<SearchResponse> {
        self.calls
            .lock()
            .unwrap()
            .push((base.to_string(), query.to_string()));
        let reply = self.reply.lock().unwrap().clone();
        match reply {
            StubReply::Ok(response) => Ok(response),
            StubReply::Status(code) => Err(Error::Status(code)),
            StubReply::BadBody => Err(serde_json::from_str::<SearchResponse>("<html>").unwrap_err().into()),
        }
    }
}

/// Surface that keeps a snapshot of every render
#[derive(Default)]
pub struct RecordingView {
    pub frames: Vec<PopupState>,
}

impl RecordingView {
    pub fn last(&self) -> &PopupState {
        self.frames.last().expect("nothing rendered yet")
    }
}

impl PopupView for RecordingView {
    fn render(&mut self, state: &PopupState) {
        self.frames.push(state.clone());
    }
}
