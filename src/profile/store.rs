//! Profile persistence
//!
//! The profile lives in a single row keyed by a fixed id. Every store
//! supports the same two calls: read the row (absent is not an error) and
//! upsert the whole row.

use super::{ProfileRecord, DEFAULT_AVATAR_URL};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;

/// Row-keyed storage for the singleton profile
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Human-readable name used in logs
    fn name(&self) -> &str;

    /// Read the profile row, `None` if it does not exist yet
    async fn fetch(&self) -> Result<Option<ProfileRecord>, StoreError>;

    /// Insert or overwrite the profile row
    async fn upsert(&self, record: &ProfileRecord) -> Result<(), StoreError>;
}

/// Errors that can occur when reading or writing the profile
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Profile store unavailable")]
    Unavailable,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Store error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Request timeout")]
    Timeout,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Profile store not configured: {0}")]
    NotConfigured(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

impl StoreError {
    fn from_transport(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            StoreError::Timeout
        } else if e.is_connect() {
            StoreError::Unavailable
        } else {
            StoreError::Request(e)
        }
    }
}

/// Column layout of the profile table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRow {
    pub id: i64,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl ProfileRow {
    pub fn from_record(id: i64, record: &ProfileRecord) -> Self {
        Self {
            id,
            email: Some(record.email.clone()),
            phone: Some(record.phone.clone()),
            image_url: Some(record.avatar_image.clone()),
            password: Some(record.access_password.clone()),
        }
    }

    /// Null columns become empty, except the avatar and password which
    /// fall back to their defaults
    pub fn into_record(self) -> ProfileRecord {
        let avatar_image = self
            .image_url
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_AVATAR_URL.to_string());

        ProfileRecord {
            email: self.email.unwrap_or_default(),
            phone: self.phone.unwrap_or_default(),
            avatar_image,
            access_password: self.password.unwrap_or_default(),
        }
        .with_password_fallback()
    }
}

/// Read the profile at startup.
///
/// A missing row is created from `defaults`. A failed read is logged and
/// `defaults` are used without writing anything back.
pub async fn load_or_create(store: &dyn ProfileStore, defaults: &ProfileRecord) -> ProfileRecord {
    match store.fetch().await {
        Ok(Some(record)) => {
            tracing::debug!(store = store.name(), "Loaded profile");
            record.with_password_fallback()
        }
        Ok(None) => {
            let record = defaults.clone().with_password_fallback();
            tracing::info!(store = store.name(), "No profile found, creating defaults");
            if let Err(e) = store.upsert(&record).await {
                tracing::warn!(store = store.name(), error = %e, "Failed to create default profile");
            }
            record
        }
        Err(e) => {
            tracing::warn!(store = store.name(), error = %e, "Failed to load profile, using defaults");
            defaults.clone().with_password_fallback()
        }
    }
}

// ============================================
// REST (PostgREST) store
// ============================================

/// Connection settings for the remote profile table
#[derive(Debug, Clone)]
pub struct RestStoreConfig {
    /// Project URL, e.g. "https://xyz.supabase.co"
    pub base_url: String,
    pub api_key: String,
    pub table: String,
    pub profile_id: i64,
    pub request_timeout_ms: u64,
}

impl Default for RestStoreConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: String::new(),
            table: "profile".to_string(),
            profile_id: 1,
            request_timeout_ms: 10_000,
        }
    }
}

/// Profile row behind a PostgREST `rest/v1` endpoint
pub struct RestProfileStore {
    client: Client,
    config: RestStoreConfig,
}

impl RestProfileStore {
    pub fn new(config: RestStoreConfig) -> Result<Self, StoreError> {
        if config.base_url.trim().is_empty() {
            return Err(StoreError::NotConfigured("store url is empty".into()));
        }
        if config.api_key.trim().is_empty() {
            return Err(StoreError::NotConfigured("store api_key is empty".into()));
        }

        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &RestStoreConfig {
        &self.config
    }

    fn table_url(&self) -> String {
        format!(
            "{}/rest/v1/{}",
            self.config.base_url.trim_end_matches('/'),
            urlencoding::encode(&self.config.table)
        )
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
    }

    async fn error_from(response: reqwest::Response) -> StoreError {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        StoreError::ApiError {
            status: status.as_u16(),
            message: text,
        }
    }
}

#[async_trait]
impl ProfileStore for RestProfileStore {
    fn name(&self) -> &str {
        "rest"
    }

    async fn fetch(&self) -> Result<Option<ProfileRecord>, StoreError> {
        let id_filter = format!("eq.{}", self.config.profile_id);

        let response = self
            .authorized(self.client.get(self.table_url()))
            .query(&[("id", id_filter.as_str()), ("select", "*")])
            .send()
            .await
            .map_err(StoreError::from_transport)?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let rows: Vec<ProfileRow> = response.json().await.map_err(StoreError::Request)?;
        Ok(rows.into_iter().next().map(ProfileRow::into_record))
    }

    async fn upsert(&self, record: &ProfileRecord) -> Result<(), StoreError> {
        let row = ProfileRow::from_record(self.config.profile_id, record);

        let response = self
            .authorized(self.client.post(self.table_url()))
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&row)
            .send()
            .await
            .map_err(StoreError::from_transport)?;

        if response.status().is_success() {
            tracing::info!(profile_id = self.config.profile_id, "Profile saved");
            Ok(())
        } else {
            Err(Self::error_from(response).await)
        }
    }
}

// ============================================
// Local file store
// ============================================

/// Profile row kept as JSON on the local disk
pub struct FileProfileStore {
    path: PathBuf,
    profile_id: i64,
}

impl FileProfileStore {
    pub fn new(path: impl Into<PathBuf>, profile_id: i64) -> Self {
        Self {
            path: path.into(),
            profile_id,
        }
    }

    /// `profile.json` inside `data_dir`
    pub fn in_dir(data_dir: &Path, profile_id: i64) -> Self {
        Self::new(data_dir.join("profile.json"), profile_id)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ProfileStore for FileProfileStore {
    fn name(&self) -> &str {
        "file"
    }

    async fn fetch(&self) -> Result<Option<ProfileRecord>, StoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let row: ProfileRow = serde_json::from_str(&content)?;
        if row.id != self.profile_id {
            return Ok(None);
        }
        Ok(Some(row.into_record()))
    }

    async fn upsert(&self, record: &ProfileRecord) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let row = ProfileRow::from_record(self.profile_id, record);
        let json = serde_json::to_string_pretty(&row)?;

        // Atomic replace
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        tracing::debug!(path = ?self.path, "Profile written");
        Ok(())
    }
}

// ============================================
// In-memory store
// ============================================

/// Process-local store; reads and writes can be made to fail
#[derive(Default)]
pub struct MemoryProfileStore {
    record: RwLock<Option<ProfileRecord>>,
    upserts: AtomicUsize,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: ProfileRecord) -> Self {
        Self {
            record: RwLock::new(Some(record)),
            ..Self::default()
        }
    }

    /// Number of upserts attempted, failed ones included
    pub fn upsert_count(&self) -> usize {
        self.upserts.load(Ordering::SeqCst)
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub async fn snapshot(&self) -> Option<ProfileRecord> {
        self.record.read().await.clone()
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn fetch(&self) -> Result<Option<ProfileRecord>, StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable);
        }
        Ok(self.record.read().await.clone())
    }

    async fn upsert(&self, record: &ProfileRecord) -> Result<(), StoreError> {
        self.upserts.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable);
        }
        *self.record.write().await = Some(record.clone());
        Ok(())
    }
}
