//! Shotgun REST API v1 client.
//!
//! Authenticates as a script (client credentials) and caches the access
//! token until shortly before it expires. Uploads go through the service's
//! three-step flow: request an upload URL, PUT the bytes there, then
//! complete the upload against the record field.

use std::path::Path;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use awardsync_core::{Filter, Record};
use reqwest::header::{ACCEPT, CONTENT_LENGTH, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tokio::sync::Mutex;
use tokio_util::io::ReaderStream;
use tracing::{debug, info};

use crate::{SyncError, TrackingClient};

const FILTER_CONTENT_TYPE: &str = "application/vnd+shotgun.api3_array+json";

/// Chunk size for streamed uploads.
const UPLOAD_CHUNK_BYTES: usize = 1024 * 1024;

/// Refresh the token this long before the server says it expires.
const TOKEN_MARGIN: Duration = Duration::from_secs(60);

/// Script credentials for the tracking service.
#[derive(Debug, Clone)]
pub struct ShotgunCredentials {
    pub script_name: String,
    pub api_key: String,
}

struct AccessToken {
    value: String,
    refresh_at: Instant,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Deserialize)]
struct Resource {
    #[serde(rename = "type")]
    entity_type: String,
    id: i64,
    #[serde(default)]
    attributes: Map<String, Value>,
    #[serde(default)]
    relationships: Map<String, Value>,
}

impl Resource {
    /// Attributes and relationship targets as one field map.
    fn into_record(self) -> Record {
        let mut fields = self.attributes;
        for (name, rel) in self.relationships {
            fields.insert(name, rel.get("data").cloned().unwrap_or(Value::Null));
        }
        Record {
            entity_type: self.entity_type,
            id: self.id,
            fields,
        }
    }
}

#[derive(Deserialize)]
struct One {
    data: Resource,
}

#[derive(Deserialize)]
struct Many {
    data: Vec<Resource>,
}

#[derive(Deserialize)]
struct UploadTicket {
    data: Value,
    links: UploadLinks,
}

#[derive(Deserialize)]
struct UploadLinks {
    upload: String,
    complete_upload: String,
}

/// REST collection for an entity type: snake case, pluralised.
///
/// `HumanUser` → `human_users`, `CustomEntity04` → `custom_entity04s`.
pub fn collection_name(entity_type: &str) -> String {
    let mut out = String::with_capacity(entity_type.len() + 4);
    for (i, c) in entity_type.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out.push('s');
    out
}

/// HTTP client for the tracking service's REST API.
pub struct ShotgunClient {
    client: reqwest::Client,
    base_url: String,
    credentials: ShotgunCredentials,
    token: Mutex<Option<AccessToken>>,
}

impl ShotgunClient {
    /// `base_url` is the site root, like `https://ves.shotgunstudio.com`.
    pub fn new(base_url: &str, credentials: ShotgunCredentials) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
            token: Mutex::new(None),
        }
    }

    fn entity_url(&self, entity_type: &str) -> String {
        format!("{}/api/v1/entity/{}", self.base_url, collection_name(entity_type))
    }

    fn absolute(&self, link: &str) -> String {
        if link.starts_with("http://") || link.starts_with("https://") {
            link.to_string()
        } else {
            format!("{}{}", self.base_url, link)
        }
    }

    async fn access_token(&self) -> Result<String, SyncError> {
        let mut guard = self.token.lock().await;
        if let Some(token) = guard.as_ref().filter(|t| Instant::now() < t.refresh_at) {
            return Ok(token.value.clone());
        }

        let url = format!("{}/api/v1/auth/access_token", self.base_url);
        info!(url = %url, script = %self.credentials.script_name, "requesting access token");
        let resp = self
            .client
            .post(&url)
            .header(ACCEPT, "application/json")
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.credentials.script_name.as_str()),
                ("client_secret", self.credentials.api_key.as_str()),
            ])
            .send()
            .await?;
        let token: TokenResponse = check(resp).await?.json().await?;
        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(TOKEN_MARGIN);
        *guard = Some(AccessToken {
            value: token.access_token.clone(),
            refresh_at: Instant::now() + lifetime,
        });
        Ok(token.access_token)
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response, SyncError> {
        let token = self.access_token().await?;
        let resp = req
            .bearer_auth(token)
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        check(resp).await
    }

    async fn upload_field(
        &self,
        entity_type: &str,
        id: i64,
        path: &Path,
        field: &str,
        display_name: &str,
    ) -> Result<(), SyncError> {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(display_name);
        let url = format!("{}/{}/{}/_upload", self.entity_url(entity_type), id, field);
        let ticket: UploadTicket = self
            .send(self.client.get(&url).query(&[("filename", filename)]))
            .await?
            .json()
            .await?;

        let file = tokio::fs::File::open(path).await?;
        let len = file.metadata().await?.len();
        let body = reqwest::Body::wrap_stream(ReaderStream::with_capacity(file, UPLOAD_CHUNK_BYTES));
        let upload_url = self.absolute(&ticket.links.upload);
        info!(entity = entity_type, id, field, bytes = len, "uploading file");
        let put = self
            .client
            .put(&upload_url)
            .header(CONTENT_TYPE, "application/octet-stream")
            .header(CONTENT_LENGTH, len)
            .body(body);
        // Uploads to the site itself need the token; presigned storage URLs
        // reject it.
        if upload_url.starts_with(&self.base_url) {
            self.send(put).await?;
        } else {
            check(put.send().await?).await?;
        }

        let complete = json!({
            "upload_info": ticket.data,
            "upload_data": {"display_name": display_name},
        });
        self.send(
            self.client
                .post(self.absolute(&ticket.links.complete_upload))
                .json(&complete),
        )
        .await?;
        debug!(entity = entity_type, id, field, "upload complete");
        Ok(())
    }
}

async fn check(resp: reqwest::Response) -> Result<reqwest::Response, SyncError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(SyncError::Server {
            status: status.as_u16(),
            body,
        });
    }
    Ok(resp)
}

#[async_trait]
impl TrackingClient for ShotgunClient {
    async fn find_one(
        &self,
        entity_type: &str,
        filters: &[Filter],
        fields: &[&str],
    ) -> Result<Option<Record>, SyncError> {
        let url = format!("{}/_search", self.entity_url(entity_type));
        let body = serde_json::to_vec(&json!({ "filters": filters }))?;
        debug!(url = %url, filters = filters.len(), "searching");
        let found: Many = self
            .send(
                self.client
                    .post(&url)
                    .query(&[("fields", fields.join(",")), ("page[size]", "1".into())])
                    .header(CONTENT_TYPE, FILTER_CONTENT_TYPE)
                    .body(body),
            )
            .await?
            .json()
            .await?;
        Ok(found.data.into_iter().next().map(Resource::into_record))
    }

    async fn create(
        &self,
        entity_type: &str,
        fields: Map<String, Value>,
    ) -> Result<Record, SyncError> {
        let url = self.entity_url(entity_type);
        let created: One = self
            .send(self.client.post(&url).json(&fields))
            .await?
            .json()
            .await?;
        info!(entity = entity_type, id = created.data.id, "created record");
        Ok(created.data.into_record())
    }

    async fn update(
        &self,
        entity_type: &str,
        id: i64,
        fields: Map<String, Value>,
    ) -> Result<Record, SyncError> {
        let url = format!("{}/{}", self.entity_url(entity_type), id);
        let updated: One = self
            .send(self.client.put(&url).json(&fields))
            .await?
            .json()
            .await?;
        debug!(entity = entity_type, id, "updated record");
        Ok(updated.data.into_record())
    }

    async fn upload(
        &self,
        entity_type: &str,
        id: i64,
        path: &Path,
        field: &str,
        display_name: &str,
    ) -> Result<(), SyncError> {
        self.upload_field(entity_type, id, path, field, display_name)
            .await
    }

    async fn upload_thumbnail(
        &self,
        entity_type: &str,
        id: i64,
        path: &Path,
    ) -> Result<(), SyncError> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("thumbnail.jpg");
        self.upload_field(entity_type, id, path, "image", name).await
    }
}
