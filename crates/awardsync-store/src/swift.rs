//! OpenStack Swift object store over HTTP.
//!
//! Authenticates with the v1 (TempAuth-style) handshake: the auth endpoint
//! returns `X-Storage-Url` and `X-Auth-Token`, which are reused for every
//! object request. A 401 re-authenticates once.

use std::path::Path;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Method, StatusCode};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::{DOWNLOAD_CHUNK_BYTES, Fetched, ObjectStore, StorageError, check_name};

/// Credentials for the Swift v1 auth endpoint.
#[derive(Debug, Clone)]
pub struct SwiftCredentials {
    pub auth_url: String,
    pub user: String,
    pub key: String,
}

#[derive(Debug, Clone)]
struct Session {
    storage_url: String,
    token: String,
}

pub struct SwiftStore {
    client: reqwest::Client,
    credentials: SwiftCredentials,
    session: Mutex<Option<Session>>,
}

impl SwiftStore {
    pub fn new(credentials: SwiftCredentials) -> Self {
        Self {
            client: reqwest::Client::new(),
            credentials,
            session: Mutex::new(None),
        }
    }

    async fn authenticate(&self) -> Result<Session, StorageError> {
        info!(url = %self.credentials.auth_url, "authenticating with object storage");
        let resp = self
            .client
            .get(&self.credentials.auth_url)
            .header("X-Auth-User", &self.credentials.user)
            .header("X-Auth-Key", &self.credentials.key)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(StorageError::Auth(format!(
                "auth endpoint returned {}",
                resp.status().as_u16()
            )));
        }
        let header = |name: &str| {
            resp.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
                .ok_or_else(|| StorageError::Auth(format!("missing {name} header")))
        };
        Ok(Session {
            storage_url: header("X-Storage-Url")?.trim_end_matches('/').to_string(),
            token: header("X-Auth-Token")?,
        })
    }

    async fn session(&self, refresh: bool) -> Result<Session, StorageError> {
        let mut guard = self.session.lock().await;
        if refresh || guard.is_none() {
            *guard = Some(self.authenticate().await?);
        }
        guard
            .clone()
            .ok_or_else(|| StorageError::Auth("no storage session".into()))
    }

    /// Send an object request, re-authenticating once on 401.
    async fn request(
        &self,
        method: Method,
        container: &str,
        name: &str,
    ) -> Result<reqwest::Response, StorageError> {
        check_name(container)?;
        check_name(name)?;

        let mut refresh = false;
        loop {
            let session = self.session(refresh).await?;
            let url = format!("{}/{}/{}", session.storage_url, container, name);
            let resp = self
                .client
                .request(method.clone(), &url)
                .header("X-Auth-Token", &session.token)
                .send()
                .await?;
            if resp.status() == StatusCode::UNAUTHORIZED && !refresh {
                refresh = true;
                continue;
            }
            return Ok(resp);
        }
    }
}

#[async_trait]
impl ObjectStore for SwiftStore {
    async fn exists(&self, container: &str, name: &str) -> Result<bool, StorageError> {
        let resp = self.request(Method::HEAD, container, name).await?;
        match resp.status() {
            s if s.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            s => Err(StorageError::Server {
                status: s.as_u16(),
                object: format!("{container}/{name}"),
            }),
        }
    }

    async fn fetch(
        &self,
        container: &str,
        name: &str,
        dest: &Path,
    ) -> Result<Fetched, StorageError> {
        let resp = self.request(Method::GET, container, name).await?;
        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(Fetched::NotFound);
        }
        if !status.is_success() {
            return Err(StorageError::Server {
                status: status.as_u16(),
                object: format!("{container}/{name}"),
            });
        }

        let file = tokio::fs::File::create(dest).await?;
        let mut writer = tokio::io::BufWriter::with_capacity(DOWNLOAD_CHUNK_BYTES, file);
        let mut stream = resp.bytes_stream();
        let mut bytes = 0u64;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            bytes += chunk.len() as u64;
            writer.write_all(&chunk).await?;
        }
        writer.flush().await?;

        debug!(container, object = name, bytes, "downloaded object");
        Ok(Fetched::Found { bytes })
    }
}
