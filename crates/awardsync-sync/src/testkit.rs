//! In-memory collaborators for synchronizer tests.

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use awardsync_core::remote::entity;
use awardsync_core::{
    CompanyMode, Containers, EntityRef, Entry, Filter, MediaFile, Record, SyncConfig,
};
use awardsync_store::{Fetched, FsStore, ObjectStore, StorageError};
use serde_json::{Map, Value, json};
use tempfile::TempDir;

use crate::{
    EntrySynchronizer, ExportedMedia, MediaProbe, SlateRenderer, SlateVariant, SyncError,
    TrackingClient,
};

pub const PROJECT_ID: i64 = 68;
pub const PROFILE: &str = "h264_720";

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Find { entity: String },
    Create { entity: String, fields: Map<String, Value> },
    Update { entity: String, id: i64, fields: Map<String, Value> },
    Upload { entity: String, id: i64, field: String, display_name: String },
    Thumbnail { entity: String, id: i64 },
}

impl Call {
    pub fn is_find(&self) -> bool {
        matches!(self, Call::Find { .. })
    }
}

#[derive(Default)]
struct State {
    records: Vec<Record>,
    next_id: i64,
    calls: Vec<Call>,
    failing_uploads: Vec<String>,
    failing_thumbnails: bool,
}

/// Tracking service backed by a record list. Finds match `is` filters on
/// stored fields; uploads store `{"name": display_name}` in the field.
#[derive(Default)]
pub struct FakeTracking {
    state: Mutex<State>,
}

impl FakeTracking {
    pub fn new() -> Self {
        let fake = Self::default();
        fake.state.lock().unwrap().next_id = 100;
        fake
    }

    /// Insert a record without logging a call.
    pub fn seed(&self, entity_type: &str, fields: Value) -> i64 {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = state.next_id;
        state.records.push(Record {
            entity_type: entity_type.into(),
            id,
            fields: fields.as_object().cloned().unwrap_or_default(),
        });
        id
    }

    /// Category and vetting checklist every details phase needs.
    pub fn seed_references(&self, category_number: i64) {
        let project = EntityRef::project(PROJECT_ID).to_value();
        self.seed(
            entity::CATEGORY,
            json!({"code": "Outstanding Compositing", "sg_category_number": category_number, "project": project}),
        );
        self.seed(
            entity::VETTING_CHECKLIST,
            json!({"code": "vettingCheckList", "project": project}),
        );
    }

    pub fn fail_uploads_to(&self, field: &str) {
        self.state.lock().unwrap().failing_uploads.push(field.into());
    }

    pub fn fail_thumbnails(&self) {
        self.state.lock().unwrap().failing_thumbnails = true;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub fn records(&self, entity_type: &str) -> Vec<Record> {
        let state = self.state.lock().unwrap();
        state
            .records
            .iter()
            .filter(|r| r.entity_type == entity_type)
            .cloned()
            .collect()
    }

    pub fn by_code(&self, entity_type: &str, code: &str) -> Option<Record> {
        self.records(entity_type)
            .into_iter()
            .find(|r| r.fields.get("code") == Some(&json!(code)))
    }

    pub fn creates_of(&self, entity_type: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Create { entity, .. } if entity == entity_type))
            .count()
    }

    pub fn uploads(&self) -> Vec<(String, String)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Upload {
                    field,
                    display_name,
                    ..
                } => Some((field, display_name)),
                Call::Thumbnail { .. } => Some(("image".into(), String::new())),
                _ => None,
            })
            .collect()
    }
}

fn filter_matches(record: &Record, filter: &Filter) -> bool {
    assert_eq!(filter.operator(), "is", "fake only supports `is` filters");
    if filter.field() == "id" {
        return filter.value().as_i64() == Some(record.id);
    }
    record.fields.get(filter.field()) == Some(filter.value())
}

#[async_trait]
impl TrackingClient for FakeTracking {
    async fn find_one(
        &self,
        entity_type: &str,
        filters: &[Filter],
        _fields: &[&str],
    ) -> Result<Option<Record>, SyncError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Find {
            entity: entity_type.into(),
        });
        Ok(state
            .records
            .iter()
            .find(|r| r.entity_type == entity_type && filters.iter().all(|f| filter_matches(r, f)))
            .cloned())
    }

    async fn create(
        &self,
        entity_type: &str,
        fields: Map<String, Value>,
    ) -> Result<Record, SyncError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Create {
            entity: entity_type.into(),
            fields: fields.clone(),
        });
        state.next_id += 1;
        let record = Record {
            entity_type: entity_type.into(),
            id: state.next_id,
            fields,
        };
        state.records.push(record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        entity_type: &str,
        id: i64,
        fields: Map<String, Value>,
    ) -> Result<Record, SyncError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Update {
            entity: entity_type.into(),
            id,
            fields: fields.clone(),
        });
        let record = state
            .records
            .iter_mut()
            .find(|r| r.entity_type == entity_type && r.id == id)
            .ok_or_else(|| SyncError::Server {
                status: 404,
                body: format!("{entity_type} {id} not found"),
            })?;
        record.fields.extend(fields);
        Ok(record.clone())
    }

    async fn upload(
        &self,
        entity_type: &str,
        id: i64,
        path: &Path,
        field: &str,
        display_name: &str,
    ) -> Result<(), SyncError> {
        assert!(path.exists(), "upload source {} missing", path.display());
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Upload {
            entity: entity_type.into(),
            id,
            field: field.into(),
            display_name: display_name.into(),
        });
        if state.failing_uploads.iter().any(|f| f == field) {
            return Err(SyncError::Server {
                status: 500,
                body: "upload rejected".into(),
            });
        }
        if let Some(record) = state
            .records
            .iter_mut()
            .find(|r| r.entity_type == entity_type && r.id == id)
        {
            record
                .fields
                .insert(field.into(), json!({"name": display_name}));
        }
        Ok(())
    }

    async fn upload_thumbnail(
        &self,
        entity_type: &str,
        id: i64,
        path: &Path,
    ) -> Result<(), SyncError> {
        assert!(path.exists(), "thumbnail source {} missing", path.display());
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Thumbnail {
            entity: entity_type.into(),
            id,
        });
        if state.failing_thumbnails {
            return Err(SyncError::Server {
                status: 500,
                body: "thumbnail rejected".into(),
            });
        }
        Ok(())
    }
}

/// Slates as fixed bytes, or a render error.
pub struct FakeSlates {
    pub fail: bool,
}

#[async_trait]
impl SlateRenderer for FakeSlates {
    async fn render(&self, entry_id: i64, variant: SlateVariant) -> Result<Vec<u8>, SyncError> {
        if self.fail {
            return Err(SyncError::Slate(format!("no slate for {entry_id}")));
        }
        Ok(format!("PNG {entry_id} {}", variant.as_str()).into_bytes())
    }
}

/// Fixed duration, or a probe error when `None`.
pub struct FakeProbe {
    pub secs: Option<f64>,
}

#[async_trait]
impl MediaProbe for FakeProbe {
    async fn duration_secs(&self, _path: &Path) -> Result<f64, SyncError> {
        self.secs
            .ok_or_else(|| SyncError::Probe("unreadable duration".into()))
    }
}

/// Object store whose every request fails with a server error.
pub struct BrokenStore;

impl BrokenStore {
    fn error(container: &str, name: &str) -> StorageError {
        StorageError::Server {
            status: 503,
            object: format!("{container}/{name}"),
        }
    }
}

#[async_trait]
impl ObjectStore for BrokenStore {
    async fn exists(&self, container: &str, name: &str) -> Result<bool, StorageError> {
        Err(Self::error(container, name))
    }

    async fn fetch(
        &self,
        container: &str,
        name: &str,
        _dest: &Path,
    ) -> Result<Fetched, StorageError> {
        Err(Self::error(container, name))
    }
}

/// Collaborators plus a media root on disk laid out as containers.
pub struct Harness {
    pub config: SyncConfig,
    pub tracking: FakeTracking,
    pub storage: FsStore,
    pub slates: FakeSlates,
    pub probe: FakeProbe,
    pub locator: ExportedMedia,
    media_root: TempDir,
}

impl Harness {
    pub fn new() -> Self {
        let media_root = TempDir::new().unwrap();
        for container in ["proxies", "thumbs", "pdfs"] {
            std::fs::create_dir_all(media_root.path().join(container)).unwrap();
        }
        Self {
            config: SyncConfig {
                update_remote: true,
                project_id: PROJECT_ID,
                proxy_profile: PROFILE.into(),
                containers: Containers {
                    proxies: "proxies".into(),
                    thumbnails: "thumbs".into(),
                    pdfs: "pdfs".into(),
                },
                company_mode: CompanyMode::Legacy,
            },
            tracking: FakeTracking::new(),
            storage: FsStore::new(media_root.path()),
            slates: FakeSlates { fail: false },
            probe: FakeProbe { secs: Some(12.9) },
            locator: ExportedMedia,
            media_root,
        }
    }

    pub fn synchronizer(&self) -> EntrySynchronizer<'_> {
        EntrySynchronizer::new(
            &self.config,
            &self.tracking,
            &self.storage,
            &self.slates,
            &self.probe,
            &self.locator,
        )
    }

    /// Same collaborators, reading media from `storage` instead.
    pub fn synchronizer_with<'a>(&'a self, storage: &'a dyn ObjectStore) -> EntrySynchronizer<'a> {
        EntrySynchronizer::new(
            &self.config,
            &self.tracking,
            storage,
            &self.slates,
            &self.probe,
            &self.locator,
        )
    }

    /// Put an object into a container on disk.
    pub fn put_object(&self, container: &str, name: &str, body: &[u8]) {
        std::fs::write(self.media_root.path().join(container).join(name), body).unwrap();
    }
}

/// A new entry with one entrant, one signer, a contact and primary media.
pub fn entry() -> Entry {
    serde_json::from_value(json!({
        "id": 7,
        "entry_num": "1234",
        "category_number": 3,
        "title": "Harbour Sequence",
        "project_name": "Tidewater",
        "premiere_date": "2026-03-01",
        "production_company": "Lantern VFX",
        "slots": [
            {"person": {"first_name": "Kai", "last_name": "Ito"}, "job_title": "VFX Supervisor",
             "credit_url": "https://credits.example/kai"},
            {"job_title": "Producer"}
        ],
        "signers": {"submitting": {"first_name": "Sue", "last_name": "Park"}},
        "contact": {"first_name": "Ana", "last_name": "Lopez", "email": "ana@example.org"},
        "last_edit": "2026-10-01T12:00:00Z",
        "media": {"primary": {"hash": "d41d8", "name": "uploads/harbour_v3.mov"}}
    }))
    .unwrap()
}

pub fn primary_code() -> String {
    format!("1234.aa.d41d8.mov.{PROFILE}.mp4")
}

pub fn alternate_media() -> MediaFile {
    MediaFile {
        hash: "e99a1".into(),
        name: "uploads/harbour_bna.mov".into(),
    }
}
