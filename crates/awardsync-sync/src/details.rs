//! Details phase: references, people, company, the submission upsert and
//! its slates.

use awardsync_core::entry::MAX_ENTRANT_SLOTS;
use awardsync_core::remote::{DISABLED_STATUS, entity};
use awardsync_core::{CompanyMode, EntityRef, Entry, Filter, Person, derive_login};
use serde_json::{Map, Value, json};
use tracing::{debug, error, info, warn};

use crate::payload::{self, PersonRole, SubmissionLinks, SubmitterSlot};
use crate::synchronizer::{EntrySynchronizer, PhaseOutcome};
use crate::{SlateVariant, SyncError};

const VETTING_CHECKLIST_CODE: &str = "vettingCheckList";

impl EntrySynchronizer<'_> {
    pub(crate) async fn sync_details(&self, entry: &Entry) -> Result<PhaseOutcome, SyncError> {
        info!(entry = %entry.entry_num, "updating details");

        let category = self
            .find_in_project(
                entity::CATEGORY,
                vec![Filter::is("sg_category_number", entry.category_number)],
                &["code", "sg_category_number"],
            )
            .await?
            .ok_or_else(|| SyncError::MissingReference {
                entity: "category",
                key: entry.category_number.to_string(),
            })?;
        let vetting = self
            .find_in_project(
                entity::VETTING_CHECKLIST,
                vec![Filter::is("code", VETTING_CHECKLIST_CODE)],
                &["code"],
            )
            .await?
            .ok_or_else(|| SyncError::MissingReference {
                entity: "vetting checklist",
                key: VETTING_CHECKLIST_CODE.to_string(),
            })?;

        let links = SubmissionLinks {
            category: Some(EntityRef::new(entity::CATEGORY, category.id)),
            vetting_checklist: Some(EntityRef::new(entity::VETTING_CHECKLIST, vetting.id)),
            submitters: self.resolve_entrants(entry).await?,
            signatures: self.resolve_signers(entry).await?,
            contact: self
                .resolve_person(
                    &entry.contact,
                    payload::person_fields(&entry.contact, PersonRole::Contact),
                )
                .await?,
            production_company: self.resolve_company(&entry.production_company).await?,
        };
        let fields = payload::submission_fields(entry, &self.project, &links);

        let submission_id = match self.find_submission(entry, &["id"]).await? {
            Some(existing) => {
                info!(entry = %entry.entry_num, submission = existing.id, "updating submission");
                self.tracking
                    .update(entity::SUBMISSION, existing.id, fields)
                    .await?;
                existing.id
            }
            None => {
                info!(entry = %entry.entry_num, "creating new submission");
                self.tracking.create(entity::SUBMISSION, fields).await?.id
            }
        };

        for variant in SlateVariant::ALL {
            if let Err(e) = self.upload_slate(entry, submission_id, variant).await {
                error!(entry = %entry.entry_num, slate = variant.as_str(), error = %e, "slate upload failed");
            }
        }
        Ok(PhaseOutcome::Completed)
    }

    async fn resolve_entrants(&self, entry: &Entry) -> Result<Vec<Option<SubmitterSlot>>, SyncError> {
        let mut submitters = Vec::with_capacity(MAX_ENTRANT_SLOTS);
        for (i, slot) in entry.slots.iter().take(MAX_ENTRANT_SLOTS).enumerate() {
            let Some(person) = &slot.person else {
                submitters.push(None);
                continue;
            };
            let role = PersonRole::Entrant {
                number: i + 1,
                job_title: &slot.job_title,
                credit_url: slot.credit_url.as_deref(),
            };
            let resolved = self
                .resolve_person(person, payload::person_fields(person, role))
                .await?;
            submitters.push(resolved.map(|person| SubmitterSlot {
                person,
                job_title: slot.job_title.clone(),
                credit_url: payload::credit_link(slot.credit_url.as_deref()),
            }));
        }
        debug!(entry = %entry.entry_num, count = submitters.iter().flatten().count(), "resolved entrants");
        Ok(submitters)
    }

    async fn resolve_signers(&self, entry: &Entry) -> Result<Vec<EntityRef>, SyncError> {
        let mut signatures = Vec::new();
        for (k, person) in entry.signers.present().enumerate() {
            let number = k + 1;
            let job_title = entry.slot(number + 1).map_or("", |s| s.job_title.as_str());
            let role = PersonRole::Signer { number, job_title };
            if let Some(signer) = self
                .resolve_person(person, payload::person_fields(person, role))
                .await?
            {
                signatures.push(signer);
            }
        }
        Ok(signatures)
    }

    /// Upsert a person keyed by login. A person without a name resolves to
    /// nothing.
    async fn resolve_person(
        &self,
        person: &Person,
        mut fields: Map<String, Value>,
    ) -> Result<Option<EntityRef>, SyncError> {
        let Some(login) = derive_login(&person.first_name, &person.last_name) else {
            return Ok(None);
        };
        fields.insert("login".into(), json!(login));

        let existing = self
            .tracking
            .find_one(
                entity::PERSON,
                &[Filter::is("login", login.as_str())],
                &["groups", "projects"],
            )
            .await?;

        match existing {
            Some(found) => {
                let projects = payload::merge_projects(&self.project, &found.links("projects"));
                fields.insert(
                    "projects".into(),
                    Value::Array(projects.iter().map(EntityRef::to_value).collect()),
                );
                self.tracking.update(entity::PERSON, found.id, fields).await?;
                debug!(login = %login, id = found.id, "updated person");
                Ok(Some(EntityRef::new(entity::PERSON, found.id)))
            }
            None => {
                fields.insert("projects".into(), json!([self.project.to_value()]));
                fields.insert("sg_status_list".into(), json!(DISABLED_STATUS));
                let created = self.tracking.create(entity::PERSON, fields).await?;
                debug!(login = %login, id = created.id, "created person");
                Ok(Some(EntityRef::new(entity::PERSON, created.id)))
            }
        }
    }

    async fn resolve_company(&self, code: &str) -> Result<Option<EntityRef>, SyncError> {
        let found = self
            .tracking
            .find_one(entity::COMPANY, &[Filter::is("code", code)], &["code"])
            .await?;

        let create = match (self.config.company_mode, found) {
            (CompanyMode::Legacy, Some(_)) if !code.is_empty() => {
                warn!(company = code, "legacy company mode: creating a record for a company that already exists");
                true
            }
            (_, Some(found)) => return Ok(Some(EntityRef::new(entity::COMPANY, found.id))),
            (CompanyMode::Legacy, None) => false,
            (CompanyMode::LookupOrCreate, None) => !code.is_empty(),
        };
        if !create {
            return Ok(None);
        }

        let mut fields = Map::new();
        fields.insert("code".into(), json!(code));
        let created = self.tracking.create(entity::COMPANY, fields).await?;
        debug!(company = code, id = created.id, "created company");
        Ok(Some(EntityRef::new(entity::COMPANY, created.id)))
    }

    async fn upload_slate(
        &self,
        entry: &Entry,
        submission_id: i64,
        variant: SlateVariant,
    ) -> Result<(), SyncError> {
        let png = self.slates.render(entry.id, variant).await?;
        let name = variant.file_name(&entry.entry_num);
        let scratch = tempfile::TempDir::new()?;
        let path = scratch.path().join(&name);
        tokio::fs::write(&path, &png).await?;
        self.tracking
            .upload(entity::SUBMISSION, submission_id, &path, variant.field(), &name)
            .await?;
        debug!(entry = %entry.entry_num, slate = %name, "uploaded slate");
        Ok(())
    }
}
