//! Remote field payloads for persons and submissions.
//!
//! Pure builders: nothing here talks to the tracking service.

use awardsync_core::entry::MAX_ENTRANT_SLOTS;
use awardsync_core::identity::{clean_state, latin1_lossy};
use awardsync_core::{EntityRef, Entry, Person};
use serde_json::{Map, Value, json};

// Review windows set on every submission, in milliseconds.
const TIME_TO_SCREEN_MS: i64 = 600_000;
const TIME_TO_VOTE_MS: i64 = 300_000;
const TIME_TO_READ_MS: i64 = 90_000;

/// What a person is being resolved as.
#[derive(Debug, Clone, Copy)]
pub enum PersonRole<'a> {
    /// Entrant in slot `number` (1-based).
    Entrant {
        number: usize,
        job_title: &'a str,
        credit_url: Option<&'a str>,
    },
    /// The `number`-th present signer (1-based).
    Signer { number: usize, job_title: &'a str },
    Contact,
}

/// A resolved entrant as linked from the submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitterSlot {
    pub person: EntityRef,
    pub job_title: String,
    pub credit_url: Option<Value>,
}

/// Everything the submission payload links to.
#[derive(Debug, Clone, Default)]
pub struct SubmissionLinks {
    pub category: Option<EntityRef>,
    pub vetting_checklist: Option<EntityRef>,
    /// One element per slot, `None` where the slot is empty.
    pub submitters: Vec<Option<SubmitterSlot>>,
    pub signatures: Vec<EntityRef>,
    pub contact: Option<EntityRef>,
    pub production_company: Option<EntityRef>,
}

/// URL link field value for a credit URL; empty URLs link nothing.
pub fn credit_link(url: Option<&str>) -> Option<Value> {
    let url = url.map(str::trim).filter(|u| !u.is_empty())?;
    Some(json!({
        "content_type": "string",
        "link_type": "url",
        "name": "sg_credit_url",
        "url": url,
    }))
}

/// Person fields for the given role. `login` and `projects` are added
/// during resolution.
pub fn person_fields(person: &Person, role: PersonRole<'_>) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert("firstname".into(), json!(person.first_name));
    fields.insert("lastname".into(), json!(person.last_name));
    fields.insert("email".into(), json!(person.email));
    fields.insert("sg_country".into(), json!(latin1_lossy(&person.country)));
    fields.insert("sg_fax".into(), json!(person.fax));
    fields.insert("sg_phone".into(), json!(person.phone));

    let full_address = |fields: &mut Map<String, Value>| {
        fields.insert("sg_address".into(), json!(person.street_address));
        fields.insert("sg_apt".into(), json!(person.suite));
        fields.insert("sg_city".into(), json!(person.city));
        fields.insert("sg_zip".into(), json!(person.zip));
        fields.insert("sg_state".into(), json!(clean_state(&person.state_province)));
        fields.insert(
            "sg_memo_id".into(),
            json!(person.vfx_member_num.as_deref().unwrap_or("")),
        );
    };

    match role {
        PersonRole::Entrant {
            number,
            job_title,
            credit_url,
        } => {
            full_address(&mut fields);
            fields.insert("sg_job_title".into(), json!(job_title));
            fields.insert("sg_entrant_number".into(), json!(number));
            fields.insert(
                "sg_credit_url".into(),
                credit_link(credit_url).unwrap_or(Value::Null),
            );
        }
        PersonRole::Signer { number, job_title } => {
            fields.insert("sg_job_title".into(), json!(job_title));
            fields.insert("sg_signature_number".into(), json!(number));
        }
        PersonRole::Contact => {
            full_address(&mut fields);
            fields.insert("sg_job_title".into(), json!(""));
        }
    }
    fields
}

/// Current project first, then the person's existing projects without
/// repeating an id.
pub fn merge_projects(current: &EntityRef, existing: &[EntityRef]) -> Vec<EntityRef> {
    let mut merged = vec![current.clone()];
    for project in existing {
        if !merged.iter().any(|p| p.id == project.id) {
            merged.push(project.clone());
        }
    }
    merged
}

fn ref_or_null(r: Option<&EntityRef>) -> Value {
    r.map(EntityRef::to_value).unwrap_or(Value::Null)
}

/// Full submission payload; the same payload is used for create and update.
pub fn submission_fields(
    entry: &Entry,
    project: &EntityRef,
    links: &SubmissionLinks,
) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert("code".into(), json!(entry.entry_num));
    fields.insert("sg_entry_title".into(), json!(entry.title));
    fields.insert("sg_project_title".into(), json!(entry.project_name));
    fields.insert(
        "sg_premiere_date".into(),
        json!(entry.premiere_date.format("%Y-%m-%d").to_string()),
    );
    fields.insert("project".into(), project.to_value());
    fields.insert("sg_category".into(), ref_or_null(links.category.as_ref()));
    fields.insert(
        "sg_production_company".into(),
        ref_or_null(links.production_company.as_ref()),
    );
    fields.insert("sg_terms_aggred".into(), json!(true));
    fields.insert("sg_facility_employed".into(), json!(entry.at_facility));

    let submitters: Vec<Value> = links
        .submitters
        .iter()
        .flatten()
        .map(|s| s.person.to_value())
        .collect();
    fields.insert("sg_submitter_list".into(), Value::Array(submitters));
    fields.insert(
        "sg_signature_list".into(),
        Value::Array(links.signatures.iter().map(EntityRef::to_value).collect()),
    );
    fields.insert("sg_contact".into(), ref_or_null(links.contact.as_ref()));

    fields.insert("sg_time_to_screen_submissions".into(), json!(TIME_TO_SCREEN_MS));
    fields.insert("sg_time_to_vote".into(), json!(TIME_TO_VOTE_MS));
    fields.insert("sg_time_to_read_suppliments".into(), json!(TIME_TO_READ_MS));
    fields.insert(
        "task_template".into(),
        ref_or_null(links.vetting_checklist.as_ref()),
    );
    fields.insert("sg_soho_updated".into(), json!(entry.last_edit.to_rfc3339()));
    fields.insert("sg_payment".into(), json!(entry.has_paid));
    fields.insert("sg_payment_amount".into(), json!(entry.payment_amount));

    for n in 1..=MAX_ENTRANT_SLOTS {
        let slot = links.submitters.get(n - 1).and_then(Option::as_ref);
        fields.insert(
            format!("sg_submitter_{n}"),
            ref_or_null(slot.map(|s| &s.person)),
        );
        fields.insert(
            format!("sg_submitter_{n}_url"),
            slot.and_then(|s| s.credit_url.clone()).unwrap_or(Value::Null),
        );
        fields.insert(
            format!("sg_submitter_{n}_job_title"),
            slot.map(|s| json!(s.job_title)).unwrap_or(Value::Null),
        );
    }
    fields
}
