//! Local award entry model as exported by the awards web application.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of entrant slots on one entry.
pub const MAX_ENTRANT_SLOTS: usize = 5;

/// One award submission row from the web application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    /// Local database id.
    pub id: i64,
    /// Entry number; becomes the Submission `code` and never changes.
    pub entry_num: String,
    pub category_number: i64,
    /// Sequence or shot name.
    pub title: String,
    pub project_name: String,
    pub premiere_date: NaiveDate,
    #[serde(default)]
    pub at_facility: bool,
    /// Entrant slots in order; slot `n` (1-based) is entrant number `n`.
    #[serde(default)]
    pub slots: Vec<EntrantSlot>,
    #[serde(default)]
    pub signers: Signers,
    pub contact: Person,
    #[serde(default)]
    pub production_company: String,
    #[serde(default)]
    pub has_paid: bool,
    #[serde(default)]
    pub payment_amount: f64,
    /// Set by staff to keep this entry out of the tracking service.
    #[serde(default)]
    pub do_not_sync: bool,
    #[serde(default)]
    pub deleted: bool,
    pub last_edit: DateTime<Utc>,
    #[serde(default)]
    pub media: EntryMedia,
}

/// A person attached to an entry (entrant, signer, or contact).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Person {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub street_address: String,
    pub suite: String,
    pub city: String,
    pub state_province: String,
    pub country: String,
    pub zip: String,
    pub fax: String,
    pub phone: String,
    pub vfx_member_num: Option<String>,
}

/// Per-slot entrant data. The job title exists even when the slot has no
/// person, because signers borrow slot job titles by position.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EntrantSlot {
    pub person: Option<Person>,
    pub job_title: String,
    pub credit_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Signers {
    pub submitting: Option<Person>,
    pub vfx: Option<Person>,
    pub facility_manager: Option<Person>,
}

impl Signers {
    /// Signers present on the entry, in signature order.
    pub fn present(&self) -> impl Iterator<Item = &Person> {
        [&self.submitting, &self.vfx, &self.facility_manager]
            .into_iter()
            .flatten()
    }
}

/// Media located by the web application's file discovery.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EntryMedia {
    pub primary: Option<MediaFile>,
    pub alternate: Option<MediaFile>,
}

/// A discovered media file: its content hash and original file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaFile {
    pub hash: String,
    pub name: String,
}

impl MediaFile {
    /// File name without any leading directories.
    pub fn basename(&self) -> &str {
        self.name.rsplit(['/', '\\']).next().unwrap_or(&self.name)
    }
}

/// Which media variant a media phase works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaVariant {
    /// The main entry media ("aa").
    Primary,
    /// The before/after media ("ba").
    Alternate,
}

impl MediaVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "aa",
            Self::Alternate => "ba",
        }
    }

    /// Version field that stores this variant's scaled run time.
    pub fn run_time_field(&self) -> &'static str {
        match self {
            Self::Primary => "sg_entry_run_time",
            Self::Alternate => "sg_ba_run_time",
        }
    }
}

impl Entry {
    /// Content-addressed Version code for a proxy, also its object name.
    ///
    /// `"1234"`, Primary, `"abc"`, `"h264_720"` → `"1234.aa.abc.mov.h264_720.mp4"`
    pub fn media_code(&self, variant: MediaVariant, hash: &str, proxy_profile: &str) -> String {
        format!(
            "{}.{}.{}.mov.{}.mp4",
            self.entry_num,
            variant.as_str(),
            hash,
            proxy_profile
        )
    }

    pub fn aa_code(&self, hash: &str, proxy_profile: &str) -> String {
        self.media_code(MediaVariant::Primary, hash, proxy_profile)
    }

    pub fn ba_code(&self, hash: &str, proxy_profile: &str) -> String {
        self.media_code(MediaVariant::Alternate, hash, proxy_profile)
    }

    /// Version code and object name of the supplemental PDF.
    pub fn supplemental_code(&self) -> String {
        format!("{}.pdf", self.entry_num)
    }

    /// Slot at 1-based position `n`, if the entry has one.
    pub fn slot(&self, n: usize) -> Option<&EntrantSlot> {
        n.checked_sub(1).and_then(|i| self.slots.get(i))
    }
}
