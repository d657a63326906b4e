pub mod config;
pub mod entry;
pub mod export;
pub mod identity;
pub mod remote;
pub mod runtime;

pub use config::{CompanyMode, Containers, SyncConfig};
pub use entry::{EntrantSlot, Entry, EntryMedia, MediaFile, MediaVariant, Person, Signers};
pub use export::{EntryExport, ExportError};
pub use identity::derive_login;
pub use remote::{EntityRef, Filter, Record};
