use awardsync_core::{Entry, EntryExport};

use crate::SyncError;

/// Where the outer entry points read local entries from.
pub trait EntrySource {
    fn entry(&self, id: i64) -> Result<Option<Entry>, SyncError>;

    fn entries(&self) -> Result<Vec<Entry>, SyncError>;
}

impl EntrySource for EntryExport {
    fn entry(&self, id: i64) -> Result<Option<Entry>, SyncError> {
        Ok(self.get(id).cloned())
    }

    fn entries(&self) -> Result<Vec<Entry>, SyncError> {
        Ok(EntryExport::entries(self).to_vec())
    }
}
