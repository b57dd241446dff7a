//! Id to object resolution
//!
//! The tag index and the resource store are allowed to disagree: an object can
//! be deleted after it was tagged. Ids that no longer resolve are dropped from
//! the result and logged, never reported as errors.

use super::error::SearchError;
use super::traits::ResourceStore;
use crate::model::{Resource, ResourceId, ResourceType};
use log::warn;

/// Fetch the objects behind `ids`, skipping ids the store does not know
///
/// # Errors
///
/// Returns `SearchError::BackendUnavailable` if the store fails.
pub fn resolve_ids<R: ResourceStore + ?Sized>(
    store: &R,
    ids: &[ResourceId],
    kind: ResourceType,
) -> Result<Vec<Resource>, SearchError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let fetched = store.fetch_by_ids(ids, kind)?;
    for id in &fetched.missing {
        warn!("dropping {kind} {id}: tagged in the index but missing from the store");
    }
    Ok(fetched.found)
}
