//! Duplicate rejection and capacity admission control.
//!
//! Both checks consume the request-scoped counters in [`BatchState`] and so
//! are only correct under strictly sequential row processing. The counters
//! do not see writes from concurrent requests; the storage collaborator's
//! [`ApplicationStore::try_reserve_slot`] carries the cross-request
//! capacity invariant.

use super::domain::{fold_email, BatchState, ScholarshipRule};
use super::outcome::RowError;
use super::store::ApplicationStore;

/// Reject a row colliding with an earlier row of this batch or with a
/// persisted application for the same `(scholarship, email)` pair.
pub(crate) fn check_duplicate<S: ApplicationStore>(
    store: &S,
    state: &mut BatchState,
    scholarship_id: i64,
    email: &str,
) -> Result<(), RowError> {
    let key = BatchState::dedup_key(scholarship_id, email);
    if state.seen_keys.contains(&key) {
        return Err(RowError::DuplicateInBatch);
    }

    if store.exists_application(scholarship_id, &fold_email(email))? {
        return Err(RowError::DuplicateInDb {
            email: email.trim().to_string(),
        });
    }

    Ok(())
}

/// Best-effort capacity pre-check over the batch counters.
pub(crate) fn check_capacity<S: ApplicationStore>(
    store: &S,
    state: &mut BatchState,
    rule: &ScholarshipRule,
) -> Result<(), RowError> {
    let Some(capacity) = rule.capacity.filter(|capacity| *capacity > 0) else {
        return Ok(());
    };

    let persisted = persisted_count(store, state, rule.id)?;
    let inserted = state.batch_inserted.get(&rule.id).copied().unwrap_or(0);
    if persisted + inserted >= capacity {
        return Err(RowError::CapacityReached(rule.id));
    }

    Ok(())
}

/// Ask the store for a slot as part of the same logical step as the insert.
/// A declined reservation is a capacity rejection, not a failure.
pub(crate) fn reserve_slot<S: ApplicationStore>(
    store: &S,
    rule: &ScholarshipRule,
) -> Result<(), RowError> {
    if rule.is_unlimited() {
        return Ok(());
    }

    if store.try_reserve_slot(rule.id)? {
        Ok(())
    } else {
        Err(RowError::CapacityReached(rule.id))
    }
}

fn persisted_count<S: ApplicationStore>(
    store: &S,
    state: &mut BatchState,
    scholarship_id: i64,
) -> Result<u32, RowError> {
    if let Some(count) = state.persisted_counts.get(&scholarship_id) {
        return Ok(*count);
    }

    let count = store.count_applications(scholarship_id)?;
    state.persisted_counts.insert(scholarship_id, count);
    Ok(count)
}
