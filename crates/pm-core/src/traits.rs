//! Identity traits shared by every stored record

use crate::error::PmError;
use crate::result::PmResult;

/// Primary key type for projects, requirements, members and updates
pub type Id = i64;

/// Records that carry an integer identity inside their collection
pub trait Identifiable {
    fn id(&self) -> Id;
}

/// Human-readable type name, used in `NotFound` errors and log fields
pub trait Entity: Identifiable {
    const TYPE_NAME: &'static str;
}

/// Next id for a collection: `max(existing ids ∪ {0}) + 1`
///
/// Ids are recomputed from what is currently stored, so deleting the record
/// with the highest id makes that id available again. Fails once the highest
/// id is `Id::MAX`, which only imported data can reach.
pub fn next_id<'a, T, I>(records: I) -> PmResult<Id>
where
    T: Identifiable + 'a,
    I: IntoIterator<Item = &'a T>,
{
    id_after(records.into_iter().map(|r| r.id()).fold(0, Id::max))
}

/// `id + 1`, or an error when `id` is already the largest representable id
pub fn id_after(id: Id) -> PmResult<Id> {
    id.checked_add(1)
        .ok_or_else(|| PmError::Internal(format!("no id available after {}", id)))
}

/// True when no two records share an id
pub fn ids_unique<'a, T, I>(records: I) -> bool
where
    T: Identifiable + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut seen = std::collections::HashSet::new();
    records.into_iter().all(|r| seen.insert(r.id()))
}
