use silo_types::{Address, ContainerId, ObjectId, Range};

use crate::error::{StoreError, StoreResult};
use crate::filter::SearchFilter;
use crate::object::{HeaderView, Object};

/// Local object storage engine.
///
/// All implementations must satisfy these invariants:
/// - `put` of an object whose address is already stored is a no-op.
/// - Removal is logical: `inhume` records the tombstone in a graveyard and
///   the physical object stays readable through `head(.., raw = true)`.
/// - Reads of removed objects fail with [`StoreError::AlreadyRemoved`].
/// - Implementations are safe to share across threads.
pub trait StorageEngine: Send + Sync {
    /// Persist a complete object.
    fn put(&self, object: &Object) -> StoreResult<()>;

    /// Read the full object including payload.
    fn get(&self, address: &Address) -> StoreResult<Object>;

    /// Read the header. With `raw` set, graveyard status is ignored.
    fn head(&self, address: &Address, raw: bool) -> StoreResult<HeaderView>;

    /// Ids of live objects in `container` matching every filter, sorted.
    fn select(&self, container: &ContainerId, filters: &[SearchFilter])
        -> StoreResult<Vec<ObjectId>>;

    /// Mark `targets` as removed by the tombstone at `tombstone`.
    fn inhume(&self, tombstone: &Address, targets: &[Address]) -> StoreResult<()>;

    /// Read a byte range of the payload.
    ///
    /// Default implementation loads the whole object and slices it.
    fn get_range(&self, address: &Address, range: Range) -> StoreResult<Vec<u8>> {
        let object = self.get(address)?;
        let size = object.payload.len() as u64;
        match range.end() {
            Some(end) if end <= size => {
                Ok(object.payload[range.offset as usize..end as usize].to_vec())
            }
            _ => Err(StoreError::RangeOutOfBounds {
                address: *address,
                range,
                size,
            }),
        }
    }
}
