use std::collections::HashMap;
use std::sync::RwLock;

use silo_types::{Address, ContainerId, ObjectId};

use crate::error::{StoreError, StoreResult};
use crate::filter::{matches_all, SearchFilter};
use crate::object::{HeaderView, Object};
use crate::traits::StorageEngine;

/// In-memory, HashMap-based storage engine.
///
/// Intended for tests and single-process nodes. Objects and the graveyard
/// are held behind separate `RwLock`s; no operation holds both at once.
pub struct InMemoryEngine {
    objects: RwLock<HashMap<Address, Object>>,
    /// Removed address → tombstone address.
    graveyard: RwLock<HashMap<Address, Address>>,
}

impl InMemoryEngine {
    pub fn new() -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
            graveyard: RwLock::new(HashMap::new()),
        }
    }

    /// Number of objects physically stored.
    pub fn len(&self) -> usize {
        self.objects.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.read().expect("lock poisoned").is_empty()
    }

    /// Tombstone that removed `address`, if any.
    pub fn tombstone_of(&self, address: &Address) -> Option<Address> {
        self.graveyard
            .read()
            .expect("lock poisoned")
            .get(address)
            .copied()
    }

    fn is_removed(&self, address: &Address) -> bool {
        self.graveyard
            .read()
            .expect("lock poisoned")
            .contains_key(address)
    }

    fn stored(&self, address: &Address) -> StoreResult<Object> {
        self.objects
            .read()
            .expect("lock poisoned")
            .get(address)
            .cloned()
            .ok_or(StoreError::NotFound(*address))
    }
}

impl Default for InMemoryEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageEngine for InMemoryEngine {
    fn put(&self, object: &Object) -> StoreResult<()> {
        let mut map = self.objects.write().expect("lock poisoned");
        map.entry(object.address()).or_insert_with(|| object.clone());
        Ok(())
    }

    fn get(&self, address: &Address) -> StoreResult<Object> {
        if self.is_removed(address) {
            return Err(StoreError::AlreadyRemoved(*address));
        }
        self.stored(address)
    }

    fn head(&self, address: &Address, raw: bool) -> StoreResult<HeaderView> {
        if !raw && self.is_removed(address) {
            return Err(StoreError::AlreadyRemoved(*address));
        }
        let map = self.objects.read().expect("lock poisoned");
        map.get(address)
            .map(Object::header_view)
            .ok_or(StoreError::NotFound(*address))
    }

    fn select(
        &self,
        container: &ContainerId,
        filters: &[SearchFilter],
    ) -> StoreResult<Vec<ObjectId>> {
        let candidates: Vec<Address> = {
            let map = self.objects.read().expect("lock poisoned");
            map.iter()
                .filter(|(addr, obj)| {
                    addr.container == *container && matches_all(filters, &obj.header)
                })
                .map(|(addr, _)| *addr)
                .collect()
        };
        let graveyard = self.graveyard.read().expect("lock poisoned");
        let mut ids: Vec<ObjectId> = candidates
            .into_iter()
            .filter(|addr| !graveyard.contains_key(addr))
            .map(|addr| addr.object)
            .collect();
        ids.sort();
        Ok(ids)
    }

    fn inhume(&self, tombstone: &Address, targets: &[Address]) -> StoreResult<()> {
        let mut graveyard = self.graveyard.write().expect("lock poisoned");
        for target in targets {
            graveyard.insert(*target, *tombstone);
        }
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryEngine")
            .field("object_count", &self.len())
            .finish()
    }
}
