use std::any::Any;

use dashmap::DashMap;
use typestore::{Slot, Store, StoreError};

/// Concurrency-safe store. All methods take `&self`; unsynchronized
/// callers may share one instance across threads. The dashmap entry/ref
/// guards are the per-key critical sections: type registration and value
/// insertion for a key happen under one exclusive guard, and `update` /
/// `remove` hold that guard for their whole read-modify-write cycle.
/// Operations on different keys proceed in parallel. Collection order is
/// unspecified.
pub struct DashStore {
    slots: DashMap<String, Slot>,
}

impl DashStore {
    pub fn new() -> Self {
        Self {
            slots: DashMap::new(),
        }
    }

    pub fn add<T: Any + Send + Sync>(&self, key: &str, value: T) -> Result<(), StoreError> {
        match self.slots.entry(key.to_string()) {
            dashmap::Entry::Occupied(mut entry) => {
                let slot = entry.get_mut();
                slot.ensure::<T>(key)?;
                slot.push(value);
            }
            dashmap::Entry::Vacant(entry) => {
                // two racing first inserts serialize here; exactly one
                // registers the key's type, the other re-enters Occupied
                #[cfg(feature = "tracing")]
                tracing::debug!(key, value_type = std::any::type_name::<T>(), "registering key");

                entry.insert(Slot::of::<T>()).push(value);
            }
        }
        Ok(())
    }

    pub fn add_range<T: Any + Send + Sync>(
        &self,
        key: &str,
        values: Vec<T>,
    ) -> Result<(), StoreError> {
        if values.is_empty() {
            return Err(StoreError::InvalidValue {
                key: key.to_string(),
            });
        }

        // one guard across the whole batch: validate first, then append,
        // with no same-key operation interleaved
        match self.slots.entry(key.to_string()) {
            dashmap::Entry::Occupied(mut entry) => {
                let slot = entry.get_mut();
                slot.ensure::<T>(key)?;
                slot.extend(values);
            }
            dashmap::Entry::Vacant(entry) => {
                let mut slot = Slot::of::<T>();
                slot.extend(values);
                entry.insert(slot);
            }
        }
        Ok(())
    }

    pub fn get_list<T: Any + Clone>(&self, key: &str) -> Result<Option<Vec<T>>, StoreError> {
        match self.slots.get(key) {
            Some(slot) => {
                slot.ensure::<T>(key)?;
                Ok(Some(slot.snapshot::<T>()))
            }
            None => Ok(None),
        }
    }

    pub fn update<T: Any>(
        &self,
        key: &str,
        filter: impl Fn(&T) -> bool,
        update: impl FnMut(&mut T),
    ) -> Result<(), StoreError> {
        let Some(mut slot) = self.slots.get_mut(key) else {
            return Ok(());
        };
        slot.ensure::<T>(key)?;
        slot.update_in_place(filter, update);
        Ok(())
    }

    /// Replace-mode update: swaps every element matching `filter` for a
    /// clone of `replacement`. The new collection is published as a single
    /// replacement, so concurrent readers never observe an intermediate
    /// state.
    pub fn update_replace<T: Any + Send + Sync + Clone>(
        &self,
        key: &str,
        filter: impl Fn(&T) -> bool,
        replacement: T,
    ) -> Result<(), StoreError> {
        let Some(mut slot) = self.slots.get_mut(key) else {
            return Ok(());
        };
        slot.ensure::<T>(key)?;
        slot.replace_matching(filter, &replacement);
        Ok(())
    }

    pub fn remove<T: Any>(&self, key: &str, filter: impl Fn(&T) -> bool) -> Result<(), StoreError> {
        match self.slots.entry(key.to_string()) {
            dashmap::Entry::Occupied(mut entry) => {
                let slot = entry.get_mut();
                slot.ensure::<T>(key)?;
                slot.retain(|value: &T| !filter(value));

                if slot.is_empty() {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(key, "key emptied, dropping registration");

                    entry.remove();
                }
            }
            dashmap::Entry::Vacant(_) => {}
        }
        Ok(())
    }

    pub fn safe_dispose<T: Any>(&self, key: &str) -> Result<Option<Vec<T>>, StoreError> {
        match self.slots.entry(key.to_string()) {
            dashmap::Entry::Occupied(entry) => {
                // checked before removal so a conflict leaves the key intact
                entry.get().ensure::<T>(key)?;
                Ok(Some(entry.remove().take::<T>()))
            }
            dashmap::Entry::Vacant(_) => Ok(None),
        }
    }

    pub fn dispose(&self, key: &str) {
        self.slots.remove(key);
    }
}

impl Default for DashStore {
    fn default() -> Self {
        Self::new()
    }
}

// Unique access satisfies the shared contract; concurrent callers use the
// inherent `&self` methods directly.
impl Store for DashStore {
    fn add<T: Any + Send + Sync>(&mut self, key: &str, value: T) -> Result<(), StoreError> {
        DashStore::add(self, key, value)
    }

    fn add_range<T: Any + Send + Sync>(
        &mut self,
        key: &str,
        values: Vec<T>,
    ) -> Result<(), StoreError> {
        DashStore::add_range(self, key, values)
    }

    fn get_list<T: Any + Clone>(&self, key: &str) -> Result<Option<Vec<T>>, StoreError> {
        DashStore::get_list(self, key)
    }

    fn update<T: Any>(
        &mut self,
        key: &str,
        filter: impl Fn(&T) -> bool,
        update: impl FnMut(&mut T),
    ) -> Result<(), StoreError> {
        DashStore::update(self, key, filter, update)
    }

    fn remove<T: Any>(
        &mut self,
        key: &str,
        filter: impl Fn(&T) -> bool,
    ) -> Result<(), StoreError> {
        DashStore::remove(self, key, filter)
    }

    fn safe_dispose<T: Any>(&mut self, key: &str) -> Result<Option<Vec<T>>, StoreError> {
        DashStore::safe_dispose(self, key)
    }

    fn dispose(&mut self, key: &str) {
        DashStore::dispose(self, key)
    }
}
