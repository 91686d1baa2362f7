use std::{
    any::Any,
    collections::{HashMap, hash_map::Entry},
};

use crate::{Slot, Store, StoreError};

/// Single-owner store. Mutators take `&mut self`, so access is serialized
/// statically and no internal locking exists. Insertion order within a key
/// is preserved and observable via `get_list`.
#[derive(Default)]
pub struct MemoryStore {
    slots: HashMap<String, Slot>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }
}

impl Store for MemoryStore {
    fn add<T: Any + Send + Sync>(&mut self, key: &str, value: T) -> Result<(), StoreError> {
        match self.slots.entry(key.to_string()) {
            Entry::Occupied(mut entry) => {
                let slot = entry.get_mut();
                slot.ensure::<T>(key)?;
                slot.push(value);
            }
            Entry::Vacant(entry) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(key, value_type = std::any::type_name::<T>(), "registering key");

                entry.insert(Slot::of::<T>()).push(value);
            }
        }
        Ok(())
    }

    fn add_range<T: Any + Send + Sync>(
        &mut self,
        key: &str,
        values: Vec<T>,
    ) -> Result<(), StoreError> {
        if values.is_empty() {
            return Err(StoreError::InvalidValue {
                key: key.to_string(),
            });
        }

        match self.slots.entry(key.to_string()) {
            Entry::Occupied(mut entry) => {
                let slot = entry.get_mut();
                // validated before any element lands
                slot.ensure::<T>(key)?;
                slot.extend(values);
            }
            Entry::Vacant(entry) => {
                entry.insert(Slot::of::<T>()).extend(values);
            }
        }
        Ok(())
    }

    fn get_list<T: Any + Clone>(&self, key: &str) -> Result<Option<Vec<T>>, StoreError> {
        match self.slots.get(key) {
            Some(slot) => {
                slot.ensure::<T>(key)?;
                Ok(Some(slot.snapshot::<T>()))
            }
            None => Ok(None),
        }
    }

    fn update<T: Any>(
        &mut self,
        key: &str,
        filter: impl Fn(&T) -> bool,
        update: impl FnMut(&mut T),
    ) -> Result<(), StoreError> {
        let Some(slot) = self.slots.get_mut(key) else {
            return Ok(());
        };
        slot.ensure::<T>(key)?;
        slot.update_in_place(filter, update);
        Ok(())
    }

    fn remove<T: Any>(
        &mut self,
        key: &str,
        filter: impl Fn(&T) -> bool,
    ) -> Result<(), StoreError> {
        let Some(slot) = self.slots.get_mut(key) else {
            return Ok(());
        };
        slot.ensure::<T>(key)?;
        slot.retain(|value: &T| !filter(value));

        if slot.is_empty() {
            #[cfg(feature = "tracing")]
            tracing::debug!(key, "key emptied, dropping registration");

            self.slots.remove(key);
        }
        Ok(())
    }

    fn safe_dispose<T: Any>(&mut self, key: &str) -> Result<Option<Vec<T>>, StoreError> {
        match self.slots.entry(key.to_string()) {
            Entry::Occupied(entry) => {
                entry.get().ensure::<T>(key)?;
                Ok(Some(entry.remove().take::<T>()))
            }
            Entry::Vacant(_) => Ok(None),
        }
    }

    fn dispose(&mut self, key: &str) {
        self.slots.remove(key);
    }
}
