use std::any::{Any, TypeId, type_name};

use crate::StoreError;

type BoxedValue = Box<dyn Any + Send + Sync>;

/// Per-key record: the values stored under one key plus the type witness
/// registered by the first insertion. Every later operation on the key is
/// checked against the witness before it may touch the values.
pub struct Slot {
    type_id: TypeId,
    type_name: &'static str,
    values: Vec<BoxedValue>,
}

impl Slot {
    pub fn of<T: Any>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            values: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Fails with `TypeConflict` unless `T` is the registered witness.
    pub fn ensure<T: Any>(&self, key: &str) -> Result<(), StoreError> {
        if self.type_id == TypeId::of::<T>() {
            Ok(())
        } else {
            Err(StoreError::TypeConflict {
                key: key.to_string(),
                expected: self.type_name,
                found: type_name::<T>(),
            })
        }
    }

    pub fn push<T: Any + Send + Sync>(&mut self, value: T) {
        self.values.push(Box::new(value));
    }

    pub fn extend<T: Any + Send + Sync>(&mut self, values: Vec<T>) {
        self.values
            .extend(values.into_iter().map(|value| Box::new(value) as BoxedValue));
    }

    /// Clones the values out; the returned vector never aliases the slot.
    pub fn snapshot<T: Any + Clone>(&self) -> Vec<T> {
        self.values
            .iter()
            .filter_map(|value| value.downcast_ref::<T>())
            .cloned()
            .collect()
    }

    /// Consumes the slot and moves the values out.
    pub fn take<T: Any>(self) -> Vec<T> {
        self.values
            .into_iter()
            .filter_map(|value| value.downcast::<T>().ok())
            .map(|value| *value)
            .collect()
    }

    /// Applies `update` to exactly the elements matching `filter` at call
    /// time; the matching set is decided before any update runs.
    pub fn update_in_place<T: Any>(
        &mut self,
        filter: impl Fn(&T) -> bool,
        mut update: impl FnMut(&mut T),
    ) {
        let matched: Vec<usize> = self
            .values
            .iter()
            .enumerate()
            .filter_map(|(i, value)| {
                value
                    .downcast_ref::<T>()
                    .filter(|value| filter(value))
                    .map(|_| i)
            })
            .collect();

        for i in matched {
            if let Some(value) = self.values[i].downcast_mut::<T>() {
                update(value);
            }
        }
    }

    pub fn retain<T: Any>(&mut self, keep: impl Fn(&T) -> bool) {
        self.values
            .retain(|value| value.downcast_ref::<T>().map(|value| keep(value)).unwrap_or(true));
    }

    /// Swaps every matching element for a clone of `replacement`. The new
    /// vector is built completely and published with a single assignment.
    pub fn replace_matching<T: Any + Send + Sync + Clone>(
        &mut self,
        filter: impl Fn(&T) -> bool,
        replacement: &T,
    ) {
        let current = std::mem::take(&mut self.values);
        let next: Vec<BoxedValue> = current
            .into_iter()
            .map(|value| {
                let matches = value.downcast_ref::<T>().is_some_and(|value| filter(value));
                if matches {
                    Box::new(replacement.clone()) as BoxedValue
                } else {
                    value
                }
            })
            .collect();
        self.values = next;
    }
}
