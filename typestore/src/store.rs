use std::any::Any;

use crate::StoreError;

/// Shared contract of the keyed, type-locked, multi-value store.
///
/// Each key holds a collection of values of one runtime type, fixed by the
/// first insertion under that key and enforced on every later one. The
/// accessors are generic; the key's registered type is compared against
/// `T` at runtime, so mixing unrelated types under one key fails with
/// [`StoreError::TypeConflict`] instead of silently coercing.
pub trait Store {
    /// Appends `value` under `key`, registering `T` as the key's type if
    /// the key is new.
    fn add<T: Any + Send + Sync>(&mut self, key: &str, value: T) -> Result<(), StoreError>;

    /// Appends every element of `values` under `key`. The batch is
    /// validated before any element is appended: an empty batch fails with
    /// [`StoreError::InvalidValue`], a type conflict fails with
    /// [`StoreError::TypeConflict`], and either failure leaves the store
    /// unmodified for this call.
    fn add_range<T: Any + Send + Sync>(
        &mut self,
        key: &str,
        values: Vec<T>,
    ) -> Result<(), StoreError>;

    /// Returns a snapshot of the key's current collection, or `None` if
    /// the key does not exist. The snapshot never aliases internal
    /// storage; later mutations do not change it.
    fn get_list<T: Any + Clone>(&self, key: &str) -> Result<Option<Vec<T>>, StoreError>;

    /// Applies `update` in place to exactly the elements matching `filter`
    /// at call time. No-op if the key does not exist or nothing matches.
    fn update<T: Any>(
        &mut self,
        key: &str,
        filter: impl Fn(&T) -> bool,
        update: impl FnMut(&mut T),
    ) -> Result<(), StoreError>;

    /// Removes exactly the elements matching `filter`. A key whose
    /// collection empties is erased together with its type registration,
    /// so a later `add` may establish a brand-new type. No-op if the key
    /// does not exist.
    fn remove<T: Any>(&mut self, key: &str, filter: impl Fn(&T) -> bool)
    -> Result<(), StoreError>;

    /// Removes the key and returns its entire collection, or `None` if
    /// the key does not exist. On a type conflict the key is left intact.
    fn safe_dispose<T: Any>(&mut self, key: &str) -> Result<Option<Vec<T>>, StoreError>;

    /// Removes the key and discards its values. No-op if absent.
    fn dispose(&mut self, key: &str);
}
