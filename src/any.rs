use std::{
    any::Any,
    collections::BTreeMap,
    sync::Arc,
};

/// Shared, type-erased service value.
///
/// Everything the container hands out is an [`Instance`]; use [`downcast`] (or the typed
/// container helpers) to get the concrete type back.
pub type Instance = Arc<dyn Any + Send + Sync>;

pub(crate) type Map = BTreeMap<String, Instance>;

#[inline]
#[must_use]
pub fn instance<T: Send + Sync + 'static>(value: T) -> Instance {
    Arc::new(value)
}

/// Downcasts an instance to `Arc<T>`, returning the original instance on a type mismatch.
///
/// # Errors
/// Returns the untouched instance if it doesn't hold a `T`
#[inline]
pub fn downcast<T: Send + Sync + 'static>(instance: Instance) -> Result<Arc<T>, Instance> {
    instance.downcast()
}

#[cfg(test)]
mod tests {
    use super::{downcast, instance};

    struct Logger;

    #[test]
    fn test_downcast() {
        let value = instance(Logger);

        let value = downcast::<u8>(value).unwrap_err();
        assert!(downcast::<Logger>(value).is_ok());
    }
}
