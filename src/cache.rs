use crate::any::{self, Instance};

/// Resolved singletons keyed by canonical identifier.
///
/// `generation` is bumped by every accepted registration. An instance built under an older
/// generation is handed out but never stored.
#[derive(Clone, Default)]
pub(crate) struct Cache {
    map: any::Map,
    generation: u64,
}

impl Cache {
    #[inline]
    #[must_use]
    pub(crate) const fn new() -> Self {
        Self {
            map: any::Map::new(),
            generation: 0,
        }
    }

    #[inline]
    #[must_use]
    pub(crate) fn get(&self, id: &str) -> Option<Instance> {
        self.map.get(id).cloned()
    }

    #[inline]
    #[must_use]
    pub(crate) fn contains(&self, id: &str) -> bool {
        self.map.contains_key(id)
    }

    #[inline]
    #[must_use]
    pub(crate) const fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    pub(crate) fn bump_generation(&mut self) {
        self.generation += 1;
    }

    /// Stores the instance unless one is already cached for `id`, returning the cached one.
    ///
    /// # Errors
    /// Returns the instance back without storing it if the bindings changed since `generation`
    #[inline]
    pub(crate) fn insert_if_current(&mut self, id: String, instance: Instance, generation: u64) -> Result<Instance, Instance> {
        if generation != self.generation {
            return Err(instance);
        }
        Ok(self.map.entry(id).or_insert(instance).clone())
    }

    #[inline]
    pub(crate) fn remove(&mut self, id: &str) -> Option<Instance> {
        self.map.remove(id)
    }

    /// Keeps only the entries whose identifier matches the predicate, returning the count of removed ones
    pub(crate) fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) -> usize {
        let len = self.map.len();
        self.map.retain(|id, _| keep(id));
        len - self.map.len()
    }

    #[inline]
    #[must_use]
    pub(crate) fn len(&self) -> usize {
        self.map.len()
    }
}
