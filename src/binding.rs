use std::{
    collections::BTreeMap,
    fmt::{self, Debug, Formatter},
};

use crate::{
    any::{self, Instance},
    class::Args,
    config::Config,
    container::Resolver,
    errors::InstantiateErrorKind,
    instantiator::{boxed_instantiator, BoxedCloneInstantiator},
};

/// Registered recipe for producing a service
#[derive(Clone)]
pub enum Binding {
    /// Value built outside the container, handed out as is
    Instance(Instance),
    /// Callable invoked with a resolver handle and the explicit arguments
    Factory(BoxedCloneInstantiator),
    /// Class name looked up in the class descriptor table
    Class(String),
}

impl Binding {
    #[inline]
    #[must_use]
    pub fn instance<T: Send + Sync + 'static>(value: T) -> Self {
        Self::Instance(any::instance(value))
    }

    #[inline]
    #[must_use]
    pub fn factory<T, F>(factory: F) -> Self
    where
        T: Send + Sync + 'static,
        F: FnMut(&mut Resolver, Args) -> Result<T, InstantiateErrorKind> + Clone + Send + Sync + 'static,
    {
        Self::Factory(boxed_instantiator(factory))
    }

    #[inline]
    #[must_use]
    pub fn class(name: impl Into<String>) -> Self {
        Self::Class(name.into())
    }

    /// Class name this binding points to, the only binding value that can act as an alias
    #[inline]
    #[must_use]
    pub fn class_name(&self) -> Option<&str> {
        match self {
            Self::Class(name) => Some(name),
            Self::Instance(_) | Self::Factory(_) => None,
        }
    }
}

impl Debug for Binding {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Instance(_) => f.write_str("Instance"),
            Self::Factory(_) => f.write_str("Factory"),
            Self::Class(name) => f.debug_tuple("Class").field(name).finish(),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct BindingData {
    pub(crate) binding: Binding,
    pub(crate) config: Config,
}

/// One table of bindings keyed by identifier
#[derive(Debug, Clone, Default)]
pub struct BindingLayer {
    entries: BTreeMap<String, BindingData>,
}

impl BindingLayer {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { entries: BTreeMap::new() }
    }

    /// Adds a binding, replacing any binding with the same identifier
    #[inline]
    #[must_use]
    pub fn bind(self, id: impl Into<String>, binding: Binding) -> Self {
        self.bind_with_config(id, binding, Config::default())
    }

    #[inline]
    #[must_use]
    pub fn bind_with_config(mut self, id: impl Into<String>, binding: Binding, config: Config) -> Self {
        self.insert(id.into(), BindingData { binding, config });
        self
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub(crate) fn get(&self, id: &str) -> Option<&BindingData> {
        self.entries.get(id)
    }

    #[inline]
    pub(crate) fn insert(&mut self, id: String, data: BindingData) -> Option<BindingData> {
        self.entries.insert(id, data)
    }

    /// Reverse lookup: key of the first entry (in key order) whose class name equals `value`
    pub(crate) fn key_of(&self, value: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, data)| data.binding.class_name() == Some(value))
            .map(|(key, _)| key.as_str())
    }

    /// Adds entries of `other` whose identifiers aren't present yet
    pub(crate) fn merge_missing(&mut self, other: BindingLayer) {
        for (id, data) in other.entries {
            self.entries.entry(id).or_insert(data);
        }
    }
}
