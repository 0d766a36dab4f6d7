use parking_lot::Mutex;
use std::{collections::BTreeMap, sync::Arc};
use tracing::{debug, info_span};

use crate::{
    any::Instance,
    binding::BindingLayer,
    class::{Args, Classes},
    container::Container,
    errors::ResolveErrorKind,
};

/// Declares a kind of container: its name in the [`ContainerRegistry`] and its base bindings
pub trait Definition {
    const NAME: &'static str;

    #[must_use]
    fn bindings() -> BindingLayer {
        BindingLayer::new()
    }
}

/// Root container definition without declared bindings
#[derive(Debug, Clone, Copy)]
pub struct Root;

impl Definition for Root {
    const NAME: &'static str = "root";
}

/// Table of named containers.
///
/// Every container created here shares the class descriptors but has its own binding layers
/// and cache. Containers are created on first access, creation is serialized.
#[derive(Debug)]
pub struct ContainerRegistry {
    classes: Arc<Classes>,
    containers: Mutex<BTreeMap<String, Container>>,
}

impl ContainerRegistry {
    #[inline]
    #[must_use]
    pub fn new(classes: Classes) -> Self {
        Self {
            classes: Arc::new(classes),
            containers: Mutex::new(BTreeMap::new()),
        }
    }

    #[inline]
    #[must_use]
    pub fn classes(&self) -> &Classes {
        &self.classes
    }

    /// Gets a container by name without creating it
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Container> {
        self.containers.lock().get(name).cloned()
    }

    /// Gets a container by name, creating it with the given base bindings if it's absent.
    /// The base bindings are ignored if the container already exists.
    #[must_use]
    pub fn get_or_create_named(&self, name: &str, base: Option<BindingLayer>) -> Container {
        let span = info_span!("get_or_create_named", container = name);
        let _guard = span.enter();

        self.containers
            .lock()
            .entry(name.to_owned())
            .or_insert_with(|| {
                debug!("Container created");
                Container::new(name, self.classes.clone(), base.unwrap_or_default())
            })
            .clone()
    }

    /// Gets the container of the definition, creating it if it's absent or `force_new` is set.
    /// A recreated container replaces the previous one in the registry, handles to the previous
    /// one keep working but don't share state with the new one.
    #[inline]
    #[must_use]
    pub fn init<D: Definition>(&self, force_new: bool) -> Container {
        self.init_with(D::NAME, force_new, D::bindings)
    }

    /// Same as [`Self::init`], but the base layer of a created container also inherits
    /// the bindings declared by `S`. Bindings declared by `D` win on identifier conflicts.
    #[inline]
    #[must_use]
    pub fn init_inheriting<D: Definition, S: Definition>(&self, force_new: bool) -> Container {
        self.init_with(D::NAME, force_new, || {
            let mut bindings = D::bindings();
            bindings.merge_missing(S::bindings());
            bindings
        })
    }

    /// Resolves a service in the container of the definition, creating the container if it's absent
    ///
    /// # Errors
    /// See [`Container::resolve`]
    #[inline]
    pub fn resolve<D: Definition>(&self, name: &str, args: Args) -> Result<Instance, ResolveErrorKind> {
        self.init::<D>(false).resolve(name, args)
    }

    fn init_with(&self, name: &str, force_new: bool, bindings: impl FnOnce() -> BindingLayer) -> Container {
        let span = info_span!("init", container = name, force_new);
        let _guard = span.enter();

        let mut containers = self.containers.lock();
        if !force_new {
            if let Some(container) = containers.get(name) {
                return container.clone();
            }
        }

        let container = Container::new(name, self.classes.clone(), bindings());
        containers.insert(name.to_owned(), container.clone());
        debug!("Container created");
        container
    }
}
