use parking_lot::Mutex;
use std::{
    any::type_name,
    fmt::{self, Debug, Formatter},
    sync::Arc,
};
use tracing::{debug, error, info_span};

use crate::{
    any::{self, Instance},
    binding::{Binding, BindingData, BindingLayer},
    cache::Cache,
    class::{Args, Classes},
    config::Config,
    errors::ResolveErrorKind,
    instantiator::{instantiate_class, instantiate_factory},
    registry::{RegisterOutcome, Registry},
};

/// Service container: base and user binding layers plus a cache of resolved singletons.
///
/// The container is a cheap handle, clones share the same bindings and cache.
#[derive(Clone)]
pub struct Container {
    pub(crate) inner: Arc<ContainerInner>,
}

impl Container {
    /// Creates container with the given class descriptors and base bindings.
    /// Base bindings can't be changed or shadowed afterwards.
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, classes: Arc<Classes>, base: BindingLayer) -> Self {
        Self {
            inner: Arc::new(ContainerInner {
                name: name.into(),
                classes,
                registry: Registry::new(base),
                cache: Mutex::new(Cache::new()),
            }),
        }
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    #[inline]
    #[must_use]
    pub fn classes(&self) -> &Classes {
        &self.inner.classes
    }

    /// Registers a binding in the user layer with default config.
    ///
    /// Returns `false` if the identifier is a base binding, or if it's already registered
    /// (or resolved) and `overwrite` isn't set. An accepted overwrite drops the cached instance,
    /// so the next resolve builds it from the new binding. Instances cached under a name that
    /// became an alias of another identifier are dropped as well.
    #[inline]
    pub fn register(&self, id: impl Into<String>, binding: Binding, overwrite: bool) -> bool {
        self.register_with_config(id, binding, Config::default(), overwrite)
    }

    /// See [`Self::register`]
    pub fn register_with_config(&self, id: impl Into<String>, binding: Binding, config: Config, overwrite: bool) -> bool {
        let id = id.into();

        let span = info_span!("register", id = %id, container = %self.inner.name);
        let _guard = span.enter();

        // Held across the registry write and the eviction
        let mut cache = self.inner.cache.lock();
        let occupied = cache.contains(&id);
        let outcome = self.inner.registry.register(&id, BindingData { binding, config }, overwrite, occupied);
        if !outcome.is_accepted() {
            return false;
        }

        cache.bump_generation();
        if outcome == RegisterOutcome::Replaced && cache.remove(&id).is_some() {
            debug!("Cached instance dropped");
        }

        let registry = &self.inner.registry;
        let evicted = cache.retain(|key| registry.canonical(key) == key);
        if evicted > 0 {
            debug!(evicted, "Cached instances under new aliases dropped");
        }

        true
    }

    /// Gets an already resolved service. Never builds anything.
    ///
    /// # Errors
    /// Returns [`ResolveErrorKind::NotFound`] if there is no cached instance for `id`
    pub fn get(&self, id: &str) -> Result<Instance, ResolveErrorKind> {
        if let Some(instance) = self.inner.cache.lock().get(id) {
            return Ok(instance);
        }

        let err = ResolveErrorKind::NotFound { id: id.to_owned() };
        error!(container = %self.inner.name, "{}", err);
        Err(err)
    }

    /// Typed version of [`Self::get`]
    ///
    /// # Errors
    /// - Returns [`ResolveErrorKind::NotFound`] if there is no cached instance for `id`
    /// - Returns [`ResolveErrorKind::IncorrectType`] if the instance isn't a `T`
    #[inline]
    pub fn get_as<T: Send + Sync + 'static>(&self, id: &str) -> Result<Arc<T>, ResolveErrorKind> {
        self.get(id).and_then(|instance| downcast_service(id, instance))
    }

    /// Checks whether `id` has a cached instance.
    /// A bound but not yet resolved identifier isn't in the container.
    #[inline]
    #[must_use]
    pub fn has(&self, id: &str) -> bool {
        self.inner.cache.lock().contains(id)
    }

    /// Checks whether `id` is a key of the base or user layer
    #[inline]
    #[must_use]
    pub fn is_bound(&self, id: &str) -> bool {
        self.inner.registry.contains(id)
    }

    /// Canonical identifier `id` is stored and cached under
    #[inline]
    #[must_use]
    pub fn canonical(&self, id: &str) -> String {
        self.inner.registry.canonical(id)
    }

    /// Resolves a service, building and caching it on first use.
    ///
    /// # Notes
    /// Explicit arguments are only used when the service is built,
    /// they are ignored if the service is already cached.
    ///
    /// # Errors
    /// - Returns [`ResolveErrorKind::UnknownClass`] if a class name has no descriptor
    /// - Returns [`ResolveErrorKind::CyclicDependency`] if the service depends on itself
    /// - Returns [`ResolveErrorKind::Instantiator`] if a dependency or the constructor fails
    #[inline]
    pub fn resolve(&self, name: &str, args: Args) -> Result<Instance, ResolveErrorKind> {
        Resolver::new(self.clone()).resolve(name, args)
    }

    /// Typed version of [`Self::resolve`]
    ///
    /// # Errors
    /// See [`Self::resolve`], plus [`ResolveErrorKind::IncorrectType`] if the service isn't a `T`
    #[inline]
    pub fn resolve_as<T: Send + Sync + 'static>(&self, name: &str, args: Args) -> Result<Arc<T>, ResolveErrorKind> {
        Resolver::new(self.clone()).resolve_as(name, args)
    }
}

impl Debug for Container {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("name", &self.inner.name)
            .field("cached", &self.inner.cache.lock().len())
            .finish_non_exhaustive()
    }
}

pub(crate) struct ContainerInner {
    pub(crate) name: String,
    pub(crate) classes: Arc<Classes>,
    pub(crate) registry: Registry,
    pub(crate) cache: Mutex<Cache>,
}

/// Handle for a single resolution.
///
/// Tracks the canonical identifiers being built on the current call path, so a service that
/// (indirectly) depends on itself fails instead of recursing forever.
/// Factories receive it to resolve their own dependencies.
pub struct Resolver {
    container: Container,
    path: Vec<String>,
}

impl Resolver {
    #[inline]
    #[must_use]
    pub(crate) const fn new(container: Container) -> Self {
        Self {
            container,
            path: Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub const fn container(&self) -> &Container {
        &self.container
    }

    /// Canonical identifiers currently being built, outermost first
    #[inline]
    #[must_use]
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Same as [`Container::resolve`], but as a part of the current resolution
    ///
    /// # Errors
    /// See [`Container::resolve`]
    pub fn resolve(&mut self, name: &str, args: Args) -> Result<Instance, ResolveErrorKind> {
        let inner = self.container.inner.clone();

        let span = info_span!("resolve", id = name, container = %inner.name);
        let _guard = span.enter();

        let generation = inner.cache.lock().generation();
        let canonical = inner.registry.canonical(name);
        let cached = inner.cache.lock().get(&canonical);
        if let Some(instance) = cached {
            debug!(canonical = %canonical, "Found in cache");
            return Ok(instance);
        }
        debug!("Not found in cache");

        if self.path.contains(&canonical) {
            let mut chain = self.path.clone();
            chain.push(canonical);

            let err = ResolveErrorKind::CyclicDependency {
                chain: chain.into_boxed_slice(),
            };
            error!("{}", err);
            return Err(err);
        }

        let (binding, config) = match inner.registry.lookup(&canonical) {
            Some((layer, BindingData { binding, config })) => {
                debug!(?layer, ?binding, "Binding found");
                (binding, config)
            }
            None => {
                debug!("Binding not found, identifier used as class name");
                (Binding::Class(canonical.clone()), Config::default())
            }
        };

        self.path.push(canonical.clone());
        let result = match binding {
            Binding::Instance(instance) => Ok(instance),
            Binding::Factory(factory) => instantiate_factory(self, factory, args),
            Binding::Class(class) => instantiate_class(self, &class, &args),
        };
        self.path.pop();

        let instance = result?;
        if !config.cache_provides {
            return Ok(instance);
        }

        let stored = inner.cache.lock().insert_if_current(canonical, instance, generation);
        match stored {
            Ok(instance) => {
                debug!("Cached");
                Ok(instance)
            }
            Err(instance) => {
                debug!("Bindings changed during resolve, instance not cached");
                Ok(instance)
            }
        }
    }

    /// Typed version of [`Self::resolve`]
    ///
    /// # Errors
    /// See [`Container::resolve_as`]
    #[inline]
    pub fn resolve_as<T: Send + Sync + 'static>(&mut self, name: &str, args: Args) -> Result<Arc<T>, ResolveErrorKind> {
        self.resolve(name, args).and_then(|instance| downcast_service(name, instance))
    }
}

fn downcast_service<T: Send + Sync + 'static>(id: &str, instance: Instance) -> Result<Arc<T>, ResolveErrorKind> {
    any::downcast(instance).map_err(|_| {
        let err = ResolveErrorKind::IncorrectType {
            id: id.to_owned(),
            expected: type_name::<T>(),
        };
        error!("{}", err);
        err
    })
}
