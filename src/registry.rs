use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::binding::{BindingData, BindingLayer};

/// Layer a binding was found in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LayerKind {
    Base,
    User,
}

/// Maps a requested name to its canonical identifier by reverse lookup through the layers
/// in priority order, at most one substitution per layer.
pub(crate) fn canonical_in(layers: &[(LayerKind, &BindingLayer)], name: &str) -> String {
    let mut name = name.to_owned();
    for (kind, layer) in layers {
        if let Some(key) = layer.key_of(&name) {
            debug!(?kind, alias = %name, canonical = key, "Alias substituted");
            name = key.to_owned();
        }
    }
    name
}

/// Forward lookup: binding of the first layer (in priority order) containing `id`
pub(crate) fn lookup_in(layers: &[(LayerKind, &BindingLayer)], id: &str) -> Option<(LayerKind, BindingData)> {
    layers
        .iter()
        .find_map(|(kind, layer)| layer.get(id).map(|data| (*kind, data.clone())))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RegisterOutcome {
    Inserted,
    Replaced,
    Rejected,
}

impl RegisterOutcome {
    #[inline]
    pub(crate) const fn is_accepted(self) -> bool {
        !matches!(self, Self::Rejected)
    }
}

/// Base and user binding layers of one container.
/// The base layer is fixed at construction, the user layer is guarded for writes.
pub(crate) struct Registry {
    base: BindingLayer,
    user: Mutex<BindingLayer>,
}

impl Registry {
    #[inline]
    #[must_use]
    pub(crate) fn new(base: BindingLayer) -> Self {
        Self {
            base,
            user: Mutex::new(BindingLayer::new()),
        }
    }

    pub(crate) fn canonical(&self, name: &str) -> String {
        let user = self.user.lock();
        canonical_in(&[(LayerKind::Base, &self.base), (LayerKind::User, &*user)], name)
    }

    pub(crate) fn lookup(&self, id: &str) -> Option<(LayerKind, BindingData)> {
        let user = self.user.lock();
        lookup_in(&[(LayerKind::Base, &self.base), (LayerKind::User, &*user)], id)
    }

    #[inline]
    pub(crate) fn contains(&self, id: &str) -> bool {
        self.base.contains(id) || self.user.lock().contains(id)
    }

    /// Adds a binding to the user layer.
    ///
    /// Base identifiers are never shadowed. `occupied` marks an identifier that isn't bound
    /// but already has a cached instance, it is treated like an existing user binding.
    pub(crate) fn register(&self, id: &str, data: BindingData, overwrite: bool, occupied: bool) -> RegisterOutcome {
        if self.base.contains(id) {
            warn!(id, "Registration rejected, identifier is a base binding");
            return RegisterOutcome::Rejected;
        }

        let mut user = self.user.lock();
        let exists = occupied || user.contains(id);
        if exists && !overwrite {
            warn!(id, "Registration rejected, identifier is already registered");
            return RegisterOutcome::Rejected;
        }

        user.insert(id.to_owned(), data);
        if exists {
            debug!(id, "Registration replaced");
            RegisterOutcome::Replaced
        } else {
            debug!(id, "Registered");
            RegisterOutcome::Inserted
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{canonical_in, lookup_in, LayerKind, RegisterOutcome, Registry};
    use crate::{
        binding::{Binding, BindingData, BindingLayer},
        config::Config,
    };

    use tracing_test::traced_test;

    fn data(binding: Binding) -> BindingData {
        BindingData {
            binding,
            config: Config::default(),
        }
    }

    #[test]
    #[traced_test]
    fn test_canonical_base_precedence() {
        let base = BindingLayer::new().bind("request", Binding::class("http::Request"));
        let user = BindingLayer::new().bind("req", Binding::class("http::Request"));

        let layers = [(LayerKind::Base, &base), (LayerKind::User, &user)];

        assert_eq!(canonical_in(&layers, "http::Request"), "request");
        assert_eq!(canonical_in(&layers, "request"), "request");
        assert_eq!(canonical_in(&layers, "unknown"), "unknown");
        assert!(logs_contain("Alias substituted"));
    }

    #[test]
    #[traced_test]
    fn test_canonical_chained_through_layers() {
        let base = BindingLayer::new().bind("router", Binding::class("Router"));
        let user = BindingLayer::new().bind("app_router", Binding::class("router"));

        let layers = [(LayerKind::Base, &base), (LayerKind::User, &user)];

        // Base substitution first, then the user layer sees the substituted name
        assert_eq!(canonical_in(&layers, "Router"), "app_router");
        assert_eq!(canonical_in(&layers, "router"), "app_router");
    }

    #[test]
    fn test_lookup_priority() {
        let base = BindingLayer::new().bind("acl", Binding::class("BaseAcl"));
        let user = BindingLayer::new()
            .bind("acl", Binding::class("UserAcl"))
            .bind("helper", Binding::class("Helper"));

        let layers = [(LayerKind::Base, &base), (LayerKind::User, &user)];

        let (kind, data) = lookup_in(&layers, "acl").unwrap();
        assert_eq!(kind, LayerKind::Base);
        assert_eq!(data.binding.class_name(), Some("BaseAcl"));

        let (kind, _) = lookup_in(&layers, "helper").unwrap();
        assert_eq!(kind, LayerKind::User);

        assert!(lookup_in(&layers, "missing").is_none());
    }

    #[test]
    #[traced_test]
    fn test_register() {
        let registry = Registry::new(BindingLayer::new().bind("route", Binding::class("Route")));

        assert_eq!(
            registry.register("route", data(Binding::class("Other")), true, false),
            RegisterOutcome::Rejected
        );
        assert_eq!(
            registry.register("helper", data(Binding::class("Helper")), false, false),
            RegisterOutcome::Inserted
        );
        assert_eq!(
            registry.register("helper", data(Binding::class("Helper2")), false, false),
            RegisterOutcome::Rejected
        );
        assert_eq!(
            registry.register("helper", data(Binding::class("Helper2")), true, false),
            RegisterOutcome::Replaced
        );
        assert_eq!(
            registry.register("cached", data(Binding::class("Cached")), false, true),
            RegisterOutcome::Rejected
        );

        let (_, data) = registry.lookup("helper").unwrap();
        assert_eq!(data.binding.class_name(), Some("Helper2"));
        assert!(registry.contains("route"));
        assert!(!registry.contains("cached"));
        assert!(logs_contain("Registration rejected"));
    }
}
