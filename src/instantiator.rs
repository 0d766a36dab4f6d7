use tracing::{debug, error};

use crate::{
    any::{self, Instance},
    class::{Args, ParamKind},
    container::Resolver,
    errors::{InstantiateErrorKind, InstantiatorErrorKind, ResolveErrorKind},
};

pub trait Instantiator: Clone + 'static {
    type Provides: Send + Sync + 'static;
    type Error: Into<InstantiateErrorKind>;

    fn instantiate(&mut self, resolver: &mut Resolver, args: Args) -> Result<Self::Provides, Self::Error>;
}

impl<F, Response, Err> Instantiator for F
where
    F: FnMut(&mut Resolver, Args) -> Result<Response, Err> + Clone + 'static,
    Response: Send + Sync + 'static,
    Err: Into<InstantiateErrorKind>,
{
    type Provides = Response;
    type Error = Err;

    #[inline]
    fn instantiate(&mut self, resolver: &mut Resolver, args: Args) -> Result<Self::Provides, Self::Error> {
        self(resolver, args)
    }
}

trait CloneInstantiator: Send + Sync {
    fn call(&mut self, resolver: &mut Resolver, args: Args) -> Result<Instance, InstantiateErrorKind>;

    #[must_use]
    fn clone_box(&self) -> Box<dyn CloneInstantiator>;
}

impl<Inst> CloneInstantiator for Inst
where
    Inst: Instantiator + Send + Sync,
{
    #[inline]
    fn call(&mut self, resolver: &mut Resolver, args: Args) -> Result<Instance, InstantiateErrorKind> {
        self.instantiate(resolver, args).map(any::instance).map_err(Into::into)
    }

    #[inline]
    fn clone_box(&self) -> Box<dyn CloneInstantiator> {
        Box::new(self.clone())
    }
}

/// Type-erased factory stored in a [`crate::Binding::Factory`]
pub struct BoxedCloneInstantiator(Box<dyn CloneInstantiator>);

impl BoxedCloneInstantiator {
    #[inline]
    pub(crate) fn call(&mut self, resolver: &mut Resolver, args: Args) -> Result<Instance, InstantiateErrorKind> {
        self.0.call(resolver, args)
    }
}

impl Clone for BoxedCloneInstantiator {
    #[inline]
    fn clone(&self) -> Self {
        Self(self.0.clone_box())
    }
}

#[inline]
#[must_use]
pub(crate) fn boxed_instantiator<Inst>(instantiator: Inst) -> BoxedCloneInstantiator
where
    Inst: Instantiator + Send + Sync,
{
    BoxedCloneInstantiator(Box::new(instantiator))
}

/// Builds an instance of the class `name` from its descriptor.
///
/// Parameters are filled in declaration order: explicit argument at the same position,
/// else the declared default, else (for class-typed parameters only) a service resolved
/// by the parameter's class name. Untyped and builtin parameters without a value are
/// omitted, so the assembled list can be shorter than the parameter list.
pub(crate) fn instantiate_class(resolver: &mut Resolver, name: &str, explicit: &Args) -> Result<Instance, ResolveErrorKind> {
    let Some(descriptor) = resolver.container().classes().get(name).cloned() else {
        let err = ResolveErrorKind::UnknownClass { name: name.to_owned() };
        error!("{}", err);
        return Err(err);
    };

    let mut args = Args::new();
    for (position, param) in descriptor.params().iter().enumerate() {
        if let Some(value) = explicit.get_instance(position) {
            args.push_instance(value.clone());
            continue;
        }
        if let Some(value) = param.default_value() {
            args.push_instance(value.clone());
            continue;
        }
        match param.kind() {
            ParamKind::Untyped | ParamKind::Builtin(_) => {
                debug!(param = param.name(), position, "Parameter skipped");
            }
            ParamKind::Class(class) => match resolver.resolve(class, Args::new()) {
                Ok(dependency) => args.push_instance(dependency),
                Err(err) => {
                    error!(param = param.name(), "{}", err);
                    return Err(ResolveErrorKind::Instantiator(InstantiatorErrorKind::Deps(Box::new(err))));
                }
            },
        }
    }

    match descriptor.construct(args) {
        Ok(instance) => {
            debug!(class = name, "Constructed");
            Ok(instance)
        }
        Err(err) => {
            error!(class = name, "{}", err);
            Err(ResolveErrorKind::Instantiator(InstantiatorErrorKind::Factory(err)))
        }
    }
}

/// Calls a factory binding with the explicit arguments
pub(crate) fn instantiate_factory(
    resolver: &mut Resolver,
    mut factory: BoxedCloneInstantiator,
    args: Args,
) -> Result<Instance, ResolveErrorKind> {
    match factory.call(resolver, args) {
        Ok(instance) => {
            debug!("Factory called");
            Ok(instance)
        }
        Err(err) => {
            error!("{}", err);
            Err(ResolveErrorKind::Instantiator(InstantiatorErrorKind::Factory(err)))
        }
    }
}
