#[macro_use]
pub(crate) mod macros;

pub(crate) mod any;
pub(crate) mod binding;
pub(crate) mod cache;
pub(crate) mod class;
pub(crate) mod config;
pub(crate) mod container;
pub(crate) mod containers;
pub(crate) mod errors;
pub(crate) mod instantiator;
pub(crate) mod registry;

pub use any::{downcast, instance, Instance};
pub use binding::{Binding, BindingLayer};
pub use class::{Args, ClassDescriptor, Classes, Param, ParamKind};
pub use config::Config;
pub use container::{Container, Resolver};
pub use containers::{ContainerRegistry, Definition, Root};
pub use errors::{InstantiateErrorKind, InstantiatorErrorKind, InstantiatorResult, ResolveErrorKind};
pub use instantiator::{BoxedCloneInstantiator, Instantiator};
