use super::{instantiate::InstantiateErrorKind, instantiator::InstantiatorErrorKind};

#[derive(thiserror::Error, Debug)]
pub enum ResolveErrorKind {
    #[error("Service `{id}` not found in container")]
    NotFound { id: String },
    #[error("Class `{name}` has no descriptor")]
    UnknownClass { name: String },
    #[error("Cyclic dependency detected: {}", .chain.join(" -> "))]
    CyclicDependency { chain: Box<[String]> },
    #[error("Incorrect service type. Service: `{id}`, expected: {expected}")]
    IncorrectType { id: String, expected: &'static str },
    #[error(transparent)]
    Instantiator(InstantiatorErrorKind<Box<ResolveErrorKind>, InstantiateErrorKind>),
}
