use super::resolve::ResolveErrorKind;

/// Errors raised by constructors and factories themselves
#[derive(thiserror::Error, Debug)]
pub enum InstantiateErrorKind {
    #[error("Argument at position {position} is missing")]
    MissingArgument { position: usize },
    #[error("Argument at position {position} has incorrect type, expected: {expected}")]
    IncorrectArgument { position: usize, expected: &'static str },
    /// A service the factory resolved by itself failed
    #[error(transparent)]
    Dependency(Box<ResolveErrorKind>),
    #[error(transparent)]
    Custom(#[from] anyhow::Error),
}

impl From<ResolveErrorKind> for InstantiateErrorKind {
    #[inline]
    fn from(err: ResolveErrorKind) -> Self {
        Self::Dependency(Box::new(err))
    }
}
