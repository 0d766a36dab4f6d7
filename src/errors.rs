mod instantiate;
mod instantiator;
mod resolve;

pub use instantiate::InstantiateErrorKind;
pub use instantiator::InstantiatorErrorKind;
pub use resolve::ResolveErrorKind;

pub type InstantiatorResult<T, Err = InstantiateErrorKind> = Result<T, Err>;
