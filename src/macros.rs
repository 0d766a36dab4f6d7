/// Builds [`Args`](crate::Args) from values in position order
///
/// # Examples
/// ```
/// use wirebox::args;
///
/// let args = args!["localhost", 8080u16];
/// assert_eq!(*args.get::<u16>(1).unwrap(), 8080);
/// ```
#[macro_export]
macro_rules! args {
    ($($val:expr),* $(,)?) => {{
        $crate::Args::new()$(.with($val))*
    }};
}

/// Builds a [`BindingLayer`](crate::BindingLayer) from `id => binding` pairs.
/// A later pair with the same identifier replaces the earlier one.
///
/// # Examples
/// ```
/// use wirebox::{bindings, Binding};
///
/// let layer = bindings! {
///     "request" => Binding::class("Request"),
///     "port" => Binding::instance(8080u16),
/// };
/// assert_eq!(layer.len(), 2);
/// ```
#[macro_export]
macro_rules! bindings {
    ($($id:expr => $binding:expr),* $(,)?) => {{
        $crate::BindingLayer::new()$(.bind($id, $binding))*
    }};
}

#[cfg(test)]
mod tests {
    use crate::{Binding, BindingLayer};

    #[test]
    fn test_args() {
        let args = args![1u8, "two"];

        assert_eq!(args.len(), 2);
        assert_eq!(args.cloned::<&str>(1).unwrap(), "two");
        assert!(args![].is_empty());
    }

    #[test]
    fn test_bindings() {
        let layer: BindingLayer = bindings! {
            "request" => Binding::class("Request"),
            "request" => Binding::class("FastRequest"),
        };

        assert_eq!(layer.len(), 1);
        assert!(bindings! {}.is_empty());
    }
}
