/// Config for a binding
/// ## Fields
/// - `cache_provides`:
///   If `true`, the instance produced by the binding will be cached and reused,
///   so every later resolve of the same canonical identifier returns it.
///
///   This does **not** affect the dependencies of the instance.
///   Only the final result is cached if caching is applicable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub cache_provides: bool,
}

impl Config {
    /// Config for a binding that is rebuilt on every resolve
    #[inline]
    #[must_use]
    pub const fn transient() -> Self {
        Self { cache_provides: false }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self { cache_provides: true }
    }
}
