use std::{
    any::type_name,
    collections::BTreeMap,
    fmt::{self, Debug, Formatter},
    sync::Arc,
};

use crate::{
    any::{self, Instance},
    errors::{InstantiateErrorKind, InstantiatorResult},
};

/// Positional argument list.
///
/// Used both for explicit arguments passed to a resolve call and for the assembled list a
/// constructor receives. Positions without a value are holes: they are treated as "not
/// supplied" when resolving parameters.
#[derive(Clone, Default)]
pub struct Args {
    values: Vec<Option<Instance>>,
}

impl Args {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Appends a value at the next position
    #[inline]
    #[must_use]
    pub fn with<T: Send + Sync + 'static>(self, value: T) -> Self {
        self.with_instance(any::instance(value))
    }

    #[inline]
    #[must_use]
    pub fn with_instance(mut self, instance: Instance) -> Self {
        self.values.push(Some(instance));
        self
    }

    /// Sets a value at the given position, leaving holes before it if needed
    #[inline]
    #[must_use]
    pub fn at<T: Send + Sync + 'static>(self, position: usize, value: T) -> Self {
        self.at_instance(position, any::instance(value))
    }

    #[must_use]
    pub fn at_instance(mut self, position: usize, instance: Instance) -> Self {
        if position >= self.values.len() {
            self.values.resize(position + 1, None);
        }
        self.values[position] = Some(instance);
        self
    }

    /// Count of positions, holes included
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn get_instance(&self, position: usize) -> Option<&Instance> {
        self.values.get(position).and_then(Option::as_ref)
    }

    /// Gets a shared value at the given position
    ///
    /// # Errors
    /// - Returns [`InstantiateErrorKind::MissingArgument`] if there is no value at the position
    /// - Returns [`InstantiateErrorKind::IncorrectArgument`] if the value has another type
    pub fn get<T: Send + Sync + 'static>(&self, position: usize) -> InstantiatorResult<Arc<T>> {
        let Some(instance) = self.get_instance(position) else {
            return Err(InstantiateErrorKind::MissingArgument { position });
        };
        any::downcast(instance.clone()).map_err(|_| InstantiateErrorKind::IncorrectArgument {
            position,
            expected: type_name::<T>(),
        })
    }

    /// Same as [`Self::get`], but clones the value out of the shared pointer
    ///
    /// # Errors
    /// See [`Self::get`]
    #[inline]
    pub fn cloned<T: Clone + Send + Sync + 'static>(&self, position: usize) -> InstantiatorResult<T> {
        self.get::<T>(position).map(|value| (*value).clone())
    }

    #[inline]
    pub(crate) fn push_instance(&mut self, instance: Instance) {
        self.values.push(Some(instance));
    }
}

impl FromIterator<Instance> for Args {
    fn from_iter<I: IntoIterator<Item = Instance>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(Some).collect(),
        }
    }
}

impl Debug for Args {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.values.iter().map(|value| if value.is_some() { "<value>" } else { "<hole>" }))
            .finish()
    }
}

/// Declared type of a constructor parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamKind {
    /// No declared type, never autowired
    Untyped,
    /// Primitive or built-in type (`int`, `string`, ...), never autowired
    Builtin(&'static str),
    /// Named class type, autowired through the container by this name
    Class(String),
}

#[derive(Clone)]
pub struct Param {
    name: &'static str,
    kind: ParamKind,
    default: Option<Instance>,
}

impl Param {
    #[inline]
    #[must_use]
    pub const fn untyped(name: &'static str) -> Self {
        Self {
            name,
            kind: ParamKind::Untyped,
            default: None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn builtin(name: &'static str, type_name: &'static str) -> Self {
        Self {
            name,
            kind: ParamKind::Builtin(type_name),
            default: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn class(name: &'static str, class: impl Into<String>) -> Self {
        Self {
            name,
            kind: ParamKind::Class(class.into()),
            default: None,
        }
    }

    /// Class parameter named after the Rust type, matching [`ClassDescriptor::of`]
    #[inline]
    #[must_use]
    pub fn of<T: ?Sized + 'static>(name: &'static str) -> Self {
        Self::class(name, type_name::<T>())
    }

    #[inline]
    #[must_use]
    pub fn with_default<T: Send + Sync + 'static>(mut self, value: T) -> Self {
        self.default = Some(any::instance(value));
        self
    }

    #[inline]
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    #[must_use]
    pub const fn kind(&self) -> &ParamKind {
        &self.kind
    }

    #[inline]
    #[must_use]
    pub(crate) fn default_value(&self) -> Option<&Instance> {
        self.default.as_ref()
    }
}

impl Debug for Param {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Param")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("has_default", &self.default.is_some())
            .finish()
    }
}

pub(crate) type BoxedConstructor = Arc<dyn Fn(Args) -> Result<Instance, InstantiateErrorKind> + Send + Sync>;

/// Constructor signature of a class: ordered parameters and the function building it
/// from the assembled argument list.
#[derive(Clone)]
pub struct ClassDescriptor {
    name: String,
    params: Vec<Param>,
    constructor: BoxedConstructor,
}

impl ClassDescriptor {
    #[must_use]
    pub fn new<T, F>(name: impl Into<String>, constructor: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(Args) -> Result<T, InstantiateErrorKind> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            params: Vec::new(),
            constructor: Arc::new(move |args| constructor(args).map(any::instance)),
        }
    }

    /// Descriptor named after the type the constructor returns
    #[inline]
    #[must_use]
    pub fn of<T, F>(constructor: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(Args) -> Result<T, InstantiateErrorKind> + Send + Sync + 'static,
    {
        Self::new(type_name::<T>(), constructor)
    }

    #[inline]
    #[must_use]
    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    #[inline]
    pub(crate) fn construct(&self, args: Args) -> Result<Instance, InstantiateErrorKind> {
        (self.constructor)(args)
    }
}

impl Debug for ClassDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassDescriptor")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Table of class descriptors consulted when a class name is resolved
#[derive(Debug, Clone, Default)]
pub struct Classes {
    descriptors: BTreeMap<String, ClassDescriptor>,
}

impl Classes {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            descriptors: BTreeMap::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn provide(mut self, descriptor: ClassDescriptor) -> Self {
        self.insert(descriptor);
        self
    }

    /// Adds a descriptor, returning the previous one with the same name
    #[inline]
    pub fn insert(&mut self, descriptor: ClassDescriptor) -> Option<ClassDescriptor> {
        self.descriptors.insert(descriptor.name.clone(), descriptor)
    }

    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ClassDescriptor> {
        self.descriptors.get(name)
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.descriptors.contains_key(name)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{Args, ClassDescriptor, Classes, Param, ParamKind};
    use crate::errors::InstantiateErrorKind;

    use std::any::type_name;

    struct Database;

    #[derive(Clone, Debug, PartialEq)]
    struct Dsn(&'static str);

    #[test]
    fn test_args_holes() {
        let args = Args::new().at(2, 8080u16).with(Dsn("sqlite://"));

        assert_eq!(args.len(), 4);
        assert!(args.get_instance(0).is_none());
        assert!(args.get_instance(1).is_none());
        assert_eq!(*args.get::<u16>(2).unwrap(), 8080);
        assert_eq!(args.cloned::<Dsn>(3).unwrap(), Dsn("sqlite://"));
    }

    #[test]
    fn test_args_errors() {
        let args = Args::new().with(1u8);

        assert!(matches!(
            args.get::<u8>(1),
            Err(InstantiateErrorKind::MissingArgument { position: 1 })
        ));
        assert!(matches!(
            args.get::<u16>(0),
            Err(InstantiateErrorKind::IncorrectArgument { position: 0, .. })
        ));
    }

    #[test]
    fn test_descriptor_of() {
        let descriptor = ClassDescriptor::of(|_| Ok(Database))
            .param(Param::builtin("port", "int"))
            .param(Param::of::<Dsn>("dsn").with_default(Dsn("memory")));

        assert_eq!(descriptor.name(), type_name::<Database>());
        assert_eq!(descriptor.params().len(), 2);
        assert_eq!(descriptor.params()[0].kind(), &ParamKind::Builtin("int"));
        assert_eq!(descriptor.params()[1].kind(), &ParamKind::Class(type_name::<Dsn>().to_owned()));
        assert!(descriptor.params()[1].default_value().is_some());
        assert!(descriptor.construct(Args::new()).unwrap().is::<Database>());
    }

    #[test]
    fn test_classes_replace() {
        let mut classes = Classes::new().provide(ClassDescriptor::new("db", |_| Ok(Database)));

        assert!(classes.contains("db"));
        assert!(classes.insert(ClassDescriptor::new("db", |_| Ok(Dsn("other")))).is_some());
        assert_eq!(classes.len(), 1);

        let instance = classes.get("db").unwrap().construct(Args::new()).unwrap();
        assert!(instance.is::<Dsn>());
    }
}
