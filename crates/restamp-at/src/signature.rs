//! Class and method signatures used to key the transform catalog.

use std::fmt;
use std::path::PathBuf;

use crate::descriptor::{FieldType, MethodDescriptor, ObjectType, Type};

/// Method name the JVM assigns to constructors.
pub const CONSTRUCTOR_NAME: &str = "<init>";

/// Binary name of a class, for example `a.b.Outer$Inner`.
///
/// Packages are separated by `.` and nested classes by `$`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClassSignature(String);

impl ClassSignature {
    /// Creates a signature, accepting `/` as a package separator.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self(name.replace('/', "."))
    }

    /// Returns the binary name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the signature of a member class declared inside this one.
    #[must_use]
    pub fn nested(&self, simple_name: &str) -> Self {
        Self(format!("{}${simple_name}", self.0))
    }

    /// Returns the binary name of the top-level class that owns this one.
    #[must_use]
    pub fn outermost(&self) -> &str {
        self.0.split('$').next().unwrap_or(&self.0)
    }

    /// Returns the package, or `None` for the default package.
    #[must_use]
    pub fn package(&self) -> Option<&str> {
        self.outermost().rsplit_once('.').map(|(package, _)| package)
    }

    /// Returns the innermost simple name.
    #[must_use]
    pub fn simple_name(&self) -> &str {
        let tail = self.0.rsplit('$').next().unwrap_or(&self.0);
        tail.rsplit('.').next().unwrap_or(tail)
    }

    /// Returns the source path of the file declaring this class, relative
    /// to a source root.
    #[must_use]
    pub fn source_path(&self) -> PathBuf {
        let mut path: PathBuf = self.outermost().split('.').collect();
        path.set_extension("java");
        path
    }

    /// Returns the object type naming this class.
    #[must_use]
    pub fn to_object_type(&self) -> ObjectType {
        ObjectType::new(&self.0)
    }
}

impl fmt::Display for ClassSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Method name plus erased descriptor.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MethodSignature {
    name: String,
    descriptor: MethodDescriptor,
}

impl MethodSignature {
    /// Creates a method signature.
    #[must_use]
    pub fn new(name: impl Into<String>, descriptor: MethodDescriptor) -> Self {
        Self {
            name: name.into(),
            descriptor,
        }
    }

    /// Creates a constructor signature, which is always `<init>` returning
    /// `void`.
    #[must_use]
    pub fn constructor(parameters: Vec<FieldType>) -> Self {
        Self::new(CONSTRUCTOR_NAME, MethodDescriptor::new(parameters, Type::Void))
    }

    /// Returns the method name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the erased descriptor.
    #[must_use]
    pub const fn descriptor(&self) -> &MethodDescriptor {
        &self.descriptor
    }

    /// Returns true for constructor signatures.
    #[must_use]
    pub fn is_constructor(&self) -> bool {
        self.name == CONSTRUCTOR_NAME
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.descriptor)
    }
}
