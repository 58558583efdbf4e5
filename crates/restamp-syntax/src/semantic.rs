//! Syntactic type attribution.
//!
//! Restamp never compiles the sources it edits, so type names are attributed
//! from declarations alone: the enclosing types, the imports of the unit, and
//! a [`TypeIndex`] of every type declared across the source set. This is
//! enough to erase member signatures for transform lookup; it is not a type
//! checker.

use std::collections::{HashMap, HashSet};

use restamp_at::{BaseType, ClassSignature};

use crate::unit::{CompilationUnit, TypeId, TypeParameter, TypeRef};

/// Bounds are followed at most this deep, which stops `T extends Comparable<T>`.
const MAX_BOUND_DEPTH: usize = 8;

/// Public top-level types of `java.lang` up to Java 21, visible without an
/// import.
const JAVA_LANG: &[&str] = &[
    "AbstractMethodError",
    "Appendable",
    "ArithmeticException",
    "ArrayIndexOutOfBoundsException",
    "ArrayStoreException",
    "AssertionError",
    "AutoCloseable",
    "Boolean",
    "BootstrapMethodError",
    "Byte",
    "CharSequence",
    "Character",
    "Class",
    "ClassCastException",
    "ClassCircularityError",
    "ClassFormatError",
    "ClassLoader",
    "ClassNotFoundException",
    "ClassValue",
    "CloneNotSupportedException",
    "Cloneable",
    "Comparable",
    "Compiler",
    "Deprecated",
    "Double",
    "Enum",
    "EnumConstantNotPresentException",
    "Error",
    "Exception",
    "ExceptionInInitializerError",
    "Float",
    "FunctionalInterface",
    "IllegalAccessError",
    "IllegalAccessException",
    "IllegalArgumentException",
    "IllegalCallerException",
    "IllegalMonitorStateException",
    "IllegalStateException",
    "IllegalThreadStateException",
    "IncompatibleClassChangeError",
    "IndexOutOfBoundsException",
    "InheritableThreadLocal",
    "InstantiationError",
    "InstantiationException",
    "Integer",
    "InternalError",
    "InterruptedException",
    "Iterable",
    "LayerInstantiationException",
    "LinkageError",
    "Long",
    "MatchException",
    "Math",
    "Module",
    "ModuleLayer",
    "NegativeArraySizeException",
    "NoClassDefFoundError",
    "NoSuchFieldError",
    "NoSuchFieldException",
    "NoSuchMethodError",
    "NoSuchMethodException",
    "NullPointerException",
    "Number",
    "NumberFormatException",
    "Object",
    "OutOfMemoryError",
    "Override",
    "Package",
    "Process",
    "ProcessBuilder",
    "ProcessHandle",
    "Readable",
    "Record",
    "ReflectiveOperationException",
    "Runnable",
    "Runtime",
    "RuntimeException",
    "RuntimePermission",
    "SafeVarargs",
    "ScopedValue",
    "SecurityException",
    "SecurityManager",
    "Short",
    "StackOverflowError",
    "StackTraceElement",
    "StackWalker",
    "StrictMath",
    "String",
    "StringBuffer",
    "StringBuilder",
    "StringIndexOutOfBoundsException",
    "StringTemplate",
    "SuppressWarnings",
    "System",
    "Thread",
    "ThreadDeath",
    "ThreadGroup",
    "ThreadLocal",
    "Throwable",
    "TypeNotPresentException",
    "UnknownError",
    "UnsatisfiedLinkError",
    "UnsupportedClassVersionError",
    "UnsupportedOperationException",
    "VerifyError",
    "VirtualMachineError",
    "Void",
    "WrongThreadException",
];

/// A type reference after name attribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SemanticType {
    /// A primitive type.
    Primitive(BaseType),
    /// `void`.
    Void,
    /// A raw class or interface type.
    Class(ClassSignature),
    /// A class instantiated with type arguments.
    Parameterized {
        /// The generic class.
        raw: ClassSignature,
        /// Attributed type arguments.
        arguments: Vec<SemanticType>,
    },
    /// A type variable declared by a method or an enclosing type.
    TypeVariable {
        /// Variable name.
        name: String,
        /// Attributed first bound, if declared.
        bound: Option<Box<SemanticType>>,
    },
    /// One array dimension around `element`.
    Array(Box<SemanticType>),
    /// A `?` type argument.
    Wildcard,
    /// A type that could not be attributed, as written.
    Unknown(String),
}

/// Binary names of every type declared in the source set.
#[derive(Debug, Clone, Default)]
pub struct TypeIndex {
    declared: HashSet<ClassSignature>,
}

impl TypeIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds every type declared in `unit`.
    pub fn extend_from(&mut self, unit: &CompilationUnit) {
        self.declared.extend(
            unit.types()
                .iter()
                .map(|declaration| declaration.binary_name().clone()),
        );
    }

    /// Adds one binary name.
    pub fn insert(&mut self, class: ClassSignature) {
        self.declared.insert(class);
    }

    /// Returns true when `class` is declared in the source set.
    #[must_use]
    pub fn contains(&self, class: &ClassSignature) -> bool {
        self.declared.contains(class)
    }

    /// Returns the number of declared types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.declared.len()
    }

    /// Returns true when no type has been indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declared.is_empty()
    }
}

/// Name-resolution context for one declaration.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    unit: &'a CompilationUnit,
    index: &'a TypeIndex,
    owner: TypeId,
    method_type_parameters: &'a [TypeParameter],
}

impl<'a> Scope<'a> {
    /// Creates the scope of a member declared in `owner`.
    #[must_use]
    pub const fn new(unit: &'a CompilationUnit, index: &'a TypeIndex, owner: TypeId) -> Self {
        Self {
            unit,
            index,
            owner,
            method_type_parameters: &[],
        }
    }

    /// Adds a generic method's own type parameters, which shadow those of
    /// the enclosing types.
    #[must_use]
    pub const fn with_method_type_parameters(self, parameters: &'a [TypeParameter]) -> Self {
        Self {
            method_type_parameters: parameters,
            ..self
        }
    }

    /// Attributes a written type.
    #[must_use]
    pub fn attribute(&self, written: &TypeRef) -> SemanticType {
        self.attribute_at(written, 0)
    }

    fn attribute_at(&self, written: &TypeRef, depth: usize) -> SemanticType {
        match written {
            TypeRef::Primitive(base) => SemanticType::Primitive(*base),
            TypeRef::Void => SemanticType::Void,
            TypeRef::Wildcard => SemanticType::Wildcard,
            TypeRef::Unknown(text) => SemanticType::Unknown(text.clone()),
            TypeRef::Array {
                element,
                dimensions,
            } => (0..*dimensions).fold(self.attribute_at(element, depth), |inner, _| {
                SemanticType::Array(Box::new(inner))
            }),
            TypeRef::Named {
                segments,
                arguments,
            } => self.attribute_named(segments, arguments, depth),
        }
    }

    fn attribute_named(
        &self,
        segments: &[String],
        arguments: &[TypeRef],
        depth: usize,
    ) -> SemanticType {
        let variable = match segments {
            [name] => self.type_variable(name),
            _ => None,
        };
        if let Some(parameter) = variable {
            let name = &parameter.name;
            let bound = parameter
                .bound
                .as_ref()
                .filter(|_| depth < MAX_BOUND_DEPTH)
                .map(|bound| Box::new(self.attribute_at(bound, depth.saturating_add(1))));
            return SemanticType::TypeVariable {
                name: name.clone(),
                bound,
            };
        }
        let Some(class) = self.resolve_name(segments) else {
            return SemanticType::Unknown(segments.join("."));
        };
        if arguments.is_empty() {
            SemanticType::Class(class)
        } else {
            SemanticType::Parameterized {
                raw: class,
                arguments: arguments
                    .iter()
                    .map(|argument| self.attribute_at(argument, depth))
                    .collect(),
            }
        }
    }

    fn type_variable(&self, name: &str) -> Option<&'a TypeParameter> {
        let method = self.method_type_parameters.iter();
        let enclosing = self
            .unit
            .enclosing(self.owner)
            .flat_map(|declaration| declaration.type_parameters().iter());
        method.chain(enclosing).find(|parameter| parameter.name == name)
    }

    fn resolve_name(&self, segments: &[String]) -> Option<ClassSignature> {
        match segments {
            [] => None,
            [name] => self.resolve_simple(name),
            [head, rest @ ..] => {
                if let Some(outer) = self.lookup_simple(head) {
                    return Some(rest.iter().fold(outer, |class, name| class.nested(name)));
                }
                Some(self.qualify(segments))
            }
        }
    }

    /// Resolves a simple name, falling back to the current package only when
    /// the unit has no on-demand imports that could also supply it.
    fn resolve_simple(&self, name: &str) -> Option<ClassSignature> {
        if let Some(found) = self.lookup_simple(name) {
            return Some(found);
        }
        self.unit
            .on_demand_imports()
            .is_empty()
            .then(|| self.in_package(name))
    }

    /// Resolves a simple name from evidence only: declarations, imports,
    /// and `java.lang`.
    fn lookup_simple(&self, name: &str) -> Option<ClassSignature> {
        for declaration in self.unit.enclosing(self.owner) {
            let member = declaration.binary_name().nested(name);
            if self.index.contains(&member) {
                return Some(member);
            }
            if declaration.name() == name {
                return Some(declaration.binary_name().clone());
            }
        }

        for import in self.unit.single_imports() {
            if import.rsplit('.').next() == Some(name) {
                let segments: Vec<String> = import.split('.').map(str::to_owned).collect();
                return Some(self.qualify(&segments));
            }
        }

        let local = self.in_package(name);
        if self.index.contains(&local) {
            return Some(local);
        }

        for import in self.unit.on_demand_imports() {
            let candidate = ClassSignature::new(&format!("{import}.{name}"));
            if self.index.contains(&candidate) {
                return Some(candidate);
            }
            let segments: Vec<String> = import.split('.').map(str::to_owned).collect();
            let nested = self.qualify(&segments).nested(name);
            if self.index.contains(&nested) {
                return Some(nested);
            }
        }

        JAVA_LANG
            .contains(&name)
            .then(|| ClassSignature::new(&format!("java.lang.{name}")))
    }

    /// Splits a dotted name into package and nested classes.
    ///
    /// Indexed types decide the split when they can; otherwise the first
    /// capitalised segment is taken as the top-level class.
    fn qualify(&self, segments: &[String]) -> ClassSignature {
        for split in 0..segments.len() {
            let candidate = compose(segments, split);
            if self.index.contains(&candidate) {
                return candidate;
            }
        }
        let split = segments
            .iter()
            .position(|segment| segment.starts_with(|c: char| c.is_ascii_uppercase()))
            .unwrap_or_else(|| segments.len().saturating_sub(1));
        compose(segments, split)
    }

    fn in_package(&self, name: &str) -> ClassSignature {
        match self.unit.package() {
            Some(package) => ClassSignature::new(&format!("{package}.{name}")),
            None => ClassSignature::new(name),
        }
    }
}

/// Treats `segments[..split]` as the package, `segments[split]` as the
/// top-level class and the rest as nested classes.
fn compose(segments: &[String], split: usize) -> ClassSignature {
    let (package, names) = segments.split_at(split.min(segments.len()));
    let Some((top, nested)) = names.split_first() else {
        return ClassSignature::new(&package.join("."));
    };
    let top_level = if package.is_empty() {
        ClassSignature::new(top)
    } else {
        ClassSignature::new(&format!("{}.{top}", package.join(".")))
    };
    nested
        .iter()
        .fold(top_level, |class, name| class.nested(name))
}

/// Direct superclass links between source-set types.
#[derive(Debug, Clone, Default)]
pub struct Hierarchy {
    superclasses: HashMap<ClassSignature, ClassSignature>,
}

impl Hierarchy {
    /// Creates an empty hierarchy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the attributed `extends` clause of every class in `unit`.
    pub fn record_unit(&mut self, unit: &CompilationUnit, index: &TypeIndex) {
        for (id, declaration) in unit.types_with_ids() {
            let Some(superclass) = declaration.superclass() else {
                continue;
            };
            match Scope::new(unit, index, id).attribute(superclass) {
                SemanticType::Class(class) | SemanticType::Parameterized { raw: class, .. } => {
                    self.insert(declaration.binary_name().clone(), class);
                }
                _ => {}
            }
        }
    }

    /// Records that `class` extends `superclass`.
    pub fn insert(&mut self, class: ClassSignature, superclass: ClassSignature) {
        self.superclasses.insert(class, superclass);
    }

    /// Returns the direct superclass of `class`, if known.
    #[must_use]
    pub fn superclass(&self, class: &ClassSignature) -> Option<&ClassSignature> {
        self.superclasses.get(class)
    }

    /// Returns the superclass chain of `class`, nearest first.
    ///
    /// The chain stops at the first type with no recorded superclass and
    /// never revisits a type, so cyclic input terminates.
    #[must_use]
    pub fn supertypes(&self, class: &ClassSignature) -> Vec<ClassSignature> {
        let mut chain = Vec::new();
        let mut seen = HashSet::from([class.clone()]);
        let mut current = class;
        while let Some(next) = self.superclasses.get(current) {
            if !seen.insert(next.clone()) {
                break;
            }
            chain.push(next.clone());
            current = next;
        }
        chain
    }
}
