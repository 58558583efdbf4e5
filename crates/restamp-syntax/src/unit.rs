//! Declarations extracted from one Java compilation unit.
//!
//! Type declarations live in an arena indexed by [`TypeId`]; each one records
//! its parent, so scopes and binary names are derived by walking parent links
//! rather than by searching the tree.

use restamp_at::{BaseType, ClassSignature};

use crate::extract::Extractor;
use crate::modifier::ModifierSite;
use crate::parser::ParseResult;

/// Index of a type declaration within its [`CompilationUnit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(pub(crate) usize);

/// The flavour of a type declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    /// `class`.
    Class,
    /// `interface`.
    Interface,
    /// `enum`.
    Enum,
    /// `record`.
    Record,
    /// `@interface`.
    Annotation,
}

/// A type as written in source, before name resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    /// A primitive keyword.
    Primitive(BaseType),
    /// `void`.
    Void,
    /// A possibly qualified, possibly parameterised type name.
    Named {
        /// Dotted name segments, for example `["Map", "Entry"]`.
        segments: Vec<String>,
        /// Type arguments of the innermost parameterised segment.
        arguments: Vec<TypeRef>,
    },
    /// An array of `dimensions` levels.
    Array {
        /// Element type, never itself an array.
        element: Box<TypeRef>,
        /// Number of dimensions.
        dimensions: usize,
    },
    /// A `?` type argument, with or without bounds.
    Wildcard,
    /// Syntax the extractor could not interpret.
    Unknown(String),
}

impl TypeRef {
    /// Creates a simple, unparameterised named type.
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self::Named {
            segments: name.split('.').map(str::to_owned).collect(),
            arguments: Vec::new(),
        }
    }

    /// Wraps a type in array dimensions, flattening nested arrays.
    #[must_use]
    pub fn array(dimensions: usize, element: Self) -> Self {
        if dimensions == 0 {
            return element;
        }
        match element {
            Self::Array {
                element: inner,
                dimensions: existing,
            } => Self::Array {
                element: inner,
                dimensions: existing.saturating_add(dimensions),
            },
            other => Self::Array {
                element: Box::new(other),
                dimensions,
            },
        }
    }
}

/// A declared type parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeParameter {
    /// Parameter name.
    pub name: String,
    /// First bound, if any.
    pub bound: Option<TypeRef>,
}

/// A class, interface, enum, record, or annotation type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDeclaration {
    pub(crate) name: String,
    pub(crate) binary_name: ClassSignature,
    pub(crate) kind: TypeKind,
    pub(crate) parent: Option<TypeId>,
    pub(crate) type_parameters: Vec<TypeParameter>,
    pub(crate) superclass: Option<TypeRef>,
    pub(crate) site: Option<ModifierSite>,
    pub(crate) line: u32,
}

impl TypeDeclaration {
    /// Returns the simple name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the binary name, for example `a.b.Outer$Inner`.
    #[must_use]
    pub const fn binary_name(&self) -> &ClassSignature {
        &self.binary_name
    }

    /// Returns the declaration flavour.
    #[must_use]
    pub const fn kind(&self) -> TypeKind {
        self.kind
    }

    /// Returns the lexically enclosing type.
    #[must_use]
    pub const fn parent(&self) -> Option<TypeId> {
        self.parent
    }

    /// Returns the declared type parameters.
    #[must_use]
    pub fn type_parameters(&self) -> &[TypeParameter] {
        &self.type_parameters
    }

    /// Returns the `extends` clause of a class.
    #[must_use]
    pub const fn superclass(&self) -> Option<&TypeRef> {
        self.superclass.as_ref()
    }

    /// Returns the modifier site, or `None` when its trivia could not be
    /// captured.
    #[must_use]
    pub const fn site(&self) -> Option<&ModifierSite> {
        self.site.as_ref()
    }

    /// Returns the one-based line of the declaration.
    #[must_use]
    pub const fn line(&self) -> u32 {
        self.line
    }
}

/// A field declaration, possibly binding several names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDeclaration {
    pub(crate) owner: TypeId,
    pub(crate) names: Vec<String>,
    pub(crate) site: ModifierSite,
    pub(crate) line: u32,
}

impl FieldDeclaration {
    /// Returns the declaring type.
    #[must_use]
    pub const fn owner(&self) -> TypeId {
        self.owner
    }

    /// Returns every name bound by the declaration.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Returns the modifier site.
    #[must_use]
    pub const fn site(&self) -> &ModifierSite {
        &self.site
    }

    /// Returns the one-based line of the declaration.
    #[must_use]
    pub const fn line(&self) -> u32 {
        self.line
    }
}

/// The flavour of a method-like declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    /// An ordinary method.
    Method,
    /// A constructor with an explicit parameter list.
    Constructor,
    /// A record's compact canonical constructor.
    CompactConstructor,
    /// An annotation type element.
    AnnotationElement,
}

impl MethodKind {
    /// Returns true for both constructor flavours.
    #[must_use]
    pub const fn is_constructor(self) -> bool {
        matches!(self, Self::Constructor | Self::CompactConstructor)
    }
}

/// A method, constructor, or annotation element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDeclaration {
    pub(crate) owner: TypeId,
    pub(crate) kind: MethodKind,
    pub(crate) name: String,
    pub(crate) type_parameters: Vec<TypeParameter>,
    pub(crate) return_type: Option<TypeRef>,
    pub(crate) parameters: Vec<TypeRef>,
    pub(crate) site: ModifierSite,
    pub(crate) line: u32,
}

impl MethodDeclaration {
    /// Returns the declaring type.
    #[must_use]
    pub const fn owner(&self) -> TypeId {
        self.owner
    }

    /// Returns the declaration flavour.
    #[must_use]
    pub const fn kind(&self) -> MethodKind {
        self.kind
    }

    /// Returns the name as written (the class name for constructors).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the method's own type parameters.
    #[must_use]
    pub fn type_parameters(&self) -> &[TypeParameter] {
        &self.type_parameters
    }

    /// Returns the declared return type; constructors have none.
    #[must_use]
    pub const fn return_type(&self) -> Option<&TypeRef> {
        self.return_type.as_ref()
    }

    /// Returns the parameter types, with varargs already turned into arrays.
    #[must_use]
    pub fn parameters(&self) -> &[TypeRef] {
        &self.parameters
    }

    /// Returns the modifier site.
    #[must_use]
    pub const fn site(&self) -> &ModifierSite {
        &self.site
    }

    /// Returns the one-based line of the declaration.
    #[must_use]
    pub const fn line(&self) -> u32 {
        self.line
    }
}

/// A declaration that could not be captured and was left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedDeclaration {
    /// One-based line of the declaration.
    pub line: u32,
    /// Why the declaration was skipped.
    pub reason: String,
}

/// Everything restamp needs from one source file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompilationUnit {
    pub(crate) package: Option<String>,
    pub(crate) single_imports: Vec<String>,
    pub(crate) on_demand_imports: Vec<String>,
    pub(crate) types: Vec<TypeDeclaration>,
    pub(crate) fields: Vec<FieldDeclaration>,
    pub(crate) methods: Vec<MethodDeclaration>,
    pub(crate) skipped: Vec<SkippedDeclaration>,
}

impl CompilationUnit {
    /// Extracts declarations from a parsed file.
    ///
    /// Local and anonymous classes are not visited. Declarations whose
    /// modifier trivia cannot be captured are recorded in
    /// [`CompilationUnit::skipped`] instead of failing the whole file.
    #[must_use]
    pub fn extract(parsed: &ParseResult) -> Self {
        Extractor::new(parsed.source()).extract(parsed.root_node())
    }

    /// Returns the package, or `None` for the default package.
    #[must_use]
    pub fn package(&self) -> Option<&str> {
        self.package.as_deref()
    }

    /// Returns single-type imports as dotted names.
    #[must_use]
    pub fn single_imports(&self) -> &[String] {
        &self.single_imports
    }

    /// Returns on-demand (`.*`) imports as dotted package or type names.
    #[must_use]
    pub fn on_demand_imports(&self) -> &[String] {
        &self.on_demand_imports
    }

    /// Returns all type declarations in document order.
    #[must_use]
    pub fn types(&self) -> &[TypeDeclaration] {
        &self.types
    }

    /// Iterates over type declarations together with their identifiers.
    pub fn types_with_ids(&self) -> impl Iterator<Item = (TypeId, &TypeDeclaration)> {
        self.types
            .iter()
            .enumerate()
            .map(|(index, declaration)| (TypeId(index), declaration))
    }

    /// Returns the type declaration with the given identifier.
    #[must_use]
    pub fn type_declaration(&self, id: TypeId) -> Option<&TypeDeclaration> {
        self.types.get(id.0)
    }

    /// Returns all field declarations.
    #[must_use]
    pub fn fields(&self) -> &[FieldDeclaration] {
        &self.fields
    }

    /// Returns all method-like declarations.
    #[must_use]
    pub fn methods(&self) -> &[MethodDeclaration] {
        &self.methods
    }

    /// Returns declarations that were left untouched.
    #[must_use]
    pub fn skipped(&self) -> &[SkippedDeclaration] {
        &self.skipped
    }

    /// Iterates from `id` outwards through its enclosing types.
    pub fn enclosing(&self, id: TypeId) -> impl Iterator<Item = &TypeDeclaration> {
        std::iter::successors(self.type_declaration(id), |declaration| {
            declaration
                .parent
                .and_then(|parent| self.type_declaration(parent))
        })
    }
}
