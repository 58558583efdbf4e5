//! JVM field types and method descriptors.
//!
//! Object types are stored by internal name (`java/lang/String`), nested
//! classes keep their `$` separator, and arrays are flattened into a
//! dimension count plus a non-array element. Parsing accepts `.` as a package
//! separator so hand-written transformer files need not use slashes.

use std::fmt;
use std::str::FromStr;

use crate::error::DescriptorError;

/// Primitive JVM types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BaseType {
    /// `boolean` (`Z`).
    Boolean,
    /// `byte` (`B`).
    Byte,
    /// `char` (`C`).
    Char,
    /// `short` (`S`).
    Short,
    /// `int` (`I`).
    Int,
    /// `long` (`J`).
    Long,
    /// `float` (`F`).
    Float,
    /// `double` (`D`).
    Double,
}

impl BaseType {
    /// Returns the single-character descriptor tag.
    #[must_use]
    pub const fn descriptor(self) -> char {
        match self {
            Self::Boolean => 'Z',
            Self::Byte => 'B',
            Self::Char => 'C',
            Self::Short => 'S',
            Self::Int => 'I',
            Self::Long => 'J',
            Self::Float => 'F',
            Self::Double => 'D',
        }
    }

    /// Maps a descriptor tag onto its primitive type.
    #[must_use]
    pub const fn from_descriptor(tag: char) -> Option<Self> {
        match tag {
            'Z' => Some(Self::Boolean),
            'B' => Some(Self::Byte),
            'C' => Some(Self::Char),
            'S' => Some(Self::Short),
            'I' => Some(Self::Int),
            'J' => Some(Self::Long),
            'F' => Some(Self::Float),
            'D' => Some(Self::Double),
            _ => None,
        }
    }

    /// Maps a Java primitive keyword onto its type.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "boolean" => Some(Self::Boolean),
            "byte" => Some(Self::Byte),
            "char" => Some(Self::Char),
            "short" => Some(Self::Short),
            "int" => Some(Self::Int),
            "long" => Some(Self::Long),
            "float" => Some(Self::Float),
            "double" => Some(Self::Double),
            _ => None,
        }
    }
}

/// A reference type addressed by its internal name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectType {
    internal_name: String,
}

impl ObjectType {
    /// Creates an object type, normalising `.` package separators to `/`.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            internal_name: name.replace('.', "/"),
        }
    }

    /// Returns `java/lang/Object`.
    #[must_use]
    pub fn object() -> Self {
        Self::new("java/lang/Object")
    }

    /// Returns the internal name, for example `java/util/Map$Entry`.
    #[must_use]
    pub fn internal_name(&self) -> &str {
        &self.internal_name
    }
}

/// A type that may appear as a field or parameter.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldType {
    /// A primitive.
    Base(BaseType),
    /// A class, interface, enum, or record.
    Object(ObjectType),
    /// An array of primitives or objects.
    Array {
        /// Number of dimensions, always at least one.
        dimensions: usize,
        /// Innermost element type, never itself an array.
        element: Box<FieldType>,
    },
}

impl FieldType {
    /// Wraps `element` in `dimensions` array levels.
    ///
    /// Nested arrays are flattened, and zero dimensions returns the element
    /// unchanged.
    #[must_use]
    pub fn array(dimensions: usize, element: Self) -> Self {
        if dimensions == 0 {
            return element;
        }
        match element {
            Self::Array {
                dimensions: inner,
                element: innermost,
            } => Self::Array {
                dimensions: dimensions.saturating_add(inner),
                element: innermost,
            },
            other => Self::Array {
                dimensions,
                element: Box::new(other),
            },
        }
    }

    /// Creates an object field type from a dotted or internal name.
    #[must_use]
    pub fn object(name: &str) -> Self {
        Self::Object(ObjectType::new(name))
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base(base) => write!(f, "{}", base.descriptor()),
            Self::Object(object) => write!(f, "L{};", object.internal_name()),
            Self::Array {
                dimensions,
                element,
            } => write!(f, "{}{element}", "[".repeat(*dimensions)),
        }
    }
}

impl FromStr for FieldType {
    type Err = DescriptorError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut reader = DescriptorReader::new(text);
        let field = reader.field_type()?;
        reader.finish()?;
        Ok(field)
    }
}

/// A return type: either a field type or `void`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Type {
    /// A value-carrying type.
    Field(FieldType),
    /// The `void` marker, valid only as a return type.
    Void,
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(field) => write!(f, "{field}"),
            Self::Void => f.write_str("V"),
        }
    }
}

/// Erased parameter types plus return type of a method.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MethodDescriptor {
    parameters: Vec<FieldType>,
    return_type: Type,
}

impl MethodDescriptor {
    /// Creates a descriptor from its parts.
    #[must_use]
    pub const fn new(parameters: Vec<FieldType>, return_type: Type) -> Self {
        Self {
            parameters,
            return_type,
        }
    }

    /// Returns the parameter types in declaration order.
    #[must_use]
    pub fn parameters(&self) -> &[FieldType] {
        &self.parameters
    }

    /// Returns the return type.
    #[must_use]
    pub const fn return_type(&self) -> &Type {
        &self.return_type
    }
}

impl fmt::Display for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for parameter in &self.parameters {
            write!(f, "{parameter}")?;
        }
        write!(f, "){}", self.return_type)
    }
}

impl FromStr for MethodDescriptor {
    type Err = DescriptorError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut reader = DescriptorReader::new(text);
        reader.expect('(')?;
        let mut parameters = Vec::new();
        while !reader.eat(')') {
            parameters.push(reader.field_type()?);
        }
        let return_type = if reader.eat('V') {
            Type::Void
        } else {
            Type::Field(reader.field_type()?)
        };
        reader.finish()?;
        Ok(Self::new(parameters, return_type))
    }
}

/// Cursor over descriptor text.
struct DescriptorReader<'a> {
    text: &'a str,
    rest: &'a str,
}

impl<'a> DescriptorReader<'a> {
    const fn new(text: &'a str) -> Self {
        Self { text, rest: text }
    }

    fn error(&self, message: &str) -> DescriptorError {
        DescriptorError::new(self.text, message)
    }

    fn eat(&mut self, tag: char) -> bool {
        match self.rest.strip_prefix(tag) {
            Some(rest) => {
                self.rest = rest;
                true
            }
            None => false,
        }
    }

    fn expect(&mut self, tag: char) -> Result<(), DescriptorError> {
        if self.eat(tag) {
            Ok(())
        } else {
            Err(self.error(&format!("expected `{tag}`")))
        }
    }

    fn finish(&self) -> Result<(), DescriptorError> {
        if self.rest.is_empty() {
            Ok(())
        } else {
            Err(self.error(&format!("unexpected trailing text `{}`", self.rest)))
        }
    }

    fn field_type(&mut self) -> Result<FieldType, DescriptorError> {
        let mut dimensions = 0usize;
        while self.eat('[') {
            dimensions = dimensions.saturating_add(1);
        }
        let element = self.element()?;
        Ok(FieldType::array(dimensions, element))
    }

    fn element(&mut self) -> Result<FieldType, DescriptorError> {
        let mut chars = self.rest.chars();
        let Some(tag) = chars.next() else {
            return Err(self.error("unexpected end of descriptor"));
        };
        if tag == 'L' {
            let Some((name, rest)) = chars.as_str().split_once(';') else {
                return Err(self.error("unterminated object type"));
            };
            if name.is_empty() {
                return Err(self.error("empty object type name"));
            }
            self.rest = rest;
            return Ok(FieldType::object(name));
        }
        let base = BaseType::from_descriptor(tag)
            .ok_or_else(|| self.error(&format!("unknown type tag `{tag}`")))?;
        self.rest = chars.as_str();
        Ok(FieldType::Base(base))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("I", FieldType::Base(BaseType::Int))]
    #[case("Ljava/lang/String;", FieldType::object("java/lang/String"))]
    #[case("Ljava.util.Map$Entry;", FieldType::object("java/util/Map$Entry"))]
    #[case("[[J", FieldType::array(2, FieldType::Base(BaseType::Long)))]
    fn parses_field_types(#[case] text: &str, #[case] expected: FieldType) {
        assert_eq!(text.parse::<FieldType>(), Ok(expected));
    }

    #[test]
    fn nested_array_construction_flattens_dimensions() {
        let inner = FieldType::array(1, FieldType::object("a/B"));
        let outer = FieldType::array(2, inner);
        assert_eq!(outer.to_string(), "[[[La/B;");
    }

    #[rstest]
    #[case("(Ljava/lang/Object;[I)V")]
    #[case("()Ljava/lang/String;")]
    #[case("(ZBCSIJFD)[[Ljava/util/List;")]
    fn method_descriptors_print_as_parsed(#[case] text: &str) {
        let descriptor: MethodDescriptor = text.parse().expect("descriptor");
        assert_eq!(descriptor.to_string(), text);
    }

    #[test]
    fn dotted_method_descriptors_normalise_to_internal_names() {
        let descriptor: MethodDescriptor = "(Ljava.lang.String;)V".parse().expect("descriptor");
        assert_eq!(descriptor.to_string(), "(Ljava/lang/String;)V");
        assert_eq!(descriptor.return_type(), &Type::Void);
    }

    #[rstest]
    #[case("")]
    #[case("Q")]
    #[case("Ljava/lang/String")]
    #[case("L;")]
    #[case("(V)V")]
    #[case("()")]
    #[case("(I)VV")]
    #[case("I)V")]
    fn rejects_malformed_descriptors(#[case] text: &str) {
        assert!(text.parse::<FieldType>().is_err());
        assert!(text.parse::<MethodDescriptor>().is_err());
    }
}
