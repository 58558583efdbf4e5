//! Erasure of attributed types into descriptor form.

use restamp_at::{FieldType, MethodDescriptor, MethodSignature, ObjectType, Type};
use restamp_syntax::{MethodDeclaration, Scope, SemanticType};

use crate::error::ResolutionError;

/// Maps attributed types onto the catalog's signature domain.
///
/// Generic arguments are discarded, type variables erase to their first
/// bound (or `java/lang/Object` when unbounded), and constructors become
/// void-returning `<init>` methods.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignatureResolver;

impl SignatureResolver {
    /// Resolves a type that may be `void`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError::TypeResolution`] for unknown types.
    pub fn resolve(semantic: &SemanticType, context: &str) -> Result<Type, ResolutionError> {
        match semantic {
            SemanticType::Void => Ok(Type::Void),
            other => Self::resolve_field(other, context).map(Type::Field),
        }
    }

    /// Resolves a type that must be a field type.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError::NonFieldParameterType`] for `void` and
    /// [`ResolutionError::TypeResolution`] for anything that cannot be
    /// attributed.
    pub fn resolve_field(
        semantic: &SemanticType,
        context: &str,
    ) -> Result<FieldType, ResolutionError> {
        match semantic {
            SemanticType::Primitive(base) => Ok(FieldType::Base(*base)),
            SemanticType::Class(class) | SemanticType::Parameterized { raw: class, .. } => {
                Ok(FieldType::Object(class.to_object_type()))
            }
            SemanticType::TypeVariable { bound: None, .. } => {
                Ok(FieldType::Object(ObjectType::object()))
            }
            SemanticType::TypeVariable {
                bound: Some(bound), ..
            } => Self::resolve_field(bound, context),
            SemanticType::Array(_) => {
                let (dimensions, element) = unwrap_array(semantic);
                if matches!(element, SemanticType::Void) {
                    return Err(ResolutionError::type_resolution(
                        context,
                        "array element type is void",
                    ));
                }
                Self::resolve_field(element, context)
                    .map(|resolved| FieldType::array(dimensions, resolved))
            }
            SemanticType::Void => Err(ResolutionError::non_field(context, "void")),
            SemanticType::Wildcard => Err(ResolutionError::type_resolution(
                context,
                "wildcard outside type arguments",
            )),
            SemanticType::Unknown(text) => Err(ResolutionError::type_resolution(
                context,
                format!("unknown type `{text}`"),
            )),
        }
    }

    /// Resolves the erased signature of a method-like declaration.
    ///
    /// `context` names the member in error messages.
    ///
    /// # Errors
    ///
    /// Fails when any parameter or the return type cannot be resolved; a
    /// parameter of non-field type fails the whole method.
    pub fn method_signature(
        declaration: &MethodDeclaration,
        scope: &Scope<'_>,
        context: &str,
    ) -> Result<MethodSignature, ResolutionError> {
        let parameters = declaration
            .parameters()
            .iter()
            .enumerate()
            .map(|(position, written)| {
                let label = format!("parameter {} of {context}", position.saturating_add(1));
                Self::resolve_field(&scope.attribute(written), &label)
            })
            .collect::<Result<Vec<_>, _>>()?;

        if declaration.kind().is_constructor() {
            return Ok(MethodSignature::constructor(parameters));
        }

        let written = declaration.return_type().ok_or_else(|| {
            ResolutionError::type_resolution(context, "method has no return type")
        })?;
        let return_type = Self::resolve(
            &scope.attribute(written),
            &format!("return type of {context}"),
        )?;
        Ok(MethodSignature::new(
            declaration.name(),
            MethodDescriptor::new(parameters, return_type),
        ))
    }
}

/// Counts array levels and returns the innermost element.
fn unwrap_array(semantic: &SemanticType) -> (usize, &SemanticType) {
    let mut dimensions = 0_usize;
    let mut current = semantic;
    while let SemanticType::Array(element) = current {
        dimensions = dimensions.saturating_add(1);
        current = element.as_ref();
    }
    (dimensions, current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use restamp_at::{BaseType, ClassSignature};
    use rstest::rstest;

    fn class(name: &str) -> SemanticType {
        SemanticType::Class(ClassSignature::new(name))
    }

    #[rstest]
    #[case(SemanticType::Primitive(BaseType::Int), "I")]
    #[case(class("java.lang.String"), "Ljava/lang/String;")]
    #[case(class("a.Outer$Inner"), "La/Outer$Inner;")]
    #[case(
        SemanticType::Parameterized {
            raw: ClassSignature::new("java.util.List"),
            arguments: vec![class("java.lang.String")],
        },
        "Ljava/util/List;"
    )]
    #[case(
        SemanticType::TypeVariable { name: "T".to_owned(), bound: None },
        "Ljava/lang/Object;"
    )]
    #[case(
        SemanticType::TypeVariable {
            name: "T".to_owned(),
            bound: Some(Box::new(class("java.lang.Number"))),
        },
        "Ljava/lang/Number;"
    )]
    #[case(
        SemanticType::Array(Box::new(SemanticType::Array(Box::new(class("java.lang.String"))))),
        "[[Ljava/lang/String;"
    )]
    fn field_types_erase_to_descriptors(#[case] semantic: SemanticType, #[case] expected: &str) {
        let resolved = SignatureResolver::resolve_field(&semantic, "test").expect("resolve");
        assert_eq!(resolved.to_string(), expected);
    }

    #[test]
    fn void_is_only_valid_as_a_return_type() {
        assert_eq!(
            SignatureResolver::resolve(&SemanticType::Void, "return").expect("resolve"),
            Type::Void
        );
        assert!(matches!(
            SignatureResolver::resolve_field(&SemanticType::Void, "parameter 1"),
            Err(ResolutionError::NonFieldParameterType { .. })
        ));
    }

    #[rstest]
    #[case(SemanticType::Unknown("Missing".to_owned()))]
    #[case(SemanticType::Wildcard)]
    #[case(SemanticType::Array(Box::new(SemanticType::Void)))]
    fn unresolvable_types_fail(#[case] semantic: SemanticType) {
        assert!(matches!(
            SignatureResolver::resolve_field(&semantic, "parameter 1 of p.A.m"),
            Err(ResolutionError::TypeResolution { .. })
        ));
    }
}
