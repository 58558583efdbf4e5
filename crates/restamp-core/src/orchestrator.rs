//! Per-unit driver: look up, rewrite, and record edits for every
//! declaration.

use std::path::{Path, PathBuf};

use restamp_at::{AccessTransform, ClassSignature, TransformCatalog};
use restamp_syntax::{
    CompilationUnit, FieldDeclaration, Hierarchy, MethodDeclaration, ModifierSite, Scope,
    TextEdit, TypeDeclaration, TypeIndex,
};
use tracing::{debug, warn};

use crate::error::ResolutionError;
use crate::resolver::SignatureResolver;
use crate::rewriter::ModifierRewriter;

/// A member that was left untouched because its signature did not resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberFailure {
    /// File declaring the member.
    pub path: PathBuf,
    /// One-based line of the declaration.
    pub line: u32,
    /// Why resolution failed.
    pub error: ResolutionError,
}

/// A transform that was matched to a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedTransform {
    /// Member label, for example `p.A.m(I)V` or `p.A.count`.
    pub member: String,
    /// One-based line of the declaration.
    pub line: u32,
    /// The transform applied.
    pub transform: AccessTransform,
    /// Whether the declaration text changed.
    pub changed: bool,
}

/// Everything produced for one compilation unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitOutcome {
    /// Edits to apply to the unit's source text.
    pub edits: Vec<TextEdit>,
    /// Transforms matched to declarations, in visiting order.
    pub applied: Vec<AppliedTransform>,
    /// Members skipped because resolution failed.
    pub failures: Vec<MemberFailure>,
}

/// Walks the declarations of compilation units against a catalog.
#[derive(Debug, Clone, Copy)]
pub struct Orchestrator<'a> {
    catalog: &'a TransformCatalog,
    index: &'a TypeIndex,
    hierarchy: &'a Hierarchy,
}

impl<'a> Orchestrator<'a> {
    /// Creates an orchestrator over a catalog and the source set's type
    /// information.
    #[must_use]
    pub const fn new(
        catalog: &'a TransformCatalog,
        index: &'a TypeIndex,
        hierarchy: &'a Hierarchy,
    ) -> Self {
        Self {
            catalog,
            index,
            hierarchy,
        }
    }

    /// Processes every type, field, and method of `unit`.
    ///
    /// `path` only labels failures and log events.
    #[must_use]
    pub fn process_unit(&self, path: &Path, unit: &CompilationUnit) -> UnitOutcome {
        let mut outcome = UnitOutcome::default();
        for declaration in unit.types() {
            self.process_type(path, declaration, &mut outcome);
        }
        for field in unit.fields() {
            self.process_field(path, unit, field, &mut outcome);
        }
        for method in unit.methods() {
            self.process_method(path, unit, method, &mut outcome);
        }
        outcome
    }

    fn process_type(&self, path: &Path, declaration: &TypeDeclaration, outcome: &mut UnitOutcome) {
        let Some(site) = declaration.site() else {
            warn!(
                path = %path.display(),
                line = declaration.line(),
                class = %declaration.binary_name(),
                "type modifiers could not be captured; leaving the declaration alone"
            );
            return;
        };
        let class = declaration.binary_name();
        let transform = self.catalog.class_transform(class);
        if transform.is_empty() {
            return;
        }
        apply(site, transform, class.to_string(), declaration.line(), outcome);
    }

    fn process_field(
        &self,
        path: &Path,
        unit: &CompilationUnit,
        field: &FieldDeclaration,
        outcome: &mut UnitOutcome,
    ) {
        let Some(owner) = unit.type_declaration(field.owner()) else {
            return;
        };
        let class = owner.binary_name();
        let requested: Vec<(&str, AccessTransform)> = field
            .names()
            .iter()
            .map(|name| (name.as_str(), self.catalog.field_transform(class, name)))
            .filter(|(_, transform)| !transform.is_empty())
            .collect();
        let Some(transform) = combine_field_transforms(path, class, field.line(), &requested)
        else {
            return;
        };
        let member = format!("{class}.{}", field.names().join(", "));
        apply(field.site(), transform, member, field.line(), outcome);
    }

    fn process_method(
        &self,
        path: &Path,
        unit: &CompilationUnit,
        method: &MethodDeclaration,
        outcome: &mut UnitOutcome,
    ) {
        let Some(owner) = unit.type_declaration(method.owner()) else {
            return;
        };
        let class = owner.binary_name();
        let context = format!("{class}.{}", method.name());
        let scope = Scope::new(unit, self.index, method.owner())
            .with_method_type_parameters(method.type_parameters());

        let signature = match SignatureResolver::method_signature(method, &scope, &context) {
            Ok(signature) => signature,
            Err(error) => {
                warn!(
                    path = %path.display(),
                    line = method.line(),
                    %error,
                    "skipping method whose signature cannot be resolved"
                );
                outcome.failures.push(MemberFailure {
                    path: path.to_path_buf(),
                    line: method.line(),
                    error,
                });
                return;
            }
        };

        let supertypes = self.hierarchy.supertypes(class);
        let transform = self
            .catalog
            .method_transform(class, &signature, &supertypes);
        if transform.is_empty() {
            return;
        }
        apply(
            method.site(),
            transform,
            format!("{class}.{signature}"),
            method.line(),
            outcome,
        );
    }
}

/// Reduces the transforms requested for the names of one field declaration.
///
/// Divergent requests are merged towards the widest access and logged,
/// since one modifier list cannot express both.
fn combine_field_transforms(
    path: &Path,
    class: &ClassSignature,
    line: u32,
    requested: &[(&str, AccessTransform)],
) -> Option<AccessTransform> {
    let (_, first) = requested.first()?;
    let combined = requested
        .iter()
        .fold(*first, |combined, (_, transform)| combined.merge(*transform));
    if requested.iter().any(|(_, transform)| transform != first) {
        let names: Vec<String> = requested
            .iter()
            .map(|(name, transform)| format!("{name}={transform}"))
            .collect();
        warn!(
            path = %path.display(),
            line,
            %class,
            requested = %names.join(", "),
            applied = %combined,
            "names of one field declaration request different transforms"
        );
    }
    Some(combined)
}

fn apply(
    site: &ModifierSite,
    transform: AccessTransform,
    member: String,
    line: u32,
    outcome: &mut UnitOutcome,
) {
    let rewrite = ModifierRewriter::rewrite(transform, site.tokens(), site.owner_trivia());
    debug!(
        %member,
        line,
        %transform,
        changed = rewrite.changed,
        "applied access transform"
    );
    if rewrite.changed {
        outcome
            .edits
            .push(site.edit(&rewrite.tokens, &rewrite.owner_trivia));
    }
    outcome.applied.push(AppliedTransform {
        member,
        line,
        transform,
        changed: rewrite.changed,
    });
}
