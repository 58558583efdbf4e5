//! Tree walk turning a tree-sitter-java syntax tree into a
//! [`CompilationUnit`].
//!
//! Method bodies and initialisers are never entered, so local and anonymous
//! classes stay invisible. Comments are tree-sitter extras; trivia is taken
//! from the raw text between significant tokens instead of from comment
//! nodes, which keeps rendering byte-exact wherever the parser attached them.

use restamp_at::{BaseType, ClassSignature};
use tracing::debug;
use tree_sitter::Node;

use crate::error::SyntaxError;
use crate::modifier::{ModifierKind, ModifierSite, ModifierToken};
use crate::position::node_line;
use crate::trivia::Trivia;
use crate::unit::{
    CompilationUnit, FieldDeclaration, MethodDeclaration, MethodKind, SkippedDeclaration,
    TypeDeclaration, TypeId, TypeKind, TypeParameter, TypeRef,
};

pub(crate) struct Extractor<'s> {
    source: &'s str,
    unit: CompilationUnit,
}

impl<'s> Extractor<'s> {
    pub(crate) fn new(source: &'s str) -> Self {
        Self {
            source,
            unit: CompilationUnit::default(),
        }
    }

    pub(crate) fn extract(mut self, root: Node<'_>) -> CompilationUnit {
        let mut cursor = root.walk();
        for child in root.named_children(&mut cursor) {
            match child.kind() {
                "package_declaration" => self.unit.package = self.qualified_name(child),
                "import_declaration" => self.import(child),
                kind if type_kind(kind).is_some() => self.type_declaration(child, None),
                _ => {}
            }
        }
        debug!(
            package = self.unit.package.as_deref().unwrap_or_default(),
            types = self.unit.types.len(),
            fields = self.unit.fields.len(),
            methods = self.unit.methods.len(),
            skipped = self.unit.skipped.len(),
            "extracted declarations"
        );
        self.unit
    }

    fn text(&self, node: Node<'_>) -> &'s str {
        self.source.get(node.byte_range()).unwrap_or_default()
    }

    fn skip(&mut self, line: u32, reason: impl Into<String>) {
        self.unit.skipped.push(SkippedDeclaration {
            line,
            reason: reason.into(),
        });
    }

    fn qualified_name(&self, node: Node<'_>) -> Option<String> {
        let mut cursor = node.walk();
        let name = node
            .named_children(&mut cursor)
            .find(|child| matches!(child.kind(), "identifier" | "scoped_identifier"))?;
        Some(compact(self.text(name)))
    }

    fn import(&mut self, node: Node<'_>) {
        let mut is_static = false;
        let mut on_demand = false;
        let mut path = None;
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "static" => is_static = true,
                "asterisk" => on_demand = true,
                "identifier" | "scoped_identifier" => path = Some(compact(self.text(child))),
                _ => {}
            }
        }
        match (is_static, path) {
            (false, Some(path)) if on_demand => self.unit.on_demand_imports.push(path),
            (false, Some(path)) => self.unit.single_imports.push(path),
            _ => {}
        }
    }

    fn type_declaration(&mut self, node: Node<'_>, parent: Option<TypeId>) {
        let Some(kind) = type_kind(node.kind()) else {
            return;
        };
        let line = node_line(node);
        let Some(name) = node
            .child_by_field_name("name")
            .map(|name| self.text(name).to_owned())
        else {
            self.skip(line, format!("{} without a name", node.kind()));
            return;
        };
        let binary_name = match parent.and_then(|id| self.unit.type_declaration(id)) {
            Some(enclosing) => enclosing.binary_name().nested(&name),
            None => match self.unit.package.as_deref() {
                Some(package) => ClassSignature::new(&format!("{package}.{name}")),
                None => ClassSignature::new(&name),
            },
        };
        let site = match self.modifier_site(node) {
            Ok(site) => Some(site),
            Err(error) => {
                self.skip(line, error.to_string());
                None
            }
        };
        let type_parameters = node
            .child_by_field_name("type_parameters")
            .map(|parameters| self.type_parameters(parameters))
            .unwrap_or_default();
        let superclass = node
            .child_by_field_name("superclass")
            .and_then(first_type_child)
            .map(|superclass| self.type_ref(superclass));

        let id = TypeId(self.unit.types.len());
        self.unit.types.push(TypeDeclaration {
            name,
            binary_name,
            kind,
            parent,
            type_parameters,
            superclass,
            site,
            line,
        });

        let record_components = (kind == TypeKind::Record).then(|| {
            node.child_by_field_name("parameters")
                .map(|parameters| self.parameters(parameters))
                .unwrap_or_default()
        });
        if let Some(body) = node.child_by_field_name("body") {
            self.body(body, id, record_components.as_deref());
        }
    }

    fn body(&mut self, body: Node<'_>, owner: TypeId, record_components: Option<&[TypeRef]>) {
        let mut cursor = body.walk();
        for member in body.named_children(&mut cursor) {
            match member.kind() {
                "field_declaration" | "constant_declaration" => self.field(member, owner),
                "method_declaration" => self.method(member, owner, MethodKind::Method),
                "annotation_type_element_declaration" => {
                    self.method(member, owner, MethodKind::AnnotationElement);
                }
                "constructor_declaration" => self.method(member, owner, MethodKind::Constructor),
                "compact_constructor_declaration" => {
                    self.compact_constructor(member, owner, record_components.unwrap_or_default());
                }
                "enum_body_declarations" => self.body(member, owner, record_components),
                kind if type_kind(kind).is_some() => self.type_declaration(member, Some(owner)),
                _ => {}
            }
        }
    }

    fn field(&mut self, node: Node<'_>, owner: TypeId) {
        let line = node_line(node);
        let mut cursor = node.walk();
        let names: Vec<String> = node
            .children_by_field_name("declarator", &mut cursor)
            .filter_map(|declarator| declarator.child_by_field_name("name"))
            .map(|name| self.text(name).to_owned())
            .collect();
        if names.is_empty() {
            self.skip(line, "field declaration without declarators");
            return;
        }
        match self.modifier_site(node) {
            Ok(site) => self.unit.fields.push(FieldDeclaration {
                owner,
                names,
                site,
                line,
            }),
            Err(error) => self.skip(line, error.to_string()),
        }
    }

    fn method(&mut self, node: Node<'_>, owner: TypeId, kind: MethodKind) {
        let line = node_line(node);
        let Some(name) = node
            .child_by_field_name("name")
            .map(|name| self.text(name).to_owned())
        else {
            self.skip(line, format!("{} without a name", node.kind()));
            return;
        };
        let return_type = if kind.is_constructor() {
            None
        } else {
            let Some(declared) = node.child_by_field_name("type") else {
                self.skip(line, format!("method `{name}` without a return type"));
                return;
            };
            let dimensions = node
                .child_by_field_name("dimensions")
                .map_or(0, count_dimensions);
            Some(TypeRef::array(dimensions, self.type_ref(declared)))
        };
        let type_parameters = node
            .child_by_field_name("type_parameters")
            .map(|parameters| self.type_parameters(parameters))
            .unwrap_or_default();
        let parameters = node
            .child_by_field_name("parameters")
            .map(|parameters| self.parameters(parameters))
            .unwrap_or_default();
        self.push_method(
            node,
            MethodDeclaration {
                owner,
                kind,
                name,
                type_parameters,
                return_type,
                parameters,
                site: ModifierSite::new(0..0, Vec::new(), Trivia::default()),
                line,
            },
        );
    }

    fn compact_constructor(&mut self, node: Node<'_>, owner: TypeId, components: &[TypeRef]) {
        let line = node_line(node);
        let name = node
            .child_by_field_name("name")
            .map(|name| self.text(name).to_owned())
            .unwrap_or_default();
        self.push_method(
            node,
            MethodDeclaration {
                owner,
                kind: MethodKind::CompactConstructor,
                name,
                type_parameters: Vec::new(),
                return_type: None,
                parameters: components.to_vec(),
                site: ModifierSite::new(0..0, Vec::new(), Trivia::default()),
                line,
            },
        );
    }

    fn push_method(&mut self, node: Node<'_>, mut declaration: MethodDeclaration) {
        match self.modifier_site(node) {
            Ok(site) => {
                declaration.site = site;
                self.unit.methods.push(declaration);
            }
            Err(error) => self.skip(declaration.line, error.to_string()),
        }
    }

    fn parameters(&self, node: Node<'_>) -> Vec<TypeRef> {
        let mut types = Vec::new();
        let mut cursor = node.walk();
        for parameter in node.named_children(&mut cursor) {
            match parameter.kind() {
                "formal_parameter" => {
                    let declared = parameter.child_by_field_name("type").map_or_else(
                        || TypeRef::Unknown(self.text(parameter).to_owned()),
                        |declared| self.type_ref(declared),
                    );
                    let dimensions = parameter
                        .child_by_field_name("dimensions")
                        .map_or(0, count_dimensions);
                    types.push(TypeRef::array(dimensions, declared));
                }
                "spread_parameter" => types.push(self.spread_parameter(parameter)),
                _ => {}
            }
        }
        types
    }

    fn spread_parameter(&self, node: Node<'_>) -> TypeRef {
        let declared = first_type_child(node).map_or_else(
            || TypeRef::Unknown(self.text(node).to_owned()),
            |declared| self.type_ref(declared),
        );
        let mut cursor = node.walk();
        let extra_dimensions = node
            .named_children(&mut cursor)
            .find(|child| child.kind() == "variable_declarator")
            .and_then(|declarator| declarator.child_by_field_name("dimensions"))
            .map_or(0, count_dimensions);
        TypeRef::array(extra_dimensions.saturating_add(1), declared)
    }

    fn type_parameters(&self, node: Node<'_>) -> Vec<TypeParameter> {
        let mut cursor = node.walk();
        node.named_children(&mut cursor)
            .filter(|child| child.kind() == "type_parameter")
            .filter_map(|parameter| {
                let mut inner = parameter.walk();
                let children: Vec<Node<'_>> = parameter.named_children(&mut inner).collect();
                let name = children
                    .iter()
                    .find(|child| child.kind() == "type_identifier")?;
                let bound = children
                    .iter()
                    .find(|child| child.kind() == "type_bound")
                    .and_then(|bound| first_type_child(*bound))
                    .map(|bound| self.type_ref(bound));
                Some(TypeParameter {
                    name: self.text(*name).to_owned(),
                    bound,
                })
            })
            .collect()
    }

    fn type_ref(&self, node: Node<'_>) -> TypeRef {
        match node.kind() {
            "integral_type" | "floating_point_type" | "boolean_type" => {
                let keyword = self.text(node).trim();
                BaseType::from_keyword(keyword)
                    .map_or_else(|| TypeRef::Unknown(keyword.to_owned()), TypeRef::Primitive)
            }
            "void_type" => TypeRef::Void,
            "type_identifier" | "scoped_type_identifier" | "generic_type" => {
                let mut segments = Vec::new();
                let mut arguments = Vec::new();
                self.collect_name(node, &mut segments, &mut arguments);
                if segments.is_empty() {
                    TypeRef::Unknown(self.text(node).to_owned())
                } else {
                    TypeRef::Named {
                        segments,
                        arguments,
                    }
                }
            }
            "array_type" => {
                let element = node.child_by_field_name("element").map_or_else(
                    || TypeRef::Unknown(self.text(node).to_owned()),
                    |element| self.type_ref(element),
                );
                let dimensions = node
                    .child_by_field_name("dimensions")
                    .map_or(1, count_dimensions);
                TypeRef::array(dimensions, element)
            }
            "annotated_type" => {
                let mut cursor = node.walk();
                let inner = node
                    .named_children(&mut cursor)
                    .filter(|child| is_type_node(child.kind()))
                    .last();
                inner.map_or_else(
                    || TypeRef::Unknown(self.text(node).to_owned()),
                    |inner| self.type_ref(inner),
                )
            }
            "wildcard" => TypeRef::Wildcard,
            _ => TypeRef::Unknown(self.text(node).to_owned()),
        }
    }

    fn collect_name(&self, node: Node<'_>, segments: &mut Vec<String>, arguments: &mut Vec<TypeRef>) {
        if node.kind() == "type_identifier" {
            segments.push(self.text(node).to_owned());
            return;
        }
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "type_arguments" => *arguments = self.type_arguments(child),
                "type_identifier" | "scoped_type_identifier" | "generic_type" => {
                    self.collect_name(child, segments, arguments);
                }
                _ => {}
            }
        }
    }

    fn type_arguments(&self, node: Node<'_>) -> Vec<TypeRef> {
        let mut cursor = node.walk();
        node.named_children(&mut cursor)
            .filter(|child| is_type_node(child.kind()) || child.kind() == "wildcard")
            .map(|child| self.type_ref(child))
            .collect()
    }

    /// Captures modifier tokens, owner trivia, and the byte region they span.
    fn modifier_site(&self, declaration: Node<'_>) -> Result<ModifierSite, SyntaxError> {
        let line = node_line(declaration);
        let mut cursor = declaration.walk();
        let children: Vec<Node<'_>> = declaration
            .children(&mut cursor)
            .filter(|child| !child.is_extra())
            .collect();
        let modifier_list = children
            .first()
            .copied()
            .filter(|child| child.kind() == "modifiers");
        let owner = children
            .get(usize::from(modifier_list.is_some()))
            .copied()
            .ok_or_else(|| {
                SyntaxError::malformed(declaration.kind(), line, "nothing follows the modifiers")
            })?;

        let mut region_start = self.gap_start(declaration);
        let mut tokens = Vec::new();
        let mut previous_end = region_start;
        if let Some(modifiers) = modifier_list {
            let mut inner = modifiers.walk();
            let parts: Vec<Node<'_>> = modifiers
                .children(&mut inner)
                .filter(|child| !child.is_extra())
                .collect();
            let leading = parts
                .iter()
                .take_while(|part| is_annotation(part.kind()))
                .count();
            if let Some(last_leading) = leading.checked_sub(1).and_then(|index| parts.get(index)) {
                region_start = last_leading.end_byte();
                previous_end = region_start;
            }
            for part in parts.iter().skip(leading) {
                let trivia = self.trivia(previous_end, part.start_byte())?;
                tokens.push(ModifierToken::new(
                    ModifierKind::classify(self.text(*part)),
                    trivia,
                ));
                previous_end = part.end_byte();
            }
        }
        let owner_trivia = self.trivia(previous_end, owner.start_byte())?;
        Ok(ModifierSite::new(
            region_start..owner.start_byte(),
            tokens,
            owner_trivia,
        ))
    }

    /// Returns the end of the previous significant sibling, or the start of
    /// the parent when there is none.
    fn gap_start(&self, node: Node<'_>) -> usize {
        let mut previous = node.prev_sibling();
        while let Some(sibling) = previous {
            if !sibling.is_extra() {
                return sibling.end_byte();
            }
            previous = sibling.prev_sibling();
        }
        match node.parent() {
            Some(parent) if parent.parent().is_some() => parent.start_byte(),
            _ => 0,
        }
    }

    fn trivia(&self, start: usize, end: usize) -> Result<Trivia, SyntaxError> {
        let text = self
            .source
            .get(start..end)
            .ok_or_else(|| SyntaxError::trivia(start, format!("invalid range {start}..{end}")))?;
        Trivia::parse(text, start)
    }
}

fn type_kind(kind: &str) -> Option<TypeKind> {
    match kind {
        "class_declaration" => Some(TypeKind::Class),
        "interface_declaration" => Some(TypeKind::Interface),
        "enum_declaration" => Some(TypeKind::Enum),
        "record_declaration" => Some(TypeKind::Record),
        "annotation_type_declaration" => Some(TypeKind::Annotation),
        _ => None,
    }
}

fn is_annotation(kind: &str) -> bool {
    matches!(kind, "annotation" | "marker_annotation")
}

fn is_type_node(kind: &str) -> bool {
    matches!(
        kind,
        "integral_type"
            | "floating_point_type"
            | "boolean_type"
            | "void_type"
            | "type_identifier"
            | "scoped_type_identifier"
            | "generic_type"
            | "array_type"
            | "annotated_type"
    )
}

fn first_type_child(node: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .find(|child| is_type_node(child.kind()))
}

fn count_dimensions(node: Node<'_>) -> usize {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .filter(|child| child.kind() == "[")
        .count()
}

/// Strips whitespace and comments a qualified name may contain.
fn compact(text: &str) -> String {
    text.split('.')
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(".")
}
