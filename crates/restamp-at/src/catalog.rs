//! The transform catalog and its consumption bookkeeping.
//!
//! A [`TransformSet`] is the plain, mutable collection built by the loader. A
//! [`TransformCatalog`] freezes a copy of that set for inheritance lookups and
//! keeps the original behind a lock so lookups can consume entries as they
//! are applied. Whatever remains non-empty after a full pass was never
//! applied.

use std::collections::{BTreeMap, BTreeSet};
use std::collections::btree_map::Entry;
use std::fmt;
use std::iter;
use std::mem;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::access::AccessTransform;
use crate::error::UnappliedTransformsError;
use crate::signature::{ClassSignature, MethodSignature};

/// Transforms addressed to one class and its members.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassTransforms {
    class: AccessTransform,
    fields: BTreeMap<String, AccessTransform>,
    methods: BTreeMap<MethodSignature, AccessTransform>,
}

impl ClassTransforms {
    /// Returns the class-level transform.
    #[must_use]
    pub const fn class_transform(&self) -> AccessTransform {
        self.class
    }

    /// Returns the transform for a field, or the empty transform.
    #[must_use]
    pub fn field(&self, name: &str) -> AccessTransform {
        self.fields.get(name).copied().unwrap_or_default()
    }

    /// Returns the transform for a method, or the empty transform.
    #[must_use]
    pub fn method(&self, signature: &MethodSignature) -> AccessTransform {
        self.methods.get(signature).copied().unwrap_or_default()
    }

    /// Iterates over field entries in name order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, AccessTransform)> {
        self.fields
            .iter()
            .map(|(name, transform)| (name.as_str(), *transform))
    }

    /// Iterates over method entries in signature order.
    pub fn methods(&self) -> impl Iterator<Item = (&MethodSignature, AccessTransform)> {
        self.methods
            .iter()
            .map(|(signature, transform)| (signature, *transform))
    }

    /// Merges a class-level transform into any existing one.
    pub fn add_class(&mut self, transform: AccessTransform) {
        self.class = self.class.merge(transform);
    }

    /// Merges a field transform into any existing entry.
    pub fn add_field(&mut self, name: impl Into<String>, transform: AccessTransform) {
        let slot = self.fields.entry(name.into()).or_default();
        *slot = slot.merge(transform);
    }

    /// Merges a method transform into any existing entry.
    pub fn add_method(&mut self, signature: MethodSignature, transform: AccessTransform) {
        let slot = self.methods.entry(signature).or_default();
        *slot = slot.merge(transform);
    }

    /// Returns true when every slot holds the empty transform.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.class.is_empty()
            && self.fields.values().all(|transform| transform.is_empty())
            && self.methods.values().all(|transform| transform.is_empty())
    }

    fn merge(&mut self, other: Self) {
        self.add_class(other.class);
        for (name, transform) in other.fields {
            self.add_field(name, transform);
        }
        for (signature, transform) in other.methods {
            self.add_method(signature, transform);
        }
    }

    fn take_class(&mut self) -> AccessTransform {
        mem::take(&mut self.class)
    }

    fn take_field(&mut self, name: &str) -> AccessTransform {
        self.fields.get_mut(name).map(mem::take).unwrap_or_default()
    }

    fn take_method(&mut self, signature: &MethodSignature) -> AccessTransform {
        self.methods
            .get_mut(signature)
            .map(mem::take)
            .unwrap_or_default()
    }
}

/// Mutable collection of class transforms, keyed by class signature.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformSet {
    classes: BTreeMap<ClassSignature, ClassTransforms>,
}

impl TransformSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the entry for `class`, creating an empty one if needed.
    pub fn class_mut(&mut self, class: ClassSignature) -> &mut ClassTransforms {
        self.classes.entry(class).or_default()
    }

    /// Returns the entry for `class`, if any.
    #[must_use]
    pub fn get(&self, class: &ClassSignature) -> Option<&ClassTransforms> {
        self.classes.get(class)
    }

    /// Iterates over classes in signature order.
    pub fn classes(&self) -> impl Iterator<Item = (&ClassSignature, &ClassTransforms)> {
        self.classes.iter()
    }

    /// Returns the number of classes with entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Returns true when the set has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Folds another set into this one, merging overlapping entries.
    pub fn merge(&mut self, other: Self) {
        for (class, transforms) in other.classes {
            match self.classes.entry(class) {
                Entry::Occupied(mut existing) => existing.get_mut().merge(transforms),
                Entry::Vacant(slot) => {
                    slot.insert(transforms);
                }
            }
        }
    }

    /// Returns the deduplicated source paths, relative to a source root, of
    /// every class named in the set.
    #[must_use]
    pub fn source_paths(&self) -> Vec<PathBuf> {
        let paths: BTreeSet<PathBuf> = self.classes.keys().map(ClassSignature::source_path).collect();
        paths.into_iter().collect()
    }

    fn unresolved(&self) -> Vec<UnresolvedEntry> {
        self.classes
            .iter()
            .filter(|(_, transforms)| !transforms.is_exhausted())
            .map(|(class, transforms)| UnresolvedEntry::from_residue(class, transforms))
            .collect()
    }
}

/// Residual transforms of one class after a full pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedEntry {
    class: ClassSignature,
    class_transform: AccessTransform,
    fields: Vec<(String, AccessTransform)>,
    methods: Vec<(MethodSignature, AccessTransform)>,
}

impl UnresolvedEntry {
    fn from_residue(class: &ClassSignature, transforms: &ClassTransforms) -> Self {
        Self {
            class: class.clone(),
            class_transform: transforms.class,
            fields: transforms
                .fields()
                .filter(|(_, transform)| !transform.is_empty())
                .map(|(name, transform)| (name.to_owned(), transform))
                .collect(),
            methods: transforms
                .methods()
                .filter(|(_, transform)| !transform.is_empty())
                .map(|(signature, transform)| (signature.clone(), transform))
                .collect(),
        }
    }

    /// Returns the class the residue belongs to.
    #[must_use]
    pub const fn class(&self) -> &ClassSignature {
        &self.class
    }

    /// Returns the unapplied class-level transform, empty if it was applied.
    #[must_use]
    pub const fn class_transform(&self) -> AccessTransform {
        self.class_transform
    }

    /// Returns the unapplied field transforms.
    #[must_use]
    pub fn fields(&self) -> &[(String, AccessTransform)] {
        &self.fields
    }

    /// Returns the unapplied method transforms.
    #[must_use]
    pub fn methods(&self) -> &[(MethodSignature, AccessTransform)] {
        &self.methods
    }
}

impl fmt::Display for UnresolvedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.class)?;
        if !self.class_transform.is_empty() {
            write!(f, " ({})", self.class_transform)?;
        }
        let fields: Vec<&str> = self.fields.iter().map(|(name, _)| name.as_str()).collect();
        let methods: Vec<String> = self
            .methods
            .iter()
            .map(|(signature, _)| signature.to_string())
            .collect();
        write!(f, ": [{}] {{{}}}", fields.join(", "), methods.join(", "))
    }
}

/// Thread-safe catalog with consume-on-read lookups.
///
/// The primary set is consumed as declarations claim their transforms. The
/// snapshot is frozen at construction and serves supertype-chain reads, so
/// override resolution does not depend on the order in which declarations
/// are visited.
#[derive(Debug)]
pub struct TransformCatalog {
    primary: Mutex<TransformSet>,
    snapshot: TransformSet,
}

impl TransformCatalog {
    /// Freezes `set` into a catalog.
    #[must_use]
    pub fn new(set: TransformSet) -> Self {
        Self {
            snapshot: set.clone(),
            primary: Mutex::new(set),
        }
    }

    /// Returns the frozen snapshot.
    #[must_use]
    pub const fn snapshot(&self) -> &TransformSet {
        &self.snapshot
    }

    /// Reads and consumes the class-level transform of `class`.
    #[must_use]
    pub fn class_transform(&self, class: &ClassSignature) -> AccessTransform {
        self.with_class(class, ClassTransforms::take_class)
    }

    /// Reads and consumes the transform of field `name` in `class`.
    #[must_use]
    pub fn field_transform(&self, class: &ClassSignature, name: &str) -> AccessTransform {
        self.with_class(class, |transforms| transforms.take_field(name))
    }

    /// Finds the transform for `method` declared in `owner`, falling back to
    /// the supertypes in order.
    ///
    /// Only a match found on `owner` itself is consumed. Matches inherited
    /// from a supertype stay in place for the supertype's own declaration.
    #[must_use]
    pub fn method_transform(
        &self,
        owner: &ClassSignature,
        method: &MethodSignature,
        supertypes: &[ClassSignature],
    ) -> AccessTransform {
        for class in iter::once(owner).chain(supertypes) {
            let found = self
                .snapshot
                .get(class)
                .map(|transforms| transforms.method(method))
                .unwrap_or_default();
            if found.is_empty() {
                continue;
            }
            if class == owner {
                let _consumed =
                    self.with_class(owner, |transforms| transforms.take_method(method));
            }
            return found;
        }
        AccessTransform::EMPTY
    }

    /// Lists every class that still holds unapplied transforms.
    #[must_use]
    pub fn unresolved_entries(&self) -> Vec<UnresolvedEntry> {
        self.primary().unresolved()
    }

    /// Fails when any transform was never applied.
    ///
    /// # Errors
    ///
    /// Returns [`UnappliedTransformsError`] listing the residual entries.
    pub fn verify_applied(&self) -> Result<(), UnappliedTransformsError> {
        let entries = self.unresolved_entries();
        if entries.is_empty() {
            Ok(())
        } else {
            Err(UnappliedTransformsError::new(entries))
        }
    }

    fn primary(&self) -> MutexGuard<'_, TransformSet> {
        self.primary.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn with_class(
        &self,
        class: &ClassSignature,
        take: impl FnOnce(&mut ClassTransforms) -> AccessTransform,
    ) -> AccessTransform {
        let mut primary = self.primary();
        primary.classes.get_mut(class).map(take).unwrap_or_default()
    }
}
