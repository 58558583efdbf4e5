//! Access-transform model for the restamp toolchain.
//!
//! This crate owns everything keyed by JVM signatures:
//!
//! - [`AccessTransform`] pairs a target [`AccessLevel`] with a
//!   [`FinalityChange`]
//! - [`ClassSignature`], [`MethodSignature`] and [`FieldType`] form the lookup
//!   domain, with descriptors parsed and printed in JVM notation
//! - [`TransformCatalog`] answers consume-on-read lookups, including
//!   supertype-chain resolution for overriding methods
//! - [`parse_transformers`] and [`read_transformers`] load the line-oriented
//!   access-transformer format
//!
//! # Example
//!
//! ```
//! use restamp_at::{AccessLevel, ClassSignature, TransformCatalog, parse_transformers};
//!
//! let set = parse_transformers("public net.example.Widget count")?;
//! let catalog = TransformCatalog::new(set);
//! let widget = ClassSignature::new("net.example.Widget");
//!
//! let transform = catalog.field_transform(&widget, "count");
//! assert_eq!(transform.access(), Some(AccessLevel::Public));
//! assert!(catalog.unresolved_entries().is_empty());
//! # Ok::<(), restamp_at::FormatError>(())
//! ```

mod access;
mod catalog;
mod descriptor;
mod error;
mod format;
mod signature;

pub use access::{AccessLevel, AccessTransform, FinalityChange};
pub use catalog::{ClassTransforms, TransformCatalog, TransformSet, UnresolvedEntry};
pub use descriptor::{BaseType, FieldType, MethodDescriptor, ObjectType, Type};
pub use error::{DescriptorError, FormatError, UnappliedTransformsError};
pub use format::{parse_transformers, read_transformers};
pub use signature::{CONSTRUCTOR_NAME, ClassSignature, MethodSignature};
