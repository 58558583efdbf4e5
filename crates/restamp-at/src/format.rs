//! Loader for the line-oriented access-transformer format.
//!
//! Each non-blank line names an access keyword with an optional finality
//! marker, a class, and optionally one member:
//!
//! ```text
//! # comment
//! public net.example.Widget
//! protected-f net.example.Widget count
//! public net.example.Widget$Part <init>(Ljava/lang/String;)V
//! default+f net.example.Widget render(I)Ljava/lang/String;
//! ```
//!
//! Duplicate entries for the same target are merged.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::access::{AccessLevel, AccessTransform, FinalityChange};
use crate::catalog::TransformSet;
use crate::descriptor::MethodDescriptor;
use crate::error::FormatError;
use crate::signature::{ClassSignature, MethodSignature};

const COMMENT_MARKER: char = '#';
const WILDCARD: &str = "*";

/// Reads and parses an access-transformer file.
///
/// # Errors
///
/// Returns [`FormatError::Io`] when the file cannot be read, and line errors
/// from [`parse_transformers`].
pub fn read_transformers(path: &Path) -> Result<TransformSet, FormatError> {
    let text = fs::read_to_string(path).map_err(|source| FormatError::io(path, source))?;
    let set = parse_transformers(&text)?;
    debug!(
        path = %path.display(),
        classes = set.len(),
        "loaded access transformers"
    );
    Ok(set)
}

/// Parses access-transformer text.
///
/// # Errors
///
/// Returns [`FormatError::InvalidLine`] for malformed lines and
/// [`FormatError::UnsupportedWildcard`] for wildcard members.
pub fn parse_transformers(text: &str) -> Result<TransformSet, FormatError> {
    let mut set = TransformSet::new();
    for (index, raw) in text.lines().enumerate() {
        let line = index.saturating_add(1);
        let content = raw
            .split_once(COMMENT_MARKER)
            .map_or(raw, |(before, _)| before)
            .trim();
        if content.is_empty() {
            continue;
        }
        let entry = parse_entry(line, content)?;
        let class = set.class_mut(entry.class);
        match entry.target {
            Target::Class => class.add_class(entry.transform),
            Target::Field(name) => class.add_field(name, entry.transform),
            Target::Method(signature) => class.add_method(signature, entry.transform),
        }
    }
    Ok(set)
}

struct Entry {
    transform: AccessTransform,
    class: ClassSignature,
    target: Target,
}

enum Target {
    Class,
    Field(String),
    Method(MethodSignature),
}

fn parse_entry(line: usize, content: &str) -> Result<Entry, FormatError> {
    let mut tokens = content.split_whitespace();
    let (Some(modifier), Some(class)) = (tokens.next(), tokens.next()) else {
        return Err(FormatError::invalid_line(
            line,
            "expected an access modifier followed by a class name",
        ));
    };
    let member = tokens.next();
    if let Some(extra) = tokens.next() {
        return Err(FormatError::invalid_line(
            line,
            format!("unexpected trailing token `{extra}`"),
        ));
    }

    let transform = parse_modifier(line, modifier)?;
    let target = match member {
        None => Target::Class,
        Some(member) => parse_member(line, member)?,
    };
    Ok(Entry {
        transform,
        class: ClassSignature::new(class),
        target,
    })
}

fn parse_modifier(line: usize, modifier: &str) -> Result<AccessTransform, FormatError> {
    let (keyword, finality) = if let Some(keyword) = modifier.strip_suffix("-f") {
        (keyword, FinalityChange::Remove)
    } else if let Some(keyword) = modifier.strip_suffix("+f") {
        (keyword, FinalityChange::Add)
    } else {
        (modifier, FinalityChange::NoChange)
    };
    let access = match keyword {
        "default" => AccessLevel::PackagePrivate,
        other => AccessLevel::from_keyword(other).ok_or_else(|| {
            FormatError::invalid_line(line, format!("unknown access modifier `{modifier}`"))
        })?,
    };
    Ok(AccessTransform::new(Some(access), finality))
}

fn parse_member(line: usize, member: &str) -> Result<Target, FormatError> {
    let Some((name, signature)) = member.split_once('(') else {
        if member == WILDCARD {
            return Err(FormatError::UnsupportedWildcard { line });
        }
        return Ok(Target::Field(member.to_owned()));
    };
    if name == WILDCARD {
        return Err(FormatError::UnsupportedWildcard { line });
    }
    if name.is_empty() {
        return Err(FormatError::invalid_line(line, "method entry has no name"));
    }
    let descriptor: MethodDescriptor = format!("({signature}")
        .parse()
        .map_err(|error| FormatError::invalid_line(line, format!("{error}")))?;
    Ok(Target::Method(MethodSignature::new(name, descriptor)))
}
