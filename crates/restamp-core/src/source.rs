//! Source file selection and parallel loading.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use restamp_at::TransformSet;
use restamp_syntax::{CompilationUnit, Hierarchy, JavaParser, SyntaxError, TypeIndex};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::RunError;

const JAVA_EXTENSION: &str = "java";

/// Which source files a run covers.
///
/// Explicit inputs may be files or directories; directories contribute every
/// `.java` file beneath them. With `from_transformers` set, the file
/// declaring each transformed class is added too. With no inputs and no
/// derivation the whole source root is used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSelection {
    root: PathBuf,
    inputs: Vec<PathBuf>,
    from_transformers: bool,
}

impl SourceSelection {
    /// Selects sources under `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            inputs: Vec::new(),
            from_transformers: false,
        }
    }

    /// Adds explicit files or directories.
    #[must_use]
    pub fn with_inputs(mut self, inputs: impl IntoIterator<Item = PathBuf>) -> Self {
        self.inputs.extend(inputs);
        self
    }

    /// Derives files from the classes named in the transformers.
    #[must_use]
    pub const fn from_transformers(mut self, enabled: bool) -> Self {
        self.from_transformers = enabled;
        self
    }

    /// Returns the source root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lists the selected `.java` files in sorted order.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::MissingSourceFiles`] when an explicit input or a
    /// derived file does not exist.
    pub fn resolve(&self, transforms: &TransformSet) -> Result<Vec<PathBuf>, RunError> {
        let mut selected = BTreeSet::new();
        let mut missing = Vec::new();

        if self.from_transformers {
            for relative in transforms.source_paths() {
                let path = self.root.join(relative);
                if path.is_file() {
                    selected.insert(path);
                } else {
                    missing.push(path);
                }
            }
        }

        for input in &self.inputs {
            if input.is_dir() {
                selected.extend(java_files_under(input));
            } else if input.is_file() {
                selected.insert(input.clone());
            } else {
                missing.push(input.clone());
            }
        }

        if self.inputs.is_empty() && !self.from_transformers {
            if !self.root.is_dir() {
                missing.push(self.root.clone());
            }
            selected.extend(java_files_under(&self.root));
        }

        if !missing.is_empty() {
            return Err(RunError::MissingSourceFiles { paths: missing });
        }
        debug!(files = selected.len(), root = %self.root.display(), "selected sources");
        Ok(selected.into_iter().collect())
    }
}

fn java_files_under(directory: &Path) -> impl Iterator<Item = PathBuf> {
    WalkDir::new(directory)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(error) => {
                warn!(%error, "skipping unreadable directory entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|path| {
            path.extension()
                .is_some_and(|extension| extension == JAVA_EXTENSION)
        })
}

/// One loaded source file.
#[derive(Debug, Clone)]
pub struct SourceFile {
    path: PathBuf,
    text: String,
    unit: CompilationUnit,
}

impl SourceFile {
    /// Parses `text` as the contents of `path`.
    ///
    /// Syntax errors are logged rather than returned; declarations around
    /// them are still extracted where the tree allows.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::Syntax`] when the parser fails outright.
    pub fn parse(
        parser: &mut JavaParser,
        path: impl Into<PathBuf>,
        text: String,
    ) -> Result<Self, RunError> {
        let file_path = path.into();
        let parsed = parser
            .parse(&text)
            .map_err(|source| RunError::syntax(&file_path, source))?;
        if parsed.has_errors() {
            for error in parsed.errors() {
                warn!(
                    path = %file_path.display(),
                    line = error.line,
                    column = error.column,
                    message = %error.message,
                    "syntax error in source file"
                );
            }
        }
        let unit = CompilationUnit::extract(&parsed);
        for skipped in unit.skipped() {
            warn!(
                path = %file_path.display(),
                line = skipped.line,
                reason = %skipped.reason,
                "declaration left untouched"
            );
        }
        Ok(Self {
            path: file_path,
            text,
            unit,
        })
    }

    /// Returns the file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the original text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the extracted declarations.
    #[must_use]
    pub const fn unit(&self) -> &CompilationUnit {
        &self.unit
    }
}

/// Parsed sources plus the type information shared across them.
#[derive(Debug, Clone, Default)]
pub struct SourceSet {
    files: Vec<SourceFile>,
    index: TypeIndex,
    hierarchy: Hierarchy,
}

impl SourceSet {
    /// Reads and parses `paths` in parallel on the current rayon pool.
    ///
    /// # Errors
    ///
    /// Fails on the first file that cannot be read or parsed.
    pub fn load(paths: &[PathBuf]) -> Result<Self, RunError> {
        let files = paths
            .par_iter()
            .map_init(JavaParser::new, |state, path| {
                let parser = state
                    .as_mut()
                    .map_err(|error| RunError::syntax(path, SyntaxError::parser_init(error.to_string())))?;
                let text = fs::read_to_string(path).map_err(|source| RunError::io(path, source))?;
                SourceFile::parse(parser, path, text)
            })
            .collect::<Result<Vec<_>, RunError>>()?;
        Ok(Self::from_files(files))
    }

    /// Builds the type index and hierarchy over already parsed files.
    #[must_use]
    pub fn from_files(files: Vec<SourceFile>) -> Self {
        let mut index = TypeIndex::new();
        for file in &files {
            index.extend_from(file.unit());
        }
        let mut hierarchy = Hierarchy::new();
        for file in &files {
            hierarchy.record_unit(file.unit(), &index);
        }
        debug!(
            files = files.len(),
            types = index.len(),
            "indexed source set"
        );
        Self {
            files,
            index,
            hierarchy,
        }
    }

    /// Returns the loaded files in selection order.
    #[must_use]
    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    /// Returns the index of declared types.
    #[must_use]
    pub const fn index(&self) -> &TypeIndex {
        &self.index
    }

    /// Returns the superclass links between declared types.
    #[must_use]
    pub const fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }
}
