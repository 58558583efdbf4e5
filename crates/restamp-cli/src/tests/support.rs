//! Shared fixtures for CLI tests.

use std::ffi::OsString;

use restamp_at::{TransformCatalog, parse_transformers};
use restamp_config::Config;
use restamp_core::{Restamp, RunReport, SourceFile, SourceSet};
use restamp_syntax::JavaParser;

use crate::{AppError, ConfigLoader};

/// Runs `transformers` over one in-memory file named `p/A.java`.
pub(crate) fn report_for(source: &str, transformers: &str) -> RunReport {
    let mut parser = JavaParser::new().expect("parser init");
    let file = SourceFile::parse(&mut parser, "p/A.java", source.to_owned()).expect("parse");
    let sources = SourceSet::from_files(vec![file]);
    let catalog = TransformCatalog::new(parse_transformers(transformers).expect("transformers"));
    Restamp::new()
        .with_threads(Some(1))
        .run(&sources, &catalog)
        .expect("run")
}

/// Loader returning a fixed configuration and recording its arguments.
#[derive(Default)]
pub(crate) struct StubLoader {
    pub(crate) config: Config,
    pub(crate) seen: std::cell::RefCell<Vec<OsString>>,
}

impl ConfigLoader for StubLoader {
    fn load(&self, args: &[OsString]) -> Result<Config, AppError> {
        self.seen.borrow_mut().extend(args.iter().cloned());
        Ok(self.config.clone())
    }
}
