//! Behaviour-driven development (BDD) step definitions for restamp-core
//! scenarios.

use std::cell::RefCell;
use std::path::PathBuf;

use restamp_at::{ClassSignature, TransformCatalog, parse_transformers};
use restamp_syntax::JavaParser;
use rstest::fixture;
use rstest_bdd_macros::{given, then, when};

use crate::{Restamp, RunReport, SourceFile, SourceSet};

mod scenarios;

// =============================================================================
// Test World
// =============================================================================

/// State shared across BDD steps.
#[derive(Default)]
struct TestWorld {
    /// Java sources (path, content) in selection order.
    files: Vec<(PathBuf, String)>,
    /// Access-transformer text.
    transformers: String,
    /// Report of the last run.
    report: Option<RunReport>,
}

#[fixture]
fn world() -> RefCell<TestWorld> {
    RefCell::new(TestWorld::default())
}

/// Strips surrounding double quotes and expands `\n` escapes.
fn unquote(s: &str) -> String {
    s.trim_matches('"').replace("\\n", "\n")
}

// =============================================================================
// Given Steps
// =============================================================================

#[given("a Java file {path} containing {source}")]
fn given_java_file(world: &RefCell<TestWorld>, path: String, source: String) {
    world
        .borrow_mut()
        .files
        .push((PathBuf::from(unquote(&path)), unquote(&source)));
}

#[given("access transformers {text}")]
fn given_transformers(world: &RefCell<TestWorld>, text: String) {
    world.borrow_mut().transformers = unquote(&text);
}

// =============================================================================
// When Steps
// =============================================================================

#[when("the transformers are applied")]
fn when_applied(world: &RefCell<TestWorld>) {
    let mut w = world.borrow_mut();
    let mut parser = JavaParser::new().expect("parser init");
    let files = w
        .files
        .iter()
        .map(|(path, text)| SourceFile::parse(&mut parser, path, text.clone()).expect("parse"))
        .collect();
    let sources = SourceSet::from_files(files);
    let catalog = TransformCatalog::new(parse_transformers(&w.transformers).expect("transformers"));

    let report = Restamp::new()
        .with_threads(Some(2))
        .run(&sources, &catalog)
        .expect("run should succeed");
    w.report = Some(report);
}

// =============================================================================
// Then Steps
// =============================================================================

#[then("the file {path} contains {text}")]
fn then_file_contains(world: &RefCell<TestWorld>, path: String, text: String) {
    let w = world.borrow();
    let expected_path = PathBuf::from(unquote(&path));
    let expected_text = unquote(&text);
    let report = w.report.as_ref().expect("run report");
    let rewrite = report
        .rewrites()
        .iter()
        .find(|rewrite| rewrite.path() == expected_path)
        .unwrap_or_else(|| panic!("{} was not rewritten", expected_path.display()));
    assert!(
        rewrite.rewritten().contains(&expected_text),
        "Expected '{expected_text}' in:\n{}",
        rewrite.rewritten()
    );
}

#[then("no transformers remain unapplied")]
fn then_nothing_unapplied(world: &RefCell<TestWorld>) {
    let w = world.borrow();
    let report = w.report.as_ref().expect("run report");
    assert!(
        report.unresolved().is_empty(),
        "Expected no unapplied transformers, got {:?}",
        report.unresolved()
    );
}

#[then("the transformers for {class} remain unapplied")]
fn then_class_unapplied(world: &RefCell<TestWorld>, class: String) {
    let w = world.borrow();
    let signature = ClassSignature::new(&unquote(&class));
    let report = w.report.as_ref().expect("run report");
    assert!(
        report
            .unresolved()
            .iter()
            .any(|entry| entry.class() == &signature),
        "Expected {signature} among {:?}",
        report.unresolved()
    );
}

#[then("the member failure count is {count}")]
fn then_failure_count(world: &RefCell<TestWorld>, count: usize) {
    let w = world.borrow();
    let report = w.report.as_ref().expect("run report");
    assert_eq!(report.failures().len(), count, "{:?}", report.failures());
}

#[then("no files are rewritten")]
fn then_no_rewrites(world: &RefCell<TestWorld>) {
    let w = world.borrow();
    let report = w.report.as_ref().expect("run report");
    assert!(report.rewrites().is_empty());
}
