//! End-to-end tests running transformers against source trees on disk.

use std::fs;
use std::path::{Path, PathBuf};

use restamp_at::{TransformCatalog, read_transformers};
use restamp_core::{Restamp, RunError, SourceSelection};
use tempfile::TempDir;

const WIDGET: &str = "package p;

/** Widget. */
class Widget {
    private static final int LIMIT = 4;

    // counts things
    private int count;

    @Deprecated
    protected final void reset() {}

    Widget(int start) {}

    private static class Helper {}
}
";

const TRANSFORMERS: &str = "# widen the widget
public p.Widget
public-f p.Widget LIMIT
protected p.Widget count
public-f p.Widget reset()V
public p.Widget <init>(I)V
public p.Widget$Helper
";

fn write_file(root: &Path, relative: &str, text: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap_or_else(|err| panic!("create {}: {err}", parent.display()));
    }
    fs::write(&path, text).unwrap_or_else(|err| panic!("write {}: {err}", path.display()));
    path
}

#[test]
fn derived_sources_are_rewritten_on_disk() {
    let temp_dir = TempDir::new().unwrap_or_else(|err| panic!("temp dir: {err}"));
    let root = temp_dir.path().join("src");
    let widget = write_file(&root, "p/Widget.java", WIDGET);
    let at = write_file(temp_dir.path(), "restamp.at", TRANSFORMERS);

    let transforms = read_transformers(&at).unwrap_or_else(|err| panic!("transformers: {err}"));
    let files = SourceSelection::new(&root)
        .from_transformers(true)
        .resolve(&transforms)
        .unwrap_or_else(|err| panic!("select: {err}"));
    assert_eq!(files, vec![widget.clone()]);

    let restamp = Restamp::new();
    let sources = restamp
        .load(&files)
        .unwrap_or_else(|err| panic!("load: {err}"));
    let catalog = TransformCatalog::new(transforms);
    let report = restamp
        .run(&sources, &catalog)
        .unwrap_or_else(|err| panic!("run: {err}"));
    report
        .write_all()
        .unwrap_or_else(|err| panic!("write: {err}"));

    assert!(report.unresolved().is_empty(), "{:?}", report.unresolved());
    assert!(report.failures().is_empty(), "{:?}", report.failures());
    let rewritten =
        fs::read_to_string(&widget).unwrap_or_else(|err| panic!("read back: {err}"));
    insta::assert_snapshot!(rewritten.trim_end(), @r"
package p;

/** Widget. */
public class Widget {
    public static int LIMIT = 4;

    // counts things
    protected int count;

    @Deprecated
    public void reset() {}

    public Widget(int start) {}

    public static class Helper {}
}
");
}

#[test]
fn unclaimed_transformers_leave_files_untouched() {
    let temp_dir = TempDir::new().unwrap_or_else(|err| panic!("temp dir: {err}"));
    let root = temp_dir.path().join("src");
    let widget = write_file(&root, "p/Widget.java", WIDGET);
    let at = write_file(temp_dir.path(), "restamp.at", "public p.Widget missing\n");

    let transforms = read_transformers(&at).unwrap_or_else(|err| panic!("transformers: {err}"));
    let files = SourceSelection::new(&root)
        .resolve(&transforms)
        .unwrap_or_else(|err| panic!("select: {err}"));
    let restamp = Restamp::new().with_threads(Some(1));
    let sources = restamp
        .load(&files)
        .unwrap_or_else(|err| panic!("load: {err}"));
    let catalog = TransformCatalog::new(transforms);
    let report = restamp
        .run(&sources, &catalog)
        .unwrap_or_else(|err| panic!("run: {err}"));
    report
        .write_all()
        .unwrap_or_else(|err| panic!("write: {err}"));

    assert!(report.rewrites().is_empty());
    let entries: Vec<String> = report.unresolved().iter().map(ToString::to_string).collect();
    assert_eq!(entries, vec!["p.Widget: [missing] {}".to_owned()]);
    assert!(catalog.verify_applied().is_err());
    let text = fs::read_to_string(&widget).unwrap_or_else(|err| panic!("read back: {err}"));
    assert_eq!(text, WIDGET);
}

#[test]
fn directories_contribute_every_java_file() {
    let temp_dir = TempDir::new().unwrap_or_else(|err| panic!("temp dir: {err}"));
    let root = temp_dir.path().join("src");
    let first = write_file(&root, "p/A.java", "package p;\nclass A {}\n");
    let second = write_file(&root, "p/q/B.java", "package p.q;\nclass B {}\n");
    write_file(&root, "p/notes.txt", "not java");

    let files = SourceSelection::new(&root)
        .with_inputs([root.join("p")])
        .resolve(&restamp_at::TransformSet::new())
        .unwrap_or_else(|err| panic!("select: {err}"));

    assert_eq!(files, vec![first, second]);
}

#[test]
fn missing_derived_sources_are_reported() {
    let temp_dir = TempDir::new().unwrap_or_else(|err| panic!("temp dir: {err}"));
    let root = temp_dir.path().join("src");
    fs::create_dir_all(&root).unwrap_or_else(|err| panic!("create root: {err}"));
    let at = write_file(temp_dir.path(), "restamp.at", "public a.b.Gone\n");
    let transforms = read_transformers(&at).unwrap_or_else(|err| panic!("transformers: {err}"));

    let error = SourceSelection::new(&root)
        .from_transformers(true)
        .resolve(&transforms)
        .expect_err("derived file is missing");

    match error {
        RunError::MissingSourceFiles { paths } => {
            assert_eq!(paths, vec![root.join("a/b/Gone.java")]);
        }
        other => panic!("unexpected error: {other}"),
    }
}
