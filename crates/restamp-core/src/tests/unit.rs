//! Unit tests for modifier rewriting and per-unit orchestration.

use std::borrow::Cow;
use std::path::Path;

use restamp_at::{
    AccessLevel, AccessTransform, ClassSignature, FinalityChange, TransformCatalog,
    parse_transformers,
};
use restamp_syntax::{Comment, JavaParser, ModifierKind, ModifierSite, ModifierToken, Trivia};
use rstest::rstest;

use crate::{
    FileRewrite, ModifierRewriter, Orchestrator, ResolutionError, Restamp, SourceFile, SourceSet,
};

fn token(text: &str, trivia: Trivia) -> ModifierToken {
    ModifierToken::new(ModifierKind::classify(text), trivia)
}

fn spaced(texts: &[&str]) -> Vec<ModifierToken> {
    texts
        .iter()
        .map(|text| token(text, Trivia::single_space()))
        .collect()
}

fn commented(comment: &str) -> Trivia {
    Trivia::new(" ", vec![Comment::new(comment, " ")])
}

fn kinds(tokens: &[ModifierToken]) -> Vec<ModifierKind> {
    tokens.iter().map(|token| token.kind().clone()).collect()
}

fn comment_count(tokens: &[ModifierToken], owner: &Trivia) -> usize {
    tokens
        .iter()
        .map(|token| token.trivia().comments().len())
        .chain(std::iter::once(owner.comments().len()))
        .sum()
}

const fn access(level: AccessLevel) -> AccessTransform {
    AccessTransform::access_only(level)
}

const fn finality(change: FinalityChange) -> AccessTransform {
    AccessTransform::finality_only(change)
}

const fn both(level: AccessLevel, change: FinalityChange) -> AccessTransform {
    AccessTransform::new(Some(level), change)
}

/// Token sequences paired with transforms that change them.
fn changing_cases() -> Vec<(Vec<ModifierToken>, AccessTransform)> {
    vec![
        (spaced(&["static", "private", "final"]), access(AccessLevel::Public)),
        (spaced(&["public", "static"]), access(AccessLevel::PackagePrivate)),
        (Vec::new(), finality(FinalityChange::Add)),
        (
            vec![
                token("final", commented("/* a */")),
                token("private", commented("/* b */")),
                token("static", Trivia::single_space()),
            ],
            both(AccessLevel::Public, FinalityChange::Remove),
        ),
        (
            spaced(&["private", "static", "final"]),
            both(AccessLevel::Protected, FinalityChange::Add),
        ),
        (spaced(&["static"]), access(AccessLevel::Public)),
        (
            vec![token(
                "private",
                Trivia::new("\n    ", vec![Comment::new("// counter", "\n    ")]),
            )],
            access(AccessLevel::PackagePrivate),
        ),
        (
            spaced(&["@Nullable", "protected", "static"]),
            both(AccessLevel::Public, FinalityChange::Add),
        ),
    ]
}

// =============================================================================
// Rewriter Scenarios
// =============================================================================

#[test]
fn visibility_is_substituted_in_place() {
    let tokens = spaced(&["static", "private", "final"]);
    let owner = Trivia::single_space();

    let rewrite = ModifierRewriter::rewrite(access(AccessLevel::Public), &tokens, &owner);

    assert!(rewrite.changed);
    assert_eq!(
        kinds(&rewrite.tokens),
        vec![
            ModifierKind::classify("static"),
            ModifierKind::Visibility(AccessLevel::Public),
            ModifierKind::Final,
        ]
    );
    assert_eq!(rewrite.tokens.first(), tokens.first());
    assert_eq!(rewrite.tokens.get(2), tokens.get(2));
    assert_eq!(
        ModifierSite::render(&rewrite.tokens, &rewrite.owner_trivia),
        " static public final "
    );
}

#[test]
fn package_private_target_only_removes() {
    let tokens = spaced(&["public", "static"]);
    let owner = Trivia::single_space();

    let rewrite =
        ModifierRewriter::rewrite(access(AccessLevel::PackagePrivate), &tokens, &owner);

    assert!(rewrite.changed);
    assert_eq!(kinds(&rewrite.tokens), vec![ModifierKind::classify("static")]);
    assert_eq!(
        ModifierSite::render(&rewrite.tokens, &rewrite.owner_trivia),
        " static "
    );
}

#[test]
fn final_is_added_to_an_empty_list() {
    let owner = Trivia::from_whitespace("\n    ");

    let rewrite = ModifierRewriter::rewrite(finality(FinalityChange::Add), &[], &owner);

    assert!(rewrite.changed);
    assert_eq!(kinds(&rewrite.tokens), vec![ModifierKind::Final]);
    assert_eq!(
        rewrite.tokens.first().map(|token| token.trivia().clone()),
        Some(owner)
    );
    assert_eq!(rewrite.owner_trivia, Trivia::single_space());
}

#[test]
fn dropped_comments_move_onto_the_replacement() {
    let tokens = vec![
        token("final", commented("/* a */")),
        token("private", commented("/* b */")),
        token("static", Trivia::single_space()),
    ];
    let owner = Trivia::single_space();

    let rewrite = ModifierRewriter::rewrite(
        both(AccessLevel::Public, FinalityChange::Remove),
        &tokens,
        &owner,
    );

    assert_eq!(
        ModifierSite::render(&rewrite.tokens, &rewrite.owner_trivia),
        " /* a */ /* b */ public static "
    );
}

#[test]
fn orphaned_comments_land_on_the_owner() {
    let tokens = vec![token(
        "private",
        Trivia::new("\n    ", vec![Comment::new("/* hidden */", " ")]),
    )];
    let owner = Trivia::single_space();

    let rewrite =
        ModifierRewriter::rewrite(access(AccessLevel::PackagePrivate), &tokens, &owner);

    assert!(rewrite.tokens.is_empty());
    assert_eq!(rewrite.owner_trivia.to_string(), "\n    /* hidden */ ");
}

#[test]
fn visibility_is_inserted_before_fixed_modifiers() {
    let tokens = vec![token("static", Trivia::from_whitespace("\n    "))];
    let owner = Trivia::single_space();

    let rewrite = ModifierRewriter::rewrite(access(AccessLevel::Public), &tokens, &owner);

    assert_eq!(
        ModifierSite::render(&rewrite.tokens, &rewrite.owner_trivia),
        "\n    public static "
    );
}

#[test]
fn visibility_is_inserted_into_an_empty_list() {
    let owner = Trivia::from_whitespace("\n\n    ");

    let rewrite = ModifierRewriter::rewrite(access(AccessLevel::Protected), &[], &owner);

    assert_eq!(
        ModifierSite::render(&rewrite.tokens, &rewrite.owner_trivia),
        "\n\n    protected "
    );
}

// =============================================================================
// Rewriter Properties
// =============================================================================

#[rstest]
#[case(spaced(&["public"]), access(AccessLevel::Public))]
#[case(spaced(&["static"]), access(AccessLevel::PackagePrivate))]
#[case(spaced(&["private", "final"]), both(AccessLevel::Private, FinalityChange::Add))]
#[case(spaced(&["static"]), finality(FinalityChange::Remove))]
#[case(spaced(&["protected"]), AccessTransform::EMPTY)]
#[case(Vec::new(), access(AccessLevel::PackagePrivate))]
fn satisfied_transforms_return_the_input(
    #[case] tokens: Vec<ModifierToken>,
    #[case] transform: AccessTransform,
) {
    let owner = Trivia::single_space();

    let rewrite = ModifierRewriter::rewrite(transform, &tokens, &owner);

    assert!(!rewrite.changed);
    assert!(
        matches!(rewrite.tokens, Cow::Borrowed(slice) if std::ptr::eq(slice, tokens.as_slice())),
        "unchanged rewrites should borrow the input"
    );
    assert_eq!(rewrite.owner_trivia, owner);
}

#[test]
fn rewriting_twice_changes_nothing_the_second_time() {
    for (tokens, transform) in changing_cases() {
        let owner = Trivia::single_space();
        let first = ModifierRewriter::rewrite(transform, &tokens, &owner);
        assert!(first.changed, "{transform} should change {tokens:?}");

        let second = ModifierRewriter::rewrite(transform, &first.tokens, &first.owner_trivia);

        assert!(!second.changed, "{transform} is not idempotent on {tokens:?}");
    }
}

#[test]
fn comments_are_never_dropped() {
    for (tokens, transform) in changing_cases() {
        let owner = Trivia::new(" ", vec![Comment::new("/* owner */", " ")]);

        let rewrite = ModifierRewriter::rewrite(transform, &tokens, &owner);

        assert_eq!(
            comment_count(&rewrite.tokens, &rewrite.owner_trivia),
            comment_count(&tokens, &owner),
            "{transform} lost a comment from {tokens:?}"
        );
    }
}

#[test]
fn replacement_never_moves_past_the_first_dropped_visibility() {
    for (tokens, transform) in changing_cases() {
        let Some(target) = transform.access() else {
            continue;
        };
        let first_dropped = tokens.iter().position(|token| {
            matches!(token.kind(), ModifierKind::Visibility(level) if *level != target)
        });
        let Some(first_dropped) = first_dropped else {
            continue;
        };

        let rewrite = ModifierRewriter::rewrite(transform, &tokens, &Trivia::single_space());
        let placed = rewrite
            .tokens
            .iter()
            .position(|token| token.kind() == &ModifierKind::Visibility(target));

        if let Some(placed) = placed {
            assert!(
                placed <= first_dropped,
                "{transform} placed visibility at {placed} after {first_dropped}"
            );
        }
    }
}

// =============================================================================
// Orchestrator Tests
// =============================================================================

fn source_set(files: &[(&str, &str)]) -> SourceSet {
    let mut parser = JavaParser::new().expect("parser init");
    let loaded = files
        .iter()
        .map(|(path, text)| {
            SourceFile::parse(&mut parser, *path, (*text).to_owned()).expect("parse source")
        })
        .collect();
    SourceSet::from_files(loaded)
}

fn catalog(text: &str) -> TransformCatalog {
    TransformCatalog::new(parse_transformers(text).expect("transformers"))
}

/// Runs every file through the orchestrator and returns the rewritten texts.
fn rewrite_all(sources: &SourceSet, catalog: &TransformCatalog) -> Vec<String> {
    let orchestrator = Orchestrator::new(catalog, sources.index(), sources.hierarchy());
    sources
        .files()
        .iter()
        .map(|file| {
            let outcome = orchestrator.process_unit(file.path(), file.unit());
            FileRewrite::new(file.path(), file.text(), outcome.edits)
                .expect("edits apply")
                .rewritten()
                .to_owned()
        })
        .collect()
}

#[rstest]
#[case(&[("p/B.java", SUBCLASS), ("p/A.java", SUPERCLASS)])]
#[case(&[("p/A.java", SUPERCLASS), ("p/B.java", SUBCLASS)])]
fn overriding_methods_inherit_the_superclass_transform(#[case] files: &[(&str, &str)]) {
    let sources = source_set(files);
    let catalog = catalog("public p.A m()V");

    let rewritten = rewrite_all(&sources, &catalog);

    for text in &rewritten {
        assert!(text.contains("    public void m() {}"), "not rewritten:\n{text}");
    }
    assert!(catalog.unresolved_entries().is_empty());
}

const SUPERCLASS: &str = "package p;

class A {
    void m() {}
}
";

const SUBCLASS: &str = "package p;

class B extends A {
    void m() {}
}
";

#[test]
fn unresolvable_parameters_only_skip_their_own_method() {
    let source = "package p;

import java.io.*;
import java.nio.*;

class A {
    void bad(Buffer buffer) {}
    void good(int value) {}
}
";
    let sources = source_set(&[("p/A.java", source)]);
    let catalog = catalog("public p.A bad(Ljava/nio/Buffer;)V\npublic p.A good(I)V");
    let orchestrator = Orchestrator::new(&catalog, sources.index(), sources.hierarchy());
    let file = sources.files().first().expect("one file");

    let outcome = orchestrator.process_unit(file.path(), file.unit());

    assert_eq!(outcome.failures.len(), 1);
    let failure = outcome.failures.first().expect("one failure");
    assert_eq!(failure.line, 7);
    assert!(matches!(
        failure.error,
        ResolutionError::TypeResolution { .. }
    ));
    let rewrite = FileRewrite::new(file.path(), file.text(), outcome.edits).expect("edits apply");
    assert!(rewrite.rewritten().contains("    void bad(Buffer buffer) {}"));
    assert!(rewrite.rewritten().contains("    public void good(int value) {}"));

    let unresolved = catalog.unresolved_entries();
    let entry = unresolved.first().expect("bad stays unresolved");
    assert_eq!(entry.class(), &ClassSignature::new("p.A"));
    let methods: Vec<String> = entry
        .methods()
        .iter()
        .map(|(signature, _)| signature.to_string())
        .collect();
    assert_eq!(methods, vec!["bad(Ljava/nio/Buffer;)V".to_owned()]);
}

#[rstest]
#[case(None, rayon::current_num_threads())]
#[case(Some(3), 3)]
fn work_runs_on_the_global_pool_unless_threads_are_set(
    #[case] threads: Option<usize>,
    #[case] expected: usize,
) {
    let restamp = Restamp::new().with_threads(threads);

    let workers = restamp
        .install(rayon::current_num_threads)
        .expect("pool starts");

    assert_eq!(workers, expected);
}

#[test]
fn a_single_on_demand_import_does_not_claim_unknown_names() {
    let source = "package p;

import java.util.*;

class A {
    void m(Helper helper) {}
    void n(ProcessHandle handle) {}
}
";
    let sources = source_set(&[("p/A.java", source)]);
    let catalog = catalog("public p.A m(Lp/Helper;)V\npublic p.A n(Ljava/lang/ProcessHandle;)V");
    let orchestrator = Orchestrator::new(&catalog, sources.index(), sources.hierarchy());
    let file = sources.files().first().expect("one file");

    let outcome = orchestrator.process_unit(file.path(), file.unit());

    let failure = outcome.failures.first().expect("m is skipped");
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(failure.line, 6);
    assert!(matches!(
        failure.error,
        ResolutionError::TypeResolution { .. }
    ));
    let rewrite = FileRewrite::new(file.path(), file.text(), outcome.edits).expect("edits apply");
    assert!(rewrite.rewritten().contains("    void m(Helper helper) {}"));
    assert!(
        rewrite
            .rewritten()
            .contains("    public void n(ProcessHandle handle) {}")
    );

    let unresolved = catalog.unresolved_entries();
    let methods: Vec<String> = unresolved
        .iter()
        .flat_map(|entry| entry.methods().iter().map(|(signature, _)| signature.to_string()))
        .collect();
    assert_eq!(methods, vec!["m(Lp/Helper;)V".to_owned()]);
}

#[test]
fn every_name_of_a_field_declaration_is_claimed() {
    let source = "package p;

class A {
    private int low, high;
}
";
    let sources = source_set(&[("p/A.java", source)]);
    let catalog = catalog("protected p.A low\npublic p.A high");

    let rewritten = rewrite_all(&sources, &catalog);

    assert_eq!(
        rewritten,
        vec!["package p;

class A {
    public int low, high;
}
"
        .to_owned()]
    );
    assert!(catalog.unresolved_entries().is_empty());
}

#[test]
fn satisfied_declarations_produce_no_edits() {
    let source = "package p;

public class A {
    public static final int LIMIT = 1;
}
";
    let sources = source_set(&[("p/A.java", source)]);
    let catalog = catalog("public p.A\npublic p.A LIMIT");
    let orchestrator = Orchestrator::new(&catalog, sources.index(), sources.hierarchy());
    let file = sources.files().first().expect("one file");

    let outcome = orchestrator.process_unit(file.path(), file.unit());

    assert!(outcome.edits.is_empty());
    assert_eq!(outcome.applied.len(), 2);
    assert!(outcome.applied.iter().all(|applied| !applied.changed));
    assert!(catalog.unresolved_entries().is_empty());
}

// =============================================================================
// Hunk Tests
// =============================================================================

#[test]
fn hunks_cover_whole_changed_lines() {
    let source = "package p;

class A {
    private int x;
    private final void m() {}
}
";
    let sources = source_set(&[("p/A.java", source)]);
    let catalog = catalog("public p.A x\nprotected-f p.A m()V");
    let orchestrator = Orchestrator::new(&catalog, sources.index(), sources.hierarchy());
    let file = sources.files().first().expect("one file");
    let outcome = orchestrator.process_unit(file.path(), file.unit());

    let rewrite =
        FileRewrite::new(Path::new("p/A.java"), file.text(), outcome.edits).expect("edits apply");
    let rendered: Vec<String> = rewrite
        .hunks()
        .iter()
        .map(|hunk| format!("@@ {}\n-{}\n+{}", hunk.line, hunk.removed, hunk.added))
        .collect();

    insta::assert_snapshot!(rendered.join("\n"), @r"
    @@ 4
    -    private int x;
    +    public int x;
    @@ 5
    -    private final void m() {}
    +    protected void m() {}
    ");
}
