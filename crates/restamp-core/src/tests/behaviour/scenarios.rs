//! Scenario bindings for the `restamp-core` BDD feature file.
//!
//! These functions bind Gherkin scenario names to the step definitions in the
//! parent module.

use std::cell::RefCell;

use rstest::fixture;
use rstest_bdd_macros::scenario;

use super::TestWorld;

/// Fixture providing the shared BDD world.
#[fixture]
fn world() -> RefCell<TestWorld> {
    super::world()
}

#[scenario(
    path = "tests/features/restamp.feature",
    name = "Widening a private field"
)]
fn widening_private_field(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/restamp.feature",
    name = "Removing final from a protected method"
)]
fn removing_final_from_method(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/restamp.feature",
    name = "Overriding methods follow the superclass transformer"
)]
fn overrides_follow_superclass(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/restamp.feature",
    name = "Unresolvable parameter types skip only their method"
)]
fn unresolvable_parameters_isolated(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/restamp.feature",
    name = "Transformers naming missing members stay unapplied"
)]
fn missing_members_unapplied(world: RefCell<TestWorld>) {
    drop(world);
}
