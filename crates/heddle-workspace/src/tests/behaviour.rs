//! Behaviour-driven tests for workspace construction.

use std::cell::RefCell;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

use crate::testing::DeclarationCompiler;
use crate::{ModuleDescriptor, SourceUnitChange, TargetUnit, Workspace, WorkspaceBuilder};
use crate::{Severity, WorkspaceError};

#[derive(Default)]
struct TestWorld {
    compiler: DeclarationCompiler,
    modules: Vec<ModuleDescriptor>,
    changes: Vec<SourceUnitChange>,
    result: Option<Result<Workspace, WorkspaceError>>,
    target: Option<TargetUnit>,
}

#[fixture]
fn world() -> RefCell<TestWorld> {
    RefCell::new(TestWorld::default())
}

fn strip_quotes(value: &str) -> &str {
    value.trim_matches('"')
}

fn unescape(value: &str) -> String {
    strip_quotes(value).replace("\\n", "\n")
}

fn names(list: &str) -> Vec<String> {
    strip_quotes(list).split(',').map(str::to_owned).collect()
}

#[given("a module {name}")]
fn given_module(world: &RefCell<TestWorld>, name: String) {
    world
        .borrow_mut()
        .modules
        .push(ModuleDescriptor::new(strip_quotes(&name)));
}

#[given("a module {name} depending on {dependency}")]
fn given_dependent_module(world: &RefCell<TestWorld>, name: String, dependency: String) {
    world
        .borrow_mut()
        .modules
        .push(ModuleDescriptor::new(strip_quotes(&name)).depends_on(strip_quotes(&dependency)));
}

#[given("the unit {path} containing {code}")]
fn given_unit(world: &RefCell<TestWorld>, path: String, code: String) {
    let change = SourceUnitChange::unchanged(&unescape(&code), strip_quotes(&path))
        .expect("unit declaration should be valid");
    world.borrow_mut().changes.push(change);
}

#[given("the target unit {path} containing {markup}")]
fn given_target(world: &RefCell<TestWorld>, path: String, markup: String) {
    let change = SourceUnitChange::target_unchanged(&unescape(&markup), strip_quotes(&path))
        .expect("target declaration should be valid");
    world.borrow_mut().changes.push(change);
}

#[when("the workspace is built")]
fn when_built(world: &RefCell<TestWorld>) {
    let mut state = world.borrow_mut();
    let result = WorkspaceBuilder::new(&state.compiler).build(&state.modules, &state.changes);
    state.result = Some(result);
}

#[when("the workspace is built with its target")]
fn when_built_with_target(world: &RefCell<TestWorld>) {
    let mut state = world.borrow_mut();
    let result = WorkspaceBuilder::new(&state.compiler)
        .build_with_target(&state.modules, &state.changes);
    match result {
        Ok((workspace, target)) => {
            state.result = Some(Ok(workspace));
            state.target = Some(target);
        }
        Err(error) => state.result = Some(Err(error)),
    }
}

fn built(state: &TestWorld) -> &Workspace {
    state
        .result
        .as_ref()
        .expect("build was not attempted")
        .as_ref()
        .expect("build should succeed")
}

fn build_error(state: &TestWorld) -> &WorkspaceError {
    state
        .result
        .as_ref()
        .expect("build was not attempted")
        .as_ref()
        .expect_err("build should fail")
}

#[then("the compile order is {order}")]
fn then_compile_order(world: &RefCell<TestWorld>, order: String) {
    let state = world.borrow();
    assert_eq!(built(&state).compile_order(), names(&order).as_slice());
}

#[then("every module compiled exactly once")]
fn then_compiled_once(world: &RefCell<TestWorld>) {
    let state = world.borrow();
    let mut compiled = state.compiler.compiled_modules();
    compiled.sort();
    compiled.dedup();
    assert_eq!(compiled.len(), state.modules.len());
    assert_eq!(state.compiler.compiled_modules().len(), state.modules.len());
}

#[then("the build fails with a cycle {cycle}")]
fn then_cycle(world: &RefCell<TestWorld>, cycle: String) {
    let state = world.borrow();
    assert_eq!(build_error(&state), &WorkspaceError::cyclic(names(&cycle)));
}

#[then("no module was compiled")]
fn then_nothing_compiled(world: &RefCell<TestWorld>) {
    assert!(world.borrow().compiler.compiled_modules().is_empty());
}

#[then("the module {name} has no compile errors")]
fn then_no_errors(world: &RefCell<TestWorld>, name: String) {
    let state = world.borrow();
    let module = built(&state)
        .module(strip_quotes(&name))
        .expect("module should exist");
    let errors: Vec<_> = module
        .diagnostics()
        .iter()
        .filter(|diagnostic| diagnostic.severity() == Severity::Error)
        .collect();
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
}

#[then("the target span covers {text}")]
fn then_target_span(world: &RefCell<TestWorld>, text: String) {
    let state = world.borrow();
    let workspace = built(&state);
    let target = state.target.as_ref().expect("target should resolve");
    let unit = workspace.unit(target.key()).expect("target unit should exist");
    assert_eq!(target.span().slice(unit.text()), Some(strip_quotes(&text)));
}

#[then("the build fails because module {module} is unknown")]
fn then_unknown_module(world: &RefCell<TestWorld>, module: String) {
    let state = world.borrow();
    assert!(matches!(
        build_error(&state),
        WorkspaceError::UnknownModule { module: name, .. } if name == strip_quotes(&module)
    ));
}

#[scenario(path = "tests/features/workspace_builder.feature")]
fn workspace_builder_behaviour(world: RefCell<TestWorld>) {
    let _ = world;
}
