//! Behaviour-driven tests for end-to-end refactoring scenarios.

use std::cell::RefCell;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

use heddle_providers::testing::{AddImportProvider, MoveUnitProvider, ScriptedProvider};
use heddle_providers::{EditOperation, StaticTransformation, TransformationProvider};
use heddle_workspace::testing::DeclarationCompiler;
use heddle_workspace::{
    DEFAULT_UNIT_PATH, ModuleDescriptor, SourceUnitChange, UnitPath,
};

use crate::{
    RefactoringScenario, ScenarioError, ScenarioFailure, ScenarioOptions, VerificationError,
    Verified,
};

#[derive(Default)]
struct TestWorld {
    scenario: RefactoringScenario,
    outcome: Option<Result<Verified, ScenarioError>>,
    invocations: Option<usize>,
}

#[fixture]
fn world() -> RefCell<TestWorld> {
    let options = ScenarioOptions::load_with_args(["heddle"]).expect("options should load");
    RefCell::new(TestWorld {
        scenario: RefactoringScenario::new().with_options(options),
        ..TestWorld::default()
    })
}

fn strip_quotes(value: &str) -> &str {
    value.trim_matches('"')
}

fn text(value: &str) -> String {
    strip_quotes(value).replace("\\n", "\n")
}

fn declare(world: &RefCell<TestWorld>, change: SourceUnitChange) {
    let mut state = world.borrow_mut();
    let scenario = std::mem::take(&mut state.scenario);
    state.scenario = scenario.with_change(change);
}

fn add_module(world: &RefCell<TestWorld>, descriptor: ModuleDescriptor) {
    let mut state = world.borrow_mut();
    let scenario = std::mem::take(&mut state.scenario);
    state.scenario = scenario.with_module(descriptor);
}

fn run(world: &RefCell<TestWorld>, provider: &dyn TransformationProvider) {
    let mut state = world.borrow_mut();
    let outcome = state.scenario.run(&DeclarationCompiler::new(), provider);
    state.outcome = Some(outcome);
}

fn failure(state: &TestWorld) -> &ScenarioError {
    state
        .outcome
        .as_ref()
        .expect("scenario has not run")
        .as_ref()
        .expect_err("scenario should fail")
}

#[given("module {module} exporting {symbol}")]
fn given_exporting_module(world: &RefCell<TestWorld>, module: String, symbol: String) {
    let (name, exported) = (strip_quotes(&module), strip_quotes(&symbol));
    add_module(world, ModuleDescriptor::new(name));
    declare(
        world,
        SourceUnitChange::unchanged(&format!("export {exported}"), &format!("{name}/{exported}"))
            .expect("valid change"),
    );
}

#[given("module {module} depending on {dependency} whose target {markup} should become {expected}")]
fn given_dependent_module(
    world: &RefCell<TestWorld>,
    module: String,
    dependency: String,
    markup: String,
    expected: String,
) {
    let name = strip_quotes(&module);
    add_module(
        world,
        ModuleDescriptor::new(name).depends_on(strip_quotes(&dependency)),
    );
    declare(
        world,
        SourceUnitChange::target_changed(&text(&markup), &text(&expected), &format!("{name}/Main"))
            .expect("valid change"),
    );
}

#[given("a single target unit {markup} expected to be deleted")]
fn given_deleted_target(world: &RefCell<TestWorld>, markup: String) {
    declare(
        world,
        SourceUnitChange::target_deleted(&text(&markup), DEFAULT_UNIT_PATH).expect("valid change"),
    );
}

#[given("a single target unit reading {markup}")]
fn given_target(world: &RefCell<TestWorld>, markup: String) {
    declare(
        world,
        SourceUnitChange::target_changed(&text(&markup), "", DEFAULT_UNIT_PATH)
            .expect("valid change"),
    );
}

#[given("a new unit {path} expected to read {expected}")]
fn given_new_unit(world: &RefCell<TestWorld>, path: String, expected: String) {
    declare(
        world,
        SourceUnitChange::new_unit(&text(&expected), strip_quotes(&path)).expect("valid change"),
    );
}

#[when("the scenario runs with the import provider")]
fn when_import_provider(world: &RefCell<TestWorld>) {
    run(world, &AddImportProvider);
}

#[when("the scenario runs with a scripted provider offering {title}")]
fn when_scripted_provider(world: &RefCell<TestWorld>, title: String) {
    let provider = ScriptedProvider::new().offering_titles([strip_quotes(&title)]);
    run(world, &provider);
    world.borrow_mut().invocations = Some(provider.invocations());
}

#[when("the scenario runs with a provider moving the target to {path}")]
fn when_move_provider(world: &RefCell<TestWorld>, path: String) {
    let destination = UnitPath::parse(strip_quotes(&path))
        .expect("valid path")
        .into_key();
    run(world, &MoveUnitProvider::new(destination));
}

#[when("the scenario runs with a provider rewriting the target to {replacement}")]
fn when_rewriting_provider(world: &RefCell<TestWorld>, replacement: String) {
    let target = UnitPath::parse(DEFAULT_UNIT_PATH)
        .expect("valid path")
        .into_key();
    let provider = ScriptedProvider::new().offering(StaticTransformation::new(
        "Rewrite",
        vec![EditOperation::ReplaceText {
            unit: target,
            text: text(&replacement),
        }],
    ));
    run(world, &provider);
}

#[then("the scenario passes")]
fn then_passes(world: &RefCell<TestWorld>) {
    let state = world.borrow();
    let outcome = state.outcome.as_ref().expect("scenario has not run");
    if let Err(error) = outcome {
        panic!("scenario should pass: {error}");
    }
}

#[then("the provider offered {titles}")]
fn then_offered(world: &RefCell<TestWorld>, titles: String) {
    let state = world.borrow();
    let verified = state
        .outcome
        .as_ref()
        .expect("scenario has not run")
        .as_ref()
        .expect("scenario should pass");
    let expected: Vec<String> = strip_quotes(&titles)
        .split(',')
        .map(str::to_owned)
        .collect();
    assert_eq!(verified.offered(), expected.as_slice());
}

#[then("the scenario fails during {stage} as an {category} failure")]
fn then_fails_as_an(world: &RefCell<TestWorld>, stage: String, category: String) {
    assert_failure(world, &stage, &category);
}

#[then("the scenario fails during {stage} as a {category} failure")]
fn then_fails_as_a(world: &RefCell<TestWorld>, stage: String, category: String) {
    assert_failure(world, &stage, &category);
}

fn assert_failure(world: &RefCell<TestWorld>, stage: &str, category: &str) {
    let state = world.borrow();
    let error = failure(&state);
    assert_eq!(error.stage().to_string(), strip_quotes(stage));
    assert_eq!(
        format!("{:?}", error.category()).to_lowercase(),
        strip_quotes(category)
    );
}

#[then("the scripted provider was never invoked")]
fn then_never_invoked(world: &RefCell<TestWorld>) {
    assert_eq!(world.borrow().invocations, Some(0));
}

#[then("the surviving unit still reads {residual}")]
fn then_residual(world: &RefCell<TestWorld>, residual: String) {
    let state = world.borrow();
    match failure(&state).failure() {
        ScenarioFailure::Verification(VerificationError::UnitNotDeleted {
            residual_text, ..
        }) => assert_eq!(residual_text, &text(&residual)),
        other => panic!("expected UnitNotDeleted, got {other:?}"),
    }
}

#[scenario(path = "tests/features/refactoring_scenarios.feature")]
fn refactoring_scenarios_behaviour(world: RefCell<TestWorld>) {
    let _ = world;
}
