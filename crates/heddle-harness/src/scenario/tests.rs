//! Unit tests for the scenario pipeline.

use rstest::{fixture, rstest};

use heddle_config::LineEndingPolicy;
use heddle_providers::testing::{AddImportProvider, MoveUnitProvider, ScriptedProvider};
use heddle_providers::{EditOperation, SelectionError, StaticTransformation};
use heddle_workspace::testing::DeclarationCompiler;
use heddle_workspace::{LocateError, UnitKey, WorkspaceError};

use super::*;
use crate::apply::ApplyError;
use crate::error::{ErrorCategory, ScenarioFailure};
use crate::verify::{FILE_SEPARATOR, VerificationError};

#[fixture]
fn compiler() -> DeclarationCompiler {
    DeclarationCompiler::new()
}

fn default_key(name: &str) -> UnitKey {
    UnitKey::new("TestModule", Vec::new(), name)
}

fn rewrite(title: &str, text: &str) -> StaticTransformation {
    StaticTransformation::new(
        title,
        vec![EditOperation::ReplaceText {
            unit: default_key("TestUnit"),
            text: text.to_owned(),
        }],
    )
}

fn import_scenario(expected: &str) -> RefactoringScenario {
    RefactoringScenario::new()
        .with_modules([
            ModuleDescriptor::new("Core"),
            ModuleDescriptor::new("App").depends_on("Core"),
        ])
        .with_changes([
            SourceUnitChange::unchanged("export Widget", "Core/Widget").expect("valid change"),
            SourceUnitChange::target_changed("[|use Widget|]", expected, "App/Main")
                .expect("valid change"),
        ])
}

#[rstest]
fn importing_a_dependency_export_rewrites_the_dependent(compiler: DeclarationCompiler) {
    let verified = import_scenario("import Core\nuse Widget")
        .run(&compiler, &AddImportProvider)
        .expect("scenario should pass");

    assert_eq!(verified.offered(), ["Import Core"]);
    assert_eq!(verified.applied().title(), "Import Core");
    assert_eq!(verified.workspace().compile_order(), ["Core", "App"]);
    assert_eq!(verified.workspace().version(), 1);
}

#[rstest]
fn a_wrong_expectation_fails_verification_with_a_diff(compiler: DeclarationCompiler) {
    let error = import_scenario("use Widget")
        .run(&compiler, &AddImportProvider)
        .expect_err("expectation is wrong");

    assert_eq!(error.stage(), ScenarioStage::Verify);
    assert_eq!(error.category(), ErrorCategory::Verification);
    match error.failure() {
        ScenarioFailure::Verification(VerificationError::TransformationResultMismatch {
            unit,
            actual,
            diff,
            ..
        }) => {
            assert_eq!(unit, "App/Main");
            assert_eq!(actual, "import Core\nuse Widget");
            assert!(diff.contains("+import Core"));
        }
        other => panic!("expected a mismatch, got {other:?}"),
    }
}

#[rstest]
fn broken_input_stops_before_the_provider_runs(compiler: DeclarationCompiler) {
    let provider = ScriptedProvider::new().offering_titles(["Anything"]);
    let error = RefactoringScenario::single_unit("[|this is not a declaration|]", "")
        .expect("valid scenario")
        .run(&compiler, &provider)
        .expect_err("input does not compile");

    assert_eq!(provider.invocations(), 0);
    assert_eq!(error.stage(), ScenarioStage::Invoke);
    assert_eq!(error.category(), ErrorCategory::Input);
}

#[rstest]
fn the_input_check_can_be_switched_off(compiler: DeclarationCompiler) {
    let provider = ScriptedProvider::new().offering(rewrite("Fix", "export Fixed"));
    RefactoringScenario::single_unit("[|this is not a declaration|]", "export Fixed")
        .expect("valid scenario")
        .with_input_error_check(false)
        .run(&compiler, &provider)
        .expect("check is disabled");
    assert_eq!(provider.invocations(), 1);
}

#[rstest]
fn moving_the_target_deletes_it_and_creates_the_destination(compiler: DeclarationCompiler) {
    let scenario = RefactoringScenario::new().with_changes([
        SourceUnitChange::target_deleted("[|export Widget|]", DEFAULT_UNIT_PATH)
            .expect("valid change"),
        SourceUnitChange::new_unit("export Widget", "TestModule/Moved").expect("valid change"),
    ]);
    let verified = scenario
        .run(&compiler, &MoveUnitProvider::new(default_key("Moved")))
        .expect("move should verify");

    assert!(verified.workspace().unit(&default_key("TestUnit")).is_none());
    assert_eq!(
        verified.applied().touched(),
        [default_key("Moved"), default_key("TestUnit")]
    );
}

#[rstest]
fn a_surviving_deleted_unit_reports_its_residual_text(compiler: DeclarationCompiler) {
    let provider = ScriptedProvider::new().offering(rewrite("Keep", "export Kept"));
    let error = RefactoringScenario::new()
        .with_change(
            SourceUnitChange::target_deleted("[|export Widget|]", DEFAULT_UNIT_PATH)
                .expect("valid change"),
        )
        .run(&compiler, &provider)
        .expect_err("unit was not deleted");

    assert_eq!(error.stage(), ScenarioStage::Verify);
    assert!(matches!(
        error.failure(),
        ScenarioFailure::Verification(VerificationError::UnitNotDeleted { residual_text, .. })
            if residual_text == "export Kept"
    ));
}

#[rstest]
fn an_identity_rewrite_round_trips(compiler: DeclarationCompiler) {
    let provider = ScriptedProvider::new().offering(rewrite("Noop", "export Widget"));
    RefactoringScenario::single_unit("[|export Widget|]", "export Widget")
        .expect("valid scenario")
        .run(&compiler, &provider)
        .expect("identity rewrite verifies");
}

#[rstest]
fn selection_by_index_picks_that_position(compiler: DeclarationCompiler) {
    let provider = ScriptedProvider::new()
        .offering(rewrite("First", "export First"))
        .offering(rewrite("Second", "export Second"));
    RefactoringScenario::single_unit("[|export Widget|]", "export Second")
        .expect("valid scenario")
        .select_index(1)
        .run(&compiler, &provider)
        .expect("second transformation applies");
}

#[rstest]
fn selection_by_title_takes_the_first_match(compiler: DeclarationCompiler) {
    let provider = ScriptedProvider::new()
        .offering(rewrite("Other", "export Other"))
        .offering(rewrite("Same", "export One"))
        .offering(rewrite("Same", "export Two"));
    RefactoringScenario::single_unit("[|export Widget|]", "export One")
        .expect("valid scenario")
        .select_title("Same")
        .run(&compiler, &provider)
        .expect("first titled match applies");
}

#[rstest]
fn missing_transformations_fail_selection(compiler: DeclarationCompiler) {
    let provider = ScriptedProvider::new().offering_titles(["Only"]);
    let error = RefactoringScenario::single_unit("[|export Widget|]", "export Widget")
        .expect("valid scenario")
        .select_index(3)
        .run(&compiler, &provider)
        .expect_err("index is out of range");
    assert_eq!(error.stage(), ScenarioStage::Select);
    assert_eq!(error.category(), ErrorCategory::Selection);
}

#[rstest]
fn empty_change_sets_fail_application(compiler: DeclarationCompiler) {
    let provider = ScriptedProvider::new().offering_titles(["Hollow"]);
    let error = RefactoringScenario::single_unit("[|export Widget|]", "export Widget")
        .expect("valid scenario")
        .run(&compiler, &provider)
        .expect_err("nothing to apply");
    assert_eq!(error.stage(), ScenarioStage::Apply);
    assert!(matches!(
        error.failure(),
        ScenarioFailure::Apply(ApplyError::NoEditsProduced { .. })
    ));
}

#[rstest]
fn quiet_providers_pass_the_no_transformation_check(compiler: DeclarationCompiler) {
    RefactoringScenario::single_unit("[|export Widget|]", "export Widget")
        .expect("valid scenario")
        .run_no_transformation(&compiler, &AddImportProvider)
        .expect("nothing is offered");
}

#[rstest]
fn offers_fail_the_no_transformation_check(compiler: DeclarationCompiler) {
    let provider = ScriptedProvider::new().offering_titles(["Surprise"]);
    let error = RefactoringScenario::single_unit("[|export Widget|]", "export Widget")
        .expect("valid scenario")
        .run_no_transformation(&compiler, &provider)
        .expect_err("an offer was made");
    assert!(matches!(
        error.failure(),
        ScenarioFailure::Selection(SelectionError::UnexpectedTransformations { titles })
            if titles == &["Surprise".to_owned()]
    ));
}

#[rstest]
fn expected_titles_ignore_order(compiler: DeclarationCompiler) {
    let provider = ScriptedProvider::new().offering_titles(["B", "A"]);
    let scenario = RefactoringScenario::single_unit("[|export Widget|]", "export Widget")
        .expect("valid scenario");
    scenario
        .run_expect_titles(&compiler, &provider, &["A", "B"])
        .expect("titles match");
    let error = scenario
        .run_expect_titles::<&str>(&compiler, &provider, &[])
        .expect_err("empty expectation");
    assert_eq!(error.category(), ErrorCategory::Configuration);
}

#[rstest]
fn line_locators_past_the_end_fail_location(compiler: DeclarationCompiler) {
    let provider = ScriptedProvider::new().offering_titles(["Any"]);
    let error = RefactoringScenario::single_unit_at_line("export A\nexport B", 7, "")
        .expect("valid scenario")
        .run(&compiler, &provider)
        .expect_err("line 7 does not exist");
    assert_eq!(error.stage(), ScenarioStage::Locate);
    assert!(matches!(
        error.failure(),
        ScenarioFailure::Workspace(WorkspaceError::Locate(_))
    ));
}

#[rstest]
fn span_locators_reach_the_provider(compiler: DeclarationCompiler) {
    let invoked = RefactoringScenario::single_unit_at_span(
        "export Widget",
        TextSpan::new(7, 13),
        "export Widget",
    )
    .expect("valid scenario")
    .invoke(&compiler, &ScriptedProvider::new())
    .expect("invocation succeeds");
    assert!(invoked.candidates().is_empty());
}

#[rstest]
fn inverted_span_locators_fail_location(compiler: DeclarationCompiler) {
    let provider = ScriptedProvider::new().offering_titles(["Any"]);
    let error = RefactoringScenario::single_unit_at_span(
        "export Widget",
        TextSpan::new(13, 7),
        "export Widget",
    )
    .expect("valid scenario")
    .run(&compiler, &provider)
    .expect_err("span is inverted");
    assert_eq!(error.stage(), ScenarioStage::Locate);
    assert_eq!(error.category(), ErrorCategory::Configuration);
    assert_eq!(provider.invocations(), 0);
    assert!(matches!(
        error.failure(),
        ScenarioFailure::Workspace(WorkspaceError::Locate(LocateError::InvertedSpan { .. }))
    ));
}

#[rstest]
fn cyclic_modules_fail_the_build(compiler: DeclarationCompiler) {
    let error = RefactoringScenario::new()
        .with_modules([
            ModuleDescriptor::new("A").depends_on("B"),
            ModuleDescriptor::new("B").depends_on("A"),
        ])
        .with_change(SourceUnitChange::target_unchanged("[|export X|]", "A/X").expect("valid"))
        .run(&compiler, &AddImportProvider)
        .expect_err("cycle");
    assert_eq!(error.stage(), ScenarioStage::Build);
    assert_eq!(error.category(), ErrorCategory::Configuration);
}

#[rstest]
fn combined_verification_appends_sibling_units(compiler: DeclarationCompiler) {
    let provider = ScriptedProvider::new().offering(rewrite("Rewrite", "export Widget2"));
    let expected = format!("export Widget2\n{FILE_SEPARATOR}\nexport Helper");
    RefactoringScenario::new()
        .with_changes([
            SourceUnitChange::target_unchanged("[|export Widget|]", DEFAULT_UNIT_PATH)
                .expect("valid change"),
            SourceUnitChange::unchanged("export Helper", "TestModule/Helper")
                .expect("valid change"),
        ])
        .run_combined(&compiler, &provider, &expected)
        .expect("combined text matches");
}

#[rstest]
fn crlf_expectations_match_under_normalisation(compiler: DeclarationCompiler) {
    let provider = ScriptedProvider::new().offering(rewrite("Split", "export A\nexport B"));
    let options = ScenarioOptions {
        line_endings: LineEndingPolicy::Always,
        ..ScenarioOptions::default()
    };
    RefactoringScenario::single_unit("[|export A|]", "export A\r\nexport B")
        .expect("valid scenario")
        .with_options(options)
        .run(&compiler, &provider)
        .expect("line endings are normalised");
}

#[test]
fn modules_are_inferred_once_per_name() {
    let changes = [
        SourceUnitChange::unchanged("", "Core/A").expect("valid change"),
        SourceUnitChange::unchanged("", "App/B").expect("valid change"),
        SourceUnitChange::unchanged("", "Core/C").expect("valid change"),
    ];
    let names: Vec<String> = infer_modules(&changes)
        .iter()
        .map(|module| module.name().to_owned())
        .collect();
    assert_eq!(names, ["Core", "App"]);
}
