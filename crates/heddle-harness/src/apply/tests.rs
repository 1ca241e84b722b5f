//! Unit tests for the applier.

use std::sync::Arc;

use rstest::{fixture, rstest};

use heddle_providers::{ProviderFault, StaticTransformation, Transformation};
use heddle_workspace::testing::DeclarationCompiler;
use heddle_workspace::{ModuleDescriptor, SourceUnitChange, TextSpan, WorkspaceBuilder};

use super::*;

fn key(module: &str, name: &str) -> UnitKey {
    UnitKey::new(module, Vec::new(), name)
}

fn proposed(title: &str, operations: Vec<EditOperation>) -> ProposedTransformation {
    ProposedTransformation::new(
        "test",
        Arc::new(StaticTransformation::new(title, operations)),
    )
}

#[fixture]
fn workspace() -> Workspace {
    let compiler = DeclarationCompiler::new();
    let changes = [
        SourceUnitChange::unchanged("export Widget", "Core/Widget").expect("valid change"),
        SourceUnitChange::unchanged("use Widget", "Core/Main").expect("valid change"),
    ];
    WorkspaceBuilder::new(&compiler)
        .build(&[ModuleDescriptor::new("Core")], &changes)
        .expect("workspace should build")
}

fn text(workspace: &Workspace, name: &str) -> Option<String> {
    workspace
        .unit(&key("Core", name))
        .map(|unit| unit.text().to_owned())
}

#[rstest]
#[case::single_replacement(
    vec![TextEdit::replace(TextSpan::new(4, 10), "Gadget")],
    "use Gadget"
)]
#[case::edits_out_of_order(
    vec![
        TextEdit::replace(TextSpan::new(4, 10), "Gizmo"),
        TextEdit::replace(TextSpan::new(0, 3), "USE"),
    ],
    "USE Gizmo"
)]
#[case::insert_then_delete(
    vec![TextEdit::insert_at(0, "// note\n"), TextEdit::delete(TextSpan::new(3, 10))],
    "// note\nuse"
)]
#[case::insertions_at_one_offset_keep_their_order(
    vec![TextEdit::insert_at(10, "A"), TextEdit::insert_at(10, "B")],
    "use WidgetAB"
)]
#[case::insertion_touching_a_replacement(
    vec![TextEdit::replace(TextSpan::new(4, 10), "Gizmo"), TextEdit::insert_at(4, "x")],
    "use xGizmo"
)]
fn text_edits_address_the_original_text(#[case] edits: Vec<TextEdit>, #[case] expected: &str) {
    let edited = apply_text_edits(&key("Core", "Main"), "use Widget", &edits);
    assert_eq!(edited.as_deref(), Ok(expected));
}

#[rstest]
#[case::overlap(
    "use Widget",
    vec![
        TextEdit::replace(TextSpan::new(0, 5), "a"),
        TextEdit::replace(TextSpan::new(4, 8), "b"),
    ],
    ApplyError::OverlappingEdits { unit: "Core/Main".to_owned(), span: TextSpan::new(4, 8) }
)]
#[case::past_end(
    "use Widget",
    vec![TextEdit::replace(TextSpan::new(8, 40), "x")],
    ApplyError::EditOutOfRange {
        unit: "Core/Main".to_owned(),
        span: TextSpan::new(8, 40),
        length: 10,
    }
)]
#[case::split_character(
    "é",
    vec![TextEdit::insert_at(1, "x")],
    ApplyError::EditOutOfRange { unit: "Core/Main".to_owned(), span: TextSpan::empty(1), length: 2 }
)]
#[case::inverted(
    "use Widget",
    vec![TextEdit::replace(TextSpan::new(6, 2), "x")],
    ApplyError::EditOutOfRange {
        unit: "Core/Main".to_owned(),
        span: TextSpan::new(6, 2),
        length: 10,
    }
)]
fn malformed_text_edits_are_rejected(
    #[case] original: &str,
    #[case] edits: Vec<TextEdit>,
    #[case] expected: ApplyError,
) {
    let error = apply_text_edits(&key("Core", "Main"), original, &edits)
        .expect_err("edits should be rejected");
    assert_eq!(error, expected);
}

#[rstest]
fn applying_edits_updates_the_unit_and_version(mut workspace: Workspace) {
    let transformation = proposed(
        "Rename",
        vec![EditOperation::EditText {
            unit: key("Core", "Main"),
            edits: vec![TextEdit::replace(TextSpan::new(4, 10), "Gadget")],
        }],
    );

    let applied = apply_transformation(&mut workspace, &transformation).expect("apply succeeds");

    assert_eq!(text(&workspace, "Main").as_deref(), Some("use Gadget"));
    assert_eq!(applied.title(), "Rename");
    assert_eq!(applied.touched(), [key("Core", "Main")]);
    assert_eq!(applied.version(), 1);
    assert_eq!(workspace.version(), 1);
}

#[rstest]
fn create_and_delete_move_a_unit(mut workspace: Workspace) {
    let transformation = proposed(
        "Move",
        vec![
            EditOperation::CreateUnit {
                unit: key("Core", "Moved"),
                text: "use Widget".to_owned(),
            },
            EditOperation::DeleteUnit {
                unit: key("Core", "Main"),
            },
        ],
    );

    apply_transformation(&mut workspace, &transformation).expect("apply succeeds");

    assert!(text(&workspace, "Main").is_none());
    assert_eq!(text(&workspace, "Moved").as_deref(), Some("use Widget"));
}

#[rstest]
fn a_failing_operation_leaves_the_workspace_untouched(mut workspace: Workspace) {
    let transformation = proposed(
        "Half done",
        vec![
            EditOperation::ReplaceText {
                unit: key("Core", "Main"),
                text: "use Gadget".to_owned(),
            },
            EditOperation::DeleteUnit {
                unit: key("Core", "Missing"),
            },
        ],
    );

    let error =
        apply_transformation(&mut workspace, &transformation).expect_err("delete should fail");

    assert_eq!(
        error,
        ApplyError::invalid_edit("Core/Missing", "unit does not exist")
    );
    assert_eq!(text(&workspace, "Main").as_deref(), Some("use Widget"));
    assert_eq!(workspace.version(), 0);
}

#[rstest]
fn creating_an_existing_unit_is_invalid(mut workspace: Workspace) {
    let transformation = proposed(
        "Duplicate",
        vec![EditOperation::CreateUnit {
            unit: key("Core", "Widget"),
            text: String::new(),
        }],
    );
    let error = apply_transformation(&mut workspace, &transformation).expect_err("unit exists");
    assert_eq!(
        error,
        ApplyError::invalid_edit("Core/Widget", "unit already exists")
    );
}

#[rstest]
fn creating_a_unit_in_an_unknown_module_is_invalid(mut workspace: Workspace) {
    let transformation = proposed(
        "Elsewhere",
        vec![EditOperation::CreateUnit {
            unit: key("Nowhere", "Widget"),
            text: String::new(),
        }],
    );
    let error = apply_transformation(&mut workspace, &transformation).expect_err("no module");
    assert!(matches!(error, ApplyError::InvalidEdit { .. }));
}

#[rstest]
fn editing_out_of_bounds_names_the_unit(mut workspace: Workspace) {
    let transformation = proposed(
        "Too far",
        vec![EditOperation::EditText {
            unit: key("Core", "Main"),
            edits: vec![TextEdit::insert_at(99, "x")],
        }],
    );
    let error = apply_transformation(&mut workspace, &transformation).expect_err("out of bounds");
    assert_eq!(
        error,
        ApplyError::EditOutOfRange {
            unit: "Core/Main".to_owned(),
            span: TextSpan::empty(99),
            length: 10,
        }
    );
    assert_eq!(text(&workspace, "Main").as_deref(), Some("use Widget"));
}

#[rstest]
fn empty_change_sets_are_rejected(mut workspace: Workspace) {
    let error = apply_transformation(&mut workspace, &proposed("Nothing", Vec::new()))
        .expect_err("empty change set");
    assert_eq!(
        error,
        ApplyError::NoEditsProduced {
            title: "Nothing".to_owned()
        }
    );
}

#[derive(Debug)]
struct Crashing;

impl Transformation for Crashing {
    fn title(&self) -> &str {
        "Crash"
    }

    fn operations(&self, _workspace: &Workspace) -> Result<Vec<EditOperation>, ProviderFault> {
        Err(ProviderFault::new("symbol table unavailable"))
    }
}

#[rstest]
fn realisation_faults_are_reported(mut workspace: Workspace) {
    let transformation = ProposedTransformation::new("test", Arc::new(Crashing));
    let error = apply_transformation(&mut workspace, &transformation).expect_err("fault");
    assert_eq!(
        error,
        ApplyError::RealizationFaulted {
            title: "Crash".to_owned(),
            message: "symbol table unavailable".to_owned(),
        }
    );
}
