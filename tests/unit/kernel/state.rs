use super::*;
use crate::models::{RowKind, PLACEHOLDER_LABEL};
use std::ffi::OsString;

fn entry(name: &str, is_dir: bool) -> DirEntryInfo {
    DirEntryInfo {
        name: name.to_string(),
        is_dir,
    }
}

fn loaded_explorer() -> ExplorerState {
    let mut explorer = ExplorerState::default();
    let effects = explorer.open(FileTree::new(PathBuf::from("/proj")));
    assert!(matches!(effects.as_slice(), [Effect::LoadDir(p)] if p == &PathBuf::from("/proj")));
    assert!(explorer.apply_dir_loaded(
        PathBuf::from("/proj"),
        vec![entry("sub", true), entry("a.txt", false), entry("Z.txt", false)],
    ));
    explorer
}

fn row_names(explorer: &ExplorerState) -> Vec<String> {
    explorer
        .rows
        .iter()
        .map(|r| r.name.to_string_lossy().to_string())
        .collect()
}

#[test]
fn open_shows_placeholder_until_root_listing_arrives() {
    let mut explorer = ExplorerState::default();
    explorer.open(FileTree::new(PathBuf::from("/proj")));

    assert_eq!(explorer.rows.len(), 1);
    assert_eq!(explorer.rows[0].kind, RowKind::Placeholder);
    assert_eq!(explorer.rows[0].name, OsString::from(PLACEHOLDER_LABEL));
    assert!(!explorer.move_selection(1));
}

#[test]
fn explorer_move_selection_selects_first_row_when_root_selected() {
    let mut explorer = loaded_explorer();
    assert_eq!(row_names(&explorer), vec!["sub", "a.txt", "Z.txt"]);

    assert!(explorer.move_selection(1));
    assert_eq!(explorer.selected_row(), Some(0));
    assert!(explorer.move_selection(5));
    assert_eq!(explorer.selected_row(), Some(2));
    assert!(!explorer.move_selection(1));
}

#[test]
fn expanding_a_directory_emits_one_load_and_skips_placeholder() {
    let mut explorer = loaded_explorer();
    assert!(explorer.select_row(0));

    let Activation::Dir { changed, effects } = explorer.activate_selected() else {
        panic!("expected directory activation");
    };
    assert!(changed);
    assert!(matches!(effects.as_slice(), [Effect::LoadDir(p)] if p == &PathBuf::from("/proj/sub")));
    assert_eq!(explorer.rows[1].kind, RowKind::Placeholder);

    assert!(!explorer.select_row(1));
    assert!(explorer.move_selection(1));
    assert_eq!(explorer.selected_row(), Some(2));
}

#[test]
fn collapse_and_reexpand_while_loading_does_not_list_twice() {
    let mut explorer = loaded_explorer();
    explorer.select_row(0);
    explorer.activate_selected();
    assert!(explorer.collapse_selected());

    let Activation::Dir { effects, .. } = explorer.activate_selected() else {
        panic!("expected directory activation");
    };
    assert!(effects.is_empty());

    assert!(explorer.apply_dir_loaded(PathBuf::from("/proj/sub"), vec![entry("x.md", false)]));
    assert!(!explorer.apply_dir_loaded(PathBuf::from("/proj/sub"), vec![entry("y.md", false)]));
    assert_eq!(row_names(&explorer), vec!["sub", "x.md", "a.txt", "Z.txt"]);
    assert_eq!(explorer.rows[1].depth, 2);
}

#[test]
fn activating_a_file_returns_its_full_path() {
    let mut explorer = loaded_explorer();
    explorer.select_row(2);

    match explorer.activate_selected() {
        Activation::File(path) => assert_eq!(path, PathBuf::from("/proj/Z.txt")),
        other => panic!("unexpected activation: {other:?}"),
    }
}

#[test]
fn listing_error_becomes_an_error_row() {
    let mut explorer = loaded_explorer();
    explorer.select_row(0);
    explorer.activate_selected();

    assert!(explorer.apply_dir_load_error(PathBuf::from("/proj/sub"), "permission denied"));

    assert_eq!(explorer.rows[1].kind, RowKind::Error);
    assert_eq!(
        explorer.rows[1].name,
        OsString::from("Error loading: permission denied")
    );
    explorer.select_row(1);
    assert!(matches!(explorer.activate_selected(), Activation::Nothing));
}

#[test]
fn results_for_unknown_paths_are_ignored() {
    let mut explorer = loaded_explorer();
    assert!(!explorer.apply_dir_loaded(PathBuf::from("/elsewhere"), Vec::new()));
    assert!(!explorer.apply_dir_load_error(PathBuf::from("/proj/nope"), "x"));
}

#[test]
fn lint_output_renders_issue_lines() {
    assert_eq!(LintOutput::from_issues(Vec::new()).render(), NO_ISSUES_MESSAGE);
    let issues = vec![
        LintIssue {
            line: 3,
            message: "missing semicolon".into(),
        },
        LintIssue {
            line: 9,
            message: "unused variable".into(),
        },
    ];
    assert_eq!(
        LintOutput::from_issues(issues).render(),
        "Line 3: missing semicolon\nLine 9: unused variable\n"
    );
    assert_eq!(LintOutput::Empty.render(), "");
}
