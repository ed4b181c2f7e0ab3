use super::*;
use crate::kernel::content_kind::ContentKind;
use crate::kernel::orchestrator::{ActionOutcome, ActionTicket};
use crate::kernel::services::ports::{
    ActionKind, ActionResult, FileProvider, LintIssue, PreviewResult, RemoteError, RenderedKind,
};
use crate::kernel::state::{LintOutput, NO_ISSUES_MESSAGE};
use crate::models::{list_dir, RowKind};
use crate::testing::MemoryFileProvider;
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn project() -> Arc<MemoryFileProvider> {
    Arc::new(
        MemoryFileProvider::new()
            .with_file("/proj/a.txt", "alpha")
            .with_file("/proj/Z.txt", "zulu")
            .with_file("/proj/sub/page.html", "<p>hi</p>")
            .with_file("/proj/.git/config", "[core]"),
    )
}

fn new_store(provider: &Arc<MemoryFileProvider>) -> Store {
    Store::new(AppState::new(provider.clone(), true))
}

/// Runs `LoadDir` effects inline, the way the runtime would, and returns the
/// effects that were not directory loads.
fn settle_dir_loads(
    store: &mut Store,
    provider: &MemoryFileProvider,
    effects: Vec<Effect>,
) -> Vec<Effect> {
    let mut rest = Vec::new();
    for effect in effects {
        match effect {
            Effect::LoadDir(path) => {
                let action = match list_dir(provider, &path) {
                    Ok(entries) => Action::DirLoaded { path, entries },
                    Err(e) => Action::DirLoadError {
                        path,
                        error: e.to_string(),
                    },
                };
                let result = store.dispatch(action);
                rest.extend(settle_dir_loads(store, provider, result.effects));
            }
            other => rest.push(other),
        }
    }
    rest
}

fn opened_store(provider: &Arc<MemoryFileProvider>) -> Store {
    let mut store = new_store(provider);
    let result = store.dispatch(Action::OpenFolder(PathBuf::from("/proj")));
    assert!(settle_dir_loads(&mut store, provider, result.effects).is_empty());
    store
}

fn row_names(store: &Store) -> Vec<String> {
    store
        .state()
        .explorer
        .rows
        .iter()
        .map(|r| r.name.to_string_lossy().to_string())
        .collect()
}

fn dispatch_ticket(store: &mut Store, kind: ActionKind) -> ActionTicket {
    let result = store.dispatch(Action::RunRemote(kind));
    match result.effects.as_slice() {
        [Effect::DispatchRemote { ticket, .. }] => *ticket,
        other => panic!("expected one dispatch, got {other:?}"),
    }
}

#[test]
fn open_folder_lists_root_dirs_first_without_hidden_entries() {
    let provider = project();
    let store = opened_store(&provider);

    assert_eq!(row_names(&store), vec!["sub", "a.txt", "Z.txt"]);
    assert_eq!(store.state().ui.status, "Opened folder: proj");
    assert_eq!(store.state().workspace.root(), Some(Path::new("/proj")));
}

#[test]
fn expanding_twice_lists_once() {
    let provider = project();
    let mut store = opened_store(&provider);
    let listings = provider.listings();

    store.dispatch(Action::ExplorerSelectRow { row: 0 });
    let first = store.dispatch(Action::ExplorerActivate);
    assert_eq!(first.effects.len(), 1);
    store.dispatch(Action::ExplorerCollapse);
    let second = store.dispatch(Action::ExplorerActivate);
    assert!(second.effects.is_empty());

    settle_dir_loads(&mut store, &provider, first.effects);
    assert_eq!(provider.listings(), listings + 1);
    assert_eq!(row_names(&store), vec!["sub", "page.html", "a.txt", "Z.txt"]);
}

#[test]
fn activating_a_file_row_opens_it() {
    let provider = project();
    let mut store = opened_store(&provider);

    store.dispatch(Action::ExplorerSelectRow { row: 2 });
    store.dispatch(Action::ExplorerActivate);

    let ws = &store.state().workspace;
    assert_eq!(ws.content(), "zulu");
    assert_eq!(ws.content_kind(), ContentKind::Plain);
    assert_eq!(store.state().ui.status, "Loaded: Z.txt");
}

#[test]
fn root_listing_failure_shows_error_row_and_status() {
    let provider = project();
    provider.break_path("/proj");
    let store = opened_store(&provider);

    let rows = &store.state().explorer.rows;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].kind, RowKind::Error);
    assert!(store
        .state()
        .ui
        .status
        .starts_with("Error reading directory:"));
}

#[test]
fn locate_emits_effect_and_opens_match() {
    let provider = project();
    let mut store = opened_store(&provider);

    let result = store.dispatch(Action::LocateFile {
        name: "page.html".into(),
    });
    let [Effect::LocateFile { root, name }] = result.effects.as_slice() else {
        panic!("expected locate effect");
    };
    assert_eq!(root, Path::new("/proj"));

    let found = provider.find_file(root, name).unwrap();
    store.dispatch(Action::FileLocated {
        name: name.clone(),
        result: Ok(found),
    });

    assert_eq!(store.state().workspace.content(), "<p>hi</p>");
    assert_eq!(store.state().workspace.content_kind(), ContentKind::Markup);
}

#[test]
fn locate_miss_sets_status() {
    let provider = project();
    let mut store = opened_store(&provider);

    store.dispatch(Action::FileLocated {
        name: "nope.md".into(),
        result: Ok(None),
    });

    assert_eq!(store.state().ui.status, "File not found: nope.md");
    assert!(store.state().workspace.file().is_none());
}

#[test]
fn open_path_moves_root_to_parent() {
    let provider = project();
    let mut store = new_store(&provider);

    let result = store.dispatch(Action::OpenPath(PathBuf::from("/proj/sub/page.html")));
    settle_dir_loads(&mut store, &provider, result.effects);

    assert_eq!(store.state().workspace.root(), Some(Path::new("/proj/sub")));
    assert_eq!(row_names(&store), vec!["page.html"]);
    assert_eq!(store.state().ui.status, "Loaded: page.html");
}

#[test]
fn open_path_failure_keeps_root() {
    let provider = project();
    let mut store = opened_store(&provider);

    let result = store.dispatch(Action::OpenPath(PathBuf::from("/other/missing.md")));

    assert!(result.effects.is_empty());
    assert_eq!(store.state().workspace.root(), Some(Path::new("/proj")));
    assert!(store.state().ui.status.starts_with("Error loading file:"));
}

#[test]
fn save_as_rebuilds_tree_over_new_root() {
    let provider = project();
    let mut store = opened_store(&provider);
    store.dispatch(Action::SetContent("fresh".into()));

    let result = store.dispatch(Action::SaveAs(PathBuf::from("/proj/sub/new.md")));
    settle_dir_loads(&mut store, &provider, result.effects);

    assert_eq!(provider.file("/proj/sub/new.md").as_deref(), Some("fresh"));
    assert_eq!(store.state().workspace.root(), Some(Path::new("/proj/sub")));
    assert_eq!(row_names(&store), vec!["new.md", "page.html"]);
    assert_eq!(store.state().ui.status, "Saved: new.md");
}

#[test]
fn save_without_file_reports_error() {
    let provider = project();
    let mut store = new_store(&provider);
    store.dispatch(Action::SetContent("draft".into()));

    store.dispatch(Action::Save);

    assert!(store.state().ui.status.starts_with("Error saving file:"));
    assert!(store.state().workspace.is_dirty());
    assert_eq!(provider.writes(), 0);
}

#[test]
fn empty_content_is_skipped_without_dispatch() {
    let provider = project();
    let mut store = new_store(&provider);
    store.dispatch(Action::SetContent("   \n".into()));

    for kind in ActionKind::ALL {
        let result = store.dispatch(Action::RunRemote(kind));
        assert!(result.effects.is_empty());
        assert_eq!(store.state().ui.status, kind.skipped_message());
        assert_eq!(
            store.state().ui.last_settled.as_ref().map(|s| &s.outcome),
            Some(&ActionOutcome::Skipped)
        );
    }
    assert_eq!(store.state().actions.in_flight(), 0);
    assert_eq!(
        store.state().ui.lint,
        LintOutput::Message("No content to lint".into())
    );
}

#[test]
fn format_result_overwrites_content_and_marks_dirty() {
    let provider = project();
    let mut store = opened_store(&provider);
    store.dispatch(Action::OpenPath(PathBuf::from("/proj/a.txt")));
    let ticket = dispatch_ticket(&mut store, ActionKind::Format);
    assert_eq!(store.state().ui.status, "Formatting code...");

    store.dispatch(Action::RemoteSettled {
        ticket,
        kind: ActionKind::Format,
        result: Ok(ActionResult::Formatted {
            content: "ALPHA\n".into(),
        }),
    });

    assert_eq!(store.state().workspace.content(), "ALPHA\n");
    assert!(store.state().workspace.is_dirty());
    assert_eq!(store.state().ui.status, "Code formatted successfully");
    assert_eq!(provider.writes(), 0);
}

#[test]
fn lint_with_no_issues_shows_no_issues_message() {
    let provider = project();
    let mut store = opened_store(&provider);
    store.dispatch(Action::SetContent("let a = 1;".into()));
    let ticket = dispatch_ticket(&mut store, ActionKind::Lint);

    store.dispatch(Action::RemoteSettled {
        ticket,
        kind: ActionKind::Lint,
        result: Ok(ActionResult::Linted { issues: Vec::new() }),
    });

    assert_eq!(store.state().ui.lint.render(), NO_ISSUES_MESSAGE);
    assert_eq!(store.state().ui.status, "Linting completed");
}

#[test]
fn lint_issues_replace_previous_output() {
    let provider = project();
    let mut store = opened_store(&provider);
    store.dispatch(Action::SetContent("var x".into()));
    let ticket = dispatch_ticket(&mut store, ActionKind::Lint);

    store.dispatch(Action::RemoteSettled {
        ticket,
        kind: ActionKind::Lint,
        result: Ok(ActionResult::Linted {
            issues: vec![LintIssue {
                line: 1,
                message: "Use let or const".into(),
            }],
        }),
    });

    assert_eq!(store.state().ui.lint.render(), "Line 1: Use let or const\n");
}

#[test]
fn transport_failure_leaves_content_untouched() {
    let provider = project();
    let mut store = opened_store(&provider);
    store.dispatch(Action::OpenPath(PathBuf::from("/proj/a.txt")));
    let ticket = dispatch_ticket(&mut store, ActionKind::Format);

    store.dispatch(Action::RemoteSettled {
        ticket,
        kind: ActionKind::Format,
        result: Err(RemoteError::Transport("HTTP 502: bad gateway".into())),
    });

    assert_eq!(store.state().workspace.content(), "alpha");
    assert!(!store.state().workspace.is_dirty());
    assert_eq!(store.state().ui.status, "Format error: HTTP 502: bad gateway");
    assert!(matches!(
        store.state().ui.last_settled.as_ref().map(|s| &s.outcome),
        Some(ActionOutcome::Failed(_))
    ));
}

#[test]
fn lint_failure_is_written_to_lint_output() {
    let provider = project();
    let mut store = opened_store(&provider);
    store.dispatch(Action::SetContent("x".into()));
    let ticket = dispatch_ticket(&mut store, ActionKind::Lint);

    store.dispatch(Action::RemoteSettled {
        ticket,
        kind: ActionKind::Lint,
        result: Err(RemoteError::Decode("expected value at line 1".into())),
    });

    assert_eq!(
        store.state().ui.lint.render(),
        "Lint error: expected value at line 1"
    );
}

#[test]
fn concurrent_previews_apply_in_completion_order() {
    let provider = project();
    let mut store = opened_store(&provider);
    store.dispatch(Action::SetContent("# Title".into()));
    let first = dispatch_ticket(&mut store, ActionKind::Preview);
    let second = dispatch_ticket(&mut store, ActionKind::Preview);
    assert_eq!(store.state().actions.in_flight(), 2);

    let preview = |body: &str| {
        Ok(ActionResult::Previewed(PreviewResult {
            rendered_kind: RenderedKind::Html,
            body: body.to_string(),
            detected_resources: None,
        }))
    };
    store.dispatch(Action::RemoteSettled {
        ticket: second,
        kind: ActionKind::Preview,
        result: preview("<h1>second</h1>"),
    });
    store.dispatch(Action::RemoteSettled {
        ticket: first,
        kind: ActionKind::Preview,
        result: preview("<h1>first</h1>"),
    });

    let ui = &store.state().ui;
    assert_eq!(ui.preview_version, 2);
    assert_eq!(ui.preview.as_ref().unwrap().markup(), "<h1>first</h1>");
    assert_eq!(store.state().actions.in_flight(), 0);
}

#[test]
fn duplicate_settle_is_ignored() {
    let provider = project();
    let mut store = opened_store(&provider);
    store.dispatch(Action::SetContent("# Title".into()));
    let ticket = dispatch_ticket(&mut store, ActionKind::Preview);
    let settle = || Action::RemoteSettled {
        ticket,
        kind: ActionKind::Preview,
        result: Ok(ActionResult::Previewed(PreviewResult {
            rendered_kind: RenderedKind::Text,
            body: "<b>hi</b>".into(),
            detected_resources: Some(vec!["a.css".into()]),
        })),
    };

    assert!(store.dispatch(settle()).state_changed);
    assert!(!store.dispatch(settle()).state_changed);
    assert_eq!(store.state().ui.preview_version, 1);
    assert_eq!(
        store.state().ui.status,
        "Preview updated with 1 detected resources"
    );
    assert!(store
        .state()
        .ui
        .preview
        .as_ref()
        .unwrap()
        .markup()
        .contains("&lt;b&gt;hi&lt;/b&gt;"));
}

#[test]
fn auto_detect_toggle_controls_preview_context() {
    let provider = project();
    let mut store = opened_store(&provider);
    store.dispatch(Action::SetContent("<p>x</p>".into()));
    store.dispatch(Action::SetAutoDetectResources(false));

    let result = store.dispatch(Action::RunRemote(ActionKind::Preview));
    let [Effect::DispatchRemote { request, .. }] = result.effects.as_slice() else {
        panic!("expected dispatch");
    };
    assert_eq!(request.context, None);
    assert_eq!(request.auto_detect_resources, Some(false));
}
