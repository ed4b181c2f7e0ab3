use super::*;
use tempfile::tempdir;

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn resolve_startup_paths_defaults_to_cwd() {
    let dir = tempdir().unwrap();
    let cwd = dir.path();

    let startup = resolve_startup_paths(cwd, None).unwrap();
    assert_eq!(startup.root, cwd);
    assert!(startup.open_file.is_none());
}

#[test]
fn resolve_startup_paths_accepts_directory_arg() {
    let dir = tempdir().unwrap();
    let cwd = dir.path();

    let workspace = cwd.join("workspace");
    std::fs::create_dir_all(&workspace).unwrap();

    let startup = resolve_startup_paths(cwd, Some("workspace")).unwrap();
    assert_eq!(startup.root, workspace);
    assert!(startup.open_file.is_none());
}

#[test]
fn resolve_startup_paths_file_arg_roots_at_parent() {
    let dir = tempdir().unwrap();
    let cwd = dir.path();

    let workspace = cwd.join("workspace");
    std::fs::create_dir_all(&workspace).unwrap();

    let file = workspace.join("a.txt");
    std::fs::write(&file, "hello\n").unwrap();

    let startup = resolve_startup_paths(cwd, Some("workspace/a.txt")).unwrap();
    assert_eq!(startup.root, workspace);
    assert_eq!(startup.open_file, Some(file));
}

#[test]
fn resolve_startup_paths_errors_for_missing_path() {
    let dir = tempdir().unwrap();
    let cwd = dir.path();

    let err = resolve_startup_paths(cwd, Some("nope")).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
}

#[test]
fn resolve_startup_paths_keeps_absolute_paths() {
    let dir = tempdir().unwrap();
    let cwd = dir.path();

    let workspace = cwd.join("workspace");
    std::fs::create_dir_all(&workspace).unwrap();

    let abs = workspace.canonicalize().unwrap();
    let raw = abs.to_string_lossy().to_string();

    let startup = resolve_startup_paths(cwd, Some(&raw)).unwrap();
    assert_eq!(startup.root, abs);
    assert!(startup.open_file.is_none());
}

#[test]
fn parse_args_collects_actions_and_flags() {
    let cli = parse_args(args(&[
        "proj",
        "--action",
        "lint",
        "--action",
        "Preview",
        "--no-auto-detect",
        "--locate",
        "index.html",
        "--write",
    ]))
    .unwrap();

    assert_eq!(cli.path.as_deref(), Some("proj"));
    assert_eq!(cli.actions, vec![ActionKind::Lint, ActionKind::Preview]);
    assert_eq!(cli.locate.as_deref(), Some("index.html"));
    assert!(cli.no_auto_detect);
    assert!(cli.write);
    assert!(!cli.verbose);
}

#[test]
fn parse_args_rejects_bad_input() {
    assert!(parse_args(args(&["--action", "compile"])).is_err());
    assert!(parse_args(args(&["--locate"])).is_err());
    assert!(parse_args(args(&["--frobnicate"])).is_err());
    assert!(parse_args(args(&["a", "b"])).is_err());
    assert_eq!(parse_args(args(&[])).unwrap(), CliArgs::default());
}
