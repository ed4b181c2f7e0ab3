use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use ide_workspace::app::Workbench;
use ide_workspace::kernel::services::adapters::{
    ensure_settings_file, resolve_settings, HttpActionClient, LocalFileProvider,
};
use ide_workspace::kernel::services::ports::{ActionClient, ActionKind, RenderSink};
use ide_workspace::kernel::{Action, ActionOutcome, AppState, LintOutput};
use ide_workspace::models::RowKind;

mod logging;

const IDLE_TIMEOUT: Duration = Duration::from_secs(60);
const HEALTH_TIMEOUT: Duration = Duration::from_secs(10);

const USAGE: &str = "usage: ide-workspace [PATH] [--locate NAME] [--action format|lint|preview]... \
[--no-auto-detect] [--write] [--verbose]";

#[derive(Debug, Default, PartialEq, Eq)]
struct CliArgs {
    path: Option<String>,
    locate: Option<String>,
    actions: Vec<ActionKind>,
    no_auto_detect: bool,
    write: bool,
    verbose: bool,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<CliArgs, String> {
    let mut out = CliArgs::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--locate" => {
                let name = args.next().ok_or("--locate needs a file name")?;
                out.locate = Some(name);
            }
            "--action" => {
                let value = args.next().ok_or("--action needs a kind")?;
                let kind = ActionKind::parse(&value)
                    .ok_or_else(|| format!("unknown action: {value}"))?;
                out.actions.push(kind);
            }
            "--no-auto-detect" => out.no_auto_detect = true,
            "--write" => out.write = true,
            "--verbose" | "-v" => out.verbose = true,
            flag if flag.starts_with('-') => return Err(format!("unknown flag: {flag}")),
            _ if out.path.is_some() => return Err(format!("unexpected argument: {arg}")),
            _ => out.path = Some(arg),
        }
    }
    Ok(out)
}

#[derive(Debug)]
struct StartupPaths {
    root: PathBuf,
    open_file: Option<PathBuf>,
}

/// A directory argument becomes the root; a file argument is opened and its
/// parent becomes the root.
fn resolve_startup_paths(cwd: &Path, arg: Option<&str>) -> io::Result<StartupPaths> {
    let Some(arg) = arg.filter(|a| !a.trim().is_empty()) else {
        return Ok(StartupPaths {
            root: cwd.to_path_buf(),
            open_file: None,
        });
    };

    let raw = Path::new(arg);
    let path = if raw.is_absolute() {
        raw.to_path_buf()
    } else {
        cwd.join(raw)
    };
    let meta = std::fs::metadata(&path)?;

    if meta.is_dir() {
        return Ok(StartupPaths {
            root: path,
            open_file: None,
        });
    }

    let root = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| cwd.to_path_buf());
    Ok(StartupPaths {
        root,
        open_file: Some(path),
    })
}

struct StdoutSink;

impl RenderSink for StdoutSink {
    fn load_content(&mut self, markup: &str) {
        println!("--- preview ---");
        println!("{markup}");
    }
}

fn print_tree(state: &AppState) {
    for row in &state.explorer.rows {
        let indent = "  ".repeat(row.depth.saturating_sub(1) as usize);
        let marker = match row.kind {
            RowKind::Dir { expanded: true } => "v ",
            RowKind::Dir { expanded: false } => "> ",
            RowKind::Error => "! ",
            RowKind::File | RowKind::Placeholder => "  ",
        };
        println!("{indent}{marker}{}", row.name.to_string_lossy());
    }
}

fn wait(workbench: &mut Workbench) {
    if !workbench.run_until_idle(IDLE_TIMEOUT) {
        eprintln!("timed out with {} pending operations", workbench.pending());
    }
}

fn run(cli: CliArgs) -> Result<bool, String> {
    if let Err(e) = ensure_settings_file() {
        tracing::warn!(error = %e, "cannot create settings file");
    }
    let settings = resolve_settings();

    let cwd = std::env::current_dir().map_err(|e| e.to_string())?;
    let startup = resolve_startup_paths(&cwd, cli.path.as_deref())
        .map_err(|e| format!("{}: {e}", cli.path.as_deref().unwrap_or(".")))?;

    let client = Arc::new(
        HttpActionClient::new(
            settings.backend.base_url.clone(),
            settings.backend.health_path.clone(),
        )
        .map_err(|e| e.to_string())?,
    );
    let files = Arc::new(LocalFileProvider::new());
    let mut workbench = Workbench::new(
        files,
        client.clone() as Arc<dyn ActionClient>,
        Box::new(StdoutSink),
        &settings,
    )
    .map_err(|e| e.to_string())?;

    if !cli.actions.is_empty() {
        match workbench.block_on(tokio::time::timeout(HEALTH_TIMEOUT, client.health())) {
            Ok(Ok(body)) => {
                tracing::info!(base_url = client.base_url(), body = %body, "backend healthy")
            }
            Ok(Err(e)) => {
                tracing::warn!(base_url = client.base_url(), error = %e, "health check failed")
            }
            Err(_) => tracing::warn!(
                base_url = client.base_url(),
                timeout_secs = HEALTH_TIMEOUT.as_secs(),
                "health check timed out"
            ),
        }
    }

    match startup.open_file {
        Some(file) => {
            workbench.dispatch(Action::OpenPath(file));
            wait(&mut workbench);
            if workbench.state().workspace.file().is_none() {
                eprintln!("{}", workbench.state().ui.status);
                workbench.dispatch(Action::OpenFolder(startup.root));
                wait(&mut workbench);
            }
        }
        None => {
            workbench.dispatch(Action::OpenFolder(startup.root));
            wait(&mut workbench);
        }
    }

    if let Some(name) = cli.locate {
        workbench.dispatch(Action::LocateFile { name });
        wait(&mut workbench);
    }

    if cli.no_auto_detect {
        workbench.dispatch(Action::SetAutoDetectResources(false));
    }

    print_tree(workbench.state());

    let mut ok = true;
    for kind in cli.actions {
        workbench.dispatch(Action::RunRemote(kind));
        wait(&mut workbench);
        let state = workbench.state();
        println!("{}", state.ui.status);
        if let Some(settled) = state.ui.last_settled.as_ref() {
            ok &= !matches!(settled.outcome, ActionOutcome::Failed(_));
        }
        if kind == ActionKind::Lint && state.ui.lint != LintOutput::Empty {
            let lint = state.ui.lint.render();
            println!("{}", lint.trim_end());
        }
    }

    if cli.write && workbench.state().workspace.is_dirty() {
        workbench.dispatch(Action::Save);
    }

    println!("{}", workbench.state().ui.status);
    Ok(ok)
}

fn main() -> ExitCode {
    let cli = match parse_args(std::env::args().skip(1)) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("{e}");
            eprintln!("{USAGE}");
            return ExitCode::from(2);
        }
    };

    let logging = logging::init(cli.verbose);
    if cli.verbose {
        if let Some(guard) = logging.as_ref() {
            eprintln!("logs: {}", guard.log_dir().join(logging::LOG_FILE).display());
        }
    }

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!(error = %e, "startup failed");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/cli_startup_paths.rs"]
mod cli_startup_paths;
