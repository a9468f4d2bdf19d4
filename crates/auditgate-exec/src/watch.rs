// crates/auditgate-exec/src/watch.rs
// ============================================================================
// Module: Watch Loop
// Description: Debounced filesystem-notification watcher, with a polling
//              fallback, re-running the Executor on change.
// Purpose: Drive `run --watch` without incremental execution: every change
//          triggers one full re-run.
// Dependencies: notify, auditgate-core, auditgate-registry, auditgate-render
// ============================================================================

//! ## Overview
//! Two watch strategies are available. [`NotifyWatcher`] subscribes to the
//! spec file, each step's declared inputs, and `project_root` itself,
//! debouncing events with a 0.5s window before reporting a change. This is
//! the compiled-in-block analogue of watching a dynamic plugin directory:
//! since blocks here are compiled Rust, not loaded files, there is no
//! separate blocks directory to subscribe to. [`PollWatcher`] snapshots
//! `(path -> modification time)` at a fixed interval and is the explicit,
//! user-selectable fallback for filesystems where notification events are
//! unreliable. [`run_watch_loop`] picks one strategy and re-runs the
//! [`crate::executor::Executor`] on every reported change, collapsing any
//! event that arrives mid-run into the next iteration.

use std::collections::BTreeMap;
use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;
use std::sync::mpsc::channel;
use std::sync::mpsc::Receiver;
use std::sync::mpsc::TryRecvError;
use std::time::Duration;
use std::time::Instant;
use std::time::SystemTime;

use auditgate_core::model::Step;
use auditgate_core::Spec;
use auditgate_registry::BlockRegistry;
use notify::Event;
use notify::EventKind;
use notify::RecommendedWatcher;
use notify::RecursiveMode;
use notify::Watcher;

use crate::error::ExecutorError;
use crate::executor::ExecOutcome;
use crate::executor::Executor;
use crate::schema::SchemaMode;

/// Debounce window applied to filesystem-notification events.
pub const DEBOUNCE: Duration = Duration::from_millis(500);

/// Returns the set of paths to observe for `spec`: the spec file itself,
/// every step's declared inputs, and `project_root` (covering inputs
/// resolved relative to it and any new files added under it).
#[must_use]
pub fn gather_watch_paths(spec: &Spec, spec_path: &Path, project_root: &Path) -> Vec<PathBuf> {
    let mut paths = vec![spec_path.to_owned(), project_root.to_owned()];
    for step in &spec.pipeline {
        for input in &step.inputs {
            if Step::has_glob_input(input) {
                continue;
            }
            paths.push(project_root.join(input));
        }
    }
    paths
}

// ============================================================================
// SECTION: Notify-based Watcher
// ============================================================================

/// Debounced filesystem-notification watcher.
pub struct NotifyWatcher {
    _watcher: RecommendedWatcher,
    rx: Receiver<Result<Event, notify::Error>>,
    last_event: Option<Instant>,
    pending: HashSet<PathBuf>,
}

impl NotifyWatcher {
    /// Subscribes to every path in `watch_paths` (directories recursively).
    ///
    /// # Errors
    /// Returns [`ExecutorError::Watch`] if the underlying watcher cannot be
    /// created or a path cannot be subscribed.
    pub fn new(watch_paths: &[PathBuf]) -> Result<Self, ExecutorError> {
        let (tx, rx) = channel();
        let mut watcher = RecommendedWatcher::new(move |res| {
            let _ = tx.send(res);
        }, notify::Config::default())
            .map_err(|source| ExecutorError::Watch { path: PathBuf::new(), source })?;

        for path in watch_paths {
            if path.exists() {
                watcher
                    .watch(path, RecursiveMode::Recursive)
                    .map_err(|source| ExecutorError::Watch { path: path.clone(), source })?;
            }
        }

        Ok(Self { _watcher: watcher, rx, last_event: None, pending: HashSet::new() })
    }

    /// Drains pending events and returns `Some(paths)` once the debounce
    /// window has elapsed since the last relevant event.
    pub fn check_for_changes(&mut self) -> Option<Vec<PathBuf>> {
        let mut saw_event = false;
        loop {
            match self.rx.try_recv() {
                Ok(Ok(event)) => {
                    if is_relevant(&event) {
                        self.pending.extend(event.paths);
                        saw_event = true;
                    }
                }
                Ok(Err(_)) | Err(TryRecvError::Disconnected) => break,
                Err(TryRecvError::Empty) => break,
            }
        }

        if saw_event {
            self.last_event = Some(Instant::now());
        }

        if let Some(last) = self.last_event {
            if !self.pending.is_empty() && last.elapsed() >= DEBOUNCE {
                self.last_event = None;
                return Some(self.pending.drain().collect());
            }
        }
        None
    }
}

fn is_relevant(event: &Event) -> bool {
    matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_))
}

// ============================================================================
// SECTION: Polling Watcher
// ============================================================================

/// Interval-based `(path -> modification time)` snapshot watcher.
pub struct PollWatcher {
    paths: Vec<PathBuf>,
    interval: Duration,
    snapshot: BTreeMap<PathBuf, SystemTime>,
}

impl PollWatcher {
    /// Builds a poll watcher over `paths`, taking an initial snapshot.
    #[must_use]
    pub fn new(paths: Vec<PathBuf>, interval: Duration) -> Self {
        let snapshot = Self::snapshot_of(&paths);
        Self { paths, interval, snapshot }
    }

    fn snapshot_of(paths: &[PathBuf]) -> BTreeMap<PathBuf, SystemTime> {
        let mut snapshot = BTreeMap::new();
        for path in paths {
            if let Ok(metadata) = std::fs::metadata(path) {
                if let Ok(modified) = metadata.modified() {
                    snapshot.insert(path.clone(), modified);
                }
            }
        }
        snapshot
    }

    /// Sleeps for `interval`, then returns true iff the snapshot changed.
    pub fn poll_for_changes(&mut self) -> bool {
        std::thread::sleep(self.interval);
        let next = Self::snapshot_of(&self.paths);
        let changed = next != self.snapshot;
        self.snapshot = next;
        changed
    }
}

// ============================================================================
// SECTION: Watch Loop
// ============================================================================

/// Runs `spec` once per detected change, forever, using the notification
/// watcher unless `interval` selects the polling fallback. Each iteration's
/// outcome (or execution error) is handed to `on_run`; a step-level block
/// failure is already absorbed inside [`Executor::execute`] and does not
/// stop the loop.
///
/// # Errors
/// Returns [`ExecutorError::Watch`] if the watcher itself cannot be
/// established.
pub fn run_watch_loop(
    spec: &Spec,
    spec_path: &Path,
    project_root: &Path,
    registry: &BlockRegistry,
    schema_mode: SchemaMode,
    from_run: Option<&Path>,
    interval: Option<Duration>,
    mut on_run: impl FnMut(Result<ExecOutcome, ExecutorError>),
) -> Result<(), ExecutorError> {
    on_run(Executor::execute(spec, project_root, registry, schema_mode, from_run));

    let watch_paths = gather_watch_paths(spec, spec_path, project_root);

    if let Some(interval) = interval {
        let mut poller = PollWatcher::new(watch_paths, interval);
        loop {
            if poller.poll_for_changes() {
                on_run(Executor::execute(spec, project_root, registry, schema_mode, from_run));
            }
        }
    } else {
        let mut watcher = NotifyWatcher::new(&watch_paths)?;
        loop {
            if watcher.check_for_changes().is_some() {
                on_run(Executor::execute(spec, project_root, registry, schema_mode, from_run));
            }
            std::thread::sleep(Duration::from_millis(50));
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]
mod tests {
    use super::*;
    use auditgate_core::model::OutputConfig;

    #[test]
    fn gather_watch_paths_includes_spec_and_non_glob_inputs() {
        let spec = Spec {
            suite: "demo".to_owned(),
            description: None,
            pipeline: vec![Step {
                name: None,
                block: "site.a11y".to_owned(),
                description: None,
                inputs: vec!["fixtures/page.html".to_owned(), "fixtures/*.json".to_owned()],
                outputs: Vec::new(),
            }],
            gates: Vec::new(),
            output: OutputConfig::default(),
        };
        let spec_path = Path::new("/tmp/demo.yaml");
        let project_root = Path::new("/tmp/project");
        let paths = gather_watch_paths(&spec, spec_path, project_root);
        assert!(paths.contains(&spec_path.to_owned()));
        assert!(paths.contains(&project_root.join("fixtures/page.html")));
        assert!(!paths.iter().any(|path| path.to_string_lossy().contains('*')));
    }

    #[test]
    fn poll_watcher_detects_modification() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("spec.yaml");
        std::fs::write(&file, "suite: demo\n").expect("write");
        let mut poller = PollWatcher::new(vec![file.clone()], Duration::from_millis(20));
        std::thread::sleep(Duration::from_millis(30));
        std::fs::write(&file, "suite: demo2\n").expect("rewrite");
        assert!(poller.poll_for_changes());
    }

    #[test]
    fn notify_watcher_reports_debounced_change() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("spec.yaml");
        std::fs::write(&file, "suite: demo\n").expect("write");
        let mut watcher = NotifyWatcher::new(std::slice::from_ref(&file)).expect("watcher starts");

        std::fs::write(&file, "suite: demo2\n").expect("rewrite");

        let mut detected = None;
        for _ in 0..40 {
            std::thread::sleep(Duration::from_millis(50));
            if let Some(changes) = watcher.check_for_changes() {
                detected = Some(changes);
                break;
            }
        }
        assert!(detected.is_some(), "expected a debounced change to be reported");
    }
}
