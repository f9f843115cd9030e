//! Live gallery watching.
//!
//! `watch` keeps the gallery data file fresh while source folders are being
//! edited. Filesystem events are debounced on the leading edge: the first
//! change syncs immediately and the burst behind it (editors and Finder love
//! to touch several files per save) is absorbed until the window passes.
//!
//! ```text
//! notify events ──▶ relevant? ──▶ debounce ──▶ folio-sync --config <path> gallery
//!                   (files only)  (2s window)   (child process per run)
//! ```
//!
//! Each sync runs as a fresh child process invoked with an argument vector,
//! never through a shell, so paths with spaces or metacharacters pass through
//! untouched. A failed run is reported and watching continues.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use notify::event::{CreateKind, RemoveKind};
use notify::{Event, EventKind, RecursiveMode, Watcher};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WatchError {
    #[error("Watch folder not found: {0}")]
    MissingRoot(PathBuf),
    #[error("Watcher error: {0}")]
    Notify(#[from] notify::Error),
    #[error("Failed to launch sync: {0}")]
    Launch(#[source] io::Error),
    #[error("Sync run failed with {0}")]
    SyncFailed(ExitStatus),
}

/// Leading-edge debounce.
///
/// The first event fires immediately; later events fire only once strictly
/// more than `interval` has passed since the last fire. Absorbed events do
/// not extend the window.
#[derive(Debug)]
pub struct Debounce {
    interval: Duration,
    last: Option<Instant>,
}

impl Debounce {
    pub fn new(interval: Duration) -> Self {
        Debounce {
            interval,
            last: None,
        }
    }

    /// Whether an event at `now` should trigger a run. Consumes the window
    /// when it answers yes.
    pub fn try_fire_at(&mut self, now: Instant) -> bool {
        let fire = match self.last {
            None => true,
            Some(last) => now.saturating_duration_since(last) > self.interval,
        };
        if fire {
            self.last = Some(now);
        }
        fire
    }

    pub fn try_fire(&mut self) -> bool {
        self.try_fire_at(Instant::now())
    }
}

/// Runs one gallery sync when the watcher decides one is due.
pub trait SyncRunner {
    fn run_sync(&self) -> Result<(), WatchError>;
}

/// Re-invokes this binary as a child process for each sync run.
///
/// A fresh process per run keeps the watcher loop isolated from sync crashes
/// and picks up config edits between runs.
pub struct CommandRunner {
    program: PathBuf,
    args: Vec<OsString>,
}

impl CommandRunner {
    /// Runner invoking `<current exe> --config <path> gallery`.
    pub fn for_gallery(config_path: &Path) -> io::Result<Self> {
        let program = std::env::current_exe()?;
        let args = vec![
            OsString::from("--config"),
            config_path.as_os_str().to_os_string(),
            OsString::from("gallery"),
        ];
        Ok(CommandRunner { program, args })
    }
}

impl SyncRunner for CommandRunner {
    fn run_sync(&self) -> Result<(), WatchError> {
        let status = Command::new(&self.program)
            .args(&self.args)
            .status()
            .map_err(WatchError::Launch)?;
        if status.success() {
            Ok(())
        } else {
            Err(WatchError::SyncFailed(status))
        }
    }
}

/// Debounced bridge from filesystem events to sync runs.
pub struct GalleryWatcher<R: SyncRunner> {
    debounce: Debounce,
    runner: R,
}

impl<R: SyncRunner> GalleryWatcher<R> {
    pub fn new(interval: Duration, runner: R) -> Self {
        GalleryWatcher {
            debounce: Debounce::new(interval),
            runner,
        }
    }

    /// Feed one filesystem event. Returns whether a sync ran.
    pub fn handle_event(&mut self, event: &Event) -> Result<bool, WatchError> {
        self.handle_event_at(event, Instant::now())
    }

    fn handle_event_at(&mut self, event: &Event, now: Instant) -> Result<bool, WatchError> {
        if !relevant(event) || !self.debounce.try_fire_at(now) {
            return Ok(false);
        }
        // The window is already consumed at this point: a failed run still
        // counts as this window's attempt.
        println!("Change detected, running gallery sync");
        self.runner.run_sync()?;
        Ok(true)
    }
}

/// Should this filesystem event trigger a sync?
///
/// Directory create/remove events are ignored; the files landing inside a
/// new folder fire their own events. Access events never count.
fn relevant(event: &Event) -> bool {
    match event.kind {
        EventKind::Create(CreateKind::Folder) | EventKind::Remove(RemoveKind::Folder) => false,
        EventKind::Create(_) | EventKind::Remove(_) => true,
        EventKind::Modify(_) => !event.paths.iter().all(|p| p.is_dir()),
        _ => false,
    }
}

/// Watch `root` recursively and re-run the gallery sync on changes.
///
/// Blocks until the event channel disconnects, which in practice means until
/// the process is interrupted. Per-run sync failures are printed and watching
/// continues; only watcher setup problems are returned as errors.
pub fn run(root: &Path, interval: Duration, runner: impl SyncRunner) -> Result<(), WatchError> {
    if !root.is_dir() {
        return Err(WatchError::MissingRoot(root.to_path_buf()));
    }

    let (tx, rx) = mpsc::channel();
    let mut watcher = notify::recommended_watcher(tx)?;
    watcher.watch(root, RecursiveMode::Recursive)?;

    println!("Watching {} (Ctrl+C to stop)", root.display());

    let mut gallery = GalleryWatcher::new(interval, runner);
    for result in rx {
        match result {
            Ok(event) => {
                if let Err(err) = gallery.handle_event(&event) {
                    eprintln!("Sync failed: {err}");
                }
            }
            Err(err) => eprintln!("Watch error: {err}"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, ModifyKind};
    use std::sync::Mutex;
    use tempfile::TempDir;

    struct MockRunner {
        runs: Mutex<usize>,
        fail: bool,
    }

    impl MockRunner {
        fn new() -> Self {
            MockRunner {
                runs: Mutex::new(0),
                fail: false,
            }
        }

        fn failing() -> Self {
            MockRunner {
                runs: Mutex::new(0),
                fail: true,
            }
        }

        fn count(&self) -> usize {
            *self.runs.lock().unwrap()
        }
    }

    impl SyncRunner for &MockRunner {
        fn run_sync(&self) -> Result<(), WatchError> {
            *self.runs.lock().unwrap() += 1;
            if self.fail {
                return Err(WatchError::Launch(io::Error::other("boom")));
            }
            Ok(())
        }
    }

    fn file_created(path: &str) -> Event {
        Event::new(EventKind::Create(CreateKind::File)).add_path(PathBuf::from(path))
    }

    // =========================================================================
    // Debounce
    // =========================================================================

    #[test]
    fn first_event_fires_immediately() {
        let mut debounce = Debounce::new(Duration::from_secs(2));
        assert!(debounce.try_fire_at(Instant::now()));
    }

    #[test]
    fn events_within_the_window_are_absorbed() {
        let start = Instant::now();
        let mut debounce = Debounce::new(Duration::from_secs(2));

        assert!(debounce.try_fire_at(start));
        assert!(!debounce.try_fire_at(start + Duration::from_millis(500)));
        // Exactly at the boundary still does not fire; strictly greater does.
        assert!(!debounce.try_fire_at(start + Duration::from_secs(2)));
        assert!(debounce.try_fire_at(start + Duration::from_millis(2001)));
    }

    #[test]
    fn absorbed_events_do_not_extend_the_window() {
        let start = Instant::now();
        let mut debounce = Debounce::new(Duration::from_secs(2));

        assert!(debounce.try_fire_at(start));
        assert!(!debounce.try_fire_at(start + Duration::from_millis(1900)));
        // 2.1s after the fire, not after the absorbed event.
        assert!(debounce.try_fire_at(start + Duration::from_millis(2100)));
    }

    #[test]
    fn firing_restarts_the_window() {
        let start = Instant::now();
        let mut debounce = Debounce::new(Duration::from_secs(2));

        assert!(debounce.try_fire_at(start));
        assert!(debounce.try_fire_at(start + Duration::from_secs(3)));
        assert!(!debounce.try_fire_at(start + Duration::from_secs(4)));
    }

    // =========================================================================
    // Event relevance
    // =========================================================================

    #[test]
    fn file_create_and_remove_are_relevant() {
        let create = Event::new(EventKind::Create(CreateKind::File)).add_path("a.jpg".into());
        let remove = Event::new(EventKind::Remove(RemoveKind::File)).add_path("a.jpg".into());
        assert!(relevant(&create));
        assert!(relevant(&remove));
    }

    #[test]
    fn folder_create_and_remove_are_ignored() {
        let create = Event::new(EventKind::Create(CreateKind::Folder)).add_path("photo9".into());
        let remove = Event::new(EventKind::Remove(RemoveKind::Folder)).add_path("photo9".into());
        assert!(!relevant(&create));
        assert!(!relevant(&remove));
    }

    #[test]
    fn modify_of_a_file_path_is_relevant() {
        // The path does not exist as a directory, so it counts as a file change.
        let event =
            Event::new(EventKind::Modify(ModifyKind::Any)).add_path("gallery/a.txt".into());
        assert!(relevant(&event));
    }

    #[test]
    fn modify_of_a_directory_is_ignored() {
        let tmp = TempDir::new().unwrap();
        let event =
            Event::new(EventKind::Modify(ModifyKind::Any)).add_path(tmp.path().to_path_buf());
        assert!(!relevant(&event));
    }

    #[test]
    fn access_events_are_ignored() {
        let event = Event::new(EventKind::Access(AccessKind::Any)).add_path("a.jpg".into());
        assert!(!relevant(&event));
    }

    // =========================================================================
    // Watcher
    // =========================================================================

    #[test]
    fn relevant_event_triggers_a_run() {
        let mock = MockRunner::new();
        let mut watcher = GalleryWatcher::new(Duration::from_secs(2), &mock);

        let fired = watcher
            .handle_event_at(&file_created("a.jpg"), Instant::now())
            .unwrap();
        assert!(fired);
        assert_eq!(mock.count(), 1);
    }

    #[test]
    fn burst_of_events_runs_once() {
        let mock = MockRunner::new();
        let mut watcher = GalleryWatcher::new(Duration::from_secs(2), &mock);
        let start = Instant::now();

        for offset in [0u64, 10, 50, 300, 1500] {
            watcher
                .handle_event_at(&file_created("a.jpg"), start + Duration::from_millis(offset))
                .unwrap();
        }
        assert_eq!(mock.count(), 1);

        // An edit after the window triggers the next run.
        watcher
            .handle_event_at(&file_created("b.jpg"), start + Duration::from_millis(2500))
            .unwrap();
        assert_eq!(mock.count(), 2);
    }

    #[test]
    fn irrelevant_events_do_not_consume_the_window() {
        let mock = MockRunner::new();
        let mut watcher = GalleryWatcher::new(Duration::from_secs(2), &mock);
        let start = Instant::now();

        let folder = Event::new(EventKind::Create(CreateKind::Folder)).add_path("photo9".into());
        assert!(!watcher.handle_event_at(&folder, start).unwrap());

        // The file landing right after the folder still syncs immediately.
        let fired = watcher
            .handle_event_at(
                &file_created("photo9/a.jpg"),
                start + Duration::from_millis(10),
            )
            .unwrap();
        assert!(fired);
        assert_eq!(mock.count(), 1);
    }

    #[test]
    fn failed_run_surfaces_and_consumes_the_window() {
        let mock = MockRunner::failing();
        let mut watcher = GalleryWatcher::new(Duration::from_secs(2), &mock);
        let start = Instant::now();

        let err = watcher
            .handle_event_at(&file_created("a.jpg"), start)
            .unwrap_err();
        assert!(matches!(err, WatchError::Launch(_)));
        assert_eq!(mock.count(), 1);

        // Still inside the window: no second attempt.
        let fired = watcher
            .handle_event_at(&file_created("a.jpg"), start + Duration::from_millis(100))
            .unwrap();
        assert!(!fired);
        assert_eq!(mock.count(), 1);
    }

    #[test]
    fn missing_watch_root_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let mock = MockRunner::new();
        let err = run(
            &tmp.path().join("nope"),
            Duration::from_secs(2),
            &mock,
        )
        .unwrap_err();
        assert!(matches!(err, WatchError::MissingRoot(_)));
    }

    #[test]
    fn command_runner_builds_the_argument_vector() {
        let runner = CommandRunner::for_gallery(Path::new("/tmp/folio sync.toml")).unwrap();
        assert_eq!(runner.args[0], "--config");
        assert_eq!(runner.args[1], "/tmp/folio sync.toml");
        assert_eq!(runner.args[2], "gallery");
    }
}
