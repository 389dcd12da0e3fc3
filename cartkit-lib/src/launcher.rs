//! Emulator process launching.
//!
//! The emulator is an external program invoked as
//! `<executable> <base args> [<high frame rate args>] <image path>`. When
//! embedding is requested, the launcher polls for the emulator's window a
//! bounded number of times and falls back to a detached window if it never
//! shows up.

use std::ffi::OsString;
use std::path::Path;
use std::process::{Child, Command};
use std::thread;
use std::time::Duration;

use crate::LaunchError;
use crate::embed::{WindowEmbedder, WindowId};

pub const DEFAULT_EXECUTABLE: &str = "mupen64plus";
pub const DEFAULT_WINDOW_TITLE: &str = "Mupen64Plus";
pub const NO_SPEED_LIMIT_FLAG: &str = "--nospeedlimit";
/// Placeholder arguments for the high frame rate option; the emulator does
/// not act on them.
pub const HIGH_FRAME_RATE_ARGS: [&str; 2] = ["--set", "Video-General[fps]=60"];

/// How to invoke the emulator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmulatorCommand {
    pub executable: String,
    /// Substring of the emulator's window name, used for embedding.
    pub window_title: String,
    pub base_args: Vec<String>,
    pub high_frame_rate_args: Vec<String>,
}

impl Default for EmulatorCommand {
    fn default() -> Self {
        Self {
            executable: DEFAULT_EXECUTABLE.to_string(),
            window_title: DEFAULT_WINDOW_TITLE.to_string(),
            base_args: vec![NO_SPEED_LIMIT_FLAG.to_string()],
            high_frame_rate_args: HIGH_FRAME_RATE_ARGS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl EmulatorCommand {
    pub fn with_executable(mut self, executable: impl Into<String>) -> Self {
        self.executable = executable.into();
        self
    }

    /// Arguments for one launch. The image path is always last.
    pub fn build_args(&self, image: &Path, high_frame_rate: bool) -> Vec<OsString> {
        let mut args: Vec<OsString> = self.base_args.iter().map(OsString::from).collect();
        if high_frame_rate {
            args.extend(self.high_frame_rate_args.iter().map(OsString::from));
        }
        args.push(image.as_os_str().to_owned());
        args
    }
}

/// Bounded retry budget for window discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub attempts: u32,
    /// Sleep before each attempt.
    pub interval: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            attempts: 20,
            interval: Duration::from_millis(500),
        }
    }
}

/// Per-launch options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchOptions {
    /// Pass the (placeholder) high frame rate arguments.
    pub high_frame_rate: bool,
    /// Look for the emulator window so the host can embed it.
    pub embed: bool,
    pub poll: PollPolicy,
}

impl LaunchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn high_frame_rate(mut self, enabled: bool) -> Self {
        self.high_frame_rate = enabled;
        self
    }

    pub fn embed(mut self, enabled: bool) -> Self {
        self.embed = enabled;
        self
    }

    pub fn poll(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }
}

/// Where the emulator's output ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// The window was found and can be embedded by the host.
    Embedded(WindowId),
    /// The emulator runs in its own window.
    Detached,
}

/// Progress updates for callbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchProgress {
    /// The emulator process started.
    Spawned { pid: u32 },
    /// About to query for the emulator window.
    Polling { attempt: u32, total: u32 },
    /// The window was found.
    Embedded(WindowId),
    /// Running without embedding.
    Detached,
}

/// A running emulator.
#[derive(Debug)]
pub struct Launched {
    pub child: Child,
    pub display: DisplayMode,
}

/// Start the emulator on `image`.
///
/// A missing executable is reported as [`LaunchError::ExecutableNotFound`].
pub fn spawn(
    command: &EmulatorCommand,
    image: &Path,
    high_frame_rate: bool,
) -> Result<Child, LaunchError> {
    let args = command.build_args(image, high_frame_rate);
    log::debug!("Spawning {} {:?}", command.executable, args);

    Command::new(&command.executable)
        .args(&args)
        .spawn()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LaunchError::executable_not_found(&command.executable)
            } else {
                LaunchError::Io(e)
            }
        })
}

/// Poll `embedder` for a window whose name contains `needle`.
///
/// Sleeps `poll.interval` before every attempt and gives up after
/// `poll.attempts` with [`LaunchError::WindowNotFound`]. Query failures count
/// as misses.
pub fn wait_for_window(
    embedder: &dyn WindowEmbedder,
    needle: &str,
    poll: PollPolicy,
    progress: &dyn Fn(LaunchProgress),
) -> Result<WindowId, LaunchError> {
    for attempt in 1..=poll.attempts {
        thread::sleep(poll.interval);
        progress(LaunchProgress::Polling {
            attempt,
            total: poll.attempts,
        });
        match embedder.find_window(needle) {
            Ok(Some(id)) => {
                log::debug!("Found window {id} on attempt {attempt}");
                return Ok(id);
            }
            Ok(None) => {}
            Err(e) => log::debug!("Window query failed on attempt {attempt}: {e}"),
        }
    }
    Err(LaunchError::WindowNotFound {
        attempts: poll.attempts,
    })
}

/// Spawn the emulator and, if requested, locate its window.
///
/// Failing to find the window is not an error: the launch falls back to
/// [`DisplayMode::Detached`].
pub fn launch(
    command: &EmulatorCommand,
    image: &Path,
    options: &LaunchOptions,
    embedder: &dyn WindowEmbedder,
    progress: &dyn Fn(LaunchProgress),
) -> Result<Launched, LaunchError> {
    let child = spawn(command, image, options.high_frame_rate)?;
    log::info!("Started {} (pid {})", command.executable, child.id());
    progress(LaunchProgress::Spawned { pid: child.id() });

    let display = if !options.embed {
        DisplayMode::Detached
    } else if !embedder.is_available() {
        log::warn!("Window embedding is not available here; running detached");
        DisplayMode::Detached
    } else {
        match wait_for_window(embedder, &command.window_title, options.poll, progress) {
            Ok(id) => DisplayMode::Embedded(id),
            Err(e) => {
                log::warn!("{e}; running detached");
                DisplayMode::Detached
            }
        }
    };

    progress(match display {
        DisplayMode::Embedded(id) => LaunchProgress::Embedded(id),
        DisplayMode::Detached => LaunchProgress::Detached,
    });

    Ok(Launched { child, display })
}

#[cfg(test)]
#[path = "tests/launcher_tests.rs"]
mod tests;
