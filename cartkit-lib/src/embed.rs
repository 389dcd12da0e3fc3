//! Window discovery for embedding the emulator's window.
//!
//! Embedding is a platform capability: on X11 the emulator's top-level
//! window can be located through the window manager's `_NET_CLIENT_LIST`,
//! everywhere else it cannot. Hosts ask a [`WindowEmbedder`] for the window
//! and do the actual reparenting themselves.

use std::fmt;
use std::process::Command;

use crate::LaunchError;

/// Platform window identifier (an X11 window id on Linux).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(pub u64);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

/// Locates top-level windows by name.
pub trait WindowEmbedder {
    /// Whether this platform/session supports window discovery at all.
    fn is_available(&self) -> bool;

    /// Find the first top-level window whose name contains `needle`.
    fn find_window(&self, needle: &str) -> Result<Option<WindowId>, LaunchError>;
}

/// Embedder for platforms without window discovery. Never finds anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullEmbedder;

impl WindowEmbedder for NullEmbedder {
    fn is_available(&self) -> bool {
        false
    }

    fn find_window(&self, _needle: &str) -> Result<Option<WindowId>, LaunchError> {
        Ok(None)
    }
}

/// X11 window discovery through the `xprop` utility.
#[derive(Debug, Clone)]
pub struct X11Embedder {
    tool: String,
}

impl Default for X11Embedder {
    fn default() -> Self {
        Self {
            tool: "xprop".to_string(),
        }
    }
}

impl X11Embedder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific `xprop` binary.
    pub fn with_tool(tool: impl Into<String>) -> Self {
        Self { tool: tool.into() }
    }

    /// Returns an embedder if an X display is reachable and `xprop` runs.
    pub fn detect() -> Option<Self> {
        if !cfg!(target_os = "linux") {
            return None;
        }
        let display = std::env::var_os("DISPLAY")?;
        if display.is_empty() {
            return None;
        }
        let embedder = Self::new();
        match Command::new(&embedder.tool).arg("-version").output() {
            Ok(_) => Some(embedder),
            Err(e) => {
                log::debug!("{} unavailable: {}", embedder.tool, e);
                None
            }
        }
    }

    fn xprop(&self, args: &[&str]) -> Result<String, LaunchError> {
        let output = Command::new(&self.tool).args(args).output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LaunchError::window_query(format!("{} not found", self.tool))
            } else {
                LaunchError::Io(e)
            }
        })?;
        if !output.status.success() {
            return Err(LaunchError::window_query(format!(
                "{} {} exited with {}: {}",
                self.tool,
                args.join(" "),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl WindowEmbedder for X11Embedder {
    fn is_available(&self) -> bool {
        cfg!(target_os = "linux") && std::env::var_os("DISPLAY").is_some_and(|d| !d.is_empty())
    }

    fn find_window(&self, needle: &str) -> Result<Option<WindowId>, LaunchError> {
        let clients = parse_client_list(&self.xprop(&["-root", "_NET_CLIENT_LIST"])?);
        for id in clients {
            let hex = id.to_string();
            // Windows can vanish between the two queries
            let name = match self.xprop(&["-id", &hex, "_NET_WM_NAME"]) {
                Ok(out) => parse_wm_name(&out),
                Err(e) => {
                    log::debug!("Skipping window {hex}: {e}");
                    continue;
                }
            };
            if name.is_some_and(|n| n.contains(needle)) {
                return Ok(Some(id));
            }
        }
        Ok(None)
    }
}

/// Pick the best embedder for this platform and session.
pub fn default_embedder() -> Box<dyn WindowEmbedder> {
    match X11Embedder::detect() {
        Some(x11) => Box::new(x11),
        None => Box::new(NullEmbedder),
    }
}

/// Parse `xprop -root _NET_CLIENT_LIST` output.
///
/// Expected shape: `_NET_CLIENT_LIST(WINDOW): window id # 0x1a00003, 0x2400007`.
/// Anything else (property not set, no clients) yields an empty list.
pub fn parse_client_list(output: &str) -> Vec<WindowId> {
    let Some((_, ids)) = output.split_once('#') else {
        return Vec::new();
    };
    ids.split(',')
        .filter_map(|s| {
            let s = s.trim();
            let hex = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X"))?;
            u64::from_str_radix(hex, 16).ok().map(WindowId)
        })
        .collect()
}

/// Parse `xprop -id <wid> _NET_WM_NAME` output.
///
/// Expected shape: `_NET_WM_NAME(UTF8_STRING) = "Mupen64Plus OpenGL Video"`.
/// Returns `None` when the property is missing.
pub fn parse_wm_name(output: &str) -> Option<String> {
    let (_, value) = output.split_once('=')?;
    let value = value.trim();
    let value = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value);
    Some(value.replace("\\\"", "\""))
}

#[cfg(test)]
#[path = "tests/embed_tests.rs"]
mod tests;
