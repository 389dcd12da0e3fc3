//! Load/start/stop lifecycle for one cartridge image.
//!
//! A [`Session`] owns everything a launch leaves behind: the emulator child
//! process and the patched artifact on disk. Both are released on
//! [`Session::stop`], on loading another image, and when the session is
//! dropped, so the artifact cannot outlive the session on any exit path.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Child, ExitStatus};

use cartkit_core::{CartridgeError, CartridgeImage, N64Format, PatchOptions, patch};

use crate::SessionError;
use crate::embed::WindowEmbedder;
use crate::launcher::{self, DisplayMode, EmulatorCommand, LaunchOptions, LaunchProgress};
use crate::settings::Settings;

/// A patched copy on disk, deleted when the guard is dropped.
#[derive(Debug)]
pub struct PatchArtifact {
    path: Option<PathBuf>,
}

impl PatchArtifact {
    /// Take ownership of an existing file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn path(&self) -> &Path {
        self.path.as_deref().unwrap_or_else(|| Path::new(""))
    }

    /// Delete the file now, reporting failure. A file that is already gone
    /// counts as removed.
    pub fn remove(mut self) -> Result<(), SessionError> {
        match self.path.take() {
            Some(path) => remove_if_exists(&path).map_err(|source| SessionError::Cleanup {
                path,
                source,
            }),
            None => Ok(()),
        }
    }

    /// Give up ownership without deleting the file.
    pub fn release(mut self) -> PathBuf {
        self.path.take().unwrap_or_default()
    }
}

impl Drop for PatchArtifact {
    fn drop(&mut self) {
        if let Some(path) = self.path.take() {
            if let Err(e) = remove_if_exists(&path) {
                log::warn!("Failed to remove {}: {}", path.display(), e);
            }
        }
    }
}

fn remove_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            log::debug!("Removed {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

/// What the session knows about the loaded image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedRom {
    /// The file the user picked.
    pub source: PathBuf,
    pub format: N64Format,
    pub title: String,
    pub known_title: bool,
    /// Whether a patched copy stands in for the source.
    pub personalized: bool,
}

/// One loaded image and whatever is running from it.
#[derive(Debug)]
pub struct Session {
    command: EmulatorCommand,
    patch_options: PatchOptions,
    personalize: bool,
    loaded: Option<LoadedRom>,
    artifact: Option<PatchArtifact>,
    child: Option<Child>,
    display: Option<DisplayMode>,
}

impl Session {
    pub fn new(command: EmulatorCommand, patch_options: PatchOptions, personalize: bool) -> Self {
        Self {
            command,
            patch_options,
            personalize,
            loaded: None,
            artifact: None,
            child: None,
            display: None,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.emulator_command(),
            settings.patch_options(),
            settings.patch.personalize,
        )
    }

    pub fn loaded(&self) -> Option<&LoadedRom> {
        self.loaded.as_ref()
    }

    /// The path the emulator will be started on: the patched copy if one is
    /// active, otherwise the source.
    pub fn active_path(&self) -> Option<&Path> {
        match &self.artifact {
            Some(artifact) => Some(artifact.path()),
            None => self.loaded.as_ref().map(|l| l.source.as_path()),
        }
    }

    pub fn artifact_path(&self) -> Option<&Path> {
        self.artifact.as_ref().map(PatchArtifact::path)
    }

    pub fn display(&self) -> Option<DisplayMode> {
        self.display
    }

    pub fn pid(&self) -> Option<u32> {
        self.child.as_ref().map(Child::id)
    }

    /// Load and validate `path`.
    ///
    /// An invalid header or unreadable file leaves the session as it was.
    /// On success any previous image is replaced (its emulator is stopped and
    /// its artifact removed). Recognized titles are patched when
    /// personalization is on.
    pub fn load(&mut self, path: &Path) -> Result<&LoadedRom, SessionError> {
        log::info!("Loading ROM from {}", path.display());
        let image = CartridgeImage::open(path)?.require_valid()?;
        let Some(format) = image.format() else {
            return Err(CartridgeError::InvalidImage.into());
        };

        let wants_patch = self.personalize && image.is_known_title();
        let new_artifact = if wants_patch {
            Some(self.write_artifact(&image, path)?)
        } else {
            None
        };

        self.terminate_child();
        if let Some(old) = self.artifact.take() {
            if new_artifact.as_ref().is_some_and(|a| a.path() == old.path()) {
                // Same derived path: the new write already replaced it
                old.release();
            } else if let Err(e) = old.remove() {
                log::warn!("{e}");
            }
        }

        self.artifact = new_artifact;
        log::info!(
            "Loaded \"{}\" ({}){}",
            image.internal_title(),
            format.display_name(),
            if wants_patch { ", personalized" } else { "" }
        );
        Ok(&*self.loaded.insert(LoadedRom {
            source: path.to_path_buf(),
            format,
            title: image.internal_title().to_string(),
            known_title: image.is_known_title(),
            personalized: wants_patch,
        }))
    }

    fn write_artifact(
        &self,
        image: &CartridgeImage,
        source: &Path,
    ) -> Result<PatchArtifact, SessionError> {
        let mut patched = patch(image, &self.patch_options)?;
        let path = patched.persist(source)?.to_path_buf();
        log::info!("Applied personalization patches: {}", path.display());
        Ok(PatchArtifact::new(path))
    }

    pub fn personalize(&self) -> bool {
        self.personalize
    }

    /// Turn personalization on or off.
    ///
    /// Applies to later loads and, when a recognized title is loaded, to it as
    /// well: enabling writes the patched copy, disabling deletes it. A running
    /// emulator keeps the image it was started on until the next
    /// [`start`](Self::start).
    pub fn set_personalize(&mut self, enabled: bool) -> Result<(), SessionError> {
        self.personalize = enabled;
        let Some(loaded) = self.loaded.as_ref() else {
            return Ok(());
        };
        if !loaded.known_title || loaded.personalized == enabled {
            return Ok(());
        }
        let source = loaded.source.clone();

        if enabled {
            if self.artifact.is_none() {
                let image = CartridgeImage::open(&source)?.require_valid()?;
                self.artifact = Some(self.write_artifact(&image, &source)?);
            }
        } else {
            self.set_personalized(false);
            if let Some(artifact) = self.artifact.take() {
                artifact.remove()?;
            }
        }
        self.set_personalized(enabled);
        log::info!(
            "Personalization {} for {}",
            if enabled { "enabled" } else { "disabled" },
            source.display()
        );
        Ok(())
    }

    fn set_personalized(&mut self, personalized: bool) {
        if let Some(loaded) = self.loaded.as_mut() {
            loaded.personalized = personalized;
        }
    }

    /// Start the emulator on the active image.
    ///
    /// A running emulator is stopped first. If the patched copy was removed
    /// by an earlier [`stop`](Self::stop) it is regenerated. When the launch
    /// fails the patched copy is deleted again.
    pub fn start(
        &mut self,
        options: &LaunchOptions,
        embedder: &dyn WindowEmbedder,
        progress: &dyn Fn(LaunchProgress),
    ) -> Result<DisplayMode, SessionError> {
        let Some(loaded) = self.loaded.clone() else {
            return Err(SessionError::NotLoaded);
        };

        self.terminate_child();
        if loaded.personalized && self.artifact.is_none() {
            let image = CartridgeImage::open(&loaded.source)?.require_valid()?;
            self.artifact = Some(self.write_artifact(&image, &loaded.source)?);
        }

        let image_path = self
            .active_path()
            .map(Path::to_path_buf)
            .ok_or(SessionError::NotLoaded)?;
        log::info!("Starting emulation of {}", image_path.display());

        let launched =
            match launcher::launch(&self.command, &image_path, options, embedder, progress) {
                Ok(launched) => launched,
                Err(e) => {
                    // Nothing runs from the copy; `start` rewrites it next time
                    if let Some(artifact) = self.artifact.take() {
                        if let Err(cleanup) = artifact.remove() {
                            log::warn!("{cleanup}");
                        }
                    }
                    return Err(e.into());
                }
            };
        self.child = Some(launched.child);
        self.display = Some(launched.display);
        Ok(launched.display)
    }

    /// True while the emulator process is alive.
    pub fn is_running(&mut self) -> bool {
        matches!(self.child.as_mut().map(Child::try_wait), Some(Ok(None)))
    }

    /// Block until the emulator exits. Returns `None` if nothing is running.
    pub fn wait(&mut self) -> Result<Option<ExitStatus>, SessionError> {
        let Some(child) = self.child.as_mut() else {
            return Ok(None);
        };
        let status = child.wait().map_err(crate::LaunchError::Io)?;
        log::info!("Emulator exited with {status}");
        self.child = None;
        Ok(Some(status))
    }

    /// Stop the emulator and delete the patched copy.
    pub fn stop(&mut self) -> Result<(), SessionError> {
        if self.loaded.is_none() {
            return Err(SessionError::NotLoaded);
        }
        log::info!("Stopping emulation");
        self.terminate_child();
        if let Some(artifact) = self.artifact.take() {
            artifact.remove()?;
        }
        Ok(())
    }

    fn terminate_child(&mut self) {
        self.display = None;
        let Some(mut child) = self.child.take() else {
            return;
        };
        if let Err(e) = child.kill() {
            log::debug!("kill({}) failed: {}", child.id(), e);
        }
        if let Err(e) = child.wait() {
            log::debug!("wait({}) failed: {}", child.id(), e);
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.terminate_child();
        // `artifact` deletes itself when dropped
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
