use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use cartkit_lib::settings::{self, Settings};
use cartkit_lib::{
    DisplayMode, LaunchOptions, NullEmbedder, Session, WindowEmbedder, default_embedder,
};

use crate::CliError;
use crate::spinner::LaunchSpinner;

/// Command-line switches for `launch`. Each one can only turn a setting on
/// (or, for `no_personalize`, off); unset flags defer to the settings file.
#[derive(Debug, Default)]
pub(crate) struct LaunchFlags {
    pub embed: bool,
    pub high_fps: bool,
    pub no_personalize: bool,
    pub emulator: Option<String>,
}

/// Build the session and launch options from settings plus flags.
pub(crate) fn session_for(settings: &Settings, flags: &LaunchFlags) -> (Session, LaunchOptions) {
    let mut command = settings.emulator_command();
    if let Some(exe) = &flags.emulator {
        command = command.with_executable(exe.clone());
    }
    let personalize = settings.patch.personalize && !flags.no_personalize;
    let session = Session::new(command, settings.patch_options(), personalize);

    let options = settings
        .launch_options()
        .embed(settings.launch.embed || flags.embed)
        .high_frame_rate(settings.launch.high_frame_rate || flags.high_fps);
    (session, options)
}

/// Run the launch command: load, start, wait for exit, stop.
///
/// The patched copy is removed on every path out of this function, including
/// a failed start.
pub(crate) fn run_launch(file: &Path, flags: LaunchFlags, quiet: bool) -> Result<(), CliError> {
    let settings = settings::load()?;
    let (mut session, options) = session_for(&settings, &flags);

    let loaded = session.load(file)?;
    log::info!(
        "{} \"{}\" [{}]{}",
        "Loaded".if_supports_color(Stdout, |t| t.bold()),
        loaded.title,
        loaded.format.extension(),
        if loaded.personalized {
            format!(" {}", "(personalized)".if_supports_color(Stdout, |t| t.green()))
        } else {
            String::new()
        },
    );

    let embedder: Box<dyn WindowEmbedder> = if options.embed {
        default_embedder()
    } else {
        Box::new(NullEmbedder)
    };

    let spinner = LaunchSpinner::new(quiet);
    let started = session.start(&options, embedder.as_ref(), &|p| spinner.update(&p));
    spinner.finish();

    let display = match started {
        Ok(display) => display,
        Err(e) => {
            if let Err(cleanup) = session.stop() {
                log::warn!("{cleanup}");
            }
            return Err(e.into());
        }
    };

    match display {
        DisplayMode::Embedded(id) => log::info!(
            "Emulator window {} ready for embedding",
            id.if_supports_color(Stdout, |t| t.cyan())
        ),
        DisplayMode::Detached => log::info!("Emulator running in its own window"),
    }

    let status = session.wait()?;
    session.stop()?;

    match status {
        Some(s) if s.success() => log::info!("Emulator exited"),
        Some(s) => log::warn!("Emulator exited with {s}"),
        None => {}
    }
    Ok(())
}
