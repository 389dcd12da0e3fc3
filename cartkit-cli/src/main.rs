//! cartkit CLI
//!
//! Command-line interface for inspecting, personalizing and launching
//! Nintendo 64 ROM images.

mod cli_types;
mod commands;
mod error;
mod logging;
mod spinner;

use clap::Parser;

use cli_types::{Cli, Commands, ConfigAction};
pub(crate) use error::CliError;
pub(crate) use logging::log_blank;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.quiet, cli.verbose, cli.logfile.as_deref()) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    let result = match cli.command {
        Commands::Inspect { files } => commands::inspect::run_inspect(&files),
        Commands::Browse => commands::browse::run_browse(cli.rom_dir),
        Commands::Patch {
            file,
            anomalies,
            no_timing,
            no_tone_shift,
            seed,
        } => commands::patch::run_patch(&file, anomalies, no_timing, no_tone_shift, seed),
        Commands::Launch {
            file,
            embed,
            high_fps,
            no_personalize,
            emulator,
        } => commands::launch::run_launch(
            &file,
            commands::launch::LaunchFlags {
                embed,
                high_fps,
                no_personalize,
                emulator,
            },
            cli.quiet,
        ),
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::run_config_show(),
            ConfigAction::Path => commands::config::run_config_path(),
            ConfigAction::SetRomDir { dir } => commands::config::run_config_set_rom_dir(&dir),
            ConfigAction::ClearRomDir => commands::config::run_config_clear_rom_dir(),
        },
    };

    if let Err(e) = result {
        log::error!("{e}");
        log::logger().flush();
        std::process::exit(1);
    }
}
