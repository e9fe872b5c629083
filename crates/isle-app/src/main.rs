//! The `isle` command-line entry point.

use std::path::Path;

use clap::Parser;
use isle_app::{AppError, PlatformDirs};
use isle_config::{CONFIG_FILE, CliArgs, Config, ConfigOrigin};
use tracing::info;

fn main() {
    if let Err(e) = try_main() {
        eprintln!("isle: {e}");
        std::process::exit(1);
    }
}

fn try_main() -> Result<(), AppError> {
    let args = CliArgs::parse();

    let dirs = match PlatformDirs::resolve() {
        Ok(dirs) => dirs,
        // No OS config root; fall back to the working directory.
        Err(_) => PlatformDirs::resolve_with_root(Path::new(".")),
    }
    .with_config_dir(args.config.as_deref());
    dirs.create_dirs()?;

    let (mut config, origin) = Config::load_or_create(&dirs.config_dir)?;
    config.apply_cli_overrides(&args);

    isle_log::init_logging(Some(dirs.log_dir.as_path()), cfg!(debug_assertions), Some(&config));
    let config_path = dirs.config_dir.join(CONFIG_FILE);
    match origin {
        ConfigOrigin::Loaded => info!(path = %config_path.display(), "loaded config"),
        ConfigOrigin::Created => info!(path = %config_path.display(), "created default config"),
    }
    info!(seed = config.terrain.seed, "starting");

    let summary = isle_app::run(&config)?;
    println!("seed {}: {} vegetation instances", summary.seed, summary.vegetation);
    match summary.waypoints {
        Some(w) => println!(
            "start ({:.1}, {:.1}, {:.1}) -> destination ({:.1}, {:.1}, {:.1}), {:.1} apart",
            w.start.x,
            w.start.y,
            w.start.z,
            w.end.x,
            w.end.y,
            w.end.z,
            w.distance()
        ),
        None => println!("no walkable start/destination pair found"),
    }
    for path in &summary.written {
        println!("  wrote {}", path.display());
    }
    Ok(())
}
