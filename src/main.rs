use chrono::Datelike;
use clap::{Parser, Subcommand};
use folio_sync::{config, output, scan, sync, watch};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "folio-sync")]
#[command(about = "Sync photo project folders into site data and assets")]
#[command(long_about = "\
Sync photo project folders into site data and assets

Your filesystem is the data source. Each project folder holds one image
and an optional story file; syncing copies the image into the site's
assets folder (converting HEIC to JPEG) and rewrites the JSON data file
the site renders from.

Content structure:

  content/
  ├── project-gallery/             # Gallery: one folder per project
  │   ├── photo1/
  │   │   ├── dawn.jpg             # Image (jpg, jpeg, png, gif, webp, heic)
  │   │   └── dawn.txt             # Story (optional)
  │   └── photo2/
  │       └── harbor.HEIC          # Converted to JPEG on sync
  └── featured-series/             # Series: series folders holding photos
      ├── s1/
      │   ├── p1/
      │   │   ├── ridge.jpg
      │   │   └── ridge.txt
      │   └── p2/
      │       └── mist.png
      └── s2/
          └── p1/
              └── dusk.jpg

Story resolution (first available wins):
  Title:       first line of the .txt → placeholder (\"Project 1\")
  Description: remaining lines of the .txt → \"No description available\"

Run 'folio-sync gen-config' to generate a documented folio-sync.toml.")]
#[command(version)]
struct Cli {
    /// Config file
    #[arg(
        long,
        global = true,
        env = "FOLIO_SYNC_CONFIG",
        default_value = "folio-sync.toml"
    )]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sync the project gallery: assets plus its JSON data file
    Gallery,
    /// Sync the featured series: assets plus its JSON data file
    Series,
    /// Run both syncs: gallery then series
    Sync,
    /// Watch the gallery source and re-run the gallery sync on change
    Watch,
    /// Validate config and list source folders without writing
    Check,
    /// Print a stock folio-sync.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Gallery => {
            let config = config::load_config(&cli.config)?;
            let report = sync::sync_gallery(&config, current_year())?;
            output::print_sync_report(&report);
        }
        Command::Series => {
            let config = config::load_config(&cli.config)?;
            let report = sync::sync_series(&config, current_year())?;
            output::print_sync_report(&report);
        }
        Command::Sync => {
            let config = config::load_config(&cli.config)?;
            let year = current_year();

            println!("==> Stage 1: Syncing {}", config.gallery.source.display());
            let report = sync::sync_gallery(&config, year)?;
            output::print_sync_report(&report);

            println!("==> Stage 2: Syncing {}", config.series.source.display());
            let report = sync::sync_series(&config, year)?;
            output::print_sync_report(&report);

            println!("==> Sync complete");
        }
        Command::Watch => {
            let config = config::load_config(&cli.config)?;
            // The child process resolves the config itself, so the path must
            // survive the watcher's working directory.
            let config_path = std::path::absolute(&cli.config)?;
            let runner = watch::CommandRunner::for_gallery(&config_path)?;
            watch::run(&config.gallery.source, config.watch.debounce(), runner)?;
        }
        Command::Check => {
            let config = config::load_config(&cli.config)?;

            println!("==> Checking {}", config.gallery.source.display());
            let folders = scan::scan_gallery(&config.gallery.source)?;
            output::print_check_output(&folders);

            println!("==> Checking {}", config.series.source.display());
            let folders = scan::scan_series(&config.series.source)?;
            output::print_check_output(&folders);

            println!("==> Sources are valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// The calendar year stamped into each item's meta line.
fn current_year() -> i32 {
    chrono::Local::now().year()
}
