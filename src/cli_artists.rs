use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli_style;

use cli_style::{
    get_styles, print_empty_list, print_error, print_list_item, print_section_header,
    print_success, print_warning,
};
use streamcat_server::artists::TrackedArtists;
use streamcat_server::catalog_store::{load_catalog, slugify};
use streamcat_server::config::DataPaths;

fn parse_path(s: &str) -> Result<PathBuf> {
    let original_path = PathBuf::from(s);
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
#[command(styles = get_styles())]
struct CliArgs {
    /// Server data directory, the artist list lives at its default location inside it.
    #[clap(long, value_parser = parse_path)]
    pub data_dir: Option<PathBuf>,

    /// Explicit path of the artist list, takes precedence over --data-dir.
    #[clap(long, value_parser = parse_path)]
    pub artists_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Shows the tracked artists, with the number of catalog songs each one has.
    List,

    /// Starts tracking an artist. The next ingestion run picks it up.
    Add { name: String },

    /// Stops tracking an artist. Songs already in the catalog are kept.
    Remove { name: String },
}

struct Paths {
    artists_file: PathBuf,
    catalog_file: Option<PathBuf>,
}

fn resolve_paths(args: &CliArgs) -> Result<Paths> {
    let defaults = args.data_dir.as_deref().map(DataPaths::under);
    let artists_file = match (&args.artists_file, &defaults) {
        (Some(path), _) => path.clone(),
        (None, Some(defaults)) => defaults.artists_file.clone(),
        (None, None) => bail!("Either --data-dir or --artists-file must be given"),
    };
    Ok(Paths {
        artists_file,
        catalog_file: defaults.map(|d| d.catalog_file),
    })
}

fn list(artists: &TrackedArtists, catalog_file: Option<&PathBuf>) {
    let names = artists.load();
    print_section_header("Tracked artists");
    if names.is_empty() {
        print_empty_list("No artists tracked yet");
        return;
    }

    let catalog = catalog_file.map(|path| load_catalog(path));
    for name in names {
        let line = match &catalog {
            Some(catalog) => format!(
                "{} ({} songs)",
                name,
                catalog.artist_songs_count(&slugify(&name))
            ),
            None => name,
        };
        print_list_item(&line);
    }
}

fn main() -> Result<()> {
    let args = CliArgs::parse();
    let paths = resolve_paths(&args)?;
    let artists = TrackedArtists::new(paths.artists_file);

    match &args.command {
        Command::List => list(&artists, paths.catalog_file.as_ref()),
        Command::Add { name } => {
            let name = name.trim();
            if name.is_empty() {
                print_error("Artist name cannot be empty");
                bail!("empty artist name");
            }
            let added = artists
                .add(name)
                .with_context(|| format!("Could not add {}", name))?;
            if added {
                print_success(&format!("Now tracking {}", name));
            } else {
                print_warning(&format!("{} is already tracked", name));
            }
        }
        Command::Remove { name } => {
            let removed = artists
                .remove(name)
                .with_context(|| format!("Could not remove {}", name))?;
            if removed {
                print_success(&format!("Stopped tracking {}", name));
            } else {
                print_warning(&format!("{} was not tracked", name));
            }
        }
    }

    Ok(())
}
