use clap::Parser;

use notify::RecursiveMode;
use notify_debouncer_mini::new_debouncer;
use std::{
    path::{Path, PathBuf},
    sync::mpsc::channel,
    time::Duration,
};

use crate::errors::{Error, Result};
use crate::layers::{split_file, SplitConfig};

/// Command line arguments
#[derive(Parser)]
#[command(author, version, about, long_about=None)] // Read from Cargo.toml
struct Arguments {
    /// SVG file to split into per-layer documents
    file: String,

    /// Directory to write extracted layers into
    #[arg(short, long, default_value = "layers")]
    output_dir: PathBuf,

    /// Don't annotate retained groups with id and bounding-box attributes
    #[arg(long)]
    no_annotate: bool,

    /// Attribute naming a group's layer label
    #[arg(long, default_value = "inkscape:label")]
    label_attr: String,

    /// Watch file for changes; re-split on change
    #[arg(short, long)]
    watch: bool,
}

/// Top-level configuration used by the `svgsplit` command-line process.
///
/// This is typically derived from command line arguments and passed to
/// `run()`. 'Front-end' settings (input path, output directory, watch)
/// are stored directly in this struct; per-extraction settings are in
/// the embedded `SplitConfig`.
#[derive(Clone)]
pub struct Config {
    /// Path to the input file
    pub input_path: String,
    /// Directory extracted layers are written into
    pub output_dir: PathBuf,
    /// Stay monitoring `input_path` for changes
    pub watch: bool,
    /// per-extraction options
    pub split: SplitConfig,
}

impl Config {
    fn from_args(args: Arguments) -> Result<Self> {
        if args.output_dir.exists() && !args.output_dir.is_dir() {
            return Err(Error::Cli(format!(
                "output path '{}' exists and is not a directory",
                args.output_dir.display()
            )));
        }
        Ok(Self {
            input_path: args.file,
            output_dir: args.output_dir,
            watch: args.watch,
            split: SplitConfig {
                annotate: !args.no_annotate,
                label_attr: args.label_attr,
            },
        })
    }

    /// Create a `Config` object set up given a command line string.
    ///
    /// The string is parsed using `shlex::split()`, so values containing
    /// spaces or quotes should be quoted or escaped appropriately.
    pub fn from_cmdline(args: &str) -> Result<Self> {
        let args = shlex::split(args).unwrap_or_default();
        let args = Arguments::try_parse_from(args.iter()).map_err(Error::from_err)?;
        Self::from_args(args)
    }
}

/// Create a `Config` object from process arguments.
pub fn get_config() -> Result<Config> {
    let args = Arguments::parse();
    Config::from_args(args)
}

/// Run the `svgsplit` program with a given `Config`.
pub fn run(config: Config) -> Result<()> {
    if !config.watch {
        split_file(&config.input_path, &config.output_dir, &config.split)?;
    } else {
        let watch = config.input_path;
        let (tx, rx) = channel();
        let mut watcher =
            new_debouncer(Duration::from_millis(250), tx).map_err(Error::from_err)?;
        let watch_path = Path::new(&watch);
        watcher
            .watcher()
            .watch(watch_path, RecursiveMode::NonRecursive)
            .map_err(Error::from_err)?;
        split_file(&watch, &config.output_dir, &config.split).unwrap_or_else(|e| {
            tracing::error!("split failed: {e}");
            Vec::new()
        });
        tracing::info!("watching {watch} for changes");
        loop {
            match rx.recv() {
                Ok(Ok(events)) => {
                    for event in events {
                        if event.path.canonicalize().map_err(Error::Io)?
                            == watch_path.canonicalize().map_err(Error::Io)?
                        {
                            tracing::info!("{} changed", event.path.to_string_lossy());
                            split_file(&watch, &config.output_dir, &config.split).unwrap_or_else(
                                |e| {
                                    tracing::error!("split failed: {e}");
                                    Vec::new()
                                },
                            );
                        }
                    }
                }
                Ok(Err(e)) => tracing::error!("watch error {e:?}"),
                Err(e) => tracing::error!("channel error: {e:?}"),
            }
        }
    }

    Ok(())
}
