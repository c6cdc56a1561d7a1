//! the configuration for a single run

use std::{
    io::IsTerminal,
    path::{Path, PathBuf},
};

use crate::{error::Error, Args};

static DEFAULT_OUTPUT_DIR: &str = "output";

/// Everything a run needs, normalized from the command line.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub struct Config {
    /// The stylesheet to fetch
    pub url: String,
    /// Where `original.css`, `modified.css` and the fonts are written
    pub output_dir: PathBuf,
    /// Prefix for rewritten font urls; either empty or ending in '/'
    pub destination: String,
    /// Whether to draw a progress bar while downloading
    pub progress: bool,
}

impl Config {
    /// Create a `Config`, validating and normalizing the inputs.
    ///
    /// An empty output dir falls back to 'output', and a non-empty destination
    /// always gets a trailing '/'.
    pub fn new(
        url: impl Into<String>,
        output_dir: impl AsRef<Path>,
        destination: &str,
    ) -> Result<Self, Error> {
        let url = url.into();
        if url.trim().is_empty() {
            return Err(Error::MissingUrl);
        }
        let output_dir = output_dir.as_ref();
        let output_dir = if output_dir.as_os_str().is_empty() {
            PathBuf::from(DEFAULT_OUTPUT_DIR)
        } else {
            output_dir.to_owned()
        };
        Ok(Self {
            url,
            output_dir,
            destination: normalize_destination(destination),
            progress: false,
        })
    }

    /// Build a config from command line arguments.
    ///
    /// Progress is drawn only if stderr is a terminal.
    pub fn from_args(args: &Args) -> Result<Self, Error> {
        let mut config = Self::new(args.url.as_str(), &args.output, &args.destination)?;
        config.progress = std::io::stderr().is_terminal();
        Ok(config)
    }
}

fn normalize_destination(destination: &str) -> String {
    if destination.is_empty() || destination.ends_with('/') {
        destination.to_owned()
    } else {
        format!("{destination}/")
    }
}
