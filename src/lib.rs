//! Self hosting Google Fonts
//!
//! Fetches a Google Fonts stylesheet, downloads every font it links to, names
//! each font file after the md5 of its contents, and writes a copy of the
//! stylesheet that points at those files instead.

use std::{io::BufReader, path::Path};

mod args;
mod config;
mod download;
mod error;
mod extract;
mod fetch;
mod rewrite;

pub use args::Args;
pub use config::Config;
pub use download::download_font;
pub use error::{Error, UnwrapOrDie};
pub use extract::{extract_url, is_font_source};
pub use fetch::{fetch_stylesheet, Fetch, HttpFetcher, Response, USER_AGENT};
pub use rewrite::{rewrite_line, Rewriter, Summary, MODIFIED_CSS, ORIGINAL_CSS};

/// Run the whole pipeline over http.
pub fn run(config: &Config) -> Result<Summary, Error> {
    run_with(&HttpFetcher::new(), config)
}

/// Run the whole pipeline, making requests with `fetcher`.
///
/// This creates the output directory, fetches the stylesheet, writes
/// 'original.css' and 'modified.css', and downloads each font.
pub fn run_with(fetcher: &impl Fetch, config: &Config) -> Result<Summary, Error> {
    create_dir_if_not_exist(&config.output_dir)?;
    let stylesheet = fetch_stylesheet(fetcher, &config.url)?;

    let mut rewriter = Rewriter::create(&config.output_dir)?;
    let result = rewriter.rewrite(BufReader::new(stylesheet), fetcher, config);
    // flush what we have either way, so a failed run leaves its partial output
    let finished = rewriter.finish();
    let summary = result?;
    finished?;

    log::info!(
        "rewrote {} of {} lines, {} font files in {}",
        summary.rewritten,
        summary.lines,
        summary.files.len(),
        config.output_dir.display()
    );
    Ok(summary)
}

fn create_dir_if_not_exist(dir: &Path) -> Result<(), Error> {
    if dir.is_dir() {
        return Ok(());
    }
    log::debug!("creating {}", dir.display());
    let mut builder = std::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o777);
    }
    builder.create(dir).map_err(Error::io(dir))
}
