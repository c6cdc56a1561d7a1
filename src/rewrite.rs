//! writing the original and rewritten stylesheets

use std::{
    fs::File,
    io::{BufRead, BufWriter, Write},
    path::{Path, PathBuf},
};

use kdam::BarExt;

use crate::{
    download::download_font,
    error::Error,
    extract::{extract_url, is_font_source},
    fetch::Fetch,
    Config,
};

pub static ORIGINAL_CSS: &str = "original.css";
pub static MODIFIED_CSS: &str = "modified.css";

/// What a successful run did
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    /// Number of lines read from the stylesheet
    pub lines: usize,
    /// Number of font source lines that were rewritten
    pub rewritten: usize,
    /// Distinct font files written, in the order first seen
    pub files: Vec<String>,
}

/// The two stylesheets we write, side by side in the output directory.
pub struct Rewriter {
    original: Output,
    modified: Output,
}

struct Output {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl Output {
    fn create(path: PathBuf) -> Result<Self, Error> {
        let file = File::create(&path).map_err(Error::io(&path))?;
        Ok(Self {
            path,
            writer: BufWriter::new(file),
        })
    }

    fn write_line(&mut self, line: &[u8]) -> Result<(), Error> {
        self.writer
            .write_all(line)
            .and_then(|_| self.writer.write_all(b"\n"))
            .map_err(Error::io(&self.path))
    }

    fn finish(mut self) -> Result<(), Error> {
        self.writer.flush().map_err(Error::io(&self.path))
    }
}

impl Rewriter {
    /// Create (or truncate) 'original.css' and 'modified.css' in `dir`.
    pub fn create(dir: &Path) -> Result<Self, Error> {
        Ok(Self {
            original: Output::create(dir.join(ORIGINAL_CSS))?,
            modified: Output::create(dir.join(MODIFIED_CSS))?,
        })
    }

    /// Copy every line of `stylesheet` to 'original.css', and to 'modified.css'
    /// with font urls replaced by downloaded copies.
    ///
    /// Lines are copied as raw bytes; a line that isn't valid utf-8 can't be a
    /// font source, so it passes through to both files untouched.
    ///
    /// Fonts are downloaded to `config.output_dir` one at a time, in the
    /// order they appear. The first error stops everything; lines already
    /// written are left as they are.
    pub fn rewrite(
        &mut self,
        mut stylesheet: impl BufRead,
        fetcher: &impl Fetch,
        config: &Config,
    ) -> Result<Summary, Error> {
        let mut summary = Summary::default();
        let mut progress = config.progress.then(|| kdam::tqdm!(desc = "fonts"));
        let mut buf = Vec::new();

        loop {
            buf.clear();
            let n = stylesheet
                .read_until(b'\n', &mut buf)
                .map_err(|source| Error::Read {
                    url: config.url.clone(),
                    source,
                })?;
            if n == 0 {
                break;
            }
            let line = strip_line_ending(&buf);
            summary.lines += 1;
            self.original.write_line(line)?;

            let Some(line) = std::str::from_utf8(line)
                .ok()
                .filter(|line| is_font_source(line))
            else {
                self.modified.write_line(line)?;
                continue;
            };

            let url = extract_url(line)?;
            let file_name = download_font(fetcher, url, &config.output_dir)?;
            let rewritten = rewrite_line(line, url, &config.destination, &file_name);
            self.modified.write_line(rewritten.as_bytes())?;

            summary.rewritten += 1;
            if !summary.files.contains(&file_name) {
                summary.files.push(file_name);
            }
            if let Some(bar) = progress.as_mut() {
                if let Err(e) = bar.update(1) {
                    log::warn!("failed to draw progress: '{e}'");
                }
            }
        }
        Ok(summary)
    }

    /// Flush and close both files.
    pub fn finish(self) -> Result<(), Error> {
        self.original.finish()?;
        self.modified.finish()
    }
}

/// The line without its trailing "\n" or "\r\n"
fn strip_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Replace the first occurrence of `url` in `line` with `{destination}{file_name}`.
pub fn rewrite_line(line: &str, url: &str, destination: &str, file_name: &str) -> String {
    line.replacen(url, &format!("{destination}{file_name}"), 1)
}
