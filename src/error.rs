use std::{fmt::Display, path::PathBuf};

/// A little helper trait for reporting results we can't recover from
pub trait UnwrapOrDie<T, E> {
    // print_msg should be a closure that eprints a message before termination
    fn unwrap_or_die(self, print_msg: impl FnOnce(E)) -> T;
}

impl<T, E: Display> UnwrapOrDie<T, E> for Result<T, E> {
    fn unwrap_or_die(self, print_msg: impl FnOnce(E)) -> T {
        match self {
            Ok(val) => val,
            Err(e) => {
                print_msg(e);
                std::process::exit(1)
            }
        }
    }
}

/// Everything that can stop a run.
///
/// None of these are recovered from; the binary reports the error and exits.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("URL is required")]
    MissingUrl,
    #[error("request to '{url}' failed: {source}")]
    Http {
        url: String,
        source: Box<ureq::Error>,
    },
    #[error("failed to download '{url}': {status}")]
    BadStatus { url: String, status: String },
    #[error("no URL found in the input line '{line}'")]
    NoUrlFound { line: String },
    #[error("no URL found in the input line '{line}': {reason}")]
    UnsupportedLine { line: String, reason: &'static str },
    #[error("failed reading '{url}': {source}")]
    Read {
        url: String,
        source: std::io::Error,
    },
    #[error("io error at '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Error::Io { path, source }
    }
}
