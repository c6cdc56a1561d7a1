//! downloading fonts to content-addressed files

use std::{
    io::{self, Write},
    path::Path,
};

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

use crate::{error::Error, fetch::Fetch};

static TEMP_FILE_PREFIX: &str = "download-";

/// Download the font at `url` into `dir`, naming it after its contents.
///
/// The body is hashed as it is written, and the finished file is renamed to
/// `{base64url(md5)}{ext}` where `ext` comes from the url path. Returns that
/// file name.
///
/// Downloading the same bytes twice produces the same name; the second copy
/// replaces the first.
pub fn download_font(fetcher: &impl Fetch, url: &str, dir: &Path) -> Result<String, Error> {
    let mut resp = fetcher.get(url, None)?;
    if resp.status != 200 {
        return Err(Error::BadStatus {
            url: url.to_owned(),
            status: resp.status_line(),
        });
    }

    let extension = extension_from_url(url);
    // the temp file is deleted when this goes out of scope, unless persisted
    let mut temp = tempfile::Builder::new()
        .prefix(TEMP_FILE_PREFIX)
        .suffix(extension)
        .tempfile_in(dir)
        .map_err(Error::io(dir))?;
    let temp_path = temp.path().to_owned();

    let mut writer = HashingWriter::new(temp.as_file_mut());
    io::copy(&mut resp.body, &mut writer).map_err(Error::io(&temp_path))?;
    writer.flush().map_err(Error::io(&temp_path))?;
    let digest = writer.finish();

    let file_name = format!("{}{extension}", URL_SAFE_NO_PAD.encode(digest.0));
    let final_path = dir.join(&file_name);
    temp.persist(&final_path)
        .map_err(|e| Error::io(&final_path)(e.error))?;

    log::debug!("downloaded {url} to {}", final_path.display());
    Ok(file_name)
}

/// Writes through to `inner`, feeding everything written to an md5 hasher.
struct HashingWriter<W> {
    inner: W,
    hasher: md5::Context,
}

impl<W: Write> HashingWriter<W> {
    fn new(inner: W) -> Self {
        Self {
            inner,
            hasher: md5::Context::new(),
        }
    }

    fn finish(self) -> md5::Digest {
        self.hasher.compute()
    }
}

impl<W: Write> Write for HashingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.hasher.consume(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// The extension of the last path segment, including the dot, or "".
///
/// The query string and fragment are ignored.
fn extension_from_url(url: &str) -> &str {
    let without_scheme = url.split_once("://").map(|(_, rest)| rest).unwrap_or(url);
    let path = without_scheme
        .split(['?', '#'])
        .next()
        .unwrap_or(without_scheme);
    // a url with no path at all has no extension (don't return '.com')
    let Some((_, path)) = path.split_once('/') else {
        return "";
    };
    let file_name = path.rsplit('/').next().unwrap_or(path);
    file_name.rfind('.').map(|i| &file_name[i..]).unwrap_or("")
}
