//! fetching stylesheets and fonts over http

use std::io::Read;

use crate::error::Error;

/// The user agent we send when requesting the stylesheet.
///
/// The font api picks the font format (woff2, woff, ttf...) it links to based
/// on this value; this one gets woff2.
pub static USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko)";

/// A response whose body has not been read yet
pub struct Response {
    pub status: u16,
    pub status_text: String,
    pub body: Box<dyn Read>,
}

impl Response {
    /// `true` for any 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// "404 Not Found" and the like, for error messages
    pub fn status_line(&self) -> String {
        format!("{} {}", self.status, self.status_text)
    }
}

impl std::fmt::Debug for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Response")
            .field("status", &self.status)
            .field("status_text", &self.status_text)
            .finish_non_exhaustive()
    }
}

/// Something that can GET a url.
///
/// Error statuses are not errors at this level; they come back as a
/// `Response` and the caller decides what it accepts. Only failing to get a
/// response at all is an `Err`.
pub trait Fetch {
    fn get(&self, url: &str, user_agent: Option<&str>) -> Result<Response, Error>;
}

/// A blocking http client
#[derive(Clone)]
pub struct HttpFetcher {
    agent: ureq::Agent,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            agent: ureq::AgentBuilder::new().build(),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetch for HttpFetcher {
    fn get(&self, url: &str, user_agent: Option<&str>) -> Result<Response, Error> {
        let mut req = self.agent.get(url);
        if let Some(user_agent) = user_agent {
            req = req.set("User-Agent", user_agent);
        }
        let resp = match req.call() {
            Ok(resp) => resp,
            Err(ureq::Error::Status(_, resp)) => resp,
            Err(e) => {
                return Err(Error::Http {
                    url: url.to_owned(),
                    source: Box::new(e),
                })
            }
        };
        log::trace!("GET {url}: {}", resp.status());
        Ok(Response {
            status: resp.status(),
            status_text: resp.status_text().to_owned(),
            body: Box::new(resp.into_reader()),
        })
    }
}

/// Request the stylesheet at `url`, returning its body.
pub fn fetch_stylesheet(fetcher: &impl Fetch, url: &str) -> Result<Box<dyn Read>, Error> {
    log::info!("fetching stylesheet {url}");
    let resp = fetcher.get(url, Some(USER_AGENT))?;
    if !resp.is_success() {
        return Err(Error::BadStatus {
            url: url.to_owned(),
            status: resp.status_line(),
        });
    }
    Ok(resp.body)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::{
        cell::RefCell,
        collections::HashMap,
        io::{Cursor, Read, Write},
        net::TcpListener,
        thread::JoinHandle,
    };

    use super::*;

    /// Serves canned bodies from memory and remembers what was asked for.
    #[derive(Default)]
    pub(crate) struct MockFetcher {
        pages: HashMap<String, (u16, Vec<u8>)>,
        pub(crate) requests: RefCell<Vec<(String, Option<String>)>>,
    }

    impl MockFetcher {
        pub(crate) fn with(mut self, url: &str, body: impl Into<Vec<u8>>) -> Self {
            self.pages.insert(url.to_owned(), (200, body.into()));
            self
        }

        pub(crate) fn with_status(mut self, url: &str, status: u16) -> Self {
            self.pages.insert(url.to_owned(), (status, Vec::new()));
            self
        }
    }

    impl Fetch for MockFetcher {
        fn get(&self, url: &str, user_agent: Option<&str>) -> Result<Response, Error> {
            self.requests
                .borrow_mut()
                .push((url.to_owned(), user_agent.map(str::to_owned)));
            let (status, body) = self.pages.get(url).cloned().unwrap_or((404, Vec::new()));
            let status_text = match status {
                200 => "OK",
                204 => "No Content",
                404 => "Not Found",
                _ => "Internal Server Error",
            };
            Ok(Response {
                status,
                status_text: status_text.into(),
                body: Box::new(Cursor::new(body)),
            })
        }
    }

    #[test]
    fn stylesheet_sends_user_agent() {
        let fetcher = MockFetcher::default().with("https://x/css", "body {}");
        let mut body = String::new();
        fetch_stylesheet(&fetcher, "https://x/css")
            .unwrap()
            .read_to_string(&mut body)
            .unwrap();
        assert_eq!(body, "body {}");
        assert_eq!(
            fetcher.requests.borrow()[0],
            ("https://x/css".to_owned(), Some(USER_AGENT.to_owned()))
        );
    }

    #[test]
    fn stylesheet_error_status() {
        let fetcher = MockFetcher::default().with_status("https://x/css", 500);
        let Err(err) = fetch_stylesheet(&fetcher, "https://x/css") else {
            panic!("500 should be an error");
        };
        assert!(matches!(err, Error::BadStatus { status, .. } if status == "500 Internal Server Error"));
    }

    #[test]
    fn any_2xx_is_success() {
        let fetcher = MockFetcher::default().with_status("https://x/css", 204);
        assert!(fetch_stylesheet(&fetcher, "https://x/css").is_ok());
    }

    /// Answer a single request on localhost with `status_line` and `body`.
    ///
    /// The thread returns the raw request head it received.
    fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/css", listener.local_addr().unwrap());
        let handle = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut chunk = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut chunk).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..n]);
            }
            write!(
                stream,
                "HTTP/1.1 {status_line}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            )
            .unwrap();
            String::from_utf8_lossy(&request).into_owned()
        });
        (url, handle)
    }

    #[test]
    fn http_sends_user_agent() {
        let (url, server) = serve_once("200 OK", "@font-face {}");
        let mut resp = HttpFetcher::new().get(&url, Some(USER_AGENT)).unwrap();
        let mut body = String::new();
        resp.body.read_to_string(&mut body).unwrap();
        let request = server.join().unwrap().to_lowercase();

        assert_eq!(resp.status, 200);
        assert_eq!(body, "@font-face {}");
        assert!(request.starts_with("get /css "));
        assert!(request.contains(&format!("user-agent: {}\r\n", USER_AGENT.to_lowercase())));
    }

    #[test]
    fn http_error_status_is_a_response() {
        let (url, server) = serve_once("404 Not Found", "");
        let resp = HttpFetcher::new().get(&url, None).unwrap();
        let request = server.join().unwrap();

        assert_eq!(resp.status, 404);
        assert_eq!(resp.status_line(), "404 Not Found");
        assert!(!request.contains(USER_AGENT));
    }
}
