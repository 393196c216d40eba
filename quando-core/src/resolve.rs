//! Deciding where a calendar's ICS text comes from.
//!
//! The dash name always reads standard input. Other names are fetched from
//! their registered URL, falling back to the cached copy when the fetch
//! fails, or read straight from the cache when asked to. Text only reaches
//! the cache once it has parsed as a calendar.

use std::future::Future;
use std::io::Read;
use std::time::Duration;

use crate::error::{QuandoError, QuandoResult};
use crate::ics::Calendar;
use crate::store::{Cache, Registry};

/// Calendar name that means "read the document from standard input".
pub const STDIN_NAME: &str = "-";

/// Where the text of a calendar was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Stdin,
    Fetch,
    Cache,
}

impl Source {
    /// Chosen from the request alone, before the registry is consulted.
    pub fn select(name: &str, prefer_cache: bool) -> Self {
        if name == STDIN_NAME {
            Source::Stdin
        } else if prefer_cache {
            Source::Cache
        } else {
            Source::Fetch
        }
    }
}

/// A `show` request.
#[derive(Debug, Clone, Default)]
pub struct ShowRequest {
    pub name: String,
    /// Remember this URL for `name` before resolving
    pub url: Option<String>,
    pub prefer_cache: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub text: String,
    /// `text`, parsed
    pub calendar: Calendar,
    /// The source that actually produced `text`
    pub source: Source,
}

impl Resolved {
    fn parse(text: String, source: Source) -> QuandoResult<Self> {
        let calendar = Calendar::parse(&text)?;
        Ok(Resolved {
            text,
            calendar,
            source,
        })
    }
}

/// Retrieves a calendar document over the network.
pub trait Fetch {
    fn fetch(&self, url: &str) -> impl Future<Output = QuandoResult<String>>;
}

/// HTTP(S) fetcher with a bounded request time.
///
/// The client is only built when a fetch happens, so requests served from
/// stdin or the cache never depend on it.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Self {
        HttpFetcher { timeout }
    }

    fn client(&self) -> reqwest::Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("quando/", env!("CARGO_PKG_VERSION")))
            .build()
    }
}

impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> QuandoResult<String> {
        let fetch_err = |e: reqwest::Error| QuandoError::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        };

        let target = http_url(url);
        let response = self
            .client()
            .map_err(fetch_err)?
            .get(&*target)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(fetch_err)?;

        let text = response.text().await.map_err(fetch_err)?;
        log::debug!("Fetched {} bytes from {}", text.len(), url);
        Ok(text)
    }
}

/// `webcal://` is plain HTTPS for our purposes.
fn http_url(url: &str) -> std::borrow::Cow<'_, str> {
    match url.strip_prefix("webcal://") {
        Some(rest) => format!("https://{rest}").into(),
        None => url.into(),
    }
}

/// Produce the calendar for `request.name`, updating and persisting both stores.
///
/// The registry must be saved for this to succeed; the cache is written on a
/// best-effort basis. Text from stdin or the cache that does not parse is an
/// error and leaves both stores untouched on disk.
pub async fn resolve<F, R>(
    request: &ShowRequest,
    registry: &mut Registry,
    cache: &mut Cache,
    fetcher: &F,
    stdin: R,
) -> QuandoResult<Resolved>
where
    F: Fetch,
    R: Read,
{
    let name = request.name.as_str();

    if let Some(url) = &request.url {
        registry.insert(name, url);
    }

    let resolved = match Source::select(name, request.prefer_cache) {
        Source::Stdin => Resolved::parse(read_all(stdin)?, Source::Stdin)?,
        source => {
            let url = registry
                .get(name)
                .ok_or_else(|| QuandoError::UnknownCalendar(name.to_string()))?;

            let fetched = match source {
                Source::Fetch => match fetch_calendar(fetcher, url).await {
                    Ok(resolved) => Some(resolved),
                    Err(e) => {
                        log::warn!("{e}");
                        log::warn!("Will try local cache.");
                        None
                    }
                },
                _ => None,
            };

            match fetched {
                Some(resolved) => resolved,
                None => Resolved::parse(cached(cache, name)?, Source::Cache)?,
            }
        }
    };

    log::debug!("Using {:?} text for calendar {}", resolved.source, name);

    cache.insert(name, &resolved.text);
    cache.save_or_warn();
    registry.save()?;

    Ok(resolved)
}

/// A body that is not a calendar (a login page, an HTML error) counts as a
/// failed fetch.
async fn fetch_calendar<F: Fetch>(fetcher: &F, url: &str) -> QuandoResult<Resolved> {
    let text = fetcher.fetch(url).await?;
    Resolved::parse(text, Source::Fetch).map_err(|e| QuandoError::Fetch {
        url: url.to_string(),
        reason: format!("response is not a calendar ({e})"),
    })
}

fn cached(cache: &Cache, name: &str) -> QuandoResult<String> {
    cache
        .get(name)
        .map(str::to_string)
        .ok_or_else(|| QuandoError::NotCached {
            name: name.to_string(),
            path: cache.path().to_path_buf(),
        })
}

fn read_all<R: Read>(mut stdin: R) -> QuandoResult<String> {
    let mut text = String::new();
    stdin.read_to_string(&mut text).map_err(QuandoError::Stdin)?;
    Ok(text)
}
