use chrono::NaiveDateTime;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::blocking::{Client as HttpClient, Response};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::catalog::{Catalog, RemoteCatalog};
use crate::error::{Error, Result};
use crate::timeseries::{TimeSeries, parse_last_record};
use crate::util::format_query_time;

/// Default LaTiS data endpoint.
pub const LATIS_DATA_URL: &str = "https://lasp.colorado.edu/lisird/latis/dap";

/// Default remote catalog endpoint.
pub const LATIS_CATALOG_URL: &str =
    "https://lasp.colorado.edu/space-weather-portal/latis/catalog";

/// LaTiS directive selecting millisecond ISO timestamps in responses.
const FORMAT_TIME_DIRECTIVE: &str = "format_time(yyyy-MM-dd'T'HH:mm:ss.SSS)";

/// Blocking client for the LISIRD data portal.
///
/// Every fetch is a single synchronous GET; nothing is cached or retried, so
/// each call costs one network round trip. The loaded [`Catalog`] is the only
/// state beyond the HTTP connection pool.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    catalog_url: String,
    catalog: Catalog,
    timeout: Duration,
    progress: bool,

    http: HttpClient,
}

impl Client {
    /// Creates a client with the bundled catalog, the public LISIRD endpoints,
    /// and a 60 second request timeout.
    pub fn new() -> Result<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("lisird-rs/{}", env!("CARGO_PKG_VERSION")))
                .unwrap_or(HeaderValue::from_static("lisird-rs")),
        );

        let http = HttpClient::builder()
            .default_headers(default_headers)
            .build()?;

        Ok(Self {
            base_url: LATIS_DATA_URL.to_string(),
            catalog_url: LATIS_CATALOG_URL.to_string(),
            catalog: Catalog::bundled(),
            timeout: Duration::from_secs(60),
            progress: true,
            http,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_catalog_url(mut self, catalog_url: impl Into<String>) -> Self {
        self.catalog_url = catalog_url.into();
        self
    }

    /// Replaces the loaded catalog, e.g. with one from
    /// [`Catalog::from_file`] or a freshly fetched [`RemoteCatalog`].
    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// The catalog this client validates dataset names against.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Builds the query URL for a dataset over `[start, end)`.
    ///
    /// Fails before any network traffic if the range is empty or inverted, or
    /// if `dataset` is not in the loaded catalog.
    pub fn build_query_url(
        &self,
        dataset: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<String> {
        if end <= start {
            return Err(Error::InvalidTimeRange { start, end });
        }
        if !self.catalog.contains(dataset) {
            return Err(Error::UnknownDataset(dataset.to_string()));
        }

        Ok(format!(
            "{}/{}.csv?{}&time>={}&time<{}",
            self.base_url,
            dataset,
            FORMAT_TIME_DIRECTIVE,
            format_query_time(start),
            format_query_time(end),
        ))
    }

    /// Retrieves data from a dataset for a time range.
    pub fn fetch_range(
        &self,
        dataset: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<TimeSeries> {
        let url = self.build_query_url(dataset, start, end)?;
        debug!(%url, "fetching range");

        let body = self.get(&url)?.text()?;
        TimeSeries::from_csv(&body)
    }

    /// Retrieves data for a time range and streams it to a temporary file,
    /// returning the file path.
    ///
    /// The file is not deleted on drop; the caller owns cleanup or archival.
    /// Load it later with [`TimeSeries::from_path`].
    pub fn fetch_range_to_file(
        &self,
        dataset: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<PathBuf> {
        let url = self.build_query_url(dataset, start, end)?;
        debug!(%url, "downloading range to file");

        let mut resp = self.get(&url)?;

        let pb = if self.progress {
            let pb = match resp.content_length() {
                Some(total) => {
                    let pb = ProgressBar::new(total);
                    pb.set_style(
                        ProgressStyle::with_template(
                            "{spinner:.green} {bytes}/{total_bytes} ({bytes_per_sec}) {wide_bar}",
                        )
                        .unwrap()
                        .progress_chars("=>-"),
                    );
                    pb
                }
                None => ProgressBar::new_spinner(),
            };
            Some(pb)
        } else {
            None
        };

        let mut file = NamedTempFile::new()?;
        let mut buf = [0u8; 64 * 1024];
        loop {
            let n = resp.read(&mut buf)?;
            if n == 0 {
                break;
            }
            file.write_all(&buf[..n])?;
            if let Some(pb) = &pb {
                pb.inc(n as u64);
            }
        }
        file.flush()?;

        if let Some(pb) = &pb {
            pb.finish_and_clear();
        }

        let (_, path) = file.keep().map_err(|e| Error::Io(e.error))?;
        Ok(path)
    }

    /// Retrieves the most recent record of a dataset as a map from column
    /// name to value string.
    ///
    /// Validates catalog membership the same way [`fetch_range`](Self::fetch_range)
    /// does.
    pub fn fetch_latest(&self, dataset: &str) -> Result<BTreeMap<String, String>> {
        if !self.catalog.contains(dataset) {
            return Err(Error::UnknownDataset(dataset.to_string()));
        }

        let url = format!(
            "{}/{}.csv?last()&{}",
            self.base_url, dataset, FORMAT_TIME_DIRECTIVE
        );
        debug!(%url, "fetching latest record");

        let body = self.get(&url)?.text()?;
        parse_last_record(&body)
    }

    /// Fetches and parses the portal's catalog document.
    ///
    /// The result is not persisted anywhere; call
    /// [`with_catalog`](Self::with_catalog) with
    /// [`RemoteCatalog::to_catalog`] to use it for validation.
    pub fn fetch_catalog(&self) -> Result<RemoteCatalog> {
        let url = self.catalog_url.clone();
        debug!(%url, "fetching remote catalog");

        let body = self.get(&url)?.text()?;
        RemoteCatalog::from_json(&body)
    }

    /// Writes the raw catalog document to `target` for later offline loading.
    pub fn download_catalog(&self, target: &Path) -> Result<()> {
        debug!(url = %self.catalog_url, target = %target.display(), "saving catalog");

        let body = self.get(&self.catalog_url)?.text()?;
        std::fs::write(target, body)?;
        Ok(())
    }

    fn get(&self, url: &str) -> Result<Response> {
        let resp = self
            .http
            .get(url)
            .timeout(self.timeout)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Timeout {
                        url: url.to_string(),
                    }
                } else {
                    Error::Http(e)
                }
            })?;

        Ok(resp.error_for_status()?)
    }
}
