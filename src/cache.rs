//! Dataset source resolution and local file cache.
//!
//! A dataset is either a CSV on the local filesystem or a remote URL. Remote
//! files are downloaded once into the cache directory and reused until the
//! configured URL changes. Gzip-compressed sources are decompressed next to
//! the cached copy.

use crate::config;
use crate::error::{InsightsError, Result};
use flate2::read::GzDecoder;
use reqwest::blocking::Client;
use std::fmt;
use std::fs;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Where the sales CSV comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    /// A CSV (or `.csv.gz`) file on disk.
    Path(PathBuf),
    /// An `http(s)` URL downloaded into the cache directory.
    Url(String),
}

impl DatasetSource {
    /// Interpret a string as a URL when it has an `http://` or `https://`
    /// scheme, otherwise as a filesystem path.
    pub fn parse(raw: &str) -> Self {
        if raw.starts_with("http://") || raw.starts_with("https://") {
            DatasetSource::Url(raw.to_string())
        } else {
            DatasetSource::Path(PathBuf::from(raw))
        }
    }

    fn is_gzip(&self) -> bool {
        match self {
            DatasetSource::Path(p) => p.extension().and_then(|e| e.to_str()) == Some("gz"),
            DatasetSource::Url(u) => u.ends_with(".gz"),
        }
    }
}

impl Default for DatasetSource {
    fn default() -> Self {
        DatasetSource::Path(PathBuf::from(config::DEFAULT_DATASET_PATH))
    }
}

impl fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetSource::Path(p) => write!(f, "{}", p.display()),
            DatasetSource::Url(u) => f.write_str(u),
        }
    }
}

/// Resolves a [`DatasetSource`] to a readable local CSV path.
pub struct CacheManager {
    /// Directory where downloaded and decompressed files are stored.
    pub cache_dir: PathBuf,
    /// If true, never download (use cached files only).
    pub offline: bool,
    timeout: Duration,
    client: Option<Client>,
}

impl CacheManager {
    /// Create a new cache manager.
    ///
    /// If `cache_dir` is `None`, uses the platform-appropriate default cache directory.
    /// Creates the cache directory if it does not exist.
    pub fn new(cache_dir: Option<PathBuf>, offline: bool, timeout: Duration) -> Result<Self> {
        let dir = cache_dir.unwrap_or_else(config::default_cache_dir);
        fs::create_dir_all(&dir)?;
        Ok(Self {
            cache_dir: dir,
            offline,
            timeout,
            client: None,
        })
    }

    /// Lazy HTTP client, created on first use.
    fn client(&mut self) -> Result<Client> {
        if let Some(client) = &self.client {
            return Ok(client.clone());
        }
        let client = Client::builder()
            .timeout(self.timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        self.client = Some(client.clone());
        Ok(client)
    }

    /// The URL the cached copy was downloaded from, if any.
    fn cached_source(&self) -> Option<String> {
        let marker = self.cache_dir.join(config::SOURCE_MARKER_FILE);
        fs::read_to_string(marker).ok().map(|s| s.trim().to_string())
    }

    fn save_source(&self, url: &str) {
        let marker = self.cache_dir.join(config::SOURCE_MARKER_FILE);
        if let Err(e) = fs::write(marker, url) {
            warn!(error = %e, "failed to record dataset source");
        }
    }

    /// Return a local path to an uncompressed CSV for `source`, downloading
    /// and decompressing as needed.
    pub fn ensure_dataset(&mut self, source: &DatasetSource) -> Result<PathBuf> {
        let raw = match source {
            DatasetSource::Path(path) => {
                if !path.exists() {
                    return Err(InsightsError::NotFound(format!(
                        "Dataset file {} does not exist",
                        path.display()
                    )));
                }
                path.clone()
            }
            DatasetSource::Url(url) => self.ensure_remote(url, source.is_gzip())?,
        };

        if source.is_gzip() {
            let out = self.cache_dir.join(config::CACHED_DATASET_FILE);
            decompress_gzip(&raw, &out)?;
            Ok(out)
        } else {
            Ok(raw)
        }
    }

    fn ensure_remote(&mut self, url: &str, gzip: bool) -> Result<PathBuf> {
        let filename = if gzip {
            format!("{}.gz", config::CACHED_DATASET_FILE)
        } else {
            config::CACHED_DATASET_FILE.to_string()
        };
        let local_path = self.cache_dir.join(filename);
        let fresh = local_path.exists() && self.cached_source().as_deref() == Some(url);

        if fresh {
            debug!(path = %local_path.display(), "using cached dataset");
            return Ok(local_path);
        }
        if self.offline {
            if local_path.exists() {
                warn!(url, "offline: cached dataset came from a different source");
            }
            return Err(InsightsError::NotFound(format!(
                "Dataset {} not cached and offline mode is enabled",
                url
            )));
        }

        self.download_file(url, &local_path)?;
        self.save_source(url);
        Ok(local_path)
    }

    /// Download `url` to `dest`.
    ///
    /// Writes to a temp file first and renames on success, so an interrupted
    /// download never leaves a partial file behind.
    fn download_file(&mut self, url: &str, dest: &Path) -> Result<()> {
        info!(url, "downloading dataset");

        let tmp_dest = with_tmp_suffix(dest);
        let client = self.client()?;
        let result = (|| -> Result<()> {
            let resp = client.get(url).send()?.error_for_status()?;
            let bytes = resp.bytes()?;
            fs::write(&tmp_dest, &bytes)?;
            fs::rename(&tmp_dest, dest)?;
            Ok(())
        })();

        if result.is_err() {
            let _ = fs::remove_file(&tmp_dest);
        }
        result
    }

    /// Remove all cached files and recreate the cache directory.
    pub fn clear(&self) -> Result<()> {
        if self.cache_dir.exists() {
            fs::remove_dir_all(&self.cache_dir)?;
            fs::create_dir_all(&self.cache_dir)?;
        }
        Ok(())
    }
}

fn with_tmp_suffix(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Inflate a gzip file into `out`, replacing any previous copy.
fn decompress_gzip(src: &Path, out: &Path) -> Result<()> {
    let tmp = with_tmp_suffix(out);
    let result = (|| -> Result<()> {
        let mut decoder = GzDecoder::new(BufReader::new(fs::File::open(src)?));
        let mut file = fs::File::create(&tmp)?;
        io::copy(&mut decoder, &mut file)?;
        fs::rename(&tmp, out)?;
        Ok(())
    })();
    if let Err(e) = &result {
        warn!(src = %src.display(), error = %e, "failed to decompress dataset");
        let _ = fs::remove_file(&tmp);
    }
    result
}
