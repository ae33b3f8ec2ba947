use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::shared::constants::APP_CACHE_NAME;

#[derive(Error, Debug)]
pub enum ModelResolveError {
    #[error("failed to create cache directory: {0}")]
    CacheDir(#[source] std::io::Error),
    #[error("download failed for {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to write model to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not determine cache directory")]
    NoCacheDir,
    #[error("model {name} not found in {searched} and no download URL is configured")]
    NotFound { name: String, searched: String },
}

/// Progress callback: `(bytes_downloaded, total_bytes)`.
/// `total_bytes` is 0 if the server didn't provide Content-Length.
pub type ProgressFn = Box<dyn Fn(u64, u64) + Send>;

/// Locates model files on disk, downloading them into the cache when absent.
///
/// Lookup order: cache directory, then the optional bundled directory, then
/// a download into the cache directory. Without a URL a model that is not on
/// disk is a [`ModelResolveError::NotFound`].
#[derive(Clone, Debug)]
pub struct ModelResolver {
    cache_dir: PathBuf,
    bundled_dir: Option<PathBuf>,
}

impl ModelResolver {
    pub fn new(cache_dir: PathBuf, bundled_dir: Option<PathBuf>) -> Self {
        Self {
            cache_dir,
            bundled_dir,
        }
    }

    /// Resolver rooted at the platform's per-user model cache.
    pub fn from_user_cache(bundled_dir: Option<PathBuf>) -> Result<Self, ModelResolveError> {
        Ok(Self::new(model_cache_dir()?, bundled_dir))
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn resolve(
        &self,
        name: &str,
        url: Option<&str>,
        progress: Option<ProgressFn>,
    ) -> Result<PathBuf, ModelResolveError> {
        let cached_path = self.cache_dir.join(name);
        if cached_path.exists() {
            log::debug!("Model {name} found in cache at {}", cached_path.display());
            return Ok(cached_path);
        }

        if let Some(dir) = &self.bundled_dir {
            let bundled_path = dir.join(name);
            if bundled_path.exists() {
                log::debug!("Model {name} found bundled at {}", bundled_path.display());
                return Ok(bundled_path);
            }
        }

        let Some(url) = url else {
            return Err(ModelResolveError::NotFound {
                name: name.to_string(),
                searched: self.searched_dirs(),
            });
        };

        log::info!("Downloading model {name} from {url}");
        fs::create_dir_all(&self.cache_dir).map_err(ModelResolveError::CacheDir)?;
        download(url, &cached_path, progress)?;
        Ok(cached_path)
    }

    fn searched_dirs(&self) -> String {
        match &self.bundled_dir {
            Some(dir) => format!("{} or {}", self.cache_dir.display(), dir.display()),
            None => self.cache_dir.display().to_string(),
        }
    }
}

/// Platform-specific model cache directory.
///
/// - macOS: `~/Library/Application Support/HandCue/models/`
/// - Linux: `$XDG_CACHE_HOME/HandCue/models/` or `~/.cache/HandCue/models/`
/// - Windows: `%LOCALAPPDATA%/HandCue/models/`
pub fn model_cache_dir() -> Result<PathBuf, ModelResolveError> {
    #[cfg(target_os = "macos")]
    let base = dirs::data_dir();
    #[cfg(not(target_os = "macos"))]
    let base = dirs::cache_dir();

    base.map(|d| d.join(APP_CACHE_NAME).join("models"))
        .ok_or(ModelResolveError::NoCacheDir)
}

fn download(url: &str, dest: &Path, progress: Option<ProgressFn>) -> Result<(), ModelResolveError> {
    let download_err = |source| ModelResolveError::Download {
        url: url.to_string(),
        source,
    };

    let response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(download_err)?;
    let total = response.content_length().unwrap_or(0);
    let bytes = response.bytes().map_err(download_err)?;

    // Write to a sibling temp file, then rename into place.
    let temp_path = dest.with_extension("part");
    let write_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source| ModelResolveError::Write { path, source }
    };

    let result = (|| {
        let mut file = fs::File::create(&temp_path).map_err(write_err(&temp_path))?;
        let mut downloaded: u64 = 0;
        for chunk in bytes.chunks(1024 * 1024) {
            file.write_all(chunk).map_err(write_err(&temp_path))?;
            downloaded += chunk.len() as u64;
            if let Some(ref cb) = progress {
                cb(downloaded, total);
            }
        }
        file.flush().map_err(write_err(&temp_path))?;
        drop(file);
        fs::rename(&temp_path, dest).map_err(write_err(dest))
    })();

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}
