//! Cache directory resolution for XDG, Hugging Face and ModelScope.
//!
//! Every lookup follows one rule: when the environment variable is set its
//! value must name an existing directory; otherwise the `~`-expanded default
//! must exist. Nothing is created.

use super::EnvError;
use super::Result;
use super::path::expand_home_with;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use tracing::debug;
use tracing::error;

/// Resolves cache directories from an environment and a home directory.
///
/// [`CacheLocator::from_process`] reads the real process environment; tests
/// and embedders can supply their own lookup.
///
/// # Examples
///
/// ```no_run
/// use cachepack_core::env::cache::CacheLocator;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let locator = CacheLocator::from_process();
/// let snapshot = locator.hf_model_path("bert-base/uncased")?;
/// println!("{}", snapshot.display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CacheLocator<E = fn(&str) -> Option<OsString>> {
    env: E,
    home: Option<PathBuf>,
}

impl CacheLocator {
    /// Locator backed by `std::env::var_os` and the current user's home.
    #[must_use]
    pub fn from_process() -> Self {
        Self {
            env: |key| std::env::var_os(key),
            home: home::home_dir(),
        }
    }
}

impl<E> CacheLocator<E>
where
    E: Fn(&str) -> Option<OsString>,
{
    /// Locator with an explicit variable lookup and home directory.
    pub fn new(env: E, home: Option<PathBuf>) -> Self {
        Self { env, home }
    }

    /// Returns the value of `var` when set, else the expanded `default`.
    /// Either way the result must be an existing directory.
    ///
    /// # Errors
    ///
    /// `EnvError::NotADirectory` when the path is a file, `EnvError::Io`
    /// when it does not exist, or a home expansion error.
    pub fn dir_from_env(&self, var: &str, default: &str) -> Result<PathBuf> {
        if let Some(value) = (self.env)(var) {
            return existing_dir(PathBuf::from(value)).inspect_err(|e| error!("{var}: {e}"));
        }
        existing_dir(self.expand(default)?)
    }

    /// `XDG_CACHE_HOME`, default `~/.cache`.
    ///
    /// # Errors
    ///
    /// See [`CacheLocator::dir_from_env`].
    pub fn xdg_cache_home(&self) -> Result<PathBuf> {
        self.dir_from_env("XDG_CACHE_HOME", "~/.cache")
    }

    /// `HF_HOME`, default `~/.cache/huggingface`.
    ///
    /// # Errors
    ///
    /// See [`CacheLocator::dir_from_env`].
    pub fn hf_home(&self) -> Result<PathBuf> {
        self.dir_from_env("HF_HOME", "~/.cache/huggingface")
    }

    /// `HUGGINGFACE_HUB_CACHE` when set, else `<hf_home>/hub`.
    ///
    /// # Errors
    ///
    /// See [`CacheLocator::dir_from_env`].
    pub fn huggingface_hub_cache(&self) -> Result<PathBuf> {
        let cache = if (self.env)("HUGGINGFACE_HUB_CACHE").is_some() {
            self.dir_from_env("HUGGINGFACE_HUB_CACHE", "~/.cache/huggingface/hub")?
        } else {
            existing_dir(self.hf_home()?.join("hub"))?
        };
        debug!("huggingface hub cache: {}", cache.display());
        Ok(cache)
    }

    /// `HF_DATASETS_CACHE` when set, else `<hf_home>/datasets`.
    ///
    /// # Errors
    ///
    /// See [`CacheLocator::dir_from_env`].
    pub fn hf_datasets_cache(&self) -> Result<PathBuf> {
        if (self.env)("HF_DATASETS_CACHE").is_some() {
            self.dir_from_env("HF_DATASETS_CACHE", "~/.cache/huggingface/datasets")
        } else {
            existing_dir(self.hf_home()?.join("datasets"))
        }
    }

    /// Snapshot directory of the `main` revision of a hub model, for
    /// example `org/name` → `<hub>/models--org--name/snapshots/<oid>`.
    ///
    /// # Errors
    ///
    /// Fails when the hub cache, `refs/main` or the snapshot is missing.
    pub fn hf_model_path(&self, repo: &str) -> Result<PathBuf> {
        snapshot_path(&self.huggingface_hub_cache()?, "models", repo)
    }

    /// Snapshot directory of the `main` revision of a hub dataset.
    ///
    /// # Errors
    ///
    /// Fails when the hub cache, `refs/main` or the snapshot is missing.
    pub fn hf_dataset_path(&self, repo: &str) -> Result<PathBuf> {
        snapshot_path(&self.huggingface_hub_cache()?, "datasets", repo)
    }

    /// Parent of `MODELSCOPE_CACHE` when set, else `MC_HOME` (default
    /// `~/.cache/modelscope`).
    ///
    /// # Errors
    ///
    /// See [`CacheLocator::dir_from_env`].
    pub fn modelscope_home(&self) -> Result<PathBuf> {
        if let Some(cache) = (self.env)("MODELSCOPE_CACHE") {
            let cache = self.expand(&cache.to_string_lossy())?;
            let parent = cache.parent().map_or_else(|| cache.clone(), Path::to_path_buf);
            return existing_dir(parent);
        }
        self.dir_from_env("MC_HOME", "~/.cache/modelscope")
    }

    /// `MODELSCOPE_CACHE`, default `~/.cache/modelscope/hub`.
    ///
    /// # Errors
    ///
    /// See [`CacheLocator::dir_from_env`].
    pub fn modelscope_hub_cache(&self) -> Result<PathBuf> {
        self.dir_from_env("MODELSCOPE_CACHE", "~/.cache/modelscope/hub")
    }

    fn expand(&self, path: &str) -> Result<PathBuf> {
        expand_home_with(Path::new(path), self.home.as_deref())
    }
}

fn existing_dir(path: PathBuf) -> Result<PathBuf> {
    match fs::metadata(&path) {
        Ok(meta) if meta.is_dir() => Ok(path),
        Ok(_) => Err(EnvError::NotADirectory { path }),
        Err(e) => Err(EnvError::Io(io::Error::new(
            e.kind(),
            format!("{}: {e}", path.display()),
        ))),
    }
}

fn snapshot_path(hub: &Path, prefix: &str, repo: &str) -> Result<PathBuf> {
    let repo_dir = hub.join(format!("{prefix}--{}", repo.replace('/', "--")));
    let refs = repo_dir.join("refs").join("main");
    let oid = fs::read_to_string(&refs)
        .map_err(|e| EnvError::Io(io::Error::new(e.kind(), format!("{}: {e}", refs.display()))))?;
    existing_dir(repo_dir.join("snapshots").join(oid.trim()))
}

/// [`CacheLocator::dir_from_env`] against the current process.
///
/// # Errors
///
/// See [`CacheLocator::dir_from_env`].
pub fn dir_from_env(var: &str, default: &str) -> Result<PathBuf> {
    CacheLocator::from_process().dir_from_env(var, default)
}

/// Snapshot of a hub model in the current process's cache.
///
/// # Errors
///
/// See [`CacheLocator::hf_model_path`].
pub fn hf_model_path(repo: &str) -> Result<PathBuf> {
    CacheLocator::from_process().hf_model_path(repo)
}

/// Snapshot of a hub dataset in the current process's cache.
///
/// # Errors
///
/// See [`CacheLocator::hf_dataset_path`].
pub fn hf_dataset_path(repo: &str) -> Result<PathBuf> {
    CacheLocator::from_process().hf_dataset_path(repo)
}

/// `XDG_CACHE_HOME` of the current process.
///
/// # Errors
///
/// See [`CacheLocator::dir_from_env`].
pub fn xdg_cache_home() -> Result<PathBuf> {
    CacheLocator::from_process().xdg_cache_home()
}

/// `HF_HOME` of the current process.
///
/// # Errors
///
/// See [`CacheLocator::dir_from_env`].
pub fn hf_home() -> Result<PathBuf> {
    CacheLocator::from_process().hf_home()
}

/// Hugging Face hub cache of the current process.
///
/// # Errors
///
/// See [`CacheLocator::dir_from_env`].
pub fn huggingface_hub_cache() -> Result<PathBuf> {
    CacheLocator::from_process().huggingface_hub_cache()
}

/// Hugging Face datasets cache of the current process.
///
/// # Errors
///
/// See [`CacheLocator::dir_from_env`].
pub fn hf_datasets_cache() -> Result<PathBuf> {
    CacheLocator::from_process().hf_datasets_cache()
}

/// ModelScope home of the current process.
///
/// # Errors
///
/// See [`CacheLocator::dir_from_env`].
pub fn modelscope_home() -> Result<PathBuf> {
    CacheLocator::from_process().modelscope_home()
}

/// ModelScope hub cache of the current process.
///
/// # Errors
///
/// See [`CacheLocator::dir_from_env`].
pub fn modelscope_hub_cache() -> Result<PathBuf> {
    CacheLocator::from_process().modelscope_hub_cache()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn locator(
        home: &Path,
        vars: &[(&str, &Path)],
    ) -> CacheLocator<impl Fn(&str) -> Option<OsString> + use<>> {
        let vars: HashMap<String, OsString> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.as_os_str().to_os_string()))
            .collect();
        CacheLocator::new(move |key| vars.get(key).cloned(), Some(home.to_path_buf()))
    }

    #[test]
    fn test_default_under_home() {
        let home = TempDir::new().unwrap();
        fs::create_dir_all(home.path().join(".cache/huggingface/hub")).unwrap();
        let locator = locator(home.path(), &[]);

        assert_eq!(locator.xdg_cache_home().unwrap(), home.path().join(".cache"));
        assert_eq!(
            locator.huggingface_hub_cache().unwrap(),
            home.path().join(".cache/huggingface/hub")
        );
    }

    #[test]
    fn test_missing_default_is_error() {
        let home = TempDir::new().unwrap();
        let locator = locator(home.path(), &[]);
        assert!(matches!(locator.hf_home(), Err(EnvError::Io(_))));
    }

    #[test]
    fn test_env_override_must_be_directory() {
        let home = TempDir::new().unwrap();
        let file = home.path().join("not-a-dir");
        fs::write(&file, b"").unwrap();

        let locator = locator(home.path(), &[("HF_HOME", &file)]);
        assert!(matches!(
            locator.hf_home(),
            Err(EnvError::NotADirectory { .. })
        ));
    }

    #[test]
    fn test_datasets_cache_from_hf_home() {
        let home = TempDir::new().unwrap();
        let hf = home.path().join("hf");
        fs::create_dir_all(hf.join("datasets")).unwrap();

        let locator = locator(home.path(), &[("HF_HOME", &hf)]);
        assert_eq!(locator.hf_datasets_cache().unwrap(), hf.join("datasets"));
    }

    #[test]
    fn test_hf_model_path_reads_main_ref() {
        let home = TempDir::new().unwrap();
        let hub = home.path().join("hub");
        let repo = hub.join("models--org--name");
        fs::create_dir_all(repo.join("refs")).unwrap();
        fs::create_dir_all(repo.join("snapshots/abc123")).unwrap();
        fs::write(repo.join("refs/main"), "abc123\n").unwrap();

        let locator = locator(home.path(), &[("HUGGINGFACE_HUB_CACHE", &hub)]);
        assert_eq!(
            locator.hf_model_path("org/name").unwrap(),
            repo.join("snapshots/abc123")
        );
        assert!(locator.hf_dataset_path("org/name").is_err());
    }

    #[test]
    fn test_modelscope_home_is_parent_of_cache() {
        let home = TempDir::new().unwrap();
        let cache = home.path().join("ms/hub");
        fs::create_dir_all(&cache).unwrap();

        let locator = locator(home.path(), &[("MODELSCOPE_CACHE", &cache)]);
        assert_eq!(locator.modelscope_home().unwrap(), home.path().join("ms"));
        assert_eq!(locator.modelscope_hub_cache().unwrap(), cache);
    }

    #[test]
    fn test_modelscope_home_default() {
        let home = TempDir::new().unwrap();
        fs::create_dir_all(home.path().join(".cache/modelscope")).unwrap();
        let locator = locator(home.path(), &[]);
        assert_eq!(
            locator.modelscope_home().unwrap(),
            home.path().join(".cache/modelscope")
        );
    }
}
