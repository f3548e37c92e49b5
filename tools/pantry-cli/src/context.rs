//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use pantry_cache::{Cache, SessionId};
use pantry_cart::{CartEvent, CartStore};

use crate::config::{CliConfig, CONFIG_NAMES};
use crate::output::Output;

/// Cache key holding the CLI's current session.
const CURRENT_SESSION_KEY: &str = "session:current";

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Path the config was loaded from, if any.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
    /// Persistence layer.
    pub cache: Cache,
    session_override: Option<String>,
}

impl Context {
    /// Load context from config file.
    pub fn load(
        config_path: Option<&str>,
        session_override: Option<String>,
        output: Output,
    ) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = if let Some(path) = config_path {
            let path = resolve_path(&cwd, path);
            (CliConfig::load(&path)?, Some(path))
        } else {
            match find_config(&cwd) {
                Some((config, path)) => (config, Some(path)),
                None => (CliConfig::default(), None),
            }
        };

        let data_dir = match &config.store.data_dir {
            Some(dir) => resolve_path(&cwd, &dir.to_string_lossy()),
            None => default_data_dir(),
        };
        let cache = Cache::open_dir(&data_dir)
            .with_context(|| format!("Failed to open cart store at {}", data_dir.display()))?;

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
            cache,
            session_override,
        })
    }

    /// Resolve the shopper session.
    ///
    /// Precedence: `--session`, then `[session] id`, then the session the
    /// CLI remembered last time. A fresh session is generated and
    /// remembered when none of these exist.
    pub fn session_id(&self) -> Result<SessionId> {
        if let Some(id) = &self.session_override {
            return Ok(SessionId::new(id.clone()));
        }
        if let Some(id) = &self.config.session.id {
            return Ok(SessionId::new(id.clone()));
        }
        match self.cache.get::<SessionId>(CURRENT_SESSION_KEY) {
            Ok(Some(id)) if !id.is_blank() => return Ok(id),
            Ok(_) => {}
            Err(e) => tracing::warn!(error = %e, "ignoring unreadable current session"),
        }
        self.start_session()
    }

    /// Generate a new session and remember it as current.
    pub fn start_session(&self) -> Result<SessionId> {
        let id = SessionId::generate();
        self.cache
            .set(CURRENT_SESSION_KEY, &id)
            .context("Failed to remember session")?;
        tracing::debug!(session = %id, "started new session");
        Ok(id)
    }

    /// Open the cart for the current session.
    ///
    /// Failed snapshot writes are reported as warnings, since the change is
    /// lost when the process exits.
    pub fn open_cart(&self) -> Result<CartStore> {
        let session = self.session_id()?;
        self.output.debug(&format!("Using session {}", session));
        let mut cart =
            CartStore::open_with_options(self.cache.clone(), session, self.config.cart.clone());

        let output = self.output.clone();
        cart.subscribe(move |event| {
            if let Some(msg) = persist_warning(event) {
                output.warn(&msg);
            }
        });
        Ok(cart)
    }
}

/// Warning shown when a cart change could not be saved.
fn persist_warning(event: &CartEvent) -> Option<String> {
    match event {
        CartEvent::PersistFailed { reason } => Some(format!(
            "Cart change was not saved and will be lost: {}",
            reason
        )),
        _ => None,
    }
}

/// Find config file in directory tree.
fn find_config(start: &Path) -> Option<(CliConfig, PathBuf)> {
    let mut current = start.to_path_buf();
    loop {
        for name in &CONFIG_NAMES {
            let config_path = current.join(name);
            if config_path.exists() {
                match CliConfig::load(&config_path) {
                    Ok(config) => return Some((config, config_path)),
                    Err(e) => tracing::warn!(path = %config_path.display(), error = %e, "skipping unreadable config"),
                }
            }
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Resolve a path relative to the working directory.
fn resolve_path(cwd: &Path, path: &str) -> PathBuf {
    let path = PathBuf::from(path);
    if path.is_absolute() {
        path
    } else {
        cwd.join(path)
    }
}

/// Get the platform-specific data directory.
fn default_data_dir() -> PathBuf {
    if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home).join(".local").join("share").join("pantry")
    } else {
        PathBuf::from("/tmp").join("pantry")
    }
}
