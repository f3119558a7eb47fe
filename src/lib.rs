//! urlscope: a terminal client for a URL-analysis crawling service.
//!
//! The backend crawls submitted URLs asynchronously and reports per-URL
//! analysis (link counts, headings, broken links, crawl status). This crate
//! is the client side: it binds the backend's REST surface, tracks the
//! loading/error state of every bound operation, validates forms locally
//! before anything reaches the network, and drives the paged/searchable/
//! selectable list of results through an explicit state machine.
//!
//! # Architecture
//!
//! The crate follows a layered architecture pattern:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  CLI (main.rs)                                      │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - List/query/selection state                       │
//! │  - Fetch generations (stale-response discard)       │
//! │  - Dashboard controller (add / bulk flows)          │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ Forms Layer   │   │ API Layer     │   │ Session Layer │
//! │ (forms/)      │   │ (api/)        │   │ (session/)    │
//! │ - Form<T>     │   │ - reqwest     │   │ - Token store │
//! │ - Validators  │   │ - CallState   │   │ - JSON file   │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Infrastructure & Domain Layers                     │
//! │  - Platform paths (infrastructure/)                 │
//! │  - Error taxonomy (domain/error)                    │
//! │  - Crawl result model (domain/record)               │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`api`]: HTTP binding and per-call-site call state
//! - [`app`]: List state machine and dashboard controller
//! - [`domain`]: Crawl result model and error taxonomy
//! - [`forms`]: Form engine and validators
//! - [`infrastructure`]: Platform paths
//! - [`session`]: Auth token lifecycle and persistence
//! - [`observability`]: Tracing subscriber setup (binary-side)
//!
//! # Example
//!
//! ```no_run
//! use urlscope::api::ApiClient;
//! use urlscope::app::Dashboard;
//! use urlscope::session::Session;
//!
//! # async fn example() -> urlscope::Result<()> {
//! let client = ApiClient::new("http://localhost:8080/api", None)?;
//! let mut session = Session::ephemeral();
//! session.login(client.login("alice", "hunter2!").await?)?;
//!
//! let mut dashboard = Dashboard::new(client, session, 10);
//! dashboard.load().await?;
//! dashboard.add_url("https://example.com").await?;
//! for record in dashboard.list().items() {
//!     println!("{} {} {}", record.id, record.status.label(), record.address);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod app;
pub mod domain;
pub mod forms;
pub mod infrastructure;
pub mod observability;
pub mod session;

pub use api::{ApiClient, CallState};
pub use app::{Dashboard, FetchSpec, ListPhase, ListState};
pub use domain::{BulkAction, CrawlStatus, Page, Result, UrlRecord, UrlscopeError};
pub use forms::Form;
pub use session::Session;

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Client configuration, loaded from a TOML file with per-field defaults.
///
/// # Example
///
/// ```toml
/// # ~/.config/urlscope/config.toml
/// base_url = "https://crawler.example.com/api"
/// page_size = 10
/// timeout_secs = 30
/// trace_level = "urlscope=debug"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend base URL every request path is joined onto.
    pub base_url: String,

    /// Page size used for list fetches, fixed per session.
    pub page_size: u64,

    /// Client-side request timeout in seconds.
    ///
    /// Unset by default: a hung request then stays in flight indefinitely,
    /// matching the original dashboard's behavior.
    pub timeout_secs: Option<u64>,

    /// Tracing filter used when `RUST_LOG` is not set.
    pub trace_level: Option<String>,

    /// Session token file location; defaults to the platform data dir.
    pub token_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            page_size: 10,
            timeout_secs: None,
            trace_level: None,
            token_file: None,
        }
    }
}

impl Config {
    /// Loads configuration.
    ///
    /// With an explicit `path` the file must exist and parse. Without one,
    /// the default location is used if present, otherwise defaults apply.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(explicit) => explicit.to_path_buf(),
            None => {
                let default = infrastructure::default_config_file();
                if !default.exists() {
                    tracing::debug!("no config file, using defaults");
                    return Ok(Self::default());
                }
                default
            }
        };

        let contents = std::fs::read_to_string(&path).map_err(|e| {
            UrlscopeError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml(&contents)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the TOML is invalid.
    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents)
            .map_err(|e| UrlscopeError::Config(format!("invalid config file: {e}")))
    }

    /// Returns the configured request timeout, if any.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Returns the session token file location, configured or default.
    #[must_use]
    pub fn token_file(&self) -> PathBuf {
        self.token_file
            .clone()
            .unwrap_or_else(infrastructure::default_token_file)
    }
}
