//! Configuration management with environment variable support.
//!
//! Values come from the process environment first, then from a `.env` file
//! (default `.env` in the working directory), then from the defaults below.
//! Empty values count as unset.
//!
//! # Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `REPORT_DIR` | Directory for reports, screenshots and records | `reports` |
//! | `WEBSITE_URL` | Base URL of the application under test | `https://dev-app.helpconstruct.com` |
//! | `TEST_EMAIL` | Login e-mail for authenticated flows | unset |
//! | `TEST_PASSWORD` | Login password for authenticated flows | unset |
//! | `COMPANY_NAME` | Organization name used by the setup flow | unset |
//! | `UI_REPORT_LOG` | Log filter (e.g. `ui_harness_report=debug`) | `ui_harness_report=info` |

use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::envfile::EnvFile;

// ============================================================================
// Default Values
// ============================================================================

/// Default report directory
pub const DEFAULT_REPORT_DIR: &str = "reports";

/// Default base URL of the application under test
pub const DEFAULT_WEBSITE_URL: &str = "https://dev-app.helpconstruct.com";

/// Default `.env` file consulted for unset variables
pub const DEFAULT_ENV_FILE: &str = ".env";

// ============================================================================
// Environment Variable Names
// ============================================================================

pub const ENV_REPORT_DIR: &str = "REPORT_DIR";

pub const ENV_WEBSITE_URL: &str = "WEBSITE_URL";

pub const ENV_TEST_EMAIL: &str = "TEST_EMAIL";

pub const ENV_TEST_PASSWORD: &str = "TEST_PASSWORD";

pub const ENV_COMPANY_NAME: &str = "COMPANY_NAME";

/// Environment variable for the log filter
pub const ENV_LOG: &str = "UI_REPORT_LOG";

/// Centralized configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub report: ReportSettings,
    pub site: SiteSettings,
}

/// Where report artifacts go
#[derive(Debug, Clone)]
pub struct ReportSettings {
    pub dir: PathBuf,
}

/// Target application and credentials used by page flows
#[derive(Debug, Clone)]
pub struct SiteSettings {
    pub website_url: String,
    pub email: Option<String>,
    pub password: Option<String>,
    pub company_name: Option<String>,
}

impl SiteSettings {
    /// Whether both login credentials are present
    pub fn has_credentials(&self) -> bool {
        self.email.is_some() && self.password.is_some()
    }
}

impl Config {
    /// Read configuration from the process environment, falling back to the
    /// `.env` file at `env_file`. A missing file is fine; an unreadable one
    /// is logged and ignored.
    pub fn load(env_file: &Path) -> Self {
        let file_vars: BTreeMap<String, String> = match EnvFile::read(env_file) {
            Ok(file) => file.vars(),
            Err(e) => {
                warn!(path = %env_file.display(), error = %e, "ignoring unreadable env file");
                BTreeMap::new()
            }
        };
        Self::layered(|key| env::var(key).ok(), &file_vars)
    }

    /// Values from `primary` win; `file_vars` fills whatever it leaves unset
    fn layered<F>(primary: F, file_vars: &BTreeMap<String, String>) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::from_lookup(|key| {
            primary(key)
                .filter(|v| !v.trim().is_empty())
                .or_else(|| file_vars.get(key).cloned())
        })
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            report: ReportSettings {
                dir: get(ENV_REPORT_DIR)
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT_DIR)),
            },
            site: SiteSettings {
                website_url: get(ENV_WEBSITE_URL).unwrap_or_else(|| DEFAULT_WEBSITE_URL.to_string()),
                email: get(ENV_TEST_EMAIL),
                password: get(ENV_TEST_PASSWORD),
                company_name: get(ENV_COMPANY_NAME),
            },
        }
    }

    /// Create configuration with all defaults (ignoring environment)
    pub fn defaults() -> Self {
        Self::from_lookup(|_| None)
    }
}
