//! `reel.toml` plus `REEL_*` environment overrides.
//!
//! ```toml
//! store_path = "~/.local/share/reel/authority.db"
//!
//! [throttle]
//! min_delay_ms = 1000
//! max_delay_ms = 10000
//!
//! [matching]
//! duration_tolerance_minutes = 10
//!
//! [matching.studio_aliases]
//! "Studio X" = "Studio X Productions"
//! ```
//!
//! Nested keys are overridden with a double underscore, e.g.
//! `REEL_MATCHING__DURATION_TOLERANCE_MINUTES=8`.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, ensure};
use reel_core::config::MatchConfig;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
  /// Absent means no delay between authority requests.
  #[serde(default)]
  pub throttle:   Option<ThrottleConfig>,
  #[serde(default)]
  pub matching:   MatchConfig,
}

/// Uniform random pause before each authority request, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ThrottleConfig {
  pub min_delay_ms: u64,
  pub max_delay_ms: u64,
}

fn default_store_path() -> PathBuf { PathBuf::from("reel.db") }

impl Settings {
  /// Read `path` (optional) layered under the environment.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    Self::from_builder(
      config::Config::builder().add_source(config::File::from(path).required(false)),
    )
  }

  fn from_builder(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
  ) -> anyhow::Result<Self> {
    let settings: Settings = builder
      .add_source(
        config::Environment::with_prefix("REEL")
          .prefix_separator("_")
          .separator("__"),
      )
      .build()
      .context("failed to read config file")?
      .try_deserialize()
      .context("failed to deserialise settings")?;

    if let Some(throttle) = settings.throttle {
      ensure!(
        throttle.min_delay_ms <= throttle.max_delay_ms,
        "throttle.min_delay_ms ({}) exceeds throttle.max_delay_ms ({})",
        throttle.min_delay_ms,
        throttle.max_delay_ms
      );
    }
    Ok(settings)
  }

  /// `store_path` with a leading `~` expanded.
  pub fn store_path(&self) -> PathBuf { expand_tilde(&self.store_path) }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
