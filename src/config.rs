//! Configuration and CLI argument handling

use std::{path::PathBuf, time::Duration};

use anyhow::Context;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use clap::Parser;

use crate::{
    catalog::{Catalog, HeroContent},
    state::{
        countdown::default_target, AppSettings, SessionLimits, DEFAULT_DROP_DAYS,
        DEFAULT_MAX_SESSIONS, DEFAULT_SESSION_TTL_MINS,
    },
};

/// CLI argument parsing structure
#[derive(Parser, Debug, Clone)]
#[command(name = "freefall")]
#[command(about = "A state-managed HTTP server for the FreeFall drop landing page")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20514")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Exact drop instant (RFC 3339), overrides --drop-days
    #[arg(long)]
    pub drop_at: Option<DateTime<Utc>>,

    /// Days from startup until the next drop
    #[arg(short, long, default_value_t = DEFAULT_DROP_DAYS)]
    pub drop_days: i64,

    /// Name of the drop shown in the hero banner
    #[arg(long)]
    pub drop_name: Option<String>,

    /// Latency of the simulated newsletter endpoint in milliseconds
    #[arg(long, default_value = "1000")]
    pub submit_delay_ms: u64,

    /// Minutes of inactivity after which a page session is dropped
    #[arg(long, default_value_t = DEFAULT_SESSION_TTL_MINS)]
    pub session_ttl_mins: u64,

    /// Upper bound on open page sessions; the least recently used is evicted
    #[arg(
        long,
        default_value_t = DEFAULT_MAX_SESSIONS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub max_sessions: u64,

    /// JSON file with the product catalog (defaults to the built-in drop)
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }

    /// Countdown target relative to `now` unless an explicit instant was given
    pub fn drop_target(&self, now: DateTime<Utc>) -> anyhow::Result<DateTime<Utc>> {
        match self.drop_at {
            Some(target) => Ok(target),
            None => default_target(now, self.drop_days).with_context(|| {
                format!("--drop-days {} puts the drop out of range", self.drop_days)
            }),
        }
    }

    pub fn session_limits(&self) -> anyhow::Result<SessionLimits> {
        let ttl = i64::try_from(self.session_ttl_mins)
            .ok()
            .and_then(ChronoDuration::try_minutes)
            .with_context(|| {
                format!("--session-ttl-mins {} is out of range", self.session_ttl_mins)
            })?;

        Ok(SessionLimits {
            ttl,
            max_sessions: usize::try_from(self.max_sessions).unwrap_or(usize::MAX),
        })
    }

    /// Resolve the catalog, hero copy and countdown target into state settings
    pub fn settings(&self, now: DateTime<Utc>) -> anyhow::Result<AppSettings> {
        let catalog = match &self.catalog {
            Some(path) => Catalog::from_json_file(path)
                .with_context(|| format!("loading catalog from {}", path.display()))?,
            None => Catalog::default_drop(),
        };
        let hero = match &self.drop_name {
            Some(name) => HeroContent::with_drop_name(name.clone()),
            None => HeroContent::default(),
        };

        Ok(AppSettings {
            port: self.port,
            host: self.host.clone(),
            drop_target: self.drop_target(now)?,
            catalog,
            hero,
            sessions: self.session_limits()?,
        })
    }
}
