use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Identity that claims the controller role at startup.
    pub controller: String,

    // =========================
    // Host simulation
    // =========================
    /// Cadence of the host loop.
    pub tick_interval: Duration,

    /// Number of ticks before a clean shutdown. `0` runs until ctrl-c.
    pub max_ticks: u64,

    /// The controller submits an update every `update_every` ticks.
    pub update_every: u64,

    /// Amount deposited into the instance balance on each tick.
    pub deposit_per_tick: u128,

    /// Logical clock value at host genesis.
    pub genesis_clock: u64,

    /// Logical clock advance per committed transaction.
    pub clock_step: u64,

    // =========================
    // Output
    // =========================
    /// Where to write the instance snapshot at shutdown, if anywhere.
    pub snapshot_path: Option<PathBuf>,

    /// JSON log lines instead of the human-readable layout.
    pub json_logs: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let update_every: u64 = parse_or(&lookup, "ORACLE_UPDATE_EVERY", 4)?;
        if update_every == 0 {
            anyhow::bail!("ORACLE_UPDATE_EVERY must be at least 1");
        }

        Ok(Self {
            controller: lookup("ORACLE_CONTROLLER").unwrap_or_else(|| "controller".to_string()),

            tick_interval: Duration::from_millis(parse_or(&lookup, "ORACLE_TICK_MS", 250)?),
            max_ticks: parse_or(&lookup, "ORACLE_MAX_TICKS", 40)?,
            update_every,
            deposit_per_tick: parse_or(&lookup, "ORACLE_DEPOSIT_PER_TICK", 137)?,
            genesis_clock: parse_or(&lookup, "ORACLE_GENESIS_CLOCK", 1_700_000_000)?,
            clock_step: parse_or(&lookup, "ORACLE_CLOCK_STEP", 12)?,

            snapshot_path: lookup("ORACLE_SNAPSHOT_PATH")
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
            json_logs: lookup("APP_ENV").as_deref() == Some("production"),
        })
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid value for {key}: {raw:?}")),
        None => Ok(default),
    }
}
