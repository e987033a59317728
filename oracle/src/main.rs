use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use common::logger::{TraceId, child_span, init_logger, root_span};
use oracle::{
    OracleError, TrendOracle,
    config::AppConfig,
    env::Environment,
    events::{EventSink, TracingSink},
    host::SimulatedHost,
    metrics::Counters,
    types::Identity,
};

/// One host tick: a deposit, a committed prediction and, on cadence, a
/// controller update.
fn run_tick(
    oracle: &TrendOracle<SimulatedHost>,
    controller: &Identity,
    observer: &Identity,
    cfg: &AppConfig,
    tick: u64,
    sink: &dyn EventSink,
) -> Result<(), OracleError> {
    let host = oracle.env();

    // Logical time passes between ticks even when nothing is committed.
    host.advance_clock(cfg.clock_step);
    host.deposit(cfg.deposit_per_tick);
    host.transact(|_| oracle.predict(observer, sink))?;

    if tick % cfg.update_every == 0 {
        child_span("controller_update")
            .in_scope(|| host.transact(|_| oracle.update(controller, sink)))?;
    }

    // Free read; does not touch host history.
    let view = host.call(|_| oracle.predict_silent())?;
    tracing::info!(
        tick,
        trend = %view.trend,
        confidence = view.confidence,
        sequence = host.sequence(),
        "tick complete"
    );

    Ok(())
}

fn shutdown(
    oracle: &TrendOracle<SimulatedHost>,
    controller: &Identity,
    cfg: &AppConfig,
    sink: &dyn EventSink,
) -> anyhow::Result<()> {
    let host = oracle.env();

    let amount = host
        .transact(|_| oracle.withdraw(controller, sink))
        .context("final withdraw failed")?;

    let c = oracle.counters();
    tracing::info!(
        withdrawn = amount,
        updates = Counters::read(&c.updates),
        predictions = Counters::read(&c.predictions_committed),
        queries = Counters::read(&c.predictions_silent),
        rejected_overflow = Counters::read(&c.rejected_overflow),
        "oracle stopped"
    );

    if let Some(path) = &cfg.snapshot_path {
        let json = oracle.snapshot()?.to_json()?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write snapshot to {}", path.display()))?;
        tracing::info!(path = %path.display(), "snapshot written");
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = AppConfig::from_env().context("failed to load configuration")?;
    init_logger("trend-oracle", cfg.json_logs);

    tracing::info!(
        started_at = %chrono::Utc::now().to_rfc3339(),
        controller = %cfg.controller,
        "Starting trend oracle host..."
    );

    let host = Arc::new(SimulatedHost::new(cfg.genesis_clock, cfg.clock_step));
    let oracle = TrendOracle::new(host.clone());
    let sink = TracingSink;

    let controller = Identity::new(cfg.controller.clone());
    let observer = Identity::new("observer");

    host.transact(|_| oracle.initialize(&controller, &sink))
        .context("failed to initialize instance")?;

    let mut ticker = tokio::time::interval(cfg.tick_interval);
    let mut tick: u64 = 0;

    let shutdown_signal = tokio::signal::ctrl_c();
    tokio::pin!(shutdown_signal);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = &mut shutdown_signal => {
                tracing::info!("Shutdown signal received");
                break;
            }
        }

        tick += 1;
        let span = root_span("tick", &TraceId::default());

        let outcome = span.in_scope(|| run_tick(&oracle, &controller, &observer, &cfg, tick, &sink));

        if let Err(e) = outcome {
            // Overflow is fatal for the operation only; the host keeps ticking.
            tracing::error!(error = %e, tick, "tick failed");
        }

        if cfg.max_ticks != 0 && tick >= cfg.max_ticks {
            break;
        }
    }

    shutdown(&oracle, &controller, &cfg, &sink)
}
