//! The running instance: one guarded state, one writer path, two read paths.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::access::AccessControl;
use crate::env::Treasury;
use crate::error::{OracleError, Result};
use crate::events::{EventSink, OracleEvent};
use crate::features::{self, FeatureTriple};
use crate::metrics::Counters;
use crate::model::{ModelStore, advance, classify};
use crate::snapshot::OracleSnapshot;
use crate::types::{Identity, Prediction};

#[derive(Debug, Default)]
struct InstanceState {
    access: AccessControl,
    model: Option<ModelStore>,
}

impl InstanceState {
    fn model(&self) -> Result<&ModelStore> {
        self.model.as_ref().ok_or(OracleError::NotInitialized)
    }
}

/// Trend oracle bound to one host environment.
///
/// Every operation takes the instance guard for its whole duration, so
/// computation, commit and notification happen as one step. A failed
/// operation leaves the state exactly as it found it.
pub struct TrendOracle<E: Treasury> {
    env: Arc<E>,
    state: Mutex<InstanceState>,
    counters: Counters,
}

impl<E: Treasury> TrendOracle<E> {
    /// An instance with no controller yet. Call [`Self::initialize`] next.
    pub fn new(env: Arc<E>) -> Self {
        Self {
            env,
            state: Mutex::new(InstanceState::default()),
            counters: Counters::default(),
        }
    }

    /// Rebuilds an instance from a persisted snapshot.
    ///
    /// Fails if the snapshot was taken at a logical time the host has not yet
    /// reached.
    pub fn restore(env: Arc<E>, snapshot: OracleSnapshot) -> Result<Self> {
        let now = env.logical_clock();
        if now < snapshot.last_updated {
            return Err(OracleError::Snapshot(format!(
                "last_updated {} is ahead of host clock {}",
                snapshot.last_updated, now
            )));
        }

        let state = InstanceState {
            access: AccessControl::with_controller(snapshot.controller),
            model: Some(ModelStore {
                weights: snapshot.weights,
                last_updated: snapshot.last_updated,
                update_count: snapshot.update_count,
            }),
        };

        Ok(Self {
            env,
            state: Mutex::new(state),
            counters: Counters::default(),
        })
    }

    pub fn env(&self) -> &Arc<E> {
        &self.env
    }

    pub fn counters(&self) -> &Counters {
        &self.counters
    }

    /// Claims the controller role for `caller` and creates the model.
    #[instrument(skip(self, sink), target = "oracle", fields(caller = %caller))]
    pub fn initialize(&self, caller: &Identity, sink: &dyn EventSink) -> Result<ModelStore> {
        let mut state = self.state.lock();

        if let Err(e) = state.access.claim(caller) {
            warn!(error = %e, "initialize rejected");
            return Err(e);
        }

        let now = self.env.logical_clock();
        let model = ModelStore::genesis(now);
        state.model = Some(model);

        sink.emit(OracleEvent::Initialized {
            controller: caller.clone(),
            weights: model.weights,
            timestamp: now,
        });

        info!(timestamp = now, "instance initialized");
        Ok(model)
    }

    /// Moves the weights toward the current features. Controller only.
    #[instrument(skip(self, sink), target = "oracle", fields(caller = %caller))]
    pub fn update(&self, caller: &Identity, sink: &dyn EventSink) -> Result<ModelStore> {
        let mut state = self.state.lock();

        self.authorize(&state, caller)?;
        let current = *state.model()?;

        // One snapshot for all three weights.
        let features = features::extract(self.env.as_ref());
        let now = self.env.logical_clock();

        let next = advance(&current, &features, now).inspect_err(|e| {
            Counters::bump(&self.counters.rejected_overflow);
            warn!(error = %e, ?features, weights = ?current.weights, "update aborted");
        })?;

        state.model = Some(next);
        Counters::bump(&self.counters.updates);

        sink.emit(OracleEvent::ModelUpdated {
            caller: caller.clone(),
            weights: next.weights,
            timestamp: now,
            update_count: next.update_count,
        });

        info!(
            weights = ?next.weights,
            update_count = next.update_count,
            timestamp = now,
            "model updated"
        );
        Ok(next)
    }

    /// Committed query: classifies and notifies. Open to anyone.
    #[instrument(skip(self, sink), target = "oracle", fields(caller = %caller))]
    pub fn predict(&self, caller: &Identity, sink: &dyn EventSink) -> Result<Prediction> {
        let state = self.state.lock();

        let prediction = self.evaluate(&state)?;
        let now = self.env.logical_clock();
        Counters::bump(&self.counters.predictions_committed);

        sink.emit(OracleEvent::Predicted {
            caller: caller.clone(),
            trend: prediction.trend,
            confidence: prediction.confidence,
            timestamp: now,
        });

        debug!(trend = %prediction.trend, confidence = prediction.confidence, "prediction committed");
        Ok(prediction)
    }

    /// Uncommitted query: same computation as [`Self::predict`], no notification.
    pub fn predict_silent(&self) -> Result<Prediction> {
        let state = self.state.lock();

        let prediction = self.evaluate(&state)?;
        Counters::bump(&self.counters.predictions_silent);
        Ok(prediction)
    }

    /// Sends the whole instance balance to the controller.
    #[instrument(skip(self, sink), target = "oracle", fields(caller = %caller))]
    pub fn withdraw(&self, caller: &Identity, sink: &dyn EventSink) -> Result<u128> {
        let state = self.state.lock();

        let controller = self.authorize(&state, caller)?;
        let amount = self.env.transfer_all(controller);
        let now = self.env.logical_clock();
        Counters::bump(&self.counters.withdrawals);

        sink.emit(OracleEvent::Withdrawn {
            to: controller.clone(),
            amount,
            timestamp: now,
        });

        info!(amount, "balance withdrawn");
        Ok(amount)
    }

    pub fn controller(&self) -> Option<Identity> {
        self.state.lock().access.controller().cloned()
    }

    pub fn model(&self) -> Result<ModelStore> {
        self.state.lock().model().copied()
    }

    /// Features as the environment presents them right now.
    pub fn features(&self) -> FeatureTriple {
        features::extract(self.env.as_ref())
    }

    /// Durable footprint of the instance.
    pub fn snapshot(&self) -> Result<OracleSnapshot> {
        let state = self.state.lock();

        let controller = state
            .access
            .controller()
            .cloned()
            .ok_or(OracleError::NotInitialized)?;
        let model = state.model()?;

        Ok(OracleSnapshot {
            controller,
            weights: model.weights,
            last_updated: model.last_updated,
            update_count: model.update_count,
        })
    }

    fn authorize<'a>(&self, state: &'a InstanceState, caller: &Identity) -> Result<&'a Identity> {
        state.access.authorize(caller).inspect_err(|e| {
            if matches!(e, OracleError::Unauthorized { .. }) {
                Counters::bump(&self.counters.rejected_unauthorized);
            }
            warn!(error = %e, "caller rejected");
        })
    }

    fn evaluate(&self, state: &InstanceState) -> Result<Prediction> {
        let model = state.model()?;
        let features = features::extract(self.env.as_ref());

        classify(&model.weights, &features).inspect_err(|e| {
            Counters::bump(&self.counters.rejected_overflow);
            warn!(error = %e, ?features, weights = ?model.weights, "prediction aborted");
        })
    }
}
