//! CPU monitor component lifecycle and sampling loop
//!
//! The [`CpuMonitor`] owns one background sampling task:
//! - `start()` probes temperature support once, then spawns the loop and
//!   returns immediately
//! - the loop publishes one metrics sample per interval, isolating per-cycle
//!   failures so one bad reading never stops future readings
//! - `stop()` signals cancellation and waits a bounded time for the loop to
//!   confirm, then drops the handle either way

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::context::AgentContext;
use crate::sample::{metrics_topic, utc_timestamp, MetricsSample, SampleError};
use crate::sensors::{SensorSource, SysinfoSensors};

/// Lifecycle interface every agent component exposes to the agent's
/// lifecycle manager.
#[async_trait]
pub trait Component: Send {
    fn component_id(&self) -> &'static str;

    /// Begin background work. Must be idempotent and non-blocking.
    fn start(&mut self);

    /// Signal shutdown and wait a bounded time for background work to end.
    async fn stop(&mut self);
}

type SharedSensors = Arc<Mutex<dyn SensorSource + Send>>;

/// Handle to one running sampling loop.
struct Worker {
    cancel: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// Periodic CPU/temperature sampler publishing to the agent's status topic.
pub struct CpuMonitor {
    context: Arc<AgentContext>,
    sensors: SharedSensors,
    worker: Option<Worker>,
    temperature_available: bool,
}

impl CpuMonitor {
    pub const COMPONENT_ID: &'static str = "cpu_monitor";

    const PUBLISH_INTERVAL: Duration = Duration::from_secs(5);
    const STOP_TIMEOUT: Duration = Duration::from_secs(1);

    /// Create a monitor backed by the real platform sensors.
    pub fn new(context: Arc<AgentContext>) -> Self {
        Self::with_sensors(context, Arc::new(Mutex::new(SysinfoSensors::new())))
    }

    /// Create a monitor with an injected sensor source.
    pub fn with_sensors(context: Arc<AgentContext>, sensors: SharedSensors) -> Self {
        Self {
            context,
            sensors,
            worker: None,
            temperature_available: false,
        }
    }

    /// Whether the sampling loop is currently active.
    pub fn is_running(&self) -> bool {
        self.worker
            .as_ref()
            .map(|worker| !worker.handle.is_finished())
            .unwrap_or(false)
    }

    /// Temperature capability detected at the most recent `start()`.
    pub fn temperature_available(&self) -> bool {
        self.temperature_available
    }

    /// Probe temperature support once. Query errors and missing platform
    /// capability both mean "unavailable", never a propagated failure.
    fn detect_temperature_available(sensors: &SharedSensors) -> bool {
        sensors
            .lock()
            .temperature_entries()
            .map(|entries| !entries.is_empty())
            .unwrap_or(false)
    }
}

#[async_trait]
impl Component for CpuMonitor {
    fn component_id(&self) -> &'static str {
        Self::COMPONENT_ID
    }

    fn start(&mut self) {
        if self.is_running() {
            return;
        }

        self.temperature_available = Self::detect_temperature_available(&self.sensors);
        if !self.temperature_available {
            info!("CPU temperature is unavailable on this host");
        }

        // Fresh channel per run: a signal raised by an earlier stop() must not
        // leak into this one.
        let (cancel, cancel_rx) = watch::channel(false);
        let handle = tokio::spawn(run_loop(
            self.context.clone(),
            self.sensors.clone(),
            self.temperature_available,
            Self::PUBLISH_INTERVAL,
            cancel_rx,
        ));
        self.worker = Some(Worker { cancel, handle });

        info!("Component started: {}", Self::COMPONENT_ID);
    }

    async fn stop(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };

        let _ = worker.cancel.send(true);
        if tokio::time::timeout(Self::STOP_TIMEOUT, worker.handle)
            .await
            .is_err()
        {
            // An in-flight sample outlived the grace period. The task is
            // detached and may still publish once before it observes the
            // cancellation signal.
            warn!(
                "Sampling loop did not confirm shutdown within {:?}",
                Self::STOP_TIMEOUT
            );
        }

        info!("Component stopped: {}", Self::COMPONENT_ID);
    }
}

/// Background sampling loop: one sample per cycle, interruptible interval
/// wait, per-cycle failure isolation.
async fn run_loop(
    context: Arc<AgentContext>,
    sensors: SharedSensors,
    temperature_available: bool,
    interval: Duration,
    mut cancel_rx: watch::Receiver<bool>,
) {
    loop {
        if *cancel_rx.borrow() {
            break;
        }

        if let Err(err) = publish_metrics(&context, &sensors, temperature_available).await {
            error!("Failed to publish CPU metrics: {}", err);
        }

        tokio::select! {
            changed = cancel_rx.changed() => {
                // A raised signal or a dropped controller both end the run.
                if changed.is_err() || *cancel_rx.borrow() {
                    break;
                }
            }
            _ = tokio::time::sleep(interval) => {}
        }
    }
}

/// Produce and publish one metrics sample. Every failure maps to a
/// [`SampleError`] so the loop can log it and keep going.
async fn publish_metrics(
    context: &AgentContext,
    sensors: &SharedSensors,
    temperature_available: bool,
) -> Result<(), SampleError> {
    let cpu_percent = sensors.lock().cpu_percent().map_err(SampleError::Cpu)?;
    let temperature_c = if temperature_available {
        read_temperature(sensors)
    } else {
        None
    };

    let sample = MetricsSample {
        cpu_percent: f64::from(cpu_percent),
        temperature_c,
        timestamp: utc_timestamp(),
    };

    let topic = metrics_topic(&context.agent_id, CpuMonitor::COMPONENT_ID);
    let payload = serde_json::to_vec(&sample)?;
    context
        .bus
        .publish(&topic, payload, crate::bus::QoS::AtMostOnce, false)
        .await
        .map_err(|reason| SampleError::Publish {
            topic: topic.clone(),
            reason,
        })?;

    debug!("Published CPU metrics to {}: {:?}", topic, sample);
    Ok(())
}

/// First sensor entry with a usable current value, in enumeration order.
/// Read failures and empty results degrade to an absent value for this cycle.
fn read_temperature(sensors: &SharedSensors) -> Option<f64> {
    let entries = sensors.lock().temperature_entries().ok()?;
    entries.into_iter().find_map(|entry| entry.current)
}
