//! Therma service - sensor collection and polling loop.

use crate::error::{Result, ThermaError};
use crate::probe::TemperatureProbe;
use crate::sensor::Sensor;
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::warn;

/// Owns the sensors and polls them over the probe.
pub struct ThermaService {
    sensors: RwLock<Vec<Arc<Sensor>>>,
    poll_interval: Duration,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Default for ThermaService {
    fn default() -> Self {
        Self::new()
    }
}

impl ThermaService {
    pub fn new() -> Self {
        Self {
            sensors: RwLock::new(Vec::new()),
            poll_interval: config::defaults::THERMA_POLL_INTERVAL,
            worker: Mutex::new(None),
        }
    }

    /// Override the polling interval (tests).
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Append a sensor; it gets the next sequential index.
    pub fn push(&self, sensor: Sensor) {
        self.sensors.write().unwrap().push(Arc::new(sensor));
    }

    /// Sensor at `index`.
    pub fn get(&self, index: usize) -> Result<Arc<Sensor>> {
        let sensors = self.sensors.read().unwrap();
        sensors
            .get(index)
            .cloned()
            .ok_or(ThermaError::IndexOutOfRange {
                index,
                size: sensors.len(),
            })
    }

    /// Number of sensors.
    pub fn size(&self) -> usize {
        self.sensors.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Snapshot of the sensors in index order.
    pub fn snapshot(&self) -> Vec<Arc<Sensor>> {
        self.sensors.read().unwrap().clone()
    }

    /// Start the polling loop.
    ///
    /// A failed read only warns; the sensor keeps its previous reading and
    /// the sweep continues with the next sensor.
    pub fn start_service(&self, probe: Arc<dyn TemperatureProbe>) -> Result<()> {
        let mut worker = self.worker.lock().unwrap();
        if worker.is_some() {
            return Err(ThermaError::AlreadyStarted("therma"));
        }

        let sensors = self.snapshot();
        let poll_interval = self.poll_interval;

        *worker = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(poll_interval);
            loop {
                ticker.tick().await;
                for sensor in &sensors {
                    match probe.read_celsius(sensor.unit_id).await {
                        Ok(celsius) => sensor.record(celsius),
                        Err(error) => {
                            warn!(sensor = %sensor.name, error = %error, "Poll failed");
                        }
                    }
                }
            }
        }));

        Ok(())
    }

    /// Whether the polling loop is running.
    pub fn is_running(&self) -> bool {
        self.worker.lock().unwrap().is_some()
    }
}

impl Drop for ThermaService {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.lock().unwrap().take() {
            worker.abort();
        }
    }
}
