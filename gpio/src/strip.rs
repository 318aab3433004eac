//! Strip service.
//!
//! Owns the pin side of the relay bank: exports every configured relay pin
//! as an output and keeps the pins in step with the desired relay states.

use crate::error::{GpioError, Result};
use crate::pin::{Level, PinDriver};
use crate::station::RelayStation;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Service applying desired relay state to hardware pins.
pub struct Strip {
    driver: Arc<dyn PinDriver>,
    refresh: Duration,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Strip {
    pub fn new(driver: Arc<dyn PinDriver>) -> Self {
        Self {
            driver,
            refresh: config::defaults::STRIP_REFRESH_INTERVAL,
            worker: Mutex::new(None),
        }
    }

    /// Override the refresh interval (tests).
    pub fn with_refresh(mut self, refresh: Duration) -> Self {
        self.refresh = refresh;
        self
    }

    /// Export all relay pins and start the refresh loop.
    ///
    /// Export failure for any pin aborts the start; the refresh loop itself
    /// only warns on write failures and keeps going.
    pub fn start_service(&self, station: Arc<RelayStation>) -> Result<()> {
        let mut worker = self.worker.lock().unwrap();
        if worker.is_some() {
            return Err(GpioError::AlreadyStarted("strip"));
        }

        for relay in station.snapshot() {
            self.driver.export_output(relay.pin)?;
            debug!(relay = %relay.name, pin = relay.pin, "Relay pin exported");
        }

        let driver = Arc::clone(&self.driver);
        let refresh = self.refresh;

        *worker = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(refresh);
            loop {
                ticker.tick().await;
                for relay in station.snapshot() {
                    let level = if relay.is_off() {
                        Level::Low
                    } else {
                        Level::High
                    };
                    if let Err(error) = driver.write(relay.pin, level) {
                        warn!(relay = %relay.name, error = %error, "Pin refresh failed");
                    }
                }
            }
        }));

        Ok(())
    }

    /// Whether the refresh loop is running.
    pub fn is_running(&self) -> bool {
        self.worker.lock().unwrap().is_some()
    }
}

impl Drop for Strip {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.lock().unwrap().take() {
            worker.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pin::MemoryPins;
    use crate::relay::{Relay, RelayState};

    #[tokio::test]
    async fn test_strip_applies_desired_state() {
        let pins = Arc::new(MemoryPins::new());
        let station = Arc::new(RelayStation::new());
        station.push(Relay::new(17, "Pumpe"));

        let strip = Strip::new(pins.clone()).with_refresh(Duration::from_millis(5));
        strip.start_service(Arc::clone(&station)).unwrap();

        station.get(0).unwrap().switch(RelayState::Up);
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(pins.read(17).unwrap(), Level::High);

        station.get(0).unwrap().switch(RelayState::Down);
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(pins.read(17).unwrap(), Level::Low);
    }

    #[tokio::test]
    async fn test_strip_start_twice_fails() {
        let strip = Strip::new(Arc::new(MemoryPins::new()));
        let station = Arc::new(RelayStation::new());

        strip.start_service(Arc::clone(&station)).unwrap();
        assert!(matches!(
            strip.start_service(station),
            Err(GpioError::AlreadyStarted("strip"))
        ));
    }

    #[tokio::test]
    async fn test_strip_export_failure_aborts_start() {
        let strip = Strip::new(Arc::new(crate::pin::SysfsPins::with_root("/nonexistent")));
        let station = Arc::new(RelayStation::new());
        station.push(Relay::new(17, "Pumpe"));

        assert!(strip.start_service(station).is_err());
        assert!(!strip.is_running());
    }
}
