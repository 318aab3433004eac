//! Workspace - the four stage lifecycle kernel.
//!
//! The workspace owns one slot per subsystem and drives the staged
//! bootstrap/teardown sequence:
//!
//! `new` (Unstarted) -> `kernel_init` (Initialized) -> `kernel_exec`
//! (Running) -> `kernel_wait` (Waiting) -> `kernel_done` (Stopped).
//!
//! Failure policy per stage, preserved from the field-proven behavior of
//! this controller family:
//! - construction and configuration load degrade (warn and continue),
//! - monitor start, pool provisioning and signal bridge install are fatal,
//! - exec/wait/done failures are reported and swallowed so that the kernel
//!   always reaches its next stage and teardown stays safe after a partial
//!   start.

use crate::error::{Result, WorkspaceError};
use crate::monitor::Monitor;
use crate::signals::{ShutdownFlag, SignalBridge};
use crate::slot::Slot;
use config::defaults;
use config::ConfigLoader;
use gpio::{Display, PinDriver, Relay, RelayStation, Strip, SysfsPins, LINE_GEOMETRY_2004};
use pool::{BankConfig, Pool};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use therma::{ModbusProbe, Sensor, TemperatureProbe, ThermaService};
use tracing::{error, info, warn};
use www::{HttpService, Site};

/// Kernel state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Unstarted,
    Initialized,
    Running,
    Waiting,
    Stopping,
    Stopped,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleState::Unstarted => write!(f, "unstarted"),
            LifecycleState::Initialized => write!(f, "initialized"),
            LifecycleState::Running => write!(f, "running"),
            LifecycleState::Waiting => write!(f, "waiting"),
            LifecycleState::Stopping => write!(f, "stopping"),
            LifecycleState::Stopped => write!(f, "stopped"),
        }
    }
}

/// Construction options; the defaults are the deployment values.
pub struct WorkspaceOptions {
    /// Settings file path.
    pub settings_path: PathBuf,
    /// Dashboard port.
    pub http_port: u16,
    /// Monitor endpoint port.
    pub monitor_port: u16,
    /// MODBUS gateway port.
    pub modbus_port: u16,
    /// Pin driver the strip service uses.
    pub pin_driver: Arc<dyn PinDriver>,
}

impl Default for WorkspaceOptions {
    fn default() -> Self {
        Self {
            settings_path: PathBuf::from(defaults::SETTINGS_PATH),
            http_port: defaults::HTTP_PORT_NUMBER,
            monitor_port: defaults::MONITOR_PORT_NUMBER,
            modbus_port: defaults::MODBUS_PORT_NUMBER,
            pin_driver: Arc::new(SysfsPins::new()),
        }
    }
}

/// The subsystem owner and lifecycle orchestrator.
pub struct Workspace {
    options: WorkspaceOptions,
    state: LifecycleState,

    relay_station: Slot<RelayStation>,
    strip: Slot<Strip>,
    display: Slot<Display>,
    therma: Slot<ThermaService>,
    probe: Slot<ModbusProbe>,
    monitor: Slot<Monitor>,
    http: Slot<HttpService>,

    bridge: SignalBridge,
    shutdown: Arc<ShutdownFlag>,
}

impl Workspace {
    /// Construct the workspace and its mandatory subsystems.
    ///
    /// A construction failure leaves the process in a degraded state
    /// instead of aborting: the controller should stay reachable for
    /// diagnostics even with misbehaving hardware.
    pub fn new(options: WorkspaceOptions) -> Self {
        let workspace = Self {
            options,
            state: LifecycleState::Unstarted,
            relay_station: Slot::new("relay station"),
            strip: Slot::new("strip"),
            display: Slot::new("display"),
            therma: Slot::new("therma service"),
            probe: Slot::new("modbus probe"),
            monitor: Slot::new("monitor"),
            http: Slot::new("http service"),
            bridge: SignalBridge::new(),
            shutdown: ShutdownFlag::new(),
        };

        if let Err(err) = workspace.construct_subsystems() {
            warn!(error = %err, "Exception during workspace construction");
        }

        workspace
    }

    fn construct_subsystems(&self) -> Result<()> {
        self.relay_station.init(RelayStation::new())?;
        self.strip
            .init(Strip::new(Arc::clone(&self.options.pin_driver)))?;
        self.display.init(Display::new(LINE_GEOMETRY_2004))?;
        self.therma.init(ThermaService::new())?;
        Ok(())
    }

    /// 1st part of the application kernel - initialize all resources.
    pub async fn kernel_init(&mut self) -> Result<()> {
        self.transition(LifecycleState::Initialized)?;

        // The monitor endpoint comes up first; without it the controller
        // is unwatchable, which is treated as fatal.
        let monitor = Monitor::start(self.options.monitor_port).await?;
        self.monitor.init(monitor)?;

        self.probe.init(ModbusProbe::new(self.options.modbus_port))?;

        if let Err(err) = self.load_configuration() {
            warn!(error = %err, "Exception on configuration");
        }

        let pool = self.provision_transfer_pool()?;

        let site = Site::new(self.relay_station.shared()?, self.therma.shared()?);
        self.http.init(
            HttpService::new(Arc::new(site), self.options.http_port, pool)
                .with_transfer_bank(defaults::POOL_HTTP_BANK),
        )?;

        self.bridge.install(Arc::clone(&self.shutdown))?;

        self.update_display();

        info!(state = %self.state, "Kernel initialized");

        Ok(())
    }

    /// 2nd part of the application kernel - start all subcomponents.
    ///
    /// A failed service start is reported and swallowed; the kernel still
    /// proceeds to `kernel_wait`.
    pub async fn kernel_exec(&mut self) -> Result<()> {
        self.transition(LifecycleState::Running)?;

        if let Err(err) = self.start_services().await {
            error!(error = %err, "Error has occurred starting services");
        }

        info!(state = %self.state, "Kernel running");

        Ok(())
    }

    /// 3rd part of the application kernel - wait for completion of
    /// services, or for a shutdown request from the signal bridge.
    pub async fn kernel_wait(&mut self) -> Result<()> {
        self.transition(LifecycleState::Waiting)?;

        match self.http.shared() {
            Ok(http) => {
                tokio::select! {
                    result = http.wait_for_service() => {
                        if let Err(err) = result {
                            error!(error = %err, "Error has occurred waiting for services");
                        } else {
                            info!("HTTP service finished serving");
                        }
                    }
                    _ = self.shutdown.requested() => {
                        info!("Shutdown requested, leaving wait");
                    }
                }
            }
            Err(err) => {
                error!(error = %err, "Error has occurred waiting for services");
            }
        }

        Ok(())
    }

    /// 4th part of the application kernel - release all resources.
    ///
    /// Safe to call even if `kernel_exec` partially failed.
    pub async fn kernel_done(&mut self) -> Result<()> {
        if self.state == LifecycleState::Stopped {
            return Ok(());
        }
        self.transition(LifecycleState::Stopping)?;

        self.bridge.uninstall();

        match self.http.shared() {
            Ok(http) => {
                if let Err(err) = http.stop_service().await {
                    error!(error = %err, "Error has occurred trying to stop services");
                }
            }
            Err(err) => {
                error!(error = %err, "Error has occurred trying to stop services");
            }
        }

        self.state = LifecycleState::Stopped;
        info!(state = %self.state, "Kernel done");

        Ok(())
    }

    /// Load the settings file and populate the entity collections, in
    /// declaration order. A malformed record aborts the remainder of the
    /// load but keeps every entity declared before it.
    fn load_configuration(&self) -> Result<()> {
        let (settings, failure) = ConfigLoader::new(&self.options.settings_path).load_partial();

        let relay_station = self.relay_station.shared()?;
        for entry in &settings.gpio.relays {
            relay_station.push(Relay::new(entry.gpio, entry.name.clone()));
        }

        let therma = self.therma.shared()?;
        for entry in &settings.gpio.therma {
            therma.push(Sensor::new(
                entry.id.clone(),
                entry.name.clone(),
                entry.modbus,
            ));
        }

        info!(
            relays = relay_station.size(),
            sensors = therma.size(),
            "Configuration loaded"
        );

        match failure {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }

    /// Provision the HTTP transfer buffer pool: create the pool, register
    /// the bank, materialize its memory. Each step's failure is fatal to
    /// startup.
    fn provision_transfer_pool(&self) -> Result<Arc<Pool>> {
        let transfer_pool = Arc::new(Pool::new(defaults::POOL_BANK_CAPACITY));

        transfer_pool.init_bank(
            defaults::POOL_HTTP_BANK,
            BankConfig {
                buffer_size: defaults::POOL_BUFFER_SIZE,
                flags: 0,
                buffer_count: defaults::POOL_BUFFER_COUNT,
                ceiling: 0,
            },
        )?;

        transfer_pool.allocate_immediately(defaults::POOL_HTTP_BANK)?;

        info!(
            bank = defaults::POOL_HTTP_BANK,
            buffers = defaults::POOL_BUFFER_COUNT,
            buffer_size = defaults::POOL_BUFFER_SIZE,
            "Transfer pool provisioned"
        );

        Ok(transfer_pool)
    }

    async fn start_services(&self) -> Result<()> {
        let strip = self.strip.shared()?;
        strip.start_service(self.relay_station.shared()?)?;

        let therma = self.therma.shared()?;
        let probe: Arc<dyn TemperatureProbe> = self.probe.shared()?;
        therma.start_service(probe)?;

        self.http.shared()?.start_service().await?;

        Ok(())
    }

    fn update_display(&self) {
        if let Ok(display) = self.display.shared() {
            let _ = display.show(0, "Servus");
            let _ = display.show(
                1,
                &format!(
                    "{} Relais",
                    self.relay_station
                        .shared()
                        .map(|station| station.size())
                        .unwrap_or(0)
                ),
            );
            let _ = display.show(
                2,
                &format!(
                    "{} Sensoren",
                    self.therma
                        .shared()
                        .map(|service| service.size())
                        .unwrap_or(0)
                ),
            );
        }
    }

    fn transition(&mut self, to: LifecycleState) -> Result<()> {
        use LifecycleState::*;

        let allowed = matches!(
            (self.state, to),
            (Unstarted, Initialized)
                | (Initialized, Running)
                | (Running, Waiting)
                | (Running, Stopping)
                | (Waiting, Stopping)
        );

        if !allowed {
            return Err(WorkspaceError::InvalidTransition {
                from: self.state,
                to,
            });
        }

        self.state = to;
        Ok(())
    }

    /// Current kernel state.
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// The relay station, once constructed.
    pub fn relay_station(&self) -> Result<Arc<RelayStation>> {
        self.relay_station.shared()
    }

    /// The therma service, once constructed.
    pub fn therma_service(&self) -> Result<Arc<ThermaService>> {
        self.therma.shared()
    }

    /// The HTTP service, once constructed.
    pub fn http_service(&self) -> Result<Arc<HttpService>> {
        self.http.shared()
    }

    /// The display, once constructed.
    pub fn display(&self) -> Result<Arc<Display>> {
        self.display.shared()
    }

    /// The shutdown request flag the signal bridge feeds.
    pub fn shutdown_flag(&self) -> Arc<ShutdownFlag> {
        Arc::clone(&self.shutdown)
    }
}
