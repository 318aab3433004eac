//! HTTP service.
//!
//! Wraps the axum server with the start / wait / stop contract the
//! lifecycle kernel drives. The transfer buffer pool is provisioned by the
//! kernel before [`HttpService::start_service`] runs and travels with the
//! service; the connection layer draws its buffers from it.

use crate::error::{Result, WwwError};
use crate::pages::{RelayPage, SystemPage, ThermaPage};
use crate::site::Site;
use askama::Template;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::Router;
use pool::Pool;
use std::collections::HashMap;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// State shared with the request handlers.
#[derive(Clone)]
struct AppState {
    site: Arc<Site>,
    pool: Arc<Pool>,
    transfer_bank: u32,
}

/// Dashboard HTTP service on a fixed IPv4 port.
pub struct HttpService {
    name: &'static str,
    site: Arc<Site>,
    port: u16,
    pool: Arc<Pool>,
    transfer_bank: u32,
    static_dir: PathBuf,
    started: AtomicBool,
    finished: Arc<AtomicBool>,
    stopping: Arc<AtomicBool>,
    shutdown: Arc<Notify>,
    done: Arc<Notify>,
    local_addr: Mutex<Option<SocketAddr>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl HttpService {
    /// Service bound to `port`, serving `site`, drawing transfer buffers
    /// from the already provisioned `pool`.
    pub fn new(site: Arc<Site>, port: u16, pool: Arc<Pool>) -> Self {
        Self {
            name: "HTTP",
            site,
            port,
            pool,
            transfer_bank: 0,
            static_dir: PathBuf::from("/usr/share/servus/static"),
            started: AtomicBool::new(false),
            finished: Arc::new(AtomicBool::new(false)),
            stopping: Arc::new(AtomicBool::new(false)),
            shutdown: Arc::new(Notify::new()),
            done: Arc::new(Notify::new()),
            local_addr: Mutex::new(None),
            worker: Mutex::new(None),
        }
    }

    /// Override the static asset directory (tests, dev setups).
    pub fn with_static_dir(mut self, static_dir: impl Into<PathBuf>) -> Self {
        self.static_dir = static_dir.into();
        self
    }

    /// Bank id the connection layer draws transfer buffers from.
    pub fn with_transfer_bank(mut self, transfer_bank: u32) -> Self {
        self.transfer_bank = transfer_bank;
        self
    }

    /// The transfer buffer pool this service draws from.
    pub fn transfer_pool(&self) -> &Arc<Pool> {
        &self.pool
    }

    /// Address actually bound, available once started. Port 0 requests an
    /// ephemeral port.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        *self.local_addr.lock().unwrap()
    }

    /// Bind the listener and start serving.
    pub async fn start_service(&self) -> Result<()> {
        if self.started.swap(true, Ordering::AcqRel) {
            return Err(WwwError::AlreadyStarted(self.name));
        }

        let listener = TcpListener::bind((Ipv4Addr::UNSPECIFIED, self.port)).await?;
        let local_addr = listener.local_addr()?;
        *self.local_addr.lock().unwrap() = Some(local_addr);

        let app = Router::new()
            .route("/", get(relay_page))
            .route("/therma", get(therma_page))
            .route("/system", get(system_page))
            .route("/servus.css", get(stylesheet))
            .nest_service(
                "/static",
                tower_http::services::ServeDir::new(&self.static_dir),
            )
            .with_state(AppState {
                site: Arc::clone(&self.site),
                pool: Arc::clone(&self.pool),
                transfer_bank: self.transfer_bank,
            });

        let shutdown = Arc::clone(&self.shutdown);
        let stopping = Arc::clone(&self.stopping);
        let finished = Arc::clone(&self.finished);
        let done = Arc::clone(&self.done);
        let name = self.name;

        let handle = tokio::spawn(async move {
            // Level triggered: a stop requested before this task is first
            // polled must not be lost.
            let serve = axum::serve(listener, app).with_graceful_shutdown(async move {
                loop {
                    let notified = shutdown.notified();
                    if stopping.load(Ordering::Acquire) {
                        return;
                    }
                    notified.await;
                }
            });
            if let Err(error) = serve.await {
                warn!(service = name, error = %error, "HTTP service ended with error");
            }
            finished.store(true, Ordering::Release);
            done.notify_waiters();
        });

        *self.worker.lock().unwrap() = Some(handle);

        info!(service = self.name, addr = %local_addr, "HTTP service listening");

        Ok(())
    }

    /// Block until the service has finished serving.
    pub async fn wait_for_service(&self) -> Result<()> {
        if !self.started.load(Ordering::Acquire) {
            return Err(WwwError::NotStarted(self.name));
        }

        loop {
            let notified = self.done.notified();
            if self.finished.load(Ordering::Acquire) {
                return Ok(());
            }
            notified.await;
        }
    }

    /// Ask the service to stop and wait for it to wind down.
    ///
    /// Safe to call when the service never started.
    pub async fn stop_service(&self) -> Result<()> {
        if !self.started.load(Ordering::Acquire) {
            return Ok(());
        }

        self.stopping.store(true, Ordering::Release);
        self.shutdown.notify_waiters();
        self.wait_for_service().await?;

        let worker = self.worker.lock().unwrap().take();
        if let Some(worker) = worker {
            let _ = worker.await;
        }

        info!(service = self.name, "HTTP service stopped");

        Ok(())
    }
}

/// The stylesheet is compiled in so the dashboard renders styled without
/// any files installed next to the binary.
async fn stylesheet() -> impl IntoResponse {
    (
        [(axum::http::header::CONTENT_TYPE, "text/css")],
        include_str!("../static/servus.css"),
    )
}

fn page(result: std::result::Result<String, askama::Error>) -> axum::response::Response {
    match result {
        Ok(html) => Html(html).into_response(),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Template error: {}", err),
        )
            .into_response(),
    }
}

/// The 'Relais' tab, also the target of relay switch actions
/// (`/?SwitchRelay=<index>&RelayState=<Up|Down>`).
async fn relay_page(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    if let (Some(index), Some(token)) = (params.get("SwitchRelay"), params.get("RelayState")) {
        match index.parse::<usize>() {
            Ok(index) => {
                if let Err(error) = state.site.switch_relay(index, token) {
                    warn!(index, token = %token, error = %error, "Relay switch rejected");
                }
            }
            Err(_) => warn!(index = %index, "Relay switch with malformed index"),
        }
    }

    page(
        RelayPage {
            rows: state.site.relay_rows(),
        }
        .render(),
    )
}

async fn therma_page(State(state): State<AppState>) -> impl IntoResponse {
    page(
        ThermaPage {
            rows: state.site.therma_rows(),
        }
        .render(),
    )
}

async fn system_page(State(state): State<AppState>) -> impl IntoResponse {
    let buffers = match state.pool.available(state.transfer_bank) {
        Ok(free) => format!("{} frei", free),
        Err(_) => "—".to_string(),
    };

    page(
        SystemPage {
            version: state.site.version().to_string(),
            uptime: state.site.uptime(),
            buffers,
        }
        .render(),
    )
}
