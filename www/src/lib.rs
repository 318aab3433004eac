//! Web dashboard.
//!
//! [`site::Site`] is the content provider: it reads the entity collections
//! and produces the view rows. [`service::HttpService`] wraps the axum
//! server with the start/wait/stop contract the lifecycle kernel drives.

pub mod error;
pub mod pages;
pub mod service;
pub mod site;

pub use error::{Result, WwwError};
pub use service::HttpService;
pub use site::Site;
