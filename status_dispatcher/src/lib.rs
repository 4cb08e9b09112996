//! Status Dispatcher Library
//!
//! Client side of the dual-perspective status checker: for each monitored
//! service it fetches the URL directly and asks the server-side prober to do
//! the same, updating the two status slots independently as each resolves.

pub mod board;
pub mod config;
pub mod dispatcher;
pub mod errors;
pub mod fetch;
pub mod host;
pub mod remote;
pub mod status;

pub use board::{StatusBoard, StatusView, Trigger};
pub use config::Config;
pub use dispatcher::{Command, Dispatcher};
pub use errors::{DispatchError, Result};
pub use fetch::{ClientFetcher, DirectFetcher};
pub use host::{fetch_host_page, HostPage};
pub use remote::{ProberClient, ServerProbe};
pub use status::{Service, ServiceStatus, Slot, SlotState};
