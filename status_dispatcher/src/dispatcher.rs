//! Dispatcher orchestrating client-side and server-side checks per service.
//!
//! Every command runs inside the awaiting task: the two checks of a row, and
//! all rows under `CheckAll`, are polled concurrently and each writes its own
//! slot the moment it resolves. A command whose future is dropped before it
//! finishes gives its rows back and restores their triggers in the background.

use futures::future::join_all;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, instrument, warn};

use crate::board::{StatusView, Trigger, CHECK_ALL_LABEL, CHECK_LABEL};
use crate::errors::{DispatchError, Result};
use crate::fetch::ClientFetcher;
use crate::remote::ServerProbe;
use crate::status::{Service, Slot, SlotState};

/// Discrete user commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    CheckOne(usize),
    CheckAll,
}

#[derive(Debug)]
struct InFlight {
    rows: Vec<bool>,
    aggregate: bool,
}

fn lock(in_flight: &Mutex<InFlight>) -> MutexGuard<'_, InFlight> {
    in_flight.lock().unwrap_or_else(PoisonError::into_inner)
}

async fn restore_triggers(view: &dyn StatusView, rows: &[usize], aggregate: bool) {
    for &row in rows {
        view.set_row_trigger(row, Trigger::idle(CHECK_LABEL)).await;
    }
    if aggregate {
        view.set_aggregate_trigger(Trigger::idle(CHECK_ALL_LABEL))
            .await;
    }
}

/// Rows (and maybe the aggregate trigger) held by one running command.
///
/// `finish` restores the triggers and then releases the rows. If the claim is
/// dropped unfinished, the same happens on a spawned task, or immediately
/// when no runtime is around.
struct Claim {
    in_flight: Arc<Mutex<InFlight>>,
    view: Arc<dyn StatusView>,
    rows: Vec<usize>,
    aggregate: bool,
    released: bool,
}

impl Claim {
    async fn finish(mut self) {
        restore_triggers(self.view.as_ref(), &self.rows, self.aggregate).await;
        release(&self.in_flight, &self.rows, self.aggregate);
        self.released = true;
    }
}

fn release(in_flight: &Mutex<InFlight>, rows: &[usize], aggregate: bool) {
    let mut in_flight = lock(in_flight);
    for &row in rows {
        in_flight.rows[row] = false;
    }
    if aggregate {
        in_flight.aggregate = false;
    }
}

impl Drop for Claim {
    fn drop(&mut self) {
        if self.released {
            return;
        }

        warn!(rows = ?self.rows, "Check abandoned before completion, releasing rows");
        let in_flight = self.in_flight.clone();
        let view = self.view.clone();
        let rows = std::mem::take(&mut self.rows);
        let aggregate = self.aggregate;

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    restore_triggers(view.as_ref(), &rows, aggregate).await;
                    release(&in_flight, &rows, aggregate);
                });
            }
            Err(_) => release(&in_flight, &rows, aggregate),
        }
    }
}

pub struct Dispatcher {
    services: Vec<Service>,
    view: Arc<dyn StatusView>,
    fetcher: Arc<dyn ClientFetcher>,
    probe: Arc<dyn ServerProbe>,
    privileged: bool,
    in_flight: Arc<Mutex<InFlight>>,
}

impl Dispatcher {
    pub fn new(
        services: Vec<Service>,
        view: Arc<dyn StatusView>,
        fetcher: Arc<dyn ClientFetcher>,
        probe: Arc<dyn ServerProbe>,
        privileged: bool,
    ) -> Self {
        let rows = services.len();
        Self {
            services,
            view,
            fetcher,
            probe,
            privileged,
            in_flight: Arc::new(Mutex::new(InFlight {
                rows: vec![false; rows],
                aggregate: false,
            })),
        }
    }

    pub fn services(&self) -> &[Service] {
        &self.services
    }

    /// Whether the aggregate trigger is offered to this caller
    pub fn can_check_all(&self) -> bool {
        self.privileged
    }

    pub async fn execute(&self, command: Command) -> Result<()> {
        match command {
            Command::CheckOne(row) => self.check_one(row).await,
            Command::CheckAll => self.check_all().await,
        }
    }

    fn claim(&self, rows: Vec<usize>, aggregate: bool) -> Claim {
        Claim {
            in_flight: self.in_flight.clone(),
            view: self.view.clone(),
            rows,
            aggregate,
            released: false,
        }
    }

    /// Check one row; refused while that row already has a check in flight
    #[instrument(skip(self))]
    pub async fn check_one(&self, row: usize) -> Result<()> {
        let service = self
            .services
            .get(row)
            .ok_or(DispatchError::UnknownService(row))?;

        let claim = {
            let mut in_flight = lock(&self.in_flight);
            if in_flight.rows[row] {
                return Err(DispatchError::Busy(service.display_name.clone()));
            }
            in_flight.rows[row] = true;
            self.claim(vec![row], false)
        };

        self.view.set_row_trigger(row, Trigger::busy()).await;
        self.run_checks(row, service).await;
        claim.finish().await;

        Ok(())
    }

    /// Check every row at once. Privileged callers only, and only when
    /// nothing else is in flight.
    #[instrument(skip(self))]
    pub async fn check_all(&self) -> Result<()> {
        if !self.privileged {
            warn!("Check all requested by an unprivileged caller");
            return Err(DispatchError::NotPermitted("check all".to_string()));
        }

        let claim = {
            let mut in_flight = lock(&self.in_flight);
            if in_flight.aggregate || in_flight.rows.iter().any(|busy| *busy) {
                return Err(DispatchError::Busy("all services".to_string()));
            }
            in_flight.aggregate = true;
            in_flight.rows.iter_mut().for_each(|busy| *busy = true);
            self.claim((0..self.services.len()).collect(), true)
        };

        info!(services = self.services.len(), "Checking all services");

        self.view.set_aggregate_trigger(Trigger::busy()).await;
        for row in 0..self.services.len() {
            self.view.set_row_trigger(row, Trigger::busy()).await;
        }

        join_all(
            self.services
                .iter()
                .enumerate()
                .map(|(row, service)| self.run_checks(row, service)),
        )
        .await;

        claim.finish().await;

        Ok(())
    }

    async fn run_checks(&self, row: usize, service: &Service) {
        self.view.set_slot(row, Slot::Client, SlotState::Pending).await;
        self.view.set_slot(row, Slot::Server, SlotState::Pending).await;

        let client = async {
            let state = match self.fetcher.fetch(&service.url).await {
                Ok(()) => SlotState::Ok,
                Err(e) => {
                    debug!(url = %service.url, error = %e, "Client-side check failed");
                    SlotState::Failed
                }
            };
            self.view.set_slot(row, Slot::Client, state).await;
            state
        };

        let server = async {
            let state = match self.probe.probe(&service.url).await {
                Ok(true) => SlotState::Ok,
                Ok(false) => SlotState::Failed,
                Err(e) => {
                    debug!(url = %service.url, error = %e, "Server-side check failed");
                    SlotState::Failed
                }
            };
            self.view.set_slot(row, Slot::Server, state).await;
            state
        };

        let (client, server) = futures::join!(client, server);
        info!(
            service = %service.display_name,
            client = %client,
            server = %server,
            "Service check finished"
        );
    }
}
