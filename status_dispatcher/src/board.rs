//! Row handles the dispatcher writes to, and an in-memory board implementing them

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::status::{Service, ServiceStatus, Slot, SlotState};

pub const CHECK_LABEL: &str = "Check";
pub const CHECK_ALL_LABEL: &str = "Check all services";
pub const CHECKING_LABEL: &str = "Checking...";

/// Enabled flag and label of a trigger control
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Trigger {
    pub enabled: bool,
    pub label: String,
}

impl Trigger {
    pub fn idle(label: &str) -> Self {
        Self {
            enabled: true,
            label: label.to_string(),
        }
    }

    pub fn busy() -> Self {
        Self {
            enabled: false,
            label: CHECKING_LABEL.to_string(),
        }
    }
}

/// What the dispatcher needs from the rendering host
#[async_trait]
pub trait StatusView: Send + Sync {
    async fn set_slot(&self, row: usize, slot: Slot, state: SlotState);

    async fn set_row_trigger(&self, row: usize, trigger: Trigger);

    async fn set_aggregate_trigger(&self, trigger: Trigger);
}

/// Every change the board has seen, in order
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BoardEvent {
    Slot {
        row: usize,
        slot: Slot,
        state: SlotState,
    },
    RowTrigger {
        row: usize,
        trigger: Trigger,
    },
    AggregateTrigger(Trigger),
}

#[derive(Debug)]
struct BoardState {
    statuses: Vec<ServiceStatus>,
    row_triggers: Vec<Trigger>,
    aggregate_trigger: Option<Trigger>,
    events: Vec<BoardEvent>,
}

/// In-memory status table
#[derive(Debug, Clone)]
pub struct StatusBoard {
    state: Arc<RwLock<BoardState>>,
}

impl StatusBoard {
    /// Board for `rows` services; the aggregate trigger only exists when privileged
    pub fn new(rows: usize, privileged: bool) -> Self {
        Self {
            state: Arc::new(RwLock::new(BoardState {
                statuses: vec![ServiceStatus::default(); rows],
                row_triggers: vec![Trigger::idle(CHECK_LABEL); rows],
                aggregate_trigger: privileged.then(|| Trigger::idle(CHECK_ALL_LABEL)),
                events: Vec::new(),
            })),
        }
    }

    pub async fn snapshot(&self) -> Vec<ServiceStatus> {
        self.state.read().await.statuses.clone()
    }

    pub async fn status(&self, row: usize) -> Option<ServiceStatus> {
        self.state.read().await.statuses.get(row).copied()
    }

    pub async fn row_trigger(&self, row: usize) -> Option<Trigger> {
        self.state.read().await.row_triggers.get(row).cloned()
    }

    pub async fn aggregate_trigger(&self) -> Option<Trigger> {
        self.state.read().await.aggregate_trigger.clone()
    }

    pub async fn events(&self) -> Vec<BoardEvent> {
        self.state.read().await.events.clone()
    }

    /// Render the table as text, one line per service
    pub async fn render(&self, services: &[Service]) -> String {
        let statuses = self.snapshot().await;
        let width = services
            .iter()
            .map(|s| s.display_name.chars().count())
            .max()
            .unwrap_or(0)
            .max("Service".len());

        let mut out = format!("{:<width$}  Client  Server\n", "Service", width = width);
        for (service, status) in services.iter().zip(statuses.iter()) {
            out.push_str(&format!(
                "{:<width$}  {:<6}  {}\n",
                service.display_name,
                status.client.icon(),
                status.server.icon(),
                width = width
            ));
        }
        out
    }
}

#[async_trait]
impl StatusView for StatusBoard {
    async fn set_slot(&self, row: usize, slot: Slot, state: SlotState) {
        let mut board = self.state.write().await;
        if let Some(status) = board.statuses.get_mut(row) {
            status.set(slot, state);
            board.events.push(BoardEvent::Slot { row, slot, state });
            debug!(row, ?slot, %state, "Slot updated");
        }
    }

    async fn set_row_trigger(&self, row: usize, trigger: Trigger) {
        let mut board = self.state.write().await;
        if let Some(current) = board.row_triggers.get_mut(row) {
            *current = trigger.clone();
            board.events.push(BoardEvent::RowTrigger { row, trigger });
        }
    }

    async fn set_aggregate_trigger(&self, trigger: Trigger) {
        let mut board = self.state.write().await;
        if board.aggregate_trigger.is_some() {
            board.aggregate_trigger = Some(trigger.clone());
            board.events.push(BoardEvent::AggregateTrigger(trigger));
        }
    }
}
