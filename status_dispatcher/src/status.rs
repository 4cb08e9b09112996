//! Service and status view-model types

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Service {
    pub url: String,
    pub display_name: String,
}

/// State of one status slot
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum SlotState {
    #[default]
    Pending,
    Ok,
    Failed,
}

impl SlotState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SlotState::Pending)
    }

    pub fn icon(&self) -> &'static str {
        match self {
            SlotState::Pending => "⏳",
            SlotState::Ok => "✅",
            SlotState::Failed => "❌",
        }
    }
}

impl std::fmt::Display for SlotState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SlotState::Pending => write!(f, "PENDING"),
            SlotState::Ok => write!(f, "OK"),
            SlotState::Failed => write!(f, "FAILED"),
        }
    }
}

/// Which vantage point a slot reports
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Slot {
    Client,
    Server,
}

/// The two independent slots of one service row
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceStatus {
    pub client: SlotState,
    pub server: SlotState,
}

impl ServiceStatus {
    pub fn get(&self, slot: Slot) -> SlotState {
        match slot {
            Slot::Client => self.client,
            Slot::Server => self.server,
        }
    }

    pub fn set(&mut self, slot: Slot, state: SlotState) {
        match slot {
            Slot::Client => self.client = state,
            Slot::Server => self.server = state,
        }
    }

    pub fn is_settled(&self) -> bool {
        self.client.is_terminal() && self.server.is_terminal()
    }
}
