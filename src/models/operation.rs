// file: src/models/operation.rs
use super::{NewEvent, ReminderSpec};
use serde::{Deserialize, Serialize};

/// One entry of a pending batch handed to the event store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    InsertEvent(NewEvent),
    InsertReminder(ReminderSpec),
    DeleteReminder(i64),
}

impl Operation {
    pub fn is_event_insert(&self) -> bool {
        matches!(self, Operation::InsertEvent(_))
    }
}

/// Result of one applied operation, positionally aligned with the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationResult {
    Inserted(i64),
    Deleted(u64),
}

impl OperationResult {
    pub fn inserted_id(&self) -> Option<i64> {
        match self {
            OperationResult::Inserted(id) => Some(*id),
            OperationResult::Deleted(_) => None,
        }
    }
}
