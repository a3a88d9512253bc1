// file: src/sync/batch.rs
use crate::models::{NewEvent, Operation, ReminderSpec, ReminderTarget};
use crate::store::EventStore;
use crate::utils::logging;
use log::debug;

/// Operations per flush. The store's transaction ceiling forbids sending a
/// whole run in one call.
pub const FLUSH_THRESHOLD: usize = 200;

/// What happened to a batch handed to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushOutcome {
    Empty,
    Applied(usize),
    /// The store rejected the batch; this many operations were dropped.
    Failed(usize),
}

/// Operations waiting for the next flush.
///
/// Reminder inserts address their event by its index in this list, so the
/// list is the back-reference space: it starts at zero after every flush.
#[derive(Debug)]
pub struct PendingBatch {
    operations: Vec<Operation>,
    ceiling: usize,
}

impl PendingBatch {
    pub fn new(ceiling: usize) -> Self {
        Self {
            operations: Vec::with_capacity(ceiling),
            ceiling,
        }
    }

    /// Index the next pushed operation will get.
    pub fn back_ref(&self) -> usize {
        self.operations.len()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.operations.len() >= self.ceiling
    }

    /// True when `group_len` more operations would not fit. An event and
    /// its reminders must travel in the same flush.
    pub fn would_overflow(&self, group_len: usize) -> bool {
        !self.is_empty() && self.operations.len() + group_len > self.ceiling
    }

    /// Queue an event followed by one reminder per entry of `reminder_minutes`,
    /// each pointing back at the event. Returns the event's index.
    pub fn push_group(&mut self, event: NewEvent, reminder_minutes: &[u32]) -> usize {
        let event_index = self.back_ref();
        self.operations.push(Operation::InsertEvent(event));
        for minutes in reminder_minutes {
            self.operations.push(Operation::InsertReminder(ReminderSpec::alert(
                *minutes,
                ReminderTarget::BackRef(event_index),
            )));
        }
        event_index
    }

    pub fn push(&mut self, operation: Operation) {
        self.operations.push(operation);
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Hand over the queued operations and reset the back-reference space.
    pub fn take(&mut self) -> Vec<Operation> {
        std::mem::replace(&mut self.operations, Vec::with_capacity(self.ceiling))
    }

    /// Apply the queued operations. A rejected batch is logged and dropped;
    /// there is no retry and nothing earlier is rolled back. `kind` names
    /// the job in the log.
    pub async fn flush<S: EventStore + ?Sized>(&mut self, store: &S, kind: &str) -> FlushOutcome {
        if self.is_empty() {
            return FlushOutcome::Empty;
        }

        let operations = self.take();
        debug!("[{}] Start applying batch of {} operations", kind, operations.len());
        match store.apply_batch(&operations).await {
            Ok(_) => {
                debug!("[{}] Applying the batch was successful", kind);
                FlushOutcome::Applied(operations.len())
            }
            Err(e) => {
                logging::log_batch_failure(kind, operations.len(), &e);
                FlushOutcome::Failed(operations.len())
            }
        }
    }
}
