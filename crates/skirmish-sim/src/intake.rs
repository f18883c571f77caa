//! Mutation intake.
//!
//! The network side owns a [`Sender`] and pushes messages at any time. The
//! orchestrator drains the channel once per tick. At most one batch per
//! entity is released per tick; later batches for the same entity wait for
//! the next tick, in arrival order.

use std::collections::{HashSet, VecDeque};
use std::sync::mpsc::{self, Receiver, Sender};

use skirmish_core::commands::AgentMutationBatch;
use skirmish_core::types::EntityId;

/// Message from the network collaborator.
#[derive(Debug, Clone)]
pub enum IntakeMessage {
    Batch(AgentMutationBatch),
    /// The agent's connection is gone.
    Disconnect(EntityId),
}

/// What the tick gets to apply.
#[derive(Debug, Default)]
pub struct TickInput {
    pub batches: Vec<AgentMutationBatch>,
    pub disconnects: Vec<EntityId>,
}

pub struct MutationIntake {
    sender: Sender<IntakeMessage>,
    receiver: Receiver<IntakeMessage>,
    pending: VecDeque<AgentMutationBatch>,
    disconnects: Vec<EntityId>,
}

impl Default for MutationIntake {
    fn default() -> Self {
        Self::new()
    }
}

impl MutationIntake {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            sender,
            receiver,
            pending: VecDeque::new(),
            disconnects: Vec::new(),
        }
    }

    /// A handle for the network side.
    pub fn sender(&self) -> Sender<IntakeMessage> {
        self.sender.clone()
    }

    /// Enqueue from the simulation thread.
    pub fn push(&mut self, batch: AgentMutationBatch) {
        self.pending.push_back(batch);
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Release this tick's input. `direct` batches queue behind everything
    /// already received.
    pub fn drain(&mut self, direct: impl IntoIterator<Item = AgentMutationBatch>) -> TickInput {
        while let Ok(message) = self.receiver.try_recv() {
            match message {
                IntakeMessage::Batch(batch) => self.pending.push_back(batch),
                IntakeMessage::Disconnect(id) => self.disconnects.push(id),
            }
        }
        self.pending.extend(direct);

        let mut seen = HashSet::new();
        let mut batches = Vec::new();
        let mut carried = VecDeque::with_capacity(self.pending.len());
        for batch in self.pending.drain(..) {
            if seen.insert(batch.agent_entity_id) {
                batches.push(batch);
            } else {
                carried.push_back(batch);
            }
        }
        self.pending = carried;

        TickInput {
            batches,
            disconnects: std::mem::take(&mut self.disconnects),
        }
    }
}
