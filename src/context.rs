//! Shared agent context handed to components at construction

use std::sync::Arc;

use crate::bus::MessageBus;

/// Identity and collaborators the owning agent provides to its components.
///
/// The `agent_id` is stable for the process lifetime and is interpolated into
/// every publish topic. The bus handle is shared across components and is
/// invocation-only from their side.
pub struct AgentContext {
    pub agent_id: String,
    pub bus: Arc<dyn MessageBus>,
}

impl AgentContext {
    pub fn new(agent_id: impl Into<String>, bus: Arc<dyn MessageBus>) -> Self {
        Self {
            agent_id: agent_id.into(),
            bus,
        }
    }
}
