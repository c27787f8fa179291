/*!
 * Descriptor Records
 * Opaque per-descriptor payload for socket-backed RFDs
 */

use crate::core::types::{OpaqueState, RawSocket, RecordFlags};
use parking_lot::Mutex;
use std::sync::Arc;

/// Record handle shared between the table and its callers
pub type SharedRecord = Arc<Mutex<DescriptorRecord>>;

/// Payload kept for every socket-backed descriptor
///
/// `state` and `flags` belong to the caller; the table never looks inside.
#[derive(Debug, Clone)]
pub struct DescriptorRecord {
    pub socket: RawSocket,
    pub state: Option<OpaqueState>,
    pub flags: RecordFlags,
}

impl DescriptorRecord {
    /// Empty record for a freshly registered socket
    pub fn new(socket: RawSocket) -> Self {
        Self {
            socket,
            state: None,
            flags: 0,
        }
    }

    /// Attach state and flags, returning the state previously held
    pub fn attach(&mut self, state: OpaqueState, flags: RecordFlags) -> Option<OpaqueState> {
        self.flags = flags;
        self.state.replace(state)
    }

    /// Take the state out and clear the flags
    pub fn detach(&mut self) -> Option<OpaqueState> {
        self.flags = 0;
        self.state.take()
    }

    /// Borrow the state as a concrete type
    pub fn state_as<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.state.as_ref().and_then(|s| s.downcast_ref::<T>())
    }

    /// Clone the state handle as a concrete type
    pub fn state_arc<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.state.clone().and_then(|s| s.downcast::<T>().ok())
    }
}
