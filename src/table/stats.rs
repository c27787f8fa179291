/*!
 * Table Statistics
 */

use crate::core::types::Rfd;
use serde::{Deserialize, Serialize};

/// Point-in-time snapshot of the descriptor table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TableStats {
    pub live_sockets: usize,
    pub live_fds: usize,
    pub records: usize,
    pub recycled_available: usize,
    /// `None` once the descriptor space is spent
    pub next_unissued: Option<Rfd>,
}

impl TableStats {
    /// Descriptors currently backed by either native namespace
    #[inline]
    pub fn live_descriptors(&self) -> usize {
        self.records + self.live_fds
    }
}
