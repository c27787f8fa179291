/*!
 * Table Configuration
 *
 * Runtime configuration for the descriptor table
 */

use crate::core::limits::{DEFAULT_MAX_RFD, FIRST_ALLOCATABLE_RFD};
use crate::core::types::Rfd;
use serde::{Deserialize, Serialize};

/// Descriptor table configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// First descriptor the allocator issues (clamped to 3)
    pub first_rfd: Rfd,
    /// Highest descriptor the allocator issues
    pub max_rfd: Rfd,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            first_rfd: FIRST_ALLOCATABLE_RFD,
            max_rfd: DEFAULT_MAX_RFD,
        }
    }
}

impl TableConfig {
    /// Configuration with a hard cap on the descriptor range
    pub const fn bounded(max_rfd: Rfd) -> Self {
        Self {
            first_rfd: FIRST_ALLOCATABLE_RFD,
            max_rfd,
        }
    }

    /// Defaults overridden from the environment
    ///
    /// Environment variables:
    /// - RFD_TABLE_MAX: highest descriptor to issue (default: i32::MAX)
    ///
    /// Per-operation events are filtered through `RUST_LOG` like any other
    /// `tracing` output, e.g. `RUST_LOG=rfd_table=debug`.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(max) = std::env::var("RFD_TABLE_MAX")
            .ok()
            .and_then(|v| v.trim().parse::<Rfd>().ok())
        {
            config.max_rfd = max;
        }

        config
    }

    /// First descriptor with the reserved range excluded
    #[inline]
    pub fn effective_first_rfd(&self) -> Rfd {
        self.first_rfd.max(FIRST_ALLOCATABLE_RFD)
    }
}
