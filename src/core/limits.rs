/*!
 * Descriptor Limits and Constants
 *
 * Reserved range and allocation bounds for the virtual descriptor space.
 */

use super::types::Rfd;

// =============================================================================
// RESERVED RANGE
// =============================================================================

/// stdin
/// [LINUX-COMPAT]
pub const FIRST_RESERVED_RFD: Rfd = 0;

/// stderr
/// [LINUX-COMPAT]
pub const LAST_RESERVED_RFD: Rfd = 2;

/// First descriptor the allocator may issue
pub const FIRST_ALLOCATABLE_RFD: Rfd = LAST_RESERVED_RFD + 1;

// =============================================================================
// ALLOCATION BOUNDS
// =============================================================================

/// Highest descriptor the allocator issues unless configured lower.
/// The counter never wraps; past this value allocation fails.
pub const DEFAULT_MAX_RFD: Rfd = Rfd::MAX;

/// Initial capacity of the socket and record maps
/// [PERF] Sized for a typical server's open connection count
pub const DEFAULT_TABLE_CAPACITY: usize = 256;

/// Returns true for 0, 1 and 2
#[inline]
pub const fn is_reserved(rfd: Rfd) -> bool {
    rfd >= FIRST_RESERVED_RFD && rfd <= LAST_RESERVED_RFD
}
