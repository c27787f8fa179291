/*!
 * Descriptor Allocation
 * Recycle-then-grow allocator for the virtual descriptor space
 */

use super::errors::RfdError;
use super::limits::{is_reserved, FIRST_ALLOCATABLE_RFD};
use super::types::{Rfd, RfdResult};
use std::collections::VecDeque;

/// Descriptor allocator with FIFO recycling
///
/// Freed descriptors are handed out oldest-first before the high-water
/// counter advances, which bounds the descriptor range under open/close churn.
///
/// Not synchronized on its own: the descriptor table owns it behind its lock.
#[derive(Debug)]
pub struct RecyclingAllocator {
    next: Option<Rfd>,
    max: Rfd,
    pool: VecDeque<Rfd>,
}

impl RecyclingAllocator {
    /// Create an allocator issuing descriptors in `first..=max`
    ///
    /// `first` is clamped above the reserved range.
    pub fn new(first: Rfd, max: Rfd) -> Self {
        Self {
            next: Some(first.max(FIRST_ALLOCATABLE_RFD)),
            max,
            pool: VecDeque::new(),
        }
    }

    /// Next descriptor: recycled front of the pool, else the counter
    pub fn allocate(&mut self) -> RfdResult<Rfd> {
        if let Some(rfd) = self.pool.pop_front() {
            return Ok(rfd);
        }

        let rfd = self
            .next
            .filter(|next| *next <= self.max)
            .ok_or(RfdError::Exhausted { max: self.max })?;
        // None once Rfd::MAX has been issued; the counter never wraps
        self.next = rfd.checked_add(1);
        Ok(rfd)
    }

    /// Return a descriptor to the back of the pool
    ///
    /// Reserved descriptors are never accepted.
    pub fn recycle(&mut self, rfd: Rfd) {
        if is_reserved(rfd) || rfd < 0 {
            return;
        }
        self.pool.push_back(rfd);
    }

    /// Descriptor the counter would issue next, `None` once the space is spent
    #[inline]
    pub fn next_unissued(&self) -> Option<Rfd> {
        self.next.filter(|next| *next <= self.max)
    }

    /// Number of recycled descriptors waiting for reuse
    #[inline]
    pub fn recycled_available(&self) -> usize {
        self.pool.len()
    }
}
