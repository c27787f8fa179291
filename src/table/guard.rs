/*!
 * Socket Guards
 *
 * RAII guard for socket-backed descriptors with automatic close
 */

use super::manager::{DescriptorTable, Generation};
use crate::core::types::{RawSocket, Rfd};
use tracing::error;

/// Socket registration that closes itself on drop
///
/// # Example
///
/// ```rust
/// use rfd_table::DescriptorTable;
///
/// let table = DescriptorTable::new();
/// {
///     let guard = table.register_socket_guarded(0x2a8).unwrap();
///     assert_eq!(guard.rfd(), 3);
/// }
/// // Dropped: RFD 3 is back in the recycle pool
/// assert!(table.is_empty());
/// ```
#[must_use = "dropping the guard closes the socket's descriptor immediately"]
pub struct SocketGuard<'a> {
    table: &'a DescriptorTable,
    socket: RawSocket,
    rfd: Rfd,
    generation: Generation,
}

impl<'a> SocketGuard<'a> {
    pub(super) fn new(
        table: &'a DescriptorTable,
        socket: RawSocket,
        rfd: Rfd,
        generation: Generation,
    ) -> Self {
        Self {
            table,
            socket,
            rfd,
            generation,
        }
    }

    #[inline]
    pub fn rfd(&self) -> Rfd {
        self.rfd
    }

    #[inline]
    pub fn socket(&self) -> RawSocket {
        self.socket
    }

    /// Keep the registration and hand back the RFD
    pub fn into_raw(self) -> Rfd {
        let rfd = self.rfd;
        std::mem::forget(self);
        rfd
    }
}

impl Drop for SocketGuard<'_> {
    fn drop(&mut self) {
        // Closed elsewhere; the RFD, or even the same socket, may be registered again
        if !self.table.close_registration(self.rfd, self.generation) {
            error!(
                rfd = self.rfd,
                socket = self.socket,
                generation = self.generation,
                "Socket guard dropped after socket was closed elsewhere"
            );
        }
    }
}
