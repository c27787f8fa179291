/*!
 * Descriptor Table
 * Bidirectional native handle <-> virtual descriptor mapping
 *
 * Native socket handles are wide and non-sequential, so POSIX-shaped callers
 * get a small integer (RFD) instead. Native CRT file descriptors share the same
 * RFD numbering space. Descriptors 0, 1 and 2 are never issued.
 *
 * # Locking
 *
 * One mutex guards every mapping and the recycle pool. Each public method
 * holds it for its full duration and releases it before returning, so no
 * caller can observe an RFD present on one side of a mapping and absent from
 * the other. Record payloads sit behind their own lock, which the table never
 * takes while holding its own.
 */

use super::config::TableConfig;
use super::guard::SocketGuard;
use super::record::{DescriptorRecord, SharedRecord};
use super::stats::TableStats;
use crate::core::errors::RfdError;
use crate::core::id::RecyclingAllocator;
use crate::core::limits::{is_reserved, DEFAULT_TABLE_CAPACITY};
use crate::core::types::{
    DescriptorKind, OpaqueState, RawFd, RawSocket, RecordFlags, Rfd, RfdResult, INVALID_FD,
    INVALID_RFD, INVALID_SOCKET,
};
use ahash::RandomState;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use tracing::{debug, warn};

static GLOBAL_TABLE: OnceLock<DescriptorTable> = OnceLock::new();

/// Identifies one socket registration; never reused within a table
pub(super) type Generation = u64;

/// RFD-side entry for a socket-backed descriptor
struct RecordEntry {
    socket: RawSocket,
    generation: Generation,
    record: SharedRecord,
}

/// Everything the table lock protects
struct TableState {
    socket_to_rfd: HashMap<RawSocket, Rfd, RandomState>,
    fd_to_rfd: HashMap<RawFd, Rfd, RandomState>,
    records: HashMap<Rfd, RecordEntry, RandomState>,
    rfd_to_fd: HashMap<Rfd, RawFd, RandomState>,
    allocator: RecyclingAllocator,
    next_generation: Generation,
}

impl TableState {
    fn new(config: &TableConfig) -> Self {
        Self {
            socket_to_rfd: HashMap::with_capacity_and_hasher(
                DEFAULT_TABLE_CAPACITY,
                RandomState::new(),
            ),
            fd_to_rfd: HashMap::default(),
            records: HashMap::with_capacity_and_hasher(
                DEFAULT_TABLE_CAPACITY,
                RandomState::new(),
            ),
            rfd_to_fd: HashMap::default(),
            allocator: RecyclingAllocator::new(config.effective_first_rfd(), config.max_rfd),
            next_generation: 0,
        }
    }

    fn insert_socket(&mut self, socket: RawSocket) -> RfdResult<(Rfd, Generation)> {
        if let Some(&rfd) = self.socket_to_rfd.get(&socket) {
            return Err(RfdError::SocketAlreadyRegistered { socket, rfd });
        }

        let rfd = self.allocator.allocate()?;
        let generation = self.next_generation;
        self.next_generation += 1;

        self.socket_to_rfd.insert(socket, rfd);
        self.records.insert(
            rfd,
            RecordEntry {
                socket,
                generation,
                record: Arc::new(Mutex::new(DescriptorRecord::new(socket))),
            },
        );
        Ok((rfd, generation))
    }

    /// Drop the record for `rfd` and any socket entry still pointing at it
    fn release(&mut self, rfd: Rfd) -> Option<RawSocket> {
        let entry = self.records.remove(&rfd)?;

        if self.socket_to_rfd.get(&entry.socket) == Some(&rfd) {
            self.socket_to_rfd.remove(&entry.socket);
        }
        self.allocator.recycle(rfd);
        Some(entry.socket)
    }
}

/// Process-wide handle virtualization table
///
/// Construct one per process and share it by reference or `Arc`, or use
/// [`DescriptorTable::global`] for the lazily initialized instance.
///
/// # Example
///
/// ```rust
/// use rfd_table::DescriptorTable;
///
/// let table = DescriptorTable::new();
/// let rfd = table.register_socket(0x1f4);
/// assert_eq!(rfd, 3);
/// assert_eq!(table.resolve_socket(rfd), 0x1f4);
/// ```
pub struct DescriptorTable {
    state: Mutex<TableState>,
    config: TableConfig,
}

impl DescriptorTable {
    pub fn new() -> Self {
        Self::with_config(TableConfig::default())
    }

    pub fn with_config(config: TableConfig) -> Self {
        Self {
            state: Mutex::new(TableState::new(&config)),
            config,
        }
    }

    /// Process-wide table, built from [`TableConfig::from_env`] on first access
    pub fn global() -> &'static DescriptorTable {
        GLOBAL_TABLE.get_or_init(|| DescriptorTable::with_config(TableConfig::from_env()))
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    // ========================================================================
    // Sockets
    // ========================================================================

    /// Register a socket, rejecting one that is already present
    pub fn try_register_socket(&self, socket: RawSocket) -> RfdResult<Rfd> {
        let (rfd, _) = self.state.lock().insert_socket(socket)?;
        debug!(rfd, socket, "Socket registered");
        Ok(rfd)
    }

    /// Register a socket, returning `INVALID_RFD` if it is already present
    /// or the descriptor space is exhausted
    pub fn register_socket(&self, socket: RawSocket) -> Rfd {
        match self.try_register_socket(socket) {
            Ok(rfd) => rfd,
            Err(e) => {
                warn!(socket, error = %e, "Socket registration rejected");
                INVALID_RFD
            }
        }
    }

    /// Remove the socket -> RFD entry only
    ///
    /// The record and the RFD itself stay live until [`release_rfd`](Self::release_rfd).
    pub fn unregister_socket(&self, socket: RawSocket) {
        if let Some(rfd) = self.state.lock().socket_to_rfd.remove(&socket) {
            debug!(rfd, socket, "Socket unregistered");
        }
    }

    /// Drop the record for a socket-backed RFD and recycle the RFD
    ///
    /// A socket entry still pointing at `rfd` is dropped with it. Fd-backed
    /// descriptors are not released here; see [`unregister_native_fd`](Self::unregister_native_fd).
    pub fn try_release_rfd(&self, rfd: Rfd) -> RfdResult<()> {
        if is_reserved(rfd) {
            return Err(RfdError::Reserved(rfd));
        }

        let socket = self
            .state
            .lock()
            .release(rfd)
            .ok_or(RfdError::RfdNotFound(rfd))?;

        debug!(rfd, socket, "RFD released");
        Ok(())
    }

    /// [`try_release_rfd`](Self::try_release_rfd), ignoring unknown and reserved descriptors
    pub fn release_rfd(&self, rfd: Rfd) {
        let _ = self.try_release_rfd(rfd);
    }

    /// Unregister a socket and recycle its RFD in one step
    pub fn try_close_socket(&self, socket: RawSocket) -> RfdResult<Rfd> {
        let mut state = self.state.lock();

        let rfd = state
            .socket_to_rfd
            .get(&socket)
            .copied()
            .ok_or(RfdError::SocketNotFound(socket))?;
        state.release(rfd);
        drop(state);

        debug!(rfd, socket, "Socket closed");
        Ok(rfd)
    }

    /// Unregister a socket and recycle its RFD; false if it was not registered
    pub fn close_socket(&self, socket: RawSocket) -> bool {
        self.try_close_socket(socket).is_ok()
    }

    /// Release `rfd` only while it still holds registration `generation`
    pub(super) fn close_registration(&self, rfd: Rfd, generation: Generation) -> bool {
        let mut state = self.state.lock();

        match state.records.get(&rfd) {
            Some(entry) if entry.generation == generation => state.release(rfd).is_some(),
            _ => false,
        }
    }

    /// Register a socket and tie its lifetime to the returned guard
    pub fn register_socket_guarded(&self, socket: RawSocket) -> RfdResult<SocketGuard<'_>> {
        let (rfd, generation) = self.state.lock().insert_socket(socket)?;
        debug!(rfd, socket, generation, "Socket registered with guard");
        Ok(SocketGuard::new(self, socket, rfd, generation))
    }

    /// Socket behind `rfd`, or `INVALID_SOCKET`
    pub fn resolve_socket(&self, rfd: Rfd) -> RawSocket {
        self.state
            .lock()
            .records
            .get(&rfd)
            .map(|entry| entry.socket)
            .unwrap_or(INVALID_SOCKET)
    }

    /// RFD registered for `socket`, or `INVALID_RFD`
    pub fn lookup_socket_rfd(&self, socket: RawSocket) -> Rfd {
        self.state
            .lock()
            .socket_to_rfd
            .get(&socket)
            .copied()
            .unwrap_or(INVALID_RFD)
    }

    // ========================================================================
    // Records
    // ========================================================================

    /// Shared handle to the record for `rfd`
    ///
    /// The table lock is released before returning. The handle stays valid
    /// after the descriptor is released, but is then detached from the table.
    pub fn resolve_record(&self, rfd: Rfd) -> Option<SharedRecord> {
        self.state
            .lock()
            .records
            .get(&rfd)
            .map(|entry| Arc::clone(&entry.record))
    }

    /// Attach opaque state and flags; false if `rfd` has no record
    pub fn attach_state(&self, rfd: Rfd, state: OpaqueState, flags: RecordFlags) -> bool {
        match self.resolve_record(rfd) {
            Some(record) => {
                record.lock().attach(state, flags);
                true
            }
            None => false,
        }
    }

    /// Take the opaque state out of the record for `rfd`
    pub fn detach_state(&self, rfd: Rfd) -> Option<OpaqueState> {
        self.resolve_record(rfd)
            .and_then(|record| record.lock().detach())
    }

    // ========================================================================
    // Native file descriptors
    // ========================================================================

    /// Register a native fd; an fd already present keeps its RFD
    pub fn try_register_native_fd(&self, fd: RawFd) -> RfdResult<Rfd> {
        let mut state = self.state.lock();

        if let Some(&rfd) = state.fd_to_rfd.get(&fd) {
            return Ok(rfd);
        }

        let rfd = state.allocator.allocate()?;
        state.fd_to_rfd.insert(fd, rfd);
        state.rfd_to_fd.insert(rfd, fd);
        drop(state);

        debug!(rfd, fd, "Native fd registered");
        Ok(rfd)
    }

    /// Register a native fd, returning `INVALID_RFD` only on exhaustion
    pub fn register_native_fd(&self, fd: RawFd) -> Rfd {
        match self.try_register_native_fd(fd) {
            Ok(rfd) => rfd,
            Err(e) => {
                warn!(fd, error = %e, "Native fd registration rejected");
                INVALID_RFD
            }
        }
    }

    /// Remove the fd <-> RFD mapping and recycle the RFD
    pub fn try_unregister_native_fd(&self, fd: RawFd) -> RfdResult<Rfd> {
        let mut state = self.state.lock();

        let rfd = state
            .fd_to_rfd
            .remove(&fd)
            .ok_or(RfdError::FdNotFound(fd))?;
        state.rfd_to_fd.remove(&rfd);
        state.allocator.recycle(rfd);
        drop(state);

        debug!(rfd, fd, "Native fd unregistered");
        Ok(rfd)
    }

    /// [`try_unregister_native_fd`](Self::try_unregister_native_fd), ignoring unknown fds
    pub fn unregister_native_fd(&self, fd: RawFd) {
        let _ = self.try_unregister_native_fd(fd);
    }

    /// Native fd behind `rfd`, or `INVALID_FD`
    pub fn resolve_native_fd(&self, rfd: Rfd) -> RawFd {
        self.state
            .lock()
            .rfd_to_fd
            .get(&rfd)
            .copied()
            .unwrap_or(INVALID_FD)
    }

    /// RFD registered for `fd`, or `INVALID_RFD`
    pub fn lookup_native_fd_rfd(&self, fd: RawFd) -> Rfd {
        self.state
            .lock()
            .fd_to_rfd
            .get(&fd)
            .copied()
            .unwrap_or(INVALID_RFD)
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Which namespace backs `rfd`, if it is live
    pub fn kind_of(&self, rfd: Rfd) -> Option<DescriptorKind> {
        let state = self.state.lock();
        if state.records.contains_key(&rfd) {
            Some(DescriptorKind::Socket)
        } else if state.rfd_to_fd.contains_key(&rfd) {
            Some(DescriptorKind::NativeFd)
        } else {
            None
        }
    }

    /// True if `rfd` is live on either side
    pub fn contains_rfd(&self, rfd: Rfd) -> bool {
        self.kind_of(rfd).is_some()
    }

    /// Live descriptors of both kinds
    pub fn len(&self) -> usize {
        let state = self.state.lock();
        state.records.len() + state.rfd_to_fd.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> TableStats {
        let state = self.state.lock();
        TableStats {
            live_sockets: state.socket_to_rfd.len(),
            live_fds: state.fd_to_rfd.len(),
            records: state.records.len(),
            recycled_available: state.allocator.recycled_available(),
            next_unissued: state.allocator.next_unissued(),
        }
    }
}

impl Default for DescriptorTable {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DescriptorTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DescriptorTable")
            .field("config", &self.config)
            .field("stats", &self.stats())
            .finish()
    }
}
