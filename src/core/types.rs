/*!
 * Core Types
 * Descriptor and native handle types shared across the table
 */

use std::any::Any;
use std::sync::Arc;

/// Virtual file descriptor handed out to POSIX-style callers
pub type Rfd = i32;

/// Platform socket handle (pointer-width on Windows x64, never assumed to fit 32 bits)
pub type RawSocket = u64;

/// Low-level CRT file descriptor
pub type RawFd = i32;

/// Flags word stored alongside a socket-backed descriptor
pub type RecordFlags = i32;

/// Opaque per-descriptor state. The table stores it and hands it back, nothing more.
pub type OpaqueState = Arc<dyn Any + Send + Sync>;

/// Returned when an RFD lookup misses or a registration is rejected
pub const INVALID_RFD: Rfd = -1;

/// Returned when an RFD is not backed by a native file descriptor
pub const INVALID_FD: RawFd = -1;

/// Returned when an RFD is not backed by a socket
pub const INVALID_SOCKET: RawSocket = RawSocket::MAX;

/// Which native namespace backs a live descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DescriptorKind {
    Socket,
    NativeFd,
}

/// Common result type for table operations
pub type RfdResult<T> = Result<T, super::errors::RfdError>;
