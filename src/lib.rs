/*!
 * RFD Table Library
 * Virtual file descriptor table for POSIX-compatibility layers
 *
 * Maps wide, non-sequential native socket handles and CRT file descriptors
 * onto small recyclable integers starting at 3.
 */

pub mod core;
pub mod monitoring;
pub mod table;

// Re-exports
pub use crate::core::errors::RfdError;
pub use crate::core::types::{
    DescriptorKind, OpaqueState, RawFd, RawSocket, RecordFlags, Rfd, RfdResult, INVALID_FD,
    INVALID_RFD, INVALID_SOCKET,
};
pub use monitoring::init_tracing;
pub use table::{
    DescriptorRecord, DescriptorTable, SharedRecord, SocketGuard, TableConfig, TableStats,
};
