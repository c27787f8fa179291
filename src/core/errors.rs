/*!
 * Error Types
 * Descriptor table errors with thiserror, miette, and serde support
 */

use super::types::{RawFd, RawSocket, Rfd};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Descriptor table errors with serialization support
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum RfdError {
    #[error("Socket {socket:#x} already registered as RFD {rfd}")]
    #[diagnostic(
        code(rfd::socket_already_registered),
        help("Unregister the socket before registering it again. This usually means handle bookkeeping is out of sync.")
    )]
    SocketAlreadyRegistered { socket: RawSocket, rfd: Rfd },

    #[error("Socket {0:#x} not registered")]
    #[diagnostic(
        code(rfd::socket_not_found),
        help("The socket may have been closed already or never registered.")
    )]
    SocketNotFound(RawSocket),

    #[error("Native fd {0} not registered")]
    #[diagnostic(code(rfd::fd_not_found))]
    FdNotFound(RawFd),

    #[error("RFD {0} not found")]
    #[diagnostic(
        code(rfd::not_found),
        help("The descriptor may have been released or never allocated.")
    )]
    RfdNotFound(Rfd),

    #[error("Descriptor space exhausted (max RFD {max})")]
    #[diagnostic(
        code(rfd::exhausted),
        help("Release unused descriptors or raise the configured maximum.")
    )]
    Exhausted { max: Rfd },

    #[error("RFD {0} is reserved for standard streams")]
    #[diagnostic(code(rfd::reserved))]
    Reserved(Rfd),
}
