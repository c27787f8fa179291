/*!
 * Descriptor Table
 *
 * Maps native socket handles and CRT file descriptors onto a compact
 * POSIX-style descriptor space:
 * - Descriptors start at 3 (0, 1, 2 are the standard streams)
 * - Freed descriptors are reused oldest-first before new ones are issued
 * - Socket-backed descriptors carry an opaque state + flags record
 *
 * # Concurrency
 *
 * A single `parking_lot::Mutex` serializes every operation. Records are
 * handed out as `Arc<Mutex<DescriptorRecord>>` so a caller holding one never
 * blocks the table.
 */

mod config;
mod guard;
mod manager;
mod record;
mod stats;

pub use config::TableConfig;
pub use guard::SocketGuard;
pub use manager::DescriptorTable;
pub use record::{DescriptorRecord, SharedRecord};
pub use stats::TableStats;
