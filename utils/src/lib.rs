//! Shared infrastructure utilities.
//!
//! Cross-cutting helpers that don't belong in the domain-pure `civic-types`
//! crate:
//!
//! - **`atomic_write`**: Crash-safe file persistence (temp + rename)

pub mod atomic_write;

pub use atomic_write::{
    AtomicWriteOptions, FileSyncPolicy, atomic_write, atomic_write_with_options, quarantine,
    recover_bak_file,
};
