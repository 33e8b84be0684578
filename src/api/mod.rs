//! Purpose: Define the stable public Rust API boundary for the sieve.
//! Exports: Identifier, metadata, and error types plus the remote client.
//! Role: Public, additive-only surface; hides the core resolver modules.
//! Invariants: This module is the only public path to decode primitives.
//! Invariants: Internal resolver modules remain private and are not exposed.

mod enid;
mod remote;

pub use crate::core::century::CenturyInfo;
pub use crate::core::decode::{Gender, Metadata};
#[doc(hidden)]
pub use crate::core::error::to_exit_code;
pub use crate::core::error::{Error, ErrorKind};
pub use enid::Enid;
pub use remote::RemoteClient;
