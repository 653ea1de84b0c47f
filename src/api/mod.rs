//! Purpose: Define the stable public Rust API boundary for Planar.
//! Exports: Core types and operations needed by the server, CLI, and tests.
//! Role: Public, additive-only surface; hides internal module layout.
//! Invariants: This module is the only public path to codec primitives.
//! Invariants: Both codec paths exported here agree on the wire format.

#[doc(hidden)]
pub use crate::core::error::to_exit_code;
pub use crate::core::codec::ShapeCodec;
pub use crate::core::dispatch::{dispatch, dispatch_batch};
pub use crate::core::error::{Error, ErrorKind};
pub use crate::core::fastpath;
pub use crate::core::shape::{KIND_TAGS, Shape, ShapeResult};
pub use crate::core::timestamp::{format_rfc3339, now_rfc3339, unix_seconds};
