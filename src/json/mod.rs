//! Purpose: Internal fast-JSON parsing boundary for single-buffer decode paths.
//! Exports: `parse` module with decode helpers used by the fast shape path.
//! Role: Single seam for the simd-json parser so callsites avoid ad hoc decode logic.
//! Invariants: Fast-path JSON decoding goes through this module.
//! Invariants: Helper APIs stay small and deterministic (no hidden global state).

pub(crate) mod parse;
