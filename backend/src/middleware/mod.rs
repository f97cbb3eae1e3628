//! Request middleware.
//!
//! Purpose: cross-cutting request concerns that run before any handler:
//! trace identifiers and the origin gate.

pub mod origin;
pub mod trace;

pub use origin::OriginGate;
pub use trace::Trace;
