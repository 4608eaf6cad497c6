//! Pure domain logic for the fan-out dispatcher.
//!
//! Nothing in this crate performs I/O. Storage, HTTP delivery and the
//! server live in `fanout-storage`, `fanout-dispatch` and `fanout-api`.

pub mod bundle;
pub mod error;
pub mod partition;
pub mod roster;
pub mod submitter;
