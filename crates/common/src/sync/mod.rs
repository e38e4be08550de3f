//! Synchronisation primitives for async callers

pub mod singleflight;

pub use singleflight::SingleFlight;
