//! Profile-picture mapping generation

pub mod service;

pub use service::{build_mapping, PfpMappingService};
