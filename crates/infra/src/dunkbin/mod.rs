//! Dunkbin adapters

pub mod client;

pub use client::DunkbinClient;
