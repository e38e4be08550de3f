//! Credential persistence

pub mod env_file;

pub use env_file::EnvFileCredentialSink;
