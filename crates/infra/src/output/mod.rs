//! Artifact output

pub mod mapping_writer;

pub use mapping_writer::MappingWriter;
