//! Plumbing for reading xlsx packages: zip entry lookup and XML event streaming.

pub(crate) mod xml;
pub(crate) mod zip;
