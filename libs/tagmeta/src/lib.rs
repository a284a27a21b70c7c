//! Metainformation about HTML elements: which attributes and child
//! elements they accept and how they are serialized.

pub mod types;
pub mod meta;
