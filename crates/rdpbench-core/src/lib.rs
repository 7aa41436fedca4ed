//! Core contracts for rdpbench.
//!
//! This crate defines the research data product (RDP) model the engine reads,
//! the metadata record types, and the narrow network capability used by
//! checks that verify external claims.

pub mod error;
pub mod metadata;
pub mod network;
pub mod rdp;

pub use error::{Error, Result};
pub use metadata::{
    DateEntry, Description, Metadata, NameIdentifier, NameType, Person, RelatedResource, Rights,
    Subject, Title,
};
pub use network::{Resolution, ResolveError, Resolver, StaticResolver};
pub use rdp::{Bundle, DataItem, MetadataProvider, Rdp, RdpRecord, Service};
