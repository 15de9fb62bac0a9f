//! # SDUI Protocol
//!
//! Shared vocabulary between the descriptor parser and its collaborators:
//!
//! - [`ComponentType`] - closed set of component kinds, split into layout and atomic families
//! - [`ComponentDescriptor`] - immutable, exclusively-owned tree node produced by the parser
//! - [`StyleResolver`] / [`AssetSource`] - ports implemented by the rendering and storage layers

mod component;
mod descriptor;
mod ports;

pub use component::{ComponentFamily, ComponentType};
pub use descriptor::{ComponentDescriptor, STYLE_PROPERTY};
pub use ports::{AssetSource, MemoryAssetSource, StyleResolver};

/// JSON schema of a serialized [`ComponentDescriptor`] tree
#[must_use]
pub fn descriptor_schema() -> schemars::Schema {
    schemars::schema_for!(ComponentDescriptor)
}
