//! # Conduit Destinations
//!
//! Built-in vendor integrations.
//!
//! - [`schematic`]: cloud mode, one POST per event to the Schematic API.
//! - [`fullstory`]: device mode, calls into the FullStory browser SDK.
//!
//! [`Catalog`] collects them for runtimes that look destinations up by
//! slug.

#![forbid(unsafe_code)]

mod catalog;
pub mod fullstory;
pub mod schematic;

pub use catalog::{Catalog, CatalogError, DestinationSummary};
