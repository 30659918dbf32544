//! Reads and writes the two sibling tree-structured map formats on top of
//! `mapforge_nbt`'s node grammar, populating and walking a `MapModel`.
//!
//! `otbm` and `otmm` share everything but file magic, item-subtype
//! masking, the house metadata tail width, and the presence of
//! NPC-spawn/waypoint sections; `codec` holds the shared walk, driven by
//! a [`node_type::Dialect`] value.

mod codec;
mod config;
mod error;
mod node_type;
pub mod otbm;
pub mod otmm;

pub use config::{LoaderConfig, MemoryGuard, UnknownItemPolicy};
pub use error::CodecError;
pub use node_type::{Dialect, HouseTailWidth, OTBM, OTMM, OTBM_MAGIC, OTMM_MAGIC};
