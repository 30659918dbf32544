//! Binary map codec and live collaborative editing engine for a
//! Tibia-family world editor (spec.md).
//!
//! Re-exports the workspace's crates behind the `format` and `live`
//! features so a consumer can depend on just `mapforge` instead of wiring
//! up each crate individually.

pub use mapforge_io as io;
pub use mapforge_model as model;
pub use mapforge_nbt as nbt;

#[cfg(feature = "format")]
pub use mapforge_format as format;

#[cfg(feature = "live")]
pub use mapforge_live as live;
