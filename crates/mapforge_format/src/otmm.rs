use mapforge_model::{ItemCatalog, LoadReport, MapModel, WarningSink};

use crate::codec;
use crate::config::LoaderConfig;
use crate::node_type::OTMM;
use crate::CodecError;

/// Loads a FormatB (`OTMM`) file. Delegates transparently to [`crate::otbm::load`]
/// if the bytes carry the sibling magic instead (spec.md §4.4.5).
pub fn load<C: ItemCatalog, W: WarningSink>(
    bytes: &[u8],
    catalog: &C,
    config: &LoaderConfig,
    sink: &mut W,
) -> Result<(MapModel, LoadReport), CodecError> {
    codec::load_bytes(bytes, &OTMM, catalog, config, sink)
}

/// Emits `map` as a FormatB file, masking item `subtype` to its low 4
/// bits and using the canonical 17-byte `HOUSE` tail (see `DESIGN.md`).
pub fn save(map: &MapModel) -> Vec<u8> {
    codec::save_bytes(map, &OTMM)
}
