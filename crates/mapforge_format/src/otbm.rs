use mapforge_model::{ItemCatalog, LoadReport, MapModel, WarningSink};

use crate::codec;
use crate::config::LoaderConfig;
use crate::node_type::OTBM;
use crate::CodecError;

/// Loads a FormatA (`OTBM`) file. Delegates transparently to [`crate::otmm::load`]
/// if the bytes carry the sibling magic instead (spec.md §4.4.5).
pub fn load<C: ItemCatalog, W: WarningSink>(
    bytes: &[u8],
    catalog: &C,
    config: &LoaderConfig,
    sink: &mut W,
) -> Result<(MapModel, LoadReport), CodecError> {
    codec::load_bytes(bytes, &OTBM, catalog, config, sink)
}

/// Emits `map` as a FormatA file. Writing the same `MapModel` twice
/// produces byte-identical output (spec.md §8 item 4).
pub fn save(map: &MapModel) -> Vec<u8> {
    codec::save_bytes(map, &OTBM)
}
