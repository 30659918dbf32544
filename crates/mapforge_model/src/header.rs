/// Root-level metadata common to both formats.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MapHeader {
    pub format_version: u32,
    pub width: u16,
    pub height: u16,
    pub description: String,
    pub spawnfile: String,
    pub housefile: String,
    pub zonefile: String,
}
