use crate::Position;

/// Which non-fatal anomaly a [`Warning`] describes. Mirrors the original
/// loader's `LoadWarning.code` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningCode {
    UnknownItemId,
    UnknownNodeType,
    UnknownAttribute,
    UnsupportedVersion,
    DuplicateTile,
    DuplicateHouse,
    DuplicateTown,
    DuplicateZone,
}

/// What the loader did in response to the anomaly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningAction {
    Placeholder,
    Skipped,
    Dropped,
    Continued,
}

/// A single non-fatal load anomaly, with enough structure for a host to
/// render a precise diagnostic (coordinate, original raw id) rather than
/// a free-text message alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub code: WarningCode,
    pub message: String,
    pub raw_id: Option<u32>,
    pub position: Option<Position>,
    pub action: WarningAction,
}

impl Warning {
    pub fn new(code: WarningCode, message: impl Into<String>, action: WarningAction) -> Self {
        Self {
            code,
            message: message.into(),
            raw_id: None,
            position: None,
            action,
        }
    }

    pub fn with_raw_id(mut self, raw_id: u32) -> Self {
        self.raw_id = Some(raw_id);
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }
}

/// Accumulated outcome of a single load: every non-fatal anomaly recorded
/// along the way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub warnings: Vec<Warning>,
}

impl LoadReport {
    pub fn push(&mut self, warning: Warning) {
        self.warnings.push(warning);
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn count(&self, code: WarningCode) -> usize {
        self.warnings.iter().filter(|w| w.code == code).count()
    }
}
