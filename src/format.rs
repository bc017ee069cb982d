use serde::{Deserialize, Serialize};

/// How ExifTool renders tag values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Format {
    /// Print-converted values, e.g. `Orientation: Rotate 90 CW`.
    #[default]
    HumanReadable,
    /// Raw values (`-n`), e.g. `Orientation: 6`.
    Numeric,
}

impl Format {
    /// The flag ExifTool needs for this rendering, if any.
    pub fn flag(self) -> Option<&'static str> {
        match self {
            Format::HumanReadable => None,
            Format::Numeric => Some("-n"),
        }
    }
}
