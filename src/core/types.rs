use serde::{Deserialize, Serialize};

/// Marker color for forward-strand alignments
pub const FWD_COLOR: &str = "rgba(251, 128, 114, 1)";

/// Marker color for reverse-strand alignments
pub const REV_COLOR: &str = "rgba(128, 177, 211, 1)";

/// Direction of an aligned segment between the reference and query axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Both axes increase together
    Fwd,
    /// The axes run in opposite directions (or the segment is flat)
    Rev,
}

impl Orientation {
    /// Classify a slope. A slope of exactly zero is reverse.
    #[must_use]
    pub fn from_slope(slope: f64) -> Self {
        if slope > 0.0 {
            Self::Fwd
        } else {
            Self::Rev
        }
    }

    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            Self::Fwd => FWD_COLOR,
            Self::Rev => REV_COLOR,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Fwd => "fwd",
            Self::Rev => "rev",
        }
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A per-dataset display label handed to the renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataLabel {
    pub name: String,
    pub xlab: String,
    pub ylab: String,
}

impl DataLabel {
    pub fn new(name: impl Into<String>, xlab: impl Into<String>, ylab: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            xlab: xlab.into(),
            ylab: ylab.into(),
        }
    }

    /// Label for an alignment plot: reference on x, the sample on y
    pub fn versus_reference(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            xlab: "reference".to_string(),
            ylab: name.clone(),
            name,
        }
    }
}
