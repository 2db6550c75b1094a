use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four regions of the (breadth, strength) z-score plane.
///
/// The x axis is breadth and the y axis is strength, so the quadrants read
/// counter-clockwise from the top right: Greed, Mixed, Fear, Recovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quadrant {
    /// Breadth and strength both at or above their trailing average.
    Greed,
    /// Strength holding up while breadth lags.
    Mixed,
    /// Breadth and strength both below their trailing average.
    Fear,
    /// Breadth improving while strength is still weak.
    Recovery,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::Greed,
        Quadrant::Mixed,
        Quadrant::Fear,
        Quadrant::Recovery,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Quadrant::Greed => "Greed",
            Quadrant::Mixed => "Mixed",
            Quadrant::Fear => "Fear",
            Quadrant::Recovery => "Recovery",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Quadrant::Greed => "broad participation with strong prices",
            Quadrant::Mixed => "strong prices on narrowing participation",
            Quadrant::Fear => "weak prices on narrowing participation",
            Quadrant::Recovery => "participation returning ahead of prices",
        }
    }

    /// The shading colour the dashboard uses for this region.
    pub fn color(&self) -> &'static str {
        match self {
            Quadrant::Greed => "green",
            Quadrant::Mixed => "orange",
            Quadrant::Fear => "red",
            Quadrant::Recovery => "blue",
        }
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
