//! The fixed cycle of particle behaviours.

use serde::{Deserialize, Serialize};

pub const MODE_COUNT: usize = 3;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Particles circle the attractor.
    #[default]
    Orbital,
    /// Particles spiral inward around the depth axis.
    Vortex,
    /// Particles burst outward from the attractor.
    Bloom,
}

impl Mode {
    pub const ALL: [Mode; MODE_COUNT] = [Mode::Orbital, Mode::Vortex, Mode::Bloom];

    pub fn index(self) -> usize { self as usize }

    /// Wraps, so any index names a mode.
    pub fn from_index(i: usize) -> Mode {
        Mode::ALL[i % MODE_COUNT]
    }

    /// The mode after this one in the cycle.
    pub fn next(self) -> Mode {
        Mode::from_index(self.index() + 1)
    }

    pub fn name(self) -> &'static str {
        match self {
            Mode::Orbital => "Orbital",
            Mode::Vortex  => "Vortex",
            Mode::Bloom   => "Bloom",
        }
    }
}
