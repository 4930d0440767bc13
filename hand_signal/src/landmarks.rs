//! The 21-point hand landmark set delivered by the detector.
//!
//! Coordinates follow the detector's image convention: `x`/`y` roughly in
//! `[0, 1]` with `y` growing downward, `z` a relative depth estimate.

use crate::error::SignalError;

// ════════════════════════════════════════════════════════════════════════════
// Landmark indices
// ════════════════════════════════════════════════════════════════════════════

pub const LANDMARK_COUNT: usize = 21;

pub const WRIST:      usize = 0;
pub const THUMB_CMC:  usize = 1;
pub const THUMB_MCP:  usize = 2;
pub const THUMB_IP:   usize = 3;
pub const THUMB_TIP:  usize = 4;
pub const INDEX_MCP:  usize = 5;
pub const INDEX_PIP:  usize = 6;
pub const INDEX_DIP:  usize = 7;
pub const INDEX_TIP:  usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP:   usize = 13;
pub const RING_PIP:   usize = 14;
pub const RING_DIP:   usize = 15;
pub const RING_TIP:   usize = 16;
pub const PINKY_MCP:  usize = 17;
pub const PINKY_PIP:  usize = 18;
pub const PINKY_DIP:  usize = 19;
pub const PINKY_TIP:  usize = 20;

/// Non-thumb fingertips, used for openness.
pub const FINGERTIPS: [usize; 4] = [INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];

/// Landmarks averaged into the palm center.
pub const PALM: [usize; 3] = [WRIST, INDEX_MCP, PINKY_MCP];

// ════════════════════════════════════════════════════════════════════════════
// Landmark
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Landmark { x, y, z }
    }

    /// Euclidean distance in the image plane (depth ignored).
    pub fn planar_distance(&self, other: &Landmark) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LandmarkSet
// ════════════════════════════════════════════════════════════════════════════

/// Exactly [`LANDMARK_COUNT`] points in fixed semantic order.
///
/// The fixed-size array makes the detector's cardinality contract a type
/// invariant; the only fallible constructors are the ones that accept
/// untyped buffers at the detector boundary.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LandmarkSet {
    points: [Landmark; LANDMARK_COUNT],
}

impl LandmarkSet {
    pub fn new(points: [Landmark; LANDMARK_COUNT]) -> Self {
        LandmarkSet { points }
    }

    /// Build from a slice of points, which must hold exactly 21 entries.
    pub fn from_points(points: &[Landmark]) -> Result<Self, SignalError> {
        let points: [Landmark; LANDMARK_COUNT] = points.try_into().map_err(|_| {
            SignalError::LandmarkCount { expected: LANDMARK_COUNT, found: points.len() }
        })?;
        Ok(LandmarkSet { points })
    }

    /// Build from a flat `[x0, y0, z0, x1, y1, z1, …]` buffer.
    pub fn from_flat(data: &[f32]) -> Result<Self, SignalError> {
        if data.len() % 3 != 0 {
            return Err(SignalError::FlatLength(data.len()));
        }
        let found = data.len() / 3;
        if found != LANDMARK_COUNT {
            return Err(SignalError::LandmarkCount { expected: LANDMARK_COUNT, found });
        }
        let mut points = [Landmark::default(); LANDMARK_COUNT];
        for (p, xyz) in points.iter_mut().zip(data.chunks_exact(3)) {
            *p = Landmark::new(xyz[0], xyz[1], xyz[2]);
        }
        Ok(LandmarkSet { points })
    }

    pub fn points(&self) -> &[Landmark; LANDMARK_COUNT] { &self.points }

    pub fn wrist(&self) -> Landmark { self.points[WRIST] }
}

impl std::ops::Index<usize> for LandmarkSet {
    type Output = Landmark;

    fn index(&self, idx: usize) -> &Landmark {
        &self.points[idx]
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_flat_reads_triples_in_order() {
        let data: Vec<f32> = (0..LANDMARK_COUNT * 3).map(|i| i as f32).collect();
        let set = LandmarkSet::from_flat(&data).unwrap();
        assert_eq!(set[WRIST], Landmark::new(0.0, 1.0, 2.0));
        assert_eq!(set[PINKY_TIP], Landmark::new(60.0, 61.0, 62.0));
    }

    #[test]
    fn from_flat_rejects_wrong_count() {
        let data = vec![0.0; 20 * 3];
        assert_eq!(
            LandmarkSet::from_flat(&data),
            Err(SignalError::LandmarkCount { expected: 21, found: 20 })
        );
    }

    #[test]
    fn from_flat_rejects_ragged_buffer() {
        let data = vec![0.0; 64];
        assert_eq!(LandmarkSet::from_flat(&data), Err(SignalError::FlatLength(64)));
    }

    #[test]
    fn from_points_requires_exactly_21() {
        assert!(LandmarkSet::from_points(&[Landmark::default(); 21]).is_ok());
        assert!(LandmarkSet::from_points(&[Landmark::default(); 22]).is_err());
    }

    #[test]
    fn planar_distance_ignores_depth() {
        let a = Landmark::new(0.0, 0.0, 5.0);
        let b = Landmark::new(0.3, 0.4, -5.0);
        assert!((a.planar_distance(&b) - 0.5).abs() < 1e-6);
    }
}
