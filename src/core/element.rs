//! Structuring elements for morphological operations.
//!
//! A structuring element is a finite set of integer `(dx, dy)` offsets. Disks
//! are the Gauss discretisation of a Euclidean disk: every lattice point with
//! `dx² + dy² <= ρ²`.

use crate::core::error::{ImagingError, ImagingResult};
use serde::{Deserialize, Deserializer, Serialize};

/// Largest accepted half-extent for generated disks and squares.
pub const MAX_RADIUS: i32 = 1024;

/// An immutable set of neighbourhood offsets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructuringElement {
    offsets: Vec<(i32, i32)>,
    radius: i32,
}

/// Only the offsets are read back; they go through
/// [`StructuringElement::from_offsets`] and the radius is recomputed.
impl<'de> Deserialize<'de> for StructuringElement {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Offsets {
            offsets: Vec<(i32, i32)>,
        }

        let raw = Offsets::deserialize(deserializer)?;
        Self::from_offsets(raw.offsets).map_err(serde::de::Error::custom)
    }
}

impl StructuringElement {
    /// Discrete disk of radius `rho`, `0 <= rho <= MAX_RADIUS`.
    pub fn disk(rho: f64) -> ImagingResult<Self> {
        if !rho.is_finite() || rho < 0.0 {
            return Err(ImagingError::invalid_parameter(
                "radius",
                rho,
                "disk radius must be finite and non-negative",
            ));
        }
        if rho > f64::from(MAX_RADIUS) {
            return Err(ImagingError::invalid_parameter(
                "radius",
                rho,
                format!("disk radius must be at most {}", MAX_RADIUS),
            ));
        }
        let bound = rho.floor() as i64 + 1;
        let rho_sq = rho * rho;
        let mut offsets = Vec::new();
        for dy in -bound..=bound {
            for dx in -bound..=bound {
                if (dx * dx + dy * dy) as f64 <= rho_sq {
                    offsets.push((dx as i32, dy as i32));
                }
            }
        }
        Ok(Self::from_parts(offsets))
    }

    /// Full `(2r+1)²` square, `radius <= MAX_RADIUS`.
    pub fn square(radius: u32) -> ImagingResult<Self> {
        match i32::try_from(radius) {
            Ok(r) if r <= MAX_RADIUS => Ok(Self::square_of(r)),
            _ => Err(ImagingError::invalid_parameter(
                "radius",
                radius,
                format!("square radius must be at most {}", MAX_RADIUS),
            )),
        }
    }

    fn square_of(r: i32) -> Self {
        let offsets = (-r..=r)
            .flat_map(|dy| (-r..=r).map(move |dx| (dx, dy)))
            .collect();
        Self { offsets, radius: r }
    }

    /// The 5-point 4-neighbourhood.
    pub fn cross() -> Self {
        Self {
            offsets: vec![(0, 0), (1, 0), (-1, 0), (0, 1), (0, -1)],
            radius: 1,
        }
    }

    /// Arbitrary offsets. Duplicates are dropped, order is kept.
    pub fn from_offsets(offsets: Vec<(i32, i32)>) -> ImagingResult<Self> {
        if offsets.is_empty() {
            return Err(ImagingError::invalid_parameter(
                "offsets",
                "[]",
                "structuring element needs at least one offset",
            ));
        }
        let mut unique = Vec::with_capacity(offsets.len());
        for offset in offsets {
            if !unique.contains(&offset) {
                unique.push(offset);
            }
        }
        Ok(Self::from_parts(unique))
    }

    fn from_parts(offsets: Vec<(i32, i32)>) -> Self {
        let radius = offsets
            .iter()
            .map(|&(dx, dy)| dx.abs().max(dy.abs()))
            .max()
            .unwrap_or(0);
        Self { offsets, radius }
    }

    /// The `(dx, dy)` offsets.
    pub fn offsets(&self) -> &[(i32, i32)] {
        &self.offsets
    }

    /// Bounding half-extent.
    pub fn radius(&self) -> i32 {
        self.radius
    }

    /// Number of offsets.
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Always false for elements built through the public constructors.
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Whether `(dx, dy)` belongs to the element.
    pub fn contains(&self, dx: i32, dy: i32) -> bool {
        self.offsets.contains(&(dx, dy))
    }
}

impl Default for StructuringElement {
    fn default() -> Self {
        StructuringElement::square_of(1)
    }
}
