// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Vertical extents and the vertical half of the overlap test.

/// Closed vertical band `[min_z, max_z]` occupied by an element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalExtent {
    pub min_z: f64,
    pub max_z: f64,
}

impl VerticalExtent {
    #[inline]
    pub fn new(min_z: f64, max_z: f64) -> Self {
        Self { min_z, max_z }
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max_z - self.min_z
    }

    /// Distance from the top of `below` up to the bottom of `self`.
    /// Negative when the bands overlap.
    #[inline]
    pub fn gap_above(&self, below: &VerticalExtent) -> f64 {
        self.min_z - below.max_z
    }

    /// Whether `self` sits on top of `candidate` within `tolerance`, or
    /// shares part of its vertical band.
    ///
    /// A terminal hanging just above a room ceiling (`0 < gap <= tolerance`)
    /// and a terminal embedded in the room (`gap <= 0` with its top above the
    /// room floor) both count. Anything else is on another floor.
    pub fn is_aligned_with(&self, candidate: &VerticalExtent, tolerance: f64) -> bool {
        let gap = self.gap_above(candidate);
        if gap > 0.0 {
            gap <= tolerance
        } else {
            self.max_z > candidate.min_z
        }
    }
}
