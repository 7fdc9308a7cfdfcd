//! Prize wheel layout.

use serde::{Deserialize, Serialize};

use crate::error::CommerceError;

/// What a wheel segment awards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Reward {
    /// Percentage off the order.
    PercentOff { percent: u8 },
    /// Fixed amount off the order, in currency units.
    FixedOff { amount: f64 },
    /// Shipping fee waived.
    FreeShipping,
    /// No prize.
    TryAgain,
}

impl Reward {
    /// Whether landing here earns a voucher.
    pub fn is_win(&self) -> bool {
        !matches!(self, Reward::TryAgain)
    }
}

/// One equal-width slice of the wheel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WheelSegment {
    /// Text printed on the slice.
    pub label: String,
    pub reward: Reward,
}

impl WheelSegment {
    pub fn new(label: impl Into<String>, reward: Reward) -> Self {
        Self {
            label: label.into(),
            reward,
        }
    }
}

/// A wheel of equal-width segments.
///
/// Every segment covers `360 / N` degrees, so each is hit with probability
/// `1 / N` regardless of the prize it carries.
#[derive(Debug, Clone, PartialEq)]
pub struct Wheel {
    segments: Vec<WheelSegment>,
}

impl Wheel {
    /// Build a wheel; it needs at least one segment.
    pub fn new(segments: Vec<WheelSegment>) -> Result<Self, CommerceError> {
        if segments.is_empty() {
            return Err(CommerceError::InvalidWheel(
                "a wheel needs at least one segment".to_string(),
            ));
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[WheelSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Degrees covered by one segment.
    pub fn segment_angle(&self) -> f64 {
        360.0 / self.segments.len() as f64
    }

    /// Index of the segment under `rotation` degrees.
    pub fn index_at(&self, rotation: f64) -> usize {
        let angle = rotation.rem_euclid(360.0);
        let index = (angle / self.segment_angle()).floor() as usize;
        index.min(self.segments.len() - 1)
    }

    /// Segment under `rotation` degrees.
    pub fn segment_at(&self, rotation: f64) -> &WheelSegment {
        &self.segments[self.index_at(rotation)]
    }
}

impl Default for Wheel {
    /// The storefront's promotional wheel.
    fn default() -> Self {
        Self {
            segments: vec![
                WheelSegment::new("10% off", Reward::PercentOff { percent: 10 }),
                WheelSegment::new("Free shipping", Reward::FreeShipping),
                WheelSegment::new("5,000 off", Reward::FixedOff { amount: 5_000.0 }),
                WheelSegment::new("Try again", Reward::TryAgain),
                WheelSegment::new("20% off", Reward::PercentOff { percent: 20 }),
                WheelSegment::new("10,000 off", Reward::FixedOff { amount: 10_000.0 }),
                WheelSegment::new("Try again", Reward::TryAgain),
                WheelSegment::new("5% off", Reward::PercentOff { percent: 5 }),
            ],
        }
    }
}
