//! Heatmap intensity bands for bucketed views.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::bucket_model::{BucketKey, BucketMap};
use crate::constants::PERCENT_PRECISION;

/// Quantized intensity of a heatmap cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HeatmapBand {
    /// Every bucket in the view is zero.
    NoData,
    Zero,
    Faint,
    Light,
    Medium,
    Strong,
    Intense,
}

impl HeatmapBand {
    pub fn from_intensity(intensity: Decimal) -> Self {
        if intensity <= Decimal::ZERO {
            HeatmapBand::Zero
        } else if intensity < dec!(0.2) {
            HeatmapBand::Faint
        } else if intensity < dec!(0.4) {
            HeatmapBand::Light
        } else if intensity < dec!(0.6) {
            HeatmapBand::Medium
        } else if intensity < dec!(0.8) {
            HeatmapBand::Strong
        } else {
            HeatmapBand::Intense
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            HeatmapBand::NoData => "#f3f4f6",
            HeatmapBand::Zero => "#ebedf0",
            HeatmapBand::Faint => "#c6e48b",
            HeatmapBand::Light => "#9be9a8",
            HeatmapBand::Medium => "#40c463",
            HeatmapBand::Strong => "#30a14e",
            HeatmapBand::Intense => "#216e39",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapCell {
    pub key: BucketKey,
    pub label: String,
    pub value: Decimal,
    /// `value / max` over the view rounded for display, zero when the view has no data.
    /// The band is picked from the unrounded ratio.
    pub intensity: Decimal,
    pub band: HeatmapBand,
    pub color: String,
}

/// Maps every bucket to a band relative to the largest bucket of the view.
pub fn heatmap_cells(buckets: &BucketMap<BucketKey>) -> Vec<HeatmapCell> {
    let max = buckets.max_value();
    buckets
        .iter()
        .map(|(key, value)| {
            let (intensity, band) = if max.is_zero() {
                (Decimal::ZERO, HeatmapBand::NoData)
            } else {
                let ratio = *value / max;
                (
                    ratio.round_dp(PERCENT_PRECISION),
                    HeatmapBand::from_intensity(ratio),
                )
            };
            HeatmapCell {
                key: key.clone(),
                label: key.label(),
                value: *value,
                intensity,
                band,
                color: band.color().to_string(),
            }
        })
        .collect()
}
