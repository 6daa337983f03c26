//! Region scoring.
//!
//! The obstacle-height band of a depth frame is cut into five equal-width
//! columns. Each column is reduced to a clearance score in `[0, 1]` from the
//! median of its valid samples.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::config::NavigationConfig;
use crate::frame::DepthFrame;

/// Score of any region whose median sits exactly at `min_safe_mm`.
const FLOOR_SCORE: f32 = 0.3;
const FLOOR_SPAN: f32 = 1.0 - FLOOR_SCORE;

// -------------------- Regions --------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    FarLeft,
    Left,
    Center,
    Right,
    FarRight,
}

impl Region {
    /// Left to right.
    pub const ALL: [Region; 5] = [
        Region::FarLeft,
        Region::Left,
        Region::Center,
        Region::Right,
        Region::FarRight,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Region::FarLeft => "far_left",
            Region::Left => "left",
            Region::Center => "center",
            Region::Right => "right",
            Region::FarRight => "far_right",
        }
    }

    fn column(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Clearance score per region. A region absent from the map reads as 0.0.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionScores(BTreeMap<Region, f32>);

impl RegionScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every region at the same score.
    pub fn uniform(score: f32) -> Self {
        Region::ALL.iter().map(|&region| (region, score)).collect()
    }

    pub fn get(&self, region: Region) -> f32 {
        self.0.get(&region).copied().unwrap_or(0.0)
    }

    pub fn insert(&mut self, region: Region, score: f32) {
        self.0.insert(region, score);
    }

    pub fn iter(&self) -> impl Iterator<Item = (Region, f32)> + '_ {
        self.0.iter().map(|(&region, &score)| (region, score))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(Region, f32)> for RegionScores {
    fn from_iter<I: IntoIterator<Item = (Region, f32)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// What the scorer saw in one region.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegionStats {
    pub valid_samples: usize,
    /// `None` when the region was data-starved.
    pub median_mm: Option<f32>,
    pub score: f32,
}

// -------------------- Scorer --------------------

/// Reduces a depth frame to per-region clearance scores.
#[derive(Clone, Debug)]
pub struct RegionScorer {
    band_top: f64,
    band_bottom: f64,
    invalid_depth_mm: u16,
    min_safe_mm: u16,
    max_clear_mm: u16,
    min_valid_samples: usize,
}

impl RegionScorer {
    /// Expects a config that already passed `NavigationConfig::validate`.
    pub fn new(config: &NavigationConfig) -> Self {
        Self {
            band_top: config.band_top,
            band_bottom: config.band_bottom,
            invalid_depth_mm: config.invalid_depth_mm,
            min_safe_mm: config.min_safe_mm,
            max_clear_mm: config.max_clear_mm,
            min_valid_samples: config.min_valid_samples,
        }
    }

    pub fn score(&self, frame: &DepthFrame) -> RegionScores {
        self.score_detailed(frame)
            .into_iter()
            .map(|(region, stats)| (region, stats.score))
            .collect()
    }

    /// Scores plus the sample count and median behind each one.
    pub fn score_detailed(&self, frame: &DepthFrame) -> BTreeMap<Region, RegionStats> {
        let mut buckets: [Vec<u16>; 5] = Default::default();
        let (top, bottom) = self.band_rows(frame.height());
        let bounds = column_bounds(frame.width());

        for y in top..bottom {
            let Some(row) = frame.row(y) else { break };
            for region in Region::ALL {
                let (start, end) = bounds[region.column()];
                buckets[region.column()].extend(
                    row[start..end]
                        .iter()
                        .copied()
                        .filter(|&depth| depth > 0 && depth < self.invalid_depth_mm),
                );
            }
        }

        Region::ALL
            .iter()
            .zip(buckets)
            .map(|(&region, samples)| (region, self.region_stats(region, samples)))
            .collect()
    }

    fn region_stats(&self, region: Region, mut samples: Vec<u16>) -> RegionStats {
        let valid_samples = samples.len();
        if valid_samples <= self.min_valid_samples {
            log::debug!(
                "region {} data-starved ({} valid samples)",
                region,
                valid_samples
            );
            return RegionStats {
                valid_samples,
                median_mm: None,
                score: 0.0,
            };
        }
        let median = median_of(&mut samples);
        RegionStats {
            valid_samples,
            median_mm: Some(median),
            score: self.clearance(median),
        }
    }

    /// Piecewise-linear map from median distance to clearance score.
    pub fn clearance(&self, median_mm: f32) -> f32 {
        let min_safe = f32::from(self.min_safe_mm);
        let max_clear = f32::from(self.max_clear_mm);
        if !median_mm.is_finite() || median_mm < min_safe {
            return 0.0;
        }
        if median_mm >= max_clear {
            return 1.0;
        }
        let normalized = ((median_mm - min_safe) / (max_clear - min_safe)).clamp(0.0, 1.0);
        (FLOOR_SCORE + normalized * FLOOR_SPAN).clamp(0.0, 1.0)
    }

    fn band_rows(&self, height: u32) -> (u32, u32) {
        // The epsilon keeps 400 * 0.35 at 140 rather than 139.
        let h = f64::from(height);
        let top = (h * self.band_top + 1e-9).floor() as u32;
        let bottom = (h * self.band_bottom + 1e-9).floor() as u32;
        (top.min(height), bottom.min(height))
    }
}

/// `[k*w/5, (k+1)*w/5)` per region. The last region ends at `w`, so any
/// remainder columns are spread across regions rather than dropped.
fn column_bounds(width: u32) -> [(usize, usize); 5] {
    let w = width as usize;
    let mut bounds = [(0, 0); 5];
    for (k, bound) in bounds.iter_mut().enumerate() {
        *bound = (k * w / 5, (k + 1) * w / 5);
    }
    bounds
}

fn median_of(samples: &mut [u16]) -> f32 {
    samples.sort_unstable();
    let mid = samples.len() / 2;
    if samples.len() % 2 == 0 {
        (f32::from(samples[mid - 1]) + f32::from(samples[mid])) / 2.0
    } else {
        f32::from(samples[mid])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer() -> RegionScorer {
        RegionScorer::new(&NavigationConfig::default())
    }

    /// 640x400 frame where each region is filled with its own depth.
    fn banded_frame(depths: [u16; 5]) -> DepthFrame {
        DepthFrame::from_fn(640, 400, |x, _| depths[(x as usize * 5) / 640])
    }

    #[test]
    fn clearance_curve_hits_anchor_points() {
        let s = scorer();
        assert_eq!(s.clearance(399.0), 0.0);
        assert_eq!(s.clearance(400.0), 0.3);
        assert_eq!(s.clearance(2000.0), 1.0);
        assert_eq!(s.clearance(4999.0), 1.0);
        assert!((s.clearance(1200.0) - 0.65).abs() < 1e-6);
    }

    #[test]
    fn uniform_frames_score_by_median() {
        let s = scorer();
        assert_eq!(s.score(&DepthFrame::filled(640, 400, 3000)), RegionScores::uniform(1.0));
        assert_eq!(s.score(&DepthFrame::filled(640, 400, 400)), RegionScores::uniform(0.3));
        assert_eq!(s.score(&DepthFrame::filled(640, 400, 200)), RegionScores::uniform(0.0));
    }

    #[test]
    fn invalid_samples_are_excluded_not_scored_as_near() {
        let s = scorer();
        assert_eq!(s.score(&DepthFrame::filled(640, 400, 0)), RegionScores::uniform(0.0));
        assert_eq!(s.score(&DepthFrame::filled(640, 400, 5000)), RegionScores::uniform(0.0));

        // Half the center pixels are zero: the median comes from the valid half only.
        let frame = DepthFrame::from_fn(640, 400, |x, _| if x % 2 == 0 { 0 } else { 2400 });
        let stats = s.score_detailed(&frame);
        assert_eq!(stats[&Region::Center].median_mm, Some(2400.0));
        assert_eq!(stats[&Region::Center].score, 1.0);
    }

    #[test]
    fn regions_are_scored_independently() {
        let scores = scorer().score(&banded_frame([3000, 2500, 200, 2500, 0]));
        assert_eq!(scores.get(Region::FarLeft), 1.0);
        assert_eq!(scores.get(Region::Left), 1.0);
        assert_eq!(scores.get(Region::Center), 0.0);
        assert_eq!(scores.get(Region::Right), 1.0);
        assert_eq!(scores.get(Region::FarRight), 0.0);
    }

    #[test]
    fn only_the_band_is_considered() {
        // Obstacle everywhere except the middle band.
        let frame = DepthFrame::from_fn(640, 400, |_, y| if (140..260).contains(&y) { 3000 } else { 100 });
        assert_eq!(scorer().score(&frame), RegionScores::uniform(1.0));
    }

    #[test]
    fn data_starved_region_scores_zero() {
        // 25x20 frame: band rows 7..13, 5 columns per region -> 30 samples each.
        let stats = scorer().score_detailed(&DepthFrame::filled(25, 20, 3000));
        for region in Region::ALL {
            assert_eq!(stats[&region].valid_samples, 30);
            assert_eq!(stats[&region].median_mm, None);
            assert_eq!(stats[&region].score, 0.0);
        }
    }

    #[test]
    fn exactly_min_valid_samples_is_still_starved() {
        // 50 wide, 10 tall: band rows 3..6 -> 3 rows x 10 columns = 30. Tune the threshold to match.
        let cfg = NavigationConfig {
            min_valid_samples: 30,
            ..NavigationConfig::default()
        };
        let frame = DepthFrame::filled(50, 10, 3000);
        assert_eq!(RegionScorer::new(&cfg).score(&frame), RegionScores::uniform(0.0));

        let cfg = NavigationConfig {
            min_valid_samples: 29,
            ..NavigationConfig::default()
        };
        assert_eq!(RegionScorer::new(&cfg).score(&frame), RegionScores::uniform(1.0));
    }

    #[test]
    fn sparse_noise_does_not_move_the_median() {
        let frame = DepthFrame::from_fn(640, 400, |x, y| if (x + y) % 97 == 0 { 60 } else { 1200 });
        let stats = scorer().score_detailed(&frame);
        assert_eq!(stats[&Region::Center].median_mm, Some(1200.0));
    }

    #[test]
    fn even_sample_count_averages_middle_pair() {
        let mut samples = vec![1000, 400, 3000, 600];
        assert_eq!(median_of(&mut samples), 800.0);
    }

    #[test]
    fn degenerate_frames_score_zero() {
        let s = scorer();
        assert_eq!(s.score(&DepthFrame::empty()), RegionScores::uniform(0.0));
        assert_eq!(s.score(&DepthFrame::filled(0, 400, 3000)), RegionScores::uniform(0.0));
        assert_eq!(s.score(&DepthFrame::filled(640, 1, 3000)), RegionScores::uniform(0.0));
    }

    #[test]
    fn narrow_frames_leave_some_regions_without_columns() {
        assert_eq!(column_bounds(3), [(0, 0), (0, 1), (1, 1), (1, 2), (2, 3)]);

        // Band rows 140..260: each one-column region still has 120 samples.
        let stats = scorer().score_detailed(&DepthFrame::filled(3, 400, 3000));
        for region in [Region::FarLeft, Region::Center] {
            assert_eq!(stats[&region].valid_samples, 0);
            assert_eq!(stats[&region].score, 0.0);
        }
        for region in [Region::Left, Region::Right, Region::FarRight] {
            assert_eq!(stats[&region].valid_samples, 120);
            assert_eq!(stats[&region].score, 1.0);
        }
    }

    #[test]
    fn remainder_columns_keep_every_region_non_empty() {
        for width in [5u32, 7, 641, 1279] {
            let bounds = column_bounds(width);
            assert_eq!(bounds[0].0, 0);
            assert_eq!(bounds[4].1, width as usize);
            for (start, end) in bounds {
                assert!(end > start, "empty region at width {}", width);
            }
        }
    }

    #[test]
    fn scores_stay_in_unit_range() {
        let s = scorer();
        for depth in (0u16..=6000).step_by(37) {
            for (_, score) in s.score(&DepthFrame::filled(100, 60, depth)).iter() {
                assert!((0.0..=1.0).contains(&score), "depth {} -> {}", depth, score);
            }
        }
    }

    #[test]
    fn missing_region_reads_as_zero() {
        let mut scores = RegionScores::new();
        scores.insert(Region::Left, 0.9);
        assert_eq!(scores.get(Region::Left), 0.9);
        assert_eq!(scores.get(Region::FarRight), 0.0);
    }

    #[test]
    fn scores_serialize_with_region_names() {
        let mut scores = RegionScores::new();
        scores.insert(Region::FarLeft, 0.5);
        let json = serde_json::to_string(&scores).unwrap();
        assert_eq!(json, r#"{"far_left":0.5}"#);
    }
}
