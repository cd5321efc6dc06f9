//! Suspicion tracking
//!
//! A short rolling history of detection readings. Rather than chasing the
//! last literal sighting, the pursuer asks where suspicion has been building
//! over the last couple of seconds and investigates in that direction.

use serde::{Deserialize, Serialize};
use stalk_math::Vec3;
use std::collections::VecDeque;

/// Samples older than this (seconds) are dropped
pub const RETENTION_WINDOW: f64 = 2.0;
/// Number of most recent samples compared against the rest for the trend
pub const TREND_RECENT_SAMPLES: usize = 3;
/// Recent mean must beat the older mean by more than this to count as rising
pub const TREND_THRESHOLD: f32 = 0.05;
/// Number of most recent samples blended into the investigation direction
pub const ESTIMATE_SAMPLES: usize = 5;
/// Investigation distance at zero suspicion
pub const BASE_INVESTIGATE_DISTANCE: f32 = 3.0;
/// Extra investigation distance at full suspicion
pub const SUSPICION_INVESTIGATE_DISTANCE: f32 = 5.0;

/// One timestamped detection reading
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SuspicionSample {
    /// Observed (or last known) player position
    pub position: Vec3,
    /// Unit direction from pursuer to `position`; zero when the signal was lost
    pub direction: Vec3,
    /// Detection strength in `[0, 1]`
    pub strength: f32,
    /// Capture time in simulation seconds
    pub timestamp: f64,
}

impl SuspicionSample {
    /// A sample recording that the target was not seen
    pub fn is_lost(&self) -> bool {
        self.strength <= 0.0
    }
}

/// Rolling, time-windowed history of detection samples
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuspicionTracker {
    /// Samples ordered by timestamp, oldest first
    samples: VecDeque<SuspicionSample>,
    /// Latest recorded strength, including zero
    current_level: f32,
    /// Last position a positive sample saw the player at
    last_known_position: Option<Vec3>,
    /// Height investigation targets are pinned to
    ground_y: f32,
}

impl SuspicionTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin investigation targets to a different floor height
    pub fn with_ground_y(mut self, ground_y: f32) -> Self {
        self.ground_y = ground_y;
        self
    }

    /// Record one reading.
    ///
    /// A non-positive strength (or a missing player) appends a "signal lost"
    /// sample that carries the last known position and no direction.
    pub fn record_sample(&mut self, strength: f32, player: Option<Vec3>, pursuer: Vec3, now: f64) {
        let timestamp = self
            .samples
            .back()
            .map_or(now, |last| now.max(last.timestamp));
        let strength = if strength.is_finite() { strength.clamp(0.0, 1.0) } else { 0.0 };

        let sample = match player {
            Some(position) if strength > 0.0 => {
                self.last_known_position = Some(position);
                SuspicionSample {
                    position,
                    direction: (position - pursuer).horizontal().normalize_or_zero(),
                    strength,
                    timestamp,
                }
            }
            _ => SuspicionSample {
                position: self.last_known_position.unwrap_or(pursuer),
                direction: Vec3::ZERO,
                strength: 0.0,
                timestamp,
            },
        };

        self.current_level = sample.strength;
        self.samples.push_back(sample);
    }

    /// Seed the position that "signal lost" samples carry
    pub fn note_last_known(&mut self, position: Vec3) {
        self.last_known_position = Some(position);
    }

    /// Drop samples older than the retention window
    pub fn prune_expired(&mut self, now: f64) {
        while let Some(front) = self.samples.front() {
            if now - front.timestamp > RETENTION_WINDOW {
                self.samples.pop_front();
            } else {
                break;
            }
        }
    }

    /// Whether detection has been trending up.
    ///
    /// Compares the mean of the most recent samples against the mean of the
    /// remainder (which always keeps at least one sample).
    pub fn is_increasing(&self) -> bool {
        let n = self.samples.len();
        if n < 2 {
            return false;
        }

        let recent_count = TREND_RECENT_SAMPLES.min(n - 1);
        let split = n - recent_count;

        let older = mean(self.samples.iter().take(split).map(|s| s.strength));
        let recent = mean(self.samples.iter().skip(split).map(|s| s.strength));
        recent - older > TREND_THRESHOLD
    }

    /// Best guess of where to look.
    ///
    /// Blends the directions of the last few samples weighted by strength and
    /// projects from `current` along that heading; stronger suspicion looks
    /// further out. Falls back to `last_known` when there is nothing to go on.
    pub fn estimate_investigation_target(&self, current: Vec3, suspicion_level: f32, last_known: Vec3) -> Vec3 {
        if self.samples.is_empty() {
            return last_known;
        }

        let mut weighted = Vec3::ZERO;
        let mut total_weight = 0.0;
        for sample in self.samples.iter().rev().take(ESTIMATE_SAMPLES) {
            weighted += sample.direction * sample.strength;
            total_weight += sample.strength;
        }

        if total_weight <= 0.0 {
            return last_known;
        }

        let direction = (weighted / total_weight).horizontal().normalize_or_zero();
        if direction == Vec3::ZERO {
            return last_known;
        }

        let level = suspicion_level.clamp(0.0, 1.0);
        let distance = BASE_INVESTIGATE_DISTANCE + level * SUSPICION_INVESTIGATE_DISTANCE;
        (current + direction * distance).with_y(self.ground_y)
    }

    /// Latest recorded strength
    pub fn current_level(&self) -> f32 {
        self.current_level
    }

    /// Last position a positive sample saw the player at
    pub fn last_known_position(&self) -> Option<Vec3> {
        self.last_known_position
    }

    /// Forget everything
    pub fn clear(&mut self) {
        self.samples.clear();
        self.current_level = 0.0;
        self.last_known_position = None;
    }

    /// Samples, oldest first
    pub fn samples(&self) -> impl Iterator<Item = &SuspicionSample> {
        self.samples.iter()
    }

    /// Number of retained samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether no samples are retained
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

fn mean(values: impl Iterator<Item = f32>) -> f32 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 { 0.0 } else { sum / count as f32 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn feed(tracker: &mut SuspicionTracker, strengths: &[f32]) {
        for (i, &s) in strengths.iter().enumerate() {
            tracker.record_sample(s, Some(Vec3::ground(0.0, 10.0)), Vec3::ZERO, i as f64 * 0.1);
        }
    }

    #[test]
    fn test_rising_sequence_is_increasing() {
        let mut tracker = SuspicionTracker::new();
        feed(&mut tracker, &[0.1, 0.2, 0.3, 0.4]);
        assert!(tracker.is_increasing());
    }

    #[test]
    fn test_flat_and_falling_are_not_increasing() {
        let mut flat = SuspicionTracker::new();
        feed(&mut flat, &[0.5, 0.5, 0.52, 0.53, 0.54]);
        assert!(!flat.is_increasing());

        let mut falling = SuspicionTracker::new();
        feed(&mut falling, &[0.8, 0.6, 0.4, 0.2]);
        assert!(!falling.is_increasing());
    }

    #[test]
    fn test_short_history_keeps_an_older_sample() {
        let mut single = SuspicionTracker::new();
        feed(&mut single, &[0.1]);
        assert!(!single.is_increasing());

        let mut pair = SuspicionTracker::new();
        feed(&mut pair, &[0.1, 0.5]);
        assert!(pair.is_increasing());
    }

    #[test]
    fn test_lost_sample_is_retained() {
        let mut tracker = SuspicionTracker::new();
        tracker.record_sample(0.6, Some(Vec3::ground(4.0, 0.0)), Vec3::ZERO, 0.0);
        tracker.record_sample(0.0, None, Vec3::ZERO, 0.1);

        assert_eq!(tracker.len(), 2);
        assert_eq!(tracker.current_level(), 0.0);
        let lost = tracker.samples().last().unwrap();
        assert!(lost.is_lost());
        assert_eq!(lost.direction, Vec3::ZERO);
        assert_eq!(lost.position, Vec3::ground(4.0, 0.0));
    }

    #[test]
    fn test_timestamps_never_go_backwards() {
        let mut tracker = SuspicionTracker::new();
        tracker.record_sample(0.5, Some(Vec3::Z), Vec3::ZERO, 1.0);
        tracker.record_sample(0.5, Some(Vec3::Z), Vec3::ZERO, 0.5);
        let stamps: Vec<f64> = tracker.samples().map(|s| s.timestamp).collect();
        assert_eq!(stamps, vec![1.0, 1.0]);
    }

    #[test]
    fn test_prune_expired() {
        let mut tracker = SuspicionTracker::new();
        tracker.record_sample(0.5, Some(Vec3::Z), Vec3::ZERO, 1.0);
        tracker.record_sample(0.5, Some(Vec3::Z), Vec3::ZERO, 2.5);

        tracker.prune_expired(3.0);
        assert_eq!(tracker.len(), 2);

        tracker.prune_expired(1.0 + 2.1);
        assert_eq!(tracker.len(), 1);
        assert_eq!(tracker.samples().next().unwrap().timestamp, 2.5);
    }

    #[test]
    fn test_estimate_falls_back_when_empty() {
        let tracker = SuspicionTracker::new();
        let last_known = Vec3::ground(7.0, -3.0);
        assert_eq!(tracker.estimate_investigation_target(Vec3::ZERO, 0.5, last_known), last_known);
    }

    #[test]
    fn test_estimate_falls_back_when_all_lost() {
        let mut tracker = SuspicionTracker::new();
        tracker.record_sample(0.0, None, Vec3::ZERO, 0.0);
        tracker.record_sample(0.0, None, Vec3::ZERO, 0.1);
        let last_known = Vec3::ground(2.0, 2.0);
        assert_eq!(tracker.estimate_investigation_target(Vec3::ZERO, 0.0, last_known), last_known);
    }

    #[test]
    fn test_estimate_projects_along_weighted_direction() {
        let mut tracker = SuspicionTracker::new();
        tracker.record_sample(0.5, Some(Vec3::ground(10.0, 0.0)), Vec3::ZERO, 0.0);
        tracker.record_sample(0.5, Some(Vec3::ground(0.0, 10.0)), Vec3::ZERO, 0.1);

        let target = tracker.estimate_investigation_target(Vec3::ZERO, 0.0, Vec3::ZERO);
        // Halfway between +X and +Z, three units out
        let expected = 3.0 / 2.0_f32.sqrt();
        assert_abs_diff_eq!(target.x, expected, epsilon = 1e-4);
        assert_abs_diff_eq!(target.z, expected, epsilon = 1e-4);
        assert_eq!(target.y, 0.0);

        let far = tracker.estimate_investigation_target(Vec3::ZERO, 1.0, Vec3::ZERO);
        assert_abs_diff_eq!(far.horizontal().length(), 8.0, epsilon = 1e-4);
    }

    #[test]
    fn test_estimate_uses_only_recent_samples() {
        let mut tracker = SuspicionTracker::new();
        for i in 0..5 {
            tracker.record_sample(1.0, Some(Vec3::ground(-10.0, 0.0)), Vec3::ZERO, i as f64 * 0.1);
        }
        for i in 5..10 {
            tracker.record_sample(0.4, Some(Vec3::ground(10.0, 0.0)), Vec3::ZERO, i as f64 * 0.1);
        }
        let target = tracker.estimate_investigation_target(Vec3::ZERO, 0.0, Vec3::ZERO);
        assert!(target.x > 0.0);
    }

    #[test]
    fn test_clear() {
        let mut tracker = SuspicionTracker::new();
        feed(&mut tracker, &[0.3, 0.6]);
        tracker.clear();
        assert!(tracker.is_empty());
        assert_eq!(tracker.current_level(), 0.0);
        assert!(tracker.last_known_position().is_none());
    }
}
