// Frame pacing - presentation skip cap and refresh-rate throttling
//
// Both operations share one timeline: the skip check records when a frame
// was last shown, and the throttle advances that same timestamp one refresh
// period at a time, re-anchoring to the clock when drift exceeds two
// periods (sleeps are coarse and rendering takes real time).

use std::thread;
use std::time::{Duration, Instant};

/// Refresh rate assumed when the platform reports none
const FALLBACK_REFRESH_RATE: f32 = 60.0;

/// Paces frame presentation against a cap and the display refresh rate
#[derive(Debug, Default)]
pub struct FramePacer {
    /// Minimum interval between displayed frames; `None` shows every frame
    frame_interval: Option<Duration>,
    /// When a frame was last displayed / when the next tick lands
    timeline: Option<Instant>,
}

impl FramePacer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap displayed frames at `max_fps`; zero or negative removes the cap
    pub fn set_max_fps(&mut self, max_fps: f32) {
        self.frame_interval = if max_fps > 0.0 {
            Some(Duration::from_secs_f32(1.0 / max_fps))
        } else {
            None
        };
    }

    /// Current frame cap interval, if any
    pub fn frame_interval(&self) -> Option<Duration> {
        self.frame_interval
    }

    /// True if the frame arriving now should not be displayed
    ///
    /// Returns `false` (and records the presentation) once per cap
    /// interval; with no cap configured every frame is displayed.
    pub fn should_skip_frame(&mut self) -> bool {
        self.should_skip_frame_at(Instant::now())
    }

    fn should_skip_frame_at(&mut self, now: Instant) -> bool {
        let Some(interval) = self.frame_interval else {
            return false;
        };

        // A timeline ahead of the clock (left there by the throttle)
        // counts as elapsed, matching the unsigned wrap the original
        // timestamp arithmetic produced.
        if let Some(last) = self.timeline {
            if let Some(elapsed) = now.checked_duration_since(last) {
                if elapsed < interval {
                    return true;
                }
            }
        }

        self.timeline = Some(now);
        false
    }

    /// Sleep until the next tick of the display refresh period
    ///
    /// `refresh_rate` comes from the window; 60 Hz is assumed when it is
    /// absent or non-positive.
    pub fn throttle(&mut self, refresh_rate: Option<f32>) {
        let target = self.next_throttle_target(Instant::now(), refresh_rate);
        let now = Instant::now();
        if target > now {
            thread::sleep(target - now);
        }
    }

    fn next_throttle_target(&mut self, now: Instant, refresh_rate: Option<f32>) -> Instant {
        let rate = match refresh_rate {
            Some(hz) if hz > 0.0 => hz,
            _ => FALLBACK_REFRESH_RATE,
        };
        let period = Duration::from_secs_f64(1.0 / rate as f64);

        // Tolerate falling behind or running ahead up to two periods;
        // past that, re-anchor to the clock.
        let max_variance = period * 2;
        let target = match self.timeline {
            Some(last) => {
                let drift = if now >= last { now - last } else { last - now };
                if drift > max_variance {
                    now + period
                } else {
                    last + period
                }
            }
            None => now + period,
        };

        self.timeline = Some(target);
        target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_cap_never_skips() {
        let mut pacer = FramePacer::new();
        let now = Instant::now();
        assert!(!pacer.should_skip_frame_at(now));
        assert!(!pacer.should_skip_frame_at(now));
    }

    #[test]
    fn test_cap_skips_within_interval() {
        let mut pacer = FramePacer::new();
        pacer.set_max_fps(30.0);

        let start = Instant::now();
        assert!(!pacer.should_skip_frame_at(start)); // first frame displays

        // 10ms later: under the ~33.3ms interval
        assert!(pacer.should_skip_frame_at(start + Duration::from_millis(10)));

        // 34ms later: interval elapsed, display again
        assert!(!pacer.should_skip_frame_at(start + Duration::from_millis(34)));

        // The display above reset the timeline
        assert!(pacer.should_skip_frame_at(start + Duration::from_millis(44)));
    }

    #[test]
    fn test_cap_can_be_removed() {
        let mut pacer = FramePacer::new();
        pacer.set_max_fps(30.0);
        assert!(pacer.frame_interval().is_some());

        pacer.set_max_fps(0.0);
        assert!(pacer.frame_interval().is_none());

        pacer.set_max_fps(-5.0);
        assert!(pacer.frame_interval().is_none());
    }

    #[test]
    fn test_future_timeline_displays() {
        // The throttle can leave the timeline ahead of the clock; the skip
        // check still displays in that state.
        let mut pacer = FramePacer::new();
        pacer.set_max_fps(30.0);

        let start = Instant::now();
        pacer.next_throttle_target(start, Some(60.0)); // timeline = start + 16.7ms
        assert!(!pacer.should_skip_frame_at(start + Duration::from_millis(1)));
    }

    #[test]
    fn test_throttle_advances_one_period() {
        let mut pacer = FramePacer::new();
        let start = Instant::now();
        let period = Duration::from_secs_f64(1.0 / 60.0);

        let first = pacer.next_throttle_target(start, Some(60.0));
        assert_eq!(first, start + period);

        // Within tolerance: advance exactly one period from the target
        let second = pacer.next_throttle_target(start + period, Some(60.0));
        assert_eq!(second, first + period);
    }

    #[test]
    fn test_throttle_reanchors_after_stall() {
        let mut pacer = FramePacer::new();
        let start = Instant::now();
        let period = Duration::from_secs_f64(1.0 / 60.0);

        pacer.next_throttle_target(start, Some(60.0));

        // Five periods later the schedule is stale; re-anchor to now
        let late = start + period * 5;
        let target = pacer.next_throttle_target(late, Some(60.0));
        assert_eq!(target, late + period);
    }

    #[test]
    fn test_throttle_falls_back_to_60hz() {
        let mut pacer = FramePacer::new();
        let start = Instant::now();

        let target = pacer.next_throttle_target(start, None);
        assert_eq!(target, start + Duration::from_secs_f64(1.0 / 60.0));

        let mut pacer = FramePacer::new();
        let target = pacer.next_throttle_target(start, Some(0.0));
        assert_eq!(target, start + Duration::from_secs_f64(1.0 / 60.0));
    }
}
