//! Fixed-timestep clock.
//!
//! The browser redraws at whatever rate it likes; `GameTime` turns those
//! frame timestamps into whole game ticks so the simulation stays
//! deterministic.

/// Longest gap between two frames that still counts as elapsed time.
const MAX_FRAME_DELTA_MS: f64 = 500.0;

pub struct GameTime {
    ms_per_tick: f64,
    /// Milliseconds not yet turned into ticks.
    accumulator: f64,
    pub total_ticks: u64,
    last_timestamp: Option<f64>,
}

impl GameTime {
    pub fn new(ticks_per_sec: u32) -> Self {
        Self {
            ms_per_tick: 1000.0 / ticks_per_sec.max(1) as f64,
            accumulator: 0.0,
            total_ticks: 0,
            last_timestamp: None,
        }
    }

    /// Feed a `performance.now()` timestamp; returns the ticks to run.
    pub fn update(&mut self, now_ms: f64) -> u32 {
        let delta = self
            .last_timestamp
            .map_or(0.0, |prev| (now_ms - prev).clamp(0.0, MAX_FRAME_DELTA_MS));
        self.last_timestamp = Some(now_ms);

        self.accumulator += delta;
        let ticks = (self.accumulator / self.ms_per_tick) as u32;
        self.accumulator -= ticks as f64 * self.ms_per_tick;
        self.total_ticks += ticks as u64;
        ticks
    }

    /// Treat the next frame as the first one. Used when the page becomes
    /// visible again so hidden time is not replayed.
    pub fn reset_anchor(&mut self) {
        self.last_timestamp = None;
        self.accumulator = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_is_free() {
        let mut gt = GameTime::new(10);
        assert_eq!(gt.update(1234.0), 0);
    }

    #[test]
    fn remainder_carries_between_frames() {
        let mut gt = GameTime::new(10);
        gt.update(0.0);
        assert_eq!(gt.update(150.0), 1);
        assert_eq!(gt.update(200.0), 1);
        assert_eq!(gt.total_ticks, 2);
    }

    #[test]
    fn long_gaps_are_clamped() {
        let mut gt = GameTime::new(10);
        gt.update(0.0);
        assert_eq!(gt.update(60_000.0), 5);
    }

    #[test]
    fn clock_going_backwards_yields_nothing() {
        let mut gt = GameTime::new(10);
        gt.update(500.0);
        assert_eq!(gt.update(100.0), 0);
    }

    #[test]
    fn sixty_fps_gives_ten_ticks_a_second() {
        let mut gt = GameTime::new(10);
        gt.update(0.0);
        let total: u32 = (1..=60).map(|i| gt.update(i as f64 * 16.667)).sum();
        assert!((9..=11).contains(&total), "got {}", total);
    }

    #[test]
    fn reset_anchor_drops_hidden_time() {
        let mut gt = GameTime::new(10);
        gt.update(0.0);
        gt.update(90.0);
        gt.reset_anchor();
        assert_eq!(gt.update(400.0), 0);
        assert_eq!(gt.update(500.0), 1);
    }
}
