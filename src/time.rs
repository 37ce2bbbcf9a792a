//! Frame clock: turns `draw_web()` timestamps into simulation steps.
//!
//! `draw_web()` calls at ~60fps with variable delta. Each frame becomes one
//! `Frame::Step(dt)` for `tycoon::logic::tick`. A gap longer than
//! `resume_threshold_secs` (a backgrounded tab, a suspended laptop) becomes
//! `Frame::Resume`, and the caller fast-forwards with offline catch-up
//! instead of one oversized tick.

/// Default gap, in seconds, above which a frame counts as a resume.
pub const DEFAULT_RESUME_THRESHOLD_SECS: f64 = 5.0;

/// What the caller should do with this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Frame {
    /// Advance the simulation by this many seconds.
    Step(f64),
    /// The page was away for this many seconds.
    Resume(f64),
}

pub struct FrameClock {
    resume_threshold_secs: f64,
    /// Seconds handed out as `Step`s since creation.
    pub total_secs: f64,
    /// Timestamp of the last update (ms), None if first frame
    last_timestamp: Option<f64>,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(DEFAULT_RESUME_THRESHOLD_SECS)
    }
}

impl FrameClock {
    pub fn new(resume_threshold_secs: f64) -> Self {
        Self {
            resume_threshold_secs,
            total_secs: 0.0,
            last_timestamp: None,
        }
    }

    /// Feed a monotonic timestamp (from `performance.now()` or similar).
    /// Call this once per draw frame.
    pub fn update(&mut self, now_ms: f64) -> Frame {
        let delta = match self.last_timestamp {
            // Monotonic clocks should not go backwards, but frames can be
            // delivered with equal or jittered stamps.
            Some(prev) => ((now_ms - prev) / 1000.0).max(0.0),
            None => 0.0, // First frame: no delta
        };
        self.last_timestamp = Some(now_ms);

        if !delta.is_finite() {
            return Frame::Step(0.0);
        }
        if delta > self.resume_threshold_secs {
            return Frame::Resume(delta);
        }
        self.total_secs += delta;
        Frame::Step(delta)
    }
}

/// Wall-clock Unix time in seconds.
#[cfg(target_arch = "wasm32")]
pub fn unix_now() -> f64 {
    js_sys::Date::now() / 1000.0
}

/// Wall-clock Unix time in seconds.
#[cfg(not(target_arch = "wasm32"))]
pub fn unix_now() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}
