//! ペースト判定
//!
//! キー間隔が短い連続入力を端末へのペーストとみなす

use std::time::{Duration, Instant};

/// 既定のペースト判定間隔
pub const DEFAULT_BURST: Duration = Duration::from_millis(30);
/// 既定のペースト解除間隔
pub const DEFAULT_RESET: Duration = Duration::from_secs(1);

/// キー到着時刻からペースト中かどうかを判定する
#[derive(Debug, Clone)]
pub struct PasteDetector {
    burst: Duration,
    reset: Duration,
    last_key: Option<Instant>,
    in_paste: bool,
}

impl Default for PasteDetector {
    fn default() -> Self {
        Self::new(DEFAULT_BURST, DEFAULT_RESET)
    }
}

impl PasteDetector {
    pub fn new(burst: Duration, reset: Duration) -> Self {
        Self {
            burst,
            reset,
            last_key: None,
            in_paste: false,
        }
    }

    /// キーの到着を記録し、ペースト中かどうかを返す
    ///
    /// 間隔が `burst` 未満なら開始、`reset` 以上なら解除、その間は状態を保つ
    pub fn observe(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last_key {
            let gap = now.saturating_duration_since(last);
            if gap < self.burst {
                if !self.in_paste {
                    log::debug!("paste burst detected");
                }
                self.in_paste = true;
            } else if gap >= self.reset {
                self.in_paste = false;
            }
        }
        self.last_key = Some(now);
        self.in_paste
    }

    pub fn in_paste(&self) -> bool {
        self.in_paste
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fast_keys_start_a_burst() {
        let mut detector = PasteDetector::default();
        let t0 = Instant::now();
        assert!(!detector.observe(t0));
        assert!(detector.observe(t0 + Duration::from_millis(5)));
        assert!(detector.observe(t0 + Duration::from_millis(10)));
    }

    #[test]
    fn moderate_gap_keeps_state() {
        let mut detector = PasteDetector::default();
        let t0 = Instant::now();
        detector.observe(t0);
        detector.observe(t0 + Duration::from_millis(1));
        assert!(detector.observe(t0 + Duration::from_millis(500)));
    }

    #[test]
    fn long_gap_clears_burst() {
        let mut detector = PasteDetector::default();
        let t0 = Instant::now();
        detector.observe(t0);
        detector.observe(t0 + Duration::from_millis(1));
        assert!(!detector.observe(t0 + Duration::from_millis(1001)));
        assert!(!detector.in_paste());
    }

    #[test]
    fn slow_typing_is_not_a_paste() {
        let mut detector = PasteDetector::default();
        let t0 = Instant::now();
        for i in 0..5 {
            assert!(!detector.observe(t0 + Duration::from_millis(120 * i)));
        }
    }
}
