/// Exploration rate with per-episode multiplicative decay
///
/// Epsilon starts at `start` and never leaves `[min, start]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpsilonSchedule {
    epsilon: f64,
    min: f64,
    decay: f64,
}

impl EpsilonSchedule {
    pub fn new(start: f64, min: f64, decay: f64) -> Self {
        Self {
            epsilon: start,
            min,
            decay,
        }
    }

    pub fn value(&self) -> f64 {
        self.epsilon
    }

    /// Call once per finished episode.
    pub fn decay(&mut self) {
        if self.epsilon > self.min {
            self.epsilon = (self.epsilon * self.decay).max(self.min);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decay_matches_closed_form() {
        let mut schedule = EpsilonSchedule::new(1.0, 0.01, 0.995);
        for n in 1..=2000 {
            let before = schedule.value();
            schedule.decay();
            assert!(schedule.value() <= before);
            let expected = (0.995f64.powi(n)).max(0.01);
            assert!(
                (schedule.value() - expected).abs() < 1e-9,
                "after {n} decays: {} vs {expected}",
                schedule.value()
            );
        }
        assert_eq!(schedule.value(), 0.01);
    }

    #[test]
    fn test_never_drops_below_floor() {
        let mut schedule = EpsilonSchedule::new(0.0102, 0.01, 0.5);
        schedule.decay();
        assert_eq!(schedule.value(), 0.01);
        schedule.decay();
        assert_eq!(schedule.value(), 0.01);
    }

    #[test]
    fn test_start_at_floor_stays_put() {
        let mut schedule = EpsilonSchedule::new(0.0, 0.0, 0.9);
        schedule.decay();
        assert_eq!(schedule.value(), 0.0);
    }
}
