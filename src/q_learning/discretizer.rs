//! Continuous-to-discrete state mapping

use super::config::{BinConfig, BinEdges};
use crate::{
    error::Result,
    types::{ContinuousState, DiscreteState},
};

/// Bin index of `value`: the number of edges `e` with `e <= value`.
///
/// Values below the first edge land in bin 0, values at or above the last
/// edge in bin `edges.len()`, and a value equal to an edge goes to the bin
/// above it. NaN lands in bin 0. `edges` must be ascending.
pub fn digitize(value: f64, edges: &[f64]) -> usize {
    let (mut lo, mut hi) = (0, edges.len());
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if edges[mid] <= value {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    lo
}

/// Maps observations to bin indices relative to the upcoming gap's centre
#[derive(Debug, Clone)]
pub struct Discretizer {
    y_edges: BinEdges,
    x_edges: BinEdges,
    velocity_edges: BinEdges,
    half_gap: f64,
    body_x: f64,
}

impl Discretizer {
    /// Fails if any edge array is empty, non-finite or not strictly ascending
    pub fn new(bins: &BinConfig, gap_size: f64, body_x: f64) -> Result<Self> {
        bins.validate()?;
        Ok(Self {
            y_edges: bins.y_edges.clone(),
            x_edges: bins.x_edges.clone(),
            velocity_edges: bins.velocity_edges.clone(),
            half_gap: gap_size / 2.0,
            body_x,
        })
    }

    /// Number of bins on the (y, x, velocity) axes
    pub fn dims(&self) -> [usize; 3] {
        [
            self.y_edges.bins(),
            self.x_edges.bins(),
            self.velocity_edges.bins(),
        ]
    }

    pub fn discretize(&self, state: &ContinuousState) -> DiscreteState {
        let relative_y = state.position_y - (state.gap_top_y + self.half_gap);
        let relative_x = state.obstacle_x - self.body_x;
        DiscreteState::new(
            digitize(relative_y, self.y_edges.as_slice()),
            digitize(relative_x, self.x_edges.as_slice()),
            digitize(state.velocity, self.velocity_edges.as_slice()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EDGES: [f64; 4] = [-1.0, 0.0, 2.5, 10.0];

    #[test]
    fn test_digitize_boundaries() {
        assert_eq!(digitize(-5.0, &EDGES), 0);
        assert_eq!(digitize(-1.0, &EDGES), 1);
        assert_eq!(digitize(-0.5, &EDGES), 1);
        assert_eq!(digitize(0.0, &EDGES), 2);
        assert_eq!(digitize(2.4, &EDGES), 2);
        assert_eq!(digitize(10.0, &EDGES), 4);
        assert_eq!(digitize(1e9, &EDGES), 4);
        assert_eq!(digitize(f64::NEG_INFINITY, &EDGES), 0);
        assert_eq!(digitize(f64::INFINITY, &EDGES), 4);
    }

    #[test]
    fn test_digitize_nan_goes_to_first_bin() {
        assert_eq!(digitize(f64::NAN, &EDGES), 0);
    }

    #[test]
    fn test_digitize_matches_linear_count() {
        let edges = BinEdges::linspace(-512.0, 512.0, 20);
        let mut v = -600.0;
        while v <= 600.0 {
            let expected = edges.as_slice().iter().filter(|&&e| e <= v).count();
            assert_eq!(digitize(v, edges.as_slice()), expected, "value {v}");
            v += 7.25;
        }
    }

    #[test]
    fn test_discretize_relative_to_gap_centre() {
        let discretizer = Discretizer::new(&BinConfig::default(), 150.0, 50.0).unwrap();
        assert_eq!(discretizer.dims(), [21, 21, 11]);

        // body level with the gap centre, pipe 238px ahead, at rest
        let state = ContinuousState::new(275.0, 0.0, 200.0, 288.0);
        let discrete = discretizer.discretize(&state);
        // relative_y = 0 sits between edges 9 (-26.9) and 10 (26.9)
        assert_eq!(discrete.y_idx, 10);
        // relative_x = 238: edges are multiples of 500/19 ≈ 26.3, ten of them <= 238
        assert_eq!(discrete.x_idx, 10);
        // velocity 0 sits between -1.11 and 1.11
        assert_eq!(discrete.vel_idx, 5);
    }

    #[test]
    fn test_discretize_clamps_extremes() {
        let discretizer = Discretizer::new(&BinConfig::default(), 150.0, 50.0).unwrap();
        let state = ContinuousState::new(5000.0, -99.0, 0.0, -1000.0);
        assert_eq!(discretizer.discretize(&state), DiscreteState::new(20, 0, 0));
    }

    #[test]
    fn test_invalid_edges_fail_at_construction() {
        let bins = BinConfig {
            velocity_edges: BinEdges::new(vec![1.0, 0.0]),
            ..Default::default()
        };
        assert!(Discretizer::new(&bins, 150.0, 50.0).is_err());
    }
}
