//! Pipe obstacles and the ordered queue that holds them.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::{config::GameConfig, geometry::Rect};

/// A pipe pair: solid above `gap_top_y`, solid below `gap_top_y + gap_size`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pipe {
    pub x: f64,
    pub gap_top_y: f64,
}

impl Pipe {
    pub fn new(x: f64, gap_top_y: f64) -> Self {
        Self { x, gap_top_y }
    }

    /// Solid region from the top of the screen down to the gap
    pub fn upper_rect(&self, config: &GameConfig) -> Rect {
        Rect::new(self.x, 0.0, config.pipe_width, self.gap_top_y)
    }

    /// Solid region from the bottom of the gap to the bottom of the screen
    pub fn lower_rect(&self, config: &GameConfig) -> Rect {
        Rect::new(
            self.x,
            self.gap_top_y + config.gap_size,
            config.pipe_width,
            config.screen_height,
        )
    }

    pub fn collides_with(&self, body: &Rect, config: &GameConfig) -> bool {
        body.overlaps(&self.upper_rect(config)) || body.overlaps(&self.lower_rect(config))
    }
}

/// Pipes ordered by x, oldest (leftmost) at the front.
///
/// Pipes only enter at the back and leave from the front, and all of them
/// scroll at the same speed, so the ordering holds without re-sorting. The
/// queue is never empty.
#[derive(Debug, Clone)]
pub struct PipeQueue {
    pipes: VecDeque<Pipe>,
}

impl PipeQueue {
    pub fn new(first: Pipe) -> Self {
        let mut pipes = VecDeque::with_capacity(4);
        pipes.push_back(first);
        Self { pipes }
    }

    pub fn len(&self) -> usize {
        self.pipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pipes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pipe> {
        self.pipes.iter()
    }

    pub fn front(&self) -> &Pipe {
        self.pipes
            .front()
            .expect("pipe queue must always hold at least one pipe")
    }

    pub fn back(&self) -> &Pipe {
        self.pipes
            .back()
            .expect("pipe queue must always hold at least one pipe")
    }

    pub fn scroll(&mut self, dx: f64) {
        for pipe in &mut self.pipes {
            pipe.x -= dx;
        }
    }

    pub fn push(&mut self, pipe: Pipe) {
        debug_assert!(
            self.pipes.back().is_none_or(|last| last.x <= pipe.x),
            "pipes must be appended in x order"
        );
        self.pipes.push_back(pipe);
    }

    /// Remove the front pipe once its trailing edge has moved past `x = 0`.
    pub fn retire_passed(&mut self, pipe_width: f64) -> Option<Pipe> {
        if self.front().x < -pipe_width {
            self.pipes.pop_front()
        } else {
            None
        }
    }

    /// First pipe whose trailing edge is still right of `body_x`, or the
    /// front pipe if every pipe is behind the body.
    pub fn upcoming(&self, body_x: f64, pipe_width: f64) -> &Pipe {
        self.pipes
            .iter()
            .find(|pipe| pipe.x + pipe_width > body_x)
            .unwrap_or_else(|| self.front())
    }
}
