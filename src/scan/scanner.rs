use std::collections::VecDeque;
use std::ops::RangeInclusive;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::debug;

use super::Component;
use super::visited::VisitedSet;
use crate::error::SplitError;
use crate::progress::{Progress, ProgressSink};
use crate::raster::Raster;

/// Find every gap-connected group of opaque pixels in `raster`.
///
/// Two opaque pixels are connected when their Chebyshev distance is at most
/// `gap`, regardless of what lies between them. Components are returned in
/// the row-major order of their first pixel.
///
/// Cost is `O(width * height * gap^2)`: every opaque pixel is dequeued once
/// and probes a `(2 * gap + 1)^2` neighborhood. With `gap = 0` nothing is
/// ever merged and each opaque pixel is its own 1x1 component.
pub fn scan(raster: &Raster<'_>, gap: u32) -> Vec<Component> {
    Components::new(*raster, gap).collect()
}

/// Scanner configuration with progress reporting and cancellation
#[derive(Debug, Clone)]
pub struct Scanner {
    gap: u32,
    cancel_token: Option<Arc<AtomicBool>>,
}

impl Scanner {
    pub fn new(gap: u32) -> Self {
        Self {
            gap,
            cancel_token: None,
        }
    }

    /// Abort the scan once `token` is set; checked at the start of every row
    pub fn cancel_token(mut self, token: Arc<AtomicBool>) -> Self {
        self.cancel_token = Some(token);
        self
    }

    pub fn gap(&self) -> u32 {
        self.gap
    }

    /// Same as [`scan`], reporting `Scanning` before and `Found` after.
    pub fn scan(
        &self,
        raster: &Raster<'_>,
        progress: &mut dyn ProgressSink,
    ) -> Result<Vec<Component>, SplitError> {
        progress.report(&Progress::Scanning);
        debug!(
            "Scanning {}x{} raster (gap {})",
            raster.width(),
            raster.height(),
            self.gap
        );

        let mut components = Components::new(*raster, self.gap);
        if let Some(token) = &self.cancel_token {
            components = components.with_cancel_token(Arc::clone(token));
        }

        let found: Vec<_> = components.by_ref().collect();
        if components.was_cancelled() {
            return Err(SplitError::Cancelled);
        }

        progress.report(&Progress::Found { count: found.len() });
        Ok(found)
    }
}

/// Lazy raster scan yielding one component per `next()`.
///
/// Owns the visited set; resuming continues the row-major scan right after
/// the pixel that seeded the previous component.
pub struct Components<'a> {
    raster: Raster<'a>,
    gap: u32,
    visited: VisitedSet,
    queue: VecDeque<(u32, u32)>,
    next_x: u32,
    next_y: u32,
    cancel_token: Option<Arc<AtomicBool>>,
    cancelled: bool,
}

impl<'a> Components<'a> {
    pub fn new(raster: Raster<'a>, gap: u32) -> Self {
        Self {
            raster,
            gap,
            visited: VisitedSet::new(raster.width(), raster.height()),
            queue: VecDeque::new(),
            next_x: 0,
            next_y: 0,
            cancel_token: None,
            cancelled: false,
        }
    }

    /// Stop yielding once `token` is set; checked at the start of every row
    pub fn with_cancel_token(mut self, token: Arc<AtomicBool>) -> Self {
        self.cancel_token = Some(token);
        self
    }

    /// True if iteration ended because of the cancel token
    pub fn was_cancelled(&self) -> bool {
        self.cancelled
    }

    fn advance(&mut self, visit: &mut dyn FnMut(u32, u32)) -> Option<Component> {
        let (width, height) = self.raster.dimensions();

        while self.next_y < height {
            if self.next_x == 0 && self.cancel_requested() {
                self.cancelled = true;
                self.next_y = height;
                return None;
            }

            let y = self.next_y;
            while self.next_x < width {
                let x = self.next_x;
                self.next_x += 1;

                if self.visited.contains(x, y) || !self.raster.is_opaque(x, y) {
                    continue;
                }
                return Some(self.flood(x, y, visit));
            }

            self.next_x = 0;
            self.next_y += 1;
        }

        None
    }

    /// Breadth-first fill from an unvisited opaque seed
    fn flood(&mut self, seed_x: u32, seed_y: u32, visit: &mut dyn FnMut(u32, u32)) -> Component {
        let (width, height) = self.raster.dimensions();

        self.visited.insert(seed_x, seed_y);
        self.queue.clear();
        self.queue.push_back((seed_x, seed_y));

        let (mut min_x, mut min_y) = (seed_x, seed_y);
        let (mut max_x, mut max_y) = (seed_x, seed_y);

        while let Some((cx, cy)) = self.queue.pop_front() {
            visit(cx, cy);
            min_x = min_x.min(cx);
            max_x = max_x.max(cx);
            min_y = min_y.min(cy);
            max_y = max_y.max(cy);

            // Clamped to the raster, so no probe can go out of bounds
            let xs = neighborhood(cx, self.gap, width);
            for ny in neighborhood(cy, self.gap, height) {
                for nx in xs.clone() {
                    if (nx, ny) == (cx, cy) {
                        continue;
                    }
                    if !self.visited.contains(nx, ny) && self.raster.is_opaque(nx, ny) {
                        self.visited.insert(nx, ny);
                        self.queue.push_back((nx, ny));
                    }
                }
            }
        }

        Component::from_extent(min_x, min_y, max_x, max_y)
    }

    fn cancel_requested(&self) -> bool {
        self.cancel_token
            .as_ref()
            .is_some_and(|token| token.load(Ordering::Relaxed))
    }

    /// Like `next()`, also collecting every pixel attributed to the component
    #[cfg(test)]
    pub(crate) fn next_with_pixels(&mut self, pixels: &mut Vec<(u32, u32)>) -> Option<Component> {
        self.advance(&mut |x, y| pixels.push((x, y)))
    }
}

impl Iterator for Components<'_> {
    type Item = Component;

    fn next(&mut self) -> Option<Component> {
        self.advance(&mut |_, _| {})
    }
}

/// `[center - gap, center + gap]` clamped to `0..len`. `len` must be non-zero.
fn neighborhood(center: u32, gap: u32, len: u32) -> RangeInclusive<u32> {
    center.saturating_sub(gap)..=center.saturating_add(gap).min(len - 1)
}
