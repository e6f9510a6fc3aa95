use super::{sliding_mean_filter, KeyEvent};
use crate::config::SegmenterParams;
use crate::geometry::{KeyboardGeometry, Point};
use tracing::{debug, info, warn};

/// Turns a raw gaze stream into key events.
///
/// Scanning slides a window of `window_offset` samples over the stream. A run
/// of `trigger_threshold` consecutive windows whose end points are closer than
/// `dx_threshold` opens an event; the event stays open until a window spans
/// `inner_dx_threshold` or more. Each closed event becomes the nearest alpha
/// key to the mean of its in-bounds samples.
pub struct SignalSegmenter<'g> {
    geometry: &'g KeyboardGeometry,
    params: SegmenterParams,
}

impl<'g> SignalSegmenter<'g> {
    pub fn new(geometry: &'g KeyboardGeometry, params: SegmenterParams) -> Self {
        Self { geometry, params }
    }

    pub fn params(&self) -> &SegmenterParams {
        &self.params
    }

    pub fn sufficient_data(&self, samples: &[Point]) -> bool {
        let in_bounds = samples
            .iter()
            .filter(|p| self.geometry.in_bounds(**p))
            .count();
        in_bounds >= self.params.min_samples()
    }

    /// Full pipeline: optional smoothing, detection, merge. Never fails; any
    /// unusable input yields an empty sequence and a diagnostic.
    pub fn segment(&self, samples: &[Point]) -> Vec<KeyEvent> {
        if let Err(e) = self.params.validate() {
            warn!("Segmenter disabled: {}", e);
            return Vec::new();
        }

        let smoothed;
        let samples = if self.params.smoothing_window > 1 {
            smoothed = sliding_mean_filter(samples, self.params.smoothing_window);
            &smoothed[..]
        } else {
            samples
        };

        if !self.sufficient_data(samples) {
            info!(
                "Insufficient data: fewer than {} in-bounds samples in a stream of {}",
                self.params.min_samples(),
                samples.len()
            );
            return Vec::new();
        }

        let events = self.detect(samples);
        let merged = self.merge(&events);
        debug!(
            "Segmented {} samples into {} events ({} before merge)",
            samples.len(),
            merged.len(),
            events.len()
        );
        merged
    }

    /// Dwell detection without the merge pass. Consecutive events never share
    /// an alpha: a re-trigger on the same key is dropped.
    pub fn detect(&self, samples: &[Point]) -> Vec<KeyEvent> {
        let p = &self.params;
        let offset = p.window_offset;
        let limit = samples.len().saturating_sub(offset + 1);

        let mut events: Vec<KeyEvent> = Vec::new();
        let mut trigger = 0;
        let mut i = 0;

        while i < limit {
            let (a, b) = (samples[i], samples[i + offset]);
            if !(self.geometry.in_bounds(a) && self.geometry.in_bounds(b)) {
                trigger = 0;
                i += 1;
                continue;
            }

            let mut dx = a.distance(&b);
            if dx >= p.dx_threshold {
                trigger = 0;
                i += 1;
                continue;
            }

            trigger += 1;
            if trigger >= p.trigger_threshold {
                let start = i;
                while i < limit && dx < p.inner_dx_threshold {
                    dx = samples[i].distance(&samples[i + offset]);
                    i += 1;
                }
                let end = i;

                if let Some(event) = self.close_event(samples, start, end) {
                    match events.last() {
                        Some(last) if last.alpha == event.alpha => {
                            debug!("Dropping re-trigger on '{}' at {}", event.alpha, start);
                        }
                        _ => events.push(event),
                    }
                }
                trigger = 0;
            }
            i += 1;
        }
        events
    }

    fn close_event(&self, samples: &[Point], start: usize, end: usize) -> Option<KeyEvent> {
        let (sx, sy, count) = samples[start..end]
            .iter()
            .filter(|p| self.geometry.in_bounds(**p))
            .fold((0i64, 0i64, 0i64), |(sx, sy, n), p| {
                (sx + p.x as i64, sy + p.y as i64, n + 1)
            });

        if count == 0 {
            debug!("Empty cluster [{}, {}) discarded", start, end);
            return None;
        }

        let centroid = Point::new((sx / count) as i32, (sy / count) as i32);
        Some(KeyEvent {
            alpha: self.geometry.nearest_alpha_key(centroid),
            point: centroid,
            ticks: end - start,
        })
    }

    /// Adjacent events on different keys that sit too close together, with at
    /// least one of them weak, are not separated.
    pub fn has_min_separation(&self, a: &KeyEvent, b: &KeyEvent) -> bool {
        let close = a.point.distance(&b.point)
            < self.params.merge_radius_factor * self.geometry.min_inter_key_radius();
        let weak = a.ticks <= self.params.merge_max_ticks || b.ticks <= self.params.merge_max_ticks;
        !(a.alpha != b.alpha && close && weak)
    }

    /// Single pass over adjacent pairs. A merged pair is skipped as a whole, so
    /// the survivor is never compared with the event after it.
    pub fn merge(&self, events: &[KeyEvent]) -> Vec<KeyEvent> {
        let n = events.len();
        if n < 2 {
            return events.to_vec();
        }

        let mut merged = Vec::with_capacity(n);
        let mut last_consumed = false;
        let mut i = 1;

        while i < n {
            let (prev, cur) = (events[i - 1], events[i]);
            if self.has_min_separation(&prev, &cur) {
                push_distinct(&mut merged, prev);
            } else {
                push_distinct(&mut merged, absorb(prev, cur));
                last_consumed = i == n - 1;
                i += 1;
            }
            i += 1;
        }

        if !last_consumed {
            push_distinct(&mut merged, events[n - 1]);
        }
        merged
    }
}

fn absorb(mut prev: KeyEvent, mut cur: KeyEvent) -> KeyEvent {
    if prev.alpha == cur.alpha || prev.ticks > cur.ticks {
        prev.ticks += cur.ticks;
        prev
    } else {
        cur.ticks += prev.ticks;
        cur
    }
}

fn push_distinct(out: &mut Vec<KeyEvent>, event: KeyEvent) {
    match out.last_mut() {
        Some(last) if last.alpha == event.alpha => last.ticks += event.ticks,
        _ => out.push(event),
    }
}
