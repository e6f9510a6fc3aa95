use super::SignalDatum;
use crate::geometry::Point;

/// Averages non-overlapping frames of `k` samples. A frame is taken only when
/// at least one sample follows it; whatever remains at the end is dropped.
/// `k <= 1` returns the stream unchanged.
pub fn sliding_mean_filter(samples: &[Point], k: usize) -> Vec<Point> {
    if k <= 1 {
        return samples.to_vec();
    }
    samples[..samples.len().saturating_sub(1)]
        .chunks_exact(k)
        .map(|frame| {
            let (sx, sy) = frame
                .iter()
                .fold((0i64, 0i64), |(sx, sy), p| (sx + p.x as i64, sy + p.y as i64));
            Point::new((sx / k as i64) as i32, (sy / k as i64) as i32)
        })
        .collect()
}

/// Attaches the population standard deviation of x and y over the trailing
/// `window` samples (the sample itself included) to every sample.
pub fn decorate_with_deviation(samples: &[Point], window: usize) -> Vec<SignalDatum> {
    let window = window.max(1);
    (0..samples.len())
        .map(|i| {
            let frame = &samples[(i + 1).saturating_sub(window)..=i];
            let (xdev, ydev) = axis_deviation(frame);
            SignalDatum {
                point: samples[i],
                xdev,
                ydev,
            }
        })
        .collect()
}

fn axis_deviation(frame: &[Point]) -> (f64, f64) {
    let n = frame.len() as f64;
    let (mx, my) = frame
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x as f64, sy + p.y as f64));
    let (mx, my) = (mx / n, my / n);
    let (vx, vy) = frame.iter().fold((0.0, 0.0), |(vx, vy), p| {
        let dx = p.x as f64 - mx;
        let dy = p.y as f64 - my;
        (vx + dx * dx, vy + dy * dy)
    });
    ((vx / n).sqrt(), (vy / n).sqrt())
}
