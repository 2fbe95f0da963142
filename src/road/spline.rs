use crate::terrain::constants::SPLINE_SEGMENT_SUBDIVISIONS;
use bevy_math::Vec3;

/// Smooth centerline through `control_points`, resampled to `sample_count`
/// points evenly spaced by arc length.
///
/// The first and last samples sit on the first and last control points.
pub fn centerline(control_points: &[Vec3], sample_count: usize) -> Vec<Vec3> {
    let curve = catmull_rom(control_points, SPLINE_SEGMENT_SUBDIVISIONS);
    resample_by_arc_length(&curve, sample_count)
}

/// Uniform Catmull-Rom curve through every point.
///
/// The ends are extended with phantom points reflected through the first and
/// last segments, so the curve starts and ends on the input.
pub fn catmull_rom(points: &[Vec3], subdivisions: usize) -> Vec<Vec3> {
    if points.len() < 2 || subdivisions == 0 {
        return points.to_vec();
    }

    let mut extended = Vec::with_capacity(points.len() + 2);
    extended.push(points[0] * 2.0 - points[1]);
    extended.extend_from_slice(points);
    let n = points.len();
    extended.push(points[n - 1] * 2.0 - points[n - 2]);

    let mut curve = Vec::with_capacity((n - 1) * subdivisions + 1);
    for window in extended.windows(4) {
        let (p0, p1, p2, p3) = (window[0], window[1], window[2], window[3]);
        for step in 0..subdivisions {
            let t = step as f32 / subdivisions as f32;
            let t2 = t * t;
            let t3 = t2 * t;
            curve.push(
                0.5 * (2.0 * p1
                    + (p2 - p0) * t
                    + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
                    + (3.0 * p1 - p0 - 3.0 * p2 + p3) * t3),
            );
        }
    }
    curve.push(points[n - 1]);
    curve
}

/// Walk the polyline and emit `count` points at equal arc-length spacing
pub fn resample_by_arc_length(polyline: &[Vec3], count: usize) -> Vec<Vec3> {
    let Some(&first) = polyline.first() else {
        return Vec::new();
    };
    if count == 0 {
        return Vec::new();
    }

    let mut cumulative = Vec::with_capacity(polyline.len());
    let mut total = 0.0;
    cumulative.push(0.0);
    for pair in polyline.windows(2) {
        total += pair[0].distance(pair[1]);
        cumulative.push(total);
    }

    if count == 1 || total <= f32::EPSILON {
        return vec![first; count];
    }

    let last = polyline[polyline.len() - 1];
    let mut samples = Vec::with_capacity(count);
    let mut segment = 0;
    for k in 0..count {
        if k == count - 1 {
            samples.push(last);
            break;
        }
        let target = total * k as f32 / (count - 1) as f32;
        while segment + 2 < cumulative.len() && cumulative[segment + 1] < target {
            segment += 1;
        }
        let start = cumulative[segment];
        let length = cumulative[segment + 1] - start;
        let t = if length > f32::EPSILON {
            ((target - start) / length).clamp(0.0, 1.0)
        } else {
            0.0
        };
        samples.push(polyline[segment].lerp(polyline[segment + 1], t));
    }
    samples
}
