use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::Rng;

/// Cumulative-weight selection: returns the first item whose running
/// weight sum reaches `draw` (inclusive upper bound). Falls back to the
/// last item when float residue leaves the draw above the final sum.
///
/// Pure over its inputs so callers can inject deterministic draws.
pub fn weighted_choice<'a, T>(items: &'a [T], weights: &[f64], draw: f64) -> Option<&'a T> {
    debug_assert_eq!(items.len(), weights.len());

    let mut cumulative = 0.0;
    for (item, weight) in items.iter().zip(weights) {
        cumulative += weight;
        if draw <= cumulative {
            return Some(item);
        }
    }

    items.last()
}

/// Uniform timestamp in `[start, end]`, second resolution.
pub fn datetime_between<R: Rng + ?Sized>(
    rng: &mut R,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> NaiveDateTime {
    let span = (end - start).num_seconds();
    if span <= 0 {
        return start;
    }
    start + Duration::seconds(rng.gen_range(0..=span))
}

/// Uniform date in `[start, end]`.
pub fn date_between<R: Rng + ?Sized>(rng: &mut R, start: NaiveDate, end: NaiveDate) -> NaiveDate {
    let span = (end - start).num_days();
    if span <= 0 {
        return start;
    }
    start + Duration::days(rng.gen_range(0..=span))
}

/// Round to two decimal places, the currency precision of the exports.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
