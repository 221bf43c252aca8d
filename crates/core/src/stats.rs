//! Descriptive statistics over listings.
//!
//! Size trimming, room counts and price histograms feeding the
//! distribution charts of the report.

use indexmap::IndexMap;
use itertools::Itertools;
use serde::Serialize;
use tracing::debug;

use crate::error::{MietkarteError, Result};
use crate::model::{ListingRecord, ObjectType, ROOM_ORDER, Rooms};

/// Quantile with linear interpolation between closest ranks.
///
/// NaN values are ignored.
pub fn quantile(values: &[f64], q: f64) -> Result<f64> {
    if !(0.0..=1.0).contains(&q) {
        return Err(MietkarteError::InvalidParameter(format!(
            "quantile must be within [0, 1], got {q}"
        )));
    }
    let sorted: Vec<f64> = values
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .sorted_by(f64::total_cmp)
        .collect();
    if sorted.is_empty() {
        return Err(MietkarteError::InvalidParameter(
            "quantile of an empty sample".to_string(),
        ));
    }

    let h = (sorted.len() - 1) as f64 * q;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    Ok(sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo]))
}

/// Size cutoff at quantile `q`, counting missing sizes as zero.
pub fn size_cutoff(listings: &[ListingRecord], q: f64) -> Result<f64> {
    let sizes: Vec<f64> = listings
        .iter()
        .map(|l| l.square_meters.unwrap_or(0.0))
        .collect();
    quantile(&sizes, q)
}

/// Drops listings above the size cutoff and listings without a size.
pub fn trim_by_size(listings: &[ListingRecord], q: f64) -> Result<Vec<ListingRecord>> {
    let cutoff = size_cutoff(listings, q)?;
    let kept: Vec<ListingRecord> = listings
        .iter()
        .filter(|l| l.square_meters.is_some_and(|sqm| sqm <= cutoff))
        .cloned()
        .collect();
    debug!(
        cutoff,
        kept = kept.len(),
        dropped = listings.len() - kept.len(),
        "trimmed listings by size"
    );
    Ok(kept)
}

/// Splits listings into `(rentals, sales)`.
pub fn split_by_market(listings: &[ListingRecord]) -> (Vec<ListingRecord>, Vec<ListingRecord>) {
    listings.iter().cloned().partition(|l| l.to_rent)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoomCount {
    pub rooms: Rooms,
    pub count: usize,
}

/// Listing counts per room category.
///
/// Every category of [`ROOM_ORDER`] is present, zero-filled. Counts outside
/// that order follow in ascending room count.
pub fn room_distribution(listings: &[ListingRecord]) -> Vec<RoomCount> {
    let counts = listings.iter().map(|l| l.rooms).counts();

    let extra = counts
        .iter()
        .filter(|(rooms, _)| !ROOM_ORDER.contains(*rooms))
        .map(|(rooms, count)| RoomCount {
            rooms: *rooms,
            count: *count,
        })
        .sorted_by_key(|rc| match rc.rooms {
            Rooms::Count(n) => n,
            _ => u8::MAX,
        });

    ROOM_ORDER
        .iter()
        .map(|rooms| RoomCount {
            rooms: *rooms,
            count: counts.get(rooms).copied().unwrap_or(0),
        })
        .chain(extra)
        .collect()
}

/// Mean predicted price of one rooms and object type combination.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionCell {
    pub rooms: Rooms,
    pub object_type: ObjectType,
    /// `None` when no listing falls into the cell.
    pub mean: Option<f64>,
    pub count: usize,
}

/// Mean prediction per room category and object type.
///
/// `predictions[i]` belongs to `listings[i]`. The grid covers
/// [`ROOM_ORDER`] times [`ObjectType::ALL`] in that order; room categories
/// outside the order and NaN predictions are left out.
pub fn mean_prediction_by_rooms(
    listings: &[ListingRecord],
    predictions: &[f64],
) -> Result<Vec<PredictionCell>> {
    if listings.len() != predictions.len() {
        return Err(MietkarteError::InvalidParameter(format!(
            "{} predictions for {} listings",
            predictions.len(),
            listings.len()
        )));
    }

    let mut sums: IndexMap<(Rooms, ObjectType), (f64, usize)> = IndexMap::new();
    let mut skipped = 0;
    for (listing, &prediction) in listings.iter().zip(predictions) {
        if prediction.is_nan() || !ROOM_ORDER.contains(&listing.rooms) {
            skipped += 1;
            continue;
        }
        let (sum, count) = sums
            .entry((listing.rooms, listing.object_type))
            .or_insert((0.0, 0));
        *sum += prediction;
        *count += 1;
    }
    if skipped > 0 {
        debug!(skipped, "predictions outside the room grid");
    }

    Ok(ROOM_ORDER
        .iter()
        .cartesian_product(ObjectType::ALL)
        .map(|(&rooms, object_type)| {
            let (sum, count) = sums
                .get(&(rooms, object_type))
                .copied()
                .unwrap_or((0.0, 0));
            PredictionCell {
                rooms,
                object_type,
                mean: (count > 0).then(|| sum / count as f64),
                count,
            }
        })
        .collect())
}

/// Equal-width histogram.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    /// `counts.len() + 1` bin edges.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

/// Bins `values` into `bins` equal-width bins over their range.
///
/// The last bin is closed on the right. A degenerate range is widened by
/// half a unit on each side. NaN values are ignored.
pub fn histogram(values: &[f64], bins: usize) -> Result<Histogram> {
    if bins == 0 {
        return Err(MietkarteError::InvalidParameter(
            "histogram needs at least one bin".to_string(),
        ));
    }
    let finite: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    let Some((mut lo, mut hi)) = finite.iter().copied().minmax_by(f64::total_cmp).into_option()
    else {
        return Ok(Histogram {
            edges: Vec::new(),
            counts: Vec::new(),
        });
    };
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }

    let width = (hi - lo) / bins as f64;
    let edges = (0..=bins).map(|i| lo + width * i as f64).collect();
    let mut counts = vec![0; bins];
    for v in finite {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    Ok(Histogram { edges, counts })
}
