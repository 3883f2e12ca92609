use chrono::{DateTime, Duration, Utc};
use tracing::{debug, trace, warn};

use crate::engine::{PricePoint, TradeEvent};

/// Aligns trade boundaries with the price path.
///
/// For every trade, the start and the end are matched to the nearest point whose timestamp lies
/// strictly within one `interval`; equal distances resolve to the earlier point. The matched
/// point gets an open (or close) marker carrying its own price, and the trade gets that same
/// price as `start_price` (or `end_price`).
///
/// Markers always carry the point's own price, so a point shared by several trades ends up in the
/// same state whatever the trade order. Running the reconciler again on its own output changes
/// nothing.
///
/// A boundary with no point in reach has its price unset, including a price left by an earlier
/// reconcile against another path. This is reachable when a trade falls outside the path
/// coverage and is not an error.
///
/// `points` must be sorted by timestamp, as produced by the path simulator.
pub fn reconcile(points: &mut [PricePoint], trades: &mut [TradeEvent], interval: Duration) {
    let mut unmatched = 0;
    for trade in trades.iter_mut() {
        let start_price = nearest(points, trade.start_time(), interval).map(|idx| {
            let price = points[idx].mark_open();
            trace!(id = trade.id(), idx, price, "open matched");
            price
        });
        let end_price = nearest(points, trade.end_time(), interval).map(|idx| {
            let price = points[idx].mark_close();
            trace!(id = trade.id(), idx, price, "close matched");
            price
        });
        unmatched += [start_price, end_price].iter().filter(|p| p.is_none()).count();
        trade.set_start_price(start_price);
        trade.set_end_price(end_price);
    }

    if unmatched > 0 {
        warn!(unmatched, "trade boundaries without a price sample in reach");
    }
    debug!(points = points.len(), trades = trades.len(), "reconciled timeline");
}

/// Index of the point nearest to `target` within less than `interval`, earlier point on ties.
fn nearest(points: &[PricePoint], target: DateTime<Utc>, interval: Duration) -> Option<usize> {
    let after = points.partition_point(|p| p.timestamp() < target);
    let distance = |idx: usize| (points[idx].timestamp() - target).abs();

    let best = match (after.checked_sub(1), (after < points.len()).then_some(after)) {
        (Some(before), Some(after)) => {
            if distance(after) < distance(before) {
                after
            } else {
                before
            }
        }
        (Some(before), None) => before,
        (None, Some(after)) => after,
        (None, None) => return None,
    };

    (distance(best) < interval).then_some(best)
}
