//! Gathering event detection.
//!
//! A direct generalization of the original collision detector: given a set
//! of gatherers (dogs moving along a straight line this tick) and a set of
//! stationary items (loot, or office doors), find every point along each
//! gatherer's path where it comes within pickup range of an item.
use scavenger_geometry::Point;
use scavenger_geometry::closest_approach;

/// A dog's straight-line movement for one tick.
#[derive(Debug, Clone, Copy)]
pub struct Gatherer {
    pub start: Point,
    pub end: Point,
    pub width: f64,
}

/// A stationary thing that can be gathered: loot or an office door.
#[derive(Debug, Clone, Copy)]
pub struct Item {
    pub position: Point,
    pub width: f64,
}

/// One gatherer passing within pickup range of one item during a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GatheringEvent {
    pub gatherer_id: usize,
    pub item_id: usize,
    pub sq_distance: f64,
    pub time: f64,
}

/// Finds every gathering event this tick, ordered by time of closest
/// approach (earliest first); ties broken by `(gatherer_id, item_id)` for
/// determinism.
pub fn find_gathering_events(gatherers: &[Gatherer], items: &[Item]) -> Vec<GatheringEvent> {
    let mut events = Vec::new();
    for (gatherer_id, gatherer) in gatherers.iter().enumerate() {
        for (item_id, item) in items.iter().enumerate() {
            // A gatherer that didn't move this tick has no segment to project
            // onto; fall back to a direct point-vs-disk test at its position.
            let (time, sq_distance) =
                match closest_approach(gatherer.start, gatherer.end, item.position) {
                    Some(hit) => hit,
                    None => (0.0, gatherer.start.distance_to(item.position).powi(2)),
                };
            let min_distance = gatherer.width + item.width;
            if sq_distance <= min_distance * min_distance {
                events.push(GatheringEvent {
                    gatherer_id,
                    item_id,
                    sq_distance,
                    time,
                });
            }
        }
    }
    events.sort_by(|a, b| {
        a.time
            .partial_cmp(&b.time)
            .unwrap()
            .then(a.gatherer_id.cmp(&b.gatherer_id))
            .then(a.item_id.cmp(&b.item_id))
    });
    events
}
