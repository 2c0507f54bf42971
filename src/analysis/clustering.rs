use crate::types::{ClusteredIssues, Issue, MarkerCluster, Point};

/// Greedy single-pass grouping of nearby issue markers.
///
/// Each unassigned issue, in input order, seeds a cluster with every later
/// unassigned issue within `radius` of its marker. A seed that gathers nobody
/// stays standalone. The result is order dependent by construction.
pub fn cluster_markers(issues: Vec<Issue>, radius: f64) -> ClusteredIssues {
    let mut slots: Vec<Option<Issue>> = issues.into_iter().map(Some).collect();
    let mut result = ClusteredIssues::default();

    for seed_idx in 0..slots.len() {
        let Some(seed) = slots[seed_idx].take() else {
            continue;
        };

        let near: Vec<usize> = (seed_idx + 1..slots.len())
            .filter(|&j| {
                slots[j]
                    .as_ref()
                    .is_some_and(|other| seed.marker_position.distance_to(&other.marker_position) <= radius)
            })
            .collect();

        if near.is_empty() {
            result.standalone.push(seed);
            continue;
        }

        let mut members = Vec::with_capacity(near.len() + 1);
        members.push(seed);
        members.extend(near.into_iter().filter_map(|j| slots[j].take()));

        result.clusters.push(MarkerCluster {
            position: mean_position(&members),
            member_issues: members,
        });
    }

    result
}

fn mean_position(members: &[Issue]) -> Point {
    let n = members.len() as f64;
    let (sx, sy) = members.iter().fold((0.0, 0.0), |(sx, sy), issue| {
        (sx + issue.marker_position.x, sy + issue.marker_position.y)
    });
    Point::new(sx / n, sy / n)
}
