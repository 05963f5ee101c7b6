use std::collections::BTreeMap;

use super::{ChartLink, ChartNode};

/// Shifts everything so the top-left node corner sits at
/// `(padding, padding)` and returns the padded chart size.
pub(super) fn normalize_bounds(
    nodes: &mut BTreeMap<String, ChartNode>,
    links: &mut [ChartLink],
    padding: f32,
) -> (f32, f32) {
    if nodes.is_empty() {
        return (padding * 2.0, padding * 2.0);
    }

    let mut min_x = f32::MAX;
    let mut min_y = f32::MAX;
    let mut max_x = f32::MIN;
    let mut max_y = f32::MIN;
    for node in nodes.values() {
        min_x = min_x.min(node.x);
        min_y = min_y.min(node.y);
        max_x = max_x.max(node.right());
        max_y = max_y.max(node.bottom());
    }

    let shift_x = padding - min_x;
    let shift_y = padding - min_y;
    for node in nodes.values_mut() {
        node.x += shift_x;
        node.y += shift_y;
    }
    for link in links.iter_mut() {
        if let Some(junction) = link.junction.as_mut() {
            junction.0 += shift_x;
            junction.1 += shift_y;
        }
    }

    (max_x - min_x + padding * 2.0, max_y - min_y + padding * 2.0)
}
