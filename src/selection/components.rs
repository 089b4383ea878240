//! Connected-component labeling of foreground masks.
//!
//! Two-pass union-find over the row-major flat index. Foreground pixels are
//! 8-connected: edges and corners both join components.

use ndarray::{Array2, ArrayView2};

/// Component labeling result.
pub struct Labeling {
    /// Label per pixel (0 = background, 1..=count = component id)
    pub labels: Array2<u32>,
    /// Number of distinct non-zero labels
    pub count: usize,
}

/// Label the 8-connected foreground components of a mask.
///
/// Labels are compacted to `1..=count` in raster scan order of each
/// component's first pixel. Callers should not rely on that ordering; only
/// on each label denoting one maximal connected set.
pub fn label_components(mask: ArrayView2<bool>) -> Labeling {
    let (height, width) = mask.dim();
    let mut provisional = vec![0usize; width * height];
    // parent[0] is the background sentinel
    let mut parent: Vec<usize> = vec![0];

    // Pass 1: provisional labels, merging through already-visited neighbors
    for y in 0..height {
        for x in 0..width {
            if !mask[[y, x]] {
                continue;
            }

            let mut current = 0usize;
            for (dx, dy) in &[(-1isize, -1isize), (0, -1), (1, -1), (-1, 0)] {
                let nx = x as isize + dx;
                let ny = y as isize + dy;
                if nx < 0 || nx >= width as isize || ny < 0 {
                    continue;
                }

                let neighbor = provisional[ny as usize * width + nx as usize];
                if neighbor == 0 {
                    continue;
                }
                if current == 0 {
                    current = find(&mut parent, neighbor);
                } else {
                    current = union(&mut parent, current, neighbor);
                }
            }

            if current == 0 {
                current = parent.len();
                parent.push(current);
            }
            provisional[y * width + x] = current;
        }
    }

    // Pass 2: resolve roots and compact them to 1..=count
    let mut compact = vec![0u32; parent.len()];
    let mut count = 0usize;
    let mut labels = Array2::<u32>::zeros((height, width));

    for y in 0..height {
        for x in 0..width {
            let label = provisional[y * width + x];
            if label == 0 {
                continue;
            }

            let root = find(&mut parent, label);
            if compact[root] == 0 {
                count += 1;
                compact[root] = count as u32;
            }
            labels[[y, x]] = compact[root];
        }
    }

    Labeling { labels, count }
}

/// Find the root of `label`, halving the path on the way.
fn find(parent: &mut [usize], mut label: usize) -> usize {
    while parent[label] != label {
        parent[label] = parent[parent[label]];
        label = parent[label];
    }
    label
}

/// Merge the sets of `a` and `b`, returning the surviving root.
///
/// The smaller root always wins so results do not depend on merge order.
fn union(parent: &mut [usize], a: usize, b: usize) -> usize {
    let ra = find(parent, a);
    let rb = find(parent, b);
    let (keep, drop) = if ra <= rb { (ra, rb) } else { (rb, ra) };
    parent[drop] = keep;
    keep
}
