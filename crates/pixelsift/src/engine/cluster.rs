use std::collections::VecDeque;

use image::RgbaImage;
use serde::Serialize;
use tracing::debug;

use super::mask::is_diff_pixel;
use crate::config::CompareConfig;

/// Neighbor-count cutoff at or below which a pixel reads as part of a
/// thin stroke rather than a filled region. Fixed on purpose; only the
/// fraction of qualifying pixels (`line_shift_ratio`) is configurable.
const LINE_LIKE_MAX_NEIGHBORS: usize = 2;

const NEIGHBOR_OFFSETS: [(i64, i64); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Axis-aligned bounding box over a cluster's pixels (inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl Bounds {
    pub fn width(&self) -> u32 {
        self.max_x - self.min_x + 1
    }

    pub fn height(&self) -> u32 {
        self.max_y - self.min_y + 1
    }
}

/// A maximal 8-connected group of differing pixels.
///
/// Created during one traversal of the diff mask, never merged or
/// split afterward.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
    /// Coordinates in discovery order; the order carries no meaning.
    #[serde(skip)]
    pub pixels: Vec<(u32, u32)>,
    pub size: usize,
    pub bounds: Bounds,
    /// Classified once at discovery: thin, path-like clusters are
    /// treated as rendering jitter rather than a real change.
    pub line_shift: bool,
}

impl Cluster {
    /// Counts toward the verdict: big enough and not rendering jitter.
    pub fn significant(&self, min_cluster_size: u32) -> bool {
        !self.line_shift && self.size >= min_cluster_size as usize
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterCounts {
    /// All clusters found, line shifts and sub-threshold ones included.
    pub total_clusters: usize,
    pub significant_clusters: usize,
    /// Sum of sizes of the significant clusters.
    pub significant_pixels: u64,
}

#[derive(Debug, Default)]
pub struct ClusterAnalysis {
    pub clusters: Vec<Cluster>,
    pub counts: ClusterCounts,
}

/// Partition the diff mask into clusters via breadth-first flood fill.
///
/// The scan is row-major so discovery order is deterministic. Neighbors
/// are enqueued unconditionally; the visited check happens on dequeue,
/// so duplicate queue entries are skipped without double-counting. The
/// visited grid is owned by this call and never escapes it.
pub fn analyze(mask: &RgbaImage, config: &CompareConfig) -> ClusterAnalysis {
    let (width, height) = mask.dimensions();
    let index = |x: u32, y: u32| y as usize * width as usize + x as usize;

    let mut visited = vec![false; width as usize * height as usize];
    let mut queue: VecDeque<(u32, u32)> = VecDeque::new();
    let mut clusters = Vec::new();

    for y in 0..height {
        for x in 0..width {
            if visited[index(x, y)] || !is_diff_pixel(mask, x, y) {
                continue;
            }

            queue.push_back((x, y));
            let mut pixels = Vec::new();
            while let Some((px, py)) = queue.pop_front() {
                if visited[index(px, py)] || !is_diff_pixel(mask, px, py) {
                    continue;
                }
                visited[index(px, py)] = true;
                pixels.push((px, py));
                for neighbor in neighbors(px, py, width, height) {
                    queue.push_back(neighbor);
                }
            }
            clusters.push(build_cluster(pixels, mask, config));
        }
    }

    let mut counts = ClusterCounts {
        total_clusters: clusters.len(),
        ..Default::default()
    };
    for cluster in &clusters {
        if cluster.significant(config.min_cluster_size) {
            counts.significant_clusters += 1;
            counts.significant_pixels += cluster.size as u64;
        }
    }
    debug!(
        total = counts.total_clusters,
        significant = counts.significant_clusters,
        significant_pixels = counts.significant_pixels,
        "cluster analysis"
    );
    ClusterAnalysis { clusters, counts }
}

fn neighbors(x: u32, y: u32, width: u32, height: u32) -> impl Iterator<Item = (u32, u32)> {
    NEIGHBOR_OFFSETS.iter().filter_map(move |&(dx, dy)| {
        let nx = x as i64 + dx;
        let ny = y as i64 + dy;
        if nx >= 0 && ny >= 0 && nx < i64::from(width) && ny < i64::from(height) {
            Some((nx as u32, ny as u32))
        } else {
            None
        }
    })
}

/// Compute bounds and line-shift classification for a finished cluster.
///
/// Neighbor counts come from re-scanning the mask, not the visited
/// grid: adjacency is about differing pixels, irrespective of which
/// cluster a neighbor landed in.
fn build_cluster(pixels: Vec<(u32, u32)>, mask: &RgbaImage, config: &CompareConfig) -> Cluster {
    let (width, height) = mask.dimensions();
    let mut bounds = Bounds {
        min_x: u32::MAX,
        min_y: u32::MAX,
        max_x: 0,
        max_y: 0,
    };
    let mut line_like = 0usize;

    for &(x, y) in &pixels {
        bounds.min_x = bounds.min_x.min(x);
        bounds.min_y = bounds.min_y.min(y);
        bounds.max_x = bounds.max_x.max(x);
        bounds.max_y = bounds.max_y.max(y);

        let diff_neighbors = neighbors(x, y, width, height)
            .filter(|&(nx, ny)| is_diff_pixel(mask, nx, ny))
            .count();
        if diff_neighbors <= LINE_LIKE_MAX_NEIGHBORS {
            line_like += 1;
        }
    }

    // A valid seed never produces an empty cluster; the guard keeps the
    // ratio well-defined regardless.
    let line_shift =
        !pixels.is_empty() && line_like as f64 / pixels.len() as f64 > config.line_shift_ratio;

    Cluster {
        size: pixels.len(),
        bounds,
        pixels,
        line_shift,
    }
}
