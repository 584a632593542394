//! Connected-component clustering of touching hearts.
//!
//! Two hearts touch when their centres are closer than the mean of their
//! sizes. Every heart in a component of two or more gets flagged for
//! explosion. [`find_clusters`] buckets hearts into a spatial hash so only
//! neighbouring cells are compared; [`find_clusters_brute_force`] is the plain
//! all-pairs pass and produces the same components.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use cgmath::{InnerSpace, Vector2, vec2};

use crate::particle::Particle;

pub fn touching(a: &Particle, b: &Particle) -> bool {
    (a.position - b.position).magnitude() < (a.size + b.size) / 2.0
}

/// Flags every heart that belongs to a cluster and returns the clusters as
/// index lists into `particles`. Non-heart particles are ignored.
pub fn find_clusters(particles: &mut [Particle]) -> Vec<Vec<usize>> {
    let hearts: Vec<usize> = heart_indices(particles);

    // Any touching pair is closer than the larger of the two sizes.
    let cell_size = hearts
        .iter()
        .map(|&i| particles[i].size)
        .fold(0.0f32, f32::max);

    let clusters = if hearts.len() < 2 || !(cell_size.is_finite() && cell_size > 0.0) {
        components(particles, &hearts, |_, _| hearts.clone())
    } else {
        let grid = SpatialHash::build(particles, &hearts, cell_size);
        components(particles, &hearts, |particles, i| grid.neighbours(particles[i].position))
    };

    flag(particles, &clusters);
    clusters
}

/// All-pairs reference pass, O(n²) in the number of hearts.
pub fn find_clusters_brute_force(particles: &mut [Particle]) -> Vec<Vec<usize>> {
    let hearts = heart_indices(particles);
    let clusters = components(particles, &hearts, |_, _| hearts.clone());
    flag(particles, &clusters);
    clusters
}

fn heart_indices(particles: &[Particle]) -> Vec<usize> {
    particles
        .iter()
        .enumerate()
        .filter(|(_, p)| p.is_heart())
        .map(|(i, _)| i)
        .collect()
}

fn flag(particles: &mut [Particle], clusters: &[Vec<usize>]) {
    for &i in clusters.iter().flatten() {
        particles[i].flag_explosion();
    }
}

/// Depth-first search over the touching relation. `candidates` yields the
/// particle indices that might touch particle `i`; it may over-report.
fn components<F>(particles: &[Particle], hearts: &[usize], candidates: F) -> Vec<Vec<usize>>
where
    F: Fn(&[Particle], usize) -> Vec<usize>,
{
    let mut visited = vec![false; particles.len()];
    let mut clusters = Vec::new();
    let mut stack = Vec::new();

    for &start in hearts {
        if visited[start] {
            continue;
        }
        visited[start] = true;
        stack.push(start);
        let mut component = Vec::new();

        while let Some(current) = stack.pop() {
            component.push(current);
            for other in candidates(particles, current) {
                if !visited[other] && touching(&particles[current], &particles[other]) {
                    visited[other] = true;
                    stack.push(other);
                }
            }
        }

        if component.len() > 1 {
            clusters.push(component);
        }
    }

    clusters
}

/// Counting-sort spatial hash: `cell_starts[b]..cell_starts[b + 1]` indexes
/// the slice of `entries` holding every particle whose cell hashes to bucket `b`.
struct SpatialHash {
    cell_size: f32,
    cell_starts: Vec<usize>,
    entries: Vec<usize>,
}

impl SpatialHash {
    fn build(particles: &[Particle], members: &[usize], cell_size: f32) -> Self {
        let buckets = members.len();
        let mut cell_starts = vec![0usize; buckets + 1];

        for &i in members {
            let bucket = Self::bucket(Self::cell_coord(particles[i].position, cell_size), buckets);
            cell_starts[bucket + 1] += 1;
        }
        for b in 1..cell_starts.len() {
            cell_starts[b] += cell_starts[b - 1];
        }

        let mut cursor = cell_starts.clone();
        let mut entries = vec![0usize; members.len()];
        for &i in members {
            let bucket = Self::bucket(Self::cell_coord(particles[i].position, cell_size), buckets);
            entries[cursor[bucket]] = i;
            cursor[bucket] += 1;
        }

        Self { cell_size, cell_starts, entries }
    }

    fn cell_coord(v: Vector2<f32>, cell_size: f32) -> Vector2<isize> {
        vec2(
            (v.x / cell_size).floor() as isize,
            (v.y / cell_size).floor() as isize,
        )
    }

    fn bucket(cell: Vector2<isize>, buckets: usize) -> usize {
        let mut hasher = DefaultHasher::new();
        cell.x.hash(&mut hasher);
        cell.y.hash(&mut hasher);
        hasher.finish() as usize % buckets
    }

    fn neighbours(&self, position: Vector2<f32>) -> Vec<usize> {
        let buckets = self.cell_starts.len() - 1;
        let cell = Self::cell_coord(position, self.cell_size);
        let mut seen_buckets = Vec::with_capacity(9);
        let mut out = Vec::new();

        for dx in -1isize..=1 {
            for dy in -1isize..=1 {
                let neighbour = vec2(cell.x.saturating_add(dx), cell.y.saturating_add(dy));
                let bucket = Self::bucket(neighbour, buckets);
                if seen_buckets.contains(&bucket) {
                    continue;
                }
                seen_buckets.push(bucket);
                out.extend_from_slice(&self.entries[self.cell_starts[bucket]..self.cell_starts[bucket + 1]]);
            }
        }

        out
    }
}
