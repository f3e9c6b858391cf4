use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::Point3;

const MIN_DISTANCE: f64 = 0.01;
const THRESHOLD: f64 = 1e-4;

/// Fruchterman-Reingold embedding of `n` nodes in 3D.
///
/// `edges` are node-position pairs and attract in both directions. Initial
/// positions are drawn uniformly from `[0, 1)^3` with `seed`; the result is
/// centred on the origin and scaled so the largest |coordinate| is 1.
pub fn spring_layout_3d(n: usize, edges: &[(usize, usize)], seed: u64, iterations: usize) -> Vec<Point3> {
    match n {
        0 => return Vec::new(),
        1 => return vec![[0.0; 3]],
        _ => {}
    }

    let neighbors = neighbor_lists(n, edges);

    let mut rng = StdRng::seed_from_u64(seed);
    let mut pos: Vec<Point3> = (0..n).map(|_| [rng.gen(), rng.gen(), rng.gen()]).collect();

    let k = (1.0 / n as f64).sqrt();
    let mut t = 0.1 * max_span(&pos);
    let dt = t / (iterations as f64 + 1.0);

    let mut displacement = vec![[0.0; 3]; n];
    for _ in 0..iterations {
        for (i, disp) in displacement.iter_mut().enumerate() {
            *disp = [0.0; 3];
            for j in 0..n {
                if i == j {
                    continue;
                }
                let delta = sub(pos[i], pos[j]);
                let distance = norm(delta).max(MIN_DISTANCE);
                let repulsion = k * k / (distance * distance);
                for d in 0..3 {
                    disp[d] += delta[d] * repulsion;
                }
            }
            for &j in &neighbors[i] {
                let delta = sub(pos[i], pos[j]);
                let attraction = norm(delta).max(MIN_DISTANCE) / k;
                for d in 0..3 {
                    disp[d] -= delta[d] * attraction;
                }
            }
        }

        let mut moved = 0.0;
        for (p, disp) in pos.iter_mut().zip(&displacement) {
            let mut length = norm(*disp);
            if length < MIN_DISTANCE {
                length = 0.1;
            }
            for d in 0..3 {
                let step = disp[d] * t / length;
                p[d] += step;
                moved += step * step;
            }
        }

        t -= dt;
        if moved.sqrt() / (n as f64) < THRESHOLD {
            break;
        }
    }

    rescale(&mut pos);
    pos
}

/// Sorted, deduplicated undirected adjacency; self-loops and out-of-range pairs are dropped.
fn neighbor_lists(n: usize, edges: &[(usize, usize)]) -> Vec<Vec<usize>> {
    let mut neighbors = vec![Vec::new(); n];
    for &(a, b) in edges {
        if a < n && b < n && a != b {
            neighbors[a].push(b);
            neighbors[b].push(a);
        }
    }
    for list in &mut neighbors {
        list.sort_unstable();
        list.dedup();
    }
    neighbors
}

fn sub(a: Point3, b: Point3) -> Point3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn norm(v: Point3) -> f64 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}

fn max_span(pos: &[Point3]) -> f64 {
    (0..3)
        .map(|d| {
            let (lo, hi) = pos
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| (lo.min(p[d]), hi.max(p[d])));
            hi - lo
        })
        .fold(0.0, f64::max)
}

fn rescale(pos: &mut [Point3]) {
    let n = pos.len() as f64;
    let mut center = [0.0; 3];
    for p in pos.iter() {
        for d in 0..3 {
            center[d] += p[d] / n;
        }
    }

    let mut limit: f64 = 0.0;
    for p in pos.iter_mut() {
        for d in 0..3 {
            p[d] -= center[d];
            limit = limit.max(p[d].abs());
        }
    }

    if limit > 0.0 {
        for p in pos.iter_mut() {
            for d in 0..3 {
                p[d] /= limit;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trivial_sizes() {
        assert!(spring_layout_3d(0, &[], 42, 50).is_empty());
        assert_eq!(spring_layout_3d(1, &[], 42, 50), vec![[0.0, 0.0, 0.0]]);
    }

    #[test]
    fn test_output_is_centred_and_unit_scaled() {
        let edges = [(0, 1), (1, 2), (2, 3), (3, 0), (0, 4)];
        let pos = spring_layout_3d(5, &edges, 42, 50);
        assert_eq!(pos.len(), 5);
        let max_abs = pos.iter().flat_map(|p| p.iter()).fold(0.0_f64, |m, c| m.max(c.abs()));
        assert!((max_abs - 1.0).abs() < 1e-9);
        for d in 0..3 {
            let mean: f64 = pos.iter().map(|p| p[d]).sum::<f64>() / 5.0;
            assert!(mean.abs() < 1e-9);
        }
        assert!(pos.iter().flat_map(|p| p.iter()).all(|c| c.is_finite()));
    }

    #[test]
    fn test_same_seed_same_coordinates() {
        let edges = [(0, 1), (1, 2)];
        assert_eq!(spring_layout_3d(3, &edges, 42, 50), spring_layout_3d(3, &edges, 42, 50));
    }

    #[test]
    fn test_edge_direction_does_not_matter() {
        assert_eq!(
            spring_layout_3d(3, &[(0, 1), (1, 2)], 7, 50),
            spring_layout_3d(3, &[(1, 0), (2, 1)], 7, 50)
        );
    }

    #[test]
    fn test_duplicate_edges_attract_once() {
        assert_eq!(
            spring_layout_3d(3, &[(0, 1), (1, 0), (0, 1), (1, 2)], 7, 50),
            spring_layout_3d(3, &[(0, 1), (1, 2)], 7, 50)
        );
    }

    #[test]
    fn test_large_sparse_graph() {
        // a star of 3000 leaves, the shape of a wide crawl frontier
        let n = 3001;
        let edges: Vec<(usize, usize)> = (1..n).map(|leaf| (0, leaf)).collect();
        let neighbors = neighbor_lists(n, &edges);
        assert_eq!(neighbors[0].len(), n - 1);
        assert!(neighbors[1..].iter().all(|list| list == &[0]));

        let pos = spring_layout_3d(n, &edges, 42, 2);
        assert_eq!(pos.len(), n);
        assert!(pos.iter().flat_map(|p| p.iter()).all(|c| c.is_finite() && c.abs() <= 1.0 + 1e-9));
    }

    #[test]
    fn test_out_of_range_edges_are_ignored() {
        assert_eq!(
            spring_layout_3d(2, &[(0, 1), (0, 9)], 7, 50),
            spring_layout_3d(2, &[(0, 1)], 7, 50)
        );
    }
}
