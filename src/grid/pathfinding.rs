//! A* pathfinding on the map grid
//!
//! Legality of each step is supplied by the caller per current cell, so the
//! search can model rules that freeze a unit once it enters a given cell.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use ahash::AHashMap;

use crate::grid::coord::Coordinate;

/// Node in the A* open set
#[derive(Debug, Clone, PartialEq, Eq)]
struct PathNode {
    coord: Coordinate,
    g_cost: u32,
    f_cost: u32, // g_cost + heuristic
}

impl Ord for PathNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap; deeper nodes first on ties, then by cell
        other
            .f_cost
            .cmp(&self.f_cost)
            .then_with(|| self.g_cost.cmp(&other.g_cost))
            .then_with(|| other.coord.cmp(&self.coord))
    }
}

impl PartialOrd for PathNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Find a path from `start` to `goal` no longer than `max_len` steps.
///
/// `neighbors` returns the cells that may be entered from the given cell.
/// Returns the path including both ends, or None if the goal cannot be
/// reached within `max_len`.
pub fn find_path<F, I>(
    start: Coordinate,
    goal: Coordinate,
    max_len: u32,
    mut neighbors: F,
) -> Option<Vec<Coordinate>>
where
    F: FnMut(Coordinate) -> I,
    I: IntoIterator<Item = Coordinate>,
{
    if start == goal {
        return Some(vec![start]);
    }

    let mut open_set = BinaryHeap::new();
    let mut came_from: AHashMap<Coordinate, Coordinate> = AHashMap::new();
    let mut g_scores: AHashMap<Coordinate, u32> = AHashMap::new();

    g_scores.insert(start, 0);
    open_set.push(PathNode {
        coord: start,
        g_cost: 0,
        f_cost: start.distance(&goal),
    });

    while let Some(current) = open_set.pop() {
        if current.coord == goal {
            return Some(reconstruct_path(&came_from, current.coord));
        }

        // Stale entry superseded by a cheaper route
        if current.g_cost > *g_scores.get(&current.coord).unwrap_or(&u32::MAX) {
            continue;
        }

        for neighbor in neighbors(current.coord) {
            let tentative_g = current.g_cost + current.coord.distance(&neighbor);
            if tentative_g > max_len {
                continue;
            }

            let neighbor_g = *g_scores.get(&neighbor).unwrap_or(&u32::MAX);
            if tentative_g < neighbor_g {
                came_from.insert(neighbor, current.coord);
                g_scores.insert(neighbor, tentative_g);
                open_set.push(PathNode {
                    coord: neighbor,
                    g_cost: tentative_g,
                    f_cost: tentative_g + neighbor.distance(&goal),
                });
            }
        }
    }

    None // No path found
}

/// Reconstruct path from came_from map
fn reconstruct_path(
    came_from: &AHashMap<Coordinate, Coordinate>,
    mut current: Coordinate,
) -> Vec<Coordinate> {
    let mut path = vec![current];
    while let Some(&prev) = came_from.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

/// Number of grid steps along a path
pub fn path_length(path: &[Coordinate]) -> u32 {
    path.windows(2).map(|pair| pair[0].distance(&pair[1])).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: i32, y: i32) -> Coordinate {
        Coordinate::new(x, y).unwrap()
    }

    fn open(cell: Coordinate) -> Vec<Coordinate> {
        cell.neighbors()
    }

    #[test]
    fn test_pathfind_straight_line() {
        let start = c(5, 5);
        let goal = c(5, 10);

        let path = find_path(start, goal, 5, open).unwrap();

        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&goal));
        assert_eq!(path_length(&path), 5);
    }

    #[test]
    fn test_pathfind_diagonal_costs_one() {
        let path = find_path(c(1, 1), c(4, 4), 3, open).unwrap();
        assert_eq!(path.len(), 4);
    }

    #[test]
    fn test_pathfind_too_far() {
        assert!(find_path(c(5, 5), c(5, 10), 4, open).is_none());
    }

    #[test]
    fn test_pathfind_same_start_goal() {
        let start = c(5, 5);
        let path = find_path(start, start, 0, open).unwrap();
        assert_eq!(path, vec![start]);
    }

    #[test]
    fn test_pathfind_around_wall() {
        // Wall at x = 6 from y = 3 to y = 7
        let wall: Vec<Coordinate> = (3..=7).map(|y| c(6, y)).collect();
        let passable = |cell: Coordinate| {
            cell.neighbors()
                .into_iter()
                .filter(|n| !wall.contains(n))
                .collect::<Vec<_>>()
        };

        let path = find_path(c(5, 5), c(7, 5), 8, passable).unwrap();
        assert!(path.iter().all(|cell| !wall.contains(cell)));
        assert_eq!(path_length(&path), 6);

        // Detour needs 6 steps, so a budget of 5 fails
        assert!(find_path(c(5, 5), c(7, 5), 5, passable).is_none());
    }

    #[test]
    fn test_frozen_cell_is_a_dead_end() {
        // Entering (6, 5) freezes the mover; goal lies beyond it
        let frozen = c(6, 5);
        let rules = |cell: Coordinate| {
            if cell == frozen {
                Vec::new()
            } else {
                cell.neighbors()
            }
        };

        // Can still end in the frozen cell
        assert!(find_path(c(5, 5), frozen, 1, rules).is_some());
        // Straight line through it is not possible; detour is fine
        let path = find_path(c(5, 5), c(7, 5), 2, rules).unwrap();
        assert!(!path.contains(&frozen));
    }

    #[test]
    fn test_pathfind_no_path() {
        let goal = c(5, 5);
        let ring = goal.neighbors();
        let passable = |cell: Coordinate| {
            cell.neighbors()
                .into_iter()
                .filter(|n| !ring.contains(n))
                .collect::<Vec<_>>()
        };
        assert!(find_path(c(1, 1), goal, 20, passable).is_none());
    }
}
