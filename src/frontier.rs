use fxhash::FxBuildHasher;
use grid_util::point::Point;
use indexmap::IndexMap;

pub(crate) type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// A discovered cell waiting in the frontier. `cost` is the accumulated step cost from the start
/// of the current leg, `heuristic` the estimate towards the leg's target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SearchNode {
    pub point: Point,
    pub heuristic: i32,
    pub cost: i32,
}

impl SearchNode {
    pub fn new(point: Point, heuristic: i32, cost: i32) -> SearchNode {
        SearchNode {
            point,
            heuristic,
            cost,
        }
    }
    /// Cost so far plus estimate to go.
    pub fn estimate(&self) -> i32 {
        self.cost + self.heuristic
    }
}

/// Ordered collection of [SearchNode]s, at most one per cell.
///
/// Insertion order is preserved and a node can be replaced in its slot, which is what makes the
/// FIFO/LIFO strategies and the stable priority ordering of the informed strategies reproduce
/// the same expansion order on every run.
#[derive(Clone, Debug, Default)]
pub struct Frontier {
    nodes: FxIndexMap<Point, SearchNode>,
}

impl Frontier {
    pub fn new() -> Frontier {
        Frontier::default()
    }
    pub fn len(&self) -> usize {
        self.nodes.len()
    }
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
    pub fn clear(&mut self) {
        self.nodes.clear();
    }
    pub fn contains(&self, point: &Point) -> bool {
        self.nodes.contains_key(point)
    }
    pub fn get(&self, point: &Point) -> Option<&SearchNode> {
        self.nodes.get(point)
    }

    /// Appends a node behind everything already queued. Returns [false] and leaves the frontier
    /// untouched if the cell is already queued.
    pub fn push(&mut self, node: SearchNode) -> bool {
        if self.nodes.contains_key(&node.point) {
            return false;
        }
        self.nodes.insert(node.point, node);
        true
    }

    /// Decrease-key: overwrites the queued node for the same cell without moving it. Returns the
    /// old node, or [None] if the cell was not queued.
    pub fn replace(&mut self, node: SearchNode) -> Option<SearchNode> {
        self.nodes
            .get_mut(&node.point)
            .map(|slot| std::mem::replace(slot, node))
    }

    /// Removes the node at the front (the oldest, or the best after sorting).
    pub fn pop_front(&mut self) -> Option<SearchNode> {
        self.nodes.shift_remove_index(0).map(|(_, node)| node)
    }

    /// Removes the most recently inserted node.
    pub fn pop_back(&mut self) -> Option<SearchNode> {
        self.nodes.pop().map(|(_, node)| node)
    }

    /// Stable sort by ascending priority: nodes with equal priority keep their relative order.
    pub fn sort_by_priority<F>(&mut self, priority: F)
    where
        F: Fn(&SearchNode) -> i32,
    {
        self.nodes
            .sort_by(|_, a, _, b| priority(a).cmp(&priority(b)));
    }

    pub fn iter(&self) -> impl Iterator<Item = &SearchNode> {
        self.nodes.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(x: i32, heuristic: i32) -> SearchNode {
        SearchNode::new(Point::new(x, 0), heuristic, 0)
    }

    #[test]
    fn fifo_and_lifo_ends() {
        let mut frontier = Frontier::new();
        for x in 0..3 {
            assert!(frontier.push(node(x, 0)));
        }
        assert!(!frontier.push(node(1, 9)));
        assert_eq!(frontier.pop_front().map(|n| n.point.x), Some(0));
        assert_eq!(frontier.pop_back().map(|n| n.point.x), Some(2));
        assert_eq!(frontier.len(), 1);
    }

    #[test]
    fn sort_is_stable() {
        let mut frontier = Frontier::new();
        for (x, h) in [(0, 3), (1, 1), (2, 3), (3, 1)] {
            frontier.push(node(x, h));
        }
        frontier.sort_by_priority(|n| n.heuristic);
        let order: Vec<i32> = frontier.iter().map(|n| n.point.x).collect();
        assert_eq!(order, vec![1, 3, 0, 2]);
    }

    #[test]
    fn replace_keeps_slot() {
        let mut frontier = Frontier::new();
        for x in 0..3 {
            frontier.push(node(x, 5));
        }
        let old = frontier.replace(node(1, 2)).unwrap();
        assert_eq!(old.heuristic, 5);
        let order: Vec<(i32, i32)> = frontier.iter().map(|n| (n.point.x, n.heuristic)).collect();
        assert_eq!(order, vec![(0, 5), (1, 2), (2, 5)]);
        assert!(frontier.replace(node(7, 0)).is_none());
    }
}
