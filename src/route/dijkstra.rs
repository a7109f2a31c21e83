use crate::graph::{VertexId, Weight};

use indexmap::map::Entry;
use indexmap::IndexMap;
use pathfinding::num_traits::Zero;
use rustc_hash::{FxHashSet, FxHasher};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::hash::BuildHasherDefault;

type FxIndexMap<K, V> = IndexMap<K, V, BuildHasherDefault<FxHasher>>;

#[derive(Debug)]
struct SmallestHolder {
    cost: Weight,
    index: usize,
}

impl PartialEq for SmallestHolder {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.cost.total_cmp(&other.cost).is_eq()
    }
}

impl Eq for SmallestHolder {}

impl PartialOrd for SmallestHolder {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SmallestHolder {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        other.cost.total_cmp(&self.cost)
    }
}

/// Iterator returned by [`Dijkstra::reach`].
pub struct DijkstraReachable<FN> {
    to_see: BinaryHeap<SmallestHolder>,
    seen: FxHashSet<usize>,
    parents: FxIndexMap<VertexId, (usize, Weight)>,
    successors: FN,
}

/// A vertex settled by [`Dijkstra::reach`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReachedVertex {
    pub vertex: VertexId,
    /// The vertex it was reached from, `None` for the start.
    pub parent: Option<VertexId>,
    /// The total cost from the start.
    pub cost: Weight,
}

impl<FN> DijkstraReachable<FN> {
    /// The path from the start to an already settled `vertex`.
    ///
    /// Settled vertices never change parent, so the path is final.
    pub fn path_to(&self, vertex: VertexId) -> Option<Vec<VertexId>> {
        let mut index = self.parents.get_index_of(&vertex)?;
        if !self.seen.contains(&index) {
            return None;
        }

        let mut path = vec![];
        while let Some((vertex, (parent, _))) = self.parents.get_index(index) {
            path.push(*vertex);
            index = *parent;
        }

        path.reverse();
        Some(path)
    }
}

impl<FN, IN> Iterator for DijkstraReachable<FN>
where
    FN: FnMut(VertexId) -> IN,
    IN: IntoIterator<Item = (VertexId, Weight)>,
{
    type Item = ReachedVertex;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(SmallestHolder { cost, index }) = self.to_see.pop() {
            if !self.seen.insert(index) {
                continue;
            }

            let Some((&vertex, &(parent_index, _))) = self.parents.get_index(index) else {
                continue;
            };

            let item = ReachedVertex {
                vertex,
                parent: self.parents.get_index(parent_index).map(|(parent, _)| *parent),
                cost,
            };

            for (successor, move_cost) in (self.successors)(vertex) {
                let new_cost = cost + move_cost;

                let index = match self.parents.entry(successor) {
                    Entry::Vacant(e) => {
                        let n = e.index();
                        e.insert((index, new_cost));
                        n
                    }
                    Entry::Occupied(mut e) => {
                        if e.get().1 > new_cost {
                            e.insert((index, new_cost));
                            e.index()
                        } else {
                            continue;
                        }
                    }
                };

                self.to_see.push(SmallestHolder {
                    cost: new_cost,
                    index,
                });
            }

            return Some(item);
        }

        None
    }
}

pub struct Dijkstra;

impl Dijkstra {
    /// Visit all vertices that are reachable from a start vertex, closest first.
    ///
    /// The `successors` function receives the current vertex, and returns
    /// an iterator of successors associated with their move cost, which
    /// must not be negative.
    pub fn reach<FN, IN>(&self, start: VertexId, successors: FN) -> DijkstraReachable<FN>
    where
        FN: FnMut(VertexId) -> IN,
        IN: IntoIterator<Item = (VertexId, Weight)>,
    {
        let mut to_see: BinaryHeap<SmallestHolder> = BinaryHeap::with_capacity(256);
        to_see.push(SmallestHolder {
            cost: Zero::zero(),
            index: 0,
        });

        let mut parents: FxIndexMap<VertexId, (usize, Weight)> =
            FxIndexMap::with_capacity_and_hasher(64, BuildHasherDefault::<FxHasher>::default());

        parents.insert(start, (usize::MAX, Zero::zero()));

        DijkstraReachable {
            to_see,
            seen: FxHashSet::default(),
            parents,
            successors,
        }
    }
}
