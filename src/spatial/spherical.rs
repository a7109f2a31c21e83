use crate::geo::{GeoPoint, Srid, Vector3};
use crate::graph::{Edge, EdgeId};
use crate::spatial::{EdgeArena, Neighbour, SpatialError, Storage};

use either::Either;
use h3o::{CellIndex, LatLng, Resolution};
use itertools::Itertools;
use log::debug;
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::{BTreeMap, BTreeSet};

/// Default cell resolution, hexagons of roughly 66 to 76 meters.
pub const DEFAULT_RESOLUTION: u8 = 10;

/// Hard cap on the number of rings visited by [`SphericalStorage::find_nearest`].
pub const MAX_RINGS: u32 = 50;

/// Disks wider than this many rings are answered by a full scan instead.
const MAX_DISK_RINGS: f64 = 64.0;

/// Geodetic edge storage, bucketed by H3 cell.
///
/// Each edge is posted under every cell its polyline passes through.
/// Cells are found by sampling every segment at half the cell edge
/// length, so any point upon the polyline is at most one cell away
/// from a posting.
#[derive(Debug)]
pub struct SphericalStorage {
    resolution: Resolution,
    edge_length: f64,

    arena: EdgeArena,
    postings: BTreeMap<u64, Vec<usize>>,
}

impl Default for SphericalStorage {
    fn default() -> Self {
        SphericalStorage::with_resolution(Resolution::Ten)
    }
}

impl SphericalStorage {
    /// Creates an empty storage, indexing at the given H3 resolution (0 to 15).
    pub fn new(resolution: u8) -> Result<Self, SpatialError> {
        let resolution = Resolution::try_from(resolution)
            .map_err(|_| SpatialError::InvalidResolution(resolution))?;

        Ok(SphericalStorage::with_resolution(resolution))
    }

    fn with_resolution(resolution: Resolution) -> Self {
        Self {
            resolution,
            edge_length: resolution.edge_length_m(),
            arena: EdgeArena::default(),
            postings: BTreeMap::new(),
        }
    }

    /// The average hexagon edge length at the storage resolution, in meters.
    #[inline]
    pub fn cell_size(&self) -> f64 {
        self.edge_length
    }

    /// Number of distinct cells holding at least one edge.
    pub fn cells(&self) -> usize {
        self.postings.len()
    }

    fn cell(&self, point: &GeoPoint) -> Option<CellIndex> {
        LatLng::new(point.y(), point.x())
            .ok()
            .map(|coord| coord.to_cell(self.resolution))
    }

    /// Every cell touched by the polyline of `edge`.
    fn covering(&self, edge: &Edge) -> Result<BTreeSet<u64>, SpatialError> {
        let step = self.edge_length / 2.0;
        let mut cells = BTreeSet::new();

        for (a, b) in edge.geometry.points().tuple_windows() {
            let (va, vb) = (a.vector(), b.vector());
            let samples = (a.distance(&b) / step).ceil().max(1.0) as usize;

            for sample in 0..=samples {
                let t = sample as f64 / samples as f64;
                let vector: Vector3 = (va.scale(1.0 - t) + vb.scale(t)).normalize();
                let point = GeoPoint::from_vector(&vector);

                let cell = self.cell(&point).ok_or_else(|| {
                    SpatialError::Unindexable(edge.id, format!("no cell for {point}"))
                })?;

                cells.insert(u64::from(cell));
            }
        }

        Ok(cells)
    }

    fn postings_of(&self, cell: CellIndex) -> impl Iterator<Item = usize> + '_ {
        self.postings
            .get(&u64::from(cell))
            .into_iter()
            .flatten()
            .copied()
    }
}

impl Storage for SphericalStorage {
    fn srid(&self) -> Srid {
        Srid::Wgs84
    }

    fn add_edge(&mut self, edge: Edge) -> Result<(), SpatialError> {
        if edge.srid() != Srid::Wgs84 {
            return Err(SpatialError::SridMismatch(edge.id, edge.srid(), Srid::Wgs84));
        }

        let cells = self.covering(&edge)?;
        let index = self.arena.push(Srid::Wgs84, edge)?;

        for cell in cells {
            self.postings.entry(cell).or_default().push(index);
        }

        Ok(())
    }

    fn get_edge(&self, id: EdgeId) -> Option<&Edge> {
        self.arena.get(id)
    }

    fn len(&self) -> usize {
        self.arena.len()
    }

    fn find_in_radius(&self, point: &GeoPoint, radius: f64) -> FxHashMap<EdgeId, f64> {
        let rings = (radius / self.edge_length).ceil() + 2.0;
        let center = self.cell(point);

        let candidates = match center {
            Some(center) if rings <= MAX_DISK_RINGS => Either::Left(
                center
                    .grid_disk_safe(rings as u32)
                    .flat_map(|cell| self.postings_of(cell))
                    .collect::<FxHashSet<usize>>()
                    .into_iter(),
            ),
            _ => {
                debug!("Radius {radius} spans {rings} rings, scanning all edges");
                Either::Right(0..self.arena.len())
            }
        };

        candidates
            .filter_map(|index| self.arena.distance(index, point))
            .filter(|(_, distance)| *distance <= radius)
            .collect()
    }

    /// Expands ring by ring from the cell of `point`, until the `n`-th best
    /// distance found cannot be beaten by any edge outside the visited area.
    ///
    /// The visited area after `k` rings safely contains every edge within
    /// `(k - 1)` cell edge lengths, so the first ring never terminates the
    /// search. Gives up after [`MAX_RINGS`].
    fn find_nearest(&self, point: &GeoPoint, n: usize) -> Vec<Neighbour> {
        if n == 0 || self.arena.len() == 0 {
            return vec![];
        }

        let Some(center) = self.cell(point) else {
            return vec![];
        };

        let mut visited = FxHashSet::from_iter([center]);
        let mut frontier = vec![center];
        let mut found: FxHashMap<EdgeId, f64> = FxHashMap::default();

        for ring in 0..=MAX_RINGS {
            for cell in &frontier {
                for index in self.postings_of(*cell) {
                    let Some(edge) = self.arena.at(index) else {
                        continue;
                    };

                    found
                        .entry(edge.id)
                        .or_insert_with(|| edge.geometry.project(point).distance);
                }
            }

            if ring > 0 && found.len() >= n {
                let nth = found
                    .values()
                    .copied()
                    .sorted_by(f64::total_cmp)
                    .nth(n - 1)
                    .unwrap_or(f64::INFINITY);

                if nth <= self.edge_length * (ring - 1) as f64 {
                    debug!("Nearest search settled after {ring} rings");
                    break;
                }
            }

            frontier = frontier
                .iter()
                .flat_map(|cell| cell.grid_disk_safe(1))
                .filter(|cell| visited.insert(*cell))
                .collect();
        }

        found
            .into_iter()
            .map(|(edge, distance)| Neighbour { edge, distance })
            .sorted()
            .take(n)
            .collect()
    }
}
