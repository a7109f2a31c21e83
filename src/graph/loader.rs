//! Tabular graph ingestion.
//!
//! Graphs are read from `;`-separated files with a header row:
//!
//! ```text
//! source;target;oneway;weight;geom
//! 1;2;B;12.5;LINESTRING(37.61 55.75, 37.62 55.75)
//! 2;3;F;7.25;LINESTRING(37.62 55.75, 37.62 55.76)
//! ```
//!
//! Every row yields an edge, numbered sequentially from zero. A row
//! whose `oneway` column is `B` also yields the reversed edge, numbered
//! right after it. Rows leading from a vertex to itself are skipped.

use crate::config::EngineConfig;
use crate::geo::{Polyline, Srid};
use crate::graph::{Edge, EdgeId, EngineBuilder, GraphError, MapEngine, VertexId, Weight};

use geo::LineString;
use log::{info, warn};
use serde::Deserialize;
use std::io;
use std::path::Path;
use wkt::TryFromWkt;

/// Marks a row traversable in both directions.
const BIDIRECTIONAL: &str = "B";

#[derive(Debug, Deserialize)]
struct EdgeRow {
    source: VertexId,
    target: VertexId,
    oneway: String,
    weight: Weight,
    geom: String,
}

/// Parses every edge of a graph table.
pub fn read_edges<R: io::Read>(reader: R, srid: Srid) -> Result<Vec<Edge>, GraphError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut edges = vec![];
    let mut next_id: EdgeId = 0;

    for (index, record) in reader.deserialize::<EdgeRow>().enumerate() {
        let row = index as u64 + 1;
        let record = record?;

        if record.source == record.target {
            warn!("Row {row} leads from vertex {} to itself, skipping", record.source);
            continue;
        }

        let line = LineString::<f64>::try_from_wkt_str(&record.geom)
            .map_err(|err| GraphError::InvalidRow(row, err.to_string()))?;
        let geometry = Polyline::new(srid, line)
            .map_err(|err| GraphError::InvalidRow(row, err.to_string()))?;

        if record.oneway == BIDIRECTIONAL {
            let reversed = geometry.reversed();
            edges.push(Edge::new(next_id, record.source, record.target, record.weight, geometry));
            edges.push(Edge::new(next_id + 1, record.target, record.source, record.weight, reversed));
            next_id += 2;
        } else {
            edges.push(Edge::new(next_id, record.source, record.target, record.weight, geometry));
            next_id += 1;
        }
    }

    Ok(edges)
}

/// Adds every edge of a graph table to `builder`, returning how many were added.
pub fn load_into<R: io::Read>(reader: R, builder: &mut EngineBuilder) -> Result<usize, GraphError> {
    let edges = read_edges(reader, builder.config().srid)?;
    let count = edges.len();

    for edge in edges {
        builder.add_edge(edge)?;
    }

    Ok(count)
}

/// Reads a graph file and finalizes it into an engine.
pub fn load_engine(path: impl AsRef<Path>, config: EngineConfig) -> Result<MapEngine, GraphError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(csv::Error::from)?;

    let mut builder = EngineBuilder::new(config);
    let count = load_into(io::BufReader::new(file), &mut builder)?;
    info!("Read {count} edges from {}", path.display());

    builder.finalize()
}
