use crate::geo::{Polyline, Projection};
use crate::graph::{Edge, EdgeId, MapEngine, VertexId, Weight};
use crate::route::RouteOracle;
use crate::transition::{CandidateLayer, MatchError, Observation, RouteCache, ViterbiPath};

use strum::{Display, EnumString};

/// Status of a match, or of a single observation within it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[repr(u32)]
pub enum MatchCode {
    Ok = 900,
    NoCandidates = 901,
    AloneObservation = 902,
}

impl MatchCode {
    #[inline]
    pub const fn code(self) -> u32 {
        self as u32
    }
}

/// An edge travelled between two matched observations.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeResult {
    pub id: EdgeId,
    pub weight: Weight,
    pub geometry: Polyline,
}

impl From<&Edge> for EdgeResult {
    fn from(edge: &Edge) -> Self {
        Self {
            id: edge.id,
            weight: edge.weight,
            geometry: edge.geometry.clone(),
        }
    }
}

/// Where an observation was placed upon the graph.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchedPosition {
    pub edge: Edge,

    /// The end of the edge nearest the projection along the polyline.
    pub vertex: VertexId,
    pub projection: Projection,
}

impl MatchedPosition {
    /// The matched edge, from the projection onwards.
    pub fn edge_ahead(&self) -> Polyline {
        self.edge.geometry.cut_from(&self.projection)
    }

    /// The matched edge, up to the projection.
    pub fn edge_behind(&self) -> Polyline {
        self.edge.geometry.cut_to(&self.projection)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ObservationResult {
    /// Position of the observation within the input.
    pub index: usize,
    pub observation: Observation,
    pub code: MatchCode,

    pub matched: Option<MatchedPosition>,

    /// Edges travelled after this observation, until the next one.
    pub next_edges: Vec<EdgeResult>,
}

impl ObservationResult {
    pub fn unmatched(index: usize, observation: Observation) -> Self {
        Self {
            index,
            observation,
            code: MatchCode::NoCandidates,
            matched: None,
            next_edges: vec![],
        }
    }

    #[inline]
    pub fn is_matched(&self) -> bool {
        self.matched.is_some()
    }
}

/// A run of observations joined by finite routes.
#[derive(Clone, Debug, PartialEq)]
pub struct SubMatch {
    pub observations: Vec<ObservationResult>,

    /// Log-probability of the decoded sequence.
    pub probability: f64,

    /// The travelled geometry, from the first projection to the last.
    pub path: Option<Polyline>,
}

impl SubMatch {
    /// Identifiers of the matched edges, one per observation.
    pub fn matched_edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.observations
            .iter()
            .filter_map(|result| result.matched.as_ref())
            .map(|matched| matched.edge.id)
    }

    /// Builds the sub-match of the decoded states of `layers`.
    pub(crate) fn assemble<R: RouteOracle>(
        engine: &MapEngine,
        cache: &mut RouteCache<'_, R>,
        observations: &[Observation],
        layers: &[CandidateLayer],
        decoded: &ViterbiPath,
    ) -> Result<SubMatch, MatchError> {
        let chosen = layers
            .iter()
            .zip(&decoded.states)
            .map(|(layer, state)| {
                let position = layer
                    .states
                    .get(*state)
                    .ok_or(MatchError::Unsolvable(layer.observation))?;
                Ok((layer.observation, position))
            })
            .collect::<Result<Vec<_>, MatchError>>()?;

        let code = if chosen.len() > 1 {
            MatchCode::Ok
        } else {
            MatchCode::AloneObservation
        };

        let edge = |id: EdgeId| engine.edge(id).ok_or(MatchError::UnknownEdge(id));

        let mut results = Vec::with_capacity(chosen.len());
        let mut path: Option<Polyline> = None;

        // The edge being travelled, and where its travel began
        let mut open: Option<(EdgeId, Option<Projection>)> = None;

        for (index, (input, position)) in chosen.iter().enumerate() {
            let next = chosen.get(index + 1).map(|(_, next)| *next);

            if open.is_none() {
                open = Some((position.edge, Some(position.projection)));
            }

            let mut next_edges = vec![];
            if let Some(next) = next {
                let vertices = cache.intermediate(position, next);
                next_edges = engine
                    .path_edges(&vertices)
                    .map(EdgeResult::from)
                    .collect::<Vec<_>>();

                if !position.precedes_on_edge(next) {
                    if let Some((id, start)) = open.take() {
                        append(&mut path, edge(id)?.geometry.slice(start.as_ref(), None));
                    }

                    for travelled in &next_edges {
                        append(&mut path, travelled.geometry.clone());
                    }

                    open = Some((next.edge, None));
                }
            }

            let observation = observations
                .get(*input)
                .copied()
                .ok_or(MatchError::Unsolvable(*input))?;

            results.push(ObservationResult {
                index: *input,
                observation,
                code,
                matched: Some(MatchedPosition {
                    edge: edge(position.edge)?.clone(),
                    vertex: position.snap_vertex,
                    projection: position.projection,
                }),
                next_edges,
            });
        }

        if let (Some((id, start)), Some((_, last))) = (open, chosen.last()) {
            append(&mut path, edge(id)?.geometry.slice(start.as_ref(), Some(&last.projection)));
        }

        Ok(SubMatch {
            observations: results,
            probability: decoded.probability,
            path,
        })
    }
}

fn append(path: &mut Option<Polyline>, piece: Polyline) {
    match path {
        Some(line) => line.extend(&piece),
        None => *path = Some(piece),
    }
}

/// The outcome of matching a trip.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchResult {
    pub sub_matches: Vec<SubMatch>,

    /// Observations without any candidate.
    pub unmatched: Vec<ObservationResult>,
    pub code: MatchCode,
}

impl MatchResult {
    /// Every observation result, in input order.
    pub fn observations(&self) -> Vec<&ObservationResult> {
        let mut all = self
            .sub_matches
            .iter()
            .flat_map(|sub_match| &sub_match.observations)
            .chain(&self.unmatched)
            .collect::<Vec<_>>();

        all.sort_by_key(|result| result.index);
        all
    }

    /// Number of observations placed upon the graph.
    pub fn matched_count(&self) -> usize {
        self.sub_matches
            .iter()
            .map(|sub_match| sub_match.observations.len())
            .sum()
    }
}
