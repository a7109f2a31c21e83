//! Connectivity labels of the road graph.
//!
//! Weak components gate candidate pairs spatially: two positions in
//! different weak components can never be joined. Strong components
//! gate routing: a transition across two strong components is
//! known to be unroutable before the oracle is ever queried.

use crate::graph::VertexId;

use rustc_hash::FxHashMap;

#[doc(hidden)]
pub mod strong;
#[doc(hidden)]
pub mod weak;

#[cfg(test)]
mod test;

#[doc(inline)]
pub use strong::strong_components;
#[doc(inline)]
pub use weak::weak_components;

pub type ComponentId = usize;

/// A labelling of every vertex with the component it belongs to.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Components {
    vertex_component: FxHashMap<VertexId, ComponentId>,
    sizes: Vec<usize>,
    is_tiny: Vec<bool>,
    big_component_id: Option<ComponentId>,
}

impl Components {
    /// Builds the labelling from components in discovery order.
    ///
    /// The biggest component is the first one seen with the maximal size.
    pub(crate) fn from_groups<I>(groups: I, small_component_size: usize) -> Self
    where
        I: IntoIterator<Item = Vec<VertexId>>,
    {
        let mut components = Components::default();

        for (id, group) in groups.into_iter().enumerate() {
            let size = group.len();

            if components
                .big_component_id
                .map_or(true, |big| size > components.sizes[big])
            {
                components.big_component_id = Some(id);
            }

            components.sizes.push(size);
            components.is_tiny.push(size < small_component_size);
            components
                .vertex_component
                .extend(group.into_iter().map(|vertex| (vertex, id)));
        }

        components
    }

    /// The component of `vertex`, if the vertex is known.
    #[inline]
    pub fn component(&self, vertex: VertexId) -> Option<ComponentId> {
        self.vertex_component.get(&vertex).copied()
    }

    /// Whether both vertices are known and share a component.
    #[inline]
    pub fn same_component(&self, a: VertexId, b: VertexId) -> bool {
        match (self.component(a), self.component(b)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Whether `vertex` belongs to the biggest component.
    #[inline]
    pub fn in_big_component(&self, vertex: VertexId) -> bool {
        self.big_component_id.is_some() && self.component(vertex) == self.big_component_id
    }

    #[inline]
    pub fn big_component_id(&self) -> Option<ComponentId> {
        self.big_component_id
    }

    #[inline]
    pub fn total_components(&self) -> usize {
        self.sizes.len()
    }

    #[inline]
    pub fn size(&self, component: ComponentId) -> Option<usize> {
        self.sizes.get(component).copied()
    }

    /// Sizes of every component, indexed by [`ComponentId`].
    #[inline]
    pub fn component_sizes(&self) -> &[usize] {
        &self.sizes
    }

    /// Whether the component is below the small component threshold.
    #[inline]
    pub fn is_tiny(&self, component: ComponentId) -> bool {
        self.is_tiny.get(component).copied().unwrap_or(false)
    }

    /// Number of labelled vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.vertex_component.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertex_component.is_empty()
    }
}
