//! Container nesting as a directed graph.
//!
//! Every distinct container id becomes one node and every `parent` link an
//! edge from the parent to the child. Layout walks the tree children-first to
//! fit containers around their members; validation uses it to find
//! containers that end up inside themselves.

use std::collections::HashMap;

use log::trace;
use petgraph::{
    Direction,
    algo::tarjan_scc,
    graph::{DiGraph, NodeIndex},
    visit::DfsPostOrder,
};

use stratus_core::{identifier::Id, model::DiagramModel};

/// The container hierarchy of one diagram.
#[derive(Debug)]
pub struct ContainmentTree {
    graph: DiGraph<Id, ()>,
    node_id_map: HashMap<Id, NodeIndex>,
}

impl ContainmentTree {
    /// Builds the tree from a model's containers.
    ///
    /// Parent links that name no container are ignored here; the validator
    /// reports them separately.
    pub fn from_model(model: &DiagramModel) -> Self {
        let mut graph = DiGraph::new();
        let mut node_id_map = HashMap::new();

        for container in model.containers() {
            node_id_map
                .entry(container.id())
                .or_insert_with(|| graph.add_node(container.id()));
        }

        for container in model.containers() {
            let Some(parent) = container.parent() else {
                continue;
            };
            let (Some(&parent_idx), Some(&child_idx)) = (
                node_id_map.get(&parent),
                node_id_map.get(&container.id()),
            ) else {
                continue;
            };
            if graph.find_edge(parent_idx, child_idx).is_none() {
                graph.add_edge(parent_idx, child_idx, ());
            }
        }

        trace!(
            containers = graph.node_count(),
            links = graph.edge_count();
            "Containment tree built"
        );
        Self { graph, node_id_map }
    }

    /// Returns true if `id` names a container.
    pub fn contains(&self, id: Id) -> bool {
        self.node_id_map.contains_key(&id)
    }

    /// Every container exactly once, nested containers before the ones
    /// holding them.
    ///
    /// Containers only reachable through a cycle come last, in model order.
    pub fn post_order(&self) -> Vec<Id> {
        let roots = self.graph.node_indices().filter(|&idx| {
            self.graph
                .neighbors_directed(idx, Direction::Incoming)
                .next()
                .is_none()
        });

        let mut order = Vec::with_capacity(self.graph.node_count());
        let mut dfs = DfsPostOrder::empty(&self.graph);
        for start in roots.chain(self.graph.node_indices()) {
            if dfs.discovered.contains(start.index()) {
                continue;
            }
            dfs.move_to(start);
            while let Some(idx) = dfs.next(&self.graph) {
                order.push(self.graph[idx]);
            }
        }
        order
    }

    /// Containers that contain themselves, directly or transitively, in
    /// model order.
    pub fn cycle_members(&self) -> Vec<Id> {
        let mut members: Vec<NodeIndex> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|component| {
                component.len() > 1
                    || component
                        .first()
                        .is_some_and(|&idx| self.graph.contains_edge(idx, idx))
            })
            .flatten()
            .collect();
        members.sort();
        members.into_iter().map(|idx| self.graph[idx]).collect()
    }
}
