//! Flow view: transfer actions collapsed by `(from, to, type)`.
//!
//! Builds a directed graph where nodes are parties and each edge is one
//! display row. Unlike a transfer graph, parallel edges are merged: a second
//! action with the same endpoints and type bumps the existing edge's count.
//! The action list itself is never modified.

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use txlens_data::types::{Action, ActionType};

/// Edge weight: all transfer actions of one type between two parties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowEdge {
    pub action_type: ActionType,
    /// Number of actions merged into this edge.
    pub count: usize,
    /// Distinct asset ids moved along this edge, first-seen order.
    pub assets: Vec<String>,
}

/// One display row of the flow view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowRow {
    pub from: Option<String>,
    pub to: Option<String>,
    pub action_type: ActionType,
    pub count: usize,
    pub assets: Vec<String>,
}

/// Directed graph of parties and merged transfer flows.
pub struct FlowGraph {
    pub graph: DiGraph<Option<String>, FlowEdge>,
    party_to_ix: HashMap<Option<String>, NodeIndex>,
}

impl FlowGraph {
    /// Builds the graph from transfer actions; other action types are ignored.
    pub fn from_actions(actions: &[Action]) -> Self {
        let mut graph: DiGraph<Option<String>, FlowEdge> = DiGraph::new();
        let mut party_to_ix: HashMap<Option<String>, NodeIndex> = HashMap::new();

        for action in actions.iter().filter(|a| a.action_type.is_transfer()) {
            let from_ix = *party_to_ix
                .entry(action.from.clone())
                .or_insert_with(|| graph.add_node(action.from.clone()));
            let to_ix = *party_to_ix
                .entry(action.to.clone())
                .or_insert_with(|| graph.add_node(action.to.clone()));

            let existing = graph
                .edges_connecting(from_ix, to_ix)
                .find(|edge| edge.weight().action_type == action.action_type)
                .map(|edge| edge.id());

            let asset = action.asset_id.clone().unwrap_or_default();
            match existing {
                Some(edge_ix) => {
                    let edge = &mut graph[edge_ix];
                    edge.count += 1;
                    if !edge.assets.contains(&asset) {
                        edge.assets.push(asset);
                    }
                }
                None => {
                    graph.add_edge(
                        from_ix,
                        to_ix,
                        FlowEdge {
                            action_type: action.action_type,
                            count: 1,
                            assets: vec![asset],
                        },
                    );
                }
            }
        }

        Self { graph, party_to_ix }
    }

    /// Rows in first-appearance order.
    pub fn rows(&self) -> Vec<FlowRow> {
        self.graph
            .edge_references()
            .map(|edge| FlowRow {
                from: self.graph[edge.source()].clone(),
                to: self.graph[edge.target()].clone(),
                action_type: edge.weight().action_type,
                count: edge.weight().count,
                assets: edge.weight().assets.clone(),
            })
            .collect()
    }

    pub fn party_count(&self) -> usize {
        self.party_to_ix.len()
    }
}

/// Collapses transfer actions into flow rows.
pub fn aggregate_flows(actions: &[Action]) -> Vec<FlowRow> {
    FlowGraph::from_actions(actions).rows()
}
