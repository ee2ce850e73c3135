pub type NodeId = usize;

/// The tree's root always lives at this index.
pub const ROOT: NodeId = 0;

/// Edge label of a search node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Row-major cell index.
    Play(usize),
    Pass,
}

#[derive(Debug, Clone)]
pub struct SearchNode {
    /// `None` only for the root.
    pub action: Option<Action>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub visits: u32,
    /// Sum of backed-up values, from the perspective of the player who
    /// made `action`.
    pub total_value: f32,
    pub prior: f32,
}

impl SearchNode {
    pub fn mean_value(&self) -> f32 {
        if self.visits == 0 {
            0.0
        } else {
            self.total_value / self.visits as f32
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// PUCT score as seen from the parent.
    pub fn puct(&self, parent_visits: u32, exploration: f32) -> f32 {
        self.mean_value()
            + exploration * self.prior * (parent_visits as f32).sqrt() / (1.0 + self.visits as f32)
    }
}

/// Arena-backed search tree. Children own nothing; parent links are plain
/// indices, so the whole tree is dropped at once.
#[derive(Debug, Clone)]
pub struct SearchTree {
    nodes: Vec<SearchNode>,
}

impl SearchTree {
    pub fn new() -> Self {
        SearchTree {
            nodes: vec![SearchNode {
                action: None,
                parent: None,
                children: Vec::new(),
                visits: 0,
                total_value: 0.0,
                prior: 1.0,
            }],
        }
    }

    pub fn add_child(&mut self, parent: NodeId, action: Action, prior: f32) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(SearchNode {
            action: Some(action),
            parent: Some(parent),
            children: Vec::new(),
            visits: 0,
            total_value: 0.0,
            prior,
        });
        self.nodes[parent].children.push(id);
        id
    }

    pub fn node(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id]
    }

    pub fn root(&self) -> &SearchNode {
        &self.nodes[ROOT]
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Child with the highest PUCT score; the earliest child wins ties.
    pub fn select_child(&self, id: NodeId, exploration: f32) -> Option<NodeId> {
        let parent_visits = self.nodes[id].visits;
        let mut best: Option<(NodeId, f32)> = None;
        for &child in &self.nodes[id].children {
            let score = self.nodes[child].puct(parent_visits, exploration);
            if best.is_none_or(|(_, s)| score > s) {
                best = Some((child, score));
            }
        }
        best.map(|(child, _)| child)
    }

    /// Child with the most visits; the earliest child wins ties.
    pub fn most_visited_child(&self, id: NodeId) -> Option<NodeId> {
        let mut best: Option<NodeId> = None;
        for &child in &self.nodes[id].children {
            if best.is_none_or(|b| self.nodes[child].visits > self.nodes[b].visits) {
                best = Some(child);
            }
        }
        best
    }

    /// Credit `value` to `leaf` and every ancestor, flipping the sign at each
    /// level since players alternate.
    pub fn backpropagate(&mut self, leaf: NodeId, mut value: f32) {
        let mut current = Some(leaf);
        while let Some(id) = current {
            let node = &mut self.nodes[id];
            node.visits += 1;
            node.total_value += value;
            value = -value;
            current = node.parent;
        }
    }

    /// Children of `id` ordered by visits, most visited first. Equal counts
    /// keep insertion order.
    pub fn ranked_children(&self, id: NodeId) -> Vec<NodeId> {
        let mut ranked = self.nodes[id].children.clone();
        ranked.sort_by(|&a, &b| self.nodes[b].visits.cmp(&self.nodes[a].visits));
        ranked
    }
}

impl Default for SearchTree {
    fn default() -> Self {
        Self::new()
    }
}
