//! Two-click cross-link tool.
//!
//! `Idle → SourceSelected → Idle`: the user picks a source node, then a
//! target node, and the tool emits one `CreateCrossLink` mutation. Clicking
//! the source again, clicking empty canvas, or cancelling returns to idle
//! without emitting anything.

use crate::mutation::Mutation;
use mm_core::id::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkState {
    #[default]
    Idle,
    SourceSelected(NodeId),
}

#[derive(Debug, Clone, Default)]
pub struct LinkTool {
    state: LinkState,
}

impl LinkTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state != LinkState::Idle
    }

    /// Source of the link being drawn, if any.
    pub fn source(&self) -> Option<NodeId> {
        match self.state {
            LinkState::SourceSelected(source) => Some(source),
            LinkState::Idle => None,
        }
    }

    /// Enter linking mode from `source`. Restarts if already linking.
    pub fn begin(&mut self, source: NodeId) {
        log::debug!("link: source {source}");
        self.state = LinkState::SourceSelected(source);
    }

    /// Handle a click on a node. Returns the link to create when this
    /// click completes the pair.
    pub fn click_node(&mut self, id: NodeId) -> Option<Mutation> {
        let LinkState::SourceSelected(source) = self.state else {
            return None;
        };
        self.state = LinkState::Idle;
        if source == id {
            log::debug!("link: cancelled on source {id}");
            return None;
        }
        Some(Mutation::CreateCrossLink { source, target: id })
    }

    /// A click on empty canvas cancels.
    pub fn click_canvas(&mut self) {
        self.cancel();
    }

    pub fn cancel(&mut self) {
        self.state = LinkState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn two_clicks_make_a_link() {
        let (a, b) = (NodeId::intern("lk_a"), NodeId::intern("lk_b"));
        let mut tool = LinkTool::new();
        tool.begin(a);
        assert_eq!(tool.source(), Some(a));
        assert_eq!(
            tool.click_node(b),
            Some(Mutation::CreateCrossLink {
                source: a,
                target: b
            })
        );
        assert_eq!(tool.state(), LinkState::Idle);
    }

    #[test]
    fn clicking_source_again_cancels() {
        let a = NodeId::intern("lk_a");
        let mut tool = LinkTool::new();
        tool.begin(a);
        assert_eq!(tool.click_node(a), None);
        assert!(!tool.is_active());
    }

    #[test]
    fn canvas_click_cancels() {
        let mut tool = LinkTool::new();
        tool.begin(NodeId::intern("lk_a"));
        tool.click_canvas();
        assert!(!tool.is_active());
        assert_eq!(tool.click_node(NodeId::intern("lk_b")), None);
    }

    #[test]
    fn idle_clicks_do_nothing() {
        let mut tool = LinkTool::new();
        assert_eq!(tool.click_node(NodeId::intern("lk_a")), None);
        assert_eq!(tool.state(), LinkState::Idle);
    }
}
