use serde::Serialize;

/// Identity of an expression or statement within one unit.
///
/// The type service answers queries by `NodeId`. Nodes created by the
/// generator itself carry [`NodeId::SYNTHETIC`] and have no type information.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const SYNTHETIC: NodeId = NodeId(u32::MAX);

    #[inline]
    #[must_use]
    pub const fn is_synthetic(self) -> bool {
        self.0 == u32::MAX
    }
}

impl Default for NodeId {
    fn default() -> Self {
        NodeId::SYNTHETIC
    }
}
