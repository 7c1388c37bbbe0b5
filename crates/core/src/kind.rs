//! The fixed enumeration of atom kinds.
//!
//! There is no schema or type hierarchy beyond this enumeration — no
//! subtyping, no user-defined kinds beyond `Custom`.

/// The kind of an atom: a node-like concept or a link-like relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AtomKind {
    /// A named concept node.
    Concept,
    /// A named predicate node.
    Predicate,
    /// A generic link (non-empty outgoing set).
    Link,
    /// A generic, unnamed-or-named node.
    Node,
    /// A variable placeholder used in pattern templates.
    Variable,
    /// A link evaluating a predicate over an argument list.
    Evaluation,
    /// A link representing procedure execution.
    Execution,
    /// An escape hatch for kinds outside the fixed enumeration.
    Custom,
}

impl AtomKind {
    /// Nodes never have an outgoing set; links do (possibly empty, per
    /// the data model, though in practice a link created via
    /// `create_link` with zero targets is legal but unusual).
    pub fn is_node_like(self) -> bool {
        !matches!(
            self,
            AtomKind::Link | AtomKind::Evaluation | AtomKind::Execution
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_like_classification() {
        assert!(AtomKind::Concept.is_node_like());
        assert!(AtomKind::Predicate.is_node_like());
        assert!(AtomKind::Node.is_node_like());
        assert!(AtomKind::Variable.is_node_like());
        assert!(AtomKind::Custom.is_node_like());
        assert!(!AtomKind::Link.is_node_like());
        assert!(!AtomKind::Evaluation.is_node_like());
        assert!(!AtomKind::Execution.is_node_like());
    }
}
