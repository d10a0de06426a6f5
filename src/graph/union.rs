//! Recursive graph composition: base graph plus imported sub-graphs.
//!
//! Graphs live in an arena ([`GraphArena`]) backed by a petgraph
//! `DiGraph`; edges are imports and child references are index-based
//! ([`GraphId`]), so cyclic import structures are representable without
//! ownership cycles. Every traversal (find, contains, close, tree
//! rendering) carries a visited set and terminates on cycles.
//!
//! Reads over a composed graph see the union of the base and all
//! descendants' triples, deduplicated; writes always target the base.

use std::collections::HashSet;
use std::fmt::Write as _;
use std::sync::RwLock;

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::error::GraphError;
use crate::graph::{GraphPort, GraphSize};
use crate::term::{Term, Triple};

/// Index-based handle to a graph inside a [`GraphArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GraphId(NodeIndex);

impl GraphId {
    /// The raw arena index, for diagnostics.
    pub fn index(self) -> usize {
        self.0.index()
    }
}

impl std::fmt::Display for GraphId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "g{}", self.0.index())
    }
}

struct UnionNode {
    base: Box<dyn GraphPort>,
    closed: bool,
}

/// Arena of composable graphs with import edges.
///
/// All structural operations take `&self`; interior mutability follows the
/// single-writer/multi-reader model of the port layer.
pub struct GraphArena {
    nodes: RwLock<DiGraph<UnionNode, ()>>,
}

impl GraphArena {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self {
            nodes: RwLock::new(DiGraph::new()),
        }
    }

    /// Register a base graph, returning its handle.
    pub fn insert(&self, base: Box<dyn GraphPort>) -> GraphId {
        let mut nodes = self.nodes.write().expect("arena lock poisoned");
        GraphId(nodes.add_node(UnionNode {
            base,
            closed: false,
        }))
    }

    /// Declare that `parent` imports `child`. Cycles are permitted.
    pub fn add_import(&self, parent: GraphId, child: GraphId) -> Result<(), GraphError> {
        let mut nodes = self.nodes.write().expect("arena lock poisoned");
        for id in [parent, child] {
            if nodes.node_weight(id.0).is_none() {
                return Err(GraphError::Unknown { graph: id.index() });
            }
        }
        if !nodes.contains_edge(parent.0, child.0) {
            nodes.add_edge(parent.0, child.0, ());
            tracing::debug!(parent = %parent, child = %child, "import added");
        }
        Ok(())
    }

    /// Remove an import edge. No-op if absent.
    pub fn remove_import(&self, parent: GraphId, child: GraphId) -> Result<(), GraphError> {
        let mut nodes = self.nodes.write().expect("arena lock poisoned");
        for id in [parent, child] {
            if nodes.node_weight(id.0).is_none() {
                return Err(GraphError::Unknown { graph: id.index() });
            }
        }
        if let Some(edge) = nodes.find_edge(parent.0, child.0) {
            nodes.remove_edge(edge);
        }
        Ok(())
    }

    /// Direct imports of a graph.
    pub fn imports(&self, id: GraphId) -> Vec<GraphId> {
        let nodes = self.nodes.read().expect("arena lock poisoned");
        nodes
            .neighbors_directed(id.0, Direction::Outgoing)
            .map(GraphId)
            .collect()
    }

    /// Whether a graph has been closed.
    pub fn is_closed(&self, id: GraphId) -> bool {
        let nodes = self.nodes.read().expect("arena lock poisoned");
        nodes.node_weight(id.0).is_none_or(|n| n.closed)
    }

    fn ensure_open(&self, id: GraphId) -> Result<(), GraphError> {
        let nodes = self.nodes.read().expect("arena lock poisoned");
        match nodes.node_weight(id.0) {
            None => Err(GraphError::Unknown { graph: id.index() }),
            Some(n) if n.closed => Err(GraphError::Closed { graph: id.index() }),
            Some(_) => Ok(()),
        }
    }

    /// All graphs reachable from `root` (inclusive), cycle-safe.
    fn reach(nodes: &DiGraph<UnionNode, ()>, root: NodeIndex) -> HashSet<NodeIndex> {
        let mut visited = HashSet::new();
        let mut stack = vec![root];
        while let Some(ix) = stack.pop() {
            if !visited.insert(ix) {
                continue;
            }
            stack.extend(nodes.neighbors_directed(ix, Direction::Outgoing));
        }
        visited
    }

    /// Union pattern match over `root` and all its descendants.
    ///
    /// Results are deduplicated; closed descendants are skipped.
    pub fn find(
        &self,
        root: GraphId,
        s: Option<&Term>,
        p: Option<&Term>,
        o: Option<&Term>,
    ) -> Result<Vec<Triple>, GraphError> {
        self.ensure_open(root)?;
        let nodes = self.nodes.read().expect("arena lock poisoned");
        let mut seen: HashSet<Triple> = HashSet::new();
        let mut out = Vec::new();
        for ix in Self::reach(&nodes, root.0) {
            let node = &nodes[ix];
            if node.closed {
                continue;
            }
            for triple in node.base.find(s, p, o) {
                if seen.insert(triple.clone()) {
                    out.push(triple);
                }
            }
        }
        Ok(out)
    }

    /// Union containment test over `root` and all its descendants.
    pub fn contains(&self, root: GraphId, triple: &Triple) -> Result<bool, GraphError> {
        self.ensure_open(root)?;
        let nodes = self.nodes.read().expect("arena lock poisoned");
        Ok(Self::reach(&nodes, root.0)
            .into_iter()
            .any(|ix| !nodes[ix].closed && nodes[ix].base.contains(triple)))
    }

    /// Whether the triple is asserted in `root`'s own base (not imported).
    pub fn contains_local(&self, root: GraphId, triple: &Triple) -> Result<bool, GraphError> {
        self.ensure_open(root)?;
        let nodes = self.nodes.read().expect("arena lock poisoned");
        Ok(nodes[root.0].base.contains(triple))
    }

    /// Add a triple to `root`'s base graph only.
    pub fn add(&self, root: GraphId, triple: Triple) -> Result<bool, GraphError> {
        self.ensure_open(root)?;
        let nodes = self.nodes.read().expect("arena lock poisoned");
        nodes[root.0].base.add(triple)
    }

    /// Remove a triple from `root`'s base graph only.
    pub fn remove(&self, root: GraphId, triple: &Triple) -> Result<bool, GraphError> {
        self.ensure_open(root)?;
        let nodes = self.nodes.read().expect("arena lock poisoned");
        nodes[root.0].base.remove(triple)
    }

    /// Effective size of the composed graph.
    ///
    /// Exact when there are no imports and the base is sized; otherwise
    /// computed by deduplicating the union, or reported unbounded when any
    /// reachable base is.
    pub fn size(&self, root: GraphId) -> Result<GraphSize, GraphError> {
        self.ensure_open(root)?;
        {
            let nodes = self.nodes.read().expect("arena lock poisoned");
            let reach = Self::reach(&nodes, root.0);
            if reach.len() == 1 {
                return Ok(nodes[root.0].base.size());
            }
            if reach
                .iter()
                .any(|&ix| !nodes[ix].closed && !nodes[ix].base.is_sized())
            {
                return Ok(GraphSize::Unbounded);
            }
        }
        Ok(GraphSize::Bounded(self.find(root, None, None, None)?.len()))
    }

    /// Close `root` and every descendant reachable only through it.
    ///
    /// Descendants also reachable from some open graph outside the closed
    /// region stay open.
    pub fn close(&self, root: GraphId) -> Result<(), GraphError> {
        let mut nodes = self.nodes.write().expect("arena lock poisoned");
        if nodes.node_weight(root.0).is_none() {
            return Err(GraphError::Unknown { graph: root.index() });
        }
        let region = Self::reach(&nodes, root.0);
        // Everything an open outside graph can still reach must survive.
        let mut survivors: HashSet<NodeIndex> = HashSet::new();
        for ix in nodes.node_indices() {
            if region.contains(&ix) || nodes[ix].closed {
                continue;
            }
            survivors.extend(Self::reach(&nodes, ix));
        }
        for ix in region {
            if ix == root.0 || !survivors.contains(&ix) {
                nodes[ix].closed = true;
                tracing::debug!(graph = ix.index(), "graph closed");
            }
        }
        Ok(())
    }

    /// Render the import hierarchy as an indented tree.
    ///
    /// Revisited graphs are annotated and not expanded again, so cyclic
    /// imports print finitely.
    pub fn import_tree(&self, root: GraphId) -> Result<String, GraphError> {
        let nodes = self.nodes.read().expect("arena lock poisoned");
        if nodes.node_weight(root.0).is_none() {
            return Err(GraphError::Unknown { graph: root.index() });
        }
        let mut out = String::new();
        let mut path = HashSet::new();
        Self::render(&nodes, root.0, 0, &mut path, &mut out);
        Ok(out)
    }

    fn render(
        nodes: &DiGraph<UnionNode, ()>,
        ix: NodeIndex,
        depth: usize,
        path: &mut HashSet<NodeIndex>,
        out: &mut String,
    ) {
        let node = &nodes[ix];
        let _ = write!(out, "{}{} [g{}]", "  ".repeat(depth), node.base.name(), ix.index());
        if node.closed {
            out.push_str(" (closed)");
        }
        if !path.insert(ix) {
            out.push_str(" (cycle)\n");
            return;
        }
        out.push('\n');
        let mut children: Vec<_> = nodes.neighbors_directed(ix, Direction::Outgoing).collect();
        children.sort();
        for child in children {
            Self::render(nodes, child, depth + 1, path, out);
        }
        path.remove(&ix);
    }
}

impl Default for GraphArena {
    fn default() -> Self {
        Self::new()
    }
}

/// Borrowed read/write surface over one composed graph.
///
/// This is what factories, the classifier, lists and statements operate
/// on: union reads, base-only writes, no closed-graph bookkeeping (the
/// model checks that at its entry points).
#[derive(Clone, Copy)]
pub struct UnionView<'a> {
    arena: &'a GraphArena,
    root: GraphId,
}

impl<'a> UnionView<'a> {
    /// Create a view over `root` in `arena`.
    pub fn new(arena: &'a GraphArena, root: GraphId) -> Self {
        Self { arena, root }
    }

    /// The composed graph this view reads.
    pub fn root(&self) -> GraphId {
        self.root
    }

    /// Union pattern match. Closed graphs read as empty.
    pub fn find(&self, s: Option<&Term>, p: Option<&Term>, o: Option<&Term>) -> Vec<Triple> {
        self.arena.find(self.root, s, p, o).unwrap_or_default()
    }

    /// Union containment test.
    pub fn contains(&self, triple: &Triple) -> bool {
        self.arena.contains(self.root, triple).unwrap_or(false)
    }

    /// Whether (s, p, o) is asserted anywhere in the union.
    pub fn has(&self, s: &Term, p: &Term, o: &Term) -> bool {
        self.contains(&Triple::new(s.clone(), p.clone(), o.clone()))
    }

    /// All objects of (s, p, ?).
    pub fn objects(&self, s: &Term, p: &Term) -> Vec<Term> {
        self.find(Some(s), Some(p), None)
            .into_iter()
            .map(|t| t.object)
            .collect()
    }

    /// All subjects of (?, p, o).
    pub fn subjects(&self, p: &Term, o: &Term) -> Vec<Term> {
        self.find(None, Some(p), Some(o))
            .into_iter()
            .map(|t| t.subject)
            .collect()
    }

    /// The unique object of (s, p, ?), if exactly one exists.
    pub fn object(&self, s: &Term, p: &Term) -> Option<Term> {
        let mut objects = self.objects(s, p);
        if objects.len() == 1 { objects.pop() } else { None }
    }

    /// Add a triple to the base graph.
    pub fn add(&self, triple: Triple) -> Result<bool, GraphError> {
        self.arena.add(self.root, triple)
    }

    /// Remove a triple from the base graph.
    pub fn remove(&self, triple: &Triple) -> Result<bool, GraphError> {
        self.arena.remove(self.root, triple)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::MemGraph;

    fn t(s: &str, o: &str) -> Triple {
        Triple::new(Term::iri(s), Term::iri("urn:p"), Term::iri(o))
    }

    fn arena_abc() -> (GraphArena, GraphId, GraphId, GraphId) {
        let arena = GraphArena::new();
        let a = arena.insert(Box::new(MemGraph::named("a")));
        let b = arena.insert(Box::new(MemGraph::named("b")));
        let c = arena.insert(Box::new(MemGraph::named("c")));
        arena.add(a, t("urn:a", "urn:1")).unwrap();
        arena.add(b, t("urn:b", "urn:2")).unwrap();
        arena.add(c, t("urn:c", "urn:3")).unwrap();
        (arena, a, b, c)
    }

    #[test]
    fn union_reads_base_writes() {
        let (arena, a, b, _c) = arena_abc();
        arena.add_import(a, b).unwrap();

        assert_eq!(arena.find(a, None, None, None).unwrap().len(), 2);
        assert!(arena.contains(a, &t("urn:b", "urn:2")).unwrap());
        // Imported triples are not local.
        assert!(!arena.contains_local(a, &t("urn:b", "urn:2")).unwrap());
        // Writes land in the base only.
        arena.add(a, t("urn:a", "urn:new")).unwrap();
        assert!(!arena.contains(b, &t("urn:a", "urn:new")).unwrap());
    }

    #[test]
    fn cyclic_imports_terminate_and_deduplicate() {
        let (arena, a, b, c) = arena_abc();
        arena.add_import(a, b).unwrap();
        arena.add_import(b, c).unwrap();
        arena.add_import(c, a).unwrap();

        // Shared triple asserted in two graphs appears once.
        arena.add(c, t("urn:a", "urn:1")).unwrap();
        let found = arena.find(a, None, None, None).unwrap();
        assert_eq!(found.len(), 3);

        let tree = arena.import_tree(a).unwrap();
        assert!(tree.contains("(cycle)"));
    }

    #[test]
    fn close_spares_shared_descendants() {
        let (arena, a, b, c) = arena_abc();
        arena.add_import(a, b).unwrap();
        arena.add_import(c, b).unwrap();

        arena.close(a).unwrap();
        assert!(arena.is_closed(a));
        // b is still reachable from open c.
        assert!(!arena.is_closed(b));
        assert!(arena.find(c, None, None, None).unwrap().len() == 2);
        assert!(matches!(
            arena.find(a, None, None, None),
            Err(GraphError::Closed { .. })
        ));
    }

    #[test]
    fn close_takes_exclusive_descendants() {
        let (arena, a, b, _c) = arena_abc();
        arena.add_import(a, b).unwrap();
        arena.close(a).unwrap();
        assert!(arena.is_closed(b));
    }
}
