use std::{
    collections::VecDeque,
    fmt::{self, Write as _},
};

use crate::{AvlTree, NodeId, SearchTree};

impl<K: fmt::Display, V> SearchTree<K, V> {
    /// Writes the shape of the tree to `w` in Graphviz `dot` format.
    ///
    /// Nodes on the same level share a rank. Missing children are drawn as points.
    pub fn dotgraph<W: fmt::Write>(&self, name: &str, w: W) -> fmt::Result {
        self.write_dotgraph(name, w, false)
    }

    pub(crate) fn write_dotgraph<W: fmt::Write>(
        &self,
        name: &str,
        mut w: W,
        show_height: bool,
    ) -> fmt::Result {
        let root = match self.root_id() {
            Some(r) => r,
            None => return write!(w, "digraph \"graph-{name}\" {{}}"),
        };

        enum Item {
            Node(NodeId),
            Missing(u32),
        }

        let mut queue = VecDeque::new();
        queue.push_back(Item::Node(root));

        write!(
            w,
            "digraph \"graph-{name}\" {{\n subgraph \"subgraph-{name}\" {{"
        )?;

        let mut missing = 0;
        let mut links = String::new();

        while !queue.is_empty() {
            write!(w, "{{rank=same; ")?;

            for item in queue.drain(..).collect::<Vec<_>>() {
                let id = match item {
                    Item::Node(id) => id,
                    Item::Missing(m) => {
                        write!(w, "\"graph{name}-missing{m}\" [shape=point]; ")?;
                        continue;
                    }
                };

                let node = self.node(id);
                let key = &node.key;
                if show_height {
                    let height = node.height;
                    write!(w, "\"graph{name}-{key}\" [label=\"{key}:{height}\"]; ")?;
                } else {
                    write!(w, "\"graph{name}-{key}\" [label=\"{key}\"]; ")?;
                }

                for child in [node.left(), node.right()] {
                    match child {
                        Some(child) => {
                            let child_key = &self.node(child).key;
                            queue.push_back(Item::Node(child));
                            writeln!(
                                links,
                                "\"graph{name}-{key}\" -> \"graph{name}-{child_key}\";"
                            )?;
                        }
                        None => {
                            queue.push_back(Item::Missing(missing));
                            writeln!(
                                links,
                                "\"graph{name}-{key}\" -> \"graph{name}-missing{missing}\";"
                            )?;
                            missing += 1;
                        }
                    }
                }
            }

            writeln!(w, "}}")?;
        }

        w.write_str(&links)?;

        w.write_str(" }\n}")
    }
}

impl<K: fmt::Display, V> AvlTree<K, V> {
    /// Writes the shape of the tree to `w` in Graphviz `dot` format, labelling each node with its
    /// key and height.
    pub fn dotgraph<W: fmt::Write>(&self, name: &str, w: W) -> fmt::Result {
        self.as_search_tree().write_dotgraph(name, w, true)
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for SearchTree<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for AvlTree<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
