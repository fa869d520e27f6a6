//! Iterative Tarjan strongly-connected-component decomposition.
//!
//! **Not part of the public API.**

use perron_graph::FrozenGraph;

const UNVISITED: usize = usize::MAX;

/// SCC decomposition of a frozen graph.
#[derive(Debug)]
pub(crate) struct SccResult {
    /// Component id per node. Components are numbered in pop order, so a
    /// component only has edges into lower-numbered components.
    pub(crate) comp_of: Vec<usize>,
    pub(crate) num_comps: usize,
    /// True for components with no edge leaving the component.
    pub(crate) terminal: Vec<bool>,
}

/// Runs Tarjan's algorithm with an explicit frame stack, O(V + E).
pub(crate) fn decompose(graph: &FrozenGraph) -> SccResult {
    let n = graph.num_nodes();
    let mut index = vec![UNVISITED; n];
    let mut low = vec![0usize; n];
    let mut on_stack = vec![false; n];
    let mut comp_of = vec![UNVISITED; n];
    let mut stack: Vec<usize> = Vec::new();
    let mut counter = 0usize;
    let mut num_comps = 0usize;

    // (node, next outgoing edge offset to examine)
    let mut frames: Vec<(usize, usize)> = Vec::new();

    for root in 0..n {
        if index[root] != UNVISITED {
            continue;
        }
        index[root] = counter;
        low[root] = counter;
        counter += 1;
        stack.push(root);
        on_stack[root] = true;
        frames.push((root, 0));

        while let Some(top) = frames.last_mut() {
            let v = top.0;
            let i = top.1;
            top.1 += 1;
            let (cols, _) = graph.row(v);
            if i < cols.len() {
                let w = cols[i];
                if index[w] == UNVISITED {
                    index[w] = counter;
                    low[w] = counter;
                    counter += 1;
                    stack.push(w);
                    on_stack[w] = true;
                    frames.push((w, 0));
                } else if on_stack[w] {
                    low[v] = low[v].min(index[w]);
                }
            } else {
                frames.pop();
                if let Some(&(parent, _)) = frames.last() {
                    low[parent] = low[parent].min(low[v]);
                }
                if low[v] == index[v] {
                    loop {
                        let w = stack.pop().expect("tarjan stack underflow");
                        on_stack[w] = false;
                        comp_of[w] = num_comps;
                        if w == v {
                            break;
                        }
                    }
                    num_comps += 1;
                }
            }
        }
    }

    let mut terminal = vec![true; num_comps];
    for edge in graph.edges() {
        if comp_of[edge.from] != comp_of[edge.to] {
            terminal[comp_of[edge.from]] = false;
        }
    }

    SccResult {
        comp_of,
        num_comps,
        terminal,
    }
}
