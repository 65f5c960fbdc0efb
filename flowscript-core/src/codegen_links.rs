//! Edge pass: control-flow links between boxes.
//!
//! Each block is walked on its own. A node links from its previous
//! sibling; a condition additionally links to the head of each branch and,
//! when it has no else-branch, to the node following it. Returns neither
//! start nor end a link. Every link line is written at most once, in the
//! position of its first emission.

use std::collections::HashSet;

use crate::ast::{Condition, Node, NodeId, Program};
use crate::options::CompileOptions;

/// Output of the edge pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Links {
    /// Edge lines, newline-terminated.
    pub text: String,
    pub count: usize,
}

pub fn generate_links(program: &Program, options: &CompileOptions) -> Links {
    let mut generator = LinkGenerator::new(options);
    generator.generate(program);
    generator.finish()
}

#[derive(Debug)]
pub struct LinkGenerator<'o> {
    true_label: &'o str,
    false_label: &'o str,
    lines: Vec<String>,
    seen: HashSet<String>,
}

impl<'o> LinkGenerator<'o> {
    pub fn new(options: &'o CompileOptions) -> Self {
        LinkGenerator {
            true_label: options.true_label(),
            false_label: options.false_label(),
            lines: Vec::new(),
            seen: HashSet::new(),
        }
    }

    pub fn generate(&mut self, program: &Program) {
        self.block(&program.instructions);
    }

    /// Record `from-->to`, with `|label|` in between when given.
    ///
    /// Empty endpoints are ignored, as is a line already recorded.
    pub fn add_link(&mut self, from: &str, to: &str, label: Option<&str>) {
        if from.is_empty() || to.is_empty() {
            return;
        }
        let line = match label {
            Some(label) => format!("  {from}-->|{label}|{to}\n"),
            None => format!("  {from}-->{to}\n"),
        };
        if self.seen.insert(line.clone()) {
            self.lines.push(line);
        }
    }

    pub fn finish(self) -> Links {
        Links {
            count: self.lines.len(),
            text: self.lines.concat(),
        }
    }

    fn block(&mut self, nodes: &[Node]) {
        for (index, node) in nodes.iter().enumerate() {
            if node.is_return() {
                continue;
            }
            let to = node.id().to_string();
            match index.checked_sub(1).map(|previous| &nodes[previous]) {
                Some(Node::Expression(previous)) => {
                    self.add_link(&previous.id.to_string(), &to, None);
                }
                Some(Node::Condition(previous)) => {
                    self.add_link(&join_ids(&previous.terminal_ids()), &to, None);
                }
                Some(Node::Return(_)) | None => {}
            }
            if let Node::Condition(condition) = node {
                self.condition(condition, nodes.get(index + 1));
            }
        }
    }

    fn condition(&mut self, condition: &Condition, following: Option<&Node>) {
        let id = condition.id.to_string();

        if let Some(first) = branch_head(condition.if_block.first()) {
            self.add_link(&id, &first.to_string(), Some(self.true_label));
        }
        self.block(&condition.if_block.instructions);

        if !condition.else_block.is_empty() {
            if let Some(first) = branch_head(condition.else_block.first()) {
                self.add_link(&id, &first.to_string(), Some(self.false_label));
            }
            self.block(&condition.else_block.instructions);
            return;
        }

        let Some(next) = branch_head(following) else {
            return;
        };
        let next = next.to_string();
        if let Some(last) = branch_head(condition.if_block.last()) {
            self.add_link(&last.to_string(), &next, None);
        }
        self.add_link(&id, &next, Some(self.false_label));
    }
}

/// Id of `node` when it can receive a link.
fn branch_head(node: Option<&Node>) -> Option<NodeId> {
    node.filter(|node| !node.is_return()).map(Node::id)
}

fn join_ids(ids: &[NodeId]) -> String {
    ids.iter()
        .map(NodeId::to_string)
        .collect::<Vec<_>>()
        .join(" & ")
}
