//! Parsed program tree.
//!
//! The tree is built once by the parser and only read afterwards. Every
//! node carries the id the parser assigned to it; ids double as the box
//! names in the generated flowchart.

use core::fmt;

use crate::options::Direction;

pub type NodeId = u32;

/// Visual bracket style of a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    Square,
    Rounded,
    Circular,
    Parallelogram,
    ReverseParallelogram,
    Condition,
}

impl Shape {
    /// Opening and closing bracket of the box in flowchart markup.
    pub fn brackets(self) -> (&'static str, &'static str) {
        match self {
            Shape::Square => ("[", "]"),
            Shape::Rounded => ("(", ")"),
            Shape::Circular => ("((", "))"),
            Shape::Parallelogram => ("[/", "/]"),
            Shape::ReverseParallelogram => ("[\\", "\\]"),
            Shape::Condition => ("{", "}"),
        }
    }

    /// Name used for the shape's style class.
    pub fn name(self) -> &'static str {
        match self {
            Shape::Square => "square",
            Shape::Rounded => "rounded",
            Shape::Circular => "circular",
            Shape::Parallelogram => "parallelogram",
            Shape::ReverseParallelogram => "reverse_parallelogram",
            Shape::Condition => "condition",
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Root of a parsed program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub id: NodeId,
    pub direction: Direction,
    pub instructions: Vec<Node>,
}

impl Program {
    /// Number of nodes in the tree, the root and block containers included.
    pub fn node_count(&self) -> usize {
        1 + count_nodes(&self.instructions)
    }
}

fn count_nodes(nodes: &[Node]) -> usize {
    nodes
        .iter()
        .map(|node| match node {
            Node::Condition(condition) => {
                3 + count_nodes(&condition.if_block.instructions)
                    + count_nodes(&condition.else_block.instructions)
            }
            Node::Expression(_) | Node::Return(_) => 1,
        })
        .sum()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Expression(Expression),
    Condition(Condition),
    /// Ends the enclosing block. Carries only its id; there is nowhere to
    /// put instructions after a return.
    Return(NodeId),
}

impl Node {
    pub fn id(&self) -> NodeId {
        match self {
            Node::Expression(expression) => expression.id,
            Node::Condition(condition) => condition.id,
            Node::Return(id) => *id,
        }
    }

    pub fn is_return(&self) -> bool {
        matches!(self, Node::Return(_))
    }
}

/// A single box: one statement of the program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    pub id: NodeId,
    pub text: String,
    pub shape: Shape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    If,
    Else,
}

/// Grouping container for the statements of one branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub id: NodeId,
    pub kind: BlockKind,
    pub instructions: Vec<Node>,
}

impl Block {
    pub fn new(id: NodeId, kind: BlockKind) -> Self {
        Block {
            id,
            kind,
            instructions: Vec::new(),
        }
    }

    pub fn first(&self) -> Option<&Node> {
        self.instructions.first()
    }

    pub fn last(&self) -> Option<&Node> {
        self.instructions.last()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Ids through which control leaves this block.
    ///
    /// A trailing condition contributes its own terminals, a trailing return
    /// contributes nothing, anything else contributes itself.
    fn terminal_ids(&self, ids: &mut Vec<NodeId>) {
        match self.last() {
            Some(Node::Condition(condition)) => condition.collect_terminal_ids(ids),
            Some(Node::Expression(expression)) => ids.push(expression.id),
            Some(Node::Return(_)) | None => {}
        }
    }
}

/// An `if (...) { } else { }` decision.
///
/// Both blocks always exist; an `if` without `else` has an empty else
/// block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub id: NodeId,
    pub text: String,
    pub if_block: Block,
    pub else_block: Block,
}

impl Condition {
    /// Ids of the nodes at which control exits this condition, if-branch
    /// first, flattening nested conditions at the end of either branch.
    pub fn terminal_ids(&self) -> Vec<NodeId> {
        let mut ids = Vec::new();
        self.collect_terminal_ids(&mut ids);
        ids
    }

    fn collect_terminal_ids(&self, ids: &mut Vec<NodeId>) {
        self.if_block.terminal_ids(ids);
        self.else_block.terminal_ids(ids);
    }
}
