//! Box pass: the direction directive followed by one line per box.
//!
//! Traversal is pre-order. A condition writes its decision box before the
//! boxes of its if-block, then its else-block. Block containers and
//! returns write nothing.

use core::fmt::Write as _;

use crate::ast::{Condition, Expression, Node, NodeId, Program, Shape};
use crate::theme::Theme;

/// Output of the box pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Boxes {
    /// Directive line plus every box line, newline-terminated.
    pub text: String,
    /// Shapes in the order they first appear.
    pub shapes: Vec<Shape>,
    /// Number of boxes written.
    pub count: usize,
}

pub fn generate_boxes(program: &Program, theme: Theme) -> Boxes {
    let mut emitter = BoxEmitter {
        theme,
        out: Boxes::default(),
    };
    emitter.directive(program);
    emitter.nodes(&program.instructions);
    emitter.out
}

struct BoxEmitter {
    theme: Theme,
    out: Boxes,
}

impl BoxEmitter {
    fn directive(&mut self, program: &Program) {
        let _ = writeln!(self.out.text, "flowchart {};", program.direction);
    }

    fn nodes(&mut self, nodes: &[Node]) {
        for node in nodes {
            match node {
                Node::Expression(expression) => self.expression(expression),
                Node::Condition(condition) => self.condition(condition),
                Node::Return(_) => {}
            }
        }
    }

    fn expression(&mut self, expression: &Expression) {
        self.write_box(expression.id, &expression.text, expression.shape);
    }

    fn condition(&mut self, condition: &Condition) {
        self.write_box(condition.id, &condition.text, Shape::Condition);
        self.nodes(&condition.if_block.instructions);
        self.nodes(&condition.else_block.instructions);
    }

    fn write_box(&mut self, id: NodeId, text: &str, shape: Shape) {
        let (open, close) = shape.brackets();
        let _ = writeln!(
            self.out.text,
            "  {id}{open}\"{text}\"{close}{}",
            self.theme.class_suffix(shape)
        );
        self.out.count += 1;
        if !self.out.shapes.contains(&shape) {
            self.out.shapes.push(shape);
        }
    }
}
