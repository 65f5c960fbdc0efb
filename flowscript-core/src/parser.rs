//! Recursive-descent parser from tokens to the program tree.
//!
//! Ids are handed out by a counter owned by the parser, so every call to
//! [`parse`] numbers its nodes from zero no matter what ran before it.

use tracing::debug;

use crate::ast::{Block, BlockKind, Condition, Expression, Node, NodeId, Program, Shape};
use crate::error::ParseError;
use crate::lexer::{Token, TokenKind};
use crate::options::CompileOptions;

/// Bracketed statement forms and the shape each one produces. Each form
/// holds exactly one `String` token carrying the label.
const SHAPED_FORMS: &[(&[TokenKind], Shape)] = &[
    (
        &[
            TokenKind::LParen,
            TokenKind::String,
            TokenKind::RParen,
            TokenKind::Semi,
        ],
        Shape::Rounded,
    ),
    (
        &[
            TokenKind::LParen,
            TokenKind::LParen,
            TokenKind::String,
            TokenKind::RParen,
            TokenKind::RParen,
            TokenKind::Semi,
        ],
        Shape::Circular,
    ),
    (
        &[
            TokenKind::ForwardSlash,
            TokenKind::String,
            TokenKind::ForwardSlash,
            TokenKind::Semi,
        ],
        Shape::Parallelogram,
    ),
    (
        &[
            TokenKind::BackwardSlash,
            TokenKind::String,
            TokenKind::BackwardSlash,
            TokenKind::Semi,
        ],
        Shape::ReverseParallelogram,
    ),
];

pub fn parse(tokens: &[Token], options: &CompileOptions) -> Result<Program, ParseError> {
    let program = Parser::new(tokens).parse_program(options)?;
    debug!(nodes = program.node_count(), "parsed program");
    Ok(program)
}

/// Next id to hand out; starts at zero for every parse.
#[derive(Debug, Default)]
struct NodeIds {
    next: NodeId,
}

impl NodeIds {
    fn fresh(&mut self) -> NodeId {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// How a run of statements ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockEnd {
    /// A `}` closing the current block was consumed.
    Closed,
    EndOfInput,
}

struct Parser<'t> {
    tokens: &'t [Token],
    index: usize,
    ids: NodeIds,
}

impl<'t> Parser<'t> {
    fn new(tokens: &'t [Token]) -> Self {
        Parser {
            tokens,
            index: 0,
            ids: NodeIds::default(),
        }
    }

    fn parse_program(mut self, options: &CompileOptions) -> Result<Program, ParseError> {
        let id = self.ids.fresh();
        let mut instructions = Vec::new();
        // A stray `}` at top level ends one run of statements; parsing
        // simply resumes after it.
        while self.peek().is_some() {
            let (nodes, _) = self.parse_statements()?;
            instructions.extend(nodes);
        }
        Ok(Program {
            id,
            direction: options.direction,
            instructions,
        })
    }

    fn parse_statements(&mut self) -> Result<(Vec<Node>, BlockEnd), ParseError> {
        let mut nodes = Vec::new();

        while let Some(token) = self.peek() {
            if self.next_matches(&[TokenKind::String]) {
                self.index += 1;
                if self.next_matches(&[TokenKind::Semi]) {
                    self.index += 1;
                }
                nodes.push(self.expression(token.text(), Shape::Square));
            } else if let Some((form, shape)) = SHAPED_FORMS
                .iter()
                .find(|(form, _)| self.next_matches(form))
            {
                let consumed = &self.tokens[self.index..self.index + form.len()];
                self.index += form.len();
                let text = consumed
                    .iter()
                    .find(|token| token.kind == TokenKind::String)
                    .map_or("", Token::text);
                nodes.push(self.expression(text, *shape));
            } else if self.next_matches(&[TokenKind::RBrace]) {
                self.index += 1;
                return Ok((nodes, BlockEnd::Closed));
            } else if self.next_matches(&[TokenKind::If]) {
                self.index += 1;
                let condition = self.parse_condition()?;
                nodes.push(Node::Condition(condition));
            } else if self.next_matches(&[TokenKind::Return, TokenKind::Semi]) {
                self.index += 2;
                nodes.push(Node::Return(self.ids.fresh()));
                let end = self.skip_rest_of_block();
                return Ok((nodes, end));
            } else if self.next_matches(&[TokenKind::Comment]) {
                self.index += 1;
            } else {
                return Err(ParseError::UnexpectedToken {
                    kind: token.kind,
                    position: token.pos,
                });
            }
        }

        Ok((nodes, BlockEnd::EndOfInput))
    }

    /// Parse the statements of a block whose `{` was already consumed,
    /// through its closing `}`.
    fn parse_block(&mut self) -> Result<Vec<Node>, ParseError> {
        match self.parse_statements()? {
            (nodes, BlockEnd::Closed) => Ok(nodes),
            (_, BlockEnd::EndOfInput) => Err(ParseError::UnexpectedEof {
                expected: TokenKind::RBrace,
            }),
        }
    }

    fn parse_condition(&mut self) -> Result<Condition, ParseError> {
        self.expect(TokenKind::LParen)?;
        let text = self.expect(TokenKind::String)?.text().to_string();
        self.expect(TokenKind::RParen)?;
        self.expect(TokenKind::LBrace)?;

        let id = self.ids.fresh();
        let mut if_block = Block::new(self.ids.fresh(), BlockKind::If);
        let mut else_block = Block::new(self.ids.fresh(), BlockKind::Else);

        if_block.instructions = self.parse_block()?;
        self.skip_comments();
        if self.next_matches(&[TokenKind::Else]) {
            self.index += 1;
            self.expect(TokenKind::LBrace)?;
            else_block.instructions = self.parse_block()?;
        }

        Ok(Condition {
            id,
            text,
            if_block,
            else_block,
        })
    }

    /// Discard everything up to and including the `}` that closes the
    /// current block. Nested blocks are skipped whole.
    fn skip_rest_of_block(&mut self) -> BlockEnd {
        let mut depth = 0usize;
        while let Some(token) = self.advance() {
            match token.kind {
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace if depth == 0 => return BlockEnd::Closed,
                TokenKind::RBrace => depth -= 1,
                _ => {}
            }
        }
        BlockEnd::EndOfInput
    }

    fn skip_comments(&mut self) {
        while self.next_matches(&[TokenKind::Comment]) {
            self.index += 1;
        }
    }

    fn expression(&mut self, text: &str, shape: Shape) -> Node {
        Node::Expression(Expression {
            id: self.ids.fresh(),
            text: text.to_string(),
            shape,
        })
    }

    /// Consume the next token if it has the expected kind.
    fn expect(&mut self, expected: TokenKind) -> Result<&'t Token, ParseError> {
        match self.peek() {
            Some(token) if token.kind == expected => {
                self.index += 1;
                Ok(token)
            }
            Some(token) => Err(ParseError::ExpectedToken {
                expected,
                found: token.kind,
                position: token.pos,
            }),
            None => Err(ParseError::UnexpectedEof { expected }),
        }
    }

    fn next_matches(&self, kinds: &[TokenKind]) -> bool {
        kinds
            .iter()
            .enumerate()
            .all(|(ahead, kind)| self.peek_at(ahead).is_some_and(|token| token.kind == *kind))
    }

    fn peek(&self) -> Option<&'t Token> {
        self.peek_at(0)
    }

    fn peek_at(&self, ahead: usize) -> Option<&'t Token> {
        self.tokens.get(self.index + ahead)
    }

    fn advance(&mut self) -> Option<&'t Token> {
        let token = self.peek()?;
        self.index += 1;
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::lexer::tokenize;
    use crate::span::Position;

    fn parse_source(source: &str) -> Result<Program, ParseError> {
        let tokens = tokenize(source).expect("tokenize");
        parse(&tokens, &CompileOptions::default())
    }

    fn program(source: &str) -> Program {
        parse_source(source).expect("parse")
    }

    fn expression(node: &Node) -> &Expression {
        match node {
            Node::Expression(expression) => expression,
            other => panic!("expected an expression, got {other:?}"),
        }
    }

    fn condition(node: &Node) -> &Condition {
        match node {
            Node::Condition(condition) => condition,
            other => panic!("expected a condition, got {other:?}"),
        }
    }

    #[test]
    fn empty_input_yields_an_empty_program() {
        let program = program("");
        assert_eq!(program.id, 0);
        assert!(program.instructions.is_empty());
    }

    #[test]
    fn appends_expressions_to_the_program() {
        let program = program("block1;block2");
        assert_eq!(program.instructions.len(), 2);
        let first = expression(&program.instructions[0]);
        assert_eq!((first.id, first.text.as_str(), first.shape), (1, "block1", Shape::Square));
        let second = expression(&program.instructions[1]);
        assert_eq!((second.id, second.text.as_str()), (2, "block2"));
    }

    #[test]
    fn recognises_every_shaped_statement() {
        let program = program(
            "\"quoted label\"; (rounded); ((circle)); /read input/; \\write output\\;",
        );
        let shapes: Vec<_> = program
            .instructions
            .iter()
            .map(|node| {
                let expression = expression(node);
                (expression.text.as_str(), expression.shape)
            })
            .collect();
        assert_eq!(
            shapes,
            vec![
                ("quoted label", Shape::Square),
                ("rounded", Shape::Rounded),
                ("circle", Shape::Circular),
                ("read input", Shape::Parallelogram),
                ("write output", Shape::ReverseParallelogram),
            ]
        );
    }

    #[test]
    fn numbers_conditions_before_their_blocks_contents() {
        let program = program("if (true) { one; } else { two; }");
        let node = condition(&program.instructions[0]);
        assert_eq!(node.id, 1);
        assert_eq!(node.text, "true");
        assert_eq!(node.if_block.id, 2);
        assert_eq!(node.if_block.kind, BlockKind::If);
        assert_eq!(node.else_block.id, 3);
        assert_eq!(node.else_block.kind, BlockKind::Else);
        assert_eq!(expression(&node.if_block.instructions[0]).id, 4);
        assert_eq!(expression(&node.else_block.instructions[0]).id, 5);
    }

    #[test]
    fn keeps_both_blocks_even_when_empty() {
        let program = program("if (x) { } after;");
        let node = condition(&program.instructions[0]);
        assert!(node.if_block.is_empty());
        assert!(node.else_block.is_empty());
        assert_eq!(expression(&program.instructions[1]).id, 4);
    }

    #[test]
    fn parses_nested_conditions() {
        let program = program("if (a) { if (b) { deep; } } else { shallow; }");
        let outer = condition(&program.instructions[0]);
        let inner = condition(&outer.if_block.instructions[0]);
        assert_eq!(inner.id, 4);
        assert_eq!(expression(&inner.if_block.instructions[0]).id, 7);
        assert_eq!(expression(&outer.else_block.instructions[0]).id, 8);
    }

    #[test]
    fn return_discards_the_rest_of_the_block() {
        let program = program("if (x) { a; return; b; if (y) { c; } } after;");
        let node = condition(&program.instructions[0]);
        assert_eq!(node.if_block.instructions.len(), 2);
        assert!(node.if_block.instructions[1].is_return());
        assert_eq!(node.if_block.instructions[1].id(), 5);
        assert_eq!(expression(&program.instructions[1]).id, 6);
    }

    #[test]
    fn top_level_return_discards_everything_after_it() {
        let program = program("one; return; two; three;");
        assert_eq!(program.instructions.len(), 2);
        assert_eq!(program.instructions[1], Node::Return(2));
    }

    #[test]
    fn skips_comments() {
        let program = program("// intro\none; /* note */ two;");
        assert_eq!(program.instructions.len(), 2);
        assert_eq!(expression(&program.instructions[1]).text, "two");
    }

    #[test]
    fn else_may_follow_a_comment() {
        let program = program("if (x) { a; } // otherwise\nelse { b; }");
        let node = condition(&program.instructions[0]);
        assert_eq!(node.else_block.instructions.len(), 1);
    }

    #[test]
    fn ignores_a_stray_closing_brace_at_top_level() {
        let program = program("a; } b;");
        assert_eq!(program.instructions.len(), 2);
    }

    #[test]
    fn numbering_restarts_for_every_parse() {
        let tokens = tokenize("one; two;").expect("tokenize");
        let first = parse(&tokens, &CompileOptions::default()).expect("first parse");
        let second = parse(&tokens, &CompileOptions::default()).expect("second parse");
        assert_eq!(first, second);
        assert_eq!(second.instructions[0].id(), 1);
    }

    #[test]
    fn records_the_configured_direction() {
        let tokens = tokenize("one;").expect("tokenize");
        let options = CompileOptions::default().with_direction(crate::options::Direction::LeftRight);
        let program = parse(&tokens, &options).expect("parse");
        assert_eq!(program.direction, crate::options::Direction::LeftRight);
    }

    #[test]
    fn rejects_unparsed_keywords() {
        let err = parse_source("while (x) {}").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedToken {
                kind: TokenKind::While,
                position: Position::new(0, 5, 1, 1),
            }
        );
        assert_eq!(err.to_string(), "I don't know what to do with this WHILE at ln: 1, col: 1");
    }

    #[test]
    fn rejects_a_return_without_semicolon() {
        let err = parse_source("return").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { kind: TokenKind::Return, .. }));
    }

    #[test]
    fn rounded_statements_need_a_semicolon() {
        let err = parse_source("(rounded)").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { kind: TokenKind::LParen, .. }));
    }

    #[test]
    fn reports_the_expected_token() {
        let err = parse_source("if x").unwrap_err();
        assert_eq!(
            err,
            ParseError::ExpectedToken {
                expected: TokenKind::LParen,
                found: TokenKind::String,
                position: Position::new(3, 1, 1, 4),
            }
        );
        assert_eq!(err.to_string(), "Expected 'L_PAREN' at pos 3 (ln: 1, col: 4).");
    }

    #[test]
    fn reports_running_out_of_tokens() {
        let err = parse_source("if (x)").unwrap_err();
        assert_eq!(err, ParseError::UnexpectedEof { expected: TokenKind::LBrace });

        let err = parse_source("if (x) { a;").unwrap_err();
        assert_eq!(err, ParseError::UnexpectedEof { expected: TokenKind::RBrace });

        let err = parse_source("if (x) { return; a;").unwrap_err();
        assert_eq!(err.to_string(), "Expected 'R_BRACE' at pos EoF.");
    }

    #[test]
    fn expect_returns_a_typed_failure() {
        let tokens = tokenize("string").expect("tokenize");
        let mut parser = Parser::new(&tokens);
        let err = parser.expect(TokenKind::LBracket).unwrap_err();
        assert_eq!(err.to_string(), "Expected 'L_BRACKET' at pos 0 (ln: 1, col: 1).");
        let token = parser.expect(TokenKind::String).expect("string token");
        assert_eq!(token.text(), "string");
        assert_eq!(
            parser.expect(TokenKind::String).unwrap_err(),
            ParseError::UnexpectedEof { expected: TokenKind::String }
        );
    }

    #[test]
    fn parse_errors_convert_into_core_errors() {
        let err: CoreError = parse_source("else { }").unwrap_err().into();
        assert!(matches!(err, CoreError::Parse(ParseError::UnexpectedToken { kind: TokenKind::Else, .. })));
    }
}
