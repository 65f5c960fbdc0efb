//! Core compiler for the FlowScript pseudocode language.
//!
//! FlowScript source is turned into flowchart markup. The pipeline is:
//!
//!   source .flow
//!     -> lexer          (tokens)
//!     -> parser         (program tree with per-parse node ids)
//!     -> codegen_boxes  (directive + one line per box)
//!     -> codegen_links  (control-flow links)
//!     -> theme          (class and link styles)
//!
//! Front-ends (the CLI, editors, etc.) should depend on this crate rather
//! than reimplementing the pipeline.

// ---------------------------------------------------------------------
// Error handling and diagnostics
// ---------------------------------------------------------------------

pub mod span;
pub mod diagnostic;
pub mod error;

// ---------------------------------------------------------------------
// Front-end: lexing and parsing
// ---------------------------------------------------------------------

pub mod chars;
pub mod lexer;
pub mod parser;
pub mod ast;

// ---------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------

pub mod options;
pub mod theme;

// ---------------------------------------------------------------------
// Back-end: generation, compiler orchestration and source loading
// ---------------------------------------------------------------------

pub mod codegen_boxes;
pub mod codegen_links;
pub mod compiler;
pub mod sources;

// ---------------------------------------------------------------------
// Public API re-exports
// ---------------------------------------------------------------------

pub use ast::{Node, Program, Shape};
pub use compiler::{CompiledSource, compile, compile_dir, render};
pub use diagnostic::Diagnostic;
pub use error::CoreError;
pub use lexer::{Token, TokenKind, tokenize};
pub use options::{CompileOptions, Direction};
pub use parser::parse;
pub use sources::{SourceFile, load_sources};
pub use theme::Theme;
