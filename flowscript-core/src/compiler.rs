use std::path::{Path, PathBuf};

use tracing::debug;

use crate::ast::Program;
use crate::codegen_boxes::generate_boxes;
use crate::codegen_links::generate_links;
use crate::error::CoreError;
use crate::lexer::tokenize;
use crate::options::CompileOptions;
use crate::parser::parse;
use crate::sources::load_sources;

/// Flowchart compiled from one file of a source directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledSource {
    /// Path of the source, relative to the directory that was compiled.
    pub path: PathBuf,
    pub flowchart: String,
}

/// Compile FlowScript source text into flowchart markup.
///
/// The first lex or parse failure aborts the compile; no partial output is
/// produced.
pub fn compile(source: &str, options: &CompileOptions) -> Result<String, CoreError> {
    let tokens = tokenize(source)?;
    debug!(tokens = tokens.len(), "tokenized source");
    let program = parse(&tokens, options)?;
    Ok(render(&program, options))
}

/// Render an already parsed program: directive, boxes, links, then styles.
pub fn render(program: &Program, options: &CompileOptions) -> String {
    let boxes = generate_boxes(program, options.theme);
    let links = generate_links(program, options);
    debug!(
        boxes = boxes.count,
        links = links.count,
        theme = %options.theme,
        "rendered flowchart"
    );

    let mut out = boxes.text;
    out.push_str(&links.text);
    for shape in &boxes.shapes {
        if let Some(class_def) = options.theme.class_def(*shape) {
            out.push_str(&class_def);
        }
    }
    if links.count > 0 {
        if let Some(link_style) = options.theme.link_style() {
            out.push_str(&link_style);
        }
    }
    out
}

/// Compile every source file below `root`.
///
/// The first failure aborts the whole directory and names the file it
/// came from.
pub fn compile_dir(
    root: impl AsRef<Path>,
    options: &CompileOptions,
) -> Result<Vec<CompiledSource>, CoreError> {
    let sources = load_sources(root)?;
    debug!(files = sources.len(), "compiling source directory");

    sources
        .into_iter()
        .map(|source| {
            let flowchart =
                compile(&source.contents, options).map_err(|error| CoreError::InSource {
                    path: source.path.clone(),
                    error: Box::new(error),
                })?;
            Ok(CompiledSource {
                path: source.path,
                flowchart,
            })
        })
        .collect()
}
