mod comments;
mod consistency;
mod engine;
mod inspect;
mod logging;
mod markdown;
mod notebook;
mod rules;
mod scan;
mod vocabulary;

pub use comments::rewrite_code_lines;
pub use consistency::{
    apply_consistency_pass, ConsistencyReport, MODEL_OVERVIEW, PRIMARY_HEADING_OVERVIEW,
};
pub use engine::{NotebookRewriter, RewriteReport};
pub use inspect::{render_cell, render_notebook, MARKDOWN_SNIPPET_CHARS, MAX_COMMENT_LINES};
pub use logging::init_logging;
pub use markdown::{rewrite_markdown, strip_challenge_prompts, strip_emoji};
pub use notebook::{Cell, CellKind, Notebook, NotebookError};
pub use rules::{replace_section, CellPredicate, RewriteRule, MARKDOWN_RULES};
pub use scan::first_match;
pub use vocabulary::strip_forbidden_vocabulary;
