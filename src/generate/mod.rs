mod docstring;
mod output;
mod rewriter;

pub use docstring::{DOCSTRING_QUOTE, INDENT_UNIT, indent_level, render_block};
pub use output::{Insertion, Output};
pub use rewriter::{RewriteResult, rewrite};
