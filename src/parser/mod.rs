pub mod header;
mod lines;
mod scanner;

pub use lines::LineSequence;
pub use scanner::{MAX_LOOKAHEAD, Scanner, scan};
