mod classify;
mod completions;
mod parse_header;
mod replay;

pub use classify::run_classify;
pub use completions::run_completions;
pub use parse_header::run_parse_header;
pub use replay::run_replay;
