pub mod openai_completions;

pub use openai_completions::*;
