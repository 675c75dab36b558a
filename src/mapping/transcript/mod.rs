pub mod openai_completions;
