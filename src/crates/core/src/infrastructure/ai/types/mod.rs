pub mod deepseek;
pub mod gemini;
pub mod openai;
pub mod unified;
