pub mod agents;
pub mod llm;
pub mod parsing;
pub mod report;
pub mod utils;
