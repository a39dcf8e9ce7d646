pub mod extract;
pub mod literal;
pub mod score;
