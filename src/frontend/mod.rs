pub mod associativity;
pub mod evaluate;
pub mod parse;
pub mod unparse;
pub mod visit;
