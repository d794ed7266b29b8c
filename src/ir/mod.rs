pub mod semantics;
pub mod syntax;
