pub mod common;
pub mod exec;
pub mod fraction;
pub mod frontend;
pub mod ir;
pub mod report;
mod utility;
