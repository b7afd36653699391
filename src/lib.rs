#![forbid(unsafe_code)]

pub mod hart;
pub mod instr;
pub mod utils;
