//! Parser for scene scripts

pub mod ast;
mod grammar;
pub mod lexer;

pub use ast::*;
pub use grammar::parse;
