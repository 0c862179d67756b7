//! Line-oriented command language.
//!
//! Each input line holds one command. The keyword and file name are split
//! on whitespace; for INSERT, UPDATE and SNAPSHOT the rest of the line is
//! taken verbatim as the payload.

mod ast;
mod error;
mod parser;

pub use ast::{Command, USAGE};
pub use error::{ParseError, ParseResult};
pub use parser::Parser;
