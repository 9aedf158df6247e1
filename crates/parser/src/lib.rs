pub mod format;
pub mod lexer;
pub mod parser;

pub use format::{format_script, is_formatted};
pub use lexer::{tokenize, tokenize_with_text, Token, TokenKind};
pub use parser::{parse_command, parse_script, ParseError};
