// syntax (like BNF)
//
// root      = union
// union     = concat ( '|' concat ) *
// concat    = basic +
// basic     = element ( '*' | '+' | '?' | '{' repeat '}' ) *
// repeat    = number | number ',' | number ',' number | ',' number
// element   = '(' group ')' | '[' set ']' | '.' | escape | char
// group     = root
// set       = '^' ? set-items
// set-items = set-item +
// set-item  = set-char ( '-' set-char ) ?
// escape    = '\' ( meta | 'n' | 't' | 'r' | 'f' | 'v' | '0' | 'x' hex hex
//                 | 'd' | 'D' | 'w' | 'W' | 's' | 'S' )

pub mod ast;
mod parser;

pub use ast::{Ast, AstKind, RepeatKind, SymbolSet};
pub use parser::{Parser, REPEAT_LIMIT};

#[cfg(test)]
mod tests;
