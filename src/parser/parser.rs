use std::iter::Peekable;
use std::vec::IntoIter;

use super::ast::*;
use crate::encoding::Symbol;
use crate::error::{Error, Result};

const META_CHARS: [char; 16] = [
    '|', // union
    '*', // star
    '+', // plus
    '?', // option
    '^', // reserved
    '$', // reserved
    '.', // any match
    '\\', // escape
    '{', '}', // repeat brackets
    '(', ')', // group brackets
    '[', ']', // set brackets
    '-', // set range separator
    ',', // repeat range separator
];

/// Upper bound for `{n,m}` counts; bounded repeats are unrolled in the NFA.
pub const REPEAT_LIMIT: u32 = 1000;

pub struct Parser {
    stream: Peekable<IntoIter<char>>,
    position: usize,
    case_insensitive: bool,
}

impl Parser {
    pub fn parse(pattern: &str, case_insensitive: bool) -> Result<Ast> {
        let mut parser = Parser {
            stream: pattern
                .chars()
                .collect::<Vec<char>>()
                .into_iter()
                .peekable(),
            position: 0,
            case_insensitive,
        };

        let ast = parser.parse_root()?;
        match parser.stream.peek().copied() {
            Some(')') => Err(parser.error("unmatched closing parenthesis")),
            Some(c) => Err(parser.error(format!("unexpected '{}'", c))),
            None => Ok(ast),
        }
    }

    fn next(&mut self) -> Option<char> {
        let c = self.stream.next();
        if c.is_some() {
            self.position += 1;
        }
        c
    }

    fn next_if_eq(&mut self, expected: char) -> bool {
        if self.stream.next_if_eq(&expected).is_some() {
            self.position += 1;
            true
        } else {
            false
        }
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Error::syntax(self.position, message)
    }

    fn parse_root(&mut self) -> Result<Ast> {
        self.parse_union()
    }

    fn parse_union(&mut self) -> Result<Ast> {
        let mut children = vec![self.parse_branch()?];
        while self.next_if_eq('|') {
            children.push(self.parse_branch()?);
        }

        match children.len() {
            1 => Ok(children.remove(0)),
            _ => Ok(Ast {
                kind: AstKind::Alternate,
                children,
            }),
        }
    }

    fn parse_branch(&mut self) -> Result<Ast> {
        self.parse_concat()?
            .ok_or_else(|| self.error("empty expression"))
    }

    fn parse_concat(&mut self) -> Result<Option<Ast>> {
        let mut children = Vec::new();
        while let Some(ast) = self.parse_basic()? {
            children.push(ast);
        }

        match children.len() {
            0 => Ok(None),
            1 => Ok(children.pop()),
            _ => Ok(Some(Ast {
                kind: AstKind::Concat,
                children,
            })),
        }
    }

    fn parse_basic(&mut self) -> Result<Option<Ast>> {
        let mut ast = match self.parse_element()? {
            Some(ast) => ast,
            None => return Ok(None),
        };

        loop {
            let kind = match self.stream.peek().copied() {
                Some('*') => {
                    self.next();
                    AstKind::Repeat(0, RepeatKind::Infinity)
                }
                Some('+') => {
                    self.next();
                    AstKind::Repeat(1, RepeatKind::Infinity)
                }
                Some('?') => {
                    self.next();
                    AstKind::Repeat(0, RepeatKind::Num(1))
                }
                Some('{') => self.parse_repeat_kind()?,
                _ => return Ok(Some(ast)),
            };

            ast = Ast {
                kind,
                children: vec![ast],
            };
        }
    }

    fn parse_repeat_kind(&mut self) -> Result<AstKind> {
        use RepeatKind::*;

        self.next(); // consume '{'

        let start = self.parse_number()?;
        if self.next_if_eq('}') {
            let n = start.ok_or_else(|| self.error("repeat count is empty"))?;
            return Ok(AstKind::Repeat(n, Num(n)));
        }

        if !self.next_if_eq(',') {
            return match self.next() {
                Some(c) => Err(self.error(format!("repeat operator want ',', get '{}'", c))),
                None => Err(self.error("repeat operator want ',', get EoL")),
            };
        }

        let end = self.parse_number()?;
        let kind = match (start, end) {
            (None, None) => return Err(self.error("repeat count is empty")),
            (Some(n), None) => AstKind::Repeat(n, Infinity),
            (n, Some(m)) => {
                let n = n.unwrap_or(0);
                if n > m {
                    return Err(self.error(format!("out of repeat order {{{},{}}}", n, m)));
                }
                AstKind::Repeat(n, Num(m))
            }
        };

        match self.next() {
            Some('}') => Ok(kind),
            Some(c) => Err(self.error(format!("unmatched opening curly bracket, get '{}'", c))),
            None => Err(self.error("unmatched opening curly bracket, get EoL")),
        }
    }

    fn parse_element(&mut self) -> Result<Option<Ast>> {
        match self.stream.peek().copied() {
            Some('(') => self.parse_group().map(Some),
            Some('[') => self.parse_set().map(Some),
            Some('.') => {
                self.next();
                Ok(Some(literal(SymbolSet::any())))
            }
            Some('*') | Some('+') | Some('?') | Some('{') => {
                Err(self.error("nothing to repeat"))
            }
            Some('^') | Some('$') => Err(self.error("anchors are not supported")),
            Some(c @ '}') | Some(c @ ']') => {
                Err(self.error(format!("unmatched closing bracket '{}'", c)))
            }
            Some('\\') => {
                let (set, negated) = self.parse_escape()?;
                Ok(Some(literal(self.fold_negate(set, negated))))
            }
            Some('|') | Some(')') | None => Ok(None),
            Some(_) => {
                let set = match self.next() {
                    Some(c) => SymbolSet::single(c),
                    None => return Ok(None),
                };
                Ok(Some(literal(self.fold(set))))
            }
        }
    }

    fn parse_group(&mut self) -> Result<Ast> {
        self.next(); // consume '('

        let ast = self.parse_root()?;

        match self.next() {
            Some(')') => Ok(Ast {
                kind: AstKind::Group,
                children: vec![ast],
            }),
            Some(c) => Err(self.error(format!("unmatched opening parenthesis, get '{}'", c))),
            None => Err(self.error("unmatched opening parenthesis, get EoL")),
        }
    }

    fn parse_set(&mut self) -> Result<Ast> {
        self.next(); // consume '['

        let is_positive = !self.next_if_eq('^');
        let set = self.parse_set_items()?;

        match self.next() {
            Some(']') => {
                let set = match is_positive {
                    true => set,
                    false => set.negate(),
                };
                Ok(literal(set))
            }
            _ => Err(self.error("unmatched opening bracket, get EoL")),
        }
    }

    /// The case folded union of the items. Negated class escapes are kept
    /// apart so they are folded before being negated.
    fn parse_set_items(&mut self) -> Result<SymbolSet> {
        let mut set = SymbolSet::new();
        let mut negated = SymbolSet::new();
        let mut count = 0;
        while !matches!(self.stream.peek(), Some(']') | None) {
            self.parse_set_item(&mut set, &mut negated)?;
            count += 1;
        }

        match count {
            0 => Err(self.error("set items are empty")),
            _ => {
                let mut set = self.fold(set);
                set.union(&negated);
                Ok(set)
            }
        }
    }

    fn parse_set_item(&mut self, set: &mut SymbolSet, negated: &mut SymbolSet) -> Result<()> {
        let (lhs, lhs_negated) = self.parse_set_char()?;

        // a trailing '-' is taken literally
        let is_range = {
            let mut ahead = self.stream.clone();
            ahead.next() == Some('-') && !matches!(ahead.next(), Some(']') | None)
        };
        if !is_range {
            match lhs_negated {
                true => negated.union(&self.fold_negate(lhs, true)),
                false => set.union(&lhs),
            }
            return Ok(());
        }
        self.next(); // consume '-'

        let (rhs, rhs_negated) = self.parse_set_char()?;
        if lhs_negated || rhs_negated {
            return Err(self.error("class escape cannot bound a range"));
        }
        match (single(&lhs), single(&rhs)) {
            (Some(a), Some(b)) if a <= b => {
                set.insert_range(a, b);
                Ok(())
            }
            (Some(a), Some(b)) => Err(self.error(format!(
                "out of range order [{}-{}]",
                char::from_u32(a).unwrap_or_default(),
                char::from_u32(b).unwrap_or_default()
            ))),
            _ => Err(self.error("class escape cannot bound a range")),
        }
    }

    fn parse_set_char(&mut self) -> Result<(SymbolSet, bool)> {
        match self.stream.peek().copied() {
            Some('\\') => self.parse_escape(),
            Some(_) => match self.next() {
                Some(c) => Ok((SymbolSet::single(c), false)),
                None => Err(self.error("unmatched opening bracket, get EoL")),
            },
            None => Err(self.error("unmatched opening bracket, get EoL")),
        }
    }

    /// An escape as a positive set, plus whether it stands for the complement
    /// of that set (`\D`, `\W`, `\S`).
    fn parse_escape(&mut self) -> Result<(SymbolSet, bool)> {
        self.next(); // consume '\\'

        let c = match self.next() {
            Some(c) => c,
            None => return Err(self.error("escape sequence is empty")),
        };

        let set = match c {
            'n' => SymbolSet::single('\n'),
            't' => SymbolSet::single('\t'),
            'r' => SymbolSet::single('\r'),
            'f' => SymbolSet::single('\x0C'),
            'v' => SymbolSet::single('\x0B'),
            '0' => SymbolSet::single('\0'),
            'x' => {
                let hi = self.parse_hex_digit()?;
                let lo = self.parse_hex_digit()?;
                SymbolSet::range(hi * 16 + lo, hi * 16 + lo)
            }
            'd' | 'D' | 'w' | 'W' | 's' | 'S' => {
                return Ok((class_escape(c.to_ascii_lowercase()), c.is_ascii_uppercase()))
            }
            c if META_CHARS.contains(&c) => SymbolSet::single(c),
            c => return Err(self.error(format!("unsupport escape sequence: \\{}", c))),
        };
        Ok((set, false))
    }

    fn parse_hex_digit(&mut self) -> Result<Symbol> {
        match self.next().and_then(|c| c.to_digit(16)) {
            Some(d) => Ok(d),
            None => Err(self.error("\\x wants two hex digits")),
        }
    }

    fn parse_number(&mut self) -> Result<Option<u32>> {
        let mut num = String::new();
        while let Some(c) = self.stream.next_if(|c| c.is_ascii_digit()) {
            self.position += 1;
            num.push(c);
        }
        if num.is_empty() {
            return Ok(None);
        }

        match num.parse::<u32>() {
            Ok(n) if n <= REPEAT_LIMIT => Ok(Some(n)),
            _ => Err(self.error(format!(
                "repeat count {} exceeds the limit {}",
                num, REPEAT_LIMIT
            ))),
        }
    }

    fn fold(&self, mut set: SymbolSet) -> SymbolSet {
        if self.case_insensitive {
            set.fold_case();
        }
        set
    }

    // folding runs on the small positive set, never on its complement
    fn fold_negate(&self, set: SymbolSet, negated: bool) -> SymbolSet {
        let set = self.fold(set);
        match negated {
            true => set.negate(),
            false => set,
        }
    }
}

fn literal(set: SymbolSet) -> Ast {
    Ast {
        kind: AstKind::Literal(set),
        children: vec![],
    }
}

fn single(set: &SymbolSet) -> Option<Symbol> {
    match set.ranges() {
        [(a, b)] if a == b => Some(*a),
        _ => None,
    }
}

fn class_escape(c: char) -> SymbolSet {
    let mut set = SymbolSet::new();
    match c {
        'd' => set.insert_range('0' as Symbol, '9' as Symbol),
        'w' => {
            set.insert_range('0' as Symbol, '9' as Symbol);
            set.insert_range('A' as Symbol, 'Z' as Symbol);
            set.insert_range('a' as Symbol, 'z' as Symbol);
            set.insert_range('_' as Symbol, '_' as Symbol);
        }
        _ => {
            set.insert_range('\t' as Symbol, '\r' as Symbol);
            set.insert_range(' ' as Symbol, ' ' as Symbol);
        }
    }
    set
}
