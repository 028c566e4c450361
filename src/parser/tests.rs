use super::ast::*;
use super::*;
use crate::error::Error;

fn run(pattern: &str) -> Result<Ast, Error> {
    Parser::parse(pattern, false)
}

fn run_i(pattern: &str) -> Result<Ast, Error> {
    Parser::parse(pattern, true)
}

fn make1(kind: AstKind) -> Ast {
    Ast {
        kind,
        children: vec![],
    }
}

fn make2(kind: AstKind, children: Vec<Ast>) -> Ast {
    Ast { kind, children }
}

fn ch(c: char) -> Ast {
    make1(AstKind::Literal(SymbolSet::single(c)))
}

fn set(ranges: &[(char, char)]) -> Ast {
    let mut set = SymbolSet::new();
    for (a, b) in ranges {
        set.insert_range(*a as u32, *b as u32);
    }
    make1(AstKind::Literal(set))
}

fn position(result: Result<Ast, Error>) -> usize {
    match result {
        Err(Error::Syntax { position, .. }) => position,
        other => panic!("expected a syntax error, got {:?}", other),
    }
}

#[cfg(test)]
mod basic_match {
    use super::*;

    #[test]
    fn match_char() {
        let src = "abc";
        let expect = Ok(make2(AstKind::Concat, vec![ch('a'), ch('b'), ch('c')]));

        assert_eq!(run(src), expect);
    }

    #[test]
    fn match_single() {
        assert_eq!(run("a"), Ok(ch('a')));
    }

    #[test]
    fn match_metachar() {
        let src = r"a\+c";
        let expect = Ok(make2(AstKind::Concat, vec![ch('a'), ch('+'), ch('c')]));

        assert_eq!(run(src), expect);
    }

    #[test]
    fn match_any() {
        let src = "a.";
        let expect = Ok(make2(
            AstKind::Concat,
            vec![ch('a'), make1(AstKind::Literal(SymbolSet::any()))],
        ));

        assert_eq!(run(src), expect);
    }

    #[test]
    fn match_control_escapes() {
        assert_eq!(run(r"\n"), Ok(ch('\n')));
        assert_eq!(run(r"\t"), Ok(ch('\t')));
        assert_eq!(run(r"\x41"), Ok(ch('A')));
        assert_eq!(run(r"\0"), Ok(ch('\0')));
    }

    #[test]
    fn match_plain_dash_and_comma() {
        let expect = Ok(make2(AstKind::Concat, vec![ch('a'), ch('-'), ch(',')]));
        assert_eq!(run("a-,"), expect);
    }
}

#[test]
fn group() {
    let src = "a(bc)d";
    let expect = Ok(make2(
        AstKind::Concat,
        vec![
            ch('a'),
            make2(
                AstKind::Group,
                vec![make2(AstKind::Concat, vec![ch('b'), ch('c')])],
            ),
            ch('d'),
        ],
    ));

    assert_eq!(run(src), expect);
}

#[test]
fn union() {
    let src = "abc|def|g";
    let expect = Ok(make2(
        AstKind::Alternate,
        vec![
            make2(AstKind::Concat, vec![ch('a'), ch('b'), ch('c')]),
            make2(AstKind::Concat, vec![ch('d'), ch('e'), ch('f')]),
            ch('g'),
        ],
    ));

    assert_eq!(run(src), expect);
}

#[cfg(test)]
mod repeat {
    use super::*;

    #[test]
    fn star_plus_option() {
        assert_eq!(
            run("a*"),
            Ok(make2(
                AstKind::Repeat(0, RepeatKind::Infinity),
                vec![ch('a')]
            ))
        );
        assert_eq!(
            run("a+"),
            Ok(make2(
                AstKind::Repeat(1, RepeatKind::Infinity),
                vec![ch('a')]
            ))
        );
        assert_eq!(
            run("a?"),
            Ok(make2(AstKind::Repeat(0, RepeatKind::Num(1)), vec![ch('a')]))
        );
    }

    #[test]
    fn stacked() {
        let expect = Ok(make2(
            AstKind::Repeat(0, RepeatKind::Num(1)),
            vec![make2(
                AstKind::Repeat(0, RepeatKind::Infinity),
                vec![ch('a')],
            )],
        ));
        assert_eq!(run("a*?"), expect);
    }

    #[test]
    fn bounded() {
        assert_eq!(
            run("a{10}"),
            Ok(make2(
                AstKind::Repeat(10, RepeatKind::Num(10)),
                vec![ch('a')]
            ))
        );
        assert_eq!(
            run("a{1,}"),
            Ok(make2(
                AstKind::Repeat(1, RepeatKind::Infinity),
                vec![ch('a')]
            ))
        );
        assert_eq!(
            run("a{1,10}"),
            Ok(make2(
                AstKind::Repeat(1, RepeatKind::Num(10)),
                vec![ch('a')]
            ))
        );
        assert_eq!(
            run("a{,3}"),
            Ok(make2(AstKind::Repeat(0, RepeatKind::Num(3)), vec![ch('a')]))
        );
    }

    #[test]
    fn repeat_group() {
        let src = "(abc){2}";
        let expect = Ok(make2(
            AstKind::Repeat(2, RepeatKind::Num(2)),
            vec![make2(
                AstKind::Group,
                vec![make2(AstKind::Concat, vec![ch('a'), ch('b'), ch('c')])],
            )],
        ));

        assert_eq!(run(src), expect);
    }
}

#[cfg(test)]
mod sets {
    use super::*;

    #[test]
    fn include_set() {
        assert_eq!(run("[a-cx]"), Ok(set(&[('a', 'c'), ('x', 'x')])));
        assert_eq!(run("[0-9]+").map(|ast| ast.children), Ok(vec![set(&[('0', '9')])]));
    }

    #[test]
    fn exclude_set() {
        let expect = SymbolSet::range('a' as u32, 'a' as u32).negate();
        assert_eq!(run("[^a]"), Ok(make1(AstKind::Literal(expect))));
    }

    #[test]
    fn literal_dash() {
        assert_eq!(run("[a-]"), Ok(set(&[('-', '-'), ('a', 'a')])));
        assert_eq!(run("[-a]"), Ok(set(&[('-', '-'), ('a', 'a')])));
    }

    #[test]
    fn escapes_in_set() {
        assert_eq!(run(r"[\d_]"), Ok(set(&[('0', '9'), ('_', '_')])));
        assert_eq!(run(r"[\]\-]"), Ok(set(&[('-', '-'), (']', ']')])));
    }

    #[test]
    fn class_escape() {
        assert_eq!(run(r"\d"), Ok(set(&[('0', '9')])));
        assert_eq!(
            run(r"\w"),
            Ok(set(&[('0', '9'), ('A', 'Z'), ('_', '_'), ('a', 'z')]))
        );
        let expect = SymbolSet::range('0' as u32, '9' as u32).negate();
        assert_eq!(run(r"\D"), Ok(make1(AstKind::Literal(expect))));
    }
}

#[cfg(test)]
mod case_insensitive {
    use super::*;

    #[test]
    fn fold_literal() {
        assert_eq!(run_i("a"), Ok(set(&[('A', 'A'), ('a', 'a')])));
        assert_eq!(run_i("1"), Ok(ch('1')));
    }

    #[test]
    fn fold_set() {
        assert_eq!(run_i("[a-c]"), Ok(set(&[('A', 'C'), ('a', 'c')])));
    }

    #[test]
    fn fold_before_negation() {
        let ast = run_i("[^a]").unwrap();
        match ast.kind {
            AstKind::Literal(set) => {
                assert!(!set.contains('a' as u32));
                assert!(!set.contains('A' as u32));
                assert!(set.contains('b' as u32));
            }
            kind => panic!("unexpected {:?}", kind),
        }
    }

    #[test]
    fn negated_class_escape() {
        let mut word = SymbolSet::new();
        word.insert_range('0' as u32, '9' as u32);
        word.insert_range('A' as u32, 'Z' as u32);
        word.insert_range('_' as u32, '_' as u32);
        word.insert_range('a' as u32, 'z' as u32);

        assert_eq!(run_i(r"\W"), Ok(make1(AstKind::Literal(word.negate()))));
        assert_eq!(run_i(r"\W"), run(r"\W"));

        let many = r"\W\D\S".repeat(20);
        assert!(run_i(&many).is_ok());
    }

    #[test]
    fn negated_class_escape_in_set() {
        let ast = run_i(r"[\Da]").unwrap();
        match ast.kind {
            AstKind::Literal(set) => {
                assert!(set.contains('a' as u32));
                assert!(set.contains('A' as u32));
                assert!(set.contains('b' as u32));
                assert!(!set.contains('5' as u32));
            }
            kind => panic!("unexpected {:?}", kind),
        }

        assert!(run_i(r"[\W-z]").is_err());
    }
}

#[cfg(test)]
mod errors {
    use super::*;

    #[test]
    fn unbalanced_groups() {
        assert_eq!(position(run("(ab")), 3);
        assert_eq!(position(run("ab)")), 2);
        assert!(run("[ab").is_err());
    }

    #[test]
    fn empty_branches() {
        assert!(run("").is_err());
        assert!(run("a|").is_err());
        assert!(run("|a").is_err());
        assert!(run("a||b").is_err());
        assert!(run("()").is_err());
        assert!(run("[]").is_err());
    }

    #[test]
    fn repeat_bounds() {
        assert!(run("a{3,1}").is_err());
        assert!(run("a{}").is_err());
        assert!(run("a{,}").is_err());
        assert!(run("a{1").is_err());
        assert!(run("a{1;2}").is_err());
        assert!(run("a{100000}").is_err());
        assert!(run("*a").is_err());
        assert!(run("a|+").is_err());
    }

    #[test]
    fn bad_escapes() {
        assert!(run(r"\q").is_err());
        assert!(run("a\\").is_err());
        assert!(run(r"\xZZ").is_err());
        assert!(run(r"[\d-z]").is_err());
        assert!(run("[z-a]").is_err());
    }

    #[test]
    fn reserved() {
        assert!(run("^a").is_err());
        assert!(run("a$").is_err());
        assert!(run("a}").is_err());
        assert_eq!(run(r"\^\$"), Ok(make2(AstKind::Concat, vec![ch('^'), ch('$')])));
    }
}
