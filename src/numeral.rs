// A language as a positional numeral system.
//
// Strings are ordered shortlex: by length first, then symbol by symbol. The
// strings of length n starting in state q form a block of counts[n][q]
// values, and the block of state q splits into one sub-block per outgoing
// symbol in ascending order. Each position is therefore a digit whose radix
// depends on the state and the remaining length, and rank/unrank are digit
// accumulation and digit extraction in that mixed radix.

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::Zero;

use crate::count::CountTable;
use crate::encoding::Symbol;
use crate::error::{Error, Result};
use crate::sfa::Dfa;

/// 0-based position of `symbols` among the accepted strings.
pub fn rank(dfa: &Dfa, counts: &CountTable, symbols: &[Symbol]) -> Result<BigUint> {
    if !dfa.accept(symbols) {
        return Err(Error::NotAccepted);
    }

    let length = symbols.len();
    let table = counts.table(length)?;
    let mut value = table.amount(length).clone();

    let mut state = dfa.start();
    for (i, symbol) in symbols.iter().enumerate() {
        let remaining = length - i - 1;
        let chosen = dfa.class_of(*symbol).ok_or(Error::NotAccepted)?;

        for class in 0..=chosen {
            let next = match dfa.next(state, class) {
                Some(next) => next,
                None => continue,
            };
            let block = table.count(remaining, next);
            if block.is_zero() {
                continue;
            }
            // symbols of the chosen class below the current one
            let preceding = match class == chosen {
                true => (*symbol - dfa.classes()[class].0) as u64,
                false => dfa.weight(class),
            };
            value += block * preceding;
        }

        state = dfa.next(state, chosen).ok_or(Error::NotAccepted)?;
    }

    Ok(value)
}

/// The accepted string at position `value`.
pub fn unrank(dfa: &Dfa, counts: &CountTable, value: &BigUint) -> Result<Vec<Symbol>> {
    let length = counts.length_of(value)?;
    let table = counts.table(length)?;
    let mut value = value - table.amount(length);

    let mut symbols = Vec::with_capacity(length);
    let mut state = dfa.start();
    for i in 0..length {
        let remaining = length - i - 1;

        let mut found = None;
        for class in 0..dfa.classes().len() {
            let next = match dfa.next(state, class) {
                Some(next) => next,
                None => continue,
            };
            let block = table.count(remaining, next);
            if block.is_zero() {
                continue;
            }
            let span = block * dfa.weight(class);
            if value < span {
                let (digit, rest) = value.div_rem(block);
                let digit = u32::try_from(digit).map_err(|_| Error::ValueOutOfRange)?;
                found = Some((dfa.classes()[class].0 + digit, next));
                value = rest;
                break;
            }
            value -= span;
        }

        let (symbol, next) = found.ok_or(Error::ValueOutOfRange)?;
        symbols.push(symbol);
        state = next;
    }

    match dfa.is_accepting(state) {
        true => Ok(symbols),
        false => Err(Error::ValueOutOfRange),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::Encoding;
    use crate::sfa::Nfa;

    fn build(pattern: &str) -> (Dfa, CountTable) {
        let dfa = Dfa::compile(&Nfa::new(pattern, Encoding::Ascii, false).unwrap(), true);
        let counts = CountTable::new(&dfa, 1000);
        (dfa, counts)
    }

    fn symbols(text: &str) -> Vec<Symbol> {
        text.bytes().map(Symbol::from).collect()
    }

    fn rank_of(pattern: &str, text: &str) -> Result<BigUint> {
        let (dfa, counts) = build(pattern);
        rank(&dfa, &counts, &symbols(text))
    }

    #[test]
    fn decimal() {
        // the numbering of "0|[1-9][0-9]*" is the usual value of the numeral
        let (dfa, counts) = build("0|[1-9][0-9]*");
        for n in [0u64, 7, 10, 42, 99, 100, 12345, 9_876_543_210] {
            let text = n.to_string();
            assert_eq!(rank(&dfa, &counts, &symbols(&text)).unwrap(), BigUint::from(n));
            assert_eq!(
                unrank(&dfa, &counts, &BigUint::from(n)).unwrap(),
                symbols(&text)
            );
        }
    }

    #[test]
    fn shortlex() {
        let (dfa, counts) = build("[ab]*");
        let order = ["", "a", "b", "aa", "ab", "ba", "bb", "aaa"];

        for (i, text) in order.iter().enumerate() {
            assert_eq!(rank(&dfa, &counts, &symbols(text)).unwrap(), BigUint::from(i));
            assert_eq!(unrank(&dfa, &counts, &BigUint::from(i)).unwrap(), symbols(text));
        }
    }

    #[test]
    fn symbols_inside_a_class() {
        let (dfa, counts) = build("x[a-z]");

        assert_eq!(rank(&dfa, &counts, &symbols("xa")).unwrap(), BigUint::from(0u32));
        assert_eq!(rank(&dfa, &counts, &symbols("xq")).unwrap(), BigUint::from(16u32));
        assert_eq!(unrank(&dfa, &counts, &BigUint::from(25u32)).unwrap(), symbols("xz"));
    }

    #[test]
    fn skips_dead_branches() {
        let (dfa, counts) = build("a(b|c)|cd");

        assert_eq!(rank_of("a(b|c)|cd", "ab").unwrap(), BigUint::from(0u32));
        assert_eq!(rank_of("a(b|c)|cd", "ac").unwrap(), BigUint::from(1u32));
        assert_eq!(rank_of("a(b|c)|cd", "cd").unwrap(), BigUint::from(2u32));
        assert_eq!(
            unrank(&dfa, &counts, &BigUint::from(3u32)),
            Err(Error::ValueOutOfRange)
        );
    }

    #[test]
    fn not_accepted() {
        assert_eq!(rank_of("[0-9]+", ""), Err(Error::NotAccepted));
        assert_eq!(rank_of("[0-9]+", "12a"), Err(Error::NotAccepted));
        assert_eq!(rank_of("abc", "abcd"), Err(Error::NotAccepted));
    }

    #[test]
    fn bytes() {
        let (dfa, counts) = build(".*");

        // base 256 with an offset for every shorter length
        let value = rank(&dfa, &counts, &[0x01, 0x00]).unwrap();
        assert_eq!(value, BigUint::from(1u32 + 256 + 256));
        assert_eq!(unrank(&dfa, &counts, &value).unwrap(), vec![0x01, 0x00]);
    }

    #[test]
    fn factorial_numbering() {
        let dfa = Dfa::compile(&Nfa::new("abc", Encoding::Ascii, false).unwrap(), true);
        let dfa = dfa.factorial(true);
        let counts = CountTable::new(&dfa, 100);

        let order = ["", "a", "b", "c", "ab", "bc", "abc"];
        for (i, text) in order.iter().enumerate() {
            assert_eq!(rank(&dfa, &counts, &symbols(text)).unwrap(), BigUint::from(i));
            assert_eq!(unrank(&dfa, &counts, &BigUint::from(i)).unwrap(), symbols(text));
        }
    }
}
