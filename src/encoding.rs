/// Symbol alphabet used to build the automaton.
///
/// `Ascii` is byte oriented (256 symbols); `Utf8` works on Unicode scalar
/// values, so the surrogate block is not part of the alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Encoding {
    #[default]
    Ascii,
    Utf8,
}

pub type Symbol = u32;

const ASCII_ALPHABET: [(Symbol, Symbol); 1] = [(0x00, 0xFF)];
const UTF8_ALPHABET: [(Symbol, Symbol); 2] = [(0x0000, 0xD7FF), (0xE000, 0x10FFFF)];

impl Encoding {
    /// Inclusive symbol ranges, ascending.
    pub fn alphabet(&self) -> &'static [(Symbol, Symbol)] {
        match self {
            Encoding::Ascii => &ASCII_ALPHABET,
            Encoding::Utf8 => &UTF8_ALPHABET,
        }
    }

    pub fn alphabet_size(&self) -> u64 {
        self.alphabet()
            .iter()
            .map(|(lo, hi)| (hi - lo) as u64 + 1)
            .sum()
    }

    /// Splits raw text into symbols. `None` if the bytes are not valid in
    /// this encoding.
    pub fn decode(&self, text: &[u8]) -> Option<Vec<Symbol>> {
        match self {
            Encoding::Ascii => Some(text.iter().map(|b| *b as Symbol).collect()),
            Encoding::Utf8 => std::str::from_utf8(text)
                .ok()
                .map(|s| s.chars().map(|c| c as Symbol).collect()),
        }
    }

    pub fn encode(&self, symbols: &[Symbol]) -> Vec<u8> {
        match self {
            Encoding::Ascii => symbols.iter().map(|s| *s as u8).collect(),
            Encoding::Utf8 => {
                let mut buf = [0u8; 4];
                let mut bytes = Vec::with_capacity(symbols.len());
                for s in symbols {
                    if let Some(c) = char::from_u32(*s) {
                        bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
                    }
                }
                bytes
            }
        }
    }

    /// Expands a pattern character into the symbol sequence it stands for.
    /// In byte mode a non-latin1 character becomes its UTF-8 bytes.
    pub(crate) fn literal(&self, c: char) -> Vec<Symbol> {
        match self {
            Encoding::Utf8 => vec![c as Symbol],
            Encoding::Ascii if (c as u32) <= 0xFF => vec![c as Symbol],
            Encoding::Ascii => {
                let mut buf = [0u8; 4];
                c.encode_utf8(&mut buf)
                    .as_bytes()
                    .iter()
                    .map(|b| *b as Symbol)
                    .collect()
            }
        }
    }

    /// Intersects sorted, disjoint ranges with the alphabet.
    pub(crate) fn clip(&self, ranges: &[(Symbol, Symbol)]) -> Vec<(Symbol, Symbol)> {
        let mut clipped = vec![];
        for (lo, hi) in ranges {
            for (a, b) in self.alphabet() {
                let l = (*lo).max(*a);
                let h = (*hi).min(*b);
                if l <= h {
                    clipped.push((l, h));
                }
            }
        }
        clipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alphabet_size() {
        assert_eq!(Encoding::Ascii.alphabet_size(), 256);
        assert_eq!(Encoding::Utf8.alphabet_size(), 1_112_064);
    }

    #[test]
    fn decode_encode() {
        let text = "añb".as_bytes();
        assert_eq!(Encoding::Ascii.decode(text).unwrap().len(), 4);
        assert_eq!(
            Encoding::Utf8.decode(text),
            Some(vec!['a' as u32, 'ñ' as u32, 'b' as u32])
        );
        assert_eq!(Encoding::Utf8.decode(&[0xFF]), None);

        let symbols = Encoding::Utf8.decode(text).unwrap();
        assert_eq!(Encoding::Utf8.encode(&symbols), text);
    }

    #[test]
    fn clip() {
        assert_eq!(
            Encoding::Ascii.clip(&[(0x41, 0x5A), (0xF0, 0x3042)]),
            vec![(0x41, 0x5A), (0xF0, 0xFF)]
        );
        assert_eq!(
            Encoding::Utf8.clip(&[(0xD000, 0xE00F)]),
            vec![(0xD000, 0xD7FF), (0xE000, 0xE00F)]
        );
        assert!(Encoding::Ascii.clip(&[(0x100, 0x200)]).is_empty());
    }

    #[test]
    fn literal() {
        assert_eq!(Encoding::Ascii.literal('a'), vec![0x61]);
        assert_eq!(Encoding::Ascii.literal('é'), vec![0xE9]);
        assert_eq!(Encoding::Ascii.literal('あ'), vec![0xE3, 0x81, 0x82]);
        assert_eq!(Encoding::Utf8.literal('あ'), vec![0x3042]);
    }
}
