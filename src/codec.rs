// Compressed stream layout:
//
//   ULEB128(length in symbols) || rank as minimal big-endian bytes
//
// A zero rank has no payload bytes, and a payload never starts with a zero
// byte, so every (length, rank) pair has exactly one encoding.

use num_bigint::BigUint;
use num_traits::Zero;

use crate::error::{Error, Result};

pub fn serialize(length: usize, rank: &BigUint) -> Vec<u8> {
    let mut bytes = vec![];
    leb128::write::unsigned(&mut bytes, length as u64).expect("writing to a Vec cannot fail");
    if !rank.is_zero() {
        bytes.extend(rank.to_bytes_be());
    }
    bytes
}

pub fn deserialize(bytes: &[u8]) -> Result<(usize, BigUint)> {
    let mut payload = bytes;
    let length = leb128::read::unsigned(&mut payload)
        .map_err(|e| Error::CorruptInput(format!("bad length header: {}", e)))?;
    let length = usize::try_from(length)
        .map_err(|_| Error::CorruptInput(format!("length {} does not fit", length)))?;

    if payload.first() == Some(&0) {
        return Err(Error::CorruptInput("rank has a leading zero byte".into()));
    }
    Ok((length, BigUint::from_bytes_be(payload)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout() {
        assert_eq!(serialize(0, &BigUint::zero()), vec![0x00]);
        assert_eq!(serialize(3, &BigUint::from(0x0102u32)), vec![0x03, 0x01, 0x02]);
        assert_eq!(
            serialize(300, &BigUint::from(0xFFu32)),
            vec![0xAC, 0x02, 0xFF]
        );
    }

    #[test]
    fn read_back() {
        assert_eq!(deserialize(&[0x00]).unwrap(), (0, BigUint::zero()));
        assert_eq!(
            deserialize(&[0xAC, 0x02, 0x01, 0x00, 0x00]).unwrap(),
            (300, BigUint::from(0x010000u32))
        );
    }

    #[test]
    fn corrupt() {
        assert!(matches!(deserialize(&[]), Err(Error::CorruptInput(_))));
        assert!(matches!(deserialize(&[0x80]), Err(Error::CorruptInput(_))));
        assert!(matches!(
            deserialize(&[0x01, 0x00, 0x05]),
            Err(Error::CorruptInput(_))
        ));
        assert!(matches!(
            deserialize(&[0xFF; 11]),
            Err(Error::CorruptInput(_))
        ));
    }
}
