//! Base-128 variable length integers, least significant group first.

use nom::{
    bytes::complete::{take, take_while},
    combinator::{map, opt},
    error::{Error, ErrorKind},
    multi::length_count,
    sequence::pair,
};

pub type IResult<'a, T> = nom::IResult<&'a [u8], T>;

const CONTINUATION: u8 = 0x80;
const PAYLOAD: u8 = 0x7f;
const GROUP_BITS: u32 = 7;

/// Longest encoding of a [`u32`].
const MAX_LEN: usize = 5;

/// Parse a single raw byte.
pub fn byte(input: &[u8]) -> IResult<'_, u8> {
    nom::number::complete::u8(input)
}

/// Parse a single varint.
///
/// Running out of input before a terminating byte is an [`nom::Err::Error`]. Values which do not
/// fit into a [`u32`] are reported as [`nom::Err::Failure`] with [`ErrorKind::TooLarge`], so they
/// are never swallowed by an optional parser.
pub fn varint(input: &[u8]) -> IResult<'_, u32> {
    let (rest, (groups, last)) =
        pair(take_while(|b: u8| (b & CONTINUATION) != 0), take(1usize))(input)?;

    if groups.len() >= MAX_LEN {
        return Err(nom::Err::Failure(Error::new(input, ErrorKind::TooLarge)));
    }

    let value = groups
        .iter()
        .chain(last)
        .rev()
        .fold(0_u64, |acc, &b| (acc << GROUP_BITS) | u64::from(b & PAYLOAD));

    match u32::try_from(value) {
        Ok(value) => Ok((rest, value)),
        Err(_) => Err(nom::Err::Failure(Error::new(input, ErrorKind::TooLarge))),
    }
}

/// A varint count followed by that many varints.
pub fn ids(input: &[u8]) -> IResult<'_, Vec<u32>> {
    length_count(varint, varint)(input)
}

/// A varint count followed by that many pairs of varints.
pub fn pairs(input: &[u8]) -> IResult<'_, Vec<(u32, u32)>> {
    length_count(varint, pair(varint, varint))(input)
}

/// Like [`pairs`], but a count cut off by the end of input reads as zero.
///
/// This is the only place where running out of data is not an error. Once the count has been
/// read, the pairs themselves are required.
pub fn trailing_pairs(input: &[u8]) -> IResult<'_, Vec<(u32, u32)>> {
    length_count(map(opt(varint), Option::unwrap_or_default), pair(varint, varint))(input)
}

/// Append `value` as a varint.
pub fn write(buffer: &mut Vec<u8>, mut value: u32) {
    loop {
        // Truncation intended, the mask keeps the low seven bits.
        #[allow(clippy::cast_possible_truncation)]
        let group = (value & u32::from(PAYLOAD)) as u8;
        value >>= GROUP_BITS;

        if value == 0 {
            buffer.push(group);
            return;
        }

        buffer.push(group | CONTINUATION);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const CASES: [(u32, &[u8]); 8] = [
        (0, &[0x00]),
        (1, &[0x01]),
        (127, &[0x7f]),
        (128, &[0x80, 0x01]),
        (300, &[0xac, 0x02]),
        (64734, &[0xde, 0xf9, 0x03]),
        (16_383, &[0xff, 0x7f]),
        (u32::MAX, &[0xff, 0xff, 0xff, 0xff, 0x0f]),
    ];

    #[test]
    fn known_values() {
        for (value, bytes) in CASES {
            assert_eq!(varint(bytes), Ok((&[][..], value)), "value = {value}");

            let mut buffer = Vec::new();
            write(&mut buffer, value);
            assert_eq!(buffer, bytes, "value = {value}");
        }
    }

    #[test]
    fn stops_at_terminating_byte() {
        assert_eq!(varint(&[0xac, 0x02, 0x05]), Ok((&[0x05][..], 300)));
    }

    #[test]
    fn non_minimal_encoding() {
        assert_eq!(varint(&[0x81, 0x80, 0x00]), Ok((&[][..], 1)));
    }

    #[test]
    fn empty_input() {
        assert!(matches!(varint(&[]), Err(nom::Err::Error(_))));
    }

    #[test]
    fn missing_terminator() {
        for input in [&[0x80][..], &[0xff, 0xff], &[0xde, 0xf9]] {
            assert!(
                matches!(varint(input), Err(nom::Err::Error(_))),
                "input = {input:02x?}"
            );
        }
    }

    #[test]
    fn too_large() {
        for input in [
            &[0xff, 0xff, 0xff, 0xff, 0x10][..],
            &[0x80, 0x80, 0x80, 0x80, 0x80, 0x01],
        ] {
            assert!(
                matches!(
                    varint(input),
                    Err(nom::Err::Failure(Error {
                        code: ErrorKind::TooLarge,
                        ..
                    }))
                ),
                "input = {input:02x?}"
            );
        }
    }

    #[test]
    fn counted_lists() {
        assert_eq!(ids(&[0x02, 0x05, 0xac, 0x02]), Ok((&[][..], vec![5, 300])));
        assert_eq!(ids(&[0x00, 0x07]), Ok((&[0x07][..], vec![])));
        assert_eq!(
            pairs(&[0x01, 0x05, 0x03, 0x09]),
            Ok((&[0x09][..], vec![(5, 3)]))
        );
        assert!(ids(&[0x03, 0x01, 0x02]).is_err());
        assert!(pairs(&[0x01, 0x05]).is_err());
    }

    #[test]
    fn trailing_section() {
        assert_eq!(trailing_pairs(&[]), Ok((&[][..], vec![])));
        assert_eq!(trailing_pairs(&[0x80]), Ok((&[0x80][..], vec![])));
        assert_eq!(trailing_pairs(&[0x00]), Ok((&[][..], vec![])));
        assert_eq!(
            trailing_pairs(&[0x02, 0x01, 0x02, 0x03, 0x04]),
            Ok((&[][..], vec![(1, 2), (3, 4)]))
        );
        assert!(trailing_pairs(&[0x02, 0x01, 0x02]).is_err());
        assert!(trailing_pairs(&[0xff, 0xff, 0xff, 0xff, 0x7f]).is_err());
    }
}
