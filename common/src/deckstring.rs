//! Binary deck codes as exported by the game client.
//!
//! A deck code is the standard base64 encoding of
//!
//! | Field           | Encoding                                  |
//! |-----------------|-------------------------------------------|
//! | marker          | `0x00`                                    |
//! | version         | varint, always [`FORMAT_VERSION`]         |
//! | format          | varint                                    |
//! | heroes          | counted varints                           |
//! | single copies   | counted varints                           |
//! | double copies   | counted varints                           |
//! | other counts    | counted `(id, count)` varint pairs        |
//! | additional      | counted `(id, source)` varint pairs, optional |

use std::fmt::{self, Display};

use base64::{Engine, engine::general_purpose::STANDARD};
use nom::error::ErrorKind;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{card::DbfId, template, varint};

/// First byte of every deck code.
pub const MARKER: u8 = 0x00;

/// The only supported version of the binary layout.
pub const FORMAT_VERSION: u32 = 1;

/// Number of cards in a constructed deck.
pub const DEFAULT_DECK_SIZE: u32 = 30;

/// Game format a deck was built for.
///
/// The codec treats the value as opaque, the constants are the values known at the time of writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(transparent)]
pub struct GameFormat(pub u32);

impl GameFormat {
    pub const UNKNOWN: Self = Self(0);
    pub const WILD: Self = Self(1);
    pub const STANDARD: Self = Self(2);
    pub const CLASSIC: Self = Self(3);
    pub const TWIST: Self = Self(4);

    #[must_use]
    pub fn name(self) -> Option<&'static str> {
        match self {
            Self::UNKNOWN => Some("Unknown"),
            Self::WILD => Some("Wild"),
            Self::STANDARD => Some("Standard"),
            Self::CLASSIC => Some("Classic"),
            Self::TWIST => Some("Twist"),
            _ => None,
        }
    }
}

impl Display for GameFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name}"),
            None => write!(f, "Format {}", self.0),
        }
    }
}

/// Copies of a card which are part of the deck itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub struct CardEntry {
    pub dbf_id: DbfId,
    pub count: u32,
}

impl CardEntry {
    #[must_use]
    pub const fn new(dbf_id: DbfId, count: u32) -> Self {
        Self { dbf_id, count }
    }
}

/// A card added to the deck because another card (the source) is part of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub struct AdditionalCard {
    pub dbf_id: DbfId,
    pub source_dbf_id: DbfId,
    #[serde(default = "AdditionalCard::default_number")]
    pub number: u32,
}

impl AdditionalCard {
    #[must_use]
    pub const fn new(dbf_id: DbfId, source_dbf_id: DbfId) -> Self {
        Self {
            dbf_id,
            source_dbf_id,
            number: 1,
        }
    }

    const fn default_number() -> u32 {
        1
    }
}

/// Card content of a deck code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ParsedCardList {
    native: Vec<CardEntry>,
    #[serde(default)]
    additional: Vec<AdditionalCard>,
}

impl ParsedCardList {
    #[must_use]
    pub fn new(native: Vec<CardEntry>, additional: Vec<AdditionalCard>) -> Self {
        Self { native, additional }
    }

    /// Cards in the order single copies, double copies, other counts.
    #[must_use]
    pub fn native(&self) -> &[CardEntry] {
        &self.native
    }

    #[must_use]
    pub fn additional(&self) -> &[AdditionalCard] {
        &self.additional
    }

    /// Sum of all native copies.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.native.iter().map(|entry| u64::from(entry.count)).sum()
    }
}

/// Result of decoding a deck code.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ParsedDeck {
    format: GameFormat,
    heroes: Vec<DbfId>,
    cards: ParsedCardList,
}

impl ParsedDeck {
    #[must_use]
    pub fn new(format: GameFormat, heroes: Vec<DbfId>, cards: ParsedCardList) -> Self {
        Self {
            format,
            heroes,
            cards,
        }
    }

    #[must_use]
    pub fn format(&self) -> GameFormat {
        self.format
    }

    #[must_use]
    pub fn heroes(&self) -> &[DbfId] {
        &self.heroes
    }

    #[must_use]
    pub fn cards(&self) -> &ParsedCardList {
        &self.cards
    }
}

/// Reasons for rejecting a deck code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("Invalid deck code")]
    InvalidBase64(#[source] base64::DecodeError),
    #[error("Invalid deck code")]
    InvalidMarker(u8),
    #[error("Invalid deck code: unexpected end of data")]
    Truncated,
    #[error("Invalid deck code: integer does not fit in 32 bits")]
    VarintOverflow,
    #[error("Unsupported deckstring version")]
    UnsupportedVersion(u32),
    #[error("Unsupported deckstring version: deck has {actual} cards, expected {expected}")]
    CardCountMismatch { expected: u32, actual: u64 },
}

impl From<nom::Err<nom::error::Error<&[u8]>>> for DecodeError {
    fn from(err: nom::Err<nom::error::Error<&[u8]>>) -> Self {
        match err {
            nom::Err::Failure(nom::error::Error {
                code: ErrorKind::TooLarge,
                ..
            }) => Self::VarintOverflow,
            _ => Self::Truncated,
        }
    }
}

/// Encoder and decoder for deck codes of a fixed deck size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeckstringCodec {
    deck_size: u32,
}

impl Default for DeckstringCodec {
    fn default() -> Self {
        Self::new(DEFAULT_DECK_SIZE)
    }
}

impl DeckstringCodec {
    #[must_use]
    pub const fn new(deck_size: u32) -> Self {
        Self { deck_size }
    }

    #[must_use]
    pub const fn deck_size(&self) -> u32 {
        self.deck_size
    }

    /// Decode a deck code, which may still be wrapped in the copy-paste template.
    pub fn decode(&self, code: &str) -> Result<ParsedDeck, DecodeError> {
        // Line breaks inside a pasted code are dropped like the surrounding whitespace.
        let code: String = template::unwrap(code).split_ascii_whitespace().collect();
        let bytes = STANDARD
            .decode(code)
            .map_err(DecodeError::InvalidBase64)?;
        self.decode_bytes(&bytes)
    }

    /// Decode the binary payload of a deck code.
    ///
    /// Decoding never returns partial results. Data following the additional cards is ignored.
    pub fn decode_bytes(&self, input: &[u8]) -> Result<ParsedDeck, DecodeError> {
        let (input, marker) = varint::byte(input)?;
        if marker != MARKER {
            return Err(DecodeError::InvalidMarker(marker));
        }

        let (input, version) = varint::varint(input)?;
        if version != FORMAT_VERSION {
            return Err(DecodeError::UnsupportedVersion(version));
        }

        let (input, format) = varint::varint(input)?;
        let (input, heroes) = varint::ids(input)?;
        let (input, singles) = varint::ids(input)?;
        let (input, doubles) = varint::ids(input)?;
        let (input, others) = varint::pairs(input)?;

        let native: Vec<_> = singles
            .into_iter()
            .map(|id| CardEntry::new(id, 1))
            .chain(doubles.into_iter().map(|id| CardEntry::new(id, 2)))
            .chain(
                others
                    .into_iter()
                    .map(|(id, count)| CardEntry::new(id, count)),
            )
            .collect();

        let actual: u64 = native.iter().map(|entry| u64::from(entry.count)).sum();
        if actual != u64::from(self.deck_size) {
            return Err(DecodeError::CardCountMismatch {
                expected: self.deck_size,
                actual,
            });
        }

        // A stream ending here is indistinguishable from one without additional cards.
        let (_, additional) = varint::trailing_pairs(input)?;
        let additional = additional
            .into_iter()
            .map(|(id, source)| AdditionalCard::new(id, source))
            .collect();

        Ok(ParsedDeck::new(
            GameFormat(format),
            heroes,
            ParsedCardList::new(native, additional),
        ))
    }

    /// Encode a deck into a deck code.
    ///
    /// The deck size is not checked, additional cards are only written if there are any.
    #[must_use]
    pub fn encode(&self, deck: &ParsedDeck) -> String {
        STANDARD.encode(self.encode_bytes(deck))
    }

    #[must_use]
    pub fn encode_bytes(&self, deck: &ParsedDeck) -> Vec<u8> {
        let mut buffer = vec![MARKER];
        varint::write(&mut buffer, FORMAT_VERSION);
        varint::write(&mut buffer, deck.format.0);
        write_ids(&mut buffer, deck.heroes.iter().copied());

        let native = deck.cards.native();
        write_ids(&mut buffer, ids_with_count(native, 1));
        write_ids(&mut buffer, ids_with_count(native, 2));
        write_pairs(
            &mut buffer,
            native
                .iter()
                .filter(|entry| !matches!(entry.count, 1 | 2))
                .map(|entry| (entry.dbf_id, entry.count)),
        );

        let additional = deck.cards.additional();
        if !additional.is_empty() {
            write_pairs(
                &mut buffer,
                additional
                    .iter()
                    .map(|card| (card.dbf_id, card.source_dbf_id)),
            );
        }

        buffer
    }
}

fn ids_with_count(entries: &[CardEntry], count: u32) -> impl Iterator<Item = DbfId> + Clone + '_ {
    entries
        .iter()
        .filter(move |entry| entry.count == count)
        .map(|entry| entry.dbf_id)
}

fn write_len(buffer: &mut Vec<u8>, len: usize) {
    let len = u32::try_from(len).expect("deck section has more than u32::MAX entries");
    varint::write(buffer, len);
}

fn write_ids(buffer: &mut Vec<u8>, ids: impl Iterator<Item = DbfId> + Clone) {
    write_len(buffer, ids.clone().count());
    for id in ids {
        varint::write(buffer, id);
    }
}

fn write_pairs(buffer: &mut Vec<u8>, pairs: impl Iterator<Item = (u32, u32)> + Clone) {
    write_len(buffer, pairs.clone().count());
    for (first, second) in pairs {
        varint::write(buffer, first);
        varint::write(buffer, second);
    }
}
