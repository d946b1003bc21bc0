use itertools::Itertools;
use thiserror::Error;

use crate::{
    card::{CardClass, DbfId},
    card_data::CardData,
    deckstring::{
        AdditionalCard, CardEntry, DecodeError, DeckstringCodec, GameFormat, ParsedCardList,
        ParsedDeck,
    },
    template::{DeckTemplate, TemplateLine},
};

/// Number of shared copies from which two decks count as similar.
pub const SIMILARITY_THRESHOLD: u32 = 20;

/// Possible errors when building a deck from a deck code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("No card data (id {0})")]
    UnsupportedCard(DbfId),
    #[error("Deck code does not name a hero")]
    MissingHero,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeckEntry {
    /// The card id of this entry
    id: DbfId,
    /// Number of copies
    count: u32,
}

impl DeckEntry {
    fn new(id: DbfId) -> Self {
        Self { id, count: 0 }
    }

    #[must_use]
    pub fn id(&self) -> DbfId {
        self.id
    }

    #[must_use]
    pub fn count(&self) -> u32 {
        self.count
    }
}

/// A deck checked against the card catalog.
///
/// Entries are kept sorted by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    format: GameFormat,
    heroes: Vec<DbfId>,
    entries: Vec<DeckEntry>,
    additional: Vec<AdditionalCard>,
}

impl Deck {
    #[must_use]
    pub fn new(format: GameFormat, hero: DbfId) -> Self {
        Self {
            format,
            heroes: vec![hero],
            entries: Vec::new(),
            additional: Vec::new(),
        }
    }

    /// Decode a deck code and check every card against the catalog.
    ///
    /// The code may still be wrapped in the copy-paste template.
    pub fn load(code: &str, codec: &DeckstringCodec, cards: &CardData) -> Result<Self, Error> {
        Self::from_parsed(&codec.decode(code)?, cards)
    }

    pub fn from_parsed(parsed: &ParsedDeck, cards: &CardData) -> Result<Self, Error> {
        let &hero = parsed.heroes().first().ok_or(Error::MissingHero)?;
        if !cards.contains(hero) {
            return Err(Error::UnsupportedCard(hero));
        }

        let includible = |id: DbfId| {
            if cards.includible(id) {
                Ok(id)
            } else {
                Err(Error::UnsupportedCard(id))
            }
        };

        let mut deck = Self {
            format: parsed.format(),
            heroes: parsed.heroes().to_vec(),
            entries: Vec::new(),
            additional: Vec::new(),
        };

        for entry in parsed.cards().native() {
            deck.increment(includible(entry.dbf_id)?, entry.count);
        }

        for card in parsed.cards().additional() {
            includible(card.dbf_id)?;
            includible(card.source_dbf_id)?;
            deck.additional.push(*card);
        }

        Ok(deck)
    }

    /// Add copies of a card, saturating at [`u32::MAX`].
    ///
    /// Returns the number of copies actually added.
    pub fn increment(&mut self, id: DbfId, amount: u32) -> u32 {
        if amount == 0 {
            return 0;
        }

        let idx = self
            .entries
            .binary_search_by_key(&id, DeckEntry::id)
            .unwrap_or_else(|idx| {
                self.entries.insert(idx, DeckEntry::new(id));
                idx
            });

        let entry = &mut self.entries[idx].count;

        if let Some(new_val) = entry.checked_add(amount) {
            *entry = new_val;
            return amount;
        }

        let ret = u32::MAX - *entry;
        *entry = u32::MAX;
        ret
    }

    /// Remove copies of a card, dropping the entry once none are left.
    ///
    /// Returns the number of copies actually removed.
    pub fn decrement(&mut self, id: DbfId, amount: u32) -> u32 {
        let Ok(idx) = self.entries.binary_search_by_key(&id, DeckEntry::id) else {
            return 0;
        };

        let entry = &mut self.entries[idx].count;
        let ret = amount.min(*entry);
        *entry -= ret;

        if *entry == 0 {
            self.entries.remove(idx);
        }

        ret
    }

    #[must_use]
    pub fn format(&self) -> GameFormat {
        self.format
    }

    #[must_use]
    pub fn heroes(&self) -> &[DbfId] {
        &self.heroes
    }

    pub fn entries(&self) -> impl Iterator<Item = &DeckEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn additional(&self) -> &[AdditionalCard] {
        &self.additional
    }

    /// Number of copies of `id` in the deck.
    #[must_use]
    pub fn count(&self, id: DbfId) -> u32 {
        self.entries
            .binary_search_by_key(&id, DeckEntry::id)
            .map_or(0, |idx| self.entries[idx].count)
    }

    /// Total number of card copies, not counting additional cards.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|entry| u64::from(entry.count)).sum()
    }

    /// Class of the first hero.
    #[must_use]
    pub fn class(&self, cards: &CardData) -> CardClass {
        self.heroes
            .first()
            .and_then(|&hero| cards.get(hero))
            .map_or(CardClass::Unknown, |card| card.card_class)
    }

    /// Number of card copies present in both decks.
    #[must_use]
    pub fn common_cards(&self, other: &Deck) -> u32 {
        self.entries
            .iter()
            .map(|entry| entry.count.min(other.count(entry.id)))
            .sum()
    }

    /// Whether both decks are of the same format and class, sharing most of their cards.
    #[must_use]
    pub fn is_similar(&self, other: &Deck, cards: &CardData) -> bool {
        self.format == other.format
            && self.class(cards) == other.class(cards)
            && self.common_cards(other) >= SIMILARITY_THRESHOLD
    }

    #[must_use]
    pub fn to_parsed(&self) -> ParsedDeck {
        let native = self
            .entries
            .iter()
            .map(|entry| CardEntry::new(entry.id, entry.count))
            .collect();

        ParsedDeck::new(
            self.format,
            self.heroes.clone(),
            ParsedCardList::new(native, self.additional.clone()),
        )
    }

    #[must_use]
    pub fn encode(&self, codec: &DeckstringCodec) -> String {
        codec.encode(&self.to_parsed())
    }

    /// Copy-paste text for the deck, cards sorted by cost and name.
    #[must_use]
    pub fn template(&self, name: &str, codec: &DeckstringCodec, cards: &CardData) -> DeckTemplate {
        let lines = self
            .entries
            .iter()
            .filter_map(|entry| {
                cards.get(entry.id).map(|card| TemplateLine {
                    count: entry.count,
                    cost: card.cost,
                    name: card.name.clone(),
                })
            })
            .sorted_by(|a, b| a.cost.cmp(&b.cost).then_with(|| a.name.cmp(&b.name)))
            .collect();

        DeckTemplate {
            name: name.to_owned(),
            class_name: self.class(cards).to_string(),
            format_name: self.format.to_string(),
            lines,
            code: self.encode(codec),
        }
    }
}
