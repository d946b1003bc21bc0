use std::{
    io::{self, Read, Write},
    ops::Index,
};

use bincode::Options;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    card::{Card, DbfId},
    transfer,
};

/// Possible errors when loading card data.
#[derive(Debug, Error)]
pub enum Error {
    #[error("could not read card data")]
    Reader(#[from] io::Error),
    #[error("could not parse card json")]
    Json(#[from] serde_json::Error),
    #[error("could not read card cache")]
    Cache(#[from] bincode::Error),
}

/// Card catalog, indexed by [`DbfId`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardData {
    entries: FxHashMap<DbfId, Card>,
}

impl CardData {
    #[must_use]
    pub fn new(cards: impl IntoIterator<Item = Card>) -> Self {
        Self {
            entries: cards.into_iter().map(|card| (card.dbf_id, card)).collect(),
        }
    }

    /// Read the card list of a `HearthstoneJSON` `cards.json` file.
    pub fn from_json(reader: impl Read) -> Result<Self, Error> {
        let cards: Vec<Card> = serde_json::from_reader(reader)?;
        Ok(Self::new(cards))
    }

    /// Read a catalog written by [`CardData::save_cache`].
    pub fn load_cache(reader: impl Read) -> Result<Self, Error> {
        Ok(transfer::bincode_options().deserialize_from(reader)?)
    }

    pub fn save_cache(&self, writer: impl Write) -> Result<(), Error> {
        Ok(transfer::bincode_options().serialize_into(writer, self)?)
    }

    #[must_use]
    pub fn entries(&self) -> &FxHashMap<DbfId, Card> {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: DbfId) -> Option<&Card> {
        self.entries.get(&id)
    }

    #[must_use]
    pub fn contains(&self, id: DbfId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Whether the card is known and may be put into a deck.
    #[must_use]
    pub fn includible(&self, id: DbfId) -> bool {
        self.get(id).is_some_and(Card::is_includible)
    }
}

impl Index<DbfId> for CardData {
    type Output = Card;

    fn index(&self, index: DbfId) -> &Self::Output {
        &self.entries[&index]
    }
}

#[cfg(test)]
mod test {
    use crate::card::{
        CardClass,
        test_util::{make_card, make_hero},
    };

    use super::*;

    const JSON: &str = r#"[
        {"dbfId": 180, "name": "Backstab", "cardClass": "ROGUE", "cost": 0, "collectible": true, "set": "CORE"},
        {"dbfId": 930, "name": "Valeera Sanguinar", "cardClass": "ROGUE", "set": "HERO_SKINS", "collectible": true},
        {"dbfId": 1000, "name": "Token", "cardClass": "NEUTRAL", "cost": 1}
    ]"#;

    #[test]
    fn load_json() {
        let data = CardData::from_json(JSON.as_bytes()).unwrap();

        assert_eq!(data.len(), 3);
        assert_eq!(data[180].name, "Backstab");
        assert_eq!(data[930].card_class, CardClass::Rogue);

        assert!(data.includible(180));
        assert!(!data.includible(930));
        assert!(!data.includible(1000));
        assert!(!data.includible(1));
        assert!(data.contains(1000));
        assert!(!data.contains(1));
    }

    #[test]
    fn invalid_json() {
        assert!(matches!(
            CardData::from_json(r#"{"dbfId": 1}"#.as_bytes()),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn cache_round_trip() {
        let data = CardData::new([make_card(1), make_card(22), make_hero(333, CardClass::Mage)]);

        let mut buffer = Vec::new();
        data.save_cache(&mut buffer).unwrap();
        let loaded = CardData::load_cache(buffer.as_slice()).unwrap();

        assert_eq!(loaded.entries(), data.entries());
    }

    #[test]
    fn truncated_cache() {
        let mut buffer = Vec::new();
        CardData::new([make_card(1)]).save_cache(&mut buffer).unwrap();
        buffer.truncate(buffer.len() / 2);

        assert!(matches!(
            CardData::load_cache(buffer.as_slice()),
            Err(Error::Cache(_))
        ));
    }
}
