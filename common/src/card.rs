use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// Numeric card identifier used in deck codes.
///
/// Uses [`u32`] as varints in deck codes are decoded to 32 bits.
pub type DbfId = u32;

/// Set of the cosmetic hero cards, which can not be put into a deck.
pub const HERO_SKINS_SET: &str = "HERO_SKINS";

/// Catalog entry for a single card, in the layout of `HearthstoneJSON`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub dbf_id: DbfId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub card_class: CardClass,
    #[serde(default)]
    pub cost: u32,
    #[serde(default)]
    pub collectible: bool,
    #[serde(default)]
    pub set: String,
}

impl Card {
    /// Whether the card may be part of a deck.
    #[must_use]
    pub fn is_includible(&self) -> bool {
        self.collectible && self.set != HERO_SKINS_SET
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardClass {
    #[serde(rename = "DEATHKNIGHT")]
    DeathKnight,
    #[serde(rename = "DEMONHUNTER")]
    DemonHunter,
    Druid,
    Hunter,
    Mage,
    Paladin,
    Priest,
    Rogue,
    Shaman,
    Warlock,
    Warrior,
    Neutral,
    #[default]
    #[serde(other)]
    Unknown,
}

impl Display for CardClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::DeathKnight => "Death Knight",
            Self::DemonHunter => "Demon Hunter",
            Self::Druid => "Druid",
            Self::Hunter => "Hunter",
            Self::Mage => "Mage",
            Self::Paladin => "Paladin",
            Self::Priest => "Priest",
            Self::Rogue => "Rogue",
            Self::Shaman => "Shaman",
            Self::Warlock => "Warlock",
            Self::Warrior => "Warrior",
            Self::Neutral => "Neutral",
            Self::Unknown => "Unknown",
        };

        write!(f, "{name}")
    }
}

pub mod test_util {
    use super::*;

    pub fn make_card(dbf_id: DbfId) -> Card {
        Card {
            dbf_id,
            name: format!("Card {dbf_id}"),
            card_class: CardClass::Neutral,
            cost: dbf_id % 10,
            collectible: true,
            set: "CORE".to_owned(),
        }
    }

    pub fn make_hero(dbf_id: DbfId, card_class: CardClass) -> Card {
        Card {
            name: format!("{card_class} Hero"),
            card_class,
            set: "HERO_SKINS".to_owned(),
            ..make_card(dbf_id)
        }
    }
}
