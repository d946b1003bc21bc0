pub mod card;
pub mod card_data;
pub mod deck;
pub mod deckstring;
pub mod template;
pub mod transfer;
pub mod varint;
