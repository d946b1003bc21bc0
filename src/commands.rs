use std::{
    fs::File,
    io::{BufReader, Read, Write},
    path::Path,
    time::Instant,
};

use anyhow::{Context, Result};
use common::{
    card_data::CardData,
    deck::Deck,
    deckstring::{DeckstringCodec, ParsedDeck},
    transfer,
};
use log::{debug, info, warn};

/// Load a card catalog, either `cards.json` or a cache written by [`import_cards`].
pub fn load_cards(path: &Path) -> Result<CardData> {
    let start = Instant::now();
    let reader = BufReader::new(
        File::open(path).with_context(|| format!("could not open {}", path.display()))?,
    );

    let cards = if path
        .extension()
        .is_some_and(|ext| ext == transfer::CACHE_FILE_ENDING)
    {
        CardData::load_cache(reader)?
    } else {
        CardData::from_json(reader)?
    };

    debug!(
        "Loaded {} cards from {} in {:?}",
        cards.len(),
        path.display(),
        start.elapsed()
    );
    Ok(cards)
}

/// Print a deck code as JSON, or as a card list if a catalog is given.
pub fn decode(
    codec: &DeckstringCodec,
    code: &str,
    cards: Option<&CardData>,
    out: &mut impl Write,
) -> Result<()> {
    let parsed = codec.decode(code)?;
    debug!(
        "Decoded {} deck with {} card entries and {} additional cards",
        parsed.format(),
        parsed.cards().native().len(),
        parsed.cards().additional().len()
    );

    let Some(cards) = cards else {
        serde_json::to_writer_pretty(&mut *out, &parsed)?;
        writeln!(out)?;
        return Ok(());
    };

    let deck = Deck::from_parsed(&parsed, cards)?;
    writeln!(out, "{} {} ({} cards)", deck.format(), deck.class(cards), deck.total())?;

    for entry in deck.entries() {
        let card = &cards[entry.id()];
        writeln!(out, "{}x ({}) {}", entry.count(), card.cost, card.name)?;
    }

    for additional in deck.additional() {
        writeln!(
            out,
            "+{}x {} from {}",
            additional.number,
            cards[additional.dbf_id].name,
            cards[additional.source_dbf_id].name
        )?;
    }

    Ok(())
}

/// Read a JSON deck description and print its deck code.
pub fn encode(codec: &DeckstringCodec, reader: impl Read, out: &mut impl Write) -> Result<()> {
    let deck: ParsedDeck =
        serde_json::from_reader(reader).context("could not parse deck description")?;

    let total = deck.cards().total();
    if total != u64::from(codec.deck_size()) {
        warn!(
            "Deck contains {total} cards, the resulting code will not decode with a deck size of {}",
            codec.deck_size()
        );
    }

    writeln!(out, "{}", codec.encode(&deck))?;
    Ok(())
}

/// Print the copy-paste text of a deck.
pub fn template(
    codec: &DeckstringCodec,
    code: &str,
    name: &str,
    cards: &CardData,
    out: &mut impl Write,
) -> Result<()> {
    let deck = Deck::load(code, codec, cards)?;
    write!(out, "{}", deck.template(name, codec, cards))?;
    Ok(())
}

/// Convert `cards.json` into the binary catalog cache.
pub fn import_cards(json: impl Read, output: impl Write) -> Result<usize> {
    let start = Instant::now();
    let cards = CardData::from_json(json)?;
    cards.save_cache(output)?;

    info!("Saved {} cards in {:?}", cards.len(), start.elapsed());
    Ok(cards.len())
}
