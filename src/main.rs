use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Read, Write},
};

use anyhow::{Context, Result};
use clap::Parser;
use common::deckstring::DeckstringCodec;
use deck_helper::{
    cli::{Args, Command, read_code},
    commands,
    ui::Logger,
};

fn main() -> Result<()> {
    let args = Args::parse();
    Logger::init(args.log_level())?;

    let codec = DeckstringCodec::new(args.deck_size);
    let mut out = io::stdout().lock();

    match args.command {
        Command::Decode { code, cards } => {
            let code = read_code(code, io::stdin())?;
            let cards = cards.as_deref().map(commands::load_cards).transpose()?;
            commands::decode(&codec, &code, cards.as_ref(), &mut out)
        }
        Command::Encode { path } => {
            let reader: Box<dyn Read> = match path {
                Some(path) => Box::new(BufReader::new(
                    File::open(&path)
                        .with_context(|| format!("could not open {}", path.display()))?,
                )),
                None => Box::new(io::stdin()),
            };
            commands::encode(&codec, reader, &mut out)
        }
        Command::Template { code, cards, name } => {
            let code = read_code(code, io::stdin())?;
            let cards = commands::load_cards(&cards)?;
            commands::template(&codec, &code, &name, &cards, &mut out)
        }
        Command::ImportCards { json, output } => {
            let json = BufReader::new(
                File::open(&json).with_context(|| format!("could not open {}", json.display()))?,
            );
            let mut output = BufWriter::new(
                File::create(&output)
                    .with_context(|| format!("could not create {}", output.display()))?,
            );
            commands::import_cards(json, &mut output)?;
            Ok(output.flush()?)
        }
    }
}
