use std::{
    io::{self, Read},
    path::PathBuf,
};

use clap::{Parser, Subcommand};
use common::deckstring::DEFAULT_DECK_SIZE;
use log::LevelFilter;

/// Argument standing for standard input.
pub const STDIN: &str = "-";

#[derive(Debug, Parser)]
#[command(version, about = "Decode, encode and inspect Hearthstone deck codes")]
pub struct Args {
    #[arg(
        long,
        global = true,
        default_value_t = DEFAULT_DECK_SIZE,
        help = "Number of cards a deck must contain"
    )]
    pub deck_size: u32,
    #[arg(
        short,
        long,
        global = true,
        conflicts_with = "quiet",
        help = "Print debug output"
    )]
    pub verbose: bool,
    #[arg(short, long, global = true, help = "Only print warnings and errors")]
    pub quiet: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the content of a deck code
    Decode {
        #[arg(help = "Deck code or copied deck, `-` to read from stdin")]
        code: String,
        #[arg(long, help = "Card catalog (cards.json or imported cache) to resolve cards with")]
        cards: Option<PathBuf>,
    },
    /// Create a deck code from a JSON deck description
    Encode {
        #[arg(help = "JSON file as printed by `decode`, stdin if missing")]
        path: Option<PathBuf>,
    },
    /// Print the text the game client copies to the clipboard
    Template {
        #[arg(help = "Deck code or copied deck, `-` to read from stdin")]
        code: String,
        #[arg(long, help = "Card catalog (cards.json or imported cache)")]
        cards: PathBuf,
        #[arg(long, default_value = "Deck", help = "Name of the deck")]
        name: String,
    },
    /// Convert a cards.json file into the binary catalog cache
    ImportCards { json: PathBuf, output: PathBuf },
}

impl Args {
    #[must_use]
    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else if self.quiet {
            LevelFilter::Warn
        } else {
            LevelFilter::Info
        }
    }
}

/// Resolve a code argument, reading standard input for [`STDIN`].
pub fn read_code(code: String, mut stdin: impl Read) -> io::Result<String> {
    if code != STDIN {
        return Ok(code);
    }

    let mut code = String::new();
    stdin.read_to_string(&mut code)?;
    Ok(code)
}
