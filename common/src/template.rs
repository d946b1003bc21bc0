//! The text the game client puts on the clipboard when a deck is copied.
//!
//! ```text
//! ### Deck Name
//! # Class: Rogue
//! # Format: Wild
//! #
//! # 2x (1) Some Card
//! #
//! AAEBA...
//! #
//! # To use this deck, copy it to your clipboard and create a new deck in Hearthstone
//! ```

use std::fmt::{self, Display};

/// Start of a copied deck.
pub const NAME_PREFIX: &str = "###";

/// Trailer the game client appends after the deck code.
pub const FOOTER: &str = "To use this deck, copy it to your clipboard and create a new deck in Hearthstone";

/// Extract the deck code from a copied deck.
///
/// Input without the `###` header is assumed to be a bare deck code and only trimmed. Otherwise
/// the third to last `#`-separated segment is returned. Malformed templates are not detected here,
/// the garbage they produce fails to decode later on.
#[must_use]
pub fn unwrap(text: &str) -> &str {
    let text = text.trim();

    if !text.starts_with(NAME_PREFIX) {
        return text;
    }

    text.rsplit('#').nth(2).map_or("", str::trim)
}

/// One card line of a [`DeckTemplate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateLine {
    pub count: u32,
    pub cost: u32,
    pub name: String,
}

/// Copy-paste representation of a deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckTemplate {
    pub name: String,
    pub class_name: String,
    pub format_name: String,
    pub lines: Vec<TemplateLine>,
    pub code: String,
}

impl Display for DeckTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{NAME_PREFIX} {}", self.name)?;
        writeln!(f, "# Class: {}", self.class_name)?;
        writeln!(f, "# Format: {}", self.format_name)?;
        writeln!(f, "#")?;

        for TemplateLine { count, cost, name } in &self.lines {
            writeln!(f, "# {count}x ({cost}) {name}")?;
        }

        if !self.lines.is_empty() {
            writeln!(f, "#")?;
        }

        writeln!(f, "{}", self.code)?;
        writeln!(f, "#")?;
        writeln!(f, "# {FOOTER}")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const CODE: &str = "AAEBAd75AwTQ4wLD4QOd8AOh9AMN9bsC2+MC3+MCl+cCtIYD5dED390D590D/u4DvYAEkZ8E9p8E958EAA==";

    fn template(lines: Vec<TemplateLine>) -> DeckTemplate {
        DeckTemplate {
            name: "Thief Rogue".to_owned(),
            class_name: "Rogue".to_owned(),
            format_name: "Wild".to_owned(),
            lines,
            code: CODE.to_owned(),
        }
    }

    #[test]
    fn bare_code_unchanged() {
        assert_eq!(unwrap(CODE), CODE);
        assert_eq!(unwrap(unwrap(CODE)), CODE);
        assert_eq!(unwrap(&format!("\n  {CODE} \t")), CODE);
    }

    #[test]
    fn client_template() {
        let text = format!(
            "### Thief Rogue\n# Class: Rogue\n# Format: Wild\n# Year of the Hydra\n#\n\
             # 2x (1) Backstab\n# 1x (5) Some Legendary\n#\n{CODE}\n#\n# {FOOTER}\n"
        );
        assert_eq!(unwrap(&text), CODE);
    }

    #[test]
    fn windows_line_endings() {
        let text = format!("### Deck\r\n# Class: Rogue\r\n#\r\n{CODE}\r\n#\r\n# {FOOTER}\r\n");
        assert_eq!(unwrap(&text), CODE);
    }

    #[test]
    fn malformed_template() {
        assert_eq!(unwrap("### Name only"), "");
        assert_eq!(unwrap("###"), "");
    }

    #[test]
    fn written_template() {
        for lines in [
            vec![],
            vec![
                TemplateLine {
                    count: 2,
                    cost: 0,
                    name: "Backstab".to_owned(),
                },
                TemplateLine {
                    count: 1,
                    cost: 3,
                    name: "SI:7 Agent".to_owned(),
                },
            ],
        ] {
            let text = template(lines).to_string();

            assert!(text.starts_with("### Thief Rogue\n# Class: Rogue\n# Format: Wild\n#\n"));
            assert_eq!(unwrap(&text), CODE);
        }
    }

    #[test]
    fn card_lines() {
        let text = template(vec![TemplateLine {
            count: 2,
            cost: 0,
            name: "Backstab".to_owned(),
        }])
        .to_string();

        assert!(text.contains("\n# 2x (0) Backstab\n#\n"));
        assert!(text.ends_with(&format!("#\n# {FOOTER}\n")));
    }
}
