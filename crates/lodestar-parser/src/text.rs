//! Free-text heuristics.
//!
//! Layout requests carry a few loosely structured strings: a `groupBy`
//! description naming a relationship, and qualitative force descriptions
//! such as `"strong attraction"`. This module turns them into names and
//! numbers.

use winnow::{
    Parser as _,
    ascii::{Caseless, multispace1},
    combinator::{not, preceded, terminated},
    error::ModalResult,
    token::{literal, one_of, take_while},
};

use lodestar_core::layout::{ForceKind, QuantifiedForce};

use crate::config::{Intensity, ParserConfig};

/// A keyword pattern locating a relationship name in free text.
#[derive(Debug, Clone, Copy)]
enum Pattern {
    /// `<word> keyword`
    Before(&'static str),
    /// `keyword <word>`
    After(&'static str),
}

/// Tried in order; the first pattern matching anywhere in the text wins.
const RELATIONSHIP_PATTERNS: [Pattern; 3] = [
    Pattern::Before("relationship"),
    Pattern::After("via"),
    Pattern::After("through"),
];

impl Pattern {
    fn parse_next<'a>(self, input: &mut &'a str) -> ModalResult<&'a str> {
        match self {
            Pattern::Before(keyword) => {
                terminated(
                    word,
                    (
                        multispace1,
                        literal(Caseless(keyword)),
                        not(one_of(is_word_char)),
                    ),
                )
                .parse_next(input)
            }
            Pattern::After(keyword) => {
                preceded((literal(Caseless(keyword)), multispace1), word).parse_next(input)
            }
        }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn word<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_while(1.., is_word_char).parse_next(input)
}

/// Byte offsets at which a word begins.
fn word_starts(text: &str) -> Vec<usize> {
    let mut starts = Vec::new();
    let mut previous_is_word = false;
    for (offset, c) in text.char_indices() {
        let current_is_word = is_word_char(c);
        if current_is_word && !previous_is_word {
            starts.push(offset);
        }
        previous_is_word = current_is_word;
    }
    starts
}

/// Extracts a relationship name from a free-text description.
///
/// Patterns are tried in order: `"<Name> relationship"`, `"via <Name>"`,
/// `"through <Name>"`. Keywords match case-insensitively. When none matches
/// the whole trimmed description is returned verbatim.
///
/// # Examples
///
/// ```
/// # use lodestar_parser::extract_relationship;
/// assert_eq!(extract_relationship("WorksAt relationship to Company"), "WorksAt");
/// assert_eq!(extract_relationship("via WorksOn"), "WorksOn");
/// assert_eq!(extract_relationship("Knows"), "Knows");
/// ```
pub fn extract_relationship(description: &str) -> String {
    let text = description.trim();
    let starts = word_starts(text);

    for pattern in RELATIONSHIP_PATTERNS {
        for &start in &starts {
            let mut input = &text[start..];
            if let Ok(name) = pattern.parse_next(&mut input) {
                return name.to_string();
            }
        }
    }
    text.to_string()
}

/// Converts a qualitative force description using the default constants.
///
/// # Examples
///
/// ```
/// # use lodestar_parser::parse_force_value;
/// # use lodestar_core::layout::ForceKind;
/// let force = parse_force_value("weak repulsion");
/// assert_eq!(force.strength(), -100.0);
/// assert_eq!(force.distance(), 5.0);
/// assert_eq!(force.kind(), ForceKind::Repulsion);
/// ```
pub fn parse_force_value(description: &str) -> QuantifiedForce {
    parse_force_value_with(description, &ParserConfig::default())
}

/// Converts a qualitative force description into a quantified force.
///
/// The intensity is the first of `strong`, `medium`, `weak` found in the text
/// (medium when none is). A description containing `repulsion` becomes a
/// repulsion whose strength is the negated intensity scaled onto the charge
/// range; `attraction` keeps the intensity as a spring constant; anything
/// else is a plain spring.
pub fn parse_force_value_with(description: &str, config: &ParserConfig) -> QuantifiedForce {
    let text = description.to_lowercase();
    let table = config.intensities();

    let Intensity { strength, distance } = if text.contains("strong") {
        table.strong
    } else if text.contains("medium") {
        table.medium
    } else if text.contains("weak") {
        table.weak
    } else {
        table.medium
    };

    if text.contains("repulsion") {
        QuantifiedForce::new(
            -strength * config.repulsion_scale(),
            distance,
            ForceKind::Repulsion,
        )
    } else if text.contains("attraction") {
        QuantifiedForce::new(strength, distance, ForceKind::Attraction)
    } else {
        QuantifiedForce::new(strength, distance, ForceKind::Spring)
    }
}
