//! Progressive hint disclosure.
//!
//! A hint request walks three stages driven only by how many hints the player
//! has already consumed (`h`) for a subject with `H` canned hints and an
//! identifier of `N` characters:
//!
//! - `h < H`: the canned hint at index `h`
//! - `H <= h < H + N`: a letter reveal showing the first `h - H + 1` characters
//! - `h >= H + N`: exhausted, nothing left to show
//!
//! Nothing here mutates; the session decides whether to advance its counter.

use std::fmt;

use super::subject::Subject;

/// Character substituted for every unrevealed position of the identifier.
pub const MASK_CHAR: char = '_';

/// The engine's answer to a hint request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disclosure {
    /// Canned hint; `number` is 1-based for display.
    Hint { number: usize, text: String },
    /// Identifier with a revealed prefix and the rest masked.
    LetterReveal { revealed: usize, pattern: String },
    /// Every hint and every letter has already been shown.
    Exhausted,
}

impl Disclosure {
    /// Whether serving this disclosure consumes a hint.
    pub fn advances(&self) -> bool {
        !matches!(self, Disclosure::Exhausted)
    }
}

impl fmt::Display for Disclosure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Disclosure::Hint { number, text } => write!(f, "Hint #{}: {}", number, text),
            Disclosure::LetterReveal { pattern, .. } => write!(f, "Letter reveal: {}", pattern),
            Disclosure::Exhausted => {
                write!(f, "No more hints available! The answer has been fully revealed!")
            }
        }
    }
}

/// Compute what the next hint request should show.
pub fn next_disclosure(subject: &Subject, hints_consumed: usize) -> Disclosure {
    let canned = subject.hint_count();
    let letters = subject.identifier_len();

    if hints_consumed < canned {
        return Disclosure::Hint {
            number: hints_consumed + 1,
            text: subject.hints[hints_consumed].clone(),
        };
    }

    let reveal_step = hints_consumed - canned;
    if reveal_step < letters {
        let revealed = reveal_step + 1;
        return Disclosure::LetterReveal {
            revealed,
            pattern: letter_reveal(&subject.identifier, revealed),
        };
    }

    Disclosure::Exhausted
}

/// Show the first `revealed` characters of `identifier` and mask the rest.
///
/// The identifier is treated as an opaque character sequence: spaces and
/// punctuation past the prefix are masked like letters.
pub fn letter_reveal(identifier: &str, revealed: usize) -> String {
    identifier
        .chars()
        .enumerate()
        .map(|(i, c)| if i < revealed { c } else { MASK_CHAR })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::subject::SubjectPayload;

    fn subject(identifier: &str, hints: &[&str]) -> Subject {
        Subject::new(
            identifier,
            identifier,
            hints.iter().map(|h| h.to_string()).collect(),
            SubjectPayload::HouseCharacter {
                house: "Gryffindor".into(),
                ancestry: "half-blood".into(),
                patronus: "stag".into(),
                wand: "holly".into(),
                actor: String::new(),
                image_url: None,
            },
        )
        .unwrap()
    }

    #[test]
    fn canned_hints_are_served_in_order_and_repeatable() {
        let s = subject("Harry", &["a", "b", "c"]);
        for h in 0..3 {
            let first = next_disclosure(&s, h);
            let again = next_disclosure(&s, h);
            assert_eq!(first, again);
            assert_eq!(
                first,
                Disclosure::Hint {
                    number: h + 1,
                    text: s.hints[h].clone()
                }
            );
        }
    }

    #[test]
    fn reveal_prefix_grows_and_length_is_preserved() {
        let s = subject("Harry", &["a", "b"]);
        let mut last = 0;
        for h in 2..(2 + 5) {
            match next_disclosure(&s, h) {
                Disclosure::LetterReveal { revealed, pattern } => {
                    assert_eq!(revealed, h - 2 + 1);
                    assert!(revealed >= last);
                    last = revealed;
                    assert_eq!(pattern.chars().count(), 5);
                    let masked = pattern.chars().filter(|c| *c == MASK_CHAR).count();
                    assert_eq!(masked + revealed, 5);
                }
                other => panic!("expected letter reveal, got {:?}", other),
            }
        }
        assert_eq!(
            next_disclosure(&s, 2),
            Disclosure::LetterReveal {
                revealed: 1,
                pattern: "H____".into()
            }
        );
    }

    #[test]
    fn exhausted_after_every_letter() {
        let s = subject("Ron", &["a"]);
        assert_eq!(next_disclosure(&s, 4), Disclosure::Exhausted);
        assert_eq!(next_disclosure(&s, 40), Disclosure::Exhausted);
        assert!(!Disclosure::Exhausted.advances());
    }

    #[test]
    fn spaces_inside_identifier_are_masked() {
        assert_eq!(letter_reveal("New Zealand", 3), "New________");
        assert_eq!(letter_reveal("New Zealand", 4), "New _______");
        assert_eq!(letter_reveal("Ron", 3), "Ron");
    }

    #[test]
    fn display_matches_terminal_wording() {
        let hint = Disclosure::Hint {
            number: 2,
            text: "House: Gryffindor".into(),
        };
        assert_eq!(hint.to_string(), "Hint #2: House: Gryffindor");
        let reveal = Disclosure::LetterReveal {
            revealed: 1,
            pattern: "R__".into(),
        };
        assert_eq!(reveal.to_string(), "Letter reveal: R__");
    }
}
