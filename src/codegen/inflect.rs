//! English plural to singular inflection.
//!
//! Only the trailing word of a camel-cased name is inflected, so
//! `OrderItems` becomes `OrderItem` and `UserPeople` becomes `UserPerson`.

use std::collections::HashMap;

use cruet::to_singular;

/// Turns a (possibly plural) name into its singular form.
pub trait Singularize {
    fn singularize(&self, name: &str) -> String;
}

impl<F> Singularize for F
where
    F: Fn(&str) -> String,
{
    fn singularize(&self, name: &str) -> String {
        self(name)
    }
}

/// English inflection backed by `cruet`.
#[derive(Clone, Copy, Debug, Default)]
pub struct English;

/// Leaves names untouched.
#[derive(Clone, Copy, Debug, Default)]
pub struct Verbatim;

impl Singularize for Verbatim {
    fn singularize(&self, name: &str) -> String {
        name.to_string()
    }
}

lazy_static! {
    /// Plurals missing from `cruet`'s rules, keyed by plural.
    static ref IRREGULAR: HashMap<&'static str, &'static str> = HashMap::from([
        ("people", "person"),
        ("children", "child"),
        ("moves", "move"),
        ("zombies", "zombie"),
    ]);
}

impl Singularize for English {
    fn singularize(&self, name: &str) -> String {
        let start = last_word_start(name);
        let (head, word) = name.split_at(start);
        format!("{}{}", head, singular_word(word))
    }
}

/// Byte offset where the trailing camel-case word begins. An upper-case
/// letter starts a word unless it follows another upper-case letter.
fn last_word_start(name: &str) -> usize {
    let mut start = 0;
    let mut prev_upper = false;
    for (i, c) in name.char_indices() {
        let upper = c.is_uppercase();
        if upper && !prev_upper {
            start = i;
        }
        prev_upper = upper;
    }
    start
}

fn singular_word(word: &str) -> String {
    let lower = word.to_lowercase();
    if lower.is_empty() {
        return word.to_string();
    }

    let singular = match IRREGULAR.get(lower.as_str()) {
        Some(singular) => singular.to_string(),
        None => to_singular(&lower),
    };
    // never reduce a word to nothing
    if singular.is_empty() || singular == lower {
        return word.to_string();
    }

    restore_case(word, &singular)
}

/// Gives `singular` the casing of `word`: all upper, capitalized or lower.
fn restore_case(word: &str, singular: &str) -> String {
    let mut chars = word.chars();
    let all_upper = word.chars().count() > 1
        && word.chars().any(|c| c.is_alphabetic())
        && word.chars().all(|c| !c.is_lowercase());

    if all_upper {
        singular.to_uppercase()
    } else if chars.next().is_some_and(char::is_uppercase) {
        capitalize(singular)
    } else {
        singular.to_string()
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
