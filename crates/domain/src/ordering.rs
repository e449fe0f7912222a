//! Deterministic display-name ordering used to pick defaults.
//!
//! Names compare the way a human-facing sort would. Base letters decide
//! first, ignoring accents and case, so `Éclairage` sorts next to `eclairage`
//! and before `Salon`. Accents break ties next (unaccented first), then case
//! (lowercase first). Equal names fall back to the identifier so the choice
//! never depends on map iteration order.

use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Compare two display names.
#[must_use]
pub fn compare_names(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(base_letters(b))
        .then_with(|| folded(a).cmp(folded(b)))
        .then_with(|| {
            a.chars()
                .map(char::is_uppercase)
                .cmp(b.chars().map(char::is_uppercase))
        })
        .then_with(|| a.cmp(b))
}

/// Lowercase letters with accents removed.
fn base_letters(name: &str) -> impl Iterator<Item = char> + '_ {
    folded(name).filter(|c| !is_combining_mark(*c))
}

/// Lowercase, canonically decomposed letters.
fn folded(name: &str) -> impl Iterator<Item = char> + '_ {
    name.nfd().flat_map(char::to_lowercase)
}

/// Return the key of the entry whose name sorts first.
pub fn first_by_name<'a, K, V, I, F>(entries: I, name: F) -> Option<&'a K>
where
    K: Ord + 'a,
    V: 'a,
    I: IntoIterator<Item = (&'a K, &'a V)>,
    F: Fn(&V) -> &str,
{
    entries
        .into_iter()
        .min_by(|(ka, va), (kb, vb)| compare_names(name(va), name(vb)).then_with(|| ka.cmp(kb)))
        .map(|(key, _)| key)
}
