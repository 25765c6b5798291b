use rand::Rng;
use rand::seq::SliceRandom;

use recall_core::model::Card;

/// Shuffles `cards` in place, every permutation equally likely.
///
/// `SliceRandom::shuffle` is a Fisher–Yates pass from the last element down,
/// swapping each position with a uniformly chosen index at or before it.
pub fn shuffle_cards<R: Rng + ?Sized>(cards: &mut [Card], rng: &mut R) {
    cards.shuffle(rng);
}
