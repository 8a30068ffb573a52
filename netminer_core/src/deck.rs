use rand::{seq::SliceRandom, Rng};

use crate::{card::Card, error::GameError};

/// A fresh unshuffled deck with the fixed per-subtype composition.
pub fn build() -> Vec<Card> {
    Card::deck()
}

/// A uniformly random permutation of `deck`. The caller's sequence is left
/// untouched.
pub fn shuffle<R: Rng>(deck: &[Card], rng: &mut R) -> Vec<Card> {
    let mut shuffled = deck.to_vec();
    shuffled.shuffle(rng);
    shuffled
}

/// The first `n` cards and the remainder. Fails without dealing anything if
/// the deck holds fewer than `n` cards, so the caller can reshuffle the
/// discard pile first.
pub fn deal(deck: &[Card], n: usize) -> Result<(Vec<Card>, Vec<Card>), GameError> {
    if n > deck.len() {
        return Err(GameError::InsufficientCards {
            requested: n,
            available: deck.len(),
        });
    }
    Ok((deck[..n].to_vec(), deck[n..].to_vec()))
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use strum::IntoEnumIterator;

    use crate::{card::Card, deck, error::GameError};

    #[test]
    fn build_should_always_yield_the_fixed_composition() {
        for _ in 0..3 {
            let deck = deck::build();
            assert_eq!(deck.len(), 102);
            for card in Card::iter() {
                assert_eq!(deck.iter().filter(|&&c| c == card).count(), card.copies());
            }
        }
    }

    #[test]
    fn shuffle_should_permute_without_touching_the_input() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let deck = deck::build();
        let before = deck.clone();

        let shuffled = deck::shuffle(&deck, &mut rng);

        assert_eq!(deck, before);
        assert_eq!(shuffled.len(), deck.len());
        let mut sorted_a = shuffled.clone();
        let mut sorted_b = deck.clone();
        sorted_a.sort_by_key(|c| *c as usize);
        sorted_b.sort_by_key(|c| *c as usize);
        assert_eq!(sorted_a, sorted_b);
    }

    #[test]
    fn shuffle_should_spread_cards_evenly_over_positions() {
        // Coarse uniformity check: over many shuffles of ten distinct cards,
        // each card should land in front roughly a tenth of the time.
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let deck: Vec<Card> = Card::iter().take(10).collect();
        let trials = 3000;
        let mut first_counts = vec![0usize; deck.len()];

        for _ in 0..trials {
            let shuffled = deck::shuffle(&deck, &mut rng);
            let index = deck.iter().position(|c| *c == shuffled[0]).unwrap();
            first_counts[index] += 1;
        }

        let expected = trials / deck.len();
        for (i, &count) in first_counts.iter().enumerate() {
            assert!(
                count > expected / 2 && count < expected * 2,
                "card {i} was first {count} times, expected about {expected}"
            );
        }
    }

    #[test]
    fn deal_should_split_off_the_front() {
        let deck = vec![Card::Switch, Card::CableTwo, Card::Computer, Card::Audit];

        let (dealt, rest) = deck::deal(&deck, 2).unwrap();

        assert_eq!(dealt, vec![Card::Switch, Card::CableTwo]);
        assert_eq!(rest, vec![Card::Computer, Card::Audit]);
    }

    #[test]
    fn deal_should_fail_on_underflow() {
        let deck = vec![Card::Switch];

        assert_eq!(
            deck::deal(&deck, 2),
            Err(GameError::InsufficientCards {
                requested: 2,
                available: 1
            })
        );
    }
}
