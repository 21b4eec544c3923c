use crate::core::cards::CardIndex;
use rand::rngs::{OsRng, StdRng};
use rand::{Rng, RngCore, SeedableRng};

/// Fisher-Yates shuffle of a copy of `input`.
pub fn shuffle<T: Clone, R: Rng + ?Sized>(input: &[T], rng: &mut R) -> Vec<T> {
    let mut shuffled = input.to_vec();
    for k in (1..shuffled.len()).rev() {
        let j = rng.gen_range(0..=k);
        shuffled.swap(k, j);
    }
    shuffled
}

/// The 78 indices in deck order.
pub fn identity_deck() -> Vec<CardIndex> {
    CardIndex::all().collect()
}

pub fn shuffled_deck<R: Rng + ?Sized>(rng: &mut R) -> Vec<CardIndex> {
    shuffle(&identity_deck(), rng)
}

/// Shuffles with a generator seeded from `entropy`.
///
/// The order only drives how the fan is laid out, so an unavailable entropy
/// source degrades to the unshuffled deck instead of failing the draw.
pub fn shuffled_deck_seeded_from<E: RngCore>(entropy: E) -> Vec<CardIndex> {
    match StdRng::from_rng(entropy) {
        Ok(mut rng) => shuffled_deck(&mut rng),
        Err(e) => {
            tracing::warn!("Entropy source unavailable ({}); using deck order", e);
            identity_deck()
        }
    }
}

pub fn shuffled_deck_from_entropy() -> Vec<CardIndex> {
    shuffled_deck_seeded_from(OsRng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    struct BrokenEntropy;

    impl RngCore for BrokenEntropy {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(0);
        }

        fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
            Err(rand::Error::new(std::io::Error::new(
                std::io::ErrorKind::Other,
                "no entropy",
            )))
        }
    }

    #[test]
    fn test_shuffle_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(7);
        let deck = shuffled_deck(&mut rng);

        assert_eq!(deck.len(), 78);
        let unique: HashSet<_> = deck.iter().copied().collect();
        assert_eq!(unique.len(), 78);
        assert_ne!(deck, identity_deck());
    }

    #[test]
    fn test_shuffle_leaves_input_untouched() {
        let input: Vec<u32> = (0..10).collect();
        let mut rng = StdRng::seed_from_u64(1);
        let out = shuffle(&input, &mut rng);

        assert_eq!(input, (0..10).collect::<Vec<_>>());
        let mut sorted = out.clone();
        sorted.sort();
        assert_eq!(sorted, input);
    }

    #[test]
    fn test_shuffle_is_reproducible_with_same_seed() {
        let a = shuffled_deck(&mut StdRng::seed_from_u64(42));
        let b = shuffled_deck(&mut StdRng::seed_from_u64(42));
        let c = shuffled_deck(&mut StdRng::seed_from_u64(43));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_shuffle_small_inputs() {
        let mut rng = StdRng::seed_from_u64(3);
        assert!(shuffle::<u8, _>(&[], &mut rng).is_empty());
        assert_eq!(shuffle(&[9], &mut rng), vec![9]);
    }

    #[test]
    fn test_shuffle_positions_are_roughly_uniform() {
        const TRIALS: usize = 7_800;
        let mut rng = StdRng::seed_from_u64(2024);
        let mut counts = [0usize; 78];

        for _ in 0..TRIALS {
            let deck = shuffled_deck(&mut rng);
            let position = deck.iter().position(|c| c.get() == 0).unwrap();
            counts[position] += 1;
        }

        // 100 expected per position; the bounds are about five standard deviations
        for (position, count) in counts.iter().enumerate() {
            assert!(
                (50..=150).contains(count),
                "position {} saw the fool {} times",
                position,
                count
            );
        }
    }

    #[test]
    fn test_missing_entropy_falls_back_to_identity() {
        assert_eq!(shuffled_deck_seeded_from(BrokenEntropy), identity_deck());
    }

    #[test]
    fn test_entropy_shuffle_is_a_permutation() {
        let deck = shuffled_deck_from_entropy();
        let unique: HashSet<_> = deck.iter().copied().collect();
        assert_eq!(unique.len(), 78);
    }
}
