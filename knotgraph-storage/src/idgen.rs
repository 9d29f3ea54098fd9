use knotgraph_api::NodeId;
use rand::Rng;

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Default length of generated node IDs. 36^12 leaves collisions
/// astronomically unlikely for any graph that fits in memory.
pub const DEFAULT_ID_LENGTH: usize = 12;

/// Shortest ID ever generated. Shorter requests are raised to this, so
/// `IdCollision` stays out of reach for realistic graph sizes.
pub const MIN_ID_LENGTH: usize = 8;

/// Generates a random lowercase alphanumeric node ID of `len` characters,
/// but never fewer than [`MIN_ID_LENGTH`].
pub fn generate_id(len: usize) -> NodeId {
    let mut rng = rand::thread_rng();
    let id: String = (0..len.max(MIN_ID_LENGTH))
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();
    NodeId::new(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_have_requested_length_and_alphabet() {
        for len in [8, 12, 32] {
            let id = generate_id(len);
            assert_eq!(id.as_str().len(), len);
            assert!(id.as_str().bytes().all(|b| ALPHABET.contains(&b)));
        }
    }

    #[test]
    fn short_lengths_are_raised_to_minimum() {
        for len in [0, 1, 7] {
            assert_eq!(generate_id(len).as_str().len(), MIN_ID_LENGTH);
        }
    }

    #[test]
    fn default_length_ids_do_not_repeat() {
        let ids: HashSet<_> = (0..10_000).map(|_| generate_id(DEFAULT_ID_LENGTH)).collect();
        assert_eq!(ids.len(), 10_000);
    }
}
