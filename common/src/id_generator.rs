use rand::Rng;

use crate::RoomId;

const ADJECTIVES: &[&str] = &[
    "swift", "brave", "clever", "mighty", "silent", "golden", "wild", "noble",
    "fierce", "gentle", "quick", "wise", "bold", "proud", "cunning", "sly",
];

const NOUNS: &[&str] = &[
    "falcon", "bear", "tiger", "wolf", "eagle", "dragon", "lion", "panther",
    "hawk", "fox", "raven", "cobra", "shark", "phoenix", "lynx", "viper",
];

pub fn generate_room_id() -> RoomId {
    let mut rng = rand::rng();
    let adjective = ADJECTIVES[rng.random_range(0..ADJECTIVES.len())];
    let noun = NOUNS[rng.random_range(0..NOUNS.len())];
    let number: u16 = rng.random_range(0..1000);
    RoomId::new(format!("{}-{}-{:03}", adjective, noun, number))
}

/// Draws ids until `is_taken` rejects none of them. Gives up after a bounded
/// number of attempts and falls back to a counter suffix.
pub fn generate_unique_room_id(mut is_taken: impl FnMut(&RoomId) -> bool) -> RoomId {
    for _ in 0..32 {
        let candidate = generate_room_id();
        if !is_taken(&candidate) {
            return candidate;
        }
    }

    let base = generate_room_id();
    let mut suffix = 1u64;
    loop {
        let candidate = RoomId::new(format!("{}-{}", base, suffix));
        if !is_taken(&candidate) {
            return candidate;
        }
        suffix += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generated_id_has_three_parts() {
        let id = generate_room_id();
        let parts: Vec<&str> = id.as_str().split('-').collect();

        assert_eq!(parts.len(), 3);
        assert!(ADJECTIVES.contains(&parts[0]));
        assert!(NOUNS.contains(&parts[1]));
        assert_eq!(parts[2].len(), 3);
    }

    #[test]
    fn test_unique_id_skips_taken_ids() {
        let mut seen = HashSet::new();
        for _ in 0..50 {
            let id = generate_unique_room_id(|candidate| seen.contains(candidate));
            assert!(seen.insert(id));
        }
    }

    #[test]
    fn test_unique_id_falls_back_to_suffix() {
        let mut calls = 0;
        let id = generate_unique_room_id(|_| {
            calls += 1;
            calls <= 32
        });

        assert!(id.as_str().ends_with("-1"));
    }
}
