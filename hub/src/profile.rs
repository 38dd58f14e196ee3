//! Random per-connection profiles.
//!
//! Assigned once on connect and never changed. Collisions between two
//! participants are acceptable; the profile is cosmetic, not an identity.

#[cfg(test)]
#[path = "profile_test.rs"]
mod tests;

use events::Profile;
use rand::Rng;
use rand::seq::IndexedRandom;

const ADJECTIVES: [&str; 12] = [
    "amber", "brisk", "cosmic", "dusty", "electric", "foggy", "gentle", "hollow", "ivory",
    "jolly", "keen", "lunar",
];

const CREATURES: [&str; 8] = [
    "gryphon", "fox", "owl", "newt", "lynx", "toad", "heron", "mole",
];

/// Assign a fresh random profile using the thread RNG.
#[must_use]
pub fn assign() -> Profile {
    assign_with(&mut rand::rng())
}

/// Assign a profile from an explicit RNG (tests).
pub fn assign_with(rng: &mut impl Rng) -> Profile {
    // The arrays are non-empty, so choose never returns None.
    let adjective = ADJECTIVES.choose(rng).copied().unwrap_or("quiet");
    let creature = CREATURES.choose(rng).copied().unwrap_or("gryphon");
    Profile {
        name: format!("{adjective} {creature}"),
        avatar: creature.to_owned(),
    }
}
