//! Finite choice rosters
use rand::Rng;

use crate::error::CatalogError;

/// A closed, caller-supplied set of choices to draw from.
///
/// Replaces picking from an open-ended global registry: the roster holds
/// exactly the options the caller hands it and the RNG is injected per pick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster<T> {
    choices: Vec<T>,
}

impl<T> Roster<T> {
    /// Build a roster from at least one choice.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::EmptyRoster`] if `choices` is empty.
    pub fn new(choices: Vec<T>) -> Result<Self, CatalogError> {
        if choices.is_empty() {
            return Err(CatalogError::EmptyRoster);
        }
        Ok(Self { choices })
    }

    pub fn pick<R>(&self, rng: &mut R) -> &T
    where
        R: Rng + ?Sized,
    {
        &self.choices[rng.gen_range(0..self.choices.len())]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.choices.len()
    }

    /// Always false for a constructed roster.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.choices.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn empty_roster_is_rejected() {
        assert!(matches!(
            Roster::<u8>::new(Vec::new()),
            Err(CatalogError::EmptyRoster)
        ));
    }

    #[test]
    fn single_choice_always_wins() {
        let roster = Roster::new(vec!["rival"]).unwrap();
        let mut rng = SmallRng::seed_from_u64(9);
        for _ in 0..16 {
            assert_eq!(*roster.pick(&mut rng), "rival");
        }
    }

    #[test]
    fn picks_stay_inside_roster_and_are_seed_stable() {
        let roster = Roster::new(vec![1, 2, 3, 4]).unwrap();
        let mut first = SmallRng::seed_from_u64(42);
        let mut second = SmallRng::seed_from_u64(42);
        for _ in 0..32 {
            let a = *roster.pick(&mut first);
            let b = *roster.pick(&mut second);
            assert_eq!(a, b);
            assert!(roster.iter().any(|c| *c == a));
        }
        assert_eq!(roster.len(), 4);
        assert!(!roster.is_empty());
    }
}
