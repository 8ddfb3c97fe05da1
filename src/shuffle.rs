use rand::Rng;

/// Uniform in-place Fisher-Yates shuffle.
///
/// Every permutation of `items` is equally likely given a uniform `rng`.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}
