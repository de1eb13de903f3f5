//! Utility functions for the temp_forecast crate

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Number of items held out for testing: `ceil(len * test_ratio)`, at most `len`
pub fn test_size(len: usize, test_ratio: f64) -> usize {
    if len == 0 || test_ratio <= 0.0 {
        return 0;
    }
    ((len as f64 * test_ratio).ceil() as usize).min(len)
}

/// Split data into shuffled training and test sets.
///
/// The items are permuted with a generator seeded by `seed`; the first
/// `test_size` items of the permutation form the test set and the rest the
/// training set. The same seed always yields the same split.
pub fn train_test_split<T: Clone>(data: &[T], test_ratio: f64, seed: u64) -> (Vec<T>, Vec<T>) {
    let n_test = test_size(data.len(), test_ratio);

    let mut order: Vec<usize> = (0..data.len()).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    order.shuffle(&mut rng);

    let test = order[..n_test].iter().map(|&i| data[i].clone()).collect();
    let train = order[n_test..].iter().map(|&i| data[i].clone()).collect();

    (train, test)
}
