use rstest::rstest;
use temp_forecast::utils::{test_size, train_test_split};

#[rstest]
#[case(48, 10)]
#[case(5, 1)]
#[case(100, 20)]
#[case(1, 1)]
fn test_holdout_size(#[case] len: usize, #[case] expected: usize) {
    assert_eq!(test_size(len, 0.2), expected);
}

#[test]
fn test_split_covers_every_item_once() {
    let data: Vec<usize> = (0..97).collect();
    let (train, test) = train_test_split(&data, 0.2, 42);

    assert_eq!(test.len(), 20);
    assert_eq!(train.len(), 77);

    let mut seen = vec![false; data.len()];
    for i in train.iter().chain(test.iter()) {
        assert!(!seen[*i], "item {} appears twice", i);
        seen[*i] = true;
    }
    assert!(seen.into_iter().all(|s| s));
}

#[test]
fn test_split_is_shuffled() {
    let data: Vec<usize> = (0..200).collect();
    let (_, test) = train_test_split(&data, 0.2, 42);
    assert_ne!(test, (0..40).collect::<Vec<_>>());
}

#[test]
fn test_seed_reproducibility() {
    let data: Vec<usize> = (0..64).collect();
    assert_eq!(
        train_test_split(&data, 0.25, 42),
        train_test_split(&data, 0.25, 42)
    );
}
