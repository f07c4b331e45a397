use super::*;

#[test]
fn can_replay_sequence_with_same_seed() {
    let first = DefaultRandom::new_with_seed(42);
    let second = DefaultRandom::new_with_seed(42);

    let first_values: Vec<i32> = (0..16).map(|_| first.uniform_int(0, 1000)).collect();
    let second_values: Vec<i32> = (0..16).map(|_| second.uniform_int(0, 1000)).collect();

    assert_eq!(first_values, second_values);
}

#[test]
fn can_produce_different_sequences_with_different_seeds() {
    let first = DefaultRandom::new_with_seed(1);
    let second = DefaultRandom::new_with_seed(2);

    let first_values: Vec<i32> = (0..16).map(|_| first.uniform_int(0, 1000)).collect();
    let second_values: Vec<i32> = (0..16).map(|_| second.uniform_int(0, 1000)).collect();

    assert_ne!(first_values, second_values);
}

#[test]
fn can_keep_uniform_int_within_bounds() {
    let random = DefaultRandom::new_with_seed(123);

    for _ in 0..256 {
        let value = random.uniform_int(-5, 5);
        assert!((-5..=5).contains(&value));
    }

    assert_eq!(random.uniform_int(7, 7), 7);
}

#[test]
fn can_keep_uniform_real_within_bounds() {
    let random = DefaultRandom::new_with_seed(123);

    for _ in 0..256 {
        let value = random.uniform_real(0.5, 2.5);
        assert!((0.5..2.5).contains(&value));
    }

    assert_eq!(random.uniform_real(1.5, 1.5), 1.5);
}

#[test]
fn can_handle_degenerate_probabilities() {
    let random = DefaultRandom::new_with_seed(123);

    assert!(!random.is_hit(0.));
    assert!(random.is_hit(1.));
}

#[test]
fn can_sample_weighted_index() {
    let random = DefaultRandom::new_with_seed(9);

    for _ in 0..32 {
        assert!(random.weighted(&[1, 10, 100]) < 3);
    }
}

#[test]
fn can_advance_state_between_calls() {
    let random = DefaultRandom::new_with_seed(42);

    let values: Vec<i32> = (0..8).map(|_| random.uniform_int(0, 1_000_000)).collect();
    let distinct: std::collections::HashSet<_> = values.iter().collect();

    assert!(distinct.len() > 1);
}
