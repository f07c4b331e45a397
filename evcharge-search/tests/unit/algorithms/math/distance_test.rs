use super::*;

#[test]
fn can_calculate_euclidean_distance() {
    assert_eq!(euclidean_distance(&[0., 0.], &[3., 4.]), 5.);
    assert_eq!(euclidean_distance(&[1., 1., 1.], &[1., 1., 1.]), 0.);
}

#[test]
fn can_calculate_relative_distance() {
    assert_eq!(relative_distance([0., 0.].into_iter(), [0., 0.].into_iter()), 0.);

    let distance = relative_distance([1., 2.].into_iter(), [1., 4.].into_iter());
    assert!((distance - 0.5).abs() < 1e-9);
}
