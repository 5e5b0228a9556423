use base::Vec2;

#[test]
fn test_size_area_and_empty() {
    assert_eq!(Vec2::new(640usize, 480).area(), 307200);
    assert!(Vec2::new(0usize, 480).is_empty());
    assert!(!Vec2::new(2usize, 2).is_empty());
}

#[test]
fn test_size_display() {
    assert_eq!(Vec2::new(1280usize, 720).to_string(), "1280x720");
}

#[test]
fn test_size_equality() {
    assert_eq!(Vec2::new(4usize, 3), Vec2::new(4, 3));
    assert_ne!(Vec2::new(4usize, 3), Vec2::new(3, 4));
}
