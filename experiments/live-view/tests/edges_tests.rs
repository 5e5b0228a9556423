use {base::Vec2, live_view::*, video::*};

// left half black, right half white
fn step(width: usize, height: usize) -> Frame {
    let mut data = Vec::with_capacity(width * height * 3);
    for _ in 0..height {
        for x in 0..width {
            let v = if x < width / 2 { 0 } else { 255 };
            data.extend_from_slice(&[v, v, v]);
        }
    }
    Frame::new(Vec2::new(width, height), PixelLayout::Rgb, data).unwrap()
}

#[test]
fn test_finds_vertical_edge() {
    let mut frame = step(8, 5);
    EdgeTransform::default().apply(&mut frame).unwrap();

    assert_eq!(frame.layout, PixelLayout::Luma);
    assert_eq!(frame.size, Vec2::new(8, 5));
    for y in 1..4 {
        assert_eq!(frame.pixel(3, y), [255]);
        assert_eq!(frame.pixel(4, y), [255]);
        assert_eq!(frame.pixel(1, y), [0]);
        assert_eq!(frame.pixel(6, y), [0]);
    }
    // border rows stay black
    assert!((0..8).all(|x| frame.pixel(x, 0) == [0]));
}

#[test]
fn test_flat_image_has_no_edges() {
    let mut frame = Frame::new(Vec2::new(4, 4), PixelLayout::Luma, vec![128; 16]).unwrap();
    EdgeTransform::new(0).apply(&mut frame).unwrap();
    assert!(frame.data.iter().all(|&v| v == 0));
}

#[test]
fn test_tiny_frame() {
    let mut frame = Frame::new(Vec2::new(1, 1), PixelLayout::Rgba, vec![1, 2, 3, 255]).unwrap();
    EdgeTransform::default().apply(&mut frame).unwrap();
    assert_eq!(frame.data, vec![0]);
}

#[test]
fn test_rejects_broken_frame() {
    let mut frame = Frame::blank(Vec2::new(4, 4), PixelLayout::Rgb);
    frame.data.pop();
    assert!(EdgeTransform::default().apply(&mut frame).is_err());
}
