use super::*;
use crate::foundation::core::Fps;

#[test]
fn frame_paths_are_zero_padded() {
    let sink = PngSequenceSink::new("out");
    assert_eq!(
        sink.frame_path(FrameIndex(42)),
        Path::new("out").join("frame_00042.png")
    );
}

#[test]
fn writes_decodable_straight_alpha_pngs() {
    let dir = PathBuf::from("target").join("unit_png_sequence");
    let _ = std::fs::remove_dir_all(&dir);

    let frame = FrameRGBA {
        width: 2,
        height: 1,
        // Half-transparent red, premultiplied.
        data: vec![128, 0, 0, 128, 0, 0, 255, 255],
        premultiplied: true,
    };
    let mut sink = PngSequenceSink::new(&dir);
    sink.begin(SinkConfig {
        width: 2,
        height: 1,
        fps: Fps::default(),
    })
    .unwrap();
    sink.push_frame(FrameIndex(0), &frame).unwrap();
    sink.push_frame(FrameIndex(1), &frame).unwrap();
    sink.end().unwrap();
    assert_eq!(sink.written(), 2);

    let img = image::open(sink.frame_path(FrameIndex(1))).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (2, 1));
    assert_eq!(img.get_pixel(0, 0).0, [255, 0, 0, 128]);
    assert_eq!(img.get_pixel(1, 0).0, [0, 0, 255, 255]);
}
