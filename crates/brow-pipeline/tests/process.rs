//! Integration tests for ColorChanger with scripted detectors.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use brow_core::{Image, Matte};
use brow_math::Point;
use brow_pipeline::{
    CaptureInputs, ColorChanger, ColorTriple, Detectors, EyebrowLandmarks, FaceDetector, FacePart,
    LandmarkDetector, MatteMode, PartColors, PipelineConfig, PipelineError, RenderContext,
};

const W: u32 = 60;
const H: u32 = 40;
const SKIN: [f32; 4] = [0.9, 0.7, 0.6, 1.0];
const BROW: [f32; 4] = [0.2, 0.2, 0.2, 1.0];
const PURPLE: [f32; 4] = [0.5, 0.0, 0.5, 1.0];

/// Answers with fixed values after an optional delay.
struct Scripted {
    roll: Option<f64>,
    landmarks: Option<EyebrowLandmarks>,
    delay: Duration,
}

impl FaceDetector for Scripted {
    fn detect_face_roll(&self, _: &Image) -> Option<f64> {
        thread::sleep(self.delay);
        self.roll
    }
}

impl LandmarkDetector for Scripted {
    fn detect_eyebrow_landmarks(&self, _: &Image, _: (u32, u32)) -> Option<EyebrowLandmarks> {
        self.landmarks.clone()
    }
}

fn pts(raw: &[(f64, f64)]) -> Vec<Point> {
    raw.iter().map(|&(x, y)| Point::new(x, y)).collect()
}

fn landmarks() -> EyebrowLandmarks {
    EyebrowLandmarks {
        right: pts(&[(5.0, 20.0), (12.0, 17.0), (20.0, 19.0), (20.0, 24.0), (12.0, 23.0), (5.0, 25.0)]),
        left: pts(&[(55.0, 20.0), (48.0, 17.0), (40.0, 19.0), (40.0, 24.0), (48.0, 23.0), (55.0, 25.0)]),
    }
}

fn in_brow(x: u32, y: u32) -> bool {
    (20..23).contains(&y) && ((7..19).contains(&x) || (42..54).contains(&x))
}

fn scene() -> (Image, Matte, Matte) {
    let photo = Image::from_fn(W, H, |x, y| if in_brow(x, y) { BROW } else { SKIN });
    let hair = Matte::from_fn(W, H, |x, y| if in_brow(x, y) { 1.0 } else { 0.0 });
    let skin = Matte::from_fn(W, H, |x, y| 1.0 - hair.get(x, y));
    (photo, hair, skin)
}

fn inputs() -> CaptureInputs {
    let (photo, hair, skin) = scene();
    CaptureInputs::new(photo, hair, skin).with_portrait(Matte::filled(W, H, 1.0))
}

fn detectors(roll: Option<f64>, found: bool, delay: Duration) -> Detectors {
    Detectors::shared(Arc::new(Scripted {
        roll,
        landmarks: found.then(landmarks),
        delay,
    }))
}

fn ctx_with(config: PipelineConfig) -> RenderContext {
    RenderContext::new(PipelineConfig {
        threads: Some(2),
        ..config
    })
    .unwrap()
}

fn assert_close(got: [f32; 4], want: [f32; 4]) {
    for (g, w) in got.iter().zip(want) {
        approx::assert_abs_diff_eq!(*g, w, epsilon = 1e-4);
    }
}

fn purple() -> PartColors {
    PartColors::uniform(ColorTriple::new(PURPLE, PURPLE, PURPLE))
}

#[test]
fn recolors_eyebrows_and_leaves_skin() {
    let mut changer = ColorChanger::new(detectors(Some(0.0), true, Duration::ZERO));
    let out = changer
        .process(&ctx_with(PipelineConfig::default()), inputs(), &purple())
        .unwrap();

    assert!(changer.errors().is_empty(), "{}", changer.errors());
    assert_eq!(out.pixel(10, 21), PURPLE);
    assert_eq!(out.pixel(45, 21), PURPLE);
    assert_eq!(out.pixel(30, 21), SKIN);
    assert_eq!(out.pixel(2, 2), SKIN);
    assert_eq!(changer.part(FacePart::Eyebrows).state(), brow_pipeline::ColoristState::Ready);
}

#[test]
fn per_side_mode_matches_stitched_on_separated_brows() {
    let stitched = {
        let mut c = ColorChanger::new(detectors(Some(0.0), true, Duration::ZERO));
        c.process(&ctx_with(PipelineConfig::default()), inputs(), &purple())
            .unwrap();
        c.eyebrow_matte().cloned().unwrap()
    };
    let per_side = {
        let cfg = PipelineConfig {
            matte_mode: MatteMode::PerSide,
            ..PipelineConfig::default()
        };
        let mut c = ColorChanger::new(detectors(Some(0.0), true, Duration::ZERO));
        c.process(&ctx_with(cfg), inputs(), &purple()).unwrap();
        c.eyebrow_matte().cloned().unwrap()
    };
    // The gap between the brows has no hair, so both modes agree.
    assert_eq!(stitched, per_side);
}

#[test]
fn missing_roll_uses_zero() {
    let mut changer = ColorChanger::new(detectors(None, true, Duration::ZERO));
    let out = changer
        .process(&ctx_with(PipelineConfig::default()), inputs(), &purple())
        .unwrap();
    let errors = changer.drain_errors();
    assert!(matches!(errors[..], [PipelineError::FaceAngleFailed]));
    assert_eq!(changer.roll(), None);
    assert_eq!(out.pixel(10, 21), PURPLE);
}

#[test]
fn missing_landmarks_skip_eyebrows_only() {
    let mut changer = ColorChanger::new(detectors(Some(0.1), false, Duration::ZERO));
    let out = changer
        .process(&ctx_with(PipelineConfig::default()), inputs(), &purple())
        .unwrap();
    assert!(changer.eyebrow_matte().is_none());
    assert!(changer
        .errors()
        .contains(|e| matches!(e, PipelineError::LandmarkDetectionFailed)));
    assert!(changer
        .errors()
        .contains(|e| matches!(e, PipelineError::EyebrowLayerMissing)));
    // The brows are in the hair matte too, so the hair layer still reaches them.
    assert_eq!(out.pixel(10, 21), PURPLE);
}

#[test]
fn detection_timeout_is_recorded() {
    let cfg = PipelineConfig {
        detection_timeout_ms: 20,
        ..PipelineConfig::default()
    };
    let mut changer = ColorChanger::new(detectors(Some(0.0), true, Duration::from_millis(500)));
    let out = changer.process(&ctx_with(cfg), inputs(), &purple());
    assert!(out.is_ok());
    assert!(changer.landmarks().is_none());
    assert!(changer
        .errors()
        .contains(|e| matches!(e, PipelineError::DetectionTimedOut(_))));
}

#[test]
fn missing_portrait_is_recoverable() {
    let (photo, hair, skin) = scene();
    let mut changer = ColorChanger::new(detectors(Some(0.0), true, Duration::ZERO));
    let out = changer
        .process(
            &ctx_with(PipelineConfig::default()),
            CaptureInputs::new(photo, hair, skin),
            &purple(),
        )
        .unwrap();
    assert!(changer
        .errors()
        .contains(|e| matches!(e, PipelineError::PortraitMatteMissing)));
    assert_eq!(out.pixel(45, 21), PURPLE);
}

#[test]
fn output_follows_matte_resolution() {
    let (_, hair, skin) = scene();
    let big = Image::filled(W * 2, H * 2, SKIN);
    let mut changer = ColorChanger::new(detectors(Some(0.0), true, Duration::ZERO));
    let out = changer
        .process(
            &ctx_with(PipelineConfig::default()),
            CaptureInputs::new(big, hair, skin).with_portrait(Matte::filled(W, H, 1.0)),
            &purple(),
        )
        .unwrap();
    assert_eq!(out.dimensions(), (W, H));
    assert_eq!(changer.original_photo().unwrap().dimensions(), (W * 2, H * 2));
}

#[test]
fn thickening_grows_the_eyebrow_layer() {
    let mut cfg = PipelineConfig::default();
    cfg.thicken.enabled = true;
    let mut changer = ColorChanger::new(detectors(Some(0.0), true, Duration::ZERO));
    let out = changer.process(&ctx_with(cfg), inputs(), &purple()).unwrap();

    let plain = changer.eyebrow_matte().unwrap();
    let thick = changer.thick_matte().unwrap();
    assert!(thick.coverage(0.5) > plain.coverage(0.5));
    assert_eq!(
        changer.part(FacePart::ThickEyebrows).state(),
        brow_pipeline::ColoristState::Ready
    );
    // One row below the brow belongs to the thickened layer only.
    assert_close(out.pixel(10, 23), PURPLE);
}

#[test]
fn empty_landmarks_count_as_failed_detection() {
    let mut changer = ColorChanger::new(Detectors::shared(Arc::new(Scripted {
        roll: Some(0.0),
        landmarks: Some(EyebrowLandmarks::default()),
        delay: Duration::ZERO,
    })));
    changer
        .process(&ctx_with(PipelineConfig::default()), inputs(), &purple())
        .unwrap();
    assert!(changer.landmarks().is_none());
    assert!(changer.eyebrow_matte().is_none());
    let errors = changer.drain_errors();
    assert!(matches!(
        errors[..],
        [PipelineError::LandmarkDetectionFailed, PipelineError::EyebrowLayerMissing]
    ));
}

#[test]
fn thickening_follows_face_roll() {
    let thick_matte = |roll: f64| {
        let mut cfg = PipelineConfig {
            matte_mode: MatteMode::PerSide,
            ..PipelineConfig::default()
        };
        cfg.thicken.enabled = true;
        cfg.thicken.radius = 5.0;
        cfg.thicken.times = 2;
        cfg.thicken.matte_polynomial = [0.0, 1.0, 0.0, 0.0];
        cfg.thicken.bloom_radius = 0;
        cfg.thicken.bloom_intensity = 0.0;
        let mut changer = ColorChanger::new(detectors(Some(roll), true, Duration::ZERO));
        changer.process(&ctx_with(cfg), inputs(), &purple()).unwrap();
        assert_eq!(changer.eyebrow_matte().unwrap().get(10, 21), 1.0);
        changer.thick_matte().cloned().unwrap()
    };

    // Level face: the second copy sits five pixels to the left.
    let level = thick_matte(0.0);
    approx::assert_abs_diff_eq!(level.get(3, 21), 1.0, epsilon = 1e-4);
    assert!(level.get(10, 16) < 1e-4);

    // Quarter-turned face: the same copy sits five pixels up instead.
    let turned = thick_matte(std::f64::consts::FRAC_PI_2);
    approx::assert_abs_diff_eq!(turned.get(10, 16), 1.0, epsilon = 1e-4);
    assert!(turned.get(3, 21) < 1e-4);
}
