//! The recoloring pipeline.
//!
//! [`ColorChanger`] takes one capture (photo plus segmentation mattes) and
//! produces the photo with recolored hair and eyebrows:
//!
//! 1. the photo is resized to the matte resolution;
//! 2. face roll and eyebrow landmarks are detected with a deadline;
//! 3. the landmarks become an eyebrow matte, cut down to the portrait matte;
//! 4. hair and eyebrows are cut out, profiled and recolored in parallel;
//! 5. optionally a thickened eyebrow layer is built;
//! 6. layers are composited over the photo: hair, then eyebrows.
//!
//! Problems along the way are recorded in an [`ErrorLog`] and only the
//! stages that need the missing piece are skipped.

use brow_core::{Image, Matte};
use brow_ops::composite::{cut_out, multiply_mattes, over};
use brow_ops::resize::{resize_image, Filter};
use brow_ops::OpsResult;
use tracing::{debug, info, info_span};

use crate::colorist::{ColorTriple, PartColorist};
use crate::config::PipelineConfig;
use crate::context::RenderContext;
use crate::detect::{Detectors, EyebrowLandmarks};
use crate::error::ErrorLog;
use crate::lightness::LightnessProfiler;
use crate::matte::{conform, eyebrow_matte};
use crate::thicken::{thicken_image, thicken_matte};
use crate::PipelineError;

/// Face parts with their own colorist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FacePart {
    /// Head hair.
    Hair,
    /// Eyebrows as segmented.
    Eyebrows,
    /// Eyebrows after thickening.
    ThickEyebrows,
}

impl FacePart {
    /// Every part, in colorist order.
    pub const ALL: [FacePart; 3] = [FacePart::Hair, FacePart::Eyebrows, FacePart::ThickEyebrows];

    /// Position in the colorist array.
    pub const fn index(self) -> usize {
        match self {
            FacePart::Hair => 0,
            FacePart::Eyebrows => 1,
            FacePart::ThickEyebrows => 2,
        }
    }
}

/// One capture from the segmentation camera.
#[derive(Debug, Clone, Default)]
pub struct CaptureInputs {
    /// Full resolution photo.
    pub photo: Option<Image>,
    /// Hair segmentation matte.
    pub hair: Option<Matte>,
    /// Skin segmentation matte.
    pub skin: Option<Matte>,
    /// Person (portrait) matte.
    pub portrait: Option<Matte>,
}

impl CaptureInputs {
    /// Capture without a portrait matte.
    pub fn new(photo: Image, hair: Matte, skin: Matte) -> Self {
        Self {
            photo: Some(photo),
            hair: Some(hair),
            skin: Some(skin),
            portrait: None,
        }
    }

    /// Adds the portrait matte.
    pub fn with_portrait(mut self, portrait: Matte) -> Self {
        self.portrait = Some(portrait);
        self
    }
}

/// Target colors per part. Thickened eyebrows use the eyebrow colors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartColors {
    /// Hair colors.
    pub hair: ColorTriple,
    /// Eyebrow colors.
    pub eyebrows: ColorTriple,
}

impl PartColors {
    /// Same colors everywhere.
    pub fn uniform(colors: ColorTriple) -> Self {
        Self {
            hair: colors,
            eyebrows: colors,
        }
    }

    /// Colors configured in `config`.
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            hair: config.hair_colors(),
            eyebrows: config.colors,
        }
    }

    /// Colors of one part.
    pub fn for_part(&self, part: FacePart) -> ColorTriple {
        match part {
            FacePart::Hair => self.hair,
            FacePart::Eyebrows | FacePart::ThickEyebrows => self.eyebrows,
        }
    }
}

fn fresh_parts(gradient_width: usize) -> [PartColorist; 3] {
    std::array::from_fn(|_| PartColorist::new(gradient_width))
}

/// Cuts a part out, profiles it and stores both in `colorist`.
fn prepare_part(
    colorist: &mut PartColorist,
    photo: &Image,
    matte: Option<&Matte>,
    profiler: &LightnessProfiler,
) -> OpsResult<()> {
    let Some(matte) = matte else {
        return Ok(());
    };
    colorist.setup_photo(photo, matte)?;
    if let Some(part) = colorist.part() {
        let lightness = profiler.profile(part)?;
        colorist.setup_lightness(lightness)?;
    }
    Ok(())
}

/// Recolors hair and eyebrows of captured photos.
#[derive(Debug)]
pub struct ColorChanger {
    detectors: Detectors,
    original_photo: Option<Image>,
    photo: Option<Image>,
    hair: Option<Matte>,
    skin: Option<Matte>,
    portrait: Option<Matte>,
    eyebrow_matte: Option<Matte>,
    thick_matte: Option<Matte>,
    landmarks: Option<EyebrowLandmarks>,
    roll: Option<f64>,
    parts: [PartColorist; 3],
    image: Option<Image>,
    errors: ErrorLog,
}

impl ColorChanger {
    /// Changer using `detectors` for face roll and landmarks.
    pub fn new(detectors: Detectors) -> Self {
        Self {
            detectors,
            original_photo: None,
            photo: None,
            hair: None,
            skin: None,
            portrait: None,
            eyebrow_matte: None,
            thick_matte: None,
            landmarks: None,
            roll: None,
            parts: std::array::from_fn(|_| PartColorist::default()),
            image: None,
            errors: ErrorLog::new(),
        }
    }

    /// Runs the whole pipeline on one capture.
    ///
    /// Returns the composited image, or every recorded error when no image
    /// could be produced. On success the recoverable errors stay in the log
    /// (see [`drain_errors`](Self::drain_errors)).
    pub fn process(
        &mut self,
        ctx: &RenderContext,
        inputs: CaptureInputs,
        colors: &PartColors,
    ) -> Result<Image, Vec<PipelineError>> {
        let span = info_span!("process");
        let _enter = span.enter();
        ctx.install(|| {
            self.setup_photo(ctx, inputs);
            self.setup_colors(colors);
            self.make_image();
        });
        match &self.image {
            Some(image) => Ok(image.clone()),
            None => Err(self.errors.drain()),
        }
    }

    /// Loads a capture: resizes the photo, detects the face, builds mattes
    /// and prepares every part up to its lightness.
    ///
    /// Resets all previous state first.
    pub fn setup_photo(&mut self, ctx: &RenderContext, inputs: CaptureInputs) {
        self.clear();
        let cfg = ctx.config();
        self.parts = fresh_parts(cfg.gradient_width);

        let CaptureInputs {
            photo,
            hair,
            skin,
            portrait,
        } = inputs;

        let Some(photo) = photo else {
            self.errors.push(PipelineError::PhotoMissing);
            return;
        };
        self.original_photo = Some(photo.clone());

        let (Some(hair), Some(skin)) = (hair, skin) else {
            self.errors.push(PipelineError::SegmentationMatteMissing);
            self.photo = Some(photo);
            return;
        };

        let dims = hair.dimensions();
        let working = match resize_image(&photo, dims.0, dims.1, Filter::Lanczos3) {
            Ok(p) => p,
            Err(e) => {
                self.errors.push(e);
                self.photo = Some(photo);
                return;
            }
        };
        info!(
            from_w = photo.width(),
            from_h = photo.height(),
            to_w = dims.0,
            to_h = dims.1,
            "photo resized to matte"
        );

        let skin = match conform(&skin, dims) {
            Ok(s) => s,
            Err(e) => {
                self.errors.push(e);
                self.photo = Some(working);
                return;
            }
        };
        self.portrait = match portrait {
            None => {
                self.errors.push(PipelineError::PortraitMatteMissing);
                None
            }
            Some(p) => match conform(&p, dims) {
                Ok(p) => Some(p),
                Err(e) => {
                    self.errors.push(e);
                    None
                }
            },
        };
        self.photo = Some(working);
        self.hair = Some(hair);
        self.skin = Some(skin);

        self.locate_eyebrows(cfg, &photo);
        self.build_parts(cfg);
    }

    fn locate_eyebrows(&mut self, cfg: &PipelineConfig, original: &Image) {
        let (Some(photo), Some(hair), Some(skin)) = (&self.photo, &self.hair, &self.skin) else {
            return;
        };
        match self
            .detectors
            .detect(original, photo.dimensions(), cfg.detection_timeout())
        {
            Ok(found) => {
                for e in found.errors() {
                    self.errors.push(e);
                }
                self.roll = found.roll;
                self.landmarks = found.usable_landmarks().cloned();
            }
            Err(e) => {
                self.errors.push(e);
                return;
            }
        }

        let Some(landmarks) = &self.landmarks else {
            return;
        };
        let roll = self.roll.unwrap_or(0.0);
        let built = eyebrow_matte(hair, skin, landmarks, roll, &cfg.expansion, cfg.matte_mode)
            .and_then(|m| match &self.portrait {
                Some(p) => Ok(multiply_mattes(&m, p)?),
                None => Ok(m),
            });
        match built {
            Ok(m) => {
                debug!(coverage = m.coverage(0.5), "eyebrow matte ready");
                self.eyebrow_matte = Some(m);
            }
            Err(e) => self.errors.push(e),
        }
    }

    fn build_parts(&mut self, cfg: &PipelineConfig) {
        let Some(photo) = &self.photo else {
            return;
        };
        let profiler = LightnessProfiler::new(cfg.lightness.batch_size)
            .with_alpha_threshold(cfg.lightness.alpha_threshold);
        let [hair_c, brow_c, thick_c] = &mut self.parts;
        let hair_matte = self.hair.as_ref();
        let brow_matte = self.eyebrow_matte.as_ref();

        let (hair_res, brow_res) = rayon::join(
            || prepare_part(hair_c, photo, hair_matte, &profiler),
            || prepare_part(brow_c, photo, brow_matte, &profiler),
        );
        for res in [hair_res, brow_res] {
            if let Err(e) = res {
                self.errors.push(e);
            }
        }
        info!(
            hair = ?hair_c.state(),
            eyebrows = ?brow_c.state(),
            "parts prepared"
        );

        if !cfg.thicken.enabled {
            return;
        }
        let (Some(part), Some(matte), Some(lightness)) =
            (brow_c.part(), brow_matte, brow_c.lightness())
        else {
            return;
        };
        let t = &cfg.thicken;
        let start = self.roll.unwrap_or(0.0) + t.angle_offset;
        let thick = thicken_image(part, start, t.radius, t.times).and_then(|img| {
            let m = thicken_matte(matte, self.portrait.as_ref(), start, t)?;
            let cut = cut_out(&img, &m)?;
            Ok((cut, m))
        });
        match thick {
            Ok((cut, m)) => {
                let res = thick_c
                    .setup_part(cut)
                    .and_then(|_| thick_c.setup_lightness(lightness));
                if let Err(e) = res {
                    self.errors.push(e);
                }
                self.thick_matte = Some(m);
            }
            Err(e) => self.errors.push(e),
        }
    }

    /// Applies target colors to every prepared part, hair and eyebrows in
    /// parallel.
    pub fn setup_colors(&mut self, colors: &PartColors) {
        let [hair_c, brow_c, thick_c] = &mut self.parts;
        let (hair_res, (brow_res, thick_res)) = rayon::join(
            || hair_c.setup_color(colors.hair),
            || {
                rayon::join(
                    || brow_c.setup_color(colors.eyebrows),
                    || thick_c.setup_color(colors.eyebrows),
                )
            },
        );
        for res in [hair_res, brow_res, thick_res] {
            if let Err(e) = res {
                self.errors.push(e);
            }
        }
    }

    /// Applies target colors to one part.
    pub fn setup_color(&mut self, part: FacePart, colors: ColorTriple) -> OpsResult<()> {
        self.parts[part.index()].setup_color(colors)
    }

    /// Composites the recolored layers over the working photo.
    ///
    /// The hair layer goes first; the thickened eyebrow layer is used instead
    /// of the plain one when it exists.
    pub fn make_image(&mut self) -> Option<&Image> {
        self.image = None;
        let Some(photo) = &self.photo else {
            if !self.errors.contains(|e| matches!(e, PipelineError::PhotoMissing)) {
                self.errors.push(PipelineError::PhotoMissing);
            }
            return None;
        };
        let mut out = photo.clone();

        match self.parts[FacePart::Hair.index()].colored() {
            Some(layer) => match over(layer, &out) {
                Ok(img) => out = img,
                Err(e) => self.errors.push(e),
            },
            None => self.errors.push(PipelineError::HairLayerMissing),
        }

        let brow = if self.parts[FacePart::ThickEyebrows.index()].colored().is_some() {
            FacePart::ThickEyebrows
        } else {
            FacePart::Eyebrows
        };
        match self.parts[brow.index()].colored() {
            Some(layer) => match over(layer, &out) {
                Ok(img) => out = img,
                Err(e) => self.errors.push(e),
            },
            None => self.errors.push(PipelineError::EyebrowLayerMissing),
        }

        info!(eyebrows = ?brow, errors = self.errors.len(), "image composited");
        self.image = Some(out);
        self.image.as_ref()
    }

    /// Forgets the capture, every part and every recorded error.
    pub fn clear(&mut self) {
        self.original_photo = None;
        self.photo = None;
        self.hair = None;
        self.skin = None;
        self.portrait = None;
        self.eyebrow_matte = None;
        self.thick_matte = None;
        self.landmarks = None;
        self.roll = None;
        self.parts.iter_mut().for_each(PartColorist::clear);
        self.image = None;
        self.errors.clear();
    }

    /// Final image of the last run.
    pub fn image(&self) -> Option<&Image> {
        self.image.as_ref()
    }

    /// Photo as captured.
    pub fn original_photo(&self) -> Option<&Image> {
        self.original_photo.as_ref()
    }

    /// Photo at matte resolution.
    pub fn photo(&self) -> Option<&Image> {
        self.photo.as_ref()
    }

    /// Eyebrow matte, already cut to the portrait matte.
    pub fn eyebrow_matte(&self) -> Option<&Matte> {
        self.eyebrow_matte.as_ref()
    }

    /// Thickened eyebrow matte.
    pub fn thick_matte(&self) -> Option<&Matte> {
        self.thick_matte.as_ref()
    }

    /// Detected landmarks.
    pub fn landmarks(&self) -> Option<&EyebrowLandmarks> {
        self.landmarks.as_ref()
    }

    /// Detected face roll, radians.
    pub fn roll(&self) -> Option<f64> {
        self.roll
    }

    /// Colorist of one part.
    pub fn part(&self, part: FacePart) -> &PartColorist {
        &self.parts[part.index()]
    }

    /// Recorded errors.
    pub fn errors(&self) -> &ErrorLog {
        &self.errors
    }

    /// Removes and returns recorded errors.
    pub fn drain_errors(&mut self) -> Vec<PipelineError> {
        self.errors.drain()
    }

    /// Removes recorded errors, returning their newline-joined messages.
    pub fn take_error_message(&mut self) -> String {
        self.errors.take_message()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colorist::ColoristState;
    use brow_io::LandmarkFile;
    use std::sync::Arc;

    fn changer(file: LandmarkFile) -> ColorChanger {
        ColorChanger::new(Detectors::shared(Arc::new(file)))
    }

    fn ctx() -> RenderContext {
        RenderContext::new(PipelineConfig {
            threads: Some(2),
            ..PipelineConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn face_part_indices() {
        for (i, p) in FacePart::ALL.iter().enumerate() {
            assert_eq!(p.index(), i);
        }
    }

    #[test]
    fn missing_photo_is_fatal() {
        let mut c = changer(LandmarkFile::default());
        let errs = c
            .process(&ctx(), CaptureInputs::default(), &PartColors::uniform(ColorTriple::default()))
            .unwrap_err();
        assert!(matches!(errs[..], [PipelineError::PhotoMissing]));
        assert!(c.image().is_none());

        // Compositing again without a photo still reports it once.
        c.setup_photo(&ctx(), CaptureInputs::default());
        assert!(c.make_image().is_none());
        assert_eq!(c.drain_errors().len(), 1);
    }

    #[test]
    fn missing_segmentation_returns_photo() {
        let mut c = changer(LandmarkFile::default());
        let photo = Image::filled(4, 4, [0.3, 0.2, 0.1, 1.0]);
        let inputs = CaptureInputs {
            photo: Some(photo.clone()),
            ..CaptureInputs::default()
        };
        let out = c
            .process(&ctx(), inputs, &PartColors::uniform(ColorTriple::default()))
            .unwrap();
        assert_eq!(out, photo);
        assert!(c
            .errors()
            .contains(|e| matches!(e, PipelineError::SegmentationMatteMissing)));
    }

    #[test]
    fn no_face_still_recolors_hair() {
        let mut c = changer(LandmarkFile::default());
        let photo = Image::filled(8, 8, [0.5, 0.5, 0.5, 1.0]);
        let inputs = CaptureInputs::new(photo, Matte::filled(8, 8, 1.0), Matte::new(8, 8))
            .with_portrait(Matte::filled(8, 8, 1.0));
        let red = ColorTriple::new([1.0, 0.0, 0.0, 1.0], [1.0, 0.0, 0.0, 1.0], [1.0, 0.0, 0.0, 1.0]);
        let out = c.process(&ctx(), inputs, &PartColors::uniform(red)).unwrap();

        assert_eq!(out.pixel(3, 3), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(c.part(FacePart::Hair).state(), ColoristState::Ready);
        assert_eq!(c.part(FacePart::Eyebrows).state(), ColoristState::HasColor);
        let msg = c.take_error_message();
        assert!(msg.contains("There is no human."));
        assert!(msg.contains("Eyebrow layer is missing."));
        assert!(c.errors().is_empty());
    }

    #[test]
    fn clear_is_idempotent() {
        let mut c = changer(LandmarkFile::default());
        c.clear();
        c.clear();
        assert!(c.photo().is_none());
        assert!(c.errors().is_empty());
        assert_eq!(c.part(FacePart::ThickEyebrows).state(), ColoristState::Empty);
    }
}
