//! Test harness for visual tests
//!
//! Provides infrastructure for running visual tests, including:
//! - a deterministic clock and scheduler per test
//! - offscreen software rendering to PNG files
//! - reference image comparison

use anyhow::{Context, Result};
use image::{ImageBuffer, Rgba, RgbaImage};
use lumen_animation::{AnimationScheduler, Clock, ManualClock, SchedulerHandle};
use lumen_core::{load_png, save_png, BitmapSurface, Color, Size};
use std::path::{Path, PathBuf};

use crate::config::SuiteConfig;

/// Frames a test may pump while settling before it is considered stuck
const MAX_SETTLE_FRAMES: u32 = 10_000;

/// Result of a visual test
#[derive(Debug)]
pub enum TestResult {
    /// Test passed
    Passed,
    /// Test passed but reference image was created/updated
    PassedWithNewReference,
    /// Test failed with difference ratio
    Failed { difference: f32, diff_path: PathBuf },
}

impl TestResult {
    pub fn is_passed(&self) -> bool {
        matches!(
            self,
            TestResult::Passed | TestResult::PassedWithNewReference
        )
    }
}

/// Context for a single test
///
/// Each test gets its own clock and scheduler, so animation frames are
/// reproducible regardless of how fast the machine is.
pub struct TestContext {
    /// Surface the test paints into
    pub surface: BitmapSurface,
    /// Viewport size
    pub size: Size,
    /// Test name
    pub name: String,
    clock: ManualClock,
    scheduler: AnimationScheduler,
    frame_ms: u64,
}

impl TestContext {
    /// Create a new test context with a transparent surface
    pub fn new(name: &str, width: u32, height: u32, frame_ms: u64) -> Self {
        let clock = ManualClock::new();
        let scheduler = AnimationScheduler::with_clock(clock.clone());
        Self {
            surface: BitmapSurface::new(width, height),
            size: Size::new(width as f32, height as f32),
            name: name.to_string(),
            clock,
            scheduler,
            frame_ms: frame_ms.max(1),
        }
    }

    /// Get the surface to paint into
    pub fn surface(&mut self) -> &mut BitmapSurface {
        &mut self.surface
    }

    /// Handle for creating effects bound to this test's scheduler
    pub fn scheduler(&self) -> SchedulerHandle {
        self.scheduler.handle()
    }

    /// Current simulated time
    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Fill the whole surface with `color`
    pub fn clear(&mut self, color: Color) {
        self.surface.clear(color);
    }

    /// Let `ms` of simulated time pass, one frame at a time
    pub fn advance(&mut self, ms: u64) {
        let mut remaining = ms;
        while remaining > 0 {
            let step = remaining.min(self.frame_ms);
            self.clock.advance(step);
            self.scheduler.pump();
            remaining -= step;
        }
    }

    /// Run frames until every animation has finished
    pub fn settle(&mut self) {
        let mut frames = 0;
        while self.scheduler.pump() {
            if frames == MAX_SETTLE_FRAMES {
                tracing::warn!("Test '{}' did not settle after {} frames", self.name, frames);
                return;
            }
            self.clock.advance(self.frame_ms);
            frames += 1;
        }
    }
}

/// Test harness for running visual tests
pub struct TestHarness {
    /// Output directory for test results
    output_dir: PathBuf,
    /// Reference image directory
    reference_dir: PathBuf,
    /// Default viewport size
    default_size: (u32, u32),
    /// Difference threshold for visual comparison (0.0-1.0)
    threshold: f32,
    /// Simulated frame interval
    frame_ms: u64,
    /// Overwrite references instead of comparing against them
    update_references: bool,
}

impl TestHarness {
    /// Create a new test harness with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(TestHarnessConfig::default())
    }

    /// Create a new test harness with custom configuration
    pub fn with_config(config: TestHarnessConfig) -> Result<Self> {
        // Create output directories
        std::fs::create_dir_all(&config.output_dir).context("Failed to create output directory")?;
        std::fs::create_dir_all(&config.reference_dir)
            .context("Failed to create reference directory")?;

        Ok(Self {
            output_dir: config.output_dir,
            reference_dir: config.reference_dir,
            default_size: config.default_size,
            threshold: config.threshold,
            frame_ms: config.frame_ms,
            update_references: config.update_references,
        })
    }

    /// Create a test context with default size
    pub fn create_context(&self, name: &str) -> TestContext {
        self.create_context_with_size(name, self.default_size.0, self.default_size.1)
    }

    /// Create a test context with custom size
    pub fn create_context_with_size(&self, name: &str, width: u32, height: u32) -> TestContext {
        TestContext::new(name, width, height, self.frame_ms)
    }

    /// Compare two images and return the difference ratio (0.0 = identical, 1.0 = completely different)
    pub fn compare_images(img1: &RgbaImage, img2: &RgbaImage) -> f32 {
        if img1.dimensions() != img2.dimensions() {
            return 1.0; // Different sizes = completely different
        }

        let (width, height) = img1.dimensions();
        let total_pixels = width as f64 * height as f64;
        if total_pixels == 0.0 {
            return 0.0;
        }

        let diff_sum: f64 = img1
            .pixels()
            .zip(img2.pixels())
            .map(|(p1, p2)| {
                // Average of the per-channel differences
                (0..4)
                    .map(|c| (p1[c] as f64 - p2[c] as f64).abs() / 255.0)
                    .sum::<f64>()
                    / 4.0
            })
            .sum();

        (diff_sum / total_pixels) as f32
    }

    /// Generate a diff image highlighting differences between two images
    pub fn generate_diff_image(img1: &RgbaImage, img2: &RgbaImage) -> Option<RgbaImage> {
        if img1.dimensions() != img2.dimensions() {
            return None;
        }

        let (width, height) = img1.dimensions();
        let mut diff = ImageBuffer::new(width, height);

        for (x, y, p1) in img1.enumerate_pixels() {
            let p2 = img2.get_pixel(x, y);

            let max_diff = (0..4)
                .map(|c| (p1[c] as i32 - p2[c] as i32).abs())
                .max()
                .unwrap_or(0);

            // Highlight differences in red, show matching pixels dimmed
            if max_diff > 2 {
                diff.put_pixel(x, y, Rgba([255, 0, 0, 255]));
            } else {
                diff.put_pixel(x, y, Rgba([p1[0] / 3, p1[1] / 3, p1[2] / 3, 128]));
            }
        }

        Some(diff)
    }

    /// Run a test and save output as PNG
    pub fn run_test<F>(&self, name: &str, test_fn: F) -> Result<TestResult>
    where
        F: FnOnce(&mut TestContext),
    {
        self.run_test_with_size(name, self.default_size.0, self.default_size.1, test_fn)
    }

    /// Run a test with custom size and save output as PNG
    pub fn run_test_with_size<F>(
        &self,
        name: &str,
        width: u32,
        height: u32,
        test_fn: F,
    ) -> Result<TestResult>
    where
        F: FnOnce(&mut TestContext),
    {
        let mut ctx = self.create_context_with_size(name, width, height);
        test_fn(&mut ctx);

        for run in ctx.surface.text_runs() {
            tracing::debug!(
                "Test '{}': text {:?} at ({}, {}) size {}",
                name,
                run.text,
                run.origin.x,
                run.origin.y,
                run.style.size
            );
        }
        tracing::info!(
            "Test '{}': {}x{} frame at t={}ms, {} text runs",
            name,
            width,
            height,
            ctx.now_ms(),
            ctx.surface.text_runs().len()
        );

        let output = ctx.surface.into_bitmap();
        let output_path = self.output_path(name);
        save_png(&output, &output_path)
            .with_context(|| format!("Failed to write output for '{}'", name))?;

        self.compare_with_reference(name, &output, &output_path)
    }

    fn compare_with_reference(
        &self,
        name: &str,
        output: &RgbaImage,
        output_path: &Path,
    ) -> Result<TestResult> {
        let reference_path = self.reference_path(name);

        if self.update_references || !reference_path.exists() {
            std::fs::copy(output_path, &reference_path)
                .context("Failed to create reference image")?;
            tracing::info!(
                "Test '{}' created new reference at {:?}",
                name,
                reference_path
            );
            return Ok(TestResult::PassedWithNewReference);
        }

        let reference = load_png(&reference_path).context("Failed to open reference image")?;
        let difference = Self::compare_images(output, &reference);

        if difference <= self.threshold {
            tracing::info!("Test '{}' PASSED (diff: {:.4}%)", name, difference * 100.0);
            Ok(TestResult::Passed)
        } else {
            let diff_path = self.diff_path(name);
            if let Some(diff_img) = Self::generate_diff_image(output, &reference) {
                if let Err(e) = save_png(&diff_img, &diff_path) {
                    tracing::warn!("Failed to write diff image for '{}': {}", name, e);
                }
            }
            tracing::warn!(
                "Test '{}' FAILED (diff: {:.4}%, threshold: {:.4}%)",
                name,
                difference * 100.0,
                self.threshold * 100.0
            );
            Ok(TestResult::Failed {
                difference,
                diff_path,
            })
        }
    }

    /// Get the reference image path for a test
    pub fn reference_path(&self, name: &str) -> PathBuf {
        self.reference_dir.join(format!("{}.png", file_stem(name)))
    }

    /// Get the output image path for a test
    pub fn output_path(&self, name: &str) -> PathBuf {
        self.output_dir.join(format!("{}.png", file_stem(name)))
    }

    /// Get the diff image path for a test
    pub fn diff_path(&self, name: &str) -> PathBuf {
        self.output_dir.join(format!("{}_diff.png", file_stem(name)))
    }
}

/// `category::case` names become `category__case` file names
fn file_stem(name: &str) -> String {
    name.replace("::", "__")
}

/// Configuration for test harness
#[derive(Debug, Clone)]
pub struct TestHarnessConfig {
    /// Output directory for test results
    pub output_dir: PathBuf,
    /// Reference image directory
    pub reference_dir: PathBuf,
    /// Default viewport size
    pub default_size: (u32, u32),
    /// Difference threshold for visual comparison (0.0-1.0)
    pub threshold: f32,
    /// Simulated frame interval in milliseconds
    pub frame_ms: u64,
    /// Overwrite references with the new output
    pub update_references: bool,
}

impl Default for TestHarnessConfig {
    fn default() -> Self {
        Self::from(SuiteConfig::default())
    }
}

impl From<SuiteConfig> for TestHarnessConfig {
    fn from(config: SuiteConfig) -> Self {
        Self {
            output_dir: config.output_dir,
            reference_dir: config.reference_dir,
            default_size: (240, 120),
            threshold: config.threshold,
            frame_ms: config.frame_ms,
            update_references: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::{DrawSurfaceExt, Rect};

    fn harness_in(dir: &Path) -> TestHarness {
        TestHarness::with_config(TestHarnessConfig {
            output_dir: dir.join("out"),
            reference_dir: dir.join("refs"),
            ..TestHarnessConfig::default()
        })
        .unwrap()
    }

    fn solid(width: u32, height: u32, pixel: [u8; 4]) -> RgbaImage {
        ImageBuffer::from_pixel(width, height, Rgba(pixel))
    }

    #[test]
    fn test_compare_images() {
        let a = solid(4, 4, [0, 0, 0, 255]);
        let b = solid(4, 4, [255, 255, 255, 255]);

        assert_eq!(TestHarness::compare_images(&a, &a), 0.0);
        assert!((TestHarness::compare_images(&a, &b) - 0.75).abs() < 1e-6);
        assert_eq!(TestHarness::compare_images(&a, &solid(3, 4, [0; 4])), 1.0);
    }

    #[test]
    fn test_generate_diff_image() {
        let a = solid(2, 1, [90, 90, 90, 255]);
        let mut b = a.clone();
        b.put_pixel(1, 0, Rgba([200, 90, 90, 255]));

        let diff = TestHarness::generate_diff_image(&a, &b).unwrap();
        assert_eq!(diff.get_pixel(0, 0), &Rgba([30, 30, 30, 128]));
        assert_eq!(diff.get_pixel(1, 0), &Rgba([255, 0, 0, 255]));
        assert!(TestHarness::generate_diff_image(&a, &solid(1, 1, [0; 4])).is_none());
    }

    #[test]
    fn test_first_run_creates_reference_then_passes() {
        let dir = tempfile::tempdir().unwrap();
        let harness = harness_in(dir.path());
        let draw = |ctx: &mut TestContext| {
            ctx.clear(Color::WHITE);
            ctx.surface()
                .fill_rect(Rect::new(10.0, 10.0, 50.0, 20.0), Color::BLUE);
        };

        let first = harness.run_test("basic::rect", draw).unwrap();
        assert!(matches!(first, TestResult::PassedWithNewReference));
        assert!(harness.reference_path("basic::rect").exists());

        let second = harness.run_test("basic::rect", draw).unwrap();
        assert!(matches!(second, TestResult::Passed));
    }

    #[test]
    fn test_changed_output_fails_with_diff() {
        let dir = tempfile::tempdir().unwrap();
        let harness = harness_in(dir.path());

        harness
            .run_test("basic::color", |ctx| ctx.clear(Color::WHITE))
            .unwrap();
        let result = harness
            .run_test("basic::color", |ctx| ctx.clear(Color::BLACK))
            .unwrap();

        match result {
            TestResult::Failed {
                difference,
                diff_path,
            } => {
                assert!(difference > 0.5);
                assert!(diff_path.exists());
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn test_update_references_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = TestHarnessConfig {
            output_dir: dir.path().join("out"),
            reference_dir: dir.path().join("refs"),
            ..TestHarnessConfig::default()
        };
        let harness = TestHarness::with_config(config.clone()).unwrap();
        harness
            .run_test("basic::swap", |ctx| ctx.clear(Color::WHITE))
            .unwrap();

        config.update_references = true;
        let updating = TestHarness::with_config(config).unwrap();
        let result = updating
            .run_test("basic::swap", |ctx| ctx.clear(Color::BLACK))
            .unwrap();
        assert!(matches!(result, TestResult::PassedWithNewReference));

        let reference = load_png(harness.reference_path("basic::swap")).unwrap();
        assert_eq!(reference.get_pixel(0, 0), &Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_context_advances_in_frames() {
        let mut ctx = TestContext::new("frames", 8, 8, 16);
        ctx.advance(40);
        assert_eq!(ctx.now_ms(), 40);
        ctx.settle();
        assert_eq!(ctx.now_ms(), 40);
    }

    #[test]
    fn test_paths_flatten_category_separator() {
        let dir = tempfile::tempdir().unwrap();
        let harness = harness_in(dir.path());
        let path = harness.output_path("shadows::level_1");
        assert_eq!(path.file_name().unwrap(), "shadows__level_1.png");
    }
}
