//! Lumen Visual Test Suite
//!
//! Visual regression tests for the Lumen effects. Every case drives effects
//! on a deterministic clock, paints them into a software
//! [`BitmapSurface`](lumen_core::BitmapSurface), writes the frame as PNG and
//! compares it with a stored reference image.
//!
//! # Test Categories
//!
//! - **shadows**: raw shadow bitmaps across levels and radii
//! - **elevation**: raised and flat components, settled and mid-animation
//! - **ripple**: ink ripple frames along a run
//! - **line**: focus underline growth
//! - **label**: text field with floating label and underline

pub mod config;
pub mod harness;
pub mod runner;
pub mod tests;

pub use config::SuiteConfig;
pub use harness::{TestContext, TestHarness, TestHarnessConfig, TestResult};
pub use runner::{RunResult, TestRunner, TestSuite};
