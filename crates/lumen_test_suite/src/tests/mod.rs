//! Visual test cases organized by category

pub mod label;

use crate::runner::TestSuite;
use lumen_core::Color;

/// Light page color most cases paint on
pub const PAGE: Color = Color::rgb(0.92, 0.92, 0.94);

/// Create all test suites
pub fn all_suites() -> Vec<TestSuite> {
    vec![
        shadows::suite(),
        elevation::suite(),
        ripple::suite(),
        line::suite(),
        label::suite(),
    ]
}
