//! Test runner for executing test suites
//!
//! Manages test execution, result collection, and reporting.

use crate::harness::{TestContext, TestHarness, TestResult};
use anyhow::Result;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

type TestFn = Box<dyn FnOnce(&mut TestContext)>;

/// A single test case
pub struct TestCase {
    /// Test name
    pub name: String,
    /// Test category
    pub category: String,
    /// Surface size, or the harness default
    pub size: Option<(u32, u32)>,
    /// Test function
    pub test_fn: TestFn,
}

impl TestCase {
    pub fn new<F>(name: &str, category: &str, test_fn: F) -> Self
    where
        F: FnOnce(&mut TestContext) + 'static,
    {
        Self {
            name: name.to_string(),
            category: category.to_string(),
            size: None,
            test_fn: Box::new(test_fn),
        }
    }

    /// Full `category::name` identifier
    pub fn full_name(&self) -> String {
        format!("{}::{}", self.category, self.name)
    }

    fn matches(&self, pattern: &str) -> bool {
        self.name.contains(pattern) || self.category.contains(pattern)
    }
}

/// Result of running a test
pub struct TestRun {
    /// Test name
    pub name: String,
    /// Test category
    pub category: String,
    /// Test result
    pub result: TestResult,
    /// Time taken
    pub duration: Duration,
}

impl TestRun {
    pub fn is_passed(&self) -> bool {
        self.result.is_passed()
    }
}

/// Test suite containing multiple test cases
pub struct TestSuite {
    /// Suite name
    pub name: String,
    /// Test cases
    pub cases: Vec<TestCase>,
}

impl TestSuite {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            cases: Vec::new(),
        }
    }

    pub fn add<F>(&mut self, name: &str, test_fn: F) -> &mut Self
    where
        F: FnOnce(&mut TestContext) + 'static,
    {
        self.cases.push(TestCase::new(name, &self.name, test_fn));
        self
    }

    /// Add a test case rendered at a specific surface size
    pub fn add_with_size<F>(&mut self, name: &str, width: u32, height: u32, test_fn: F) -> &mut Self
    where
        F: FnOnce(&mut TestContext) + 'static,
    {
        let mut case = TestCase::new(name, &self.name, test_fn);
        case.size = Some((width, height));
        self.cases.push(case);
        self
    }
}

/// Test runner for executing suites
pub struct TestRunner {
    /// Test harness
    harness: TestHarness,
    /// Test suites to run
    suites: Vec<TestSuite>,
    /// Filter pattern (None = run all)
    filter: Option<String>,
}

impl TestRunner {
    /// Create a new test runner
    pub fn new() -> Result<Self> {
        Ok(Self::with_harness(TestHarness::new()?))
    }

    /// Create with custom harness
    pub fn with_harness(harness: TestHarness) -> Self {
        Self {
            harness,
            suites: Vec::new(),
            filter: None,
        }
    }

    /// Add a test suite
    pub fn add_suite(&mut self, suite: TestSuite) -> &mut Self {
        self.suites.push(suite);
        self
    }

    /// Set a filter pattern
    pub fn filter(&mut self, pattern: &str) -> &mut Self {
        self.filter = Some(pattern.to_string());
        self
    }

    /// Run all tests
    pub fn run(&mut self) -> RunResult {
        let start = Instant::now();
        let mut results = Vec::new();

        for suite in self.suites.drain(..) {
            tracing::info!("Running suite: {}", suite.name);

            for case in suite.cases {
                // Apply filter if set
                if let Some(ref pattern) = self.filter {
                    if !case.matches(pattern) {
                        continue;
                    }
                }

                let test_start = Instant::now();
                let full_name = case.full_name();

                tracing::debug!("Running test: {}", full_name);

                let outcome = match case.size {
                    Some((width, height)) => {
                        self.harness
                            .run_test_with_size(&full_name, width, height, case.test_fn)
                    }
                    None => self.harness.run_test(&full_name, case.test_fn),
                };
                let result = outcome.unwrap_or_else(|e| {
                    tracing::error!("Test {} failed with error: {:#}", full_name, e);
                    TestResult::Failed {
                        difference: 1.0,
                        diff_path: self.harness.diff_path(&full_name),
                    }
                });

                let duration = test_start.elapsed();
                if result.is_passed() {
                    tracing::info!("  ✓ {} ({:?})", case.name, duration);
                } else {
                    tracing::error!("  ✗ {} ({:?})", case.name, duration);
                }

                results.push(TestRun {
                    name: case.name,
                    category: case.category,
                    result,
                    duration,
                });
            }
        }

        RunResult::new(results, start.elapsed())
    }

    /// Get the harness
    pub fn harness(&self) -> &TestHarness {
        &self.harness
    }
}

/// Results from running tests
pub struct RunResult {
    /// Individual test results
    pub results: Vec<TestRun>,
    /// Total time taken
    pub duration: Duration,
}

impl RunResult {
    pub fn new(results: Vec<TestRun>, duration: Duration) -> Self {
        Self { results, duration }
    }

    /// Count of passed tests
    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.is_passed()).count()
    }

    /// Count of failed tests
    pub fn failed(&self) -> usize {
        self.results.iter().filter(|r| !r.is_passed()).count()
    }

    /// Count of tests that wrote a new reference image
    pub fn new_references(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.result, TestResult::PassedWithNewReference))
            .count()
    }

    /// Total test count
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// All tests passed
    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|r| r.is_passed())
    }

    /// Get results by category
    pub fn by_category(&self) -> BTreeMap<String, Vec<&TestRun>> {
        let mut map: BTreeMap<String, Vec<&TestRun>> = BTreeMap::new();
        for result in &self.results {
            map.entry(result.category.clone()).or_default().push(result);
        }
        map
    }

    /// Print summary
    pub fn print_summary(&self) {
        println!("\n╔══════════════════════════════════════════╗");
        println!("║           TEST RESULTS SUMMARY           ║");
        println!("╠══════════════════════════════════════════╣");
        println!("║  Passed:  {:>5}                          ║", self.passed());
        println!("║  Failed:  {:>5}                          ║", self.failed());
        println!("║  New ref: {:>5}                          ║", self.new_references());
        println!("║  Total:   {:>5}                          ║", self.total());
        println!("║  Time:    {:>8.2?}                      ║", self.duration);
        println!("╚══════════════════════════════════════════╝");

        if self.failed() > 0 {
            println!("\nFailed tests:");
            for result in &self.results {
                if let TestResult::Failed {
                    difference,
                    diff_path,
                } = &result.result
                {
                    println!(
                        "  ✗ {}::{} (diff {:.4}%, see {})",
                        result.category,
                        result.name,
                        difference * 100.0,
                        diff_path.display()
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::TestHarnessConfig;
    use lumen_core::Color;

    fn runner_in(dir: &std::path::Path) -> TestRunner {
        let harness = TestHarness::with_config(TestHarnessConfig {
            output_dir: dir.join("out"),
            reference_dir: dir.join("refs"),
            ..TestHarnessConfig::default()
        })
        .unwrap();
        TestRunner::with_harness(harness)
    }

    fn sample_suite() -> TestSuite {
        let mut suite = TestSuite::new("sample");
        suite.add("white", |ctx| ctx.clear(Color::WHITE));
        suite.add_with_size("small_black", 16, 8, |ctx| {
            assert_eq!(ctx.size.width, 16.0);
            ctx.clear(Color::BLACK);
        });
        suite
    }

    #[test]
    fn test_runs_every_case() {
        let dir = tempfile::tempdir().unwrap();
        let mut runner = runner_in(dir.path());
        runner.add_suite(sample_suite());

        let result = runner.run();
        assert_eq!(result.total(), 2);
        assert!(result.all_passed());
        assert_eq!(result.new_references(), 2);
        assert_eq!(result.by_category()["sample"].len(), 2);
    }

    #[test]
    fn test_filter_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let mut runner = runner_in(dir.path());
        runner.add_suite(sample_suite());
        runner.filter("small");

        let result = runner.run();
        assert_eq!(result.total(), 1);
        assert_eq!(result.results[0].name, "small_black");
    }

    #[test]
    fn test_filter_by_category() {
        let dir = tempfile::tempdir().unwrap();
        let mut runner = runner_in(dir.path());
        runner.add_suite(sample_suite());
        runner.filter("sample");
        assert_eq!(runner.run().total(), 2);

        let mut runner = runner_in(dir.path());
        runner.add_suite(sample_suite());
        runner.filter("nothing-matches");
        assert_eq!(runner.run().total(), 0);
    }
}
