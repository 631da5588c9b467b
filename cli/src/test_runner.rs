use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use query::Structure;
use wall::Wall;

use crate::scenario::{Expectations, Scenario};

const TEST_SUFFIX: &str = ".test.toml";

pub enum TestOutcome {
    Pass,
    Fail(String),
}

pub struct TestResult {
    pub path: PathBuf,
    pub description: Option<String>,
    pub outcome: TestOutcome,
}

impl TestResult {
    fn new(path: &Path, description: Option<String>, outcome: TestOutcome) -> Self {
        TestResult {
            path: path.to_path_buf(),
            description,
            outcome,
        }
    }
}

fn run_single_test(path: &Path) -> TestResult {
    // 1. Read file
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            return TestResult::new(
                path,
                None,
                TestOutcome::Fail(format!("cannot read file: {}", e)),
            );
        }
    };

    // 2. Parse scenario
    let scenario = match Scenario::parse(&content, 0) {
        Ok(s) => s,
        Err(e) => {
            return TestResult::new(
                path,
                None,
                TestOutcome::Fail(format!("scenario error: {}", e.message)),
            );
        }
    };

    let description = scenario.description.clone();
    let expect = &scenario.expect;

    // 3. Build the wall, checking any expected construction error
    let outcome = match (scenario.build(0), &expect.error) {
        (Err(err), Some(expected_err)) => {
            if err.message.contains(expected_err.as_str()) {
                TestOutcome::Pass
            } else {
                TestOutcome::Fail(format!(
                    "expected error containing \"{}\", got: {}",
                    expected_err, err.message
                ))
            }
        }
        (Ok(_), Some(expected_err)) => TestOutcome::Fail(format!(
            "expected error containing \"{}\", but construction succeeded",
            expected_err
        )),
        (Err(err), None) => TestOutcome::Fail(format!("unexpected error: {}", err.message)),
        // 4. Run the queries
        (Ok(wall), None) => match check_expectations(&wall, expect) {
            Some(reason) => TestOutcome::Fail(reason),
            None => TestOutcome::Pass,
        },
    };

    TestResult::new(path, description, outcome)
}

/// Check query results against expectations. Returns `Some(reason)` on mismatch.
fn check_expectations(wall: &Wall, expect: &Expectations) -> Option<String> {
    if let Some(expected) = expect.count {
        let actual = wall.count();
        if actual != expected {
            return Some(format!("count: expected {}, got {}", expected, actual));
        }
    }

    for check in &expect.color {
        match (wall.find_block_by_color(&check.color), check.found) {
            (None, true) => {
                return Some(format!("color \"{}\": expected a block, found none", check.color));
            }
            (Some(block), false) => {
                return Some(format!(
                    "color \"{}\": expected no block, found one of {}",
                    check.color,
                    block.material()
                ));
            }
            (Some(block), true) => {
                if let Some(material) = &check.material {
                    if block.material() != material {
                        return Some(format!(
                            "color \"{}\": expected a block of {}, found one of {}",
                            check.color,
                            material,
                            block.material()
                        ));
                    }
                }
            }
            (None, false) => {}
        }
    }

    for check in &expect.material {
        let actual: Vec<&str> = wall
            .find_blocks_by_material(&check.material)
            .into_iter()
            .map(|block| block.color())
            .collect();
        if actual != check.colors {
            return Some(format!(
                "material \"{}\": colors mismatch\n  expected: [{}]\n  actual:   [{}]",
                check.material,
                check.colors.join(", "),
                actual.join(", ")
            ));
        }
    }

    None
}

/// Scenario files found under a root, grouped by category (subfolder
/// relative to the root; files directly in the root get category "").
#[derive(Default)]
struct Discovery {
    categories: BTreeMap<String, Vec<PathBuf>>,
    /// Directories that could not be listed, with the reason.
    unreadable: Vec<(PathBuf, String)>,
}

impl Discovery {
    fn scan(root: &Path) -> Self {
        let mut discovery = Discovery::default();
        let mut dirs = vec![root.to_path_buf()];
        while let Some(dir) = dirs.pop() {
            let entries = match std::fs::read_dir(&dir) {
                Ok(entries) => entries,
                Err(e) => {
                    discovery.unreadable.push((dir, e.to_string()));
                    continue;
                }
            };
            for entry in entries.flatten() {
                let path = entry.path();
                if path.is_dir() {
                    dirs.push(path);
                } else if is_scenario_file(&path) {
                    discovery.add(root, path);
                }
            }
        }
        for files in discovery.categories.values_mut() {
            files.sort();
        }
        discovery
    }

    fn add(&mut self, root: &Path, path: PathBuf) {
        let category = path
            .parent()
            .and_then(|p| p.strip_prefix(root).ok())
            .map(|p| p.to_string_lossy().replace('\\', "/"))
            .unwrap_or_default();
        self.categories.entry(category).or_default().push(path);
    }

    fn report_unreadable(&self) {
        for (dir, reason) in &self.unreadable {
            eprintln!("warning: cannot read {}: {}", dir.display(), reason);
        }
    }
}

fn is_scenario_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| name.ends_with(TEST_SUFFIX))
}

fn category_label(category: &str) -> &str {
    if category.is_empty() { "(root)" } else { category }
}

/// List available categories for the given test path.
pub fn list_categories(path: &Path) {
    if path.is_file() {
        eprintln!("(single file, no categories)");
        return;
    }

    let discovery = Discovery::scan(path);
    discovery.report_unreadable();
    if discovery.categories.is_empty() {
        eprintln!("no {} files found in {}", TEST_SUFFIX, path.display());
        return;
    }

    eprintln!("available categories:");
    for (cat, files) in &discovery.categories {
        eprintln!("  {} ({} tests)", category_label(cat), files.len());
    }
}

/// Wrap `text` in an ANSI SGR sequence unless color is off.
fn paint(text: &str, sgr: &str, no_color: bool) -> String {
    if no_color {
        text.to_string()
    } else {
        format!("\x1b[{}m{}\x1b[0m", sgr, text)
    }
}

fn label_for<'a>(result: &'a TestResult) -> &'a str {
    result.description.as_deref().unwrap_or_else(|| {
        result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .map(|s| s.trim_end_matches(TEST_SUFFIX))
            .unwrap_or("?")
    })
}

fn print_failures(failures: &[TestResult]) {
    eprintln!();
    eprintln!("failures:");
    for f in failures {
        eprintln!();
        eprintln!("  --- {} ---", f.path.display());
        if let TestOutcome::Fail(reason) = &f.outcome {
            for line in reason.lines() {
                eprintln!("  {}", line);
            }
        }
    }
}

/// Select the categories to run. Unknown requested categories are reported.
fn filter_categories<'a>(
    all_categories: &'a BTreeMap<String, Vec<PathBuf>>,
    requested: &[String],
) -> BTreeMap<&'a str, &'a Vec<PathBuf>> {
    if requested.is_empty() {
        return all_categories.iter().map(|(k, v)| (k.as_str(), v)).collect();
    }

    let mut filtered = BTreeMap::new();
    for name in requested {
        let req = name.trim_matches('/');
        let mut found = false;
        for (cat, files) in all_categories {
            if cat == req || cat.starts_with(&format!("{}/", req)) {
                filtered.insert(cat.as_str(), files);
                found = true;
            }
        }
        if !found {
            eprintln!(
                "warning: category '{}' not found (available: {})",
                req,
                all_categories
                    .keys()
                    .map(|k| category_label(k))
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
    }
    filtered
}

/// Run all `.test.toml` files under `path` (or a single file).
/// If `categories` is non-empty, only run tests in those categories.
/// Returns exit code: 0 = all pass, 1 = any failure.
pub fn run_tests(path: &Path, no_color: bool, categories: &[String]) -> i32 {
    // Single file mode, categories ignored
    if path.is_file() {
        let result = run_single_test(path);
        return match &result.outcome {
            TestOutcome::Pass => {
                eprintln!("  {}  {}", paint("PASS", "32", no_color), label_for(&result));
                eprintln!();
                eprintln!("test result: {}. 1 passed, 0 failed", paint("ok", "32", no_color));
                0
            }
            TestOutcome::Fail(_) => {
                eprintln!("  {}  {}", paint("FAIL", "31", no_color), label_for(&result));
                print_failures(std::slice::from_ref(&result));
                eprintln!();
                eprintln!(
                    "test result: {}. 0 passed, 1 failed (of 1)",
                    paint("FAILED", "31", no_color)
                );
                1
            }
        };
    }

    let discovery = Discovery::scan(path);
    discovery.report_unreadable();
    if discovery.categories.is_empty() {
        eprintln!("no {} files found in {}", TEST_SUFFIX, path.display());
        return 1;
    }

    let run_categories = filter_categories(&discovery.categories, categories);
    if run_categories.is_empty() {
        eprintln!("no matching categories found");
        return 1;
    }

    let mut passed = 0usize;
    let mut failed = 0usize;
    let mut failures: Vec<TestResult> = Vec::new();

    for (cat, files) in &run_categories {
        eprintln!();
        eprintln!("{}", paint(category_label(cat), "1", no_color));

        for file in *files {
            let result = run_single_test(file);
            match &result.outcome {
                TestOutcome::Pass => {
                    passed += 1;
                    eprintln!("  {}  {}", paint("PASS", "32", no_color), label_for(&result));
                }
                TestOutcome::Fail(_) => {
                    failed += 1;
                    eprintln!("  {}  {}", paint("FAIL", "31", no_color), label_for(&result));
                    failures.push(result);
                }
            }
        }
    }

    if !failures.is_empty() {
        print_failures(&failures);
    }

    eprintln!();
    if failed == 0 && discovery.unreadable.is_empty() {
        eprintln!("test result: {}. {} passed, 0 failed", paint("ok", "32", no_color), passed);
        0
    } else if failed == 0 {
        eprintln!(
            "test result: {}. {} passed, 0 failed, {} director(ies) unreadable",
            paint("FAILED", "31", no_color),
            passed,
            discovery.unreadable.len()
        );
        1
    } else {
        eprintln!(
            "test result: {}. {} passed, {} failed (of {})",
            paint("FAILED", "31", no_color),
            passed,
            failed,
            passed + failed
        );
        1
    }
}
