use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct TestConfig {
    /// Human-readable test description.
    #[serde(default)]
    pub description: Option<String>,

    /// Expected complete compiled document (trimmed comparison).
    #[serde(default)]
    pub expect_output: Option<String>,

    /// Substrings that must each appear in the compiled document.
    #[serde(default)]
    pub expect_contains: Vec<String>,
}

/// Parse a `.test.sprig` file into its TOML frontmatter and sprig source.
fn parse_test_file(content: &str) -> Result<(TestConfig, &str), String> {
    let content = content.trim_start_matches('\u{feff}'); // strip BOM

    if !content.starts_with("---") {
        return Err("missing opening --- frontmatter delimiter".into());
    }

    let after_open = &content[3..];
    let after_open = after_open
        .strip_prefix('\n')
        .or_else(|| after_open.strip_prefix("\r\n"))
        .unwrap_or(after_open);

    let close_pos = after_open
        .find("\n---")
        .ok_or("missing closing --- frontmatter delimiter")?;

    let toml_str = after_open[..close_pos].trim_end_matches('\r');
    let rest_start = close_pos + 4; // skip \n---
    let source = after_open[rest_start..]
        .strip_prefix("\r\n")
        .or_else(|| after_open[rest_start..].strip_prefix('\n'))
        .unwrap_or(&after_open[rest_start..]);

    let config: TestConfig =
        toml::from_str(toml_str).map_err(|e| format!("TOML parse error: {}", e))?;

    Ok((config, source))
}

pub enum TestOutcome {
    Pass,
    Fail(String),
}

pub struct TestResult {
    pub path: PathBuf,
    pub description: Option<String>,
    pub outcome: TestOutcome,
}

fn run_single_test(path: &Path) -> TestResult {
    let fail = |description: Option<String>, reason: String| TestResult {
        path: path.to_path_buf(),
        description,
        outcome: TestOutcome::Fail(reason),
    };

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => return fail(None, format!("cannot read file: {}", e)),
    };

    let (config, source) = match parse_test_file(&content) {
        Ok(pair) => pair,
        Err(e) => return fail(None, format!("frontmatter error: {}", e)),
    };
    let description = config.description.clone();

    let program = sprig::parser::Parser::new(source.to_string(), false).parse();
    let html = compiler::compile_document(&program);

    if let Some(expected) = &config.expect_output {
        let actual = html.trim();
        let expected = expected.trim();
        if actual != expected {
            return fail(
                description,
                format!(
                    "output mismatch\n  expected: {}\n  actual:   {}",
                    expected, actual
                ),
            );
        }
    }

    for needle in &config.expect_contains {
        if !html.contains(needle.as_str()) {
            return fail(
                description,
                format!("output does not contain \"{}\"\n  actual: {}", needle, html),
            );
        }
    }

    TestResult {
        path: path.to_path_buf(),
        description,
        outcome: TestOutcome::Pass,
    }
}

/// Discover `.test.sprig` files grouped by category (subfolder relative to
/// root). Files directly in `root` get category "" (uncategorized).
/// Returns a BTreeMap so categories are sorted alphabetically.
fn discover_categorized(root: &Path) -> BTreeMap<String, Vec<PathBuf>> {
    let mut categories: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    collect_tests(root, root, &mut categories);
    for files in categories.values_mut() {
        files.sort();
    }
    categories
}

fn collect_tests(dir: &Path, root: &Path, out: &mut BTreeMap<String, Vec<PathBuf>>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_tests(&path, root, out);
        } else if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if name.ends_with(".test.sprig") {
                let category = path
                    .parent()
                    .and_then(|p| p.strip_prefix(root).ok())
                    .map(|p| p.to_string_lossy().replace('\\', "/"))
                    .unwrap_or_default();
                out.entry(category).or_default().push(path);
            }
        }
    }
}

/// List available categories for the given test path.
pub fn list_categories(path: &Path) {
    if path.is_file() {
        eprintln!("(single file, no categories)");
        return;
    }

    let categories = discover_categorized(path);
    if categories.is_empty() {
        eprintln!("no .test.sprig files found in {}", path.display());
        return;
    }

    eprintln!("available categories:");
    for (cat, files) in &categories {
        let label = if cat.is_empty() { "(root)" } else { cat.as_str() };
        eprintln!("  {} ({} tests)", label, files.len());
    }
}

fn pass_label(no_color: bool) -> &'static str {
    if no_color { "PASS" } else { "\x1b[32mPASS\x1b[0m" }
}

fn fail_label(no_color: bool) -> &'static str {
    if no_color { "FAIL" } else { "\x1b[31mFAIL\x1b[0m" }
}

fn bold(s: &str, no_color: bool) -> String {
    if no_color {
        s.to_string()
    } else {
        format!("\x1b[1m{}\x1b[0m", s)
    }
}

/// Run all `.test.sprig` files under `path` (or a single file).
/// If `categories` is non-empty, only run tests in those categories.
/// Returns exit code: 0 = all pass, 1 = any failure.
pub fn run_tests(path: &Path, no_color: bool, categories: &[String]) -> i32 {
    let grouped: BTreeMap<String, Vec<PathBuf>> = if path.is_file() {
        // Single file mode: one unnamed category, filters ignored.
        let mut single = BTreeMap::new();
        single.insert(String::new(), vec![path.to_path_buf()]);
        single
    } else {
        let all = discover_categorized(path);
        if all.is_empty() {
            eprintln!("no .test.sprig files found in {}", path.display());
            return 1;
        }
        if categories.is_empty() {
            all
        } else {
            let mut filtered = BTreeMap::new();
            for requested in categories {
                let req = requested.trim_matches('/');
                let mut found = false;
                for (cat, files) in &all {
                    if cat == req || cat.starts_with(&format!("{}/", req)) {
                        filtered.insert(cat.clone(), files.clone());
                        found = true;
                    }
                }
                if !found {
                    eprintln!("warning: category '{}' not found", req);
                }
            }
            if filtered.is_empty() {
                eprintln!("no matching categories found");
                return 1;
            }
            filtered
        }
    };

    let mut passed = 0usize;
    let mut failed = 0usize;
    let mut failures: Vec<TestResult> = Vec::new();

    for (cat, files) in &grouped {
        if !cat.is_empty() {
            eprintln!();
            eprintln!("{}", bold(cat, no_color));
        }

        for file in files {
            let result = run_single_test(file);
            let label = result.description.clone().unwrap_or_else(|| {
                file.file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("?")
                    .to_string()
            });

            match &result.outcome {
                TestOutcome::Pass => {
                    passed += 1;
                    eprintln!("  {}  {}", pass_label(no_color), label);
                }
                TestOutcome::Fail(_) => {
                    failed += 1;
                    eprintln!("  {}  {}", fail_label(no_color), label);
                    failures.push(result);
                }
            }
        }
    }

    if !failures.is_empty() {
        eprintln!();
        eprintln!("failures:");
        for f in &failures {
            eprintln!();
            eprintln!("  --- {} ---", f.path.display());
            if let TestOutcome::Fail(reason) = &f.outcome {
                for line in reason.lines() {
                    eprintln!("  {}", line);
                }
            }
        }
    }

    eprintln!();
    if failed == 0 {
        let ok = if no_color { "ok" } else { "\x1b[32mok\x1b[0m" };
        eprintln!("test result: {}. {} passed, 0 failed", ok, passed);
        0
    } else {
        let label = if no_color {
            "FAILED"
        } else {
            "\x1b[31mFAILED\x1b[0m"
        };
        eprintln!(
            "test result: {}. {} passed, {} failed (of {})",
            label,
            passed,
            failed,
            passed + failed
        );
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn frontmatter_splits_config_and_source() {
        let content = "---\ndescription = \"basic\"\nexpect_contains = [\"<p>hi</p>\"]\n---\nbody {\np: hi\n}\n";
        let (config, source) = parse_test_file(content).expect("parse failed");
        assert_eq!(config.description.as_deref(), Some("basic"));
        assert_eq!(config.expect_contains, vec!["<p>hi</p>"]);
        assert!(source.starts_with("body {"));
    }

    #[test]
    fn frontmatter_missing_open_delimiter() {
        assert!(parse_test_file("body {\n}\n").is_err());
    }

    #[test]
    fn frontmatter_missing_close_delimiter() {
        assert!(parse_test_file("---\ndescription = \"x\"\n").is_err());
    }

    #[test]
    fn single_test_contains_pass_and_fail() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().join("hello.test.sprig");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            "---\nexpect_contains = [\"<h1>Hi</h1>\"]\n---\nbody {{\nh1: Hi\n}}\n"
        )
        .unwrap();

        let result = run_single_test(&path);
        assert!(matches!(result.outcome, TestOutcome::Pass));

        let path = dir.path().join("nope.test.sprig");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            "---\nexpect_contains = [\"<h1>Bye</h1>\"]\n---\nbody {{\nh1: Hi\n}}\n"
        )
        .unwrap();

        let result = run_single_test(&path);
        assert!(matches!(result.outcome, TestOutcome::Fail(_)));
    }

    #[test]
    fn discovery_groups_by_subfolder() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        std::fs::create_dir(dir.path().join("nesting")).unwrap();
        for name in ["a.test.sprig", "nesting/b.test.sprig", "ignored.sprig"] {
            let mut file = std::fs::File::create(dir.path().join(name)).unwrap();
            write!(file, "---\n---\nbody {{\np: x\n}}\n").unwrap();
        }

        let categories = discover_categorized(dir.path());
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[""].len(), 1);
        assert_eq!(categories["nesting"].len(), 1);
    }
}
