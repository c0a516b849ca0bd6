//! Structural tests for layer boundary enforcement.
//!
//! These scan source files so the domain / application / infra split keeps
//! holding as the code grows.

use std::path::{Path, PathBuf};

/// Collect all `.rs` files under a directory recursively.
fn collect_rs_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                files.extend(collect_rs_files(&path));
            } else if path.extension().and_then(|e| e.to_str()) == Some("rs") {
                files.push(path);
            }
        }
    }
    files
}

/// Track brace depth and return whether a line is inside a `#[cfg(test)]` block.
struct CfgTestTracker {
    in_test_block: bool,
    brace_depth: i32,
    test_block_start_depth: i32,
}

impl CfgTestTracker {
    fn new() -> Self {
        Self {
            in_test_block: false,
            brace_depth: 0,
            test_block_start_depth: 0,
        }
    }

    /// Process a line and return `true` if it's inside a `#[cfg(test)]` block.
    fn process_line(&mut self, line: &str) -> bool {
        if line.trim().contains("#[cfg(test)]") {
            self.in_test_block = true;
            self.test_block_start_depth = self.brace_depth;
        }
        for ch in line.chars() {
            match ch {
                '{' => self.brace_depth += 1,
                '}' => {
                    self.brace_depth -= 1;
                    if self.in_test_block && self.brace_depth <= self.test_block_start_depth {
                        self.in_test_block = false;
                    }
                }
                _ => {}
            }
        }
        self.in_test_block
    }
}

/// Non-comment lines outside `#[cfg(test)]`, with their 1-based line numbers.
fn production_lines(path: &Path) -> Vec<(usize, String)> {
    let Ok(content) = std::fs::read_to_string(path) else {
        return Vec::new();
    };
    let mut tracker = CfgTestTracker::new();
    content
        .lines()
        .enumerate()
        .filter_map(|(i, line)| {
            let in_test = tracker.process_line(line);
            let trimmed = line.trim();
            let comment = trimmed.starts_with("//") || trimmed.starts_with("/*") || trimmed.starts_with('*');
            (!in_test && !comment).then(|| (i + 1, line.to_string()))
        })
        .collect()
}

fn src(parts: &[&str]) -> PathBuf {
    parts
        .iter()
        .fold(Path::new(env!("CARGO_MANIFEST_DIR")).join("src"), |p, part| p.join(part))
}

fn violations(dir: &Path, forbidden: &[&str]) -> Vec<String> {
    let mut found = Vec::new();
    for file in collect_rs_files(dir) {
        let rel = file
            .strip_prefix(env!("CARGO_MANIFEST_DIR"))
            .unwrap_or(&file)
            .display()
            .to_string();
        for (lineno, line) in production_lines(&file) {
            for pattern in forbidden {
                if line.contains(pattern) {
                    found.push(format!("{rel}:{lineno}: `{pattern}`: {}", line.trim()));
                }
            }
        }
    }
    found
}

#[test]
fn domain_is_pure() {
    let found = violations(
        &src(&["domain"]),
        &[
            "crate::infra",
            "crate::application",
            "crate::commands",
            "crate::output",
            "tokio",
            "std::fs",
            "std::process",
            "std::net",
        ],
    );
    assert!(found.is_empty(), "domain/ must stay free of I/O:\n{}", found.join("\n"));
}

#[test]
fn services_depend_on_ports_not_adapters() {
    let found = violations(
        &src(&["application"]),
        &["crate::infra", "crate::commands", "crate::output", "std::process::Command"],
    );
    assert!(found.is_empty(), "application/ must use ports only:\n{}", found.join("\n"));
}

#[test]
fn infra_has_no_imports_from_commands_or_output() {
    let found = violations(&src(&["infra"]), &["crate::commands", "crate::output"]);
    assert!(found.is_empty(), "infra/ must not import from commands/ or output/:\n{}", found.join("\n"));
}

#[test]
fn no_print_macros_below_the_command_layer() {
    let mut found = violations(&src(&["infra"]), &["println!", "eprintln!"]);
    found.extend(violations(&src(&["application"]), &["println!", "eprintln!"]));
    assert!(found.is_empty(), "only commands/ and output/ print:\n{}", found.join("\n"));
}

#[test]
fn command_runner_is_constructed_only_in_app_and_infra() {
    let found: Vec<String> = violations(&src(&[]), &["TokioCommandRunner::"])
        .into_iter()
        .filter(|v| {
            let v = v.replace('\\', "/");
            !v.starts_with("src/infra/") && !v.starts_with("src/app.rs")
        })
        .collect();
    assert!(found.is_empty(), "construct runners in AppContext only:\n{}", found.join("\n"));
}
