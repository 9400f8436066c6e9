use std::path::{Path, PathBuf};
use std::process::Command;

const MAX_LINES: usize = 750;

const SOURCE_DIR: &str = "src";

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/heads/main");
    println!("cargo:rerun-if-changed=.git/packed-refs");

    let sha = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .and_then(|output| {
            if output.status.success() {
                String::from_utf8(output.stdout)
                    .ok()
                    .map(|s| s.trim().to_string())
            } else {
                None
            }
        })
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=CBT_DIARY_GIT_SHA={}", sha);

    let root = match std::env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => return,
    };
    let files = collect_rust_files(&root.join(SOURCE_DIR));
    for file in &files {
        println!("cargo:rerun-if-changed={}", file.display());
    }

    enforce_line_limits(&root, &files);
    enforce_no_dead_code_allows(&root, &files);
    enforce_serial_for_env_mutations(&root, &files);
}

fn collect_rust_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    walk_directory(dir, &mut files);
    files.sort();
    files
}

fn walk_directory(dir: &Path, files: &mut Vec<PathBuf>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(_) => return,
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            walk_directory(&path, files);
        } else if path.extension().and_then(|e| e.to_str()) == Some("rs") {
            files.push(path);
        }
    }
}

fn relative(root: &Path, file: &Path) -> PathBuf {
    file.strip_prefix(root).unwrap_or(file).to_path_buf()
}

fn count_non_empty_lines(content: &str) -> usize {
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .count()
}

fn enforce_line_limits(root: &Path, files: &[PathBuf]) {
    let mut violations = Vec::new();
    for file in files {
        match std::fs::read_to_string(file) {
            Ok(content) => {
                let line_count = count_non_empty_lines(&content);
                if line_count > MAX_LINES {
                    violations.push((relative(root, file), line_count));
                }
            }
            Err(e) => {
                println!(
                    "cargo:warning=Could not read file {}: {}",
                    relative(root, file).display(),
                    e
                );
            }
        }
    }

    if !violations.is_empty() {
        eprintln!("\n========================================");
        eprintln!("FILE LINE LIMIT EXCEEDED (max {} lines)", MAX_LINES);
        eprintln!("========================================");
        for (path, lines) in &violations {
            eprintln!(
                "  {} - {} lines (exceeds by {})",
                path.display(),
                lines,
                lines - MAX_LINES
            );
        }
        eprintln!("========================================\n");
        eprintln!("Please split these files into smaller modules.\n");
        panic!(
            "Build failed: {} file(s) exceed the {} line limit",
            violations.len(),
            MAX_LINES
        );
    }
}

fn enforce_no_dead_code_allows(root: &Path, files: &[PathBuf]) {
    let mut violations: Vec<(PathBuf, usize, String)> = Vec::new();

    for file in files {
        let Ok(content) = std::fs::read_to_string(file) else {
            continue;
        };
        for (line_num, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if (trimmed.starts_with("#[allow(") || trimmed.starts_with("#![allow("))
                && trimmed.contains("dead_code")
            {
                violations.push((relative(root, file), line_num + 1, trimmed.to_string()));
            }
        }
    }

    if !violations.is_empty() {
        eprintln!("\n========================================");
        eprintln!("#[allow(dead_code)] IS NOT ALLOWED");
        eprintln!("========================================");
        for (path, line_num, line) in &violations {
            eprintln!("  {}:{}", path.display(), line_num);
            eprintln!("    {}", line);
        }
        eprintln!("========================================");
        eprintln!("Delete unused code, or gate test-only code with #[cfg(test)].\n");
        panic!(
            "Build failed: {} #[allow(dead_code)] attribute(s) found",
            violations.len()
        );
    }
}

/// Tests that set or remove env vars must carry `#[serial]`.
fn enforce_serial_for_env_mutations(root: &Path, files: &[PathBuf]) {
    let mut violations: Vec<(PathBuf, usize, String)> = Vec::new();

    for file in files {
        let Ok(content) = std::fs::read_to_string(file) else {
            continue;
        };
        let lines: Vec<&str> = content.lines().collect();

        let mut in_test_fn = false;
        let mut test_fn_start = 0;
        let mut test_fn_name = String::new();
        let mut has_serial = false;
        let mut brace_depth: i32 = 0;

        for (i, line) in lines.iter().enumerate() {
            let trimmed = line.trim();

            if trimmed == "#[serial]" || trimmed == "#[serial_test::serial]" {
                has_serial = true;
            }

            if trimmed == "#[test]" || trimmed.starts_with("#[tokio::test") {
                if let Some(signature) = lines.iter().skip(i + 1).take(4).find(|l| l.contains("fn ")) {
                    test_fn_start = i + 1;
                    test_fn_name = signature
                        .split("fn ")
                        .nth(1)
                        .and_then(|rest| rest.split('(').next())
                        .unwrap_or("")
                        .trim()
                        .to_string();
                    in_test_fn = true;
                    brace_depth = 0;
                }
            }

            if !in_test_fn {
                continue;
            }
            for c in line.chars() {
                if c == '{' {
                    brace_depth += 1;
                } else if c == '}' {
                    brace_depth -= 1;
                    if brace_depth == 0 {
                        in_test_fn = false;
                        has_serial = false;
                    }
                }
            }

            let mutates_env = !trimmed.starts_with("//")
                && (trimmed.contains("env::set_var") || trimmed.contains("env::remove_var"));
            if in_test_fn && !has_serial && mutates_env {
                violations.push((
                    relative(root, file),
                    test_fn_start,
                    format!("test `{}` mutates env without #[serial]", test_fn_name),
                ));
                in_test_fn = false;
            }
        }
    }

    if !violations.is_empty() {
        eprintln!("\n========================================");
        eprintln!("ENV MUTATIONS REQUIRE #[serial]");
        eprintln!("========================================");
        for (path, line_num, msg) in &violations {
            eprintln!("  {}:{}", path.display(), line_num);
            eprintln!("    {}", msg);
        }
        eprintln!("========================================\n");
        panic!(
            "Build failed: {} test(s) mutate env vars without #[serial].",
            violations.len()
        );
    }
}
