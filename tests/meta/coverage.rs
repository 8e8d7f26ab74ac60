//! Keeps `tests/unit` in step with `src`
//!
//! Every source file has a unit test file at the same relative path, every
//! unit test file is declared in its parent module so cargo compiles it, and
//! every test file holds at least one test.

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::fs;
    use std::io;
    use std::path::Path;

    const SRC_DIR: &str = "src";
    const UNIT_DIR: &str = "tests/unit";

    // Entry points and module organization files carry no logic of their own
    fn is_structural(relative_path: &str) -> bool {
        relative_path == "main.rs" || relative_path == "lib.rs" || relative_path.ends_with("mod.rs")
    }

    #[test]
    fn test_all_src_files_have_unit_tests() {
        let src_paths = collect_relative_paths(Path::new(SRC_DIR)).expect("readable src");
        let test_paths = collect_relative_paths(Path::new(UNIT_DIR)).unwrap_or_default();

        let missing: Vec<String> = src_paths
            .iter()
            .filter(|path| !is_structural(path) && !test_paths.contains(*path))
            .map(|path| format!("  - src/{path} -> tests/unit/{path}"))
            .collect();

        assert!(
            missing.is_empty(),
            "The following src files/directories are missing unit test counterparts:\n{}",
            missing.join("\n")
        );
    }

    #[test]
    fn test_all_unit_tests_have_src_counterparts() {
        let src_paths = collect_relative_paths(Path::new(SRC_DIR)).expect("readable src");
        let test_paths = collect_relative_paths(Path::new(UNIT_DIR)).unwrap_or_default();

        let orphaned: Vec<String> = test_paths
            .iter()
            .filter(|path| !path.ends_with("mod.rs") && !src_paths.contains(*path))
            .map(|path| format!("  - tests/unit/{path} -> src/{path} (missing)"))
            .collect();

        assert!(
            orphaned.is_empty(),
            "The following unit test files/directories have no corresponding src files:\n{}",
            orphaned.join("\n")
        );
    }

    #[test]
    fn test_all_unit_tests_are_declared() {
        let test_paths = collect_relative_paths(Path::new(UNIT_DIR)).unwrap_or_default();
        let mut undeclared = Vec::new();

        for path in &test_paths {
            let path = Path::new(path);
            if is_structural(&path.to_string_lossy()) {
                continue;
            }
            let Some(name) = path.file_stem().map(|stem| stem.to_string_lossy().to_string()) else {
                continue;
            };

            let parent = path.parent().unwrap_or_else(|| Path::new(""));
            let declaring = if parent.as_os_str().is_empty() {
                Path::new(UNIT_DIR).join("main.rs")
            } else {
                Path::new(UNIT_DIR).join(parent).join("mod.rs")
            };

            let declared = fs::read_to_string(&declaring).is_ok_and(|content| {
                content
                    .lines()
                    .map(str::trim)
                    .any(|line| line == format!("mod {name};") || line == format!("pub mod {name};"))
            });
            if !declared {
                undeclared.push(format!("  - {} in {}", path.display(), declaring.display()));
            }
        }

        assert!(
            undeclared.is_empty(),
            "The following unit test modules are never declared:\n{}",
            undeclared.join("\n")
        );
    }

    #[test]
    fn test_all_test_files_contain_tests() {
        let mut files_without_tests = Vec::new();
        check_test_files(Path::new("tests"), &mut files_without_tests).expect("readable tests");

        assert!(
            files_without_tests.is_empty(),
            "The following test files don't contain any #[test] functions:\n{}",
            files_without_tests.join("\n")
        );
    }

    // Relative paths of `.rs` files and directories below `base`
    fn collect_relative_paths(base: &Path) -> Result<BTreeSet<String>, io::Error> {
        let mut paths = BTreeSet::new();
        collect_into(base, base, &mut paths)?;
        Ok(paths)
    }

    fn collect_into(dir: &Path, base: &Path, paths: &mut BTreeSet<String>) -> Result<(), io::Error> {
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let relative = path
                .strip_prefix(base)
                .map_err(|_prefix_error| io::Error::other("Failed to strip prefix"))?
                .to_string_lossy()
                .to_string();

            if path.is_dir() {
                paths.insert(relative);
                collect_into(&path, base, paths)?;
            } else if path.extension().and_then(|ext| ext.to_str()) == Some("rs") {
                paths.insert(relative);
            }
        }
        Ok(())
    }

    fn check_test_files(dir: &Path, files_without_tests: &mut Vec<String>) -> Result<(), io::Error> {
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();

            if path.is_dir() {
                check_test_files(&path, files_without_tests)?;
                continue;
            }
            if path.extension().and_then(|ext| ext.to_str()) != Some("rs") {
                continue;
            }

            // Harness roots and module files only declare other modules
            let file_name = path.file_name().and_then(|name| name.to_str());
            if matches!(file_name, Some("main.rs" | "mod.rs")) {
                continue;
            }

            if !fs::read_to_string(&path)?.contains("#[test]") {
                files_without_tests.push(format!("  - {}", path.display()));
            }
        }
        Ok(())
    }
}
