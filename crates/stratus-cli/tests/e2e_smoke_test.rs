use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::tempdir;

use stratus_cli::{Args, run};

fn demos_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos")
}

/// Collects all catalog files (.toml and .json) from a directory
fn collect_catalogs(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file()
                    && matches!(
                        path.extension().and_then(|s| s.to_str()),
                        Some("toml" | "json")
                    )
            })
            .collect()
    } else {
        Vec::new()
    };

    // Sort for consistent test output
    files.sort();
    files
}

fn args(parts: &[&str]) -> Args {
    use clap::Parser;

    let mut argv = vec!["stratus", "--log-level", "off"];
    argv.extend_from_slice(parts);
    Args::try_parse_from(argv).expect("arguments parse")
}

fn formats() -> &'static str {
    if cfg!(feature = "raster") {
        "drawio,png,svg,markdown"
    } else {
        "drawio,svg,markdown"
    }
}

#[test]
fn e2e_smoke_test_valid_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let demos = collect_catalogs(demos_dir());
    assert!(!demos.is_empty(), "No demos found in demos/");

    let mut failed = Vec::new();

    for demo in &demos {
        let stem = demo.file_stem().unwrap().to_string_lossy().to_string();
        let out_dir = temp_dir.path().join(&stem);
        let catalog = demo.to_string_lossy().to_string();
        let out = out_dir.to_string_lossy().to_string();

        if let Err(err) = run(&args(&["render", &catalog, "-o", &out, "-f", formats()])) {
            failed.push((demo.clone(), err));
            continue;
        }

        let written = fs::read_dir(&out_dir).map(|dir| dir.count()).unwrap_or(0);
        assert_eq!(
            written,
            formats().split(',').count(),
            "{stem} did not write every format"
        );

        for command in ["validate", "report"] {
            if let Err(err) = run(&args(&[command, &catalog])) {
                failed.push((demo.clone(), err));
            }
        }
    }

    if !failed.is_empty() {
        eprintln!("\nDemos that failed:");
        for (path, err) in &failed {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} demo run(s) failed unexpectedly", failed.len());
    }
}

#[test]
fn e2e_smoke_test_error_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let error_demos = collect_catalogs(demos_dir().join("errors"));
    assert!(!error_demos.is_empty(), "No error demos found in demos/errors/");

    let mut unexpected_successes = Vec::new();

    for demo in &error_demos {
        let catalog = demo.to_string_lossy().to_string();
        let out = temp_dir.path().to_string_lossy().to_string();

        if run(&args(&["render", &catalog, "-o", &out, "-f", "drawio"])).is_ok() {
            unexpected_successes.push(demo.clone());
        }
    }

    // An invalid catalog never produces output.
    let written = fs::read_dir(temp_dir.path()).map(|dir| dir.count()).unwrap_or(0);
    assert_eq!(written, 0);

    if !unexpected_successes.is_empty() {
        eprintln!("\nError demos that unexpectedly succeeded:");
        for path in &unexpected_successes {
            eprintln!("  - {}", path.display());
        }
        panic!(
            "{} error demo(s) succeeded unexpectedly",
            unexpected_successes.len()
        );
    }
}

#[test]
fn e2e_unsupported_catalog_extension() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let catalog = temp_dir.path().join("catalog.yaml");
    fs::write(&catalog, "services: {}").unwrap();

    let err = run(&args(&["validate", &catalog.to_string_lossy()])).unwrap_err();
    assert!(err.to_string().contains("unsupported catalog format"));
}
