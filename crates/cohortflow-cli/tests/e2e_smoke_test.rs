use std::{fs, path::PathBuf};

use tempfile::tempdir;

use cohortflow_cli::{Args, run};

fn default_args(input: &str, output_dir: &str) -> Args {
    Args {
        input: input.to_string(),
        output_dir: output_dir.to_string(),
        name: None,
        formats: vec!["svg".to_string()],
        style: None,
        style_config: None,
        title: None,
        transparent: false,
        dpi: None,
        log_level: "off".to_string(),
    }
}

/// Collects all .toml files directly inside a directory
fn collect_toml_files(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("toml")
            })
            .collect()
    } else {
        Vec::new()
    };

    // Sort for consistent test output
    files.sort();
    files
}

fn demos_dir() -> PathBuf {
    // Demos are at the workspace root, relative to workspace not the crate
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("demos")
}

#[test]
fn e2e_smoke_test_valid_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let valid_demos = collect_toml_files(demos_dir());

    assert!(!valid_demos.is_empty(), "No demo documents found in demos/");

    let mut failed = Vec::new();

    for demo_path in &valid_demos {
        let args = default_args(
            &demo_path.to_string_lossy(),
            &temp_dir.path().to_string_lossy(),
        );
        if let Err(e) = run(&args) {
            failed.push((demo_path.clone(), e));
            continue;
        }

        let stem = demo_path.file_stem().unwrap().to_string_lossy();
        let output = temp_dir.path().join(format!("{stem}.svg"));
        assert!(
            output.exists(),
            "expected {} to be written",
            output.display()
        );
        let content = fs::read_to_string(&output).unwrap();
        assert!(content.contains("<svg"), "{stem}.svg should be a document");
    }

    if !failed.is_empty() {
        eprintln!("\nValid demos that failed:");
        for (path, err) in &failed {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} valid demo(s) failed unexpectedly", failed.len());
    }
}

#[test]
fn e2e_smoke_test_error_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let error_demos = collect_toml_files(demos_dir().join("errors"));

    assert!(
        !error_demos.is_empty(),
        "No error documents found in demos/errors/"
    );

    let mut unexpectedly_succeeded = Vec::new();

    for demo_path in &error_demos {
        let args = default_args(
            &demo_path.to_string_lossy(),
            &temp_dir.path().to_string_lossy(),
        );
        if run(&args).is_ok() {
            unexpectedly_succeeded.push(demo_path.clone());
        }
    }

    if !unexpectedly_succeeded.is_empty() {
        eprintln!("\nError demos that unexpectedly succeeded:");
        for path in &unexpectedly_succeeded {
            eprintln!("  - {}", path.display());
        }
        panic!(
            "{} error demo(s) succeeded unexpectedly",
            unexpectedly_succeeded.len()
        );
    }
}

#[test]
fn e2e_style_override_applies() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = demos_dir().join("basic.toml");
    let override_path = demos_dir().join("styles").join("muted.toml");

    let mut args = default_args(
        &input.to_string_lossy(),
        &temp_dir.path().to_string_lossy(),
    );
    args.name = Some("muted".to_string());
    args.style_config = Some(override_path.to_string_lossy().to_string());

    run(&args).expect("override render should succeed");

    let content = fs::read_to_string(temp_dir.path().join("muted.svg")).unwrap();
    assert!(content.contains("#eceff1"), "override start color applies");
}

#[test]
fn e2e_missing_input_is_an_error() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let args = default_args(
        "/nonexistent/definitely-missing.toml",
        &temp_dir.path().to_string_lossy(),
    );

    let err = run(&args).unwrap_err();
    assert!(err.to_string().contains("failed to read input"));
}
