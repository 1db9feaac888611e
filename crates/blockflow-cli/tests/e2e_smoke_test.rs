use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use tempfile::tempdir;

use blockflow_cli::{Args, CliError, run};

/// Collects all files with the given extension from a directory
fn collect_files(dir: &Path, extension: &str) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some(extension)
            })
            .collect()
    } else {
        Vec::new()
    };

    // Sort for consistent test output
    files.sort();
    files
}

/// Demo scenes are at workspace root, relative to workspace not the crate
fn demos_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("demos")
}

fn args(input: &Path, output: &Path) -> Args {
    Args {
        input: input.to_string_lossy().to_string(),
        output: output.to_string_lossy().to_string(),
        config: None,
        log_level: "off".to_string(),
        at: None,
        animated: false,
        frames: None,
        fps: 30,
        frames_dir: "frames".to_string(),
    }
}

#[test]
fn e2e_smoke_test_valid_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let valid_demos = collect_files(&demos_path(), "toml");
    assert!(!valid_demos.is_empty(), "No valid demos found in demos/");

    let mut failed_demos = Vec::new();

    for demo_path in &valid_demos {
        let stem = demo_path.file_stem().unwrap().to_string_lossy().to_string();

        let frame_output = temp_dir.path().join(format!("{stem}.svg"));
        if let Err(e) = run(&args(demo_path, &frame_output)) {
            failed_demos.push((demo_path.clone(), e));
            continue;
        }

        let animated_output = temp_dir.path().join(format!("{stem}_animated.svg"));
        let animated_args = Args {
            animated: true,
            ..args(demo_path, &animated_output)
        };
        if let Err(e) = run(&animated_args) {
            failed_demos.push((demo_path.clone(), e));
        }
    }

    if !failed_demos.is_empty() {
        eprintln!("\nValid demos that failed:");
        for (path, err) in &failed_demos {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} valid demo(s) failed unexpectedly", failed_demos.len());
    }

    println!("✅ All {} valid demos passed", valid_demos.len());
}

#[test]
fn e2e_smoke_test_error_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let error_demos = collect_files(&demos_path().join("errors"), "toml");
    assert!(
        !error_demos.is_empty(),
        "No error demos found in demos/errors/"
    );

    let mut unexpectedly_succeeded = Vec::new();

    for demo_path in &error_demos {
        let output_path = temp_dir.path().join(format!(
            "error_{}.svg",
            demo_path.file_stem().unwrap().to_string_lossy()
        ));

        if run(&args(demo_path, &output_path)).is_ok() {
            unexpectedly_succeeded.push(demo_path.clone());
        }
        assert!(!output_path.exists(), "no output on error");
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

    println!(
        "✅ All {} error demos failed as expected",
        error_demos.len()
    );
}

#[test]
fn e2e_frames_written() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let frames_dir = temp_dir.path().join("frames");

    let frame_args = Args {
        frames: Some(12),
        fps: 4,
        frames_dir: frames_dir.to_string_lossy().to_string(),
        ..args(
            &demos_path().join("minimal.toml"),
            &temp_dir.path().join("unused.svg"),
        )
    };
    run(&frame_args).unwrap();

    let frames = collect_files(&frames_dir, "svg");
    assert_eq!(frames.len(), 12);
    assert_eq!(frames[0].file_name().unwrap(), "frame_0000.svg");
    assert_eq!(frames[11].file_name().unwrap(), "frame_0011.svg");
    assert!(!temp_dir.path().join("unused.svg").exists());

    let first = fs::read_to_string(&frames[0]).unwrap();
    assert!(first.starts_with("<svg"));
}

#[test]
fn e2e_frame_at_time() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output = temp_dir.path().join("early.svg");

    let early_args = Args {
        at: Some(Duration::ZERO),
        ..args(&demos_path().join("minimal.toml"), &output)
    };
    run(&early_args).unwrap();

    let svg = fs::read_to_string(&output).unwrap();
    assert!(svg.contains("data-layer=\"node\""));
}

#[test]
fn e2e_unknown_node_error() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let err = run(&args(
        &demos_path().join("errors").join("unknown_node.toml"),
        &temp_dir.path().join("out.svg"),
    ))
    .unwrap_err();

    assert_eq!(
        blockflow_cli::error_adapter::error_code(&err),
        "blockflow::unknown_node"
    );
    assert!(matches!(err, CliError::Blockflow(_)));
}

#[test]
fn e2e_missing_config_file() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let missing_args = Args {
        config: Some(
            temp_dir
                .path()
                .join("absent.toml")
                .to_string_lossy()
                .to_string(),
        ),
        ..args(
            &demos_path().join("minimal.toml"),
            &temp_dir.path().join("out.svg"),
        )
    };
    assert!(matches!(run(&missing_args), Err(CliError::Config(_))));
}
