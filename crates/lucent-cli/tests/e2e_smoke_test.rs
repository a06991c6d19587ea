use std::{fs, path::PathBuf};

use tempfile::tempdir;

use lucent_cli::{Args, CliError, run};

/// Collects all .json files from a directory
fn collect_json_files(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("json")
            })
            .collect()
    } else {
        Vec::new()
    };

    files.sort();
    files
}

/// Demos live at the workspace root, two levels above this crate
fn demos_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("demos")
}

fn args_for(input: &PathBuf, output: &PathBuf) -> Args {
    Args {
        input: input.to_string_lossy().to_string(),
        output: output.to_string_lossy().to_string(),
        config: None,
        log_level: "off".to_string(),
    }
}

fn output_names(dir: &PathBuf) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("Output directory should exist")
        .flatten()
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

#[test]
fn e2e_smoke_test_valid_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let demos = collect_json_files(demos_dir());

    assert!(!demos.is_empty(), "No demos found in demos/");

    let mut failed_demos = Vec::new();

    for demo_path in &demos {
        let output_dir = temp_dir
            .path()
            .join(demo_path.file_stem().unwrap().to_string_lossy().to_string());

        if let Err(e) = run(&args_for(demo_path, &output_dir)) {
            failed_demos.push((demo_path.clone(), e));
            continue;
        }

        let names = output_names(&output_dir);
        if names.is_empty() {
            failed_demos.push((
                demo_path.clone(),
                CliError::Io(std::io::Error::other("no output written")),
            ));
        }
    }

    if !failed_demos.is_empty() {
        eprintln!("\nDemos that failed:");
        for (path, err) in &failed_demos {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} demo(s) failed unexpectedly", failed_demos.len());
    }

    println!("✅ All {} demos rendered", demos.len());
}

#[test]
fn e2e_output_file_per_kind() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let demos = demos_dir();

    for (demo, expected) in [
        ("tree.json", "0.svg"),
        ("network.json", "0.svg"),
        ("hierarchy.json", "0.svg"),
        ("scene.json", "0.svg"),
        ("chart.json", "0.chart.json"),
        ("embedded.json", "0.html"),
    ] {
        let output_dir = temp_dir.path().join(demo);
        run(&args_for(&demos.join(demo), &output_dir))
            .unwrap_or_else(|e| panic!("{demo} failed: {e}"));
        assert_eq!(output_names(&output_dir), [expected], "{demo}");
    }

    let scene_svg = fs::read_to_string(temp_dir.path().join("scene.json").join("0.svg")).unwrap();
    assert!(scene_svg.contains("<marker"));

    let chart = fs::read_to_string(temp_dir.path().join("chart.json").join("0.chart.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&chart).unwrap();
    assert_eq!(value["chartType"], "bar");
}

#[test]
fn e2e_smoke_test_error_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let error_demos = collect_json_files(demos_dir().join("errors"));

    assert!(!error_demos.is_empty(), "No error demos found in demos/errors/");

    let mut unexpectedly_succeeded = Vec::new();

    for demo_path in &error_demos {
        let output_dir = temp_dir
            .path()
            .join(demo_path.file_stem().unwrap().to_string_lossy().to_string());

        match run(&args_for(demo_path, &output_dir)) {
            Err(CliError::Render { failed, total }) => {
                assert!(failed >= 1 && failed <= total);
                // Every descriptor still gets an output file.
                assert_eq!(output_names(&output_dir).len(), total);
            }
            Err(other) => panic!("{}: unexpected error {other}", demo_path.display()),
            Ok(()) => unexpectedly_succeeded.push(demo_path.clone()),
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

    println!(
        "✅ All {} error demos failed as expected",
        error_demos.len()
    );
}

#[test]
fn e2e_placeholder_written_for_failure() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output_dir = temp_dir.path().join("out");

    let result = run(&args_for(
        &demos_dir().join("errors").join("unknown_kind.json"),
        &output_dir,
    ));
    assert!(matches!(result, Err(CliError::Render { failed: 1, total: 2 })));

    let placeholder = fs::read_to_string(output_dir.join("1.svg")).unwrap();
    assert!(placeholder.contains("Diagram unavailable"));
    assert!(placeholder.contains("venn"));
}

#[test]
fn e2e_malformed_element_keeps_siblings() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output_dir = temp_dir.path().join("out");

    let result = run(&args_for(
        &demos_dir().join("errors").join("malformed_element.json"),
        &output_dir,
    ));
    assert!(matches!(result, Err(CliError::Render { failed: 1, total: 2 })));
    assert_eq!(output_names(&output_dir), ["0.svg", "1.svg"]);

    let rendered = fs::read_to_string(output_dir.join("0.svg")).unwrap();
    assert!(!rendered.contains("Diagram unavailable"));
    assert!(rendered.contains("Gateway"));
    assert_eq!(rendered.matches("<circle").count(), 3);

    let placeholder = fs::read_to_string(output_dir.join("1.svg")).unwrap();
    assert!(placeholder.contains("Diagram unavailable"));
    assert!(placeholder.contains("descriptor 1"));
}

#[test]
fn e2e_invalid_json_is_a_syntax_error() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = temp_dir.path().join("broken.json");
    fs::write(&input, "{ \"kind\": \"tree\", ").unwrap();

    let result = run(&args_for(&input, &temp_dir.path().join("out")));
    assert!(matches!(result, Err(CliError::Syntax { .. })));
}
