use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::tempdir;

use mxdraw::{MxDrawError, ParseError, PageSelector};
use mxdraw_cli::{Args, run};

/// Collects all .drawio files from a directory
fn collect_drawio_files(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("drawio")
            })
            .collect()
    } else {
        Vec::new()
    };

    // Sort for consistent test output
    files.sort();
    files
}

/// Writes a config selecting the fixed font backend, so runs do not depend
/// on the fonts installed on the machine
fn fixed_font_config(dir: &Path) -> String {
    let path = dir.join("config.toml");
    fs::write(&path, "[text]\nbackend = \"fixed\"\n").expect("Failed to write config");
    path.to_string_lossy().to_string()
}

fn args(input: &Path, output: &Path, config: &str, page: PageSelector) -> Args {
    Args {
        input: input.to_string_lossy().to_string(),
        output: output.to_string_lossy().to_string(),
        config: Some(config.to_string()),
        page,
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_smoke_test_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config = fixed_font_config(temp_dir.path());

    // Demos are at workspace root, relative to workspace not the crate
    let demos_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("demos");
    let demos = collect_drawio_files(demos_path);

    assert!(!demos.is_empty(), "No demo diagrams found in demos/");

    let mut failed = Vec::new();

    for demo in &demos {
        let output_filename = format!("{}.svg", demo.file_stem().unwrap().to_string_lossy());
        let output_path = temp_dir.path().join(output_filename);

        match run(&args(demo, &output_path, &config, PageSelector::default())) {
            Ok(()) => {
                let svg = fs::read_to_string(&output_path).expect("Output should exist");
                assert!(svg.contains("<svg"), "{} produced no svg", demo.display());
            }
            Err(err) => failed.push((demo.clone(), err)),
        }
    }

    if !failed.is_empty() {
        eprintln!("\nDemos that failed:");
        for (path, err) in &failed {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} demo(s) failed unexpectedly", failed.len());
    }
}

#[test]
fn e2e_inline_diagram_writes_svg() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config = fixed_font_config(temp_dir.path());
    let input = temp_dir.path().join("inline.drawio");
    let output = temp_dir.path().join("inline.svg");

    fs::write(
        &input,
        r#"<mxfile><diagram name="Only"><mxGraphModel><root>
            <mxCell id="0"/>
            <mxCell id="1" parent="0"/>
            <mxCell id="a" value="A" style="whiteSpace=wrap;" vertex="1" parent="1">
                <mxGeometry x="0" y="0" width="80" height="40" as="geometry"/>
            </mxCell>
            <mxCell id="b" value="B" style="whiteSpace=wrap;" vertex="1" parent="1">
                <mxGeometry x="200" y="0" width="80" height="40" as="geometry"/>
            </mxCell>
            <mxCell id="e" edge="1" parent="1" source="a" target="b">
                <mxGeometry relative="1" as="geometry"/>
            </mxCell>
        </root></mxGraphModel></diagram></mxfile>"#,
    )
    .unwrap();

    let page: PageSelector = "Only".parse().unwrap();
    run(&args(&input, &output, &config, page)).expect("Conversion should succeed");

    let svg = fs::read_to_string(&output).unwrap();
    assert!(svg.contains("<svg"));
    assert!(svg.contains(r#"id="a""#));
    assert!(svg.contains(r#"id="e""#));
    assert!(svg.contains("marker-end"));
}

#[test]
fn e2e_missing_input_fails() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config = fixed_font_config(temp_dir.path());
    let input = temp_dir.path().join("absent.drawio");
    let output = temp_dir.path().join("absent.svg");

    let err = run(&args(&input, &output, &config, PageSelector::default())).unwrap_err();

    assert!(matches!(err, MxDrawError::Io(_)));
    assert!(!output.exists());
}

#[test]
fn e2e_compressed_page_fails() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config = fixed_font_config(temp_dir.path());
    let input = temp_dir.path().join("compressed.drawio");
    let output = temp_dir.path().join("compressed.svg");

    fs::write(
        &input,
        r#"<mxfile><diagram name="Packed" id="x">7VZNb9swDP01Ph</diagram></mxfile>"#,
    )
    .unwrap();

    let err = run(&args(&input, &output, &config, PageSelector::default())).unwrap_err();

    assert!(matches!(
        err,
        MxDrawError::Parse(ParseError::CompressedPage { .. })
    ));
}
