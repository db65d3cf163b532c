use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn bin_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_vanstat"))
}

fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..").canonicalize().unwrap()
}

fn fixture_path(name: &str) -> PathBuf {
    repo_root().join("tests/fixtures").join(name)
}

fn run(args: &[&str]) -> Output {
    Command::new(bin_path())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("failed to run {:?} {:?}: {}", bin_path(), args, e))
}

fn map(source_flag: &str, source: &str, output: &Path, extra: &[&str]) -> Output {
    let boundaries = fixture_path("boundaries.geojson");
    let source = fixture_path(source);
    assert!(source.exists(), "missing fixture: {}", source.display());
    let mut args = vec![
        "map".to_string(),
        "--boundaries".to_string(),
        boundaries.to_string_lossy().into_owned(),
        source_flag.to_string(),
        source.to_string_lossy().into_owned(),
        "--output".to_string(),
        output.to_string_lossy().into_owned(),
    ];
    args.extend(extra.iter().map(|s| s.to_string()));
    let refs: Vec<&str> = args.iter().map(String::as_str).collect();
    let out = run(&refs);
    assert!(
        out.status.success(),
        "map should succeed, stderr={}",
        String::from_utf8_lossy(&out.stderr)
    );
    out
}

/// `unit_id -> (class, count)` from the GeoJSON embedded in the page.
fn unit_classes(html: &str) -> BTreeMap<String, (String, serde_json::Value)> {
    let line = html
        .lines()
        .find_map(|l| l.strip_prefix("const units = "))
        .expect("page should embed the units layer");
    let json = line.trim_end_matches(';').replace("<\\/", "</");
    let v: serde_json::Value = serde_json::from_str(&json).expect("units should be valid JSON");
    v["features"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| {
            let p = &f["properties"];
            (
                p["unit_id"].as_str().unwrap().to_string(),
                (p["class"].as_str().unwrap().to_string(), p["count"].clone()),
            )
        })
        .collect()
}

#[test]
fn missing_unit_is_no_data_not_zero() {
    let tmp = tempfile::tempdir().unwrap();
    let output = tmp.path().join("map.html");
    map("--counts", "counts.csv", &output, &[]);

    let html = std::fs::read_to_string(&output).unwrap();
    let units = unit_classes(&html);
    assert_eq!(units.len(), 3);
    assert_eq!(units["A"].0, "bin_0");
    assert_eq!(units["A"].1, 5);
    assert_eq!(units["B"].0, "zero");
    assert_eq!(units["B"].1, 0);
    assert_eq!(units["C"].0, "no_data");
    assert_eq!(units["C"].1, "no data");

    assert!(html.contains("Log Scaled Crime Count"));
    assert!(html.contains("map.fitBounds("));
}

#[test]
fn crime_only_units_are_listed_as_unmapped() {
    let tmp = tempfile::tempdir().unwrap();
    let output = tmp.path().join("map.html");
    let out = map("--counts", "counts.csv", &output, &[]);

    let html = std::fs::read_to_string(&output).unwrap();
    assert!(html.contains("Unmapped units"));
    assert!(html.contains("<li>Stanley Park</li>"));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("1 unmapped"), "unexpected stdout: {stdout}");
}

#[test]
fn identical_inputs_give_identical_pages() {
    let tmp = tempfile::tempdir().unwrap();
    let a = tmp.path().join("a.html");
    let b = tmp.path().join("b.html");
    map("--counts", "counts.csv", &a, &[]);
    map("--counts", "counts.csv", &b, &[]);
    assert_eq!(std::fs::read(&a).unwrap(), std::fs::read(&b).unwrap());
}

#[test]
fn incidents_are_counted_for_the_default_year() {
    let tmp = tempfile::tempdir().unwrap();
    let output = tmp.path().join("map.html");
    map("--incidents", "incidents.csv", &output, &["--unit-column", "NEIGHBOURHOOD"]);

    let units = unit_classes(&std::fs::read_to_string(&output).unwrap());
    // 2021 only: A has three incidents, the 2020 row for B is dropped.
    assert_eq!(units["A"].1, 3);
    assert_eq!(units["B"].0, "no_data");
    assert_eq!(units["C"].0, "no_data");
}

#[test]
fn config_aliases_and_all_years() {
    let tmp = tempfile::tempdir().unwrap();
    let output = tmp.path().join("map.html");
    let config = fixture_path("pipeline.yaml");
    map(
        "--incidents",
        "incidents.csv",
        &output,
        &["--config", config.to_string_lossy().as_ref(), "--all-years"],
    );

    let html = std::fs::read_to_string(&output).unwrap();
    assert!(html.contains("<title>Test Crime Map</title>"));
    let units = unit_classes(&html);
    assert_eq!(units["A"].1, 4);
    assert_eq!(units["B"].1, 1);
    assert_eq!(units["C"].1, 1);
    assert!(!html.contains("Unmapped units"));
}

#[test]
fn counts_and_incidents_are_exclusive() {
    let boundaries = fixture_path("boundaries.geojson");
    let counts = fixture_path("counts.csv");
    let incidents = fixture_path("incidents.csv");
    let out = run(&[
        "map",
        "--boundaries",
        boundaries.to_string_lossy().as_ref(),
        "--counts",
        counts.to_string_lossy().as_ref(),
        "--incidents",
        incidents.to_string_lossy().as_ref(),
    ]);
    assert!(!out.status.success());

    let out = run(&["map", "--boundaries", boundaries.to_string_lossy().as_ref()]);
    assert!(!out.status.success(), "a crime source is required");
}

#[test]
fn year_filters_require_incidents() {
    let boundaries = fixture_path("boundaries.geojson");
    let counts = fixture_path("counts.csv");
    for flags in [&["--year", "2020"][..], &["--all-years"][..]] {
        let mut args = vec![
            "map",
            "--boundaries",
            boundaries.to_str().unwrap(),
            "--counts",
            counts.to_str().unwrap(),
        ];
        args.extend_from_slice(flags);
        let out = run(&args);
        assert!(!out.status.success(), "{flags:?} with --counts must be rejected");
    }
}
