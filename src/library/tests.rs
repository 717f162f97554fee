use super::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

#[test]
fn parses_cms_query_result_with_nulls_and_aliases() {
    let json = r##"
    {
      "result": [
        { "_id": "ewb002", "title": "Turnpike", "album": null, "src": "/audio/turnpike.mp3",
          "color": null, "tag": "TPK", "order": 2, "x": null, "y": 12 },
        { "_id": "ewb001", "title": "Shore Neon", "src": "https://cdn.example.com/a.mp3",
          "color": "#00FFC2", "tag": null, "order": 1 }
      ]
    }
    "##;

    let tracks = parse_catalog(json, CatalogFormat::Json).unwrap();
    assert_eq!(tracks.len(), 2);

    assert_eq!(tracks[0].id, "ewb001");
    assert_eq!(tracks[0].label, "Shore Neon");
    assert_eq!(tracks[0].color, "#00FFC2");

    assert_eq!(tracks[1].id, "ewb002");
    assert_eq!(tracks[1].label, "TPK");
    assert_eq!(tracks[1].album, None);
    assert_eq!(tracks[1].color, "#F4F1E8");
    assert_eq!(tracks[1].x, 50.0);
    assert_eq!(tracks[1].y, 12.0);
}

#[test]
fn bare_array_and_toml_tables_are_both_accepted() {
    let json = r#"[{ "id": "a", "title": "A", "source": "/audio/a.mp3" }]"#;
    assert_eq!(parse_catalog(json, CatalogFormat::Json).unwrap().len(), 1);

    let toml = r#"
[[tracks]]
id = "a"
title = "A"
source = "/audio/a.mp3"
label = "AYY"
sortOrder = 3

[[tracks]]
id = "b"
title = "B"
src = "/audio/b.mp3"
order = 1
"#;
    let tracks = parse_catalog(toml, CatalogFormat::Toml).unwrap();
    let ids: Vec<&str> = tracks.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "a"]);
    assert_eq!(tracks[1].label, "AYY");
}

#[test]
fn sort_falls_back_to_creation_time_and_is_stable() {
    let json = r#"[
      { "id": "late",  "title": "L", "src": "/l.mp3", "_createdAt": "2025-03-01T00:00:00Z" },
      { "id": "none1", "title": "N", "src": "/n.mp3" },
      { "id": "early", "title": "E", "src": "/e.mp3", "_createdAt": "2025-01-01T00:00:00Z" },
      { "id": "first", "title": "F", "src": "/f.mp3", "order": 0 },
      { "id": "none2", "title": "M", "src": "/m.mp3" }
    ]"#;

    let tracks = parse_catalog(json, CatalogFormat::Json).unwrap();
    let ids: Vec<&str> = tracks.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["first", "early", "late", "none1", "none2"]);
}

#[test]
fn records_without_id_or_source_and_duplicates_are_skipped() {
    let json = r#"[
      { "id": "a", "title": "A", "src": "/a.mp3" },
      { "title": "No id", "src": "/x.mp3" },
      { "id": "b", "title": "No source", "src": null },
      { "id": "a", "title": "Dup", "src": "/dup.mp3" }
    ]"#;

    let tracks = parse_catalog(json, CatalogFormat::Json).unwrap();
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].title, "A");
}

#[test]
fn missing_title_falls_back_to_id() {
    let tracks = parse_catalog(r#"[{ "id": "ewb007", "src": "/a.mp3" }]"#, CatalogFormat::Json).unwrap();
    assert_eq!(tracks[0].title, "ewb007");
    assert_eq!(tracks[0].tag_text(), "ewb007");
}

#[test]
fn invalid_colors_fall_back_to_the_default() {
    let json = r##"[
        { "_id": "a", "src": "/a.mp3", "color": "#aé123" },
        { "_id": "b", "src": "/b.mp3", "color": "orange" },
        { "_id": "c", "src": "/c.mp3", "color": "#abc" }
    ]"##;
    let tracks = parse_catalog(json, CatalogFormat::Json).unwrap();
    assert_eq!(tracks[0].color, "#F4F1E8");
    assert_eq!(tracks[1].color, "#F4F1E8");
    assert_eq!(tracks[2].color, "#abc");
}

#[test]
fn catalog_format_from_extension_is_case_insensitive() {
    assert_eq!(CatalogFormat::from_path(Path::new("/tmp/a.JSON")), Some(CatalogFormat::Json));
    assert_eq!(CatalogFormat::from_path(Path::new("/tmp/a.toml")), Some(CatalogFormat::Toml));
    assert_eq!(CatalogFormat::from_path(Path::new("/tmp/a.yaml")), None);
    assert_eq!(CatalogFormat::from_path(Path::new("/tmp/a")), None);
}

#[test]
fn load_catalog_reads_from_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tracks.json");
    fs::write(&path, r#"[{ "id": "a", "title": "A", "src": "/a.mp3" }]"#).unwrap();

    let tracks = load_catalog(&path).unwrap();
    assert_eq!(tracks[0].id, "a");
}

#[test]
fn fetch_tracks_degrades_to_empty_on_failure() {
    let dir = tempdir().unwrap();

    let broken = dir.path().join("broken.json");
    fs::write(&broken, "{ not json").unwrap();
    assert!(fetch_tracks(Some(&broken)).is_empty());

    let missing = dir.path().join("missing.json");
    assert!(fetch_tracks(Some(&missing)).is_empty());

    let wrong_ext = dir.path().join("tracks.yaml");
    fs::write(&wrong_ext, "- a").unwrap();
    assert!(fetch_tracks(Some(&wrong_ext)).is_empty());

    assert!(fetch_tracks(None).is_empty());
}

#[test]
fn lint_flags_base_path_prefixed_and_non_mp3_sources() {
    let tracks = vec![
        Track::new("ok", "Ok", "/audio/ok.mp3"),
        Track::new("prefixed", "P", "/eastwick-bully/audio/p.mp3"),
        Track::new("wav", "W", "/audio/w.wav"),
    ];

    let warnings = lint_sources(&tracks, "eastwick-bully");
    assert_eq!(
        warnings,
        vec![
            SourceWarning::BasePathPrefixed {
                id: "prefixed".into(),
                source: "/eastwick-bully/audio/p.mp3".into()
            },
            SourceWarning::NotMp3 {
                id: "wav".into(),
                source: "/audio/w.wav".into()
            },
        ]
    );

    // An empty base path disables the prefix check.
    assert_eq!(lint_sources(&tracks, "").len(), 1);
}
