use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use unbox_build::dockerfile::{
    DEFAULT_TEMPLATE, DockerfileParams, DockerfileRenderer, RenderError,
};
use unbox_build::extract::{ExtractError, extract_into, extract_jar, read_manifest};
use unbox_build::workdir::WorkDir;
use unbox_core::{ManifestError, UnboxConfig};
use zip::write::SimpleFileOptions;

const MANIFEST: &str = "Manifest-Version: 1.0\r\nMain-Class: com.example.App\r\nClass-Path: lib/a.jar\r\n  lib/b.jar\r\n\r\n";

/// Entry name → contents; names ending in `/` become directory entries.
fn write_jar(dir: &Path, file_name: &str, entries: &[(&str, &[u8])]) -> PathBuf {
    let path = dir.join(file_name);
    let mut writer = zip::ZipWriter::new(std::fs::File::create(&path).unwrap());
    let options = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .unix_permissions(0o644);

    for (name, contents) in entries {
        if name.ends_with('/') {
            writer.add_directory(*name, options).unwrap();
        } else {
            writer.start_file(*name, options).unwrap();
            writer.write_all(contents).unwrap();
        }
    }
    writer.finish().unwrap();
    path
}

fn sample_jar(dir: &Path) -> PathBuf {
    write_jar(
        dir,
        "app.jar",
        &[
            ("META-INF/", b""),
            ("META-INF/MANIFEST.MF", MANIFEST.as_bytes()),
            ("com/example/", b""),
            ("com/example/App.class", b"\xca\xfe\xba\xbe class bytes"),
            ("BOOT-INF/lib/dep.jar", b"nested jar bytes"),
            ("application.yml", b"server:\n  port: 8080\n"),
        ],
    )
}

fn relative_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        for entry in std::fs::read_dir(&dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                stack.push(path);
            } else {
                files.push(path.strip_prefix(root).unwrap().to_path_buf());
            }
        }
    }
    files.sort();
    files
}

// ── Extraction Tests ──

#[test]
fn extract_writes_every_entry_and_parses_manifest() {
    let tmp = TempDir::new().unwrap();
    let jar = sample_jar(tmp.path());

    let extracted = extract_jar(&jar).unwrap();
    let root = extracted.path();

    assert!(root.join("META-INF").is_dir());
    assert!(root.join("com/example").is_dir());
    assert_eq!(
        std::fs::read(root.join("com/example/App.class")).unwrap(),
        b"\xca\xfe\xba\xbe class bytes"
    );
    assert_eq!(
        std::fs::read(root.join("BOOT-INF/lib/dep.jar")).unwrap(),
        b"nested jar bytes"
    );
    assert_eq!(
        std::fs::read_to_string(root.join("META-INF/MANIFEST.MF")).unwrap(),
        MANIFEST
    );

    let manifest = extracted.manifest();
    assert_eq!(manifest.manifest_version(), Some("1.0"));
    assert_eq!(manifest.main_class(), Some("com.example.App"));
    assert_eq!(manifest.get("Class-Path"), Some("lib/a.jar lib/b.jar"));
}

#[test]
fn extract_local_jar_with_minimal_manifest() {
    let tmp = TempDir::new().unwrap();
    let jar = write_jar(
        tmp.path(),
        "app.jar",
        &[
            ("META-INF/MANIFEST.MF", b"Manifest-Version: 1.0\n"),
            ("Main.class", b"main"),
        ],
    );

    let extracted = extract_jar(&jar).unwrap();

    let attributes: Vec<(&str, &str)> = extracted.manifest().iter().collect();
    assert_eq!(attributes, vec![("Manifest-Version", "1.0")]);
    assert_eq!(
        relative_files(extracted.path()),
        vec![PathBuf::from("META-INF/MANIFEST.MF"), PathBuf::from("Main.class")]
    );
}

#[test]
fn extract_without_manifest_yields_empty_manifest() {
    let tmp = TempDir::new().unwrap();
    let jar = write_jar(tmp.path(), "plain.zip", &[("readme.txt", b"hello")]);

    let extracted = extract_jar(&jar).unwrap();

    assert!(extracted.manifest().is_empty());
    assert!(extracted.path().join("readme.txt").exists());
}

#[test]
fn extract_twice_produces_identical_files() {
    let tmp = TempDir::new().unwrap();
    let jar = sample_jar(tmp.path());

    let first = extract_jar(&jar).unwrap();
    let second = extract_jar(&jar).unwrap();
    assert_ne!(first.path(), second.path());

    let files = relative_files(first.path());
    assert_eq!(files, relative_files(second.path()));
    for file in &files {
        assert_eq!(
            std::fs::read(first.path().join(file)).unwrap(),
            std::fs::read(second.path().join(file)).unwrap(),
            "mismatch in {}",
            file.display()
        );
    }
    assert_eq!(first.manifest(), second.manifest());
}

#[test]
fn malformed_manifest_fails_after_earlier_entries_are_written() {
    let tmp = TempDir::new().unwrap();
    let jar = write_jar(
        tmp.path(),
        "bad.jar",
        &[
            ("early.txt", b"written first"),
            ("META-INF/MANIFEST.MF", b"Manifest-Version: 1.0\nBadLine\n"),
            ("late.txt", b"never reached"),
        ],
    );
    let root = tmp.path().join("out");

    let err = extract_into(&jar, &root).unwrap_err();

    match err {
        ExtractError::Manifest {
            source: ManifestError::Malformed { line, .. },
            ..
        } => assert_eq!(line, "BadLine"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(root.join("early.txt").exists());
    assert!(!root.join("late.txt").exists());
}

#[test]
fn missing_archive_is_not_an_archive() {
    let tmp = TempDir::new().unwrap();
    let err = extract_jar(&tmp.path().join("absent.jar")).unwrap_err();
    assert!(matches!(err, ExtractError::NotAnArchive { .. }));
}

#[test]
fn non_zip_file_is_not_an_archive() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("fake.jar");
    std::fs::write(&path, "this is not a zip file").unwrap();

    let err = extract_jar(&path).unwrap_err();
    assert!(matches!(err, ExtractError::NotAnArchive { .. }));
    assert!(err.to_string().contains("not a readable zip archive"));
}

#[test]
fn traversal_entry_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let jar = write_jar(tmp.path(), "evil.jar", &[("../evil.txt", b"pwned")]);
    let root = tmp.path().join("nested/out");

    let err = extract_into(&jar, &root).unwrap_err();

    assert!(matches!(err, ExtractError::UnsafeEntryPath { ref name } if name == "../evil.txt"));
    assert!(!tmp.path().join("nested/evil.txt").exists());
}

#[cfg(unix)]
#[test]
fn extract_preserves_declared_file_mode() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("modes.jar");
    let mut writer = zip::ZipWriter::new(std::fs::File::create(&path).unwrap());
    writer
        .start_file(
            "bin/run.sh",
            SimpleFileOptions::default().unix_permissions(0o755),
        )
        .unwrap();
    writer.write_all(b"#!/bin/sh\n").unwrap();
    writer.finish().unwrap();

    let extracted = extract_jar(&path).unwrap();
    let mode = std::fs::metadata(extracted.path().join("bin/run.sh"))
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o755);
}

#[test]
fn extraction_root_is_removed_on_drop_unless_kept() {
    let tmp = TempDir::new().unwrap();
    let jar = sample_jar(tmp.path());

    let dropped = extract_jar(&jar).unwrap();
    let dropped_root = dropped.path().to_path_buf();
    drop(dropped);
    assert!(!dropped_root.exists());

    let (kept_root, manifest) = extract_jar(&jar).unwrap().keep();
    assert!(kept_root.join("com/example/App.class").exists());
    assert_eq!(manifest.manifest_version(), Some("1.0"));
    std::fs::remove_dir_all(kept_root).unwrap();
}

// ── Manifest-only Read Tests ──

#[test]
fn read_manifest_does_not_need_extraction() {
    let tmp = TempDir::new().unwrap();
    let jar = sample_jar(tmp.path());

    let manifest = read_manifest(&jar).unwrap();
    assert_eq!(manifest.main_class(), Some("com.example.App"));
}

#[test]
fn read_manifest_requires_manifest_entry() {
    let tmp = TempDir::new().unwrap();
    let jar = write_jar(tmp.path(), "plain.zip", &[("readme.txt", b"hello")]);

    let err = read_manifest(&jar).unwrap_err();
    assert!(matches!(err, ExtractError::MissingManifest(_)));
    assert!(err.to_string().contains("not a JAR file"));
}

// ── Dockerfile Rendering Tests ──

fn params(base: &str, volumes: &[&str]) -> DockerfileParams {
    DockerfileParams {
        base_image: base.to_owned(),
        volumes: volumes.iter().map(|v| (*v).to_owned()).collect(),
    }
}

#[test]
fn dockerfile_uses_base_image_and_volumes_in_order() {
    let renderer = DockerfileRenderer::new().unwrap();
    let output = renderer
        .render(&params("eclipse-temurin:17-jre", &["/data", "/logs"]))
        .unwrap();

    let lines: Vec<&str> = output.lines().collect();
    assert!(lines.contains(&"FROM eclipse-temurin:17-jre"));
    let volumes: Vec<&str> = lines
        .iter()
        .copied()
        .filter(|l| l.starts_with("VOLUME"))
        .collect();
    assert_eq!(volumes, vec!["VOLUME /data", "VOLUME /logs"]);
}

#[test]
fn dockerfile_without_volumes_has_no_volume_lines() {
    let renderer = DockerfileRenderer::new().unwrap();
    let output = renderer.render(&params("alpine:3", &[])).unwrap();

    assert!(output.contains("FROM alpine:3"));
    assert!(!output.contains("VOLUME"));
}

#[test]
fn params_are_derived_from_config() {
    let yaml = r#"
base: "eclipse-temurin:17-jre"
repo: /tmp/app.jar
context:
  port: 9000
  volumes: ["/data", "/logs"]
"#;
    let config = UnboxConfig::from_yaml(yaml, Path::new("unbox.yaml")).unwrap();

    assert_eq!(
        DockerfileParams::from_config(&config),
        params("eclipse-temurin:17-jre", &["/data", "/logs"])
    );
}

#[test]
fn custom_template_file_is_used() {
    let tmp = TempDir::new().unwrap();
    let template = tmp.path().join("Dockerfile.tmpl");
    std::fs::write(
        &template,
        "FROM {{ base_image }} AS runtime\n{% for v in volumes %}VOLUME [\"{{ v }}\"]\n{% endfor %}",
    )
    .unwrap();

    let renderer = DockerfileRenderer::from_template_file(&template).unwrap();
    let output = renderer.render(&params("openjdk:21", &["/data"])).unwrap();

    assert!(output.contains("FROM openjdk:21 AS runtime"));
    assert!(output.contains("VOLUME [\"/data\"]"));
}

#[test]
fn missing_template_file_is_read_error() {
    let tmp = TempDir::new().unwrap();
    let result = DockerfileRenderer::from_template_file(&tmp.path().join("nope.tmpl"));
    assert!(matches!(result, Err(RenderError::ReadTemplate { .. })));
}

#[test]
fn unparsable_template_is_parse_error() {
    let result = DockerfileRenderer::from_template_str("FROM {{ base_image ");
    assert!(matches!(result, Err(RenderError::Parse { .. })));
}

#[test]
fn unknown_variable_is_render_error() {
    let renderer = DockerfileRenderer::from_template_str("FROM {{ runtime_image }}\n").unwrap();
    let result = renderer.render(&params("alpine", &[]));
    assert!(matches!(result, Err(RenderError::Render { .. })));
}

#[test]
fn default_template_mentions_both_parameters() {
    assert!(DEFAULT_TEMPLATE.contains("base_image"));
    assert!(DEFAULT_TEMPLATE.contains("volumes"));
}

// ── Work Directory Tests ──

#[test]
fn write_dockerfile_creates_work_dir() {
    let tmp = TempDir::new().unwrap();
    let work_dir = WorkDir::in_home(tmp.path());
    assert!(!work_dir.path().exists());

    let written = work_dir.write_dockerfile("FROM alpine\n").unwrap();

    assert_eq!(written, tmp.path().join(".unbox/Dockerfile"));
    assert_eq!(std::fs::read_to_string(&written).unwrap(), "FROM alpine\n");
}

#[test]
fn write_dockerfile_overwrites_previous_output() {
    let tmp = TempDir::new().unwrap();
    let work_dir = WorkDir::new(tmp.path().join("work"));

    work_dir.write_dockerfile("FROM first\n").unwrap();
    work_dir.write_dockerfile("FROM second\n").unwrap();

    assert_eq!(
        std::fs::read_to_string(work_dir.dockerfile_path()).unwrap(),
        "FROM second\n"
    );
    let leftovers: Vec<_> = std::fs::read_dir(work_dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(leftovers, vec![std::ffi::OsString::from("Dockerfile")]);
}

#[test]
fn write_dockerfile_fails_when_work_dir_is_a_file() {
    let tmp = TempDir::new().unwrap();
    let blocker = tmp.path().join("work");
    std::fs::write(&blocker, "not a directory").unwrap();

    let result = WorkDir::new(&blocker).write_dockerfile("FROM alpine\n");
    assert!(result.is_err());
}
