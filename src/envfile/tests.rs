// taskctl-rs: template rendering and envfile generation for taskctl
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::time::Duration;

use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

use super::filter::NamePattern;
use super::generator::{EnvfileGenerator, Generation};
use super::{DEFAULT_GENERATED_DIR, Envfile, ModifyRule, Operation};
use crate::core::env::snapshot::EnvSnapshot;
use crate::error::{TaskctlError, ValidationError};

fn snapshot() -> EnvSnapshot {
    EnvSnapshot::from_pairs([
        ("HOME", "/home/dev"),
        ("PATH", "/usr/bin"),
        ("TF_VAR_Region", "EU-West"),
        ("TF_VAR_secret", "hunter2"),
        ("GREETING", r#"say "hi""#),
    ])
}

fn envfile_in(dir: &TempDir) -> Envfile {
    Envfile::builder()
        .generated_dir(dir.path())
        .path("stage.env")
        .build()
}

// --- Defaults ---

#[test]
fn test_default_generated_dir() {
    let envfile = Envfile::default();
    assert_eq!(envfile.generated_dir.to_str(), Some(DEFAULT_GENERATED_DIR));
    assert!(envfile.path.as_os_str().is_empty());
    assert!(envfile.modify.is_empty());
    assert!(!envfile.quote);
    assert_eq!(envfile.delay, Duration::ZERO);
}

#[test]
fn test_apply_defaults_fills_empty_dir_only() {
    let mut envfile = Envfile::builder().generated_dir("").build();
    envfile.apply_defaults();
    assert_eq!(envfile.generated_dir.to_str(), Some(".taskctl"));

    let mut envfile = Envfile::builder().generated_dir("out").build();
    envfile.apply_defaults();
    assert_eq!(envfile.generated_dir.to_str(), Some("out"));
}

#[test]
fn test_defaults_with_overrides_still_invalid_without_path() {
    let envfile = Envfile::builder()
        .modify(vec![ModifyRule::new("", "lower")])
        .build();
    assert_eq!(envfile.generated_dir.to_str(), Some(".taskctl"));
    assert!(matches!(envfile.validate(), Err(ValidationError::MissingPath)));
}

// --- Validation ---

#[test]
fn test_validate_ok() {
    let envfile = Envfile::builder()
        .path("a.env")
        .include(vec!["HOME".into(), "TF_VAR_.*".into()])
        .exclude(vec!["TF_VAR_secret".into()])
        .modify(vec![ModifyRule::new("^TF_VAR_", "lower")])
        .build();
    envfile.validate().unwrap();
}

#[test]
fn test_validate_empty_pattern() {
    let envfile = Envfile::builder()
        .path("a.env")
        .modify(vec![
            ModifyRule::new("^A", "upper"),
            ModifyRule::new("", "lower"),
        ])
        .build();
    let err = envfile.validate().unwrap_err();
    assert!(matches!(err, ValidationError::EmptyPattern { index: 1 }));
    insta::assert_snapshot!(err.to_string(), @"modify rule #1 has an empty pattern");
}

#[test]
fn test_validate_invalid_pattern() {
    let envfile = Envfile::builder()
        .path("a.env")
        .modify(vec![ModifyRule::new("(unclosed", "lower")])
        .build();
    assert!(matches!(
        envfile.validate(),
        Err(ValidationError::InvalidPattern { index: 0, .. })
    ));
}

#[test]
fn test_validate_unknown_operation() {
    let envfile = Envfile::builder()
        .path("a.env")
        .modify(vec![ModifyRule::new("^A", "reverse")])
        .build();
    let err = envfile.validate().unwrap_err();
    insta::assert_snapshot!(
        err.to_string(),
        @"modify rule #0 has unknown operation 'reverse' (expected one of: lower, upper, trim)"
    );
}

#[test]
fn test_validate_check_order() {
    // Every check fails; the path check wins
    let mut envfile = Envfile::builder()
        .modify(vec![ModifyRule::new("", "bogus")])
        .include(vec!["(".into()])
        .build();
    assert!(matches!(envfile.validate(), Err(ValidationError::MissingPath)));

    // Patterns are checked across all rules before any operation
    envfile.path = "a.env".into();
    envfile.modify = vec![ModifyRule::new("^A", "bogus"), ModifyRule::new("", "lower")];
    assert!(matches!(
        envfile.validate(),
        Err(ValidationError::EmptyPattern { index: 1 })
    ));

    envfile.modify = vec![ModifyRule::new("^A", "bogus")];
    assert!(matches!(
        envfile.validate(),
        Err(ValidationError::UnknownOperation { index: 0, .. })
    ));

    envfile.modify.clear();
    assert!(matches!(
        envfile.validate(),
        Err(ValidationError::InvalidFilter { list: "include", .. })
    ));
}

#[test]
fn test_validate_path_stays_inside_generated_dir() {
    let outside = TempDir::new().unwrap();
    for path in [
        outside.path().join("escaped.env"),
        "../escaped.env".into(),
        "nested/../../escaped.env".into(),
    ] {
        let envfile = Envfile::builder().path(path.clone()).build();
        assert!(
            matches!(
                envfile.validate(),
                Err(ValidationError::PathOutsideGeneratedDir { .. })
            ),
            "{} was accepted",
            path.display()
        );
    }

    for path in ["stage.env", "./stage.env", "nested/stage.env"] {
        Envfile::builder().path(path).build().validate().unwrap();
    }

    let err = Envfile::builder()
        .path("../x.env")
        .build()
        .validate()
        .unwrap_err();
    insta::assert_snapshot!(
        err.to_string(),
        @"envfile path '../x.env' must be relative and stay inside the generated directory"
    );
}

#[test]
fn test_validate_path_containment_precedes_patterns() {
    let envfile = Envfile::builder()
        .path("/etc/stage.env")
        .modify(vec![ModifyRule::new("", "bogus")])
        .build();
    assert!(matches!(
        envfile.validate(),
        Err(ValidationError::PathOutsideGeneratedDir { .. })
    ));
}

#[test]
fn test_operation_names() {
    assert_eq!(Operation::from_name("lower"), Some(Operation::Lower));
    assert_eq!(Operation::from_name("upper"), Some(Operation::Upper));
    assert_eq!(Operation::from_name("trim"), Some(Operation::Trim));
    assert_eq!(Operation::from_name("LOWER"), None);
    assert_eq!(Operation::Trim.apply("  x "), "x");
    assert_eq!(Operation::Upper.to_string(), "upper");
}

#[test]
fn test_name_pattern_forms() {
    let exact = NamePattern::new("HOME").unwrap();
    assert!(matches!(exact, NamePattern::Exact(_)));
    assert!(exact.matches("HOME"));
    assert!(!exact.matches("HOMEDIR"));

    let re = NamePattern::new("TF_VAR_.*").unwrap();
    assert!(re.matches("TF_VAR_x"));
    assert!(!re.matches("X_TF_VAR_x"), "regex entries are anchored");

    assert!(NamePattern::new("[").is_err());
}

// --- Rendering ---

#[test]
fn test_render_all_variables_in_order() {
    let generator = EnvfileGenerator::new(&Envfile::builder().path("a.env").build()).unwrap();
    let out = generator.render(&snapshot());
    assert_eq!(
        out,
        "HOME=/home/dev\nPATH=/usr/bin\nTF_VAR_Region=EU-West\nTF_VAR_secret=hunter2\nGREETING=say \"hi\"\n"
    );
}

#[test]
fn test_render_filter_transform_quote() {
    let envfile = Envfile::builder()
        .path("a.env")
        .include(vec!["HOME".into(), "TF_VAR_.*".into(), "GREETING".into()])
        .exclude(vec!["TF_VAR_secret".into()])
        .modify(vec![
            ModifyRule::new("^TF_VAR_", "lower"),
            ModifyRule::new("Region", "upper"),
        ])
        .quote(true)
        .build();
    let generator = EnvfileGenerator::new(&envfile).unwrap();
    let out = generator.render(&snapshot());
    // Both rules match TF_VAR_Region: lower, then upper
    assert_eq!(
        out,
        "HOME=\"/home/dev\"\nTF_VAR_Region=\"EU-WEST\"\nGREETING=\"say \\\"hi\\\"\"\n"
    );
}

#[test]
fn test_render_empty_selection() {
    let envfile = Envfile::builder()
        .path("a.env")
        .include(vec!["NOPE".into()])
        .build();
    let generator = EnvfileGenerator::new(&envfile).unwrap();
    assert_eq!(generator.render(&snapshot()), "");
}

#[test]
fn test_render_escapes_line_breaks_in_values() {
    let env = EnvSnapshot::from_pairs([("FOO", "x\nPATH=/evil"), ("BAR", "a\r\nb")]);

    let plain = EnvfileGenerator::new(&Envfile::builder().path("a.env").build()).unwrap();
    let out = plain.render(&env);
    assert_eq!(out.lines().count(), 2);
    assert_eq!(out, "FOO=x\\nPATH=/evil\nBAR=a\\r\\nb\n");

    let quoted =
        EnvfileGenerator::new(&Envfile::builder().path("a.env").quote(true).build()).unwrap();
    let out = quoted.render(&env);
    assert_eq!(out.lines().count(), 2);
    assert!(!out.lines().any(|line| line.starts_with("PATH=")));
}

#[test]
fn test_render_is_deterministic() {
    let generator = EnvfileGenerator::new(&Envfile::builder().path("a.env").build()).unwrap();
    let env = snapshot();
    assert_eq!(generator.render(&env), generator.render(&env));
}

// --- Generation ---

#[tokio::test]
async fn test_generate_writes_immediately() {
    let dir = TempDir::new().unwrap();
    let generator = EnvfileGenerator::new(&envfile_in(&dir)).unwrap();

    let Generation::Written(path) = generator.generate(&snapshot()).await.unwrap() else {
        panic!("expected an immediate write");
    };
    assert_eq!(path, dir.path().join("stage.env"));
    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content, generator.render(&snapshot()));
}

#[tokio::test]
async fn test_generate_creates_nested_dirs_and_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let envfile = Envfile::builder()
        .generated_dir(dir.path().join("a/b"))
        .path("c/out.env")
        .build();
    let generator = EnvfileGenerator::new(&envfile).unwrap();

    generator.generate(&snapshot()).await.unwrap();
    let first = std::fs::read(generator.output_path()).unwrap();
    generator.generate(&snapshot()).await.unwrap();
    let second = std::fs::read(generator.output_path()).unwrap();
    assert_eq!(first, second);

    let entries: Vec<_> = std::fs::read_dir(dir.path().join("a/b/c")).unwrap().collect();
    assert_eq!(entries.len(), 1, "no temp files left behind");
}

#[tokio::test]
async fn test_generate_delayed_write() {
    let dir = TempDir::new().unwrap();
    let mut envfile = envfile_in(&dir);
    envfile.delay = Duration::from_millis(50);
    let generator = EnvfileGenerator::new(&envfile).unwrap();

    let Generation::Scheduled(pending) = generator.generate(&snapshot()).await.unwrap() else {
        panic!("expected a scheduled write");
    };
    assert!(!pending.path().exists(), "written before the delay elapsed");

    let written = pending.wait().await.unwrap();
    assert_eq!(written.as_deref(), Some(dir.path().join("stage.env").as_path()));
    assert!(dir.path().join("stage.env").exists());
}

#[tokio::test]
async fn test_delayed_write_uses_snapshot_at_call_time() {
    let dir = TempDir::new().unwrap();
    let mut envfile = envfile_in(&dir);
    envfile.delay = Duration::from_millis(20);
    let generator = EnvfileGenerator::new(&envfile).unwrap();

    let env = EnvSnapshot::from_pairs([("A", "1")]);
    let Generation::Scheduled(pending) = generator.generate(&env).await.unwrap() else {
        panic!("expected a scheduled write");
    };
    drop(env);
    let path = pending.wait().await.unwrap().unwrap();
    assert_eq!(std::fs::read_to_string(path).unwrap(), "A=1\n");
}

#[tokio::test]
async fn test_cancel_pending_write() {
    let dir = TempDir::new().unwrap();
    let mut envfile = envfile_in(&dir);
    envfile.delay = Duration::from_secs(30);
    let generator = EnvfileGenerator::new(&envfile).unwrap();

    let Generation::Scheduled(pending) = generator.generate(&snapshot()).await.unwrap() else {
        panic!("expected a scheduled write");
    };
    pending.cancel();
    assert_eq!(pending.wait().await.unwrap(), None);
    assert!(!dir.path().join("stage.env").exists());
}

#[tokio::test]
async fn test_cancel_through_generator_token() {
    let dir = TempDir::new().unwrap();
    let mut envfile = envfile_in(&dir);
    envfile.delay = Duration::from_secs(30);
    let token = CancellationToken::new();
    let generator = EnvfileGenerator::new(&envfile)
        .unwrap()
        .with_cancellation(token.clone());

    let mut pending = Vec::new();
    for _ in 0..3 {
        match generator.generate(&snapshot()).await.unwrap() {
            Generation::Scheduled(p) => pending.push(p),
            Generation::Written(_) => panic!("expected a scheduled write"),
        }
    }
    token.cancel();
    for p in pending {
        assert_eq!(p.wait().await.unwrap(), None);
    }
    assert!(!dir.path().join("stage.env").exists());
}

#[tokio::test]
async fn test_dropping_pending_write_cancels_it() {
    let dir = TempDir::new().unwrap();
    let mut envfile = envfile_in(&dir);
    envfile.delay = Duration::from_millis(50);

    // The owning task schedules the write and ends without waiting for it
    let owner = tokio::spawn(async move {
        let generator = EnvfileGenerator::new(&envfile).unwrap();
        match generator.generate(&snapshot()).await.unwrap() {
            Generation::Scheduled(pending) => pending.path().to_path_buf(),
            Generation::Written(_) => panic!("expected a scheduled write"),
        }
    });
    let path = owner.await.unwrap();

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(!path.exists(), "write outlived its owner");
}

#[tokio::test]
async fn test_generate_never_writes_outside_generated_dir() {
    let dir = TempDir::new().unwrap();
    let outside = TempDir::new().unwrap();
    let envfile = Envfile::builder()
        .generated_dir(dir.path())
        .path(outside.path().join("escaped.env"))
        .build();

    let err = EnvfileGenerator::new(&envfile).unwrap_err();
    assert!(matches!(err, ValidationError::PathOutsideGeneratedDir { .. }));
    assert!(!outside.path().join("escaped.env").exists());
}

#[tokio::test]
async fn test_concurrent_generation_same_dir() {
    let dir = TempDir::new().unwrap();
    let mut handles = Vec::new();
    for i in 0..8 {
        let envfile = Envfile::builder()
            .generated_dir(dir.path())
            .path(if i % 2 == 0 { "shared.env" } else { "other.env" })
            .build();
        let env = EnvSnapshot::from_pairs([("N", "same")]);
        handles.push(tokio::spawn(async move {
            let generator = EnvfileGenerator::new(&envfile).unwrap();
            generator.generate(&env).await.map(|_| ())
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }
    for name in ["shared.env", "other.env"] {
        assert_eq!(
            std::fs::read_to_string(dir.path().join(name)).unwrap(),
            "N=same\n"
        );
    }
}

#[tokio::test]
async fn test_generate_fails_when_target_is_directory() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join("stage.env")).unwrap();
    let generator = EnvfileGenerator::new(&envfile_in(&dir)).unwrap();

    let err = generator.generate(&snapshot()).await.unwrap_err();
    assert!(matches!(err, TaskctlError::Fs(_)), "got {err:?}");
}

#[test]
fn test_new_rejects_invalid_definition() {
    let err = EnvfileGenerator::new(&Envfile::default()).unwrap_err();
    assert!(matches!(err, ValidationError::MissingPath));
}

// --- Serde ---

#[test]
fn test_deserialize_from_toml() {
    let envfile: Envfile = toml_envfile(
        r#"
        path = "stage.env"
        include = ["HOME"]
        modify = [{ pattern = "^TF_", operation = "upper" }]
        quote = true
        delay = 250
        "#,
    );
    assert_eq!(envfile.generated_dir.to_str(), Some(".taskctl"));
    assert_eq!(envfile.path.to_str(), Some("stage.env"));
    assert_eq!(envfile.modify, vec![ModifyRule::new("^TF_", "upper")]);
    assert!(envfile.quote);
    assert_eq!(envfile.delay, Duration::from_millis(250));
}

fn toml_envfile(src: &str) -> Envfile {
    config::Config::builder()
        .add_source(config::File::from_str(src, config::FileFormat::Toml))
        .build()
        .unwrap()
        .try_deserialize()
        .unwrap()
}
