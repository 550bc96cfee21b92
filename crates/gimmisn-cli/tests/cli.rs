use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use gimmisn_cli::{commands, Cli};
use tempfile::TempDir;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../gimmisn-engine/tests/fixtures")
}

fn copy_dir(from: &Path, to: &Path) {
    fs::create_dir_all(to).unwrap();
    for entry in fs::read_dir(from).unwrap() {
        let entry = entry.unwrap();
        let target = to.join(entry.file_name());
        if entry.file_type().unwrap().is_dir() {
            copy_dir(&entry.path(), &target);
        } else {
            fs::copy(entry.path(), target).unwrap();
        }
    }
}

/// Fixture copy with a settings file pointing at its reference registries.
fn scratch() -> TempDir {
    let dir = TempDir::new().unwrap();
    copy_dir(&fixtures_dir(), dir.path());
    fs::write(
        dir.path().join("gimmisn.toml"),
        r#"
reference_housenumbers = ["refdir/hazszamok_20190511.tsv", "refdir/hazszamok_kieg_20190808.tsv"]
reference_streets = "refdir/utcak_20190514.tsv"
"#,
    )
    .unwrap();
    dir
}

fn run(dir: &TempDir, args: &[&str]) -> String {
    let config = dir.path().join("gimmisn.toml");
    let mut argv = vec!["gimmisn", "--config", config.to_str().unwrap()];
    argv.extend_from_slice(args);
    let cli = Cli::try_parse_from(argv).unwrap();

    let mut out = Vec::new();
    commands::run(&cli, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn missing_housenumbers() {
    let dir = scratch();
    let output = run(&dir, &["missing-housenumbers", "gazdagret"]);
    assert_eq!(
        output,
        "Törökugrató utca\t2\n7, 10\nTűzkő utca\t2\n1, 2\nHamzsabégi út\t1\n1\n"
    );
}

#[test]
fn missing_streets() {
    let dir = scratch();
    assert_eq!(run(&dir, &["missing-streets", "gazdagret"]), "Only In Ref utca\n");
}

#[test]
fn turbo() {
    let dir = scratch();
    let output = run(&dir, &["turbo", "gazdagret"]);
    assert!(output.starts_with("[out:json][timeout:425];\nrel(2713748)->.searchRelation;\n"));
    assert!(output.contains("way[\"name\"=\"Only In Ref utca\"](area.searchArea);\n"));
    assert!(output.ends_with("out skel qt;\n"));
}

#[test]
fn reference_streets() {
    let dir = scratch();
    let list = dir.path().join("workdir/streets-reference-gazdagret.lst");
    fs::remove_file(&list).unwrap();

    run(&dir, &["reference-streets", "gazdagret"]);
    assert!(fs::read_to_string(&list)
        .unwrap()
        .starts_with("Hamzsabégi út\nOnly In Ref Nonsense utca\n"));
}

#[test]
fn reference_housenumbers() {
    let dir = scratch();
    run(&dir, &["reference-housenumbers", "gazdagret"]);
    let content = fs::read_to_string(
        dir.path()
            .join("workdir/street-housenumbers-reference-gazdagret.lst"),
    )
    .unwrap();
    assert!(content.contains("Törökugrató utca\t1*\n"));
}

#[test]
fn update_honors_missing_streets_policy() {
    let dir = scratch();
    let output = run(&dir, &["update"]);
    let lines: Vec<&str> = output.lines().collect();

    assert!(!output.contains("inactiverelation"));
    // ujbuda only checks streets.
    assert!(lines.iter().any(|line| line.starts_with("ujbuda\t-\t")));
    assert!(lines.contains(&"gazdagret\t54.55\t80.00"));
    // budafok never checks streets.
    let budafok = lines.iter().find(|line| line.starts_with("budafok\t")).unwrap();
    assert!(budafok.ends_with("\t-"));
    assert!(!budafok.starts_with("budafok\t-"));

    let workdir = dir.path().join("workdir");
    assert!(workdir.join("gazdagret.percent").exists());
    assert!(workdir.join("gazdagret-streets.percent").exists());
    assert!(!workdir.join("ujbuda.percent").exists());
    assert!(workdir.join("ujbuda-streets.percent").exists());
    assert!(workdir.join("budafok.percent").exists());
    assert!(!workdir.join("budafok-streets.percent").exists());
}

#[test]
fn update_all_includes_inactive() {
    let dir = scratch();
    let output = run(&dir, &["update", "--all"]);
    assert!(output.contains("inactiverelation\t"));
}
