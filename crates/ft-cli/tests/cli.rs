use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Write a config that keeps local storage inside `temp`
fn write_config(temp: &Path) -> PathBuf {
    let path = temp.join("config.toml");
    let storage = temp.join("storage");
    fs::write(
        &path,
        format!(
            "[api]\nbase_url = \"http://127.0.0.1:9/api\"\ntimeout_secs = 2\n\n[storage]\ndir = {:?}\n",
            storage.display().to_string()
        ),
    )
    .unwrap();
    path
}

fn cli(config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("fiscal-tracker").unwrap();
    cmd.env_remove("FISCAL_TRACKER_API_URL")
        .arg("--no-color")
        .arg("--config")
        .arg(config);
    cmd
}

#[test]
fn help_lists_commands() {
    Command::cargo_bin("fiscal-tracker")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("export"))
        .stdout(predicate::str::contains("empresas"))
        .stdout(predicate::str::contains("login"));
}

#[test]
fn export_sample_writes_dated_csv() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path());
    let out = temp.path().join("out");

    cli(&config)
        .args(["export", "--sample", "--output-dir"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 10 companies"));

    let files: Vec<_> = fs::read_dir(&out)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(files.len(), 1);
    let name = &files[0];
    assert!(name.starts_with("empresas-report-"), "{}", name);
    assert!(name.ends_with(".csv"), "{}", name);

    let content = fs::read_to_string(out.join(name)).unwrap();
    assert!(content.starts_with("\u{feff}ID,CNPJ,Razão Social,Setor,Bairro,Porte,B/C Ratio,Impacto Líquido\n"));
    assert!(content.contains("\"12345678000123\""));
    assert_eq!(content.lines().count(), 11);
}

#[test]
fn export_filtered_sample_keeps_only_visible_rows() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path());
    let out = temp.path().join("out");

    cli(&config)
        .args(["export", "--sample", "--porte", "GRANDE", "--prefix", "grandes", "-o"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 3 companies"))
        .stderr(predicate::str::contains("Showing 3 of 10 companies"));

    let entry = fs::read_dir(&out).unwrap().next().unwrap().unwrap();
    assert!(entry.file_name().to_string_lossy().starts_with("grandes-"));
}

#[test]
fn export_with_no_matches_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path());
    let out = temp.path().join("out");

    cli(&config)
        .args(["export", "--sample", "--busca", "no such company", "-o"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("No companies to export"));

    assert!(!out.exists() || fs::read_dir(&out).unwrap().next().is_none());
}

#[test]
fn export_to_stdout() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path());

    cli(&config)
        .args(["export", "--sample", "--busca", "alpha", "--stdout"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Empresa Alpha Ltda"))
        .stderr(predicate::str::contains("Exported 1 companies"));
}

#[test]
fn empresas_sample_json_is_filtered() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path());

    let output = cli(&config)
        .args(["empresas", "--sample", "--setor", "Tecnologia", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let records: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(records.as_array().unwrap().len(), 2);
}

#[test]
fn unknown_porte_fails() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path());

    cli(&config)
        .args(["empresas", "--sample", "--porte", "GIGANTE"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown porte"));
}

#[test]
fn unknown_view_is_rejected() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path());

    cli(&config).args(["show", "relatorios"]).assert().failure();
}

#[test]
fn whoami_without_session() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path());

    cli(&config)
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not logged in"));
}

#[test]
fn config_path_echoes_explicit_file() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path());

    cli(&config)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn detalhe_rejects_invalid_cnpj() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path());

    cli(&config)
        .args(["detalhe", "11.222.333/0001-00"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid CNPJ"));
}

#[test]
fn detalhe_unreachable_api_fails() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path());

    cli(&config)
        .args(["detalhe", "11222333000181"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load company 11.222.333/0001-81"));
}
