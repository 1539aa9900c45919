#![cfg(feature = "storage-rocksdb")]

use assert_cmd::cargo_bin;
use std::process::Command;
use tempfile::tempdir;

fn run(db_path: &std::path::Path, args: &[&str]) -> String {
    let output = Command::new(cargo_bin!("ductquote"))
        .args(args)
        .arg("--db-path")
        .arg(db_path)
        .env_remove("DUCTQUOTE_CONFIG")
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success(), "{:?} failed", args);
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_rocksdb_catalog_persists_across_runs() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("test_db");

    // 1. First run: store a surcharge and a service
    run(&db_path, &["zipcode", "set", "84101", "50"]);
    run(&db_path, &["service", "set", "dryer_vent", "99", "--description", "Dryer vent"]);

    // 2. Second run: the catalog is recovered from disk
    let zipcodes = run(&db_path, &["zipcode", "list"]);
    assert!(zipcodes.contains("84101,50"));
    let services = run(&db_path, &["service", "list"]);
    assert!(services.contains("dryer_vent,99,false,Dryer vent"));

    // 3. Quotes priced from the stored catalog pick up the surcharge and add-on
    let mut csv = tempfile::NamedTempFile::new().unwrap();
    std::io::Write::write_all(
        &mut csv,
        b"square_footage,additional_hvac_systems,zipcode,services\n2500,2,84101,dryer_vent\n",
    )
    .unwrap();
    let quotes = run(&db_path, &["quote", csv.path().to_str().unwrap()]);
    assert!(quotes.contains("84101,2500,2,500,600,50,1150,230,920,6000,4800,99"));

    // 4. Removal is persisted too
    run(&db_path, &["zipcode", "remove", "84101"]);
    let zipcodes = run(&db_path, &["zipcode", "list"]);
    assert!(!zipcodes.contains("84101"));
}

#[test]
fn test_rocksdb_catalog_version_advances_across_runs() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("test_db");

    let version = || -> u64 {
        let payload: serde_json::Value =
            serde_json::from_str(&run(&db_path, &["job", "tests/fixtures/job.json"])).unwrap();
        payload["config_version"].as_u64().unwrap()
    };

    assert_eq!(version(), 1);
    run(&db_path, &["zipcode", "set", "84101", "50"]);
    assert_eq!(version(), 2);

    // A removal of a missing zipcode changes nothing, so the version holds.
    run(&db_path, &["zipcode", "remove", "99999"]);
    assert_eq!(version(), 2);

    run(&db_path, &["service", "set", "dryer_vent", "99"]);
    assert_eq!(version(), 3);
}
