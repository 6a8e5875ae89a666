use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;

fn write_book(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("book.json");
    let book = json!({
        "sheets": [
            {
                "name": "Items|item",
                "rows": [
                    ["", ""],
                    ["int", "string"],
                    ["id", "name"],
                    ["", ""],
                    [1, "sword"],
                    [2, "shield"]
                ]
            },
            {
                "name": "Drops|drop",
                "rows": [
                    ["", ""],
                    ["int", "int(item.id)"],
                    ["id", "item"],
                    ["", ""],
                    [1, 2]
                ]
            }
        ]
    });
    std::fs::write(&path, book.to_string()).unwrap();
    path
}

#[test]
fn exports_json_files() {
    let dir = tempfile::tempdir().unwrap();
    let book = write_book(dir.path());
    let out = dir.path().join("out");

    Command::cargo_bin("cellcast")
        .unwrap()
        .arg("-p")
        .arg(&book)
        .arg("-f")
        .arg(&out)
        .arg("-c")
        .arg(out.join("manifest.json"))
        .assert()
        .success();

    let items: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(out.join("items.json")).unwrap()).unwrap();
    assert_eq!(items[1]["name"], "shield");
    assert!(out.join("drops.json").exists());
    assert!(out.join("manifest.json").exists());
}

#[test]
fn lua_format_and_suffix() {
    let dir = tempfile::tempdir().unwrap();
    let book = write_book(dir.path());
    let out = dir.path().join("out");

    Command::cargo_bin("cellcast")
        .unwrap()
        .args(["-e", "lua", "-t", "_srv"])
        .arg("-p")
        .arg(&book)
        .arg("-f")
        .arg(&out)
        .assert()
        .success();

    let text = std::fs::read_to_string(out.join("items_srv.lua")).unwrap();
    assert!(text.starts_with("return {"));
}

#[test]
fn config_file_supplies_inputs() {
    let dir = tempfile::tempdir().unwrap();
    let book = write_book(dir.path());
    let out = dir.path().join("out");
    let config = dir.path().join("cellcast.yaml");
    std::fs::write(
        &config,
        format!(
            "inputs: [{:?}]\nfolder: {:?}\nformat: ycl\n",
            book.display().to_string(),
            out.display().to_string()
        ),
    )
    .unwrap();

    Command::cargo_bin("cellcast")
        .unwrap()
        .arg("--config")
        .arg(&config)
        .assert()
        .success();
    assert!(out.join("items.ycl").exists());
}

#[test]
fn failures_exit_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("book.json");
    std::fs::write(
        &path,
        json!({"sheets": [{
            "name": "Drops|drop",
            "rows": [["", ""], ["int", "int(item.id)"], ["id", "item"], ["", ""], [1, 7]]
        }]})
        .to_string(),
    )
    .unwrap();

    Command::cargo_bin("cellcast")
        .unwrap()
        .arg("-p")
        .arg(&path)
        .arg("-f")
        .arg(dir.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("export failed"))
        .stderr(predicate::str::contains("mark `item` not found"));
}

#[test]
fn missing_inputs_exit_non_zero() {
    Command::cargo_bin("cellcast")
        .unwrap()
        .assert()
        .failure()
        .stderr(predicate::str::contains("no input workbooks"));
}
