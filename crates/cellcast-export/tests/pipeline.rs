use cellcast_export::{ExportConfig, ExportError, Exporter, OutputFormat};
use serde_json::{Value as Json, json};
use std::path::{Path, PathBuf};

fn write_book(dir: &Path, file: &str, sheets: Json) -> PathBuf {
    let path = dir.join(file);
    std::fs::write(&path, json!({ "sheets": sheets }).to_string()).expect("write workbook");
    path
}

fn items_sheet() -> Json {
    json!({
        "name": "Items|item",
        "rows": [
            ["Id", "Display name"],
            ["int", "string"],
            ["id", "name"],
            ["", ""],
            [1, "sword"],
            [2, "shield"]
        ]
    })
}

fn settings_sheet() -> Json {
    json!({
        "name": "Settings|setting",
        "rows": [
            ["name", "value", "type", "description"],
            ["maxHp", 100, "int", "hit points"],
            ["title", "Hero", "string", ""]
        ]
    })
}

fn config(dir: &Path, inputs: Vec<PathBuf>, format: OutputFormat) -> ExportConfig {
    ExportConfig {
        inputs,
        folder: dir.join("out"),
        format,
        ..ExportConfig::default()
    }
}

fn read_json(path: &Path) -> Json {
    let text = std::fs::read_to_string(path).expect("read output");
    serde_json::from_str(&text).expect("output is json")
}

#[test]
fn item_and_config_sheets_to_json() {
    let dir = tempfile::tempdir().expect("temp dir");
    let book = write_book(
        dir.path(),
        "book.json",
        json!([items_sheet(), settings_sheet(), {"name": "Notes", "rows": [["free text"]]}]),
    );

    let summary = Exporter::new(config(dir.path(), vec![book], OutputFormat::Json))
        .run()
        .unwrap();
    assert_eq!(summary.written.len(), 2);
    assert!(summary.manifest.is_none());

    let items = read_json(&dir.path().join("out/items.json"));
    assert_eq!(
        items,
        json!([{"id": 1, "name": "sword"}, {"id": 2, "name": "shield"}])
    );
    let setting = read_json(&dir.path().join("out/setting.json"));
    assert_eq!(setting, json!({"maxHp": 100, "title": "Hero"}));
}

#[test]
fn unresolved_reference_names_its_cell() {
    let dir = tempfile::tempdir().expect("temp dir");
    let book = write_book(
        dir.path(),
        "book.json",
        json!([
            items_sheet(),
            {
                "name": "Drops|drop",
                "rows": [
                    ["", ""],
                    ["int", "int(item.id)"],
                    ["id", "item"],
                    ["", ""],
                    [1, 7]
                ]
            }
        ]),
    );

    let mut exporter = Exporter::new(config(dir.path(), vec![book], OutputFormat::Json));
    let err = exporter.run().unwrap_err();
    assert!(matches!(err, ExportError::UnresolvedValue { .. }), "{err}");
    let message = err.to_string();
    assert!(message.contains("item.id"), "{message}");
    assert!(message.contains("Drops|drop row 5 column 2"), "{message}");
    assert!(!dir.path().join("out/items.json").exists());
}

#[test]
fn resolved_reference_exports() {
    let dir = tempfile::tempdir().expect("temp dir");
    let book = write_book(
        dir.path(),
        "book.json",
        json!([
            {
                "name": "Drops|drop",
                "rows": [
                    ["", ""],
                    ["int", "int(item.id)"],
                    ["id", "item"],
                    ["", ""],
                    [1, 2]
                ]
            },
            items_sheet()
        ]),
    );

    let mut exporter = Exporter::new(config(dir.path(), vec![book], OutputFormat::Json));
    exporter.run().unwrap();
    assert_eq!(exporter.constraints().len(), 1);
    assert_eq!(
        read_json(&dir.path().join("out/drops.json")),
        json!([{"id": 1, "item": 2}])
    );
}

#[test]
fn map_sheet_nests_by_key_columns() {
    let dir = tempfile::tempdir().expect("temp dir");
    let book = write_book(
        dir.path(),
        "book.json",
        json!([{
            "name": "Monsters|monster|map2",
            "rows": [
                ["", "", ""],
                ["int", "string", "int"],
                ["zone", "kind", "hp"],
                ["", "", ""],
                [1, "orc", 10],
                [1, "elf", 8],
                [2, "orc", 12]
            ]
        }]),
    );

    Exporter::new(config(dir.path(), vec![book], OutputFormat::Json))
        .run()
        .unwrap();
    let out = read_json(&dir.path().join("out/monsters.json"));
    assert_eq!(out["1"]["elf"], json!({"zone": 1, "kind": "elf", "hp": 8}));
    assert_eq!(out["2"]["orc"]["hp"], json!(12));
}

#[test]
fn grouped_sheets_share_one_record() {
    let dir = tempfile::tempdir().expect("temp dir");
    let book = write_book(
        dir.path(),
        "book.json",
        json!([
            {
                "name": "Hero|hero<<",
                "rows": [
                    ["name", "value", "type"],
                    ["title", "Knight", "string"]
                ]
            },
            {
                "name": "Skills|skill",
                "rows": [
                    ["", ""],
                    ["int", "string"],
                    ["id", "name"],
                    ["", ""],
                    [1, "slash"]
                ]
            },
            {
                "name": "Stats|stat>>",
                "rows": [
                    ["name", "value", "type"],
                    ["hp", 30, "int"]
                ]
            },
            items_sheet()
        ]),
    );

    let mut exporter = Exporter::new(ExportConfig {
        manifest: Some(dir.path().join("out/manifest.json")),
        ..config(dir.path(), vec![book], OutputFormat::Json)
    });
    let summary = exporter.run().unwrap();
    assert_eq!(exporter.records().len(), 2);
    assert_eq!(summary.written.len(), 2);

    let hero = read_json(&dir.path().join("out/hero.json"));
    assert_eq!(
        hero,
        json!({"title": "Knight", "skills": [{"id": 1, "name": "slash"}], "hp": 30})
    );

    let manifest = read_json(&dir.path().join("out/manifest.json"));
    let entries = manifest.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["root"], "hero");
    assert_eq!(entries[0]["item"], "hero");
    assert_eq!(entries[0]["schema"]["skills"][0][0]["id"], json!(["int"]));
    assert_eq!(entries[1]["root"], "items");
    assert_eq!(entries[1]["item"], "item");
}

#[test]
fn group_state_resets_between_files() {
    let dir = tempfile::tempdir().expect("temp dir");
    let first = write_book(
        dir.path(),
        "first.json",
        json!([{
            "name": "Hero|hero<<",
            "rows": [["name", "value", "type"], ["title", "Knight", "string"]]
        }]),
    );
    let second = write_book(dir.path(), "second.json", json!([items_sheet()]));

    let mut exporter = Exporter::new(config(dir.path(), vec![first, second], OutputFormat::Json));
    exporter.run().unwrap();
    let roots: Vec<_> = exporter.records().iter().map(|r| r.root.as_str()).collect();
    assert_eq!(roots, vec!["hero", "items"]);
}

#[test]
fn text_formats_and_suffix() {
    let dir = tempfile::tempdir().expect("temp dir");
    let book = write_book(dir.path(), "book.json", json!([items_sheet(), settings_sheet()]));

    for format in [OutputFormat::Lua, OutputFormat::Ycl, OutputFormat::Xml] {
        let out = dir.path().join(format.extension());
        let cfg = ExportConfig {
            inputs: vec![book.clone()],
            folder: out.clone(),
            format,
            suffix: Some("_client".into()),
            ..ExportConfig::default()
        };
        Exporter::new(cfg).run().unwrap();

        let ext = format.extension();
        let items = std::fs::read_to_string(out.join(format!("items_client.{ext}"))).unwrap();
        let setting = std::fs::read_to_string(out.join(format!("setting_client.{ext}"))).unwrap();
        match format {
            OutputFormat::Lua => {
                assert!(items.starts_with("return {"), "{items}");
                assert!(items.contains("name = \"sword\""), "{items}");
                assert!(setting.contains("maxHp = 100"), "{setting}");
            }
            OutputFormat::Ycl => {
                assert!(items.starts_with('{'), "{items}");
                assert!(setting.starts_with("maxHp = 100"), "{setting}");
            }
            OutputFormat::Xml => {
                assert!(items.contains("<items_client>"), "{items}");
                assert!(items.contains("<item id=\"1\" name=\"sword\"/>"), "{items}");
                assert!(setting.contains("<setting_client maxHp=\"100\""), "{setting}");
            }
            OutputFormat::Json => unreachable!(),
        }
    }
}

#[test]
fn sign_selection_filters_columns() {
    let dir = tempfile::tempdir().expect("temp dir");
    let book = write_book(
        dir.path(),
        "book.json",
        json!([{
            "name": "Items|item",
            "rows": [
                ["", "", ""],
                ["int", "string", "int"],
                ["id", "name", "price"],
                ["", "client", "server"],
                [1, "sword", 30]
            ]
        }]),
    );

    let cfg = ExportConfig {
        sign: Some("server".into()),
        ..config(dir.path(), vec![book], OutputFormat::Json)
    };
    Exporter::new(cfg).run().unwrap();
    assert_eq!(
        read_json(&dir.path().join("out/items.json")),
        json!([{"id": 1, "price": 30}])
    );
}

#[test]
fn duplicate_roots_and_paths_are_rejected() {
    let dir = tempfile::tempdir().expect("temp dir");
    let first = write_book(dir.path(), "first.json", json!([items_sheet()]));
    let second = write_book(dir.path(), "second.json", json!([items_sheet()]));

    let err = Exporter::new(config(dir.path(), vec![first.clone(), second.clone()], OutputFormat::Json))
        .run()
        .unwrap_err();
    match err {
        ExportError::DuplicateRoot { root, path, previous } => {
            assert_eq!(root, "items");
            assert_eq!(path, second);
            assert_eq!(previous, first);
        }
        other => panic!("unexpected error: {other}"),
    }

    let err = Exporter::new(config(dir.path(), vec![first.clone(), first], OutputFormat::Json))
        .run()
        .unwrap_err();
    assert!(matches!(err, ExportError::DuplicatePath(_)), "{err}");
}

#[test]
fn empty_sheets_write_nothing() {
    let dir = tempfile::tempdir().expect("temp dir");
    let book = write_book(
        dir.path(),
        "book.json",
        json!([{
            "name": "Items|item",
            "rows": [["", ""], ["int", "string"], ["id", "name"], ["", ""]]
        }]),
    );

    let summary = Exporter::new(ExportConfig {
        manifest: Some(dir.path().join("out/manifest.json")),
        ..config(dir.path(), vec![book], OutputFormat::Json)
    })
    .run()
    .unwrap();
    assert!(summary.written.is_empty());
    assert!(summary.manifest.is_none());
    assert!(!dir.path().join("out/manifest.json").exists());
}

#[test]
fn bad_cell_reports_location() {
    let dir = tempfile::tempdir().expect("temp dir");
    let book = write_book(
        dir.path(),
        "book.json",
        json!([{
            "name": "Items|item",
            "rows": [["", ""], ["int", "bool"], ["id", "ok"], ["", ""], [1, "maybe"]]
        }]),
    );

    let err = Exporter::new(config(dir.path(), vec![book], OutputFormat::Json))
        .run()
        .unwrap_err();
    let message = err.to_string();
    assert!(message.contains("Items|item row 5 column 2"), "{message}");
    assert!(message.contains("illegal bool value"), "{message}");
}

#[test]
fn unsupported_input_is_a_workbook_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("book.csv");
    std::fs::write(&path, "a,b").unwrap();
    let err = Exporter::new(config(dir.path(), vec![path], OutputFormat::Json))
        .run()
        .unwrap_err();
    assert!(matches!(err, ExportError::Workbook(_)), "{err}");
}

#[test]
fn int_keyed_map_cannot_be_xml() {
    let dir = tempfile::tempdir().expect("temp dir");
    let book = write_book(
        dir.path(),
        "book.json",
        json!([{
            "name": "Monsters|monster|map",
            "rows": [
                ["", ""],
                ["int", "string"],
                ["id", "name"],
                ["", ""],
                [1, "orc"],
                [2, "elf"]
            ]
        }]),
    );

    let err = Exporter::new(config(dir.path(), vec![book], OutputFormat::Xml))
        .run()
        .unwrap_err();
    assert!(matches!(err, ExportError::Xml(_)), "{err}");
    assert!(err.to_string().contains("`1` in `monsters`"), "{err}");
    assert!(!dir.path().join("out/monsters.xml").exists());
}

#[test]
fn boolean_cells_feed_numeric_columns() {
    let dir = tempfile::tempdir().expect("temp dir");
    let book = write_book(
        dir.path(),
        "book.json",
        json!([{
            "name": "Flags|flag",
            "rows": [
                ["", "", ""],
                ["int", "int", "bool"],
                ["id", "weight", "on"],
                ["", "", ""],
                [1, true, false]
            ]
        }]),
    );

    Exporter::new(config(dir.path(), vec![book], OutputFormat::Json))
        .run()
        .unwrap();
    assert_eq!(
        read_json(&dir.path().join("out/flags.json")),
        json!([{"id": 1, "weight": 1, "on": false}])
    );
}
