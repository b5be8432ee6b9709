use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const ORDER: &str = "To: Bevande Italia S.r.l.
PO No: 4500123
Date of PO: 15/01/2024
Delivery Date (ON OR BEFORE): 22/01/2024
Item Code    Description    QTY   UOM
*274077  GSD PET 50cl Sprite  12  24x50cl
*999999  Unknown product  1  CS
Total 13
";

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("config.json"), "{}").unwrap();
        fs::write(
            dir.path().join("codes.csv"),
            "customer,internal\n274077,INT-001\n100234,INT-002\n",
        )
        .unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn ordex(&self) -> Command {
        let mut cmd = Command::cargo_bin("ordex").unwrap();
        cmd.arg("--config").arg(self.path("config.json"));
        cmd
    }
}

fn arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn convert_writes_csv_to_stdout() {
    let ws = Workspace::new();
    let input = ws.write("order.txt", ORDER);

    ws.ordex()
        .args(["convert", arg(&input), "-t", arg(&ws.path("codes.csv"))])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "4500123,15/01/2024,22/01/2024,Bevande Italia S.r.l.,*274077,INT-001,GSD PET 50cl Sprite,12,24x50cl",
        ))
        .stdout(predicate::str::contains("*999999,UNMAPPED"))
        .stderr(predicate::str::contains("1 of 2 items unmapped"));
}

#[test]
fn convert_writes_json_file_and_dump() {
    let ws = Workspace::new();
    let input = ws.write("order.txt", ORDER);
    let output = ws.path("out.json");

    ws.ordex()
        .args(["convert", arg(&input), "-t", arg(&ws.path("codes.csv"))])
        .args(["-f", "json", "-o", arg(&output), "--dump-text"])
        .assert()
        .success();

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(report["header"]["order_number"], "4500123");
    assert_eq!(report["rows"].as_array().unwrap().len(), 2);
    assert_eq!(report["summary"]["unmapped_codes"][0], "*999999");

    assert_eq!(fs::read_to_string(ws.path("out_debug.txt")).unwrap(), ORDER);
}

#[test]
fn convert_without_table_marks_everything_unmapped() {
    let ws = Workspace::new();
    let input = ws.write("order.txt", ORDER);

    ws.ordex()
        .args(["convert", arg(&input)])
        .assert()
        .success()
        .stdout(predicate::str::contains("*274077,UNMAPPED"))
        .stderr(predicate::str::contains("No conversion table given"));
}

#[test]
fn convert_missing_input_fails() {
    let ws = Workspace::new();

    ws.ordex()
        .args(["convert", arg(&ws.path("missing.pdf"))])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn batch_isolates_failures_and_writes_summary() {
    let ws = Workspace::new();
    fs::create_dir(ws.path("in")).unwrap();
    ws.write("in/a.txt", ORDER);
    ws.write("in/blank.txt", "   ");
    let out_dir = ws.path("out");
    let pattern = format!("{}/*.txt", ws.path("in").display());

    ws.ordex()
        .args(["batch", &pattern, "-t", arg(&ws.path("codes.csv"))])
        .args(["-d", arg(&out_dir), "--summary", "-j", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 converted"))
        .stdout(predicate::str::contains("1 failed"));

    let sheet = fs::read_to_string(out_dir.join("PO_4500123.csv")).unwrap();
    assert!(sheet.starts_with("order_number,order_date,delivery_date"));

    let summary = fs::read_to_string(out_dir.join("summary.csv")).unwrap();
    let mut lines = summary.lines();
    assert_eq!(
        lines.next(),
        Some("source,status,order_number,items,unmapped,processing_time_ms,error")
    );
    assert!(summary.contains(",converted,4500123,2,1,"));
    assert!(summary.contains("blank.txt,failed,,0,0,"));
}

#[test]
fn batch_keeps_outputs_with_the_same_input_name() {
    let ws = Workspace::new();
    for (dir, row) in [("in1", "*1  Sprite first doc  6  CS"), ("in2", "*2  Fanta second doc  4  CS")] {
        fs::create_dir(ws.path(dir)).unwrap();
        ws.write(
            &format!("{}/order.txt", dir),
            &format!("Item Code  Description  QTY  UOM\n{}\nTotal", row),
        );
    }
    let out_dir = ws.path("out");
    let pattern = format!("{}/in*/order.txt", ws.dir.path().display());

    ws.ordex()
        .args(["batch", &pattern, "-d", arg(&out_dir)])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 converted"));

    let first = fs::read_to_string(out_dir.join("order.csv")).unwrap();
    let second = fs::read_to_string(out_dir.join("order_2.csv")).unwrap();
    assert!(first.contains("*1,UNMAPPED,Sprite first doc,6,CS"));
    assert!(second.contains("*2,UNMAPPED,Fanta second doc,4,CS"));
}

#[test]
fn batch_fail_fast_stops() {
    let ws = Workspace::new();
    fs::create_dir(ws.path("in")).unwrap();
    ws.write("in/blank.txt", "");
    let pattern = format!("{}/*.txt", ws.path("in").display());

    ws.ordex()
        .args(["batch", &pattern, "-d", arg(&ws.path("out")), "--fail-fast"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Conversion failed"));
}

#[test]
fn table_shows_entries_and_lookups() {
    let ws = Workspace::new();
    let table = ws.path("codes.csv");

    ws.ordex()
        .args(["table", arg(&table)])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 entries"))
        .stdout(predicate::str::contains("*274077"));

    ws.ordex()
        .args(["table", arg(&table), "--lookup", "555"])
        .assert()
        .success()
        .stdout(predicate::str::contains("*555 -> UNMAPPED"));
}

#[test]
fn config_set_then_get() {
    let ws = Workspace::new();

    ws.ordex()
        .args(["config", "set", "parser.continuation_lookahead", "3"])
        .assert()
        .success();

    ws.ordex()
        .args(["config", "get", "parser.continuation_lookahead"])
        .assert()
        .success()
        .stdout(predicate::str::diff("3\n"));

    ws.ordex()
        .args(["config", "set", "parser.no_such_key", "1"])
        .assert()
        .failure();
}
