use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

mod common;

#[test]
fn test_malformed_csv_handling() {
    let dir = tempfile::tempdir().unwrap();
    let output_path = dir.path().join("robustness_test.csv");
    let mut wtr = csv::Writer::from_path(&output_path).unwrap();
    wtr.write_record(common::HEADER).unwrap();

    // Valid expense
    wtr.write_record(["1", "Lunch", "20", "A", "A;B", "2024-05-01", "1"])
        .unwrap();
    // Text in amount field
    wtr.write_record(["2", "Lunch", "twenty", "A", "A;B", "2024-05-01", "2"])
        .unwrap();
    // Negative amount parses but is rejected by the ledger
    wtr.write_record(["3", "Refund", "-5", "B", "A", "2024-05-01", "3"])
        .unwrap();
    // Valid expense again
    wtr.write_record(["4", "Coffee", "4", "B", "", "2024-05-01", "4"])
        .unwrap();
    wtr.flush().unwrap();
    drop(wtr);

    let mut cmd = Command::new(cargo_bin!("splitledger"));
    cmd.arg(&output_path);

    // A: +20 -10 -2 = 8, B: -10 +4 -2 = -8
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Error reading expense"))
        .stderr(predicate::str::contains("Error importing expense"))
        .stdout(predicate::str::contains("A,8"))
        .stdout(predicate::str::contains("B,-8"))
        .stdout(predicate::str::contains("B,A,8"));
}

#[test]
fn test_duplicate_expense_ids_counted_once() {
    let dir = tempfile::tempdir().unwrap();
    let output_path = dir.path().join("duplicates.csv");
    let mut wtr = csv::Writer::from_path(&output_path).unwrap();
    wtr.write_record(common::HEADER).unwrap();
    wtr.write_record(["1", "Hotel", "100", "A", "A;B", "2024-05-01", "1"])
        .unwrap();
    wtr.write_record(["1", "Hotel", "100", "A", "A;B", "2024-05-01", "1"])
        .unwrap();
    wtr.flush().unwrap();
    drop(wtr);

    Command::new(cargo_bin!("splitledger"))
        .arg(&output_path)
        .assert()
        .success()
        .stderr(predicate::str::contains("Duplicate expense id 1"))
        .stdout(predicate::str::contains("B,A,50"));
}

#[test]
fn test_empty_ledger_is_settled() {
    let dir = tempfile::tempdir().unwrap();
    let output_path = dir.path().join("empty.csv");
    let mut wtr = csv::Writer::from_path(&output_path).unwrap();
    wtr.write_record(common::HEADER).unwrap();
    wtr.flush().unwrap();
    drop(wtr);

    Command::new(cargo_bin!("splitledger"))
        .arg(&output_path)
        .args(["-m", "A", "-m", "B"])
        .assert()
        .success()
        .stdout(predicate::str::diff(
            "member,balance\nA,0\nB,0\n\nfrom,to,amount\n",
        ));
}

#[test]
fn test_oversized_amounts_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let output_path = dir.path().join("oversized.csv");
    let (payer, debtor) = (common::member_name(0), common::member_name(1));
    let mut wtr = csv::Writer::from_path(&output_path).unwrap();
    wtr.write_record(common::HEADER).unwrap();
    for id in ["1", "2"] {
        wtr.write_record([
            id,
            "Jackpot",
            "50000000000000000000000000000",
            payer.as_str(),
            debtor.as_str(),
            "2024-05-01",
            id,
        ])
        .unwrap();
    }
    wtr.write_record([
        "3",
        "Lunch",
        "30",
        payer.as_str(),
        debtor.as_str(),
        "2024-05-02",
        "3",
    ])
    .unwrap();
    wtr.flush().unwrap();
    drop(wtr);

    Command::new(cargo_bin!("splitledger"))
        .arg(&output_path)
        .assert()
        .success()
        .stderr(predicate::str::contains("Error importing expense"))
        .stderr(predicate::str::contains("must not exceed"))
        .stdout(predicate::str::contains("member00,30"))
        .stdout(predicate::str::contains("member01,member00,30"));
}

#[test]
fn test_numeric_member_names_are_kept() {
    let dir = tempfile::tempdir().unwrap();
    let output_path = dir.path().join("numeric_names.csv");
    let mut wtr = csv::Writer::from_path(&output_path).unwrap();
    wtr.write_record(common::HEADER).unwrap();
    wtr.write_record(["1", "Tickets", "20", "007", "007;nan", "2024-05-01", "1"])
        .unwrap();
    wtr.flush().unwrap();
    drop(wtr);

    Command::new(cargo_bin!("splitledger"))
        .arg(&output_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("007,10"))
        .stdout(predicate::str::contains("nan,-10"))
        .stdout(predicate::str::contains("nan,007,10"));
}
