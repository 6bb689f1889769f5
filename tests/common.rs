#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;

pub const VENUE: &str = "Central School";
pub const VENUE_LAT: &str = "18.5204";
pub const VENUE_LNG: &str = "73.8567";
pub const EXAM_DATE: &str = "2026-03-10";
pub const SESSION_1: &str = "2026-03-10_S1";

pub fn vbsa() -> Command {
    cargo_bin_cmd!("vbsa")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_vbsa.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// A small non-empty file standing in for a captured face photo.
pub fn photo_file(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_face.jpg", name));
    fs::write(&path, [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10]).expect("write photo");
    path.to_string_lossy().to_string()
}

pub fn init_db(db_path: &str) {
    vbsa()
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();
}

/// One venue with two labs and 250 candidates, one exam date with the
/// default sessions, three biometric devices and two registered users.
pub fn init_exam(db_path: &str) {
    init_db(db_path);

    vbsa()
        .args([
            "--db",
            db_path,
            "venue",
            "add",
            "--name",
            VENUE,
            "--city",
            "Pune",
            "--lat",
            VENUE_LAT,
            "--lng",
            VENUE_LNG,
            "--candidates",
            "250",
            "--lab",
            "Lab-1",
            "--lab",
            "Lab-2",
        ])
        .assert()
        .success();

    vbsa()
        .args(["--db", db_path, "session", "dates", EXAM_DATE])
        .assert()
        .success();

    vbsa()
        .args([
            "--db", db_path, "device", "map", VENUE, "BIO-001", "BIO-002", "BIO-003",
        ])
        .assert()
        .success();

    vbsa()
        .args([
            "--db",
            db_path,
            "user",
            "add",
            "--name",
            "Asha Rao",
            "--mobile",
            "9876543210",
            "--role",
            "Invigilator",
        ])
        .assert()
        .success();

    vbsa()
        .args([
            "--db",
            db_path,
            "user",
            "add",
            "--name",
            "Vikram Shah",
            "--mobile",
            "9123456789",
            "--role",
            "Server Manager",
        ])
        .assert()
        .success();
}

/// `attendance mark` for `user` with the venue coordinates at 08:30 on the exam day.
pub fn mark(db_path: &str, user: &str, device: &str, photo: &str) -> Command {
    let mut cmd = vbsa();
    cmd.args([
        "--db",
        db_path,
        "--now",
        "2026-03-10 08:30",
        "attendance",
        "mark",
        "--user",
        user,
        "--session",
        SESSION_1,
        "--venue",
        VENUE,
        "--lab",
        "Lab-1",
        "--type",
        "biometric",
        "--device",
        device,
        "--photo",
        photo,
        "--lat",
        VENUE_LAT,
        "--lng",
        VENUE_LNG,
    ]);
    cmd
}
