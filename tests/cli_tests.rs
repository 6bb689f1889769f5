use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::{EXAM_DATE, VENUE, init_db, init_exam, setup_test_db, vbsa};

#[test]
fn test_init_creates_store() {
    let db_path = setup_test_db("init_creates_store");

    vbsa()
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("Database initialized"));

    assert!(std::path::Path::new(&db_path).exists());
}

#[test]
fn test_vendor_add_list_del() {
    let db_path = setup_test_db("vendor_crud");
    init_db(&db_path);

    vbsa()
        .args([
            "--db",
            &db_path,
            "vendor",
            "add",
            "--name",
            "EyeWatch CCTV",
            "--type",
            "CCTV",
            "--contact",
            "R. Mehta",
            "--phone",
            "9123456780",
        ])
        .assert()
        .success()
        .stdout(contains("VND-0001"));

    vbsa()
        .args(["--db", &db_path, "vendor", "list"])
        .assert()
        .success()
        .stdout(contains("EyeWatch CCTV").and(contains("R. Mehta")));

    vbsa()
        .args(["--db", &db_path, "vendor", "del", "VND-0001"])
        .assert()
        .success();

    vbsa()
        .args(["--db", &db_path, "vendor", "list"])
        .assert()
        .success()
        .stdout(contains("No vendors registered"));
}

#[test]
fn test_vendor_phone_must_have_ten_digits() {
    let db_path = setup_test_db("vendor_bad_phone");
    init_db(&db_path);

    vbsa()
        .args([
            "--db",
            &db_path,
            "vendor",
            "add",
            "--name",
            "Shield Security",
            "--type",
            "Security",
            "--contact",
            "K. Iyer",
            "--phone",
            "12345",
        ])
        .assert()
        .failure()
        .stderr(contains("10 digits"));
}

#[test]
fn test_user_duplicate_mobile_rejected() {
    let db_path = setup_test_db("user_dup_mobile");
    init_db(&db_path);

    let add = |name: &str| {
        vbsa()
            .args([
                "--db",
                &db_path,
                "user",
                "add",
                "--name",
                name,
                "--mobile",
                "9876543210",
                "--role",
                "Invigilator",
            ])
            .assert()
    };

    add("Asha Rao").success().stdout(contains("USR-0001"));
    add("Someone Else")
        .failure()
        .stderr(contains("Duplicate entry"));
}

#[test]
fn test_user_verify() {
    let db_path = setup_test_db("user_verify");
    init_exam(&db_path);

    vbsa()
        .args(["--db", &db_path, "user", "verify", "USR-0002"])
        .assert()
        .success()
        .stdout(contains("verified"));

    vbsa()
        .args(["--db", &db_path, "user", "list"])
        .assert()
        .success()
        .stdout(contains("Vikram Shah").and(contains("yes")));
}

#[test]
fn test_role_and_asset_type_masters() {
    let db_path = setup_test_db("named_masters");
    init_db(&db_path);

    vbsa()
        .args(["--db", &db_path, "role", "add", "Invigilator"])
        .assert()
        .success()
        .stdout(contains("ROL-0001"));

    vbsa()
        .args(["--db", &db_path, "role", "add", "invigilator"])
        .assert()
        .failure();

    vbsa()
        .args([
            "--db",
            &db_path,
            "asset-type",
            "add",
            "Biometric Device",
            "--description",
            "Fingerprint scanner",
        ])
        .assert()
        .success()
        .stdout(contains("AST-0001"));

    vbsa()
        .args(["--db", &db_path, "asset-type", "list"])
        .assert()
        .success()
        .stdout(contains("Fingerprint scanner"));
}

#[test]
fn test_sessions_expand_with_override() {
    let db_path = setup_test_db("sessions_override");
    init_exam(&db_path);

    vbsa()
        .args([
            "--db",
            &db_path,
            "session",
            "override",
            EXAM_DATE,
            "S1",
            "--start",
            "10:00",
            "--end",
            "13:00",
        ])
        .assert()
        .success();

    vbsa()
        .args([
            "--db", &db_path, "session", "override", EXAM_DATE, "S2", "--disable",
        ])
        .assert()
        .success();

    vbsa()
        .args(["--db", &db_path, "session", "list"])
        .assert()
        .success()
        .stdout(contains("2026-03-10_S1"))
        .stdout(contains("10:00–13:00"))
        .stdout(contains("2026-03-10_S2").not());
}

#[test]
fn test_session_template_rejects_end_before_start() {
    let db_path = setup_test_db("session_bad_template");
    init_db(&db_path);

    vbsa()
        .args([
            "--db",
            &db_path,
            "session",
            "add-template",
            "--start",
            "12:00",
            "--end",
            "11:00",
        ])
        .assert()
        .failure()
        .stderr(contains("must be later"));
}

#[test]
fn test_projects_keep_separate_venues() {
    let db_path = setup_test_db("projects_separate");
    init_exam(&db_path);

    vbsa()
        .args(["--db", &db_path, "--project", "other", "venue", "list"])
        .assert()
        .success()
        .stdout(contains("No venues"));

    vbsa()
        .args(["--db", &db_path, "venue", "list"])
        .assert()
        .success()
        .stdout(contains(VENUE));

    vbsa()
        .args(["--db", &db_path, "project", "list"])
        .assert()
        .success()
        .stdout(contains("default"));
}

#[test]
fn test_map_user_to_venue() {
    let db_path = setup_test_db("map_user_venue");
    init_exam(&db_path);

    vbsa()
        .args([
            "--db", &db_path, "map", "user", "--user", "USR-0001", "--venue", VENUE,
        ])
        .assert()
        .success();

    vbsa()
        .args(["--db", &db_path, "map", "list"])
        .assert()
        .success()
        .stdout(contains("Asha Rao").and(contains(VENUE)));

    vbsa()
        .args([
            "--db", &db_path, "map", "user", "--user", "USR-0001", "--venue", "Nowhere",
        ])
        .assert()
        .failure()
        .stderr(contains("Venue Nowhere not found"));
}

#[test]
fn test_requirements_and_activity_variance() {
    let db_path = setup_test_db("requirements_variance");
    init_exam(&db_path);

    // 250 candidates: biometric 5 required + 1 buffer = 6
    vbsa()
        .args([
            "--db",
            &db_path,
            "device",
            "activity",
            "receive",
            "--venue",
            VENUE,
            "--type",
            "biometric",
            "--qty",
            "8",
        ])
        .assert()
        .success()
        .stdout(contains("ACT-0001"));

    vbsa()
        .args(["--db", &db_path, "device", "requirements", "--venue", VENUE])
        .assert()
        .success()
        .stdout(contains("Surplus (+2)"));

    vbsa()
        .args(["--db", &db_path, "device", "activities"])
        .assert()
        .success()
        .stdout(contains("receive"));
}

#[test]
fn test_unmap_requires_confirmation() {
    let db_path = setup_test_db("unmap_confirm");
    init_exam(&db_path);

    vbsa()
        .args(["--db", &db_path, "device", "unmap", "BIO-003"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(contains("cancelled"));

    vbsa()
        .args(["--db", &db_path, "device", "mapped"])
        .assert()
        .success()
        .stdout(contains("BIO-003"));

    vbsa()
        .args(["--db", &db_path, "device", "unmap", "BIO-003", "--yes"])
        .assert()
        .success();

    vbsa()
        .args(["--db", &db_path, "device", "mapped"])
        .assert()
        .success()
        .stdout(contains("BIO-003").not());
}

#[test]
fn test_log_print_records_operations() {
    let db_path = setup_test_db("log_print");
    init_exam(&db_path);

    vbsa()
        .args(["--db", &db_path, "log", "--print"])
        .assert()
        .success()
        .stdout(contains("venue_add"))
        .stdout(contains("migration_applied"));
}
