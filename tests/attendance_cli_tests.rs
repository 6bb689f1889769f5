use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::{SESSION_1, VENUE, init_exam, mark, photo_file, setup_test_db, vbsa};

#[test]
fn test_mark_attendance_issues_device() {
    let db_path = setup_test_db("att_mark_ok");
    init_exam(&db_path);
    let photo = photo_file("att_mark_ok");

    mark(&db_path, "USR-0001", "BIO-001", &photo)
        .assert()
        .success()
        .stdout(contains("Attendance marked for USR-0001"))
        .stdout(contains("BIO-001"));

    vbsa()
        .args(["--db", &db_path, "attendance", "list", "--session", SESSION_1])
        .assert()
        .success()
        .stdout(contains("ATT-0001").and(contains("BIO-001")));
}

#[test]
fn test_second_mark_same_session_rejected() {
    let db_path = setup_test_db("att_double_mark");
    init_exam(&db_path);
    let photo = photo_file("att_double_mark");

    mark(&db_path, "USR-0001", "BIO-001", &photo)
        .assert()
        .success();

    mark(&db_path, "USR-0001", "BIO-002", &photo)
        .assert()
        .failure()
        .stderr(contains("already marked"));

    // nothing was appended by the rejected attempt
    vbsa()
        .args(["--db", &db_path, "attendance", "list"])
        .assert()
        .success()
        .stdout(contains("ATT-0002").not());
}

#[test]
fn test_user_id_case_does_not_allow_second_mark() {
    let db_path = setup_test_db("att_case_variant");
    init_exam(&db_path);
    let photo = photo_file("att_case_variant");

    mark(&db_path, "USR-0001", "BIO-001", &photo)
        .assert()
        .success();

    mark(&db_path, "usr-0001", "BIO-002", &photo)
        .assert()
        .failure()
        .stderr(contains("already marked"));

    vbsa()
        .args(["--db", &db_path, "attendance", "list"])
        .assert()
        .success()
        .stdout(contains("ATT-0002").not());

    vbsa()
        .args([
            "--db",
            &db_path,
            "attendance",
            "deallocate",
            "--session",
            SESSION_1,
            "--user",
            "usr-0001",
        ])
        .assert()
        .success()
        .stdout(contains("1 device(s) released"));
}

#[test]
fn test_device_held_by_other_user_is_disabled() {
    let db_path = setup_test_db("att_device_held");
    init_exam(&db_path);
    let photo = photo_file("att_device_held");

    mark(&db_path, "USR-0001", "BIO-001", &photo)
        .assert()
        .success();

    vbsa()
        .args([
            "--db",
            &db_path,
            "device",
            "available",
            "--venue",
            VENUE,
            "--type",
            "biometric",
            "--user",
            "USR-0002",
        ])
        .assert()
        .success()
        .stdout(contains("disabled (held by USR-0001)"));

    mark(&db_path, "USR-0002", "BIO-001", &photo)
        .assert()
        .failure()
        .stderr(contains("not available"));
}

#[test]
fn test_deallocate_releases_device() {
    let db_path = setup_test_db("att_deallocate");
    init_exam(&db_path);
    let photo = photo_file("att_deallocate");

    mark(&db_path, "USR-0001", "BIO-001", &photo)
        .assert()
        .success();

    vbsa()
        .args([
            "--db",
            &db_path,
            "attendance",
            "deallocate",
            "--session",
            SESSION_1,
            "--user",
            "USR-0001",
        ])
        .assert()
        .success()
        .stdout(contains("1 device(s) released"));

    mark(&db_path, "USR-0002", "BIO-001", &photo)
        .assert()
        .success();
}

#[test]
fn test_mark_outside_geofence_blocked() {
    let db_path = setup_test_db("att_geofence");
    init_exam(&db_path);
    let photo = photo_file("att_geofence");

    // roughly 1.1 km north of the venue
    vbsa()
        .args([
            "--db",
            &db_path,
            "--now",
            "2026-03-10 08:30",
            "attendance",
            "mark",
            "--user",
            "USR-0001",
            "--session",
            SESSION_1,
            "--venue",
            VENUE,
            "--lab",
            "Lab-1",
            "--type",
            "biometric",
            "--device",
            "BIO-001",
            "--photo",
            &photo,
            "--lat",
            "18.5304",
            "--lng",
            "73.8567",
        ])
        .assert()
        .failure()
        .stderr(contains("away from the venue"));
}

#[test]
fn test_multiple_labs_only_for_server_manager() {
    let db_path = setup_test_db("att_multi_lab");
    init_exam(&db_path);
    let photo = photo_file("att_multi_lab");

    let two_labs = |user: &str, device: &str| {
        vbsa()
            .args([
                "--db",
                &db_path,
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
                "--lab",
                "Lab-2",
                "--type",
                "biometric",
                "--device",
                device,
                "--photo",
                &photo,
                "--lat",
                common::VENUE_LAT,
                "--lng",
                common::VENUE_LNG,
            ])
            .assert()
    };

    two_labs("USR-0001", "BIO-001")
        .failure()
        .stderr(contains("Server Manager"));

    two_labs("USR-0002", "BIO-002").success();
}

#[test]
fn test_mark_without_photo_rejected() {
    let db_path = setup_test_db("att_no_photo");
    init_exam(&db_path);

    mark(&db_path, "USR-0001", "BIO-001", "/nonexistent/face.jpg")
        .assert()
        .failure()
        .stderr(contains("face photo"));
}

#[test]
fn test_checklist_window_gate() {
    let db_path = setup_test_db("checklist_gate");
    init_exam(&db_path);

    // Session-1 starts 09:00; checklist-1 opens one hour before
    vbsa()
        .args([
            "--db",
            &db_path,
            "--now",
            "2026-03-10 07:59",
            "checklist",
            "submit",
            "--session",
            SESSION_1,
            "--checklist",
            "1",
        ])
        .assert()
        .failure()
        .stderr(contains("not open"));

    vbsa()
        .args([
            "--db",
            &db_path,
            "--now",
            "2026-03-10 08:00",
            "checklist",
            "submit",
            "--session",
            SESSION_1,
            "--checklist",
            "1",
            "--field",
            "cctv_working=yes",
        ])
        .assert()
        .success()
        .stdout(contains("Checklist-1 submitted"));

    vbsa()
        .args([
            "--db",
            &db_path,
            "--now",
            "2026-03-10 08:05",
            "checklist",
            "status",
            "--session",
            SESSION_1,
        ])
        .assert()
        .success()
        .stdout(contains("Submitted at 2026-03-10 08:00"));
}

#[test]
fn test_emergency_onboarding_expires_after_a_day() {
    let db_path = setup_test_db("emergency_expiry");
    init_exam(&db_path);
    let photo = photo_file("emergency_expiry");

    vbsa()
        .args([
            "--db",
            &db_path,
            "--now",
            "2026-03-10 08:00",
            "emergency",
            "add",
            "--name",
            "Ravi Kumar",
            "--mobile",
            "9000000001",
            "--aadhar",
            "123412341234",
            "--role",
            "Invigilator",
            "--partner",
            "VND-0001",
            "--photo",
            &photo,
        ])
        .assert()
        .success()
        .stdout(contains("EMG-0001"));

    vbsa()
        .args([
            "--db",
            &db_path,
            "--now",
            "2026-03-11 07:59",
            "emergency",
            "list",
        ])
        .assert()
        .success()
        .stdout(contains("Ravi Kumar"));

    vbsa()
        .args([
            "--db",
            &db_path,
            "--now",
            "2026-03-11 08:00",
            "emergency",
            "list",
        ])
        .assert()
        .success()
        .stdout(contains("No active emergency registrations"));

    vbsa()
        .args([
            "--db",
            &db_path,
            "--now",
            "2026-03-11 08:00",
            "emergency",
            "list",
            "--all",
        ])
        .assert()
        .success()
        .stdout(contains("Ravi Kumar").and(contains("expired")));
}

#[test]
fn test_emergency_mobile_of_registered_user_rejected() {
    let db_path = setup_test_db("emergency_dup_mobile");
    init_exam(&db_path);
    let photo = photo_file("emergency_dup_mobile");

    vbsa()
        .args([
            "--db",
            &db_path,
            "emergency",
            "add",
            "--name",
            "Asha Again",
            "--mobile",
            "9876543210",
            "--aadhar",
            "123412341234",
            "--role",
            "Invigilator",
            "--partner",
            "VND-0001",
            "--photo",
            &photo,
        ])
        .assert()
        .failure()
        .stderr(contains("Duplicate entry"));
}
