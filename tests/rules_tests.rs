use chrono::{DateTime, Local, NaiveDate, NaiveTime};
use std::env;
use std::fs;

use vbsa::config::Config;
use vbsa::core::attendance::{MarkContext, MarkRequest, available_devices, deallocate, mark_attendance};
use vbsa::core::checklist::{is_enabled, state, submit};
use vbsa::core::emergency::{self, EmergencyRequest};
use vbsa::core::geo::check_geofence;
use vbsa::core::requirements::{
    default_buffer, log_activity, required_for, requirement_rows, set_buffer_override,
};
use vbsa::core::sessions::{expand_sessions, override_session, set_template_time};
use vbsa::errors::AppError;
use vbsa::models::attendance::AttendanceRecord;
use vbsa::models::checklist::{ChecklistState, ChecklistType};
use vbsa::models::device::{
    DeviceAction, DeviceActivity, DeviceType, MappedDevice, RequirementLedger, Variance,
};
use vbsa::models::session::{SessionInstance, SessionTemplate};
use vbsa::models::venue::Venue;
use vbsa::utils::time::parse_instant;

fn at(s: &str) -> DateTime<Local> {
    parse_instant(s).expect("valid instant")
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid date")
}

fn time(s: &str) -> NaiveTime {
    NaiveTime::parse_from_str(s, "%H:%M").expect("valid time")
}

fn test_config() -> Config {
    Config::with_database(":memory:")
}

fn venue(name: &str, candidates: u32) -> Venue {
    Venue {
        venue_id: "VEN-0001".into(),
        venue_name: name.into(),
        city: "Pune".into(),
        lat: 18.5204,
        lng: 73.8567,
        candidates,
        labs: vec!["Lab-1".into(), "Lab-2".into()],
    }
}

fn mapped(venue_name: &str, id: &str) -> MappedDevice {
    MappedDevice {
        venue_name: venue_name.into(),
        device_type: DeviceType::Biometric,
        device_id: id.into(),
        device_name: format!("Scanner {id}"),
        partner_name: "SecureID Systems".into(),
        mapped_at: at("2026-03-01 10:00"),
        mapped_by: "admin".into(),
    }
}

fn exam_sessions() -> Vec<SessionInstance> {
    expand_sessions(&[date("2026-03-10")], &SessionTemplate::defaults(), &[]).expect("sessions")
}

fn photo(name: &str) -> String {
    let path = env::temp_dir().join(format!("{name}_rules_face.jpg"));
    fs::write(&path, b"jpeg").expect("write photo");
    path.to_string_lossy().to_string()
}

fn request(user: &str, device: &str, face: &str) -> MarkRequest {
    MarkRequest {
        user_id: user.into(),
        user_role: "Invigilator".into(),
        session_id: "2026-03-10_S1".into(),
        venue_name: "Central School".into(),
        labs: vec!["Lab-1".into()],
        device_type: Some(DeviceType::Biometric),
        device_id: Some(device.into()),
        face_image: Some(face.into()),
        lat: 18.5204,
        lng: 73.8567,
    }
}

// ---------------------------------------------------------------------------
// requirements
// ---------------------------------------------------------------------------

#[test]
fn test_biometric_requirement_for_250_candidates() {
    assert_eq!(required_for(DeviceType::Biometric, 250), 5);
    assert_eq!(default_buffer(5, 10), 1);

    let rows = requirement_rows(&[venue("Central School", 250)], &[], 10);
    let bio = rows
        .iter()
        .find(|r| r.device_type == DeviceType::Biometric)
        .expect("biometric row");
    assert_eq!((bio.required, bio.buffer, bio.total()), (5, 1, 6));
}

#[test]
fn test_cctv_extra_and_rounding() {
    // ceil(251/25) = 11, plus 5 extra kits
    assert_eq!(required_for(DeviceType::CctvKit, 251), 16);
    assert_eq!(required_for(DeviceType::CctvKit, 0), 5);
    assert_eq!(required_for(DeviceType::Laptop, 1), 1);
    assert_eq!(required_for(DeviceType::Jammer, 0), 0);
}

#[test]
fn test_variance_labels() {
    assert_eq!(Variance::classify(8, 6).signed(), "+2");
    assert_eq!(Variance::classify(8, 6).label(), "Surplus");
    assert_eq!(Variance::classify(4, 6).signed(), "-2");
    assert_eq!(Variance::classify(4, 6).label(), "Deficient");
    assert_eq!(Variance::classify(6, 6), Variance::Match);
    assert_eq!(Variance::classify(6, 6).signed(), "0");
}

#[test]
fn test_buffer_override_and_activity_ledger() {
    let venues = vec![venue("Central School", 250)];
    let mut ledger = Vec::new();
    let mut activities = Vec::new();

    set_buffer_override(&mut ledger, &venues, "central school", DeviceType::Biometric, Some(3))
        .expect("override");

    log_activity(
        &mut activities,
        &mut ledger,
        &venues,
        "Central School",
        DeviceType::Biometric,
        DeviceAction::Receive,
        4,
        "first batch",
        "admin",
        at("2026-03-09 10:00"),
    )
    .expect("activity");

    let rows = requirement_rows(&venues, &ledger, 10);
    let bio = &rows[0];
    assert_eq!(bio.buffer, 3);
    assert_eq!(bio.total(), 8);
    assert_eq!(bio.received, 4);
    assert_eq!(bio.variance(), Variance::Deficient(4));
    assert_eq!(activities[0].id, "ACT-0001");

    let zero = log_activity(
        &mut activities,
        &mut ledger,
        &venues,
        "Central School",
        DeviceType::Biometric,
        DeviceAction::Send,
        0,
        "",
        "admin",
        at("2026-03-09 10:05"),
    );
    assert!(matches!(zero, Err(AppError::Validation { .. })));
    assert_eq!(activities.len(), 1);
}

#[test]
fn test_activity_counter_overflow_rejected() {
    let venues = vec![venue("Central School", 250)];
    let mut ledger = Vec::new();
    let mut activities = Vec::new();

    let receive = |activities: &mut Vec<DeviceActivity>, ledger: &mut Vec<RequirementLedger>| {
        log_activity(
            activities,
            ledger,
            &venues,
            "Central School",
            DeviceType::Biometric,
            DeviceAction::Receive,
            3_000_000_000,
            "bulk",
            "admin",
            at("2026-03-09 10:00"),
        )
    };

    receive(&mut activities, &mut ledger).expect("first batch");
    let second = receive(&mut activities, &mut ledger);

    assert!(matches!(second, Err(AppError::Validation { .. })));
    assert_eq!(activities.len(), 1);
    assert_eq!(ledger[0].received, 3_000_000_000);
}

#[test]
fn test_large_buffer_override_does_not_overflow_total() {
    let venues = vec![venue("Central School", 250)];
    let mut ledger = Vec::new();

    set_buffer_override(&mut ledger, &venues, "Central School", DeviceType::Biometric, Some(u32::MAX))
        .expect("override");

    let rows = requirement_rows(&venues, &ledger, 10);
    assert_eq!(rows[0].total(), u32::MAX);
}

// ---------------------------------------------------------------------------
// sessions
// ---------------------------------------------------------------------------

#[test]
fn test_sessions_expand_dates_times_templates() {
    let sessions = expand_sessions(
        &[date("2026-03-11"), date("2026-03-10")],
        &SessionTemplate::defaults(),
        &[],
    )
    .expect("sessions");

    let ids: Vec<&str> = sessions.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["2026-03-10_S1", "2026-03-10_S2", "2026-03-11_S1", "2026-03-11_S2"]
    );
}

#[test]
fn test_override_applies_to_one_date_only() {
    let mut templates = SessionTemplate::defaults();
    let mut overrides = Vec::new();
    let dates = [date("2026-03-10"), date("2026-03-11")];

    override_session(
        &mut overrides,
        &templates,
        dates[0],
        "S1",
        Some(time("10:00")),
        Some(time("13:00")),
        None,
    )
    .expect("override");
    override_session(&mut overrides, &templates, dates[1], "S2", None, None, Some(false))
        .expect("disable");

    // template edits leave the per-date override alone
    set_template_time(&mut templates, "S1", Some(time("08:30")), None).expect("template");

    let sessions = expand_sessions(&dates, &templates, &overrides).expect("sessions");
    assert_eq!(sessions.len(), 3);
    assert_eq!(sessions[0].time_range(), "10:00–13:00");
    assert_eq!(sessions[2].id, "2026-03-11_S1");
    assert_eq!(sessions[2].time_range(), "08:30–12:00");
}

#[test]
fn test_override_rejects_end_before_start() {
    let templates = SessionTemplate::defaults();
    let mut overrides = Vec::new();

    let res = override_session(
        &mut overrides,
        &templates,
        date("2026-03-10"),
        "S1",
        Some(time("12:00")),
        Some(time("11:00")),
        None,
    );
    assert!(matches!(res, Err(AppError::InvalidTime(_))));
    assert!(overrides.is_empty());
}

// ---------------------------------------------------------------------------
// attendance
// ---------------------------------------------------------------------------

#[test]
fn test_second_present_record_rejected_without_mutation() {
    let cfg = test_config();
    let sessions = exam_sessions();
    let venues = vec![venue("Central School", 250)];
    let devices = vec![mapped("Central School", "BIO-001"), mapped("Central School", "BIO-002")];
    let ctx = MarkContext {
        sessions: &sessions,
        venues: &venues,
        mapped: &devices,
        cfg: &cfg,
    };
    let face = photo("double_mark");
    let now = at("2026-03-10 08:30");

    let mut records: Vec<AttendanceRecord> = Vec::new();
    mark_attendance(&mut records, &ctx, &request("USR-0001", "BIO-001", &face), "admin", now)
        .expect("first mark");

    let before = records.clone();
    let again = mark_attendance(&mut records, &ctx, &request("USR-0001", "BIO-002", &face), "admin", now);

    assert!(matches!(again, Err(AppError::AlreadyMarked { .. })));
    assert_eq!(records, before);
}

#[test]
fn test_user_id_spelling_does_not_bypass_single_mark() {
    let cfg = test_config();
    let sessions = exam_sessions();
    let venues = vec![venue("Central School", 250)];
    let devices = vec![mapped("Central School", "BIO-001"), mapped("Central School", "BIO-002")];
    let ctx = MarkContext {
        sessions: &sessions,
        venues: &venues,
        mapped: &devices,
        cfg: &cfg,
    };
    let face = photo("case_variant_mark");
    let now = at("2026-03-10 08:30");

    let mut records: Vec<AttendanceRecord> = Vec::new();
    mark_attendance(&mut records, &ctx, &request("USR-0001", "BIO-001", &face), "admin", now)
        .expect("first mark");

    let before = records.clone();
    let again = mark_attendance(&mut records, &ctx, &request("usr-0001", "BIO-002", &face), "admin", now);
    assert!(matches!(again, Err(AppError::AlreadyMarked { .. })));
    assert_eq!(records, before);

    // the holder's own device stays selectable whatever the spelling
    let own = available_devices(&devices, &records, "Central School", DeviceType::Biometric, "usr-0001");
    assert!(!own[0].disabled());

    let released = deallocate(&mut records, "2026-03-10_S1", &["usr-0001".to_string()], "admin", now);
    assert_eq!(released, 1);
    assert!(records[0].device_id.is_none());
}

#[test]
fn test_device_held_by_other_user_is_disabled() {
    let cfg = test_config();
    let sessions = exam_sessions();
    let venues = vec![venue("Central School", 250)];
    let devices = vec![mapped("Central School", "BIO-001"), mapped("Central School", "BIO-002")];
    let ctx = MarkContext {
        sessions: &sessions,
        venues: &venues,
        mapped: &devices,
        cfg: &cfg,
    };
    let face = photo("device_held");
    let now = at("2026-03-10 08:30");

    let mut records = Vec::new();
    mark_attendance(&mut records, &ctx, &request("USR-0001", "BIO-001", &face), "admin", now)
        .expect("mark");

    let options = available_devices(&devices, &records, "Central School", DeviceType::Biometric, "USR-0002");
    assert!(options[0].disabled());
    assert_eq!(options[0].held_by.as_deref(), Some("USR-0001"));
    assert!(!options[1].disabled());

    // the holder still sees their own device as selectable
    let own = available_devices(&devices, &records, "Central School", DeviceType::Biometric, "USR-0001");
    assert!(!own[0].disabled());

    let taken = mark_attendance(&mut records, &ctx, &request("USR-0002", "BIO-001", &face), "admin", now);
    assert!(matches!(taken, Err(AppError::DeviceUnavailable(_))));

    let released = deallocate(&mut records, "2026-03-10_S1", &["USR-0001".to_string()], "admin", now);
    assert_eq!(released, 1);
    assert_eq!(
        records[0].deallocation_prev.as_ref().map(|p| p.device_id.as_str()),
        Some("BIO-001")
    );
    assert!(records[0].device_id.is_none());

    let options = available_devices(&devices, &records, "Central School", DeviceType::Biometric, "USR-0002");
    assert!(!options[0].disabled());
}

#[test]
fn test_missing_photo_blocks_marking() {
    let cfg = test_config();
    let sessions = exam_sessions();
    let venues = vec![venue("Central School", 250)];
    let devices = vec![mapped("Central School", "BIO-001")];
    let ctx = MarkContext {
        sessions: &sessions,
        venues: &venues,
        mapped: &devices,
        cfg: &cfg,
    };

    let mut req = request("USR-0001", "BIO-001", "");
    req.face_image = None;

    let mut records = Vec::new();
    let res = mark_attendance(&mut records, &ctx, &req, "admin", at("2026-03-10 08:30"));
    assert!(matches!(res, Err(AppError::Validation { .. })));
    assert!(records.is_empty());
}

// ---------------------------------------------------------------------------
// geofence
// ---------------------------------------------------------------------------

#[test]
fn test_geofence_blocks_beyond_radius_unless_exempt() {
    let mut cfg = test_config();
    let v = venue("Central School", 250);

    // 0.002° of latitude is about 222 m
    let far = check_geofence(&v, 18.5224, 73.8567, &cfg);
    assert!(matches!(far, Err(AppError::Geofence { .. })));

    let near = check_geofence(&v, 18.5208, 73.8567, &cfg).expect("inside radius");
    assert!(near < 100.0);

    cfg.geofence_exempt_venues = vec!["central school".into()];
    let exempt = check_geofence(&v, 18.5224, 73.8567, &cfg).expect("exempt venue");
    assert!(exempt > 100.0);
}

// ---------------------------------------------------------------------------
// checklists
// ---------------------------------------------------------------------------

#[test]
fn test_checklist_enabled_inclusive_window() {
    let cfg = test_config();
    let sessions = exam_sessions();
    let s1 = &sessions[0];

    assert!(!is_enabled(s1, ChecklistType::Checklist1, &cfg, at("2026-03-10 07:59")));
    assert!(is_enabled(s1, ChecklistType::Checklist1, &cfg, at("2026-03-10 08:00")));
    assert!(is_enabled(s1, ChecklistType::Checklist1, &cfg, at("2026-03-10 12:00")));
    assert!(!is_enabled(s1, ChecklistType::Checklist1, &cfg, at("2026-03-10 12:01")));

    // checklist-2: 30 min before start until one hour after end
    assert!(!is_enabled(s1, ChecklistType::Checklist2, &cfg, at("2026-03-10 08:29")));
    assert!(is_enabled(s1, ChecklistType::Checklist2, &cfg, at("2026-03-10 13:00")));
}

#[test]
fn test_checklist_resubmission_overwrites() {
    let cfg = test_config();
    let sessions = exam_sessions();
    let s1 = &sessions[0];
    let mut subs = Vec::new();

    let closed = submit(
        &mut subs,
        s1,
        ChecklistType::Checklist1,
        &cfg,
        Default::default(),
        "admin",
        at("2026-03-10 07:00"),
    );
    assert!(matches!(closed, Err(AppError::ChecklistClosed { .. })));

    submit(&mut subs, s1, ChecklistType::Checklist1, &cfg, Default::default(), "admin", at("2026-03-10 08:10"))
        .expect("first");
    submit(&mut subs, s1, ChecklistType::Checklist1, &cfg, Default::default(), "admin", at("2026-03-10 08:20"))
        .expect("second");

    assert_eq!(subs.len(), 1);
    assert_eq!(
        state(s1, ChecklistType::Checklist1, &cfg, &subs, at("2026-03-10 09:00")),
        ChecklistState::Submitted {
            at: at("2026-03-10 08:20")
        }
    );
}

// ---------------------------------------------------------------------------
// emergency onboarding
// ---------------------------------------------------------------------------

#[test]
fn test_emergency_user_active_for_validity_window() {
    let mut list = Vec::new();
    let req = EmergencyRequest {
        name: "Ravi Kumar".into(),
        mobile: "9000000001".into(),
        aadhar: "123412341234".into(),
        role: "Invigilator".into(),
        partner_id: "VND-0001".into(),
        face_image: Some(photo("emergency_window")),
    };
    let created = at("2026-03-10 08:00");

    let u = emergency::onboard(&mut list, &[], &req, created, 24).expect("onboard");
    assert_eq!(u.id, "EMG-0001");

    assert!(emergency::is_active(&u, at("2026-03-11 07:59"), 24));
    assert!(!emergency::is_active(&u, at("2026-03-11 08:00"), 24));
    assert_eq!(emergency::active(&list, at("2026-03-11 09:00"), 24).len(), 0);
    assert_eq!(list.len(), 1);

    // an active registration blocks the same mobile; an expired one does not
    let dup = emergency::onboard(&mut list, &[], &req, at("2026-03-10 12:00"), 24);
    assert!(matches!(dup, Err(AppError::Duplicate(_))));
    emergency::onboard(&mut list, &[], &req, at("2026-03-11 08:00"), 24).expect("after expiry");
}

#[test]
fn test_emergency_window_beyond_calendar_does_not_panic() {
    let mut list = Vec::new();
    let req = EmergencyRequest {
        name: "Ravi Kumar".into(),
        mobile: "9000000001".into(),
        aadhar: "123412341234".into(),
        role: "Invigilator".into(),
        partner_id: "VND-0001".into(),
        face_image: Some(photo("emergency_huge_window")),
    };

    let u = emergency::onboard(&mut list, &[], &req, at("2026-03-10 08:00"), 24).expect("onboard");
    assert!(emergency::expires_at(&u, i64::MAX).is_none());
    assert!(emergency::is_active(&u, at("2030-01-01 00:00"), i64::MAX));
}

#[test]
fn test_emergency_validates_id_number() {
    let mut list = Vec::new();
    let req = EmergencyRequest {
        name: "Ravi Kumar".into(),
        mobile: "9000000001".into(),
        aadhar: "1234".into(),
        role: "Invigilator".into(),
        partner_id: "VND-0001".into(),
        face_image: Some(photo("emergency_bad_id")),
    };

    let res = emergency::onboard(&mut list, &[], &req, at("2026-03-10 08:00"), 24);
    assert!(matches!(res, Err(AppError::Validation { .. })));
    assert!(list.is_empty());
}

// ---------------------------------------------------------------------------
// configuration
// ---------------------------------------------------------------------------

#[test]
fn test_config_rejects_out_of_range_windows() {
    let ok = Config::from_yaml("database: /tmp/vbsa_config_ok.sqlite\n").expect("defaults apply");
    assert_eq!(ok.emergency_validity_hours, 24);
    assert_eq!(ok.checklist1.enable_before_hours, 1.0);

    let huge_validity = Config::from_yaml(
        "database: /tmp/x.sqlite\nemergency_validity_hours: 9223372036854775807\n",
    );
    assert!(matches!(huge_validity, Err(AppError::Config(_))));

    let huge_window = Config::from_yaml(
        "database: /tmp/x.sqlite\nchecklist1:\n  enable_before_hours: 1.0e300\n  disable_after_hours: 0.0\n",
    );
    assert!(matches!(huge_window, Err(AppError::Config(_))));

    let negative_window = Config::from_yaml(
        "database: /tmp/x.sqlite\nchecklist2:\n  enable_before_hours: -1.0\n  disable_after_hours: 1.0\n",
    );
    assert!(matches!(negative_window, Err(AppError::Config(_))));

    let mut cfg = test_config();
    cfg.geofence_radius_m = f64::NAN;
    assert!(matches!(cfg.validate(), Err(AppError::Config(_))));
}
