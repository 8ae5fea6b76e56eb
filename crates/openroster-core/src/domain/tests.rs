use chrono::NaiveDate;

use super::*;

fn dt(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

fn small_roster() -> Roster {
    let skills = vec![Skill::new("Barista"), Skill::new("Waiter")];
    let spots = vec![Spot::new("Cafe", vec![0])];
    let contracts = vec![Contract::new("Full time").with_max_minutes_per_day(480)];
    let employees = vec![
        Employee::new("Alice", 0).with_skills([0]),
        Employee::new("Bob", 0).with_skills([1]),
    ];
    let availabilities = vec![EmployeeAvailability::new(
        0,
        dt(1, 9),
        dt(1, 17),
        AvailabilityState::Unavailable,
    )];
    let shifts = vec![Shift::new(0, dt(1, 10), dt(1, 14), 0)];
    Roster::new(skills, spots, contracts, employees, availabilities, shifts)
}

#[test]
fn validate_accepts_consistent_roster() {
    assert!(small_roster().validate().is_ok());
}

#[test]
fn validate_rejects_dangling_shift_employee() {
    let mut roster = small_roster();
    roster.shifts[0].employee = Some(99);
    let err = roster.validate().unwrap_err();
    assert!(err.to_string().contains("unknown employee index 99"));
}

#[test]
fn validate_rejects_dangling_rotation_employee() {
    let mut roster = small_roster();
    roster.shifts[0].rotation_employee = 7;
    assert!(roster.validate().is_err());
}

#[test]
fn validate_rejects_negative_weight() {
    let mut roster = small_roster();
    roster.parametrization.desired_time_slot_weight = -1;
    assert!(roster.validate().is_err());
}

#[test]
fn validate_rejects_inverted_shift_interval() {
    let mut roster = small_roster();
    roster.shifts[0].end = roster.shifts[0].start;
    assert!(roster.validate().is_err());
}

#[test]
fn validate_rejects_dangling_availability_employee() {
    let mut roster = small_roster();
    roster.availabilities[0].employee = 5;
    assert!(roster.validate().is_err());
}

#[test]
fn half_open_interval_intersection() {
    let shift = Shift::new(0, dt(1, 10), dt(1, 14), 0);
    // touching endpoints do not intersect
    assert!(!shift.overlaps(dt(1, 14), dt(1, 18)));
    assert!(!shift.overlaps(dt(1, 6), dt(1, 10)));
    // proper overlap does
    assert!(shift.overlaps(dt(1, 13), dt(1, 15)));
    assert!(shift.overlaps(dt(1, 9), dt(1, 17)));
}

#[test]
fn shift_duration_and_date() {
    let shift = Shift::new(0, dt(2, 10), dt(2, 14), 0);
    assert_eq!(shift.duration_minutes(), 240);
    assert_eq!(shift.date(), NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
}

#[test]
fn skill_superset_check() {
    let employee = Employee::new("Carol", 0).with_skills([0, 2]);
    assert!(employee.has_all_skills(&[0]));
    assert!(employee.has_all_skills(&[0, 2]));
    assert!(!employee.has_all_skills(&[1]));
}

#[test]
fn unassigned_count_tracks_employee_variable() {
    let mut roster = small_roster();
    assert_eq!(roster.unassigned_count(), 1);
    roster.shifts[0].employee = Some(0);
    assert_eq!(roster.unassigned_count(), 0);
    assert_eq!(roster.assigned_count(), 1);
}

#[test]
fn roster_serde_round_trip() {
    let mut roster = small_roster();
    roster.shifts[0].employee = Some(1);
    let json = serde_json::to_string(&roster).unwrap();
    let back: Roster = serde_json::from_str(&json).unwrap();
    assert_eq!(back.shifts[0].employee, Some(1));
    assert_eq!(back.employees.len(), 2);
    assert_eq!(back.availabilities[0].state, AvailabilityState::Unavailable);
    assert_eq!(back.parametrization, roster.parametrization);
}
