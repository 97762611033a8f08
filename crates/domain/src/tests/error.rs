// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::DomainError;

#[test]
fn test_domain_error_display() {
    let err: DomainError = DomainError::InvalidName(String::from("test"));
    assert_eq!(format!("{err}"), "Invalid name: test");

    let err: DomainError = DomainError::UnknownPeriod(String::from("evening"));
    assert_eq!(
        format!("{err}"),
        "Unknown period 'evening'. Must be 'morning' or 'afternoon'"
    );

    let err: DomainError = DomainError::InvalidOwnerHandle(String::from("x"));
    assert_eq!(format!("{err}"), "Invalid owner handle: 'x'");

    let err: DomainError = DomainError::InvalidTimezone(String::from("Mars/Olympus"));
    assert_eq!(format!("{err}"), "Invalid timezone: 'Mars/Olympus'");

    let err: DomainError = DomainError::InvalidClockTime {
        value: String::from("25:00"),
        error: String::from("input is out of range"),
    };
    assert_eq!(
        format!("{err}"),
        "Invalid clock time '25:00': input is out of range"
    );

    let err: DomainError = DomainError::InvalidSchedule {
        reason: String::from("bad"),
    };
    assert_eq!(format!("{err}"), "Invalid schedule: bad");
}

#[test]
fn test_domain_error_is_std_error() {
    let err: Box<dyn std::error::Error> = Box::new(DomainError::InvalidName(String::from("x")));
    assert_eq!(err.to_string(), "Invalid name: x");
}
