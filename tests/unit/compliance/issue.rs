use super::*;

fn issue(code: IssueCode) -> Issue {
    Issue::new(code, "x", None)
}

#[test]
fn aggregate_is_worst_severity() {
    assert_eq!(Status::aggregate(&[]), Status::Pass);
    assert_eq!(
        Status::aggregate(&[issue(IssueCode::MinFont), issue(IssueCode::MinFont)]),
        Status::Warn
    );
    assert_eq!(
        Status::aggregate(&[
            issue(IssueCode::MinFont),
            issue(IssueCode::OutsideSafeZone),
            issue(IssueCode::MinFont)
        ]),
        Status::Fail
    );
}

#[test]
fn severities_are_fixed_per_code() {
    assert_eq!(IssueCode::OutsideSafeZone.severity(), Severity::Fail);
    assert_eq!(IssueCode::MissingDisclaimer.severity(), Severity::Fail);
    assert_eq!(IssueCode::MinFont.severity(), Severity::Warn);
    assert_eq!(issue(IssueCode::MinFont).severity, Severity::Warn);
}

#[test]
fn status_ordering_and_labels() {
    assert!(Status::Pass < Status::Warn && Status::Warn < Status::Fail);
    assert_eq!(Status::Warn.to_string(), "WARN");
}
