use crate::check::CheckResult;
use labgate_types::Status;

/// `accept` iff every required result passed. Informational results never
/// move the verdict, and the outcome does not depend on result order.
pub fn aggregate(results: &[CheckResult]) -> Status {
    if results.iter().filter(|r| r.required).all(|r| r.passed) {
        Status::Accept
    } else {
        Status::Reject
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use labgate_types::MetricMap;

    fn result(id: &str, required: bool, passed: bool) -> CheckResult {
        CheckResult {
            check_id: id.to_string(),
            required,
            passed,
            message: String::new(),
            metrics: MetricMap::new(),
        }
    }

    #[test]
    fn one_failed_required_check_rejects() {
        let results = vec![result("a", true, true), result("b", true, false)];
        assert_eq!(aggregate(&results), Status::Reject);
    }

    #[test]
    fn failed_informational_checks_do_not_reject() {
        let results = vec![result("a", true, true), result("note", false, false)];
        assert_eq!(aggregate(&results), Status::Accept);
    }

    #[test]
    fn no_required_checks_accepts() {
        assert_eq!(aggregate(&[]), Status::Accept);
        assert_eq!(aggregate(&[result("note", false, false)]), Status::Accept);
    }
}
