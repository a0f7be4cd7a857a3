//! Outbound "send email" trigger.
//!
//! The automation endpoint accepts the request without a readable response,
//! so a successful [`EmailTrigger::send`] only means the request left this
//! client. Nothing here confirms delivery.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TransportError;
use crate::models::Employee;

/// JSON body posted to the automation webhook.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailRequest {
    pub name: String,
    pub email: String,
    pub emp_num: String,
    pub phone_no: String,
    /// UTC time the request was built, RFC 3339 with milliseconds and `Z`.
    pub timestamp: String,
    /// Origin tag of the client that triggered the email.
    pub triggered_from: String,
}

impl EmailRequest {
    pub fn for_employee(employee: &Employee, at: DateTime<Utc>, origin: &str) -> Self {
        Self {
            name: employee.name.clone(),
            email: employee.email.clone(),
            emp_num: employee.emp_num.clone(),
            phone_no: employee.phone_no.clone(),
            timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
            triggered_from: origin.to_string(),
        }
    }
}

/// Receipt for a webhook request that was handed to the transport.
///
/// Dispatched, not delivered: the transport gives no signal either way.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dispatched {
    pub at: DateTime<Utc>,
}

impl Dispatched {
    pub fn now() -> Self {
        Self { at: Utc::now() }
    }
}

/// Best-effort notification capability.
pub trait EmailTrigger {
    fn send(
        &self,
        request: &EmailRequest,
    ) -> impl std::future::Future<Output = Result<Dispatched, TransportError>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EmployeeId;
    use chrono::{TimeZone, Timelike};

    #[test]
    fn test_request_body_shape() {
        let employee = Employee {
            id: EmployeeId::new("7"),
            name: "Bob".into(),
            email: "bob@example.com".into(),
            emp_num: "EMP007".into(),
            phone_no: "555-0107".into(),
            created_at: None,
            updated_at: None,
        };
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 8, 30, 0).unwrap();
        let request = EmailRequest::for_employee(&employee, at, "https://directory.example");

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "Bob",
                "email": "bob@example.com",
                "emp_num": "EMP007",
                "phone_no": "555-0107",
                "timestamp": "2024-03-09T08:30:00.000Z",
                "triggered_from": "https://directory.example",
            })
        );
    }

    #[test]
    fn test_timestamp_truncates_to_millis() {
        let employee = Employee {
            id: EmployeeId::new("1"),
            name: "Ann".into(),
            email: "ann@example.com".into(),
            emp_num: "EMP001".into(),
            phone_no: "555-0101".into(),
            created_at: None,
            updated_at: None,
        };
        let at = Utc
            .with_ymd_and_hms(2024, 12, 31, 23, 59, 59)
            .unwrap()
            .with_nanosecond(123_456_789)
            .unwrap();
        let request = EmailRequest::for_employee(&employee, at, "test");
        assert_eq!(request.timestamp, "2024-12-31T23:59:59.123Z");
    }
}
