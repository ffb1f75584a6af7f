use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

/// Daily tick of the refresh rule, 23:00 UTC.
pub const SCHEDULE_EXPRESSION: &str = "cron(0 23 * * ? *)";

/// Payload EventBridge delivers for a scheduled rule.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct ScheduledEvent {
    pub id: String,
    pub detail_type: String,
    pub source: String,
    pub account: String,
    pub time: DateTime<Utc>,
    pub region: String,
    #[serde(default)]
    pub resources: Vec<String>,
}

impl ScheduledEvent {
    /// `None` for anything that is not a scheduled tick, such as a manual replay.
    pub fn parse(payload: &Value) -> Option<Self> {
        serde_json::from_value::<ScheduledEvent>(payload.clone())
            .ok()
            .filter(|event| event.source == "aws.events" && event.detail_type == "Scheduled Event")
    }

    pub fn rule_arn(&self) -> Option<&str> {
        self.resources.first().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use crate::scheduled_event::ScheduledEvent;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn test_parse_scheduled_event() {
        let payload = json!({
            "version": "0",
            "id": "53dc4d37-cffa-4f76-80c9-8b7d4a4d2eaa",
            "detail-type": "Scheduled Event",
            "source": "aws.events",
            "account": "123456789012",
            "time": "2024-05-07T23:00:00Z",
            "region": "eu-west-2",
            "resources": [
                "arn:aws:events:eu-west-2:123456789012:rule/acme-ami-refresh-rule"
            ],
            "detail": {}
        });

        let event = ScheduledEvent::parse(&payload).unwrap();
        assert_eq!(event.time, Utc.with_ymd_and_hms(2024, 5, 7, 23, 0, 0).unwrap());
        assert_eq!(
            event.rule_arn(),
            Some("arn:aws:events:eu-west-2:123456789012:rule/acme-ami-refresh-rule")
        );
    }

    #[test]
    fn test_parse_other_payloads() {
        assert_eq!(ScheduledEvent::parse(&json!({})), None);
        assert_eq!(
            ScheduledEvent::parse(&json!({
                "id": "1",
                "detail-type": "ACM Certificate Expired",
                "source": "aws.acm",
                "account": "123456789012",
                "time": "2024-05-07T23:00:00Z",
                "region": "eu-west-2"
            })),
            None
        );
    }
}
