use crate::error::EventPatternError;
use crate::event_pattern::EventPattern;
use serde_json::{json, Value};

pub const ACM_SOURCE: &str = "aws.acm";

/// ACM notifications the monitoring stack raises alerts for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CertificateEvent {
    ApproachingExpiration,
    Expired,
    RenewalActionRequired,
}

impl CertificateEvent {
    pub const ALL: [CertificateEvent; 3] = [
        CertificateEvent::ApproachingExpiration,
        CertificateEvent::Expired,
        CertificateEvent::RenewalActionRequired,
    ];

    pub fn detail_type(self) -> &'static str {
        match self {
            CertificateEvent::ApproachingExpiration => "ACM Certificate Approaching Expiration",
            CertificateEvent::Expired => "ACM Certificate Expired",
            CertificateEvent::RenewalActionRequired => "ACM Certificate Renewal Action Required",
        }
    }

    pub fn rule_name(self, account_alias: &str) -> String {
        let suffix = match self {
            CertificateEvent::ApproachingExpiration => "approaching-expiration",
            CertificateEvent::Expired => "expired",
            CertificateEvent::RenewalActionRequired => "action-required",
        };
        format!("{}-app-acm-{}", account_alias.to_lowercase(), suffix)
    }

    pub fn description(self) -> &'static str {
        match self {
            CertificateEvent::ApproachingExpiration => {
                "This rule listens for ACM events indicating an approaching certificate expiration."
            }
            CertificateEvent::Expired => {
                "This rule listens for ACM events indicating a certificate expiration."
            }
            CertificateEvent::RenewalActionRequired => {
                "This rule listens for ACM events indicating that a user action is required."
            }
        }
    }

    /// Pattern document of the alert rule for the given certificates.
    pub fn pattern_document(self, certificate_arns: &[&str]) -> Value {
        json!({
            "source": [ACM_SOURCE],
            "detail-type": [self.detail_type()],
            "resources": certificate_arns,
        })
    }

    pub fn rule_pattern(self, certificate_arns: &[&str]) -> Result<EventPattern, EventPatternError> {
        EventPattern::from_value(&self.pattern_document(certificate_arns))
    }
}
