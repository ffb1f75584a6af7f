use ami_refresh::certificate_rules::CertificateEvent;
use ami_refresh::event_pattern::EventPattern;
use serde_json::Value;
use std::fs;

const RSA_CERTIFICATE: &str =
    "arn:aws:acm:eu-west-2:123456789012:certificate/61f50cd4-45b9-4259-b049-d0a53682fa4b";
const ECDSA_CERTIFICATE: &str =
    "arn:aws:acm:eu-west-2:123456789012:certificate/0fd7f3a2-0cb6-4a4a-b1d6-3c6d7f2a9e55";

fn event(name: &str) -> Value {
    let path = format!("test_resources/events/{}", name);
    let contents = fs::read_to_string(&path).unwrap();
    serde_json::from_str(&contents).unwrap()
}

fn rule(certificate_event: CertificateEvent) -> EventPattern {
    certificate_event
        .rule_pattern(&[RSA_CERTIFICATE, ECDSA_CERTIFICATE])
        .unwrap()
}

#[test]
fn test_event_pattern_approaching_expiration() {
    let pattern = rule(CertificateEvent::ApproachingExpiration);

    assert!(pattern.matches_event(&event("acm_event_approaching_expiration.json")));
    assert!(!pattern.matches_event(&event("acm_event_negative.json")));
}

#[test]
fn test_event_pattern_expired() {
    let pattern = rule(CertificateEvent::Expired);

    assert!(pattern.matches_event(&event("acm_event_expired.json")));
    assert!(!pattern.matches_event(&event("acm_event_negative.json")));
}

#[test]
fn test_event_pattern_action_required() {
    let pattern = rule(CertificateEvent::RenewalActionRequired);

    assert!(pattern.matches_event(&event("acm_event_action_required.json")));
    assert!(!pattern.matches_event(&event("acm_event_negative.json")));
}

#[test]
fn test_rules_only_match_their_own_detail_type() {
    let expired = event("acm_event_expired.json");

    for certificate_event in CertificateEvent::ALL.iter() {
        let matched = rule(*certificate_event).matches_event(&expired);
        assert_eq!(matched, *certificate_event == CertificateEvent::Expired);
    }
}

#[test]
fn test_untracked_certificate_is_ignored() {
    let pattern = CertificateEvent::Expired
        .rule_pattern(&["arn:aws:acm:eu-west-2:123456789012:certificate/someone-else"])
        .unwrap();

    assert!(!pattern.matches_event(&event("acm_event_expired.json")));
}

#[test]
fn test_pattern_loaded_from_text() {
    let pattern = EventPattern::load(&format!(
        r#"{{
            "source": ["aws.acm"],
            "detail-type": ["ACM Certificate Expired"],
            "resources": ["{}"]
        }}"#,
        RSA_CERTIFICATE
    ))
    .unwrap();

    assert!(pattern.matches_event(&event("acm_event_expired.json")));
    assert!(!pattern.matches_event(&event("acm_event_approaching_expiration.json")));
}
