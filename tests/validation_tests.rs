use batimove_backend::model::submission::{ServiceId, Submission, SubmissionKind};
use batimove_backend::validation::{validate, ViolationKind};
use serde_json::{json, Value};

fn valid_quote() -> Value {
    json!({
        "serviceId": "priv",
        "date": "2026-02-15T10:00:00Z",
        "contact": { "name": "Jean Dupont", "email": "jean@example.ch", "phone": "+41 79 123 45 67" },
        "rooms": 3,
        "volume": 45
    })
}

fn valid_contact() -> Value {
    json!({
        "name": "Marie Curie",
        "email": "marie@example.fr",
        "subject": "Question Générale",
        "message": "Bonjour, avez-vous des disponibilités en mars ?"
    })
}

fn valid_business() -> Value {
    json!({
        "companyName": "Acme SA",
        "contactName": "Paul Martin",
        "email": "paul@acme.ch",
        "phone": "022 123 45 67",
        "employeeCount": "50-100",
        "serviceNeeds": "Déménagement de nos bureaux au printemps."
    })
}

#[cfg(test)]
mod quote_tests {
    use super::*;

    #[test]
    fn test_valid_quote_keeps_service_id() {
        for service in ServiceId::ALL {
            let mut payload = valid_quote();
            payload["serviceId"] = json!(service.as_str());
            match validate(SubmissionKind::Quote, &payload) {
                Ok(Submission::Quote(quote)) => assert_eq!(quote.service_id, service),
                other => panic!("expected a quote for {}, got {:?}", service, other),
            }
        }
    }

    #[test]
    fn test_unknown_service_is_invalid_enum() {
        let mut payload = valid_quote();
        payload["serviceId"] = json!("moving");
        let failure = validate(SubmissionKind::Quote, &payload).unwrap_err();
        let error = failure.for_field("serviceId").expect("serviceId violation");
        assert_eq!(error.kind, ViolationKind::InvalidEnum);
        assert!(error.reason.contains("priv"));
    }

    #[test]
    fn test_missing_required_fields_are_all_reported_in_order() {
        let failure = validate(SubmissionKind::Quote, &json!({ "rooms": 2 })).unwrap_err();
        let fields: Vec<&str> = failure.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["serviceId", "date", "contact"]);
        assert!(failure.errors.iter().all(|e| e.kind == ViolationKind::Missing));
    }

    #[test]
    fn test_nested_contact_violations_use_dotted_paths() {
        let mut payload = valid_quote();
        payload["contact"]["phone"] = json!("+33-ABC-123");
        payload["contact"]["email"] = json!("not-an-email");
        let failure = validate(SubmissionKind::Quote, &payload).unwrap_err();

        let fields: Vec<&str> = failure.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["contact.email", "contact.phone"]);
        assert!(failure.errors.iter().all(|e| e.kind == ViolationKind::InvalidFormat));
    }

    #[test]
    fn test_wrong_json_type_is_invalid_type() {
        let mut payload = valid_quote();
        payload["volume"] = json!("forty-five");
        let failure = validate(SubmissionKind::Quote, &payload).unwrap_err();
        assert_eq!(failure.for_field("volume").unwrap().kind, ViolationKind::InvalidType);
    }

    #[test]
    fn test_negative_volume_and_high_floor_are_out_of_range() {
        let mut payload = valid_quote();
        payload["volume"] = json!(-1);
        payload["floor"] = json!(101);
        let failure = validate(SubmissionKind::Quote, &payload).unwrap_err();
        assert_eq!(failure.for_field("volume").unwrap().kind, ViolationKind::OutOfRange);
        assert_eq!(failure.for_field("floor").unwrap().kind, ViolationKind::OutOfRange);
    }

    #[test]
    fn test_fractional_rooms_and_null_optionals_accepted() {
        let mut payload = valid_quote();
        payload["rooms"] = json!(2.5);
        payload["fromZip"] = Value::Null;
        payload["housingType"] = json!("appartement");
        let quote = match validate(SubmissionKind::Quote, &payload).unwrap() {
            Submission::Quote(quote) => quote,
            other => panic!("unexpected {:?}", other),
        };
        assert_eq!(quote.rooms, Some(2.5));
        assert!(quote.from_zip.is_none());
    }

    #[test]
    fn test_whole_float_accepted_for_integer_fields() {
        let mut payload = valid_quote();
        payload["volume"] = json!(45.0);
        payload["floor"] = json!(2.0);
        let quote = match validate(SubmissionKind::Quote, &payload).unwrap() {
            Submission::Quote(quote) => quote,
            other => panic!("unexpected {:?}", other),
        };
        assert_eq!(quote.volume, Some(45));
        assert_eq!(quote.floor, Some(2));

        payload["volume"] = json!(45.5);
        let failure = validate(SubmissionKind::Quote, &payload).unwrap_err();
        assert_eq!(failure.for_field("volume").unwrap().kind, ViolationKind::InvalidType);
    }

    #[test]
    fn test_date_formats() {
        for date in [
            "2026-02-15",
            "2026-02-15T10:00:00",
            "2026-02-15T10:00:00+01:00",
            "2026-02-15T10:00:00.123Z",
            "2026-02-15T10:00Z",
            "2026-02-15T10:00+01:00",
        ] {
            let mut payload = valid_quote();
            payload["date"] = json!(date);
            assert!(validate(SubmissionKind::Quote, &payload).is_ok(), "{} should be accepted", date);
        }
        let mut payload = valid_quote();
        payload["date"] = json!("15/02/2026");
        let failure = validate(SubmissionKind::Quote, &payload).unwrap_err();
        assert_eq!(failure.for_field("date").unwrap().kind, ViolationKind::InvalidFormat);
    }

    #[test]
    fn test_zip_longer_than_ten_characters() {
        let mut payload = valid_quote();
        payload["fromZip"] = json!("12345678901");
        let failure = validate(SubmissionKind::Quote, &payload).unwrap_err();
        let error = failure.for_field("fromZip").unwrap();
        assert_eq!(error.kind, ViolationKind::InvalidLength);
        assert!(error.reason.contains("10"));
    }
}

#[cfg(test)]
mod contact_tests {
    use super::*;

    #[test]
    fn test_valid_contact() {
        assert!(matches!(
            validate(SubmissionKind::Contact, &valid_contact()),
            Ok(Submission::Contact(_))
        ));
    }

    #[test]
    fn test_short_message_cites_minimum_length() {
        let mut payload = valid_contact();
        payload["message"] = json!("Salut");
        let failure = validate(SubmissionKind::Contact, &payload).unwrap_err();
        assert_eq!(failure.errors.len(), 1);
        let error = failure.first().unwrap();
        assert_eq!(error.field, "message");
        assert_eq!(error.kind, ViolationKind::InvalidLength);
        assert!(error.reason.contains("10"), "reason was {}", error.reason);
    }

    #[test]
    fn test_empty_subject_rejected() {
        let mut payload = valid_contact();
        payload["subject"] = json!("");
        let failure = validate(SubmissionKind::Contact, &payload).unwrap_err();
        assert_eq!(failure.for_field("subject").unwrap().kind, ViolationKind::InvalidLength);
    }

    #[test]
    fn test_non_object_body_is_malformed() {
        for body in [json!([1, 2, 3]), json!("hello"), Value::Null] {
            let failure = validate(SubmissionKind::Contact, &body).unwrap_err();
            assert_eq!(failure.first().unwrap().kind, ViolationKind::Malformed);
        }
    }
}

#[cfg(test)]
mod business_tests {
    use super::*;

    #[test]
    fn test_valid_business_lead() {
        match validate(SubmissionKind::Business, &valid_business()).unwrap() {
            Submission::Business(lead) => {
                assert_eq!(lead.company_name, "Acme SA");
                assert_eq!(lead.employee_count.as_deref(), Some("50-100"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_phone_rules() {
        for phone in ["+33 6 12 34 56 78", "(022) 123-45-67", "0791234567"] {
            let mut payload = valid_business();
            payload["phone"] = json!(phone);
            assert!(validate(SubmissionKind::Business, &payload).is_ok(), "{} should pass", phone);
        }
        for phone in ["+33-ABC-123", "06 12 34 56 7x", "++41791234567"] {
            let mut payload = valid_business();
            payload["phone"] = json!(phone);
            let failure = validate(SubmissionKind::Business, &payload).unwrap_err();
            assert_eq!(failure.for_field("phone").unwrap().kind, ViolationKind::InvalidFormat, "{}", phone);
        }
    }

    #[test]
    fn test_short_phone_is_invalid_length() {
        let mut payload = valid_business();
        payload["phone"] = json!("12345");
        let failure = validate(SubmissionKind::Business, &payload).unwrap_err();
        assert!(failure
            .errors
            .iter()
            .any(|e| e.field == "phone" && e.kind == ViolationKind::InvalidLength));
    }

    #[test]
    fn test_service_needs_too_short() {
        let mut payload = valid_business();
        payload["serviceNeeds"] = json!("Bureaux");
        let failure = validate(SubmissionKind::Business, &payload).unwrap_err();
        assert_eq!(failure.for_field("serviceNeeds").unwrap().kind, ViolationKind::InvalidLength);
    }
}
