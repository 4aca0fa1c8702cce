//! Tests for the typed error handling system
//!
//! These tests verify that:
//! - Errors return correct HTTP status codes
//! - Error responses are properly formatted
//! - Error conversions work correctly
//! - Error matching allows clients to handle specific cases

use axum::http::StatusCode;
use axum::response::IntoResponse;
use order_wizard::prelude::*;

// =============================================================================
// HTTP Status Code Tests
// =============================================================================

mod status_code_tests {
    use super::*;

    #[test]
    fn test_order_not_found_returns_404() {
        let err = WizardError::Order(OrderError::NotFound { id: Uuid::new_v4() });
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_blocked_step_returns_409() {
        let err = WizardError::Order(OrderError::StepBlocked {
            step: WizardStep::Sizes,
        });
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_invalid_step_returns_400() {
        let err = WizardError::Order(OrderError::InvalidStep {
            value: "7".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_validation_error_returns_400() {
        let err = WizardError::Validation(ValidationError::field("email", "invalid format"));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_storage_error_returns_500() {
        let err = WizardError::Storage(StorageError::backend("json_file", "disk full"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_unconfigured_export_returns_412() {
        let err = WizardError::Export(ExportError::NotConfigured {
            sink: "trello".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::PRECONDITION_FAILED);
    }
}

// =============================================================================
// Error Response Format Tests
// =============================================================================

mod response_format_tests {
    use super::*;

    #[test]
    fn test_not_found_response_carries_id() {
        let id = Uuid::new_v4();
        let response = WizardError::Order(OrderError::NotFound { id }).to_response();
        assert_eq!(response.code, "ORDER_NOT_FOUND");
        assert!(response.message.contains(&id.to_string()));
        assert_eq!(response.details.unwrap()["order_id"], id.to_string());
    }

    #[test]
    fn test_status_transition_response_names_both_ends() {
        let err = WizardError::Order(OrderError::InvalidStatusTransition {
            id: Uuid::nil(),
            from: OrderStatus::Draft,
            to: OrderStatus::Approved,
        });
        let response = err.to_response();
        assert_eq!(response.code, "INVALID_STATUS_TRANSITION");
        assert!(response.message.contains("draft to approved"));
        let details = response.details.unwrap();
        assert_eq!(details["from"], "draft");
        assert_eq!(details["to"], "approved");
    }

    #[test]
    fn test_internal_error_has_no_details() {
        let response = WizardError::Internal("lock poisoned".to_string()).to_response();
        assert_eq!(response.code, "INTERNAL_ERROR");
        assert!(response.details.is_none());
    }

    #[test]
    fn test_into_response_status() {
        let response = WizardError::Order(OrderError::NoCurrentOrder).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}

// =============================================================================
// Conversion Tests
// =============================================================================

mod conversion_tests {
    use super::*;

    #[test]
    fn test_customer_validation_converts_to_field_errors() {
        let err = order_wizard::core::validation::validate_customer(&Customer::new(" ", "nope"))
            .unwrap_err();
        match err {
            WizardError::Validation(validation) => {
                let fields = validation.fields();
                assert_eq!(fields.len(), 2);
                assert!(fields.contains(&"email"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_config_error_converts() {
        let err: WizardError = ConfigError::InvalidValue {
            field: "tally.sizes".to_string(),
            value: "[]".to_string(),
            message: "at least one size is required".to_string(),
        }
        .into();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_navigation_error_is_matchable() {
        let mut store = OrderStore::in_memory();
        store.create_order("Team A").unwrap();
        match store.navigate_to(WizardStep::Details) {
            Err(WizardError::Order(OrderError::StepBlocked { step })) => {
                assert_eq!(step, WizardStep::Details);
            }
            other => panic!("expected a blocked step, got {:?}", other),
        }
    }
}
