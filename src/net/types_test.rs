use serde_json::json;

use super::*;

// =============================================================================
// Role / enums
// =============================================================================

#[test]
fn role_accepts_backend_and_uppercase_spellings() {
    for (raw, expected) in [
        ("super_admin", Role::SuperAdmin),
        ("SUPER_ADMIN", Role::SuperAdmin),
        ("board", Role::Board),
        ("FISCAL_COUNCIL", Role::FiscalCouncil),
        ("MEMBER", Role::Member),
    ] {
        let role: Role = serde_json::from_value(json!(raw)).unwrap();
        assert_eq!(role, expected, "raw {raw:?}");
    }
}

#[test]
fn role_serializes_backend_value() {
    assert_eq!(serde_json::to_value(Role::FiscalCouncil).unwrap(), json!("fiscal_council"));
}

#[test]
fn role_rejects_unknown() {
    assert!(serde_json::from_value::<Role>(json!("treasurer")).is_err());
}

#[test]
fn language_accepts_browser_locale_tag() {
    let lang: Language = serde_json::from_value(json!("pt-BR")).unwrap();
    assert_eq!(lang, Language::PtBr);
    assert_eq!(serde_json::to_value(lang).unwrap(), json!("pt-br"));
}

#[test]
fn case_status_unknown_maps_to_other() {
    let status: CaseStatus = serde_json::from_value(json!("awaiting_transfer")).unwrap();
    assert_eq!(status, CaseStatus::Other);
}

// =============================================================================
// User / Profile
// =============================================================================

#[test]
fn user_decodes_with_profile_and_keeps_extra_fields() {
    let user: User = serde_json::from_value(json!({
        "id": 1,
        "email": "a@b.com",
        "first_name": "Ana",
        "last_name": "Souza",
        "role": "member",
        "full_name": "Ana Souza",
        "profile": {
            "phone": "+55 11 99999-0000",
            "city": "Campinas",
            "membership_due_day": 10,
            "theme_preference": "black",
            "language_preference": "pt-br",
            "is_onboarding_completed": true,
            "zip_code": "13000-000"
        }
    }))
    .unwrap();

    assert_eq!(user.role, Role::Member);
    assert_eq!(user.full_name(), "Ana Souza");
    assert_eq!(user.profile.theme_preference, Some(Theme::Black));
    assert_eq!(user.profile.membership_due_day, Some(10));
    assert!(user.profile.is_onboarding_completed);
    assert_eq!(user.profile.extra.get("zip_code"), Some(&json!("13000-000")));
}

#[test]
fn user_null_profile_defaults() {
    let user: User = serde_json::from_value(json!({ "id": 2, "role": "BOARD", "profile": null })).unwrap();
    assert_eq!(user.profile, Profile::default());
    assert_eq!(user.full_name(), "");
}

// =============================================================================
// Payload serialization
// =============================================================================

#[test]
fn preferences_update_skips_unset_fields() {
    let update = PreferencesUpdate { theme_preference: Some(Theme::White), ..PreferencesUpdate::default() };
    assert_eq!(serde_json::to_value(update).unwrap(), json!({ "theme_preference": "white" }));
}

#[test]
fn registration_omits_missing_names() {
    let reg = Registration {
        email: "a@b.com".to_owned(),
        password1: "pw".to_owned(),
        password2: "pw".to_owned(),
        first_name: None,
        last_name: Some("Lima".to_owned()),
    };
    assert_eq!(
        serde_json::to_value(reg).unwrap(),
        json!({ "email": "a@b.com", "password1": "pw", "password2": "pw", "last_name": "Lima" })
    );
}

// =============================================================================
// Amounts
// =============================================================================

#[test]
fn fee_amount_from_decimal_string() {
    let fee: MembershipFee = serde_json::from_value(json!({
        "id": 3,
        "user": 1,
        "competency_month": "2025-01-01",
        "amount": "60.00",
        "due_date": "2025-01-10",
        "status": "overdue",
        "paid_at": null,
        "is_overdue": true,
        "days_overdue": 4
    }))
    .unwrap();
    assert!((fee.amount - 60.0).abs() < f64::EPSILON);
    assert_eq!(fee.status, FeeStatus::Overdue);
    assert_eq!(fee.days_overdue, 4);
}

#[test]
fn case_amount_from_number() {
    let case: AssistanceCase = serde_json::from_value(json!({
        "id": 9,
        "title": "Cestas básicas para família",
        "total_value": 350.5,
        "status": "pending_approval",
        "created_by": { "id": 4, "email": "board@orbe.org", "full_name": "Board", "role": "board" },
        "reviewed_by": null,
        "approved_at": null,
        "attachment_count": 2
    }))
    .unwrap();
    assert!((case.total_value - 350.5).abs() < f64::EPSILON);
    assert_eq!(case.status, CaseStatus::PendingApproval);
    assert_eq!(case.created_by.and_then(|u| u.role), Some(Role::Board));
    assert!(case.internal_description.is_none());
}

#[test]
fn bad_amount_is_rejected() {
    let result = serde_json::from_value::<MembershipFee>(json!({
        "id": 3, "user": 1, "competency_month": "2025-01-01", "amount": "sixty",
        "due_date": "2025-01-10", "status": "paid", "paid_at": null
    }));
    assert!(result.is_err());
}

// =============================================================================
// Listing
// =============================================================================

#[test]
fn listing_accepts_plain_array_and_page() {
    let plain: Listing<i64> = serde_json::from_value(json!([1, 2])).unwrap();
    assert_eq!(plain.into_items(), vec![1, 2]);

    let page: Listing<i64> =
        serde_json::from_value(json!({ "count": 3, "next": null, "previous": null, "results": [3] })).unwrap();
    assert_eq!(page.into_items(), vec![3]);
}
