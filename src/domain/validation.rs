//! Input validation for client-submitted payloads.
//!
//! Each validator either returns the cleaned-up fields or every field-level
//! problem it found, so a client can fix a form in one round trip.

use crate::domain::product::{NewProduct, ProductDraft, ProductPatch};
use crate::domain::user::{CreateUser, LoginRequest};
use serde::Serialize;
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed")?;
        for (i, e) in self.0.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{}{} {}", sep, e.field, e.message)?;
        }
        Ok(())
    }
}

pub fn validate_registration(req: &CreateUser) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let email = req.email.trim();
    if email.is_empty() {
        errors.push("email", "is required");
    } else if !email.contains('@') {
        errors.push("email", "must be a valid email address");
    }
    if req.password.is_empty() {
        errors.push("password", "is required");
    }
    errors.into_result(())
}

/// Login only checks presence; anything else is reported as invalid credentials.
pub fn validate_login(req: &LoginRequest) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if req.email.trim().is_empty() {
        errors.push("email", "is required");
    }
    if req.password.is_empty() {
        errors.push("password", "is required");
    }
    errors.into_result(())
}

pub fn validate_new_product(draft: ProductDraft) -> Result<NewProduct, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let title = required_text("title", draft.title, &mut errors);
    let description = required_text("description", draft.description, &mut errors);
    let image = required_text("image", draft.image, &mut errors);
    let price = match draft.price {
        None | Some(Value::Null) => {
            errors.push("price", "is required");
            None
        }
        Some(raw) => parse_price(&raw, &mut errors),
    };

    match (title, price, description, image) {
        (Some(title), Some(price), Some(description), Some(image)) if errors.is_empty() => {
            Ok(NewProduct {
                title,
                price,
                description,
                image,
            })
        }
        _ => Err(errors),
    }
}

/// Absent fields are left untouched; present fields must satisfy the same rules
/// as on creation.
pub fn validate_product_patch(draft: ProductDraft) -> Result<ProductPatch, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let patch = ProductPatch {
        title: draft
            .title
            .and_then(|v| required_text("title", Some(v), &mut errors)),
        price: match draft.price {
            None => None,
            Some(Value::Null) => {
                errors.push("price", "cannot be null");
                None
            }
            Some(raw) => parse_price(&raw, &mut errors),
        },
        description: draft
            .description
            .and_then(|v| required_text("description", Some(v), &mut errors)),
        image: draft
            .image
            .and_then(|v| required_text("image", Some(v), &mut errors)),
    };
    errors.into_result(patch)
}

fn required_text(
    field: &'static str,
    value: Option<String>,
    errors: &mut ValidationErrors,
) -> Option<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Some(v.trim().to_string()),
        Some(_) => {
            errors.push(field, "cannot be blank");
            None
        }
        None => {
            errors.push(field, "is required");
            None
        }
    }
}

// Numeric strings are cast the way the clients' form inputs expect.
fn parse_price(raw: &Value, errors: &mut ValidationErrors) -> Option<f64> {
    let parsed = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(p) if p.is_finite() && p >= 0.0 => Some(p),
        Some(_) => {
            errors.push("price", "must be a non-negative number");
            None
        }
        None => {
            errors.push("price", "must be a number");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lamp() -> ProductDraft {
        ProductDraft {
            title: Some("Lamp".to_string()),
            price: Some(json!(20)),
            description: Some("desk lamp".to_string()),
            image: Some("http://x/y.png".to_string()),
        }
    }

    #[test]
    fn test_validate_new_product_accepts_complete_draft() {
        let product = validate_new_product(lamp()).unwrap();
        assert_eq!(product.title, "Lamp");
        assert_eq!(product.price, 20.0);
        assert_eq!(product.image, "http://x/y.png");
    }

    #[test]
    fn test_validate_new_product_reports_every_missing_field() {
        let errors = validate_new_product(ProductDraft::default()).unwrap_err();
        assert_eq!(errors.errors().len(), 4);
        for field in ["title", "price", "description", "image"] {
            assert!(errors.has_field(field), "missing error for {}", field);
        }
    }

    #[test]
    fn test_validate_new_product_rejects_negative_price() {
        let mut draft = lamp();
        draft.price = Some(json!(-1));
        let errors = validate_new_product(draft).unwrap_err();
        assert!(errors.has_field("price"));
        assert_eq!(errors.errors().len(), 1);
    }

    #[test]
    fn test_validate_new_product_rejects_non_numeric_price() {
        let mut draft = lamp();
        draft.price = Some(json!("cheap"));
        assert!(validate_new_product(draft).unwrap_err().has_field("price"));

        let mut draft = lamp();
        draft.price = Some(json!(true));
        assert!(validate_new_product(draft).unwrap_err().has_field("price"));
    }

    #[test]
    fn test_validate_new_product_casts_numeric_string_price() {
        let mut draft = lamp();
        draft.price = Some(json!("19.5"));
        assert_eq!(validate_new_product(draft).unwrap().price, 19.5);
    }

    #[test]
    fn test_validate_new_product_accepts_zero_price() {
        let mut draft = lamp();
        draft.price = Some(json!(0));
        assert_eq!(validate_new_product(draft).unwrap().price, 0.0);
    }

    #[test]
    fn test_validate_new_product_rejects_blank_title() {
        let mut draft = lamp();
        draft.title = Some("   ".to_string());
        let errors = validate_new_product(draft).unwrap_err();
        assert_eq!(errors.errors()[0].message, "cannot be blank");
    }

    #[test]
    fn test_validate_product_patch_keeps_only_present_fields() {
        let patch = validate_product_patch(ProductDraft {
            price: Some(json!(35)),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(patch.price, Some(35.0));
        assert!(patch.title.is_none());
        assert!(patch.description.is_none());
        assert!(patch.image.is_none());
    }

    #[test]
    fn test_validate_product_patch_rejects_invalid_present_fields() {
        let errors = validate_product_patch(ProductDraft {
            title: Some(String::new()),
            price: Some(json!(-5)),
            ..Default::default()
        })
        .unwrap_err();
        assert!(errors.has_field("title"));
        assert!(errors.has_field("price"));
    }

    #[test]
    fn test_validate_registration() {
        assert!(
            validate_registration(&CreateUser {
                email: "a@test.com".to_string(),
                password: "pw123456".to_string(),
            })
            .is_ok()
        );

        let errors = validate_registration(&CreateUser {
            email: "not-an-email".to_string(),
            password: String::new(),
        })
        .unwrap_err();
        assert!(errors.has_field("email"));
        assert!(errors.has_field("password"));
    }

    #[test]
    fn test_display_lists_fields() {
        let mut errors = ValidationErrors::new();
        errors.push("title", "is required");
        errors.push("price", "must be a number");
        assert_eq!(
            errors.to_string(),
            "Validation failed: title is required; price must be a number"
        );
    }
}
