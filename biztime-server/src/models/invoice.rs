//! Invoice amount validation

use serde_json::Value as JsonValue;

use super::ValidationError;

/// Validated invoice amount: finite and non-negative
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Amount(f64);

impl Amount {
    /// Create an amount from a float.
    pub fn new(value: f64) -> Result<Self, ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::InvalidFormat {
                field: "amt",
                reason: "must be a finite number",
            });
        }

        if value < 0.0 {
            return Err(ValidationError::Negative { field: "amt" });
        }

        // -0.0 passes the sign check above
        Ok(Self(value + 0.0))
    }

    /// Parse an amount from a JSON body field.
    ///
    /// Accepts JSON numbers and numeric strings (`12.5`, `"12.5"`).
    /// Missing, null and blank values are reported as empty.
    ///
    /// # Example
    /// ```
    /// use biztime_server::models::Amount;
    /// use serde_json::json;
    ///
    /// assert_eq!(Amount::from_json(Some(&json!(0))).unwrap().value(), 0.0);
    /// assert_eq!(Amount::from_json(Some(&json!("12.5"))).unwrap().value(), 12.5);
    /// assert!(Amount::from_json(Some(&json!(-5))).is_err());
    /// assert!(Amount::from_json(Some(&json!("abc"))).is_err());
    /// ```
    pub fn from_json(value: Option<&JsonValue>) -> Result<Self, ValidationError> {
        match value {
            None | Some(JsonValue::Null) => Err(ValidationError::Empty { field: "amt" }),
            Some(JsonValue::Number(n)) => n
                .as_f64()
                .ok_or(ValidationError::InvalidFormat {
                    field: "amt",
                    reason: "must be a number",
                })
                .and_then(Self::new),
            Some(JsonValue::String(s)) => {
                let s = s.trim();
                if s.is_empty() {
                    return Err(ValidationError::Empty { field: "amt" });
                }
                s.parse::<f64>()
                    .map_err(|_| ValidationError::InvalidFormat {
                        field: "amt",
                        reason: "must be a number",
                    })
                    .and_then(Self::new)
            }
            Some(_) => Err(ValidationError::InvalidFormat {
                field: "amt",
                reason: "must be a number",
            }),
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}
