//! Field rules for player payloads
//!
//! Bodies arrive as raw JSON so that every failing field can be reported at
//! once, instead of stopping at the first deserialization error.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

use super::player::{NewPlayer, PlayerPatch};
use super::value_objects::Position;

/// Maximum length of first and last names, in characters
pub const MAX_NAME_LENGTH: usize = 32;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$",
    )
    .unwrap()
});

static PHONE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+[0-9][0-9 -]{9,15}$").unwrap());

/// Rule a field failed to satisfy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rule {
    Object,
    Required,
    Type,
    MatchesLength,
    MatchesPattern,
    ValidEmail,
    ValidEnum,
}

impl Rule {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rule::Object => "object",
            Rule::Required => "required",
            Rule::Type => "type",
            Rule::MatchesLength => "matches-length",
            Rule::MatchesPattern => "matches-pattern",
            Rule::ValidEmail => "valid-email",
            Rule::ValidEnum => "valid-enum",
        }
    }
}

/// One failing field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub rule: Rule,
    pub message: String,
}

impl FieldError {
    fn new(field: &str, rule: Rule, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            rule,
            message: message.into(),
        }
    }
}

/// All field failures found in one payload, never empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.0
    }

    /// Returns true when `field` failed `rule`
    pub fn has(&self, field: &str, rule: Rule) -> bool {
        self.0.iter().any(|e| e.field == field && e.rule == rule)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{} ({})", e.field, e.rule.as_str()))
            .collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Validates the body of a player creation request
///
/// `_id`, `id`, `team_id` and unknown members are ignored: the store assigns
/// the identifier and the caller's scope decides the team.
///
/// # Example
/// ```
/// use player_service::domain::player::validate_new_player;
/// use serde_json::json;
///
/// let player = validate_new_player(&json!({
///     "first_name": "Jose",
///     "last_name": "Gonzalez",
///     "email": "jose@email.com",
///     "position": "DELANTERO"
/// }))
/// .expect("valid player");
/// assert_eq!(player.first_name, "Jose");
///
/// let errors = validate_new_player(&json!({ "email": "nope" })).unwrap_err();
/// assert_eq!(errors.errors().len(), 4);
/// ```
pub fn validate_new_player(body: &Value) -> Result<NewPlayer, ValidationErrors> {
    let mut checker = FieldChecker::new(body)?;

    let first_name = checker.name("first_name", true);
    let last_name = checker.name("last_name", true);
    let email = checker.email(true);
    let phone = checker.phone();
    let position = checker.position(true);

    match (first_name, last_name, email, position) {
        (Some(first_name), Some(last_name), Some(email), Some(position))
            if checker.errors.is_empty() =>
        {
            Ok(NewPlayer {
                first_name,
                last_name,
                email,
                phone,
                position,
            })
        }
        _ => Err(ValidationErrors(checker.errors)),
    }
}

/// Validates the body of a player update request
///
/// Only the members present are checked and end up in the patch. A member
/// set to `null` counts as absent, so an update never clears a stored value;
/// in particular a stored `phone` stays until it is replaced by another one.
pub fn validate_player_patch(body: &Value) -> Result<PlayerPatch, ValidationErrors> {
    let mut checker = FieldChecker::new(body)?;

    let patch = PlayerPatch {
        first_name: checker.name("first_name", false),
        last_name: checker.name("last_name", false),
        email: checker.email(false),
        phone: checker.phone(),
        position: checker.position(false),
    };

    if checker.errors.is_empty() {
        Ok(patch)
    } else {
        Err(ValidationErrors(checker.errors))
    }
}

struct FieldChecker<'a> {
    fields: &'a Map<String, Value>,
    errors: Vec<FieldError>,
}

impl<'a> FieldChecker<'a> {
    fn new(body: &'a Value) -> Result<Self, ValidationErrors> {
        match body {
            Value::Object(fields) => Ok(Self {
                fields,
                errors: Vec::new(),
            }),
            _ => Err(ValidationErrors(vec![FieldError::new(
                "body",
                Rule::Object,
                "request body must be a JSON object",
            )])),
        }
    }

    /// Trimmed string value of `field`; null counts as absent
    fn string(&mut self, field: &str, required: bool) -> Option<&'a str> {
        let fields = self.fields;
        match fields.get(field) {
            None | Some(Value::Null) => {
                if required {
                    self.errors
                        .push(FieldError::new(field, Rule::Required, "field required"));
                }
                None
            }
            Some(Value::String(s)) => Some(s.trim()),
            Some(_) => {
                self.errors
                    .push(FieldError::new(field, Rule::Type, "must be a string"));
                None
            }
        }
    }

    fn name(&mut self, field: &str, required: bool) -> Option<String> {
        let value = self.string(field, required)?;
        let length = value.chars().count();
        if length == 0 || length > MAX_NAME_LENGTH {
            self.errors.push(FieldError::new(
                field,
                Rule::MatchesLength,
                format!("must be between 1 and {} characters", MAX_NAME_LENGTH),
            ));
            return None;
        }
        Some(value.to_string())
    }

    fn email(&mut self, required: bool) -> Option<String> {
        let value = self.string("email", required)?;
        if !EMAIL_PATTERN.is_match(value) {
            self.errors.push(FieldError::new(
                "email",
                Rule::ValidEmail,
                "value is not a valid email address",
            ));
            return None;
        }
        Some(value.to_string())
    }

    fn phone(&mut self) -> Option<String> {
        let value = self.string("phone", false)?;
        if !PHONE_PATTERN.is_match(value) {
            self.errors.push(FieldError::new(
                "phone",
                Rule::MatchesPattern,
                "must start with + followed by 10 to 16 digits, spaces or hyphens",
            ));
            return None;
        }
        Some(value.to_string())
    }

    fn position(&mut self, required: bool) -> Option<Position> {
        let value = self.string("position", required)?;
        match value.parse() {
            Ok(position) => Some(position),
            Err(_) => {
                let allowed: Vec<&str> = Position::ALL.iter().map(Position::as_str).collect();
                self.errors.push(FieldError::new(
                    "position",
                    Rule::ValidEnum,
                    format!("must be one of {}", allowed.join(", ")),
                ));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_body() -> Value {
        json!({
            "team_id": 0,
            "first_name": "Jose",
            "last_name": "Gonzalez",
            "email": "jose@email.com",
            "position": "DELANTERO"
        })
    }

    #[test]
    fn accepts_valid_player() {
        let player = validate_new_player(&valid_body()).expect("valid player");

        assert_eq!(player.first_name, "Jose");
        assert_eq!(player.last_name, "Gonzalez");
        assert_eq!(player.email, "jose@email.com");
        assert_eq!(player.phone, None);
        assert_eq!(player.position, Position::Forward);
    }

    #[test]
    fn accepts_valid_phone() {
        let mut body = valid_body();
        body["phone"] = json!("+34 612-345-678");

        let player = validate_new_player(&body).expect("valid player");
        assert_eq!(player.phone.as_deref(), Some("+34 612-345-678"));
    }

    #[test]
    fn trims_whitespace() {
        let mut body = valid_body();
        body["first_name"] = json!("  Jose ");
        body["position"] = json!(" portero ");

        let player = validate_new_player(&body).expect("valid player");
        assert_eq!(player.first_name, "Jose");
        assert_eq!(player.position, Position::Goalkeeper);
    }

    #[test]
    fn rejects_non_object_body() {
        for body in [json!([1, 2]), json!("player"), json!(null), json!(3)] {
            let errors = validate_new_player(&body).unwrap_err();
            assert_eq!(errors.errors().len(), 1);
            assert!(errors.has("body", Rule::Object));
        }
    }

    #[test]
    fn reports_every_missing_field() {
        let errors = validate_new_player(&json!({})).unwrap_err();

        assert_eq!(errors.errors().len(), 4);
        for field in ["first_name", "last_name", "email", "position"] {
            assert!(errors.has(field, Rule::Required), "{} not reported", field);
        }
    }

    #[test]
    fn rejects_empty_and_long_names() {
        let mut body = valid_body();
        body["first_name"] = json!("   ");
        body["last_name"] = json!("x".repeat(MAX_NAME_LENGTH + 1));

        let errors = validate_new_player(&body).unwrap_err();
        assert!(errors.has("first_name", Rule::MatchesLength));
        assert!(errors.has("last_name", Rule::MatchesLength));
    }

    #[test]
    fn accepts_name_at_max_length() {
        let mut body = valid_body();
        body["last_name"] = json!("ñ".repeat(MAX_NAME_LENGTH));

        assert!(validate_new_player(&body).is_ok());
    }

    #[test]
    fn rejects_invalid_emails() {
        for email in ["jose", "jose@", "@email.com", "jose@email", "jose @email.com"] {
            let mut body = valid_body();
            body["email"] = json!(email);

            let errors = validate_new_player(&body).unwrap_err();
            assert!(errors.has("email", Rule::ValidEmail), "{} accepted", email);
        }
    }

    #[test]
    fn rejects_invalid_phones() {
        for phone in ["612345678", "+12345", "+34 612 345 678 901 234", "+34abc45678901"] {
            let mut body = valid_body();
            body["phone"] = json!(phone);

            let errors = validate_new_player(&body).unwrap_err();
            assert!(errors.has("phone", Rule::MatchesPattern), "{} accepted", phone);
        }
    }

    #[test]
    fn rejects_unknown_position() {
        let mut body = valid_body();
        body["position"] = json!("STRIKER");

        let errors = validate_new_player(&body).unwrap_err();
        assert!(errors.has("position", Rule::ValidEnum));
    }

    #[test]
    fn rejects_wrong_types() {
        let mut body = valid_body();
        body["first_name"] = json!(12);
        body["position"] = json!(["DELANTERO"]);

        let errors = validate_new_player(&body).unwrap_err();
        assert!(errors.has("first_name", Rule::Type));
        assert!(errors.has("position", Rule::Type));
    }

    #[test]
    fn ignores_identifier_and_team_fields() {
        let mut body = valid_body();
        body["_id"] = json!("whatever");
        body["team_id"] = json!("not even a number");

        assert!(validate_new_player(&body).is_ok());
    }

    #[test]
    fn patch_keeps_only_present_fields() {
        let patch = validate_player_patch(&json!({
            "_id": "ignored",
            "team_id": 99,
            "email": "new@email.com"
        }))
        .expect("valid patch");

        assert_eq!(patch.email.as_deref(), Some("new@email.com"));
        assert!(patch.first_name.is_none());
        assert!(patch.position.is_none());
    }

    #[test]
    fn null_members_leave_stored_values_alone() {
        let patch = validate_player_patch(&json!({
            "phone": null,
            "first_name": null,
            "last_name": "Perez"
        }))
        .expect("valid patch");

        assert!(patch.phone.is_none());
        assert!(patch.first_name.is_none());
        assert_eq!(patch.last_name.as_deref(), Some("Perez"));
    }

    #[test]
    fn empty_patch_is_valid() {
        let patch = validate_player_patch(&json!({})).expect("valid patch");
        assert!(patch.is_empty());
    }

    #[test]
    fn patch_reports_invalid_fields() {
        let errors = validate_player_patch(&json!({
            "first_name": "",
            "position": "CENTRAL"
        }))
        .unwrap_err();

        assert_eq!(errors.errors().len(), 2);
        assert!(errors.has("first_name", Rule::MatchesLength));
        assert!(errors.has("position", Rule::ValidEnum));
    }

    #[test]
    fn errors_display_names_fields() {
        let errors = validate_new_player(&json!({ "first_name": "Jose" })).unwrap_err();
        let text = errors.to_string();
        assert!(text.contains("last_name (required)"));
    }
}
