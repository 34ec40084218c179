use chrono::NaiveDate;
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::errors::ModelError;

/// Stored when a customer is registered without an address.
pub const DEFAULT_ADDRESS: &str = "Not provided";
/// Stored when a customer is registered without a membership tier.
pub const DEFAULT_MEMBERSHIP: &str = "Regular";

/// A fully-formed customer as persisted and returned by the API.
///
/// `id` is always uppercase and unique within the stored collection.
///
/// Reading is lenient so that one hand-edited or older record never makes
/// the whole file unreadable: absent fields take their defaults, scalar
/// text fields are stringified, dates that are not ISO calendar dates load
/// as absent, and fields this type does not know are kept in `extra` and
/// written back unchanged.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(default, deserialize_with = "stored_text")]
    pub id: String,
    #[serde(default, deserialize_with = "stored_text")]
    pub name: String,
    #[serde(default, deserialize_with = "stored_text")]
    pub email: String,
    #[serde(default, deserialize_with = "stored_text")]
    pub phone: String,
    #[serde(default = "default_address", deserialize_with = "stored_text")]
    pub address: String,
    #[serde(default = "default_membership", deserialize_with = "stored_text")]
    pub membership: String,
    #[serde(default, deserialize_with = "stored_amount")]
    pub total_spent: f64,
    #[serde(default, deserialize_with = "stored_date", skip_serializing_if = "Option::is_none")]
    pub join_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "stored_date", skip_serializing_if = "Option::is_none")]
    pub last_purchase: Option<NaiveDate>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Top-level wrapper persisted to disk: `{ "customers": [...] }`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct CustomerEnvelope {
    #[serde(default)]
    pub customers: Vec<Customer>,
}

/// Registration payload as sent by clients.
///
/// Every field is optional on the wire so that missing values surface as a
/// validation error rather than a body rejection. Scalars are accepted for
/// the text fields and stored as strings; `false`, `0`, `null` and `""`
/// count as absent.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerInput {
    #[serde(deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub phone: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub address: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub membership: Option<String>,
    pub total_spent: Option<Value>,
}

impl CustomerInput {
    /// Names of the required fields (`id`, `name`, `email`, `phone`) that are absent or empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("id", &self.id),
            ("name", &self.name),
            ("email", &self.email),
            ("phone", &self.phone),
        ]
        .into_iter()
        .filter(|(_, v)| present(v).is_none())
        .map(|(name, _)| name)
        .collect()
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ModelError::MissingFields(missing))
        }
    }

    /// Uppercased id, if one was supplied.
    pub fn normalized_id(&self) -> Option<String> {
        present(&self.id).map(normalize_id)
    }

    /// Build the stored record, filling defaults and stamping both dates with `today`.
    pub fn into_customer(self, today: NaiveDate) -> Result<Customer, ModelError> {
        self.validate()?;
        let total_spent = coerce_amount(self.total_spent.as_ref());
        let address = present(&self.address).unwrap_or(DEFAULT_ADDRESS).to_string();
        let membership = present(&self.membership).unwrap_or(DEFAULT_MEMBERSHIP).to_string();
        // validate() guarantees the required fields are present
        let (Some(id), Some(name), Some(email), Some(phone)) = (self.id, self.name, self.email, self.phone) else {
            return Err(ModelError::MissingFields(vec!["id", "name", "email", "phone"]));
        };
        Ok(Customer {
            id: normalize_id(&id),
            name,
            email,
            phone,
            address,
            membership,
            total_spent,
            join_date: Some(today),
            last_purchase: Some(today),
            extra: Map::new(),
        })
    }
}

/// Customer ids are compared and stored uppercase.
pub fn normalize_id(id: &str) -> String {
    id.to_uppercase()
}

/// Numeric coercion for `totalSpent`: numbers pass through, numeric strings
/// are parsed, `true` is 1, everything else (including non-finite values) is 0.
pub fn coerce_amount(value: Option<&Value>) -> f64 {
    let amount = match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() { 0.0 } else { s.parse::<f64>().unwrap_or(0.0) }
        }
        Some(Value::Bool(true)) => 1.0,
        _ => 0.0,
    };
    if amount.is_finite() { amount } else { 0.0 }
}

// Empty strings are absent; whitespace is a value.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn default_address() -> String { DEFAULT_ADDRESS.to_string() }
fn default_membership() -> String { DEFAULT_MEMBERSHIP.to_string() }

fn stored_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

fn stored_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_amount(Some(&value)))
}

/// `YYYY-MM-DD`, or a full timestamp whose first ten characters are one.
fn stored_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s
            .get(..10)
            .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()),
        _ => None,
    })
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) | Some(Value::Bool(false)) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => Ok(None),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(true)) => Ok(Some("true".to_string())),
        Some(other) => Err(de::Error::custom(format!("expected a string, found {other}"))),
    }
}
