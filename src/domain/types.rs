/// Core types and enums used throughout the domain layer
///
/// This module defines the fundamental types like Periodicity, the ID types and
/// the id-or-name identifier that are used by Habit, Completion and the analytics.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::DomainError;

/// Unique identifier for a habit
///
/// This is a wrapper around the SQLite row id to provide type safety - you can't
/// accidentally pass a habit ID where a completion ID is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HabitId(pub i64);

impl fmt::Display for HabitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a single completion record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompletionId(pub i64);

impl fmt::Display for CompletionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How often a habit should be performed
///
/// The periodicity decides which calendar window a completion has to fall into
/// and when the current window closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Periodicity {
    /// Once per calendar day
    Daily,
    /// Once per Monday-to-Sunday week
    Weekly,
    /// Once per calendar month
    Monthly,
}

impl Periodicity {
    /// Every periodicity, in reporting order
    pub const ALL: [Periodicity; 3] = [Periodicity::Daily, Periodicity::Weekly, Periodicity::Monthly];

    /// Storage and wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Periodicity::Daily => "daily",
            Periodicity::Weekly => "weekly",
            Periodicity::Monthly => "monthly",
        }
    }

    /// Capitalized name for reports
    pub fn display_name(&self) -> &'static str {
        match self {
            Periodicity::Daily => "Daily",
            Periodicity::Weekly => "Weekly",
            Periodicity::Monthly => "Monthly",
        }
    }
}

impl fmt::Display for Periodicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Periodicity {
    type Err = DomainError;

    /// Parse a periodicity, case-insensitively
    ///
    /// Anything other than daily/weekly/monthly is rejected; we never fall back
    /// to a default because that would silently shift every deadline.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Periodicity::Daily),
            "weekly" => Ok(Periodicity::Weekly),
            "monthly" => Ok(Periodicity::Monthly),
            _ => Err(DomainError::InvalidPeriodicity(s.to_string())),
        }
    }
}

/// A reference to a habit by its numeric ID or by its display name
///
/// Names are not guaranteed unique, so resolving a `Name` can yield zero,
/// one or several habits (see `storage::HabitLookup`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HabitIdentifier {
    Id(HabitId),
    Name(String),
}

impl HabitIdentifier {
    /// Interpret free text from the command line or a tool call
    ///
    /// Text that parses as an integer is treated as an ID, anything else is a name.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<i64>() {
            Ok(id) => HabitIdentifier::Id(HabitId(id)),
            Err(_) => HabitIdentifier::Name(trimmed.to_string()),
        }
    }

    /// Interpret a JSON value received over MCP
    ///
    /// Integers become IDs and strings go through `parse`. Any other JSON type
    /// (floats, booleans, arrays, objects, null) is rejected.
    pub fn from_json(value: &Value) -> Result<Self, DomainError> {
        match value {
            Value::Number(n) => n
                .as_i64()
                .map(|id| HabitIdentifier::Id(HabitId(id)))
                .ok_or_else(|| DomainError::InvalidIdentifierType(format!("number {}", n))),
            Value::String(s) => Ok(Self::parse(s)),
            other => Err(DomainError::InvalidIdentifierType(json_type_name(other).to_string())),
        }
    }
}

impl fmt::Display for HabitIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HabitIdentifier::Id(id) => write!(f, "{}", id),
            HabitIdentifier::Name(name) => f.write_str(name),
        }
    }
}

impl From<HabitId> for HabitIdentifier {
    fn from(id: HabitId) -> Self {
        HabitIdentifier::Id(id)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_periodicity_parsing() {
        assert_eq!("daily".parse::<Periodicity>(), Ok(Periodicity::Daily));
        assert_eq!(" Weekly ".parse::<Periodicity>(), Ok(Periodicity::Weekly));
        assert_eq!("MONTHLY".parse::<Periodicity>(), Ok(Periodicity::Monthly));
        assert_eq!(
            "yearly".parse::<Periodicity>(),
            Err(DomainError::InvalidPeriodicity("yearly".to_string()))
        );
    }

    #[test]
    fn test_identifier_parse() {
        assert_eq!(HabitIdentifier::parse("42"), HabitIdentifier::Id(HabitId(42)));
        assert_eq!(
            HabitIdentifier::parse("Morning Run"),
            HabitIdentifier::Name("Morning Run".to_string())
        );
    }

    #[test]
    fn test_identifier_from_json() {
        assert_eq!(HabitIdentifier::from_json(&json!(7)).unwrap(), HabitIdentifier::Id(HabitId(7)));
        assert_eq!(
            HabitIdentifier::from_json(&json!("Read")).unwrap(),
            HabitIdentifier::Name("Read".to_string())
        );
        assert!(matches!(
            HabitIdentifier::from_json(&json!(true)),
            Err(DomainError::InvalidIdentifierType(_))
        ));
        assert!(matches!(
            HabitIdentifier::from_json(&json!(1.5)),
            Err(DomainError::InvalidIdentifierType(_))
        ));
    }
}
