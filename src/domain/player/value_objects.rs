use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Identifier assigned to a player by the store
///
/// # Invariants
/// - Always a well-formed UUID
/// - Never changes after creation
///
/// # Example
/// ```
/// use player_service::domain::player::PlayerId;
///
/// let id = PlayerId::new();
/// assert_eq!(PlayerId::parse(&id.to_string()), Some(id));
/// assert!(PlayerId::parse("not-an-id").is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(Uuid);

impl PlayerId {
    /// Generates a fresh identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses a raw path segment, returning `None` when it is malformed
    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw.trim()).ok().map(Self)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for PlayerId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Playing position of a player
///
/// Accepts both the English names and the Spanish names used by the
/// existing clients (DELANTERO, MEDIO, DEFENSA, PORTERO). Always written
/// back using the Spanish names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    Forward,
    Midfielder,
    Defender,
    Goalkeeper,
}

impl Position {
    pub const ALL: [Position; 4] = [
        Position::Forward,
        Position::Midfielder,
        Position::Defender,
        Position::Goalkeeper,
    ];

    /// Name stored and returned on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Position::Forward => "DELANTERO",
            Position::Midfielder => "MEDIO",
            Position::Defender => "DEFENSA",
            Position::Goalkeeper => "PORTERO",
        }
    }

    pub fn english_name(&self) -> &'static str {
        match self {
            Position::Forward => "FORWARD",
            Position::Midfielder => "MIDFIELDER",
            Position::Defender => "DEFENDER",
            Position::Goalkeeper => "GOALKEEPER",
        }
    }
}

/// Error returned when a string names no known position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPosition(pub String);

impl fmt::Display for UnknownPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown position: {}", self.0)
    }
}

impl std::error::Error for UnknownPosition {}

impl FromStr for Position {
    type Err = UnknownPosition;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase();
        Position::ALL
            .into_iter()
            .find(|p| p.as_str() == normalized || p.english_name() == normalized)
            .ok_or_else(|| UnknownPosition(s.to_string()))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Position {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
