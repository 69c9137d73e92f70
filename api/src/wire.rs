/// Backend raw wire types — serde shapes for deserializing API responses.
/// These map to the clean domain types in client.rs; every field is
/// optional here so that defaults are applied in exactly one place.
use serde::de::{IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;

/// A JSON scalar that the backend sends either quoted or bare.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl Scalar {
    pub fn as_text(&self) -> String {
        match self {
            Scalar::Int(n) => n.to_string(),
            Scalar::Float(n) => n.to_string(),
            Scalar::Bool(b) => b.to_string(),
            Scalar::Text(s) => s.clone(),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int(n) => Some(*n as f64),
            Scalar::Float(n) => Some(*n),
            Scalar::Bool(_) => None,
            Scalar::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Non-negative integer view; `"?"`, blanks and negatives read as `None`.
    pub fn as_u32(&self) -> Option<u32> {
        self.as_f64()
            .filter(|n| n.is_finite() && *n >= 0.0)
            .map(|n| n.round().min(u32::MAX as f64) as u32)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(b) => Some(*b),
            Scalar::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Error envelopes
// ---------------------------------------------------------------------------

/// `{ detail }` on non-2xx responses, `{ error }` on logical failures.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct ErrorBody {
    pub detail: Option<Value>,
    pub error: Option<Value>,
}

impl ErrorBody {
    pub fn message(&self) -> Option<String> {
        self.detail
            .as_ref()
            .and_then(value_message)
            .or_else(|| self.error.as_ref().and_then(value_message))
    }
}

/// Text of an error field. Falsy values (`null`, `false`, `0`, blank
/// strings) carry no message.
pub fn value_message(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Fixtures  (/api/v1/fixtures/...)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct FixturesResponse {
    pub league_name: Option<String>,
    pub fixtures: Option<Vec<WireFixture>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WireFixture {
    pub match_id: Option<Scalar>,
    pub display: Option<String>,
}

// ---------------------------------------------------------------------------
// Heatmap  (/api/v1/heatmap/...)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct HeatmapResponse {
    pub match_date: Option<String>,
    pub localteam_name: Option<String>,
    pub visitorteam_name: Option<String>,
    pub final_score: Option<String>,
    pub match_status: Option<String>,
    pub live_minute: Option<Scalar>,
    pub localteam_players: Option<WireRoster>,
    pub visitorteam_players: Option<WireRoster>,
}

/// Player map kept in document order; serde's `HashMap` would lose it.
#[derive(Debug, Default, Clone)]
pub struct WireRoster(pub Vec<(String, WirePlayer)>);

impl<'de> Deserialize<'de> for WireRoster {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RosterVisitor;

        impl<'de> Visitor<'de> for RosterVisitor {
            type Value = WireRoster;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of player id to player")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut players = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((id, player)) = map.next_entry::<String, WirePlayer>()? {
                    players.push((id, player));
                }
                Ok(WireRoster(players))
            }

            // Python backends serialize an empty dict-like value as `[]` now and then.
            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                while seq.next_element::<IgnoredAny>()?.is_some() {}
                Ok(WireRoster::default())
            }
        }

        deserializer.deserialize_any(RosterVisitor)
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WirePlayer {
    pub name: Option<String>,
    pub heatmap_data: Option<Vec<WireHeatPoint>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WireHeatPoint {
    pub x: Option<Scalar>,
    pub y: Option<Scalar>,
    pub value: Option<Scalar>,
}

// ---------------------------------------------------------------------------
// Live board  (/api/v1/football/live, /api/v1/football/today)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct LiveResponse {
    pub matches: Option<Vec<WireMatch>>,
    pub updated: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireMatch {
    pub match_id: Option<Scalar>,
    pub status: Option<Scalar>,
    pub timer: Option<Scalar>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub league: Option<WireLeague>,
    pub home_team: Option<WireTeam>,
    pub away_team: Option<WireTeam>,
    pub halftime_score: Option<String>,
    pub stats: Option<WireStats>,
    pub events: Option<Vec<WireEvent>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireLeague {
    pub id: Option<Scalar>,
    pub name: Option<String>,
    pub is_cup: Option<Scalar>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireTeam {
    pub id: Option<Scalar>,
    pub name: Option<String>,
    pub goals: Option<Scalar>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireStats {
    pub possession: Option<WireStatPair>,
    pub shots_on_target: Option<WireStatPair>,
    pub shots_off_target: Option<WireStatPair>,
    pub corners: Option<WireStatPair>,
    pub yellow_cards: Option<WireStatPair>,
    pub red_cards: Option<WireStatPair>,
    pub attacks: Option<WireStatPair>,
    pub dangerous_attacks: Option<WireStatPair>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireStatPair {
    pub home: Option<Scalar>,
    pub away: Option<Scalar>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireEvent {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub minute: Option<Scalar>,
    pub extra_min: Option<Scalar>,
    pub team: Option<String>,
    pub player: Option<String>,
    pub assist: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roster_preserves_document_order() {
        let raw = r#"{"p9": {"name": "Zed"}, "p1": {"name": "Amy", "heatmap_data": []}}"#;
        let roster: WireRoster = serde_json::from_str(raw).unwrap();
        let ids: Vec<&str> = roster.0.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["p9", "p1"]);
    }

    #[test]
    fn roster_accepts_empty_list() {
        let roster: WireRoster = serde_json::from_str("[]").unwrap();
        assert!(roster.0.is_empty());
    }

    #[test]
    fn scalar_reads_quoted_numbers() {
        let goals: Scalar = serde_json::from_str(r#""3""#).unwrap();
        assert_eq!(goals.as_u32(), Some(3));
        let unknown: Scalar = serde_json::from_str(r#""?""#).unwrap();
        assert_eq!(unknown.as_u32(), None);
        let cup: Scalar = serde_json::from_str(r#""True""#).unwrap();
        assert_eq!(cup.as_bool(), Some(true));
    }

    #[test]
    fn error_body_prefers_detail() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"detail": "Match not found", "error": "other"}"#).unwrap();
        assert_eq!(body.message().as_deref(), Some("Match not found"));
        let body: ErrorBody = serde_json::from_str(r#"{"detail": null, "error": "boom"}"#).unwrap();
        assert_eq!(body.message().as_deref(), Some("boom"));
        let body: ErrorBody = serde_json::from_str("{}").unwrap();
        assert_eq!(body.message(), None);
    }

    #[test]
    fn falsy_error_fields_carry_no_message() {
        for raw in ["null", "false", "0", "0.0", r#""""#, r#""  ""#] {
            let value: Value = serde_json::from_str(raw).unwrap();
            assert_eq!(value_message(&value), None, "for {raw}");
        }
        assert_eq!(value_message(&Value::Bool(true)).as_deref(), Some("true"));
        assert_eq!(value_message(&serde_json::json!(404)).as_deref(), Some("404"));
    }
}
