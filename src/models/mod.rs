use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

pub mod schema;

use schema::{
    Constraint, FieldKind, FieldRule, FieldViolation, Schema, ValidationError, ViolationKind,
};

/// Failure to produce a valid outbound payload.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("failed to serialize {entity}: {source}")]
    Serialize {
        entity: &'static str,
        source: serde_json::Error,
    },
}

/// Entities constructed through their rule table.
///
/// `from_value` checks every field before deserializing, so callers get the
/// full list of violations instead of serde's first error. `validate` runs the
/// same table over an already built value and is applied to every outbound
/// payload.
pub trait Validated: Sized + Serialize + DeserializeOwned {
    const SCHEMA: &'static Schema;

    #[cfg_attr(not(test), allow(dead_code))]
    fn from_value(mut value: Value) -> Result<Self, ValidationError> {
        Self::SCHEMA.check(&value)?;
        strip_nulls(&mut value);
        serde_json::from_value(value).map_err(|e| {
            ValidationError::single(
                Self::SCHEMA.entity,
                "<root>",
                ViolationKind::WrongType,
                e.to_string(),
            )
        })
    }

    #[cfg_attr(not(test), allow(dead_code))]
    fn from_map(map: Map<String, Value>) -> Result<Self, ValidationError> {
        Self::from_value(Value::Object(map))
    }

    /// Paths of float fields holding NaN or infinity.
    ///
    /// serde_json writes those as `null`, which the rule table alone would
    /// misreport as missing.
    fn non_finite_fields(&self) -> Vec<String> {
        Vec::new()
    }

    fn validate(&self) -> Result<(), PayloadError> {
        let entity = Self::SCHEMA.entity;
        let value = serde_json::to_value(self)
            .map_err(|source| PayloadError::Serialize { entity, source })?;

        let mut violations = match Self::SCHEMA.check(&value) {
            Ok(()) => Vec::new(),
            Err(err) => err.violations,
        };
        for field in self.non_finite_fields() {
            violations.retain(|v| v.field != field);
            violations.push(FieldViolation {
                field,
                kind: ViolationKind::OutOfRange,
                message: "must be a finite number".to_string(),
            });
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                entity,
                violations,
            }
            .into())
        }
    }
}

fn non_finite(field: &str, value: f64) -> Option<String> {
    (!value.is_finite()).then(|| field.to_string())
}

/// Drop `null` members so defaulted fields fall back to their defaults.
fn strip_nulls(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, v| !v.is_null());
            map.values_mut().for_each(strip_nulls);
        }
        Value::Array(items) => items.iter_mut().for_each(strip_nulls),
        _ => {}
    }
}

/// Validate every element of a list payload.
///
/// Violations from all rows are merged, each prefixed with its row index
/// (`[1].team.name`).
pub fn validate_all<T: Validated>(items: &[T]) -> Result<(), PayloadError> {
    let mut violations = Vec::new();

    for (i, item) in items.iter().enumerate() {
        match item.validate() {
            Ok(()) => {}
            Err(PayloadError::Invalid(err)) => {
                violations.extend(err.violations.into_iter().map(|mut v| {
                    v.field = if v.field == "<root>" {
                        format!("[{i}]")
                    } else {
                        format!("[{i}].{}", v.field)
                    };
                    v
                }));
            }
            Err(other) => return Err(other),
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationError {
            entity: T::SCHEMA.entity,
            violations,
        }
        .into())
    }
}

/// Football club as embedded in matches and standings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    /// Short code like FCB, MCI
    pub short_name: Option<String>,
    /// Hex colors for UI adaptation
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub crest_url: Option<String>,
    pub league: Option<String>,
}

impl Team {
    pub fn new(name: &str, short_name: &str, primary_color: &str, secondary_color: &str) -> Self {
        Team {
            name: name.to_string(),
            short_name: Some(short_name.to_string()),
            primary_color: Some(primary_color.to_string()),
            secondary_color: Some(secondary_color.to_string()),
            crest_url: None,
            league: None,
        }
    }
}

pub static TEAM_SCHEMA: Schema = Schema {
    entity: "Team",
    fields: &[
        FieldRule::required("name", FieldKind::Text).with(Constraint::NonEmpty),
        FieldRule::optional("short_name", FieldKind::Text),
        FieldRule::optional("primary_color", FieldKind::Text),
        FieldRule::optional("secondary_color", FieldKind::Text),
        FieldRule::optional("crest_url", FieldKind::Text),
        FieldRule::optional("league", FieldKind::Text),
    ],
};

impl Validated for Team {
    const SCHEMA: &'static Schema = &TEAM_SCHEMA;
}

/// Not served by any endpoint yet.
#[cfg_attr(not(test), allow(dead_code))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub number: Option<i64>,
    pub position: Option<String>,
    pub team_id: Option<String>,
    pub rating: Option<f64>,
}

pub static PLAYER_SCHEMA: Schema = Schema {
    entity: "Player",
    fields: &[
        FieldRule::required("name", FieldKind::Text),
        FieldRule::optional("number", FieldKind::Integer),
        FieldRule::optional("position", FieldKind::Text),
        FieldRule::optional("team_id", FieldKind::Text),
        FieldRule::optional("rating", FieldKind::Number),
    ],
};

impl Validated for Player {
    const SCHEMA: &'static Schema = &PLAYER_SCHEMA;

    fn non_finite_fields(&self) -> Vec<String> {
        self.rating.and_then(|r| non_finite("rating", r)).into_iter().collect()
    }
}

/// Something that happened during a match.
///
/// `kind` is one of goal|card|var|sub|shot|offside|ht|ft and `team` is
/// home|away, but neither set is enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchEvent {
    pub minute: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub team: Option<String>,
    pub player: Option<String>,
    pub assist: Option<String>,
    pub detail: Option<String>,
}

impl MatchEvent {
    pub fn new(minute: i64, kind: &str) -> Self {
        MatchEvent {
            minute,
            kind: kind.to_string(),
            team: None,
            player: None,
            assist: None,
            detail: None,
        }
    }

    pub fn by(mut self, team: &str, player: &str) -> Self {
        self.team = Some(team.to_string());
        self.player = Some(player.to_string());
        self
    }

    pub fn assist(mut self, assist: &str) -> Self {
        self.assist = Some(assist.to_string());
        self
    }

    pub fn detail(mut self, detail: &str) -> Self {
        self.detail = Some(detail.to_string());
        self
    }
}

pub static MATCH_EVENT_SCHEMA: Schema = Schema {
    entity: "MatchEvent",
    fields: &[
        FieldRule::required("minute", FieldKind::Integer).with(Constraint::Min(0)),
        FieldRule::required("type", FieldKind::Text),
        FieldRule::optional("team", FieldKind::Text),
        FieldRule::optional("player", FieldKind::Text),
        FieldRule::optional("assist", FieldKind::Text),
        FieldRule::optional("detail", FieldKind::Text),
    ],
};

impl Validated for MatchEvent {
    const SCHEMA: &'static Schema = &MATCH_EVENT_SCHEMA;
}

/// A fixture with embedded teams; `status` is NS|LIVE|HT|FT|POSTPONED (unenforced)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub league: String,
    pub status: String,
    pub start_time: DateTime<Utc>,
    pub home_team: Team,
    pub away_team: Team,
    #[serde(default)]
    pub home_score: i64,
    #[serde(default)]
    pub away_score: i64,
    /// Chronological by convention
    #[serde(default)]
    pub events: Vec<MatchEvent>,
    /// [home%, draw%, away%]
    pub win_probability: Option<Vec<f64>>,
}

pub static MATCH_SCHEMA: Schema = Schema {
    entity: "Match",
    fields: &[
        FieldRule::required("league", FieldKind::Text),
        FieldRule::required("status", FieldKind::Text),
        FieldRule::required("start_time", FieldKind::Timestamp),
        FieldRule::required("home_team", FieldKind::Object(&TEAM_SCHEMA)),
        FieldRule::required("away_team", FieldKind::Object(&TEAM_SCHEMA)),
        FieldRule::optional("home_score", FieldKind::Integer),
        FieldRule::optional("away_score", FieldKind::Integer),
        FieldRule::optional("events", FieldKind::ObjectList(&MATCH_EVENT_SCHEMA)),
        FieldRule::optional("win_probability", FieldKind::NumberList).with(Constraint::Len(3)),
    ],
};

impl Validated for Match {
    const SCHEMA: &'static Schema = &MATCH_SCHEMA;

    fn non_finite_fields(&self) -> Vec<String> {
        self.win_probability
            .iter()
            .flatten()
            .enumerate()
            .filter_map(|(i, p)| non_finite(&format!("win_probability[{i}]"), *p))
            .collect()
    }
}

/// League table row. `gd` and `points` are stored as given, not derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingRow {
    pub team: Team,
    pub played: i64,
    pub won: i64,
    pub draw: i64,
    pub lost: i64,
    pub gf: i64,
    pub ga: i64,
    pub gd: i64,
    pub points: i64,
}

pub static STANDING_ROW_SCHEMA: Schema = Schema {
    entity: "StandingRow",
    fields: &[
        FieldRule::required("team", FieldKind::Object(&TEAM_SCHEMA)),
        FieldRule::required("played", FieldKind::Integer),
        FieldRule::required("won", FieldKind::Integer),
        FieldRule::required("draw", FieldKind::Integer),
        FieldRule::required("lost", FieldKind::Integer),
        FieldRule::required("gf", FieldKind::Integer),
        FieldRule::required("ga", FieldKind::Integer),
        FieldRule::required("gd", FieldKind::Integer),
        FieldRule::required("points", FieldKind::Integer),
    ],
};

impl Validated for StandingRow {
    const SCHEMA: &'static Schema = &STANDING_ROW_SCHEMA;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub match_id: String,
    pub home_win: f64,
    pub draw: f64,
    pub away_win: f64,
    pub suggested_bets: Option<Vec<String>>,
}

pub static PREDICTION_SCHEMA: Schema = Schema {
    entity: "Prediction",
    fields: &[
        FieldRule::required("match_id", FieldKind::Text),
        FieldRule::required("home_win", FieldKind::Number),
        FieldRule::required("draw", FieldKind::Number),
        FieldRule::required("away_win", FieldKind::Number),
        FieldRule::optional("suggested_bets", FieldKind::TextList),
    ],
};

impl Validated for Prediction {
    const SCHEMA: &'static Schema = &PREDICTION_SCHEMA;

    fn non_finite_fields(&self) -> Vec<String> {
        [("home_win", self.home_win), ("draw", self.draw), ("away_win", self.away_win)]
            .into_iter()
            .filter_map(|(field, value)| non_finite(field, value))
            .collect()
    }
}
