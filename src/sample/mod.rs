use chrono::{DateTime, Duration, Utc};

use crate::models::{Match, MatchEvent, Prediction, StandingRow, Team};

pub const DEFAULT_LEAGUE: &str = "La Liga";

/// Minutes played in the sample match at the moment it is generated
const SAMPLE_MATCH_MINUTE: i64 = 60;

fn barcelona() -> Team {
    Team::new("Barcelona", "BAR", "#A50044", "#004D98")
}

fn real_madrid() -> Team {
    Team::new("Real Madrid", "RMA", "#FEBE10", "#FFFFFF")
}

fn atletico() -> Team {
    Team::new("Atletico", "ATM", "#C72B2B", "#0E1E2F")
}

/// El Clásico, 60 minutes in as of `now`.
pub fn sample_match(now: DateTime<Utc>) -> Match {
    let events = vec![
        MatchEvent::new(12, "goal").by("home", "Lewandowski").assist("Pedri"),
        MatchEvent::new(33, "card").by("away", "Rüdiger").detail("Yellow"),
        MatchEvent::new(45, "ht"),
        MatchEvent::new(57, "goal").by("away", "Vinícius Jr").assist("Bellingham"),
        MatchEvent::new(78, "goal").by("home", "Gündoğan"),
    ];

    Match {
        league: DEFAULT_LEAGUE.to_string(),
        status: "LIVE".to_string(),
        start_time: now - Duration::minutes(SAMPLE_MATCH_MINUTE),
        home_team: barcelona(),
        away_team: real_madrid(),
        home_score: 2,
        away_score: 1,
        events,
        win_probability: Some(vec![58.0, 22.0, 20.0]),
    }
}

fn row(team: Team, [played, won, draw, lost, gf, ga, gd, points]: [i64; 8]) -> StandingRow {
    StandingRow {
        team,
        played,
        won,
        draw,
        lost,
        gf,
        ga,
        gd,
        points,
    }
}

/// Top of the table, in rank order
pub fn sample_standings() -> Vec<StandingRow> {
    vec![
        row(barcelona(), [28, 19, 6, 3, 59, 22, 37, 63]),
        row(real_madrid(), [28, 18, 7, 3, 55, 24, 31, 61]),
        row(atletico(), [28, 17, 6, 5, 49, 28, 21, 57]),
    ]
}

pub fn sample_predictions() -> Vec<Prediction> {
    vec![Prediction {
        match_id: "bar-rma-001".to_string(),
        home_win: 0.58,
        draw: 0.22,
        away_win: 0.20,
        suggested_bets: Some(vec!["Home Win".to_string(), "Over 2.5".to_string()]),
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{validate_all, Validated};
    use chrono::TimeZone;

    #[test]
    fn sample_outputs_pass_validation() {
        let now = Utc::now();
        assert!(sample_match(now).validate().is_ok());
        assert!(validate_all(&sample_standings()).is_ok());
        assert!(validate_all(&sample_predictions()).is_ok());
    }

    #[test]
    fn start_time_is_sixty_minutes_before_now() {
        let fixed = Utc.with_ymd_and_hms(2024, 3, 1, 21, 0, 0).unwrap();
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 20, 0, 0).unwrap();
        assert_eq!(sample_match(fixed).start_time, expected);

        // sub-second precision is kept
        let early = Utc.timestamp_opt(1_700_000_100, 123_456_789).unwrap();
        assert_eq!(early - sample_match(early).start_time, Duration::minutes(60));

        let now = Utc::now();
        assert_eq!(sample_match(now).start_time, now - Duration::minutes(60));
    }

    #[test]
    fn sample_match_events_are_fixed_and_ordered() {
        let m = sample_match(Utc::now());
        let minutes: Vec<i64> = m.events.iter().map(|e| e.minute).collect();
        assert_eq!(minutes, vec![12, 33, 45, 57, 78]);
        assert!(minutes.windows(2).all(|w| w[0] <= w[1]));

        let kinds: Vec<&str> = m.events.iter().map(|e| e.kind.as_str()).collect();
        assert_eq!(kinds, vec!["goal", "card", "ht", "goal", "goal"]);
        assert_eq!(m.events[1].detail.as_deref(), Some("Yellow"));
        assert_eq!(m.events[2].team, None);
    }

    #[test]
    fn sample_match_score_matches_goal_events() {
        let m = sample_match(Utc::now());
        let goals = |side: &str| {
            m.events
                .iter()
                .filter(|e| e.kind == "goal" && e.team.as_deref() == Some(side))
                .count() as i64
        };
        assert_eq!((m.home_score, m.away_score), (2, 1));
        assert_eq!(goals("home"), m.home_score);
        assert_eq!(goals("away"), m.away_score);
    }

    #[test]
    fn sample_match_win_probability_has_three_entries() {
        let m = sample_match(Utc::now());
        assert_eq!(m.win_probability, Some(vec![58.0, 22.0, 20.0]));
        assert_eq!(m.home_team.short_name.as_deref(), Some("BAR"));
        assert_eq!(m.away_team.short_name.as_deref(), Some("RMA"));
    }

    #[test]
    fn standings_have_three_valid_rows() {
        let table = sample_standings();
        assert_eq!(table.len(), 3);
        for r in &table {
            assert!(r.team.validate().is_ok());
        }
        let names: Vec<&str> = table.iter().map(|r| r.team.name.as_str()).collect();
        assert_eq!(names, vec!["Barcelona", "Real Madrid", "Atletico"]);
        assert_eq!(table[2].points, 57);
    }

    #[test]
    fn single_prediction() {
        let preds = sample_predictions();
        assert_eq!(preds.len(), 1);
        assert_eq!(preds[0].match_id, "bar-rma-001");
        assert_eq!(preds[0].suggested_bets.as_ref().map(Vec::len), Some(2));
    }
}
