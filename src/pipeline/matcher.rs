//! Staff matching: rank directory entries against the backend's free-text
//! department/lab/team guess.
//!
//! Scoring is additive over independent substring signals; zero-score
//! records are dropped. Ties keep directory order.

use serde::{Deserialize, Serialize};

use crate::directory::{StaffDirectory, StaffRecord};
use crate::pipeline::types::RecommendedStaff;

/// Weights per matched field and the number of candidates to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    pub department_weight: u32,
    pub lab_weight: u32,
    pub team_weight: u32,
    pub limit: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            department_weight: 3,
            lab_weight: 2,
            team_weight: 1,
            limit: 5,
        }
    }
}

/// The backend's routing guess.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoutingGuess<'a> {
    pub department: &'a str,
    pub lab: &'a str,
    pub team: &'a str,
}

/// Score one record. A signal fires when the guess is non-empty and is
/// contained in the record's non-empty field (case-sensitive).
pub fn score_record(record: &StaffRecord, guess: &RoutingGuess<'_>, config: &MatchConfig) -> u32 {
    let mut score: u32 = 0;
    if contains(&record.department, guess.department) {
        score = score.saturating_add(config.department_weight);
    }
    if contains(&record.lab, guess.lab) {
        score = score.saturating_add(config.lab_weight);
    }
    if contains(&record.team, guess.team) {
        score = score.saturating_add(config.team_weight);
    }
    score
}

fn contains(field: &str, guess: &str) -> bool {
    !guess.is_empty() && !field.is_empty() && field.contains(guess)
}

/// Top `config.limit` records by descending score.
pub fn find_matching_staff(
    directory: &StaffDirectory,
    guess: &RoutingGuess<'_>,
    config: &MatchConfig,
) -> Vec<RecommendedStaff> {
    let mut candidates: Vec<RecommendedStaff> = directory
        .iter()
        .filter_map(|record| {
            let score = score_record(record, guess, config);
            (score > 0).then(|| RecommendedStaff {
                record: record.clone(),
                match_score: score,
            })
        })
        .collect();

    // Stable sort: equal scores stay in directory order.
    candidates.sort_by(|a, b| b.match_score.cmp(&a.match_score));
    candidates.truncate(config.limit);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(code: &str, department: &str, lab: &str, team: &str) -> StaffRecord {
        StaffRecord {
            code: code.into(),
            name: format!("name-{code}"),
            department: department.into(),
            lab: lab.into(),
            team: team.into(),
            ..Default::default()
        }
    }

    fn directory() -> StaffDirectory {
        StaffDirectory::from_records(vec![
            record("S1", "스킨케어연구소", "보습랩", "1팀"),
            record("S2", "스킨케어연구소", "선케어랩", "2팀"),
            record("M1", "메이크업연구소", "베이스랩", "1팀"),
            record("S3", "스킨케어연구소", "선케어랩", "1팀"),
            record("Q1", "품질연구소", "", ""),
        ])
    }

    fn guess<'a>(department: &'a str, lab: &'a str, team: &'a str) -> RoutingGuess<'a> {
        RoutingGuess {
            department,
            lab,
            team,
        }
    }

    fn codes(matches: &[RecommendedStaff]) -> Vec<&str> {
        matches.iter().map(|m| m.record.code.as_str()).collect()
    }

    #[test]
    fn additive_scoring() {
        let config = MatchConfig::default();
        let r = record("X", "스킨케어연구소", "선케어랩", "1팀");
        assert_eq!(score_record(&r, &guess("스킨케어연구소", "선케어랩", "1팀"), &config), 6);
        assert_eq!(score_record(&r, &guess("스킨케어연구소", "", ""), &config), 3);
        assert_eq!(score_record(&r, &guess("", "선케어", ""), &config), 2);
        assert_eq!(score_record(&r, &guess("", "", "1팀"), &config), 1);
        assert_eq!(score_record(&r, &guess("", "", ""), &config), 0);
    }

    #[test]
    fn containment_is_guess_within_field_and_case_sensitive() {
        let config = MatchConfig::default();
        let r = record("X", "Lab X Research", "", "");
        assert_eq!(score_record(&r, &guess("Lab X", "", ""), &config), 3);
        assert_eq!(score_record(&r, &guess("lab x", "", ""), &config), 0);
        assert_eq!(score_record(&r, &guess("Lab X Research Center", "", ""), &config), 0);
    }

    #[test]
    fn empty_record_field_never_matches() {
        let config = MatchConfig::default();
        let r = record("X", "", "", "");
        assert_eq!(score_record(&r, &guess("a", "b", "c"), &config), 0);
    }

    #[test]
    fn ranks_descending_with_stable_ties() {
        let matches = find_matching_staff(
            &directory(),
            &guess("스킨케어연구소", "선케어랩", "1팀"),
            &MatchConfig::default(),
        );
        assert_eq!(codes(&matches), vec!["S3", "S2", "S1", "M1"]);
        let scores: Vec<u32> = matches.iter().map(|m| m.match_score).collect();
        assert_eq!(scores, vec![6, 5, 4, 1]);
    }

    #[test]
    fn zero_scores_excluded() {
        let matches =
            find_matching_staff(&directory(), &guess("메이크업", "", ""), &MatchConfig::default());
        assert_eq!(codes(&matches), vec!["M1"]);
        assert!(matches.iter().all(|m| m.match_score > 0));
    }

    #[test]
    fn team_only_guess_ties_in_directory_order() {
        let matches =
            find_matching_staff(&directory(), &guess("", "", "1팀"), &MatchConfig::default());
        assert_eq!(codes(&matches), vec!["S1", "M1", "S3"]);
    }

    #[test]
    fn limit_truncates() {
        let config = MatchConfig {
            limit: 2,
            ..Default::default()
        };
        let matches = find_matching_staff(&directory(), &guess("연구소", "", ""), &config);
        assert_eq!(matches.len(), 2);
        assert_eq!(codes(&matches), vec!["S1", "S2"]);
    }

    #[test]
    fn empty_directory_yields_nothing() {
        let matches = find_matching_staff(
            &StaffDirectory::default(),
            &guess("a", "b", "c"),
            &MatchConfig::default(),
        );
        assert!(matches.is_empty());
    }

    #[test]
    fn custom_weights_apply() {
        let config = MatchConfig {
            department_weight: 1,
            lab_weight: 10,
            team_weight: 0,
            limit: 5,
        };
        let matches = find_matching_staff(&directory(), &guess("스킨케어연구소", "보습랩", ""), &config);
        assert_eq!(matches[0].record.code, "S1");
        assert_eq!(matches[0].match_score, 11);
    }

    #[test]
    fn returned_entries_outscore_excluded_ones() {
        let dir = directory();
        let config = MatchConfig {
            limit: 3,
            ..Default::default()
        };
        let g = guess("스킨케어연구소", "선케어랩", "1팀");
        let matches = find_matching_staff(&dir, &g, &config);
        let lowest = matches.last().unwrap().match_score;
        for r in dir.iter() {
            if !matches.iter().any(|m| m.record.code == r.code) {
                assert!(score_record(r, &g, &config) <= lowest);
            }
        }
    }

    #[test]
    fn large_weights_saturate() {
        let dir = directory();
        let config = MatchConfig {
            department_weight: u32::MAX,
            lab_weight: 1,
            ..Default::default()
        };
        let g = guess("스킨케어연구소", "선케어랩", "");
        let matches = find_matching_staff(&dir, &g, &config);
        assert_eq!(matches[0].match_score, u32::MAX);
    }
}
