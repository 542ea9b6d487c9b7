//! Observation filtering and per-date grouping.
//!
//! Rows whose score or forward return is undefined are dropped here so that
//! they can never reach a leg average. The forward return is trusted to
//! postdate the score; only its presence is checked.

use std::collections::BTreeMap;

use almeria_traits::{AssetId, Date, Observation, SkipReason};

use crate::config::DuplicatePolicy;
use crate::universe::UniverseFilter;

/// An observation with both fields defined, ready for ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Asset identifier.
    pub asset_id: AssetId,
    /// Signal strength.
    pub score: f64,
    /// Realized forward return.
    pub forward_return: f64,
}

/// All candidates present on one date.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossSection {
    /// Date of the cross-section.
    pub date: Date,
    /// Valid observations on that date, in panel order.
    pub candidates: Vec<Candidate>,
}

/// Result of filtering a panel.
#[derive(Debug, Clone)]
pub struct FilterOutcome {
    /// One entry per date present in the panel, ascending. A date whose rows
    /// were all dropped is kept with no candidates so that it can be reported.
    pub sections: Vec<CrossSection>,
    /// Number of rows discarded for a missing score or forward return.
    pub dropped: usize,
    /// Number of rows outside their date's universe. Always 0 without one.
    pub outside_universe: usize,
}

/// Drop undefined rows and group the rest by date.
pub fn cross_sections(observations: &[Observation]) -> FilterOutcome {
    group_by_date(observations, |_| true)
}

/// Like [`cross_sections`], keeping only the rows that belong to their
/// date's universe.
///
/// `keys` is the universe's ranking column, aligned with `observations`.
/// Membership is decided before the score and return checks, so a
/// high-volume asset with no score still takes a universe slot.
pub fn cross_sections_in_universe(
    observations: &[Observation],
    keys: &[Option<f64>],
    universe: &UniverseFilter,
) -> FilterOutcome {
    let members = universe.members(observations, keys);
    group_by_date(observations, |i| members[i])
}

fn group_by_date(observations: &[Observation], admit: impl Fn(usize) -> bool) -> FilterOutcome {
    let mut by_date: BTreeMap<Date, Vec<Candidate>> = BTreeMap::new();
    let mut dropped = 0;
    let mut outside_universe = 0;

    for (i, obs) in observations.iter().enumerate() {
        let candidates = by_date.entry(obs.date).or_default();
        if !admit(i) {
            outside_universe += 1;
            continue;
        }
        match (obs.score, obs.forward_return) {
            (Some(score), Some(forward_return)) => candidates.push(Candidate {
                asset_id: obs.asset_id.clone(),
                score,
                forward_return,
            }),
            _ => dropped += 1,
        }
    }

    let sections = by_date
        .into_iter()
        .map(|(date, candidates)| CrossSection { date, candidates })
        .collect();

    FilterOutcome {
        sections,
        dropped,
        outside_universe,
    }
}

/// Enforce unique asset ids within a cross-section.
///
/// Under [`DuplicatePolicy::Skip`] the first repeated asset (in id order) is
/// reported and the date is lost. Under [`DuplicatePolicy::Mean`] repeated
/// rows collapse into one whose score and return are the plain means.
pub fn resolve_duplicates(
    section: CrossSection,
    policy: DuplicatePolicy,
) -> Result<CrossSection, SkipReason> {
    let mut grouped: BTreeMap<&str, Vec<&Candidate>> = BTreeMap::new();
    for c in &section.candidates {
        grouped.entry(c.asset_id.as_str()).or_default().push(c);
    }

    if grouped.len() == section.candidates.len() {
        return Ok(section);
    }

    match policy {
        DuplicatePolicy::Skip => {
            let asset = grouped
                .iter()
                .find(|(_, rows)| rows.len() > 1)
                .map(|(asset, _)| (*asset).to_string())
                .unwrap_or_default();
            Err(SkipReason::DuplicateAsset { asset })
        }
        DuplicatePolicy::Mean => {
            let candidates = grouped
                .into_iter()
                .map(|(asset, rows)| {
                    let n = rows.len() as f64;
                    Candidate {
                        asset_id: asset.to_string(),
                        score: rows.iter().map(|c| c.score).sum::<f64>() / n,
                        forward_return: rows.iter().map(|c| c.forward_return).sum::<f64>() / n,
                    }
                })
                .collect();
            Ok(CrossSection {
                date: section.date,
                candidates,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn day(d: u32) -> Date {
        Date::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn obs(d: u32, asset: &str, score: Option<f64>, ret: Option<f64>) -> Observation {
        Observation {
            date: day(d),
            asset_id: asset.to_string(),
            score,
            forward_return: ret,
        }
    }

    fn candidate(asset: &str, score: f64, ret: f64) -> Candidate {
        Candidate {
            asset_id: asset.to_string(),
            score,
            forward_return: ret,
        }
    }

    #[test]
    fn test_cross_sections_groups_by_date_in_order() {
        let observations = vec![
            obs(3, "A", Some(1.0), Some(0.01)),
            obs(2, "A", Some(2.0), Some(0.02)),
            obs(2, "B", Some(3.0), Some(0.03)),
        ];

        let outcome = cross_sections(&observations);
        assert_eq!(outcome.dropped, 0);
        assert_eq!(outcome.sections.len(), 2);
        assert_eq!(outcome.sections[0].date, day(2));
        assert_eq!(outcome.sections[0].candidates.len(), 2);
        assert_eq!(outcome.sections[1].date, day(3));
    }

    #[test]
    fn test_missing_values_are_dropped() {
        let observations = vec![
            obs(2, "A", Some(1.0), Some(0.01)),
            obs(2, "B", None, Some(0.02)),
            obs(2, "C", Some(3.0), None),
        ];

        let outcome = cross_sections(&observations);
        assert_eq!(outcome.dropped, 2);
        assert_eq!(outcome.sections[0].candidates, vec![candidate("A", 1.0, 0.01)]);
    }

    #[test]
    fn test_all_missing_date_is_kept_empty() {
        let observations = vec![obs(2, "A", None, Some(0.01)), obs(2, "B", None, None)];

        let outcome = cross_sections(&observations);
        assert_eq!(outcome.sections.len(), 1);
        assert!(outcome.sections[0].candidates.is_empty());
    }

    #[test]
    fn test_universe_excludes_illiquid_top_score() {
        let observations = vec![
            obs(2, "A", Some(9.0), Some(0.09)),
            obs(2, "B", Some(2.0), Some(0.02)),
            obs(2, "C", None, Some(0.03)),
            obs(2, "D", Some(1.0), Some(0.01)),
            obs(3, "A", Some(9.0), Some(0.09)),
        ];
        let volume = vec![Some(10.0), Some(500.0), Some(900.0), Some(400.0), None];

        let outcome =
            cross_sections_in_universe(&observations, &volume, &UniverseFilter::top("volume", 3));
        // A is the best score but the least traded; C takes a slot with no score
        assert_eq!(outcome.outside_universe, 2);
        assert_eq!(outcome.dropped, 1);
        assert_eq!(
            outcome.sections[0].candidates,
            vec![candidate("B", 2.0, 0.02), candidate("D", 1.0, 0.01)]
        );
        assert_eq!(outcome.sections[1].date, day(3));
        assert!(outcome.sections[1].candidates.is_empty());
    }

    #[test]
    fn test_no_universe_counts_nothing_outside() {
        let observations = vec![obs(2, "A", Some(1.0), Some(0.01))];
        assert_eq!(cross_sections(&observations).outside_universe, 0);
    }

    #[test]
    fn test_duplicates_skip_names_asset() {
        let section = CrossSection {
            date: day(2),
            candidates: vec![
                candidate("B", 1.0, 0.01),
                candidate("A", 2.0, 0.02),
                candidate("B", 3.0, 0.03),
            ],
        };

        let err = resolve_duplicates(section, DuplicatePolicy::Skip).unwrap_err();
        assert_eq!(
            err,
            SkipReason::DuplicateAsset {
                asset: "B".to_string()
            }
        );
    }

    #[test]
    fn test_duplicates_mean_collapses() {
        let section = CrossSection {
            date: day(2),
            candidates: vec![
                candidate("B", 1.0, 0.01),
                candidate("A", 2.0, 0.02),
                candidate("B", 3.0, 0.03),
            ],
        };

        let resolved = resolve_duplicates(section, DuplicatePolicy::Mean).unwrap();
        assert_eq!(resolved.candidates.len(), 2);
        let b = resolved
            .candidates
            .iter()
            .find(|c| c.asset_id == "B")
            .unwrap();
        assert_relative_eq!(b.score, 2.0);
        assert_relative_eq!(b.forward_return, 0.02);
    }

    #[test]
    fn test_unique_section_passes_through() {
        let section = CrossSection {
            date: day(2),
            candidates: vec![candidate("B", 1.0, 0.01), candidate("A", 2.0, 0.02)],
        };

        let resolved = resolve_duplicates(section.clone(), DuplicatePolicy::Skip).unwrap();
        assert_eq!(resolved, section);
    }
}
