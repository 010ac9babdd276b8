//! Heuristic scoring for when the downstream extractor comes back empty.
//!
//! Each candidate gets a small integer score from keyword and date hints:
//! a family keyword adds `family_bonus`, a recognizable date adds
//! `date_bonus`, and an exclude keyword adds `exclude_penalty`. Anything
//! scoring below zero is dropped.

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;

use super::filter::filter_and_dedup;
use crate::config::{FilteringConfig, RankingConfig};
use crate::models::{CandidateEvent, RawCandidate};
use crate::scrapers::extract::truncate_chars;

/// Date label used when no concrete date can be read.
pub const UNKNOWN_DATE_LABEL: &str = "今週末（詳細未確認）";
/// Audience label for candidates mentioning a family keyword.
pub const FAMILY_AUDIENCE: &str = "子供・家族向け";
/// Audience label for everything else.
pub const GENERAL_AUDIENCE: &str = "一般";
/// Location used when a candidate carries no source or topic.
pub const UNKNOWN_LOCATION: &str = "不明";
/// Maximum description length of a built event, in characters.
pub const MAX_EVENT_DESCRIPTION_CHARS: usize = 80;

/// `1月25日`, `12月3日`
static KANJI_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2})月(\d{1,2})日").unwrap());

/// `1/25`, but not inside a full date like `2025/1/25`.
static SLASH_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[^\d/])(\d{1,2})/(\d{1,2})(?:[^\d/]|$)").unwrap());

/// Find a month/day pair in free text.
fn find_month_day(text: &str) -> Option<(u32, u32)> {
    [&*KANJI_DATE, &*SLASH_DATE].iter().find_map(|re| {
        let caps = re.captures(text)?;
        let month = caps.get(1)?.as_str().parse().ok()?;
        let day = caps.get(2)?.as_str().parse().ok()?;
        Some((month, day))
    })
}

/// Resolve a month/day to the next occurrence on or after `today`.
fn next_occurrence(month: u32, day: u32, today: NaiveDate) -> Option<NaiveDate> {
    let this_year = NaiveDate::from_ymd_opt(today.year(), month, day)?;
    if this_year >= today {
        Some(this_year)
    } else {
        NaiveDate::from_ymd_opt(today.year() + 1, month, day)
    }
}

/// Scores candidates and shapes them into [`CandidateEvent`]s.
#[derive(Debug, Clone, Copy)]
pub struct FallbackRanker<'a> {
    filtering: &'a FilteringConfig,
    ranking: &'a RankingConfig,
    today: NaiveDate,
}

/// A candidate with its score and derived fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub score: i32,
    pub event: CandidateEvent,
}

impl<'a> FallbackRanker<'a> {
    pub fn new(
        filtering: &'a FilteringConfig,
        ranking: &'a RankingConfig,
        today: NaiveDate,
    ) -> Self {
        Self {
            filtering,
            ranking,
            today,
        }
    }

    /// `MM/DD` label for the first date found in `text`.
    pub fn date_label(&self, text: &str) -> String {
        find_month_day(text)
            .and_then(|(m, d)| next_occurrence(m, d, self.today))
            .map(|date| date.format("%m/%d").to_string())
            .unwrap_or_else(|| UNKNOWN_DATE_LABEL.to_string())
    }

    pub fn score(&self, candidate: &RawCandidate) -> ScoredCandidate {
        let text = candidate.match_text();
        let is_family = self.filtering.is_family(&text);

        let mut score: i32 = 0;
        if is_family {
            score = score.saturating_add(self.ranking.family_bonus);
        }
        if find_month_day(&text).is_some() {
            score = score.saturating_add(self.ranking.date_bonus);
        }
        if self.filtering.is_excluded(&text) {
            score = score.saturating_add(self.ranking.exclude_penalty);
        }

        let location = if candidate.query.trim().is_empty() {
            UNKNOWN_LOCATION.to_string()
        } else {
            candidate.query.clone()
        };

        ScoredCandidate {
            score,
            event: CandidateEvent {
                title: candidate.title.clone(),
                date: self.date_label(&text),
                location,
                description: truncate_chars(&candidate.snippet, MAX_EVENT_DESCRIPTION_CHARS),
                target_audience: if is_family {
                    FAMILY_AUDIENCE
                } else {
                    GENERAL_AUDIENCE
                }
                .to_string(),
                url: candidate.link.clone(),
            },
        }
    }

    /// Filter, dedup and rank candidates, best first.
    ///
    /// Equal scores keep their input order.
    pub fn build_events_from_results(
        &self,
        candidates: Vec<RawCandidate>,
        max_events: usize,
    ) -> Vec<CandidateEvent> {
        let mut scored: Vec<ScoredCandidate> = filter_and_dedup(candidates, self.filtering)
            .iter()
            .map(|c| self.score(c))
            .filter(|s| s.score >= 0)
            .collect();

        // sort_by is stable
        scored.sort_by(|a, b| b.score.cmp(&a.score));

        scored
            .into_iter()
            .take(max_events)
            .map(|s| s.event)
            .collect()
    }

    /// Score candidates and keep the non-negative ones in input order.
    pub fn build_fallback_events(
        &self,
        candidates: &[RawCandidate],
        max_events: usize,
    ) -> Vec<CandidateEvent> {
        candidates
            .iter()
            .map(|c| self.score(c))
            .filter(|s| s.score >= 0)
            .take(max_events)
            .map(|s| s.event)
            .collect()
    }
}
