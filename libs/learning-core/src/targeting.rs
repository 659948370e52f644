//! Targeted practice-question selection with staged fallbacks.
//!
//! Selection walks an ordered list of tier predicates, loosening the
//! criteria at each step. A tier that cannot reach the minimum count
//! escalates automatically; the requested fallback strategy chooses which
//! tier the relaxation starts from, not where it stops.
//!
//! Everything here is pure over the supplied pool. The only randomness is
//! the optional seeded shuffle, so identical inputs always produce
//! identical pools.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::types::{Difficulty, ExamDomain, Question};

/// Fallback strategy requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackStrategy {
    ExpandDomain,
    ReduceSpecificity,
    MixedContent,
}

impl Default for FallbackStrategy {
    fn default() -> Self {
        Self::ExpandDomain
    }
}

/// Selection tier actually used, loosest last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackTier {
    ExactMatch,
    ExpandDomain,
    ReduceSpecificity,
    MixedContent,
}

/// Advice to the caller when a pool came back short or loose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendedFallback {
    ExpandCriteria,
    MixedContent,
    UseSimilarModules,
}

/// Declarative description of the questions a practice session wants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeTargeting {
    pub primary_domain: ExamDomain,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_id: Option<String>,
    #[serde(default)]
    pub target_objectives: Vec<String>,
    #[serde(default)]
    pub required_tags: Vec<String>,
    #[serde(default)]
    pub optional_tags: Vec<String>,
    #[serde(default = "default_min_questions")]
    pub min_questions: usize,
    #[serde(default = "default_ideal_questions")]
    pub ideal_questions: usize,
    #[serde(default)]
    pub fallback_strategy: FallbackStrategy,
}

fn default_min_questions() -> usize {
    5
}

fn default_ideal_questions() -> usize {
    15
}

/// Selected questions plus the metadata a caller needs to present them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionPool {
    pub questions: Vec<Question>,
    pub tier: FallbackTier,
    pub total_count: usize,
    pub domain_distribution: BTreeMap<ExamDomain, usize>,
    pub difficulty_distribution: BTreeMap<Difficulty, usize>,
    pub is_empty: bool,
    pub has_minimum: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommended_fallback: Option<RecommendedFallback>,
}

type TierFilter = fn(&Question, &PracticeTargeting) -> bool;

/// Tier predicates in relaxation order. Adding a tier is one entry here
/// plus its `FallbackTier` variant.
const TIER_FILTERS: &[(FallbackTier, TierFilter)] = &[
    (FallbackTier::ExactMatch, exact_match),
    (FallbackTier::ExpandDomain, domain_only),
    (FallbackTier::ReduceSpecificity, tags_only),
    (FallbackTier::MixedContent, any_question),
];

/// Deterministic selection: same pool and spec, same result, same order.
pub fn select(pool: &[Question], spec: &PracticeTargeting) -> Result<QuestionPool> {
    select_inner(pool, spec, None)
}

/// Selection with a seeded shuffle of the winning tier's candidates before
/// truncation. Deterministic per seed; never reads global entropy.
pub fn select_seeded(pool: &[Question], spec: &PracticeTargeting, seed: u64) -> Result<QuestionPool> {
    select_inner(pool, spec, Some(seed))
}

fn select_inner(
    pool: &[Question],
    spec: &PracticeTargeting,
    seed: Option<u64>,
) -> Result<QuestionPool> {
    if spec.min_questions > spec.ideal_questions {
        return Err(EngineError::TargetingBounds {
            min: spec.min_questions,
            ideal: spec.ideal_questions,
        });
    }

    if pool.is_empty() {
        return Ok(build_pool(Vec::new(), FallbackTier::MixedContent, spec));
    }

    let mut last_resort: Vec<&Question> = Vec::new();
    for (tier, filter) in tier_passes(spec.fallback_strategy) {
        let mut candidates: Vec<&Question> = pool.iter().filter(|q| filter(q, spec)).collect();
        order_candidates(tier, &mut candidates, spec);

        if candidates.len() >= spec.min_questions {
            if let Some(seed) = seed {
                candidates.shuffle(&mut ChaCha8Rng::seed_from_u64(seed));
            }
            candidates.truncate(spec.ideal_questions);
            return Ok(build_pool(candidates, tier, spec));
        }
        last_resort = candidates;
    }

    // Every tier fell short of the minimum; hand back whatever the loosest
    // pass found and let the caller decide.
    if let Some(seed) = seed {
        last_resort.shuffle(&mut ChaCha8Rng::seed_from_u64(seed));
    }
    Ok(build_pool(last_resort, FallbackTier::MixedContent, spec))
}

/// The passes to run: exact match always goes first, then the requested
/// strategy's tier and everything looser than it.
fn tier_passes(strategy: FallbackStrategy) -> impl Iterator<Item = (FallbackTier, TierFilter)> {
    let start = match strategy {
        FallbackStrategy::ExpandDomain => FallbackTier::ExpandDomain,
        FallbackStrategy::ReduceSpecificity => FallbackTier::ReduceSpecificity,
        FallbackStrategy::MixedContent => FallbackTier::MixedContent,
    };
    TIER_FILTERS
        .iter()
        .copied()
        .filter(move |(tier, _)| *tier == FallbackTier::ExactMatch || *tier >= start)
}

fn exact_match(q: &Question, spec: &PracticeTargeting) -> bool {
    q.domain == spec.primary_domain && has_required_tags(q, spec) && objective_matches(q, spec)
}

fn domain_only(q: &Question, spec: &PracticeTargeting) -> bool {
    q.domain == spec.primary_domain
}

fn tags_only(q: &Question, spec: &PracticeTargeting) -> bool {
    if !spec.required_tags.is_empty() {
        has_required_tags(q, spec)
    } else {
        optional_overlap(q, spec) > 0
    }
}

fn any_question(_q: &Question, _spec: &PracticeTargeting) -> bool {
    true
}

fn has_required_tags(q: &Question, spec: &PracticeTargeting) -> bool {
    spec.required_tags.iter().all(|t| q.tags.contains(t))
}

/// Objective targeting only constrains questions that carry objective
/// metadata; untagged bank content stays eligible.
fn objective_matches(q: &Question, spec: &PracticeTargeting) -> bool {
    if spec.target_objectives.is_empty() {
        return true;
    }
    match &q.objective_id {
        Some(objective) => spec.target_objectives.contains(objective),
        None => true,
    }
}

fn optional_overlap(q: &Question, spec: &PracticeTargeting) -> usize {
    q.tags
        .iter()
        .filter(|t| spec.optional_tags.contains(t))
        .count()
}

fn combined_overlap(q: &Question, spec: &PracticeTargeting) -> usize {
    q.tags
        .iter()
        .filter(|t| spec.required_tags.contains(t) || spec.optional_tags.contains(t))
        .count()
}

/// Tier-specific candidate ordering. Sorts are stable, so pool order is
/// the final tiebreak throughout.
fn order_candidates(tier: FallbackTier, candidates: &mut [&Question], spec: &PracticeTargeting) {
    match tier {
        FallbackTier::ExpandDomain => {
            candidates.sort_by_key(|q| optional_overlap(q, spec) == 0);
        }
        FallbackTier::MixedContent => {
            candidates.sort_by_key(|q| {
                (
                    q.domain != spec.primary_domain,
                    Reverse(combined_overlap(q, spec)),
                )
            });
        }
        FallbackTier::ExactMatch | FallbackTier::ReduceSpecificity => {}
    }
}

fn build_pool(candidates: Vec<&Question>, tier: FallbackTier, spec: &PracticeTargeting) -> QuestionPool {
    let questions: Vec<Question> = candidates.into_iter().cloned().collect();

    let mut domain_distribution = BTreeMap::new();
    let mut difficulty_distribution = BTreeMap::new();
    for q in &questions {
        *domain_distribution.entry(q.domain).or_insert(0) += 1;
        *difficulty_distribution.entry(q.difficulty).or_insert(0) += 1;
    }

    let total_count = questions.len();
    let is_empty = total_count == 0;
    let has_minimum = total_count >= spec.min_questions;

    let recommended_fallback = if is_empty {
        Some(RecommendedFallback::MixedContent)
    } else if total_count < spec.ideal_questions {
        Some(RecommendedFallback::ExpandCriteria)
    } else if tier != FallbackTier::ExactMatch {
        Some(RecommendedFallback::UseSimilarModules)
    } else {
        None
    };

    QuestionPool {
        questions,
        tier,
        total_count,
        domain_distribution,
        difficulty_distribution,
        is_empty,
        has_minimum,
        recommended_fallback,
    }
}
