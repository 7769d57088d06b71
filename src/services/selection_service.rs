use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::catalog::CategoryRule;

/// The in-progress selection a customer builds while walking the wizard.
/// This is an explicit, serializable object handed between steps (or parked
/// server-side under its draft id) instead of ambient session state.
/// Rules and items are keyed by their ids in hex so the draft round-trips
/// as plain JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionDraft {
    pub draft_id: Uuid,
    pub picks: HashMap<String, HashSet<String>>,
}

impl Default for SelectionDraft {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AddOutcome {
    Added,
    AlreadySelected,
    /// The rule is already at `max_choices`; the set was not touched.
    AtMax,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RuleViolation {
    pub rule_id: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionReport {
    pub satisfied: bool,
    pub violations: Vec<RuleViolation>,
}

impl SelectionDraft {
    pub fn new() -> Self {
        SelectionDraft {
            draft_id: Uuid::new_v4(),
            picks: HashMap::new(),
        }
    }

    /// Soft, interactive enforcement: the at-max check happens before any
    /// mutation, under the same &mut borrow, so two rapid toggles can never
    /// both pass a stale count.
    pub fn try_add_item(&mut self, rule: &CategoryRule, item_id: &str) -> AddOutcome {
        let picked = self.picks.entry(rule.rule_id.to_hex()).or_default();

        if picked.contains(item_id) {
            return AddOutcome::AlreadySelected;
        }
        if picked.len() as u32 >= rule.max_choices {
            return AddOutcome::AtMax;
        }

        picked.insert(item_id.to_string());
        AddOutcome::Added
    }

    pub fn remove_item(&mut self, rule: &CategoryRule, item_id: &str) -> bool {
        match self.picks.get_mut(&rule.rule_id.to_hex()) {
            Some(picked) => picked.remove(item_id),
            None => false,
        }
    }

    pub fn count_for(&self, rule: &CategoryRule) -> usize {
        self.picks
            .get(&rule.rule_id.to_hex())
            .map(|p| p.len())
            .unwrap_or(0)
    }
}

pub struct SelectionService;

impl SelectionService {
    /// Hard, submission-time enforcement. Violations come out in rule
    /// declaration order; draft entries that match no rule are violations
    /// too, never silently ignored. Pure and idempotent.
    pub fn validate_selection(rules: &[CategoryRule], draft: &SelectionDraft) -> SelectionReport {
        let mut violations = Vec::new();

        for rule in rules {
            let key = rule.rule_id.to_hex();
            let picked = draft.picks.get(&key);
            let count = picked.map(|p| p.len() as u32).unwrap_or(0);

            if count < rule.min_choices {
                violations.push(RuleViolation {
                    rule_id: key.clone(),
                    reason: format!(
                        "{}: choose at least {} item(s), {} selected",
                        rule.label, rule.min_choices, count
                    ),
                });
            } else if count > rule.max_choices {
                violations.push(RuleViolation {
                    rule_id: key.clone(),
                    reason: format!(
                        "{}: choose at most {} item(s), {} selected",
                        rule.label, rule.max_choices, count
                    ),
                });
            }

            if let (Some(picked), Some(allowed)) = (picked, rule.allowed_items.as_ref()) {
                let allowed: HashSet<String> = allowed.iter().map(|id| id.to_hex()).collect();
                if picked.iter().any(|item| !allowed.contains(item)) {
                    violations.push(RuleViolation {
                        rule_id: key,
                        reason: format!(
                            "{}: selection contains items outside this rule",
                            rule.label
                        ),
                    });
                }
            }
        }

        let known: HashSet<String> = rules.iter().map(|r| r.rule_id.to_hex()).collect();
        let mut unknown: Vec<&String> =
            draft.picks.keys().filter(|k| !known.contains(*k)).collect();
        unknown.sort();
        for key in unknown {
            violations.push(RuleViolation {
                rule_id: key.clone(),
                reason: "Selection references an unknown rule".to_string(),
            });
        }

        SelectionReport {
            satisfied: violations.is_empty(),
            violations,
        }
    }
}
