use serde::Serialize;

use crate::classify::Classification;
use crate::config::LayerKey;

/// Suggestion returned when no rule matches.
pub const NO_RECOMMENDATION: &str =
    "No critical combination of conditions at this point.";

/// One recommendation rule: a conjunction of per-layer class equalities.
///
/// A rule referencing a layer absent from the classification (no containing
/// zone at the queried point) simply does not match.
#[derive(Debug, Clone)]
pub struct Rule {
    conditions: &'static [(LayerKey, &'static str)],
    message: &'static str,
}

impl Rule {
    pub const fn new(conditions: &'static [(LayerKey, &'static str)], message: &'static str) -> Self {
        Self { conditions, message }
    }

    fn matches(&self, classification: &Classification) -> bool {
        self.conditions.iter()
            .all(|(key, class)| classification.get(*key) == Some(*class))
    }
}

/// The dashboard's rule list. Order is significant: when several rules'
/// conditions hold at once, only the earliest fires.
pub const DEFAULT_RULES: [Rule; 4] = [
    Rule::new(
        &[(LayerKey::Heat, "Hot"), (LayerKey::Pop, "High")],
        "Dense and hot: prioritize heat mitigation such as cool roofs and shade trees.",
    ),
    Rule::new(
        &[(LayerKey::Air, "High"), (LayerKey::Activity, "High")],
        "Poor air quality in a high-activity corridor: consider a low-emission zone.",
    ),
    Rule::new(
        &[(LayerKey::Flood, "High Risk"), (LayerKey::Pop, "High")],
        "Dense settlement in a flood zone: invest in drainage and absorbent green space.",
    ),
    Rule::new(
        &[(LayerKey::Green, "Low"), (LayerKey::Pop, "High")],
        "Dense and underplanted: add pocket parks and street greening.",
    ),
];

/// First-match-wins evaluation over `rules`; falls back to
/// [`NO_RECOMMENDATION`] when nothing matches.
pub fn recommend(classification: &Classification, rules: &[Rule]) -> &'static str {
    rules.iter()
        .find(|rule| rule.matches(classification))
        .map_or(NO_RECOMMENDATION, |rule| rule.message)
}

/// Everything the rendering collaborator needs for a point-detail popup:
/// the full per-layer classification plus the chosen suggestion.
#[derive(Debug, Clone, Serialize)]
pub struct PointReport {
    pub classification: Classification,
    pub recommendation: &'static str,
}

impl PointReport {
    pub fn new(classification: Classification) -> Self {
        let recommendation = recommend(&classification, &DEFAULT_RULES);
        Self { classification, recommendation }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classification(pairs: &[(LayerKey, &str)]) -> Classification {
        pairs.iter().map(|(k, v)| (*k, v.to_string())).collect()
    }

    #[test]
    fn earlier_rules_shadow_later_ones() {
        // Matches both the heat rule (1) and the flood rule (3).
        let classes = classification(&[
            (LayerKey::Heat, "Hot"),
            (LayerKey::Pop, "High"),
            (LayerKey::Flood, "High Risk"),
        ]);

        let suggestion = recommend(&classes, &DEFAULT_RULES);
        assert!(suggestion.contains("heat mitigation"));
        assert!(!suggestion.contains("drainage"));
    }

    #[test]
    fn each_rule_fires_on_its_own_conditions() {
        let cases = [
            (vec![(LayerKey::Air, "High"), (LayerKey::Activity, "High")], "low-emission"),
            (vec![(LayerKey::Flood, "High Risk"), (LayerKey::Pop, "High")], "drainage"),
            (vec![(LayerKey::Green, "Low"), (LayerKey::Pop, "High")], "pocket parks"),
        ];
        for (pairs, expected) in cases {
            let suggestion = recommend(&classification(&pairs), &DEFAULT_RULES);
            assert!(suggestion.contains(expected), "{pairs:?} -> {suggestion}");
        }
    }

    #[test]
    fn missing_layers_never_match_and_never_panic() {
        // Heat alone is not enough for rule 1; pop is absent.
        let classes = classification(&[(LayerKey::Heat, "Hot")]);
        assert_eq!(recommend(&classes, &DEFAULT_RULES), NO_RECOMMENDATION);
    }

    #[test]
    fn benign_conditions_get_the_default_message() {
        let classes = classification(&[
            (LayerKey::Heat, "Cool"),
            (LayerKey::Pop, "Low"),
            (LayerKey::Green, "High"),
        ]);
        assert_eq!(recommend(&classes, &DEFAULT_RULES), NO_RECOMMENDATION);
    }

    #[test]
    fn report_carries_classification_alongside_the_suggestion() {
        let classes = classification(&[
            (LayerKey::Heat, "Hot"),
            (LayerKey::Pop, "High"),
        ]);
        let report = PointReport::new(classes.clone());
        assert_eq!(report.classification, classes);
        assert!(report.recommendation.contains("heat mitigation"));
    }
}
