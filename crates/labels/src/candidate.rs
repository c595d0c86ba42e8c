//! Label candidates and their processing order

/// Placement class of a label
///
/// Primary labels (parcel areas) are placed before any secondary label (edge
/// dimensions) so they are never crowded out of a clear slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityClass {
    Primary,
    Secondary,
}

/// Text waiting for a screen position
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LabelCandidate<G> {
    /// Id the host keys its rendering on; stable across passes
    pub id: String,
    /// Geographic anchor
    pub anchor: G,
    pub text: String,
    pub priority: PriorityClass,
}

impl<G> LabelCandidate<G> {
    /// Create a new candidate
    pub fn new(
        id: impl Into<String>,
        anchor: G,
        text: impl Into<String>,
        priority: PriorityClass,
    ) -> Self {
        Self {
            id: id.into(),
            anchor,
            text: text.into(),
            priority,
        }
    }

    /// Create a primary (area) candidate
    pub fn primary(id: impl Into<String>, anchor: G, text: impl Into<String>) -> Self {
        Self::new(id, anchor, text, PriorityClass::Primary)
    }

    /// Create a secondary (dimension) candidate
    pub fn secondary(id: impl Into<String>, anchor: G, text: impl Into<String>) -> Self {
        Self::new(id, anchor, text, PriorityClass::Secondary)
    }
}

/// Check that no primary candidate follows a secondary one
pub fn is_priority_ordered<G>(candidates: &[LabelCandidate<G>]) -> bool {
    !candidates.windows(2).any(|w| {
        w[0].priority == PriorityClass::Secondary && w[1].priority == PriorityClass::Primary
    })
}

/// Move every primary candidate ahead of every secondary one
///
/// Stable within each class.
pub fn order_candidates<G>(candidates: Vec<LabelCandidate<G>>) -> Vec<LabelCandidate<G>> {
    let (mut ordered, secondary): (Vec<_>, Vec<_>) = candidates
        .into_iter()
        .partition(|c| c.priority == PriorityClass::Primary);
    ordered.extend(secondary);
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids<G>(candidates: &[LabelCandidate<G>]) -> Vec<&str> {
        candidates.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn test_order_candidates_is_stable() {
        let candidates = vec![
            LabelCandidate::secondary("a/edge/0", (), "1k"),
            LabelCandidate::primary("a/area", (), "1 Kanal"),
            LabelCandidate::secondary("a/edge/1", (), "2k"),
            LabelCandidate::primary("b/area", (), "2 Kanal"),
        ];
        assert!(!is_priority_ordered(&candidates));

        let ordered = order_candidates(candidates);
        assert_eq!(ids(&ordered), ["a/area", "b/area", "a/edge/0", "a/edge/1"]);
        assert!(is_priority_ordered(&ordered));
    }

    #[test]
    fn test_empty_and_single_are_ordered() {
        assert!(is_priority_ordered::<()>(&[]));
        assert!(is_priority_ordered(&[LabelCandidate::secondary("x", (), "1ft")]));
    }
}
