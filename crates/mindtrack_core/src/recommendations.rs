//! crates/mindtrack_core/src/recommendations.rs
//!
//! Static exercise suggestions for each emotional state.

use crate::domain::Emotion;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recommendation {
    pub name: &'static str,
    pub description: &'static str,
    pub image_url: &'static str,
    pub category: &'static str,
}

const STRESS: &[Recommendation] = &[
    Recommendation {
        name: "Child's Pose",
        description: "A resting pose that calms the brain and relieves stress.",
        image_url: "https://images.unsplash.com/photo-1544367563-12123d8965cd?q=80&w=600",
        category: "Yoga",
    },
    Recommendation {
        name: "Box Breathing",
        description: "Inhale 4s, Hold 4s, Exhale 4s, Hold 4s.",
        image_url: "https://images.unsplash.com/photo-1518611012118-696072aa579a?q=80&w=600",
        category: "Breathing",
    },
];

const CALM: &[Recommendation] = &[
    Recommendation {
        name: "Light Stretching",
        description: "Gentle movements to maintain relaxation.",
        image_url: "https://images.unsplash.com/photo-1599901860904-17e6ed7083a0?q=80&w=600",
        category: "Stretching",
    },
    Recommendation {
        name: "Mindful Observation",
        description: "Observe your surroundings without judgment.",
        image_url: "https://images.unsplash.com/photo-1470252649378-9c29740c9fa8?q=80&w=600",
        category: "Mindfulness",
    },
];

const FOCUS: &[Recommendation] = &[
    Recommendation {
        name: "Tree Pose",
        description: "Improves balance and concentration.",
        image_url: "https://images.unsplash.com/photo-1562088287-b903a76b26eb?q=80&w=600",
        category: "Yoga",
    },
    Recommendation {
        name: "Alternate Nostril Breathing",
        description: "Balances left and right brain hemispheres.",
        image_url: "https://images.unsplash.com/photo-1506126613408-eca07ce68773?q=80&w=600",
        category: "Pranayama",
    },
];

pub fn for_emotion(emotion: Emotion) -> &'static [Recommendation] {
    match emotion {
        Emotion::Stress => STRESS,
        Emotion::Calm => CALM,
        Emotion::Focus => FOCUS,
    }
}

/// Looks up suggestions by raw label. Anything that is not an exact label gets the Calm set.
pub fn for_label(label: &str) -> &'static [Recommendation] {
    for_emotion(label.parse().unwrap_or(Emotion::Calm))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_emotion_has_its_own_bucket() {
        assert_eq!(for_label("Stress")[1].name, "Box Breathing");
        assert_eq!(for_label("Focus")[0].name, "Tree Pose");
        assert_eq!(for_label("Calm")[0].category, "Stretching");
    }

    #[test]
    fn unknown_labels_fall_back_to_calm() {
        assert_eq!(for_label("Anger"), for_emotion(Emotion::Calm));
        assert_eq!(for_label("stress"), for_emotion(Emotion::Calm));
        assert_eq!(for_label(""), CALM);
    }
}
