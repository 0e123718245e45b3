// Static table of product features shown on the landing and features pages.

use serde::Serialize;

/// One navigable product feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeatureDescriptor {
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub path: &'static str,
    pub color: &'static str,
}

pub const FEATURES: &[FeatureDescriptor] = &[
    FeatureDescriptor {
        title: "Calendar",
        description: "Plan and schedule your future tasks",
        icon: "📅",
        path: "/calendar",
        color: "#44dd44",
    },
    FeatureDescriptor {
        title: "Quests",
        description: "Generate AI-powered challenges",
        icon: "⚔️",
        path: "/quests",
        color: "#dd44dd",
    },
    FeatureDescriptor {
        title: "Dailies",
        description: "Complete your daily challenges",
        icon: "📝",
        path: "/dailies",
        color: "#44dddd",
    },
    FeatureDescriptor {
        title: "Todos",
        description: "Manage your personal task list",
        icon: "✅",
        path: "/todos",
        color: "#dddd44",
    },
    FeatureDescriptor {
        title: "Stats",
        description: "Track your progress and growth",
        icon: "📊",
        path: "/stats",
        color: "#dd4444",
    },
    FeatureDescriptor {
        title: "Streaks",
        description: "Monitor your consistency",
        icon: "🔥",
        path: "/streaks",
        color: "#dd7744",
    },
    FeatureDescriptor {
        title: "AI Assistant",
        description: "Chat with your AI companion",
        icon: "💬",
        path: "/assistant",
        color: "#44dd88",
    },
    FeatureDescriptor {
        title: "Avatar",
        description: "Customize your character",
        icon: "👤",
        path: "/avatar",
        color: "#dd44aa",
    },
    FeatureDescriptor {
        title: "Rewards",
        description: "Unlock new items and abilities",
        icon: "🏆",
        path: "/rewards",
        color: "#88dd44",
    },
    FeatureDescriptor {
        title: "Social",
        description: "Connect with other users",
        icon: "🌐",
        path: "/social",
        color: "#4488dd",
    },
    FeatureDescriptor {
        title: "Messages",
        description: "Chat with other users",
        icon: "✉️",
        path: "/messages",
        color: "#dd8844",
    },
    FeatureDescriptor {
        title: "Mini Game",
        description: "Have fun with your XP points",
        icon: "🎮",
        path: "/mini_game",
        color: "#4444dd",
    },
];

/// Find the feature whose route matches `path`.
pub fn find_by_path(path: &str) -> Option<&'static FeatureDescriptor> {
    FEATURES.iter().find(|f| f.path == path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_feature_table_order() {
        let titles: Vec<&str> = FEATURES.iter().map(|f| f.title).collect();
        assert_eq!(
            titles,
            vec![
                "Calendar",
                "Quests",
                "Dailies",
                "Todos",
                "Stats",
                "Streaks",
                "AI Assistant",
                "Avatar",
                "Rewards",
                "Social",
                "Messages",
                "Mini Game",
            ]
        );
    }

    #[test]
    fn test_paths_are_unique_routes() {
        let paths: HashSet<&str> = FEATURES.iter().map(|f| f.path).collect();
        assert_eq!(paths.len(), FEATURES.len());
        assert!(FEATURES.iter().all(|f| f.path.starts_with('/')));
    }

    #[test]
    fn test_colors_are_hex() {
        for f in FEATURES {
            assert_eq!(f.color.len(), 7, "{}", f.title);
            assert!(f.color.starts_with('#'));
            assert!(f.color[1..].chars().all(|c| c.is_ascii_hexdigit()));
        }
    }

    #[test]
    fn test_find_by_path() {
        let f = find_by_path("/assistant").unwrap();
        assert_eq!(f.title, "AI Assistant");
        assert_eq!(f.color, "#44dd88");
        assert!(find_by_path("/dashboard").is_none());
    }

    #[test]
    fn test_serializes_with_plain_field_names() {
        let json = serde_json::to_value(FEATURES[0]).unwrap();
        assert_eq!(json["title"], "Calendar");
        assert_eq!(json["path"], "/calendar");
        assert_eq!(json["color"], "#44dd44");
        assert_eq!(json["icon"], "📅");
    }
}
