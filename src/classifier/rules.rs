//! Built-in app tables and window-title keyword lists.

/// Apps that are almost always used for work.
pub const PRODUCTIVE_APPS: &[&str] = &[
    "code",
    "vscode",
    "visual studio code",
    "pycharm",
    "intellij",
    "sublime_text",
    "atom",
    "vim",
    "neovim",
    "emacs",
    "terminal",
    "powershell",
    "cmd",
    "windowsterminal",
    "word",
    "excel",
    "powerpoint",
    "notion",
    "obsidian",
    "figma",
    "sketch",
    "photoshop",
    "illustrator",
    "slack",
    "teams",
    "zoom",
    "postman",
    "insomnia",
    "datagrip",
    "dbeaver",
];

/// Apps that are usually leisure.
pub const UNPRODUCTIVE_APPS: &[&str] = &[
    "spotify",
    "netflix",
    "youtube",
    "discord",
    "steam",
    "epicgameslauncher",
    "battle.net",
    "twitter",
    "facebook",
    "instagram",
    "tiktok",
    "reddit",
];

/// Apps whose meaning depends on what is on screen.
pub const NEUTRAL_APPS: &[&str] = &[
    "explorer",
    "finder",
    "settings",
    "systempreferences",
    "chrome",
    "firefox",
    "edge",
    "safari",
    "brave",
];

/// Substrings of a lowercase app name that mark a browser.
pub const BROWSER_MARKERS: &[&str] = &["chrome", "firefox"];

/// Substrings of a lowercase app name that mark a code editor or IDE.
pub const EDITOR_MARKERS: &[&str] = &["code", "studio", "pycharm", "intellij"];

pub const PRODUCTIVE_KEYWORDS: &[&str] = &[
    "github",
    "gitlab",
    "stackoverflow",
    "documentation",
    "api",
    "docs",
    "tutorial",
    "learning",
    "course",
    "jira",
    "trello",
    "asana",
    "linear",
    "notion",
    "pull request",
    "merge",
    "commit",
    "branch",
    ".py",
    ".js",
    ".ts",
    ".java",
    ".go",
    ".rs",
];

pub const DISTRACTION_KEYWORDS: &[&str] = &[
    "youtube",
    "netflix",
    "twitch",
    "reddit",
    "twitter",
    "facebook",
    "instagram",
    "tiktok",
    "game",
    "play",
    "watch",
    "stream",
    "meme",
    "funny",
    "viral",
    "trending",
];

/// Where an app falls before any duration or title is considered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCategory {
    CustomProductive,
    CustomUnproductive,
    Productive,
    Unproductive,
    Browser,
    Unknown,
}

impl AppCategory {
    pub fn counts_as_productive(&self) -> bool {
        matches!(self, AppCategory::CustomProductive | AppCategory::Productive)
    }

    pub fn counts_as_unproductive(&self) -> bool {
        matches!(
            self,
            AppCategory::CustomUnproductive | AppCategory::Unproductive
        )
    }
}

pub fn is_builtin_productive(app_lower: &str) -> bool {
    PRODUCTIVE_APPS.contains(&app_lower)
}

pub fn is_builtin_unproductive(app_lower: &str) -> bool {
    UNPRODUCTIVE_APPS.contains(&app_lower)
}

pub fn is_browser_or_neutral(app_lower: &str) -> bool {
    NEUTRAL_APPS.contains(&app_lower)
        || BROWSER_MARKERS.iter().any(|marker| app_lower.contains(marker))
}

pub fn is_code_editor(app_lower: &str) -> bool {
    EDITOR_MARKERS.iter().any(|marker| app_lower.contains(marker))
}
