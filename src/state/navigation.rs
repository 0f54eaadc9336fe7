//! Floating navigation menu state

use serde::Serialize;

/// A single entry in the floating menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub label: &'static str,
    pub icon: &'static str,
    pub href: &'static str,
}

/// Titled group of menu entries
#[derive(Debug, Clone, Copy, Serialize)]
pub struct NavGroup {
    pub title: &'static str,
    pub items: &'static [NavItem],
}

/// Static contents of the expanded menu
#[derive(Debug, Clone, Copy, Serialize)]
pub struct NavMenuContent {
    pub brand: &'static str,
    pub tagline: &'static str,
    pub story: &'static str,
    pub current_drop: &'static str,
    pub current_drop_blurb: &'static str,
    pub links: &'static [NavItem],
    pub groups: &'static [NavGroup],
}

const LINKS: &[NavItem] = &[
    NavItem {
        label: "About",
        icon: "info",
        href: "#story",
    },
    NavItem {
        label: "Shop",
        icon: "shopping-bag",
        href: "#lookbook",
    },
    NavItem {
        label: "Instagram",
        icon: "instagram",
        href: "#",
    },
];

const ACCOUNT: &[NavItem] = &[
    NavItem {
        label: "Login",
        icon: "log-in",
        href: "#",
    },
    NavItem {
        label: "Sign Up",
        icon: "user-plus",
        href: "#signup",
    },
];

const CATEGORIES: &[NavItem] = &[
    NavItem {
        label: "Fashion",
        icon: "shirt",
        href: "#",
    },
    NavItem {
        label: "Art",
        icon: "palette",
        href: "#",
    },
    NavItem {
        label: "Design",
        icon: "lightbulb",
        href: "#",
    },
    NavItem {
        label: "Music",
        icon: "music",
        href: "#",
    },
    NavItem {
        label: "Lifestyle",
        icon: "shopping-bag",
        href: "#",
    },
];

static MENU: NavMenuContent = NavMenuContent {
    brand: "FreeFall",
    tagline: "Fall Free or Don't Fall At All",
    story: "Born from the creative energy of Accra's streets, FreeFall elevates Ghanaian \
            identity through exclusive, collectible streetwear that blends traditional \
            symbolism with contemporary design.",
    current_drop: "FIGURE OF ART: BLACK GOLD",
    current_drop_blurb: "Inspired by Ghana's cultural wealth and creative energy.",
    links: LINKS,
    groups: &[
        NavGroup {
            title: "SECTION",
            items: ACCOUNT,
        },
        NavGroup {
            title: "Categories",
            items: CATEGORIES,
        },
    ],
};

/// Expanded/collapsed state of the floating menu
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NavMenu {
    expanded: bool,
}

impl NavMenu {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the menu open or closed, returning the new state
    pub fn toggle(&mut self) -> bool {
        self.expanded = !self.expanded;
        self.expanded
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Icon on the toggle button
    pub fn toggle_icon(&self) -> &'static str {
        if self.expanded { "x" } else { "menu" }
    }

    pub fn menu() -> &'static NavMenuContent {
        &MENU
    }
}
