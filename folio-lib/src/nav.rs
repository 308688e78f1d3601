/// An in-page navigation anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavLink {
    pub label: &'static str,
    pub href: &'static str,
}

const NAV_LINKS: [NavLink; 4] = [
    NavLink {
        label: "About",
        href: "#about",
    },
    NavLink {
        label: "Education",
        href: "#education",
    },
    NavLink {
        label: "Skills",
        href: "#skills",
    },
    NavLink {
        label: "Contact",
        href: "#contact",
    },
];

/// The fixed set of navigation anchors, in display order
pub fn nav_links() -> &'static [NavLink] {
    &NAV_LINKS
}

/// Open/closed state of the mobile navigation menu
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MenuState {
    open: bool,
}

impl MenuState {
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Flip the menu, as the toggle button does
    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    /// Close the menu; clicking a navigation link does this
    pub fn close(&mut self) {
        self.open = false;
    }
}
