/// A starter prompt offered before anything has been generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Suggestion {
    pub label: &'static str,
    pub prompt: &'static str,
}

pub const SUGGESTIONS: [Suggestion; 6] = [
    Suggestion {
        label: "Dashboard Grid",
        prompt: "Crypto dashboard layout with line charts and transaction list",
    },
    Suggestion {
        label: "Pricing Table",
        prompt: "SaaS pricing table with toggle for monthly/annual billing",
    },
    Suggestion {
        label: "Kanban Board",
        prompt: "Kanban task board with drag-and-drop style columns",
    },
    Suggestion {
        label: "Mega Navbar",
        prompt: "Responsive navbar with mega-menu and dark mode toggle",
    },
    Suggestion {
        label: "Product Card",
        prompt: "E-commerce product card with image gallery and variant selection",
    },
    Suggestion {
        label: "Landing Hero",
        prompt: "Modern landing page hero section with floating elements and CTA",
    },
];

/// Look a suggestion up by its 1-based position or its label, ignoring case.
#[must_use]
pub fn find_suggestion(key: &str) -> Option<&'static Suggestion> {
    let key = key.trim();
    if let Ok(position) = key.parse::<usize>() {
        return position.checked_sub(1).and_then(|index| SUGGESTIONS.get(index));
    }
    SUGGESTIONS
        .iter()
        .find(|suggestion| suggestion.label.eq_ignore_ascii_case(key))
}
