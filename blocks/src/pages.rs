use serde::{Deserialize, Serialize};

/// A documentation page listed in the site menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentPage {
    /// Menu label, conventionally written as a heading (`# Basics`).
    pub menu_title: String,
    /// Path of the markdown document, relative to the content root.
    #[serde(alias = "content")]
    pub content_reference: String,
}

impl ContentPage {
    pub fn new(menu_title: impl Into<String>, content_reference: impl Into<String>) -> Self {
        ContentPage {
            menu_title: menu_title.into(),
            content_reference: content_reference.into(),
        }
    }

    /// Menu title without its heading marker.
    pub fn title(&self) -> &str {
        self.menu_title.trim_start_matches('#').trim()
    }
}

/// The menu shipped with the site when no configuration is given.
pub fn default_menu() -> Vec<ContentPage> {
    vec![
        ContentPage::new("# Basics", "docs/BASE_EXAMPLES.md"),
        ContentPage::new("# Lists", "docs/LIST_FUNCTIONS_REFERENCE.md"),
        ContentPage::new("# Strings", "docs/STRING_FUNCTIONS_REFERENCE.md"),
        ContentPage::new("# User Types", "docs/USER_TYPES_REFERENCE.md"),
        ContentPage::new("# User Functions", "docs/USER_FUNCTIONS_REFERENCE.md"),
    ]
}
