use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Display payload for one island's overlay panel. The body is opaque
/// markup as far as the engine is concerned; presentation belongs to
/// the overlay collaborator.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PanelContent {
    pub title: String,
    pub body_markup: String,
}

/// Immutable id -> panel mapping, populated once at startup.
#[derive(Debug, Clone)]
pub struct ContentStore {
    panels: BTreeMap<String, PanelContent>,
}

impl ContentStore {
    pub fn from_panels(panels: BTreeMap<String, PanelContent>) -> Result<Self> {
        if panels.is_empty() {
            bail!("Content store must hold at least one panel");
        }
        Ok(Self { panels })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)
            .with_context(|| format!("Failed to read content file {}", path.display()))?;
        let panels: BTreeMap<String, PanelContent> = serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse content file {}", path.display()))?;
        Self::from_panels(panels)
    }

    pub fn get(&self, id: &str) -> Option<&PanelContent> {
        self.panels.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.panels.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.panels.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }
}

impl Default for ContentStore {
    fn default() -> Self {
        let mut panels = BTreeMap::new();
        panels.insert(
            "about".to_string(),
            PanelContent {
                title: "About Me".to_string(),
                body_markup: "<p>Creative developer building immersive experiences that blend \
                              technology with thoughtful design, from interactive 3D worlds to \
                              experimental web features.</p>\
                              <div class=\"skills\"><span>Rust</span><span>WebGL</span>\
                              <span>Creative Coding</span></div>"
                    .to_string(),
            },
        );
        panels.insert(
            "projects".to_string(),
            PanelContent {
                title: "Projects".to_string(),
                body_markup: "<p>Experimental and production work.</p>\
                              <div class=\"project-item\"><h3>Underwater Combat Game</h3>\
                              <p>Canvas game with parallax scrolling, enemy AI and particles.</p></div>\
                              <div class=\"project-item\"><h3>3D Portfolio Journey</h3>\
                              <p>This scene: floating islands, shader effects, hidden surprises.</p></div>"
                    .to_string(),
            },
        );
        panels.insert(
            "experience".to_string(),
            PanelContent {
                title: "Experience".to_string(),
                body_markup: "<div class=\"exp-item\"><h3>Creative Developer</h3>\
                              <p class=\"exp-period\">Current</p>\
                              <p>Interactive experiences, 3D visualizations, experimental interfaces.</p></div>\
                              <div class=\"exp-item\"><h3>Full Stack Developer</h3>\
                              <p class=\"exp-period\">Previous</p>\
                              <p>Scalable applications with modern frameworks.</p></div>"
                    .to_string(),
            },
        );
        panels.insert(
            "playground".to_string(),
            PanelContent {
                title: "Playground".to_string(),
                body_markup: "<p>Experimental features and hidden surprises.</p>\
                              <div class=\"feature\"><h3>Konami Code</h3>\
                              <p>Try entering: Up Up Down Down Left Right Left Right B A</p></div>"
                    .to_string(),
            },
        );
        // BTreeMap is never empty here, so the constructor cannot fail.
        Self { panels }
    }
}
