mod validate;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const BUILTIN_DECK: &str = include_str!("builtin.yaml");

/// Where a deck was loaded from. Kept around so a restart can reload it.
#[derive(Debug, Clone, PartialEq)]
pub enum DeckSource {
    Builtin,
    File(PathBuf),
}

impl DeckSource {
    pub fn from_option(path: Option<PathBuf>) -> Self {
        match path {
            Some(p) => Self::File(p),
            None => Self::Builtin,
        }
    }

    pub fn load(&self) -> Result<Deck> {
        match self {
            Self::Builtin => Deck::builtin(),
            Self::File(path) => Deck::load_from(path),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Builtin => "built-in deck".to_string(),
            Self::File(path) => path.display().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deck {
    pub title: String,
    pub slides: Vec<Slide>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slide {
    pub id: u32,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub theme: SlideTheme,
    pub layout: SlideLayout,
    #[serde(default)]
    pub content: Vec<Block>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SlideTheme {
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SlideLayout {
    Center,
    Split,
    Full,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Block {
    Paragraph {
        text: String,
        #[serde(default)]
        style: TextStyle,
        /// Leading term drawn in the accent color before `text`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        highlight: Option<String>,
    },
    List {
        items: Vec<String>,
    },
    FeatureList {
        items: Vec<Feature>,
    },
    Callout {
        title: String,
        tone: Tone,
        items: Vec<String>,
    },
    Cards {
        #[serde(default = "default_columns")]
        columns: usize,
        cards: Vec<Card>,
    },
    Equation {
        terms: Vec<Card>,
    },
    Tags {
        items: Vec<String>,
    },
    Composition {
        parts: Vec<CompositionPart>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
    },
    Rule,
    Scanner,
    Chart {
        panels: Vec<ChartPanel>,
    },
    Restart {
        label: String,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextStyle {
    #[default]
    Body,
    Lead,
    Muted,
    Caption,
    Quote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tone {
    Positive,
    Negative,
    Neutral,
}

/// Small glyph drawn next to list rows and card headers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Icon {
    #[default]
    Dot,
    Code,
    Server,
    Shield,
    Globe,
    Activity,
    Terminal,
    Search,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub icon: Icon,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub heading: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositionPart {
    pub label: String,
    /// Share of the application, in percent.
    pub share: u8,
    #[serde(default)]
    pub vulnerable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartPanel {
    pub title: String,
    #[serde(default)]
    pub icon: Icon,
    pub bars: Vec<ChartBar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartBar {
    pub label: String,
    /// Bar length in percent (0..=100).
    pub value: u8,
    pub favorable: bool,
}

fn default_columns() -> usize {
    2
}

impl Deck {
    /// The deck compiled into the binary.
    pub fn builtin() -> Result<Self> {
        Self::from_yaml(BUILTIN_DECK).context("Built-in deck is invalid")
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read deck {}", path.display()))?;
        Self::from_yaml(&contents).with_context(|| format!("Invalid deck {}", path.display()))
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        let deck: Deck = serde_yaml::from_str(contents)?;
        deck.validate()?;
        Ok(deck)
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn slide(&self, index: usize) -> Option<&Slide> {
        self.slides.get(index)
    }

    fn validate(&self) -> Result<()> {
        if self.slides.is_empty() {
            anyhow::bail!("Deck has no slides");
        }

        let mut seen = HashSet::new();
        for slide in &self.slides {
            if !seen.insert(slide.id) {
                anyhow::bail!("Duplicate slide id {}", slide.id);
            }
            validate::slide(slide)?;
        }
        Ok(())
    }
}

impl Slide {
    /// Whether any block on this slide animates on its own and needs repaints.
    pub fn is_animated(&self) -> bool {
        self.content
            .iter()
            .any(|b| matches!(b, Block::Scanner | Block::Chart { .. }))
    }
}

impl SlideTheme {
    pub fn name(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl SlideLayout {
    pub fn name(self) -> &'static str {
        match self {
            Self::Center => "center",
            Self::Split => "split",
            Self::Full => "full",
        }
    }
}
