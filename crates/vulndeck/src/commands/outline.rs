use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;

use crate::config::Config;
use crate::deck::{Block, Deck, DeckSource, Slide};

pub fn run(deck: Option<PathBuf>) -> Result<()> {
    let config = Config::load_or_default();
    let source = DeckSource::from_option(deck.or_else(|| config.deck().map(PathBuf::from)));
    let deck = source.load()?;
    print!("{}", render(&deck, &source));
    Ok(())
}

/// Text outline of a deck, one entry per slide.
fn render(deck: &Deck, source: &DeckSource) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} {}\n\n",
        deck.title.bold(),
        format!("({}, {} slides)", source.describe(), deck.len()).dimmed()
    ));

    let width = deck.len().to_string().len();
    for (i, slide) in deck.slides.iter().enumerate() {
        out.push_str(&format!(
            "{:>width$}. {}  {}\n",
            i + 1,
            slide.title.bold(),
            format!("[{}/{}]", slide.layout.name(), slide.theme.name()).dimmed(),
        ));
        if let Some(subtitle) = slide.subtitle.as_deref() {
            out.push_str(&format!("{:width$}  {}\n", "", subtitle.yellow()));
        }
        let summary = summarize(slide);
        if !summary.is_empty() {
            out.push_str(&format!("{:width$}  {}\n", "", summary.dimmed()));
        }
    }
    out
}

fn summarize(slide: &Slide) -> String {
    slide
        .content
        .iter()
        .map(block_label)
        .collect::<Vec<_>>()
        .join(", ")
}

fn block_label(block: &Block) -> String {
    match block {
        Block::Paragraph { .. } => "paragraph".to_string(),
        Block::List { items } => format!("list ({})", items.len()),
        Block::FeatureList { items } => format!("features ({})", items.len()),
        Block::Callout { title, .. } => format!("callout \"{title}\""),
        Block::Cards { cards, .. } => format!("cards ({})", cards.len()),
        Block::Equation { terms } => format!("equation ({} terms)", terms.len()),
        Block::Tags { items } => format!("tags ({})", items.len()),
        Block::Composition { parts, .. } => format!("composition ({} parts)", parts.len()),
        Block::Rule => "rule".to_string(),
        Block::Scanner => "scanner".to_string(),
        Block::Chart { panels } => format!("chart ({} panels)", panels.len()),
        Block::Restart { .. } => "restart".to_string(),
    }
}
