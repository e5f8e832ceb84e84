use anyhow::Result;

use super::{Block, Slide};

/// Check a single slide's authoring constraints.
pub fn slide(slide: &Slide) -> Result<()> {
    if slide.title.trim().is_empty() {
        anyhow::bail!("Slide {} has an empty title", slide.id);
    }

    for block in &slide.content {
        match block {
            Block::Chart { panels } => {
                if panels.is_empty() {
                    anyhow::bail!("Slide {}: chart has no panels", slide.id);
                }
                for bar in panels.iter().flat_map(|p| &p.bars) {
                    if bar.value > 100 {
                        anyhow::bail!(
                            "Slide {}: bar '{}' has value {}, must be 0..=100",
                            slide.id,
                            bar.label,
                            bar.value
                        );
                    }
                }
            }
            Block::Composition { parts, .. } => {
                let total: u32 = parts.iter().map(|p| p.share as u32).sum();
                if total > 100 {
                    anyhow::bail!(
                        "Slide {}: composition shares add up to {total}%",
                        slide.id
                    );
                }
            }
            Block::Cards { columns, .. } if *columns == 0 => {
                anyhow::bail!("Slide {}: cards need at least one column", slide.id);
            }
            Block::Equation { terms } if terms.len() < 2 => {
                anyhow::bail!("Slide {}: equation needs at least two terms", slide.id);
            }
            _ => {}
        }
    }
    Ok(())
}
