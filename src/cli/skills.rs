//! Skills command handler.

use anyhow::{Context, Result};

use skillrelay::config::Config;
use skillrelay::skills::{DispatchMode, SkillDescriptor, SkillRegistry};

/// Print the descriptors reachable under `mode` (or the configured mode).
pub(crate) fn cmd_skills(mode: Option<DispatchMode>) -> Result<()> {
    let mode = match mode {
        Some(mode) => mode,
        None => {
            Config::load()
                .context("Failed to load configuration")?
                .dispatch
                .mode
        }
    };

    println!("Dispatch mode: {}", mode);
    println!();
    for descriptor in SkillRegistry::descriptors_for(mode) {
        println!("{}", format_descriptor(descriptor));
    }
    Ok(())
}

fn format_descriptor(d: &SkillDescriptor) -> String {
    format!(
        "  {:<12} {:<22} {}\n  {:<12} tags: {}  examples: {}",
        d.id,
        d.name,
        d.description,
        "",
        d.tags.join(", "),
        d.examples.join(" | ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_descriptor() {
        let styled = SkillRegistry::descriptors_for(DispatchMode::Styled);
        let out = format_descriptor(styled[0]);
        assert!(out.contains("echo-plus"));
        assert!(out.contains("tags: echo, style"));
        assert!(out.contains("examples: bonjour | hello"));
    }
}
