//! Built-in skill registry.

use super::router::DispatchMode;
use super::types::{ExecutionRequest, SkillDescriptor, SkillKind};

const ECHO_PLUS: SkillDescriptor = SkillDescriptor {
    id: "echo-plus",
    name: "Echo+",
    description: "Retourne le texte selon le style demandé.",
    tags: &["echo", "style"],
    examples: &["bonjour", "hello"],
    kind: SkillKind::StyleTransform,
};

const LLM_PROXY: SkillDescriptor = SkillDescriptor {
    id: "llm-proxy",
    name: "LLM",
    description: "Proxy vers le modèle GPT/Claude via OpenAI API.",
    tags: &["llm"],
    examples: &["bonjour"],
    kind: SkillKind::Completion,
};

const DOC_SUMMARY: SkillDescriptor = SkillDescriptor {
    id: "doc-summary",
    name: "Analyse de documents",
    description: "Télécharge un PDF/URL et renvoie un résumé.",
    tags: &["summary"],
    examples: &["https://example.com/doc.pdf"],
    kind: SkillKind::Summarization,
};

/// Built-in skills in selection order: an explicit style first, then the
/// URL sniff, then completion as the catch-all.
static BUILTIN: [SkillDescriptor; 3] = [ECHO_PLUS, DOC_SUMMARY, LLM_PROXY];

/// Ordered skill registry; the order is the selection policy.
#[derive(Debug, Clone, Copy)]
pub struct SkillRegistry;

impl SkillRegistry {
    /// The skills a deployment mode can reach, in selection order.
    ///
    /// # Example
    /// ```
    /// use skillrelay::skills::{DispatchMode, SkillRegistry};
    ///
    /// let ids: Vec<_> = SkillRegistry::descriptors_for(DispatchMode::Routed)
    ///     .iter()
    ///     .map(|d| d.id)
    ///     .collect();
    /// assert_eq!(ids, vec!["doc-summary", "llm-proxy"]);
    /// ```
    pub fn descriptors_for(mode: DispatchMode) -> Vec<&'static SkillDescriptor> {
        BUILTIN
            .iter()
            .filter(|d| match mode {
                DispatchMode::Styled => d.kind == SkillKind::StyleTransform,
                DispatchMode::Routed => d.kind != SkillKind::StyleTransform,
                DispatchMode::Unified => true,
            })
            .collect()
    }

    /// The first skill under `mode` whose predicate accepts `request`.
    ///
    /// When none accepts, the mode's last skill is its default; only the
    /// styled mode, whose one skill needs no hint to run, reaches it.
    pub fn select(request: &ExecutionRequest, mode: DispatchMode) -> &'static SkillDescriptor {
        let candidates = Self::descriptors_for(mode);
        candidates
            .iter()
            .find(|d| d.applies_to(request))
            .or_else(|| candidates.last())
            .copied()
            .unwrap_or(&BUILTIN[2])
    }
}
