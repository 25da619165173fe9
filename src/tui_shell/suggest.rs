use super::CommandDef;

/// Rank a command against the typed prefix: exact hit, then prefix matches
/// (shorter names first), then substring hits.
pub(super) fn score_match(q: &str, candidate: &str) -> i32 {
    let q = q.to_lowercase();
    let c = candidate.to_lowercase();
    if c == q {
        return 100;
    }
    if c.starts_with(&q) {
        return 50 - (c.len() as i32 - q.len() as i32);
    }
    if c.contains(&q) {
        return 10;
    }
    0
}

pub(super) fn suggestions_for(input: &str, defs: &[CommandDef]) -> Vec<CommandDef> {
    let first = input.trim_start().split_whitespace().next().unwrap_or("");
    if first.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<(i32, CommandDef)> = defs
        .iter()
        .map(|def| {
            let best = std::iter::once(def.name)
                .chain(def.aliases.iter().copied())
                .map(|name| score_match(first, name))
                .max()
                .unwrap_or(0);
            (best, def.clone())
        })
        .filter(|(score, _)| *score > 0)
        .collect();

    scored.sort_by(|(sa, a), (sb, b)| sb.cmp(sa).then_with(|| a.name.cmp(b.name)));
    scored.into_iter().map(|(_, def)| def).collect()
}

#[cfg(test)]
#[path = "../tests/tui_shell/suggest_tests.rs"]
mod tests;
