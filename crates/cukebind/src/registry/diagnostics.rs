//! Diagnostics-only registry export consumed by external tooling.

use super::StepRegistry;
use serde::Serialize;

#[derive(Serialize)]
struct DumpedStep<'a> {
    keyword: &'static str,
    pattern: &'a str,
    file: &'static str,
    line: u32,
    used: bool,
    duplicate: bool,
}

#[derive(Serialize)]
struct RegistryDump<'a> {
    steps: Vec<DumpedStep<'a>>,
}

pub(super) fn dump(registry: &StepRegistry) -> serde_json::Result<String> {
    let shadowed: Vec<_> = registry
        .duplicate_steps()
        .into_iter()
        .flat_map(|group| group.into_iter().skip(1))
        .collect();
    let steps = registry
        .iter()
        .map(|definition| DumpedStep {
            keyword: definition.keyword().as_str(),
            pattern: definition.pattern().as_str(),
            file: definition.file(),
            line: definition.line(),
            used: definition.is_used(),
            duplicate: shadowed.iter().any(|s| std::ptr::eq(*s, definition)),
        })
        .collect();
    serde_json::to_string(&RegistryDump { steps })
}
