//! Cleanup of raw OCR output from multiple-choice question screenshots.
//!
//! Radio buttons and checkboxes come back from the engine as stray `CD)`,
//! `0 0`, `Cc` and similar fragments, and choice letters get mangled into
//! colons, semicolons or a lowercase `c`. [`normalize`] runs an ordered table
//! of substitutions over the text, then a final line pass.

use std::sync::OnceLock;

use regex::{Regex, RegexBuilder};

/// Where a rule's anchors apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// `^`/`$` match only at the start/end of the whole text.
    Text,
    /// `^`/`$` match at every line boundary.
    Lines,
}

/// A single pattern substitution, applied to every match.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub pattern: &'static str,
    pub replacement: &'static str,
    pub scope: Scope,
}

const fn rule(
    name: &'static str,
    pattern: &'static str,
    replacement: &'static str,
    scope: Scope,
) -> Rule {
    Rule { name, pattern, replacement, scope }
}

use Scope::{Lines, Text};

/// The substitution table. Later rules rely on earlier cleanup; order is significant.
pub const RULES: &[Rule] = &[
    // ── Checkbox / radio-button artifacts ────────────────────────────────────
    rule("checkbox_paren", r"[CDOo0]+\s*\)", "", Text),
    rule("zero_pair_colon", r"0\s+0\s*:", "", Text),
    rule("zero_pair", r"0\s+0\s*", "", Text),
    // ── Choice letter fused with an artifact ─────────────────────────────────
    rule("choice_cc_paren", r"[A-Z]\.\s*Cc\)", "", Text),
    rule("dot_cc_paren", r"\.\s*Cc\)", "", Text),
    rule("lower_c_cc_paren", r"c\.\s*Cc\)", "", Text),
    // ── Known misrecognitions ────────────────────────────────────────────────
    rule("cc_as_choice_c", r"Cc\s+([A-Z])", "C. ${1}", Text),
    rule("colon_as_choice_a", r":\s*([A-Z])", "A. ${1}", Text),
    rule("lower_c_line_start", r"^c\s+", "C. ", Lines),
    rule("lower_c_after_newline", r"\nc\s+", "\nC. ", Text),
    // ── Markers left without content ─────────────────────────────────────────
    rule("lone_c_dot", r"^C\.\s*$", "", Lines),
    rule("lone_c", r"^c\s*$", "", Lines),
    rule("lone_c_dot_line", r"\nC\.\s*\n", "\n", Text),
    rule("lone_c_line", r"\nc\s*\n", "\n", Text),
    // ── Choice prefixes (re-enumerated downstream) ───────────────────────────
    rule("choice_prefix_line_start", r"^[A-Z]\.\s+", "", Lines),
    rule("choice_prefix_after_newline", r"\n[A-Z]\.\s+", "\n", Text),
    rule("cc_prefix_line_start", r"^Cc\.\s+", "", Lines),
    rule("cc_prefix_after_newline", r"\nCc\.\s+", "\n", Text),
    // ── Punctuation-only lines ───────────────────────────────────────────────
    rule("lone_colon", r"^:\s*$", "", Lines),
    rule("lone_semicolon", r"^;\s*$", "", Lines),
    rule("lone_colon_line", r"\n:\s*\n", "\n", Text),
    rule("lone_semicolon_line", r"\n;\s*\n", "\n", Text),
    rule("dot_line_start", r"^\.\s+", "", Lines),
    rule("dot_after_newline", r"\n\.\s+", "\n", Text),
    rule("quote_line_start", r"^'\s+", "", Lines),
    rule("quote_after_newline", r"\n'\s+", "\n", Text),
    // ── Semicolon standing in for choice B ───────────────────────────────────
    rule("semicolon_choice_b_wrapped", r";\s*\n([A-Z])", "\nB. ${1}", Text),
    rule("semicolon_choice_b", r";\s+([A-Z])", "B. ${1}", Text),
    // ── One choice per line ──────────────────────────────────────────────────
    rule("break_before_choice", r"\s+([A-Z]\.\s)", "\n${1}", Text),
    rule("break_before_lower_c", r"\s+(c\s)", "\n${1}", Text),
    // ── Whitespace ───────────────────────────────────────────────────────────
    rule("collapse_spaces", r"[ \t]+", " ", Text),
    rule("collapse_blank_lines", r"\n\s*\n", "\n", Text),
];

/// Single-character lines treated as residue of a checkbox.
const RESIDUAL_ARTIFACTS: [&str; 3] = ["0", "O", "o"];

fn compile(rule: &Rule) -> Regex {
    RegexBuilder::new(rule.pattern)
        .multi_line(rule.scope == Lines)
        .build()
        .expect("invalid normalization rule")
}

fn compiled_rules() -> &'static [Regex] {
    static COMPILED: OnceLock<Vec<Regex>> = OnceLock::new();
    COMPILED.get_or_init(|| RULES.iter().map(compile).collect())
}

/// Apply one rule to `text`.
pub fn apply_rule(rule: &Rule, text: &str) -> String {
    compile(rule).replace_all(text, rule.replacement).into_owned()
}

/// Clean raw OCR text. Pure and deterministic.
pub fn normalize(raw: &str) -> String {
    let text = compiled_rules()
        .iter()
        .zip(RULES)
        .fold(raw.to_string(), |text, (re, rule)| {
            re.replace_all(&text, rule.replacement).into_owned()
        });

    text.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !RESIDUAL_ARTIFACTS.contains(line))
        .collect::<Vec<_>>()
        .join("\n")
}
