use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use itertools::Itertools;
use regex::Regex;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::table::value_as_number;

pub type SkillLevel = f64;

/// One `key: value,` entry of a literal mapping. Only numeric values are
/// captured; booleans, `None` and quoted strings match so they can be skipped.
static RELAXED_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"\s*(?:'([^']*)'|"([^"]*)"|([A-Za-z_][A-Za-z0-9_ ]*?))\s*:\s*(?:([-+]?\d+(?:\.\d+)?)|True|False|None|'[^']*'|"[^"]*")\s*(?:,|$)"#,
    )
    .expect("the relaxed skill pattern is a valid regex")
});

/// Skill category name to proficiency level. Absent categories are level 0.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Skills(BTreeMap<String, SkillLevel>);

impl Skills
{
    pub fn new(levels: BTreeMap<String, SkillLevel>) -> Self
    {
        Self(levels)
    }

    pub fn level(&self, category: &str) -> SkillLevel
    {
        self.0.get(category).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &SkillLevel)>
    {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool
    {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, SkillLevel)> for Skills
{
    fn from_iter<I: IntoIterator<Item = (S, SkillLevel)>>(iter: I) -> Self
    {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl fmt::Display for Skills
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(
            f,
            "{}",
            self.0
                .iter()
                .map(|(category, level)| format!("{category}: {level}"))
                .join(", ")
        )
    }
}

/// Outcome of normalizing a skill cell. Which stage succeeded is kept so the
/// fallback path is observable instead of being swallowed.
#[derive(Clone, Debug, PartialEq)]
pub enum ParsedSkills
{
    /// The cell already held a mapping.
    Structured(Skills),
    /// JSON text, single quotes accepted in place of double quotes.
    Strict(Skills),
    /// Literal mapping syntax with bare or single-quoted keys and trailing
    /// commas.
    Relaxed(Skills),
    Empty,
}

impl ParsedSkills
{
    pub fn parse(cell: Option<&Value>) -> Self
    {
        match cell {
            Some(Value::Object(map)) => ParsedSkills::Structured(levels_from_map(map.iter())),
            Some(Value::String(text)) => Self::parse_text(text),
            _ => ParsedSkills::Empty,
        }
    }

    pub fn parse_text(text: &str) -> Self
    {
        if let Some(skills) = parse_strict(text) {
            return ParsedSkills::Strict(skills);
        }
        if let Some(skills) = parse_relaxed(text) {
            return ParsedSkills::Relaxed(skills);
        }
        ParsedSkills::Empty
    }

    pub fn stage(&self) -> &'static str
    {
        match self {
            ParsedSkills::Structured(_) => "structured",
            ParsedSkills::Strict(_) => "strict",
            ParsedSkills::Relaxed(_) => "relaxed",
            ParsedSkills::Empty => "empty",
        }
    }

    pub fn into_skills(self) -> Skills
    {
        match self {
            ParsedSkills::Structured(skills)
            | ParsedSkills::Strict(skills)
            | ParsedSkills::Relaxed(skills) => skills,
            ParsedSkills::Empty => Skills::default(),
        }
    }
}

/// Entries without a numeric level (flags, notes) are not skills and are left
/// out; the rest of the profile is kept.
fn levels_from_map<'a>(entries: impl Iterator<Item = (&'a String, &'a Value)>) -> Skills
{
    entries
        .filter_map(|(category, level)| value_as_number(level).map(|level| (category.clone(), level)))
        .collect()
}

fn parse_strict(text: &str) -> Option<Skills>
{
    let normalized = text.replace('\'', "\"");
    let map: serde_json::Map<String, Value> = serde_json::from_str(&normalized).ok()?;
    Some(levels_from_map(map.iter()))
}

fn parse_relaxed(text: &str) -> Option<Skills>
{
    let body = text.trim().strip_prefix('{')?.strip_suffix('}')?;

    let mut levels = BTreeMap::new();
    let mut consumed = 0;
    for captures in RELAXED_ENTRY.captures_iter(body) {
        let entry = captures.get(0)?;
        if entry.start() != consumed {
            return None;
        }
        consumed = entry.end();

        let Some(level) = captures.get(4) else {
            continue;
        };
        let category = captures
            .get(1)
            .or_else(|| captures.get(2))
            .or_else(|| captures.get(3))?
            .as_str()
            .trim()
            .to_string();
        levels.insert(category, level.as_str().parse::<SkillLevel>().ok()?);
    }
    if !body[consumed..].trim().is_empty() {
        return None;
    }
    Some(Skills(levels))
}
