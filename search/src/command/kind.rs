use indexmap::IndexMap;
use regex::Regex;

/// Per-kind options of a command. Dispatch on this everywhere a command's
/// behaviour depends on its type.
#[derive(Debug, Clone)]
pub enum CommandKind {
    Text,
    Number(NumberOptions),
    Set(SetOptions),
    Bitset(BitsetOptions),
    HalfNumber(HalfNumberOptions),
    Pattern(PatternOptions),
    Unrestricted(UnrestrictedOptions),
    Order(OrderOptions),
}

impl CommandKind {
    pub fn name(&self) -> &'static str {
        match self {
            CommandKind::Text => "text",
            CommandKind::Number(_) => "number",
            CommandKind::Set(_) => "set",
            CommandKind::Bitset(_) => "bitset",
            CommandKind::HalfNumber(_) => "half-number",
            CommandKind::Pattern(_) => "pattern",
            CommandKind::Unrestricted(_) => "unrestricted",
            CommandKind::Order(_) => "order",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NumberOptions {
    pub allow_float: bool,
}

#[derive(Debug, Clone, Default)]
pub struct SetOptions {
    /// Short token -> canonical value, keys lowercase
    pub value_map: IndexMap<String, String>,
    /// Repeated values in the stored list count individually
    pub count_duplicates: bool,
    /// Closed vocabulary; `None` accepts any value
    pub values: Option<Vec<String>>,
}

impl SetOptions {
    /// Applies the value map, returning the canonical value.
    pub fn canonical(&self, raw: &str) -> String {
        let lowered = raw.to_lowercase();
        match self.value_map.get(&lowered) {
            Some(mapped) => mapped.clone(),
            None => raw.to_string(),
        }
    }

    pub fn accepts(&self, canonical: &str) -> bool {
        match &self.values {
            Some(values) => values.iter().any(|v| v.eq_ignore_ascii_case(canonical)),
            None => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitsetQuery {
    Mask(u64),
    /// Number of set bits
    Count(u32),
}

/// Widest alphabet a bitset command accepts; popcount queries enumerate
/// every mask up to `2^MAX_BITSET_LETTERS`
pub const MAX_BITSET_LETTERS: usize = 16;

#[derive(Debug, Clone)]
pub struct BitsetOptions {
    /// Alphabet; bit `i` of the stored mask is `values[i]`
    pub values: Vec<char>,
    /// Long word -> letter sequence, keys lowercase
    pub words: IndexMap<String, String>,
}

impl BitsetOptions {
    pub fn new(alphabet: &str) -> Self {
        Self {
            values: alphabet.chars().collect(),
            words: IndexMap::new(),
        }
    }

    pub fn full_mask(&self) -> u64 {
        1u64.checked_shl(self.values.len() as u32)
            .map_or(u64::MAX, |bit| bit - 1)
    }

    fn has_digits(&self) -> bool {
        self.values.iter().any(|c| c.is_ascii_digit())
    }

    /// Encodes a letter sequence into a mask. Letters match case-insensitively.
    pub fn mask(&self, letters: &str) -> Result<u64, String> {
        let mut mask = 0u64;
        for ch in letters.chars() {
            let index = self
                .values
                .iter()
                .position(|v| v.eq_ignore_ascii_case(&ch))
                .ok_or_else(|| {
                    format!(
                        "'{}' is not one of {}",
                        ch,
                        self.values.iter().collect::<String>()
                    )
                })?;
            mask |= 1 << index;
        }
        Ok(mask)
    }

    pub fn letters(&self, mask: u64) -> String {
        self.values
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, c)| *c)
            .collect()
    }

    /// Interprets a query value: a word, a popcount, or a letter sequence.
    /// Digits are only a popcount when the alphabet has no digits of its own.
    pub fn parse(&self, raw: &str) -> Result<BitsetQuery, String> {
        let value = raw.trim();
        if let Some(letters) = self.words.get(&value.to_lowercase()) {
            return self.mask(letters).map(BitsetQuery::Mask);
        }
        if !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()) && !self.has_digits() {
            return value
                .parse::<u32>()
                .map(BitsetQuery::Count)
                .map_err(|e| e.to_string());
        }
        if value.is_empty() {
            return Err("expected at least one value".to_string());
        }
        self.mask(value).map(BitsetQuery::Mask)
    }
}

/// One stored display value of a half-number stat.
#[derive(Debug, Clone, PartialEq)]
pub struct LadderStep {
    pub label: String,
    pub value: f64,
}

pub const INFINITY_LABEL: &str = "∞";

#[derive(Debug, Clone)]
pub struct HalfNumberOptions {
    pub min: i32,
    pub max: i32,
    /// Non-numeric stored values that may be searched for by equality
    pub sentinels: Vec<String>,
    ladder: Vec<LadderStep>,
}

impl Default for HalfNumberOptions {
    fn default() -> Self {
        Self::new(-10, 100)
    }
}

impl HalfNumberOptions {
    pub fn new(min: i32, max: i32) -> Self {
        Self {
            min,
            max,
            sentinels: vec!["X".to_string()],
            ladder: build_ladder(min, max),
        }
    }

    pub fn ladder(&self) -> &[LadderStep] {
        &self.ladder
    }

    pub fn sentinel(&self, raw: &str) -> Option<&str> {
        self.sentinels
            .iter()
            .find(|s| s.eq_ignore_ascii_case(raw))
            .map(String::as_str)
    }
}

/// Every half step in `min..=max`, plus `+N` for positive integers, `+0`
/// and `-0` for zero, and `∞`.
fn build_ladder(min: i32, max: i32) -> Vec<LadderStep> {
    let mut ladder = Vec::new();
    for halves in (min * 2)..=(max * 2) {
        let value = halves as f64 / 2.0;
        let whole = halves.abs() / 2;
        let fraction = if halves % 2 != 0 { ".5" } else { "" };
        let sign = if halves < 0 { "-" } else { "" };
        ladder.push(LadderStep {
            label: format!("{}{}{}", sign, whole, fraction),
            value,
        });

        if halves == 0 {
            for label in ["+0", "-0"] {
                ladder.push(LadderStep {
                    label: label.to_string(),
                    value: 0.0,
                });
            }
        } else if halves > 0 && halves % 2 == 0 {
            ladder.push(LadderStep {
                label: format!("+{}", whole),
                value,
            });
        }
    }
    ladder.push(LadderStep {
        label: INFINITY_LABEL.to_string(),
        value: f64::INFINITY,
    });
    ladder
}

#[derive(Debug, Clone)]
pub struct PatternOptions {
    pub templates: Vec<String>,
    /// Placeholder names, each the id of another command in the model
    pub parts: Vec<String>,
    pub(crate) compiled: Vec<Regex>,
}

impl PatternOptions {
    /// Compiles `{{name}}` templates into anchored named-capture regexes.
    pub fn new(templates: &[&str]) -> Result<Self, String> {
        let placeholder = Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}")
            .map_err(|e| e.to_string())?;
        let mut parts: Vec<String> = Vec::new();
        let mut compiled = Vec::new();

        if templates.is_empty() {
            return Err("at least one template is required".to_string());
        }

        for template in templates {
            let mut source = String::from("^");
            let mut last = 0;
            let mut seen_in_template = Vec::new();
            for captures in placeholder.captures_iter(template) {
                let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
                    continue;
                };
                let name = name.as_str();
                if seen_in_template.contains(&name) {
                    return Err(format!("placeholder {} repeated in {}", name, template));
                }
                seen_in_template.push(name);
                source.push_str(&regex::escape(&template[last..whole.start()]));
                source.push_str(&format!("(?P<{}>.+?)", name));
                last = whole.end();
                if !parts.iter().any(|p| p == name) {
                    parts.push(name.to_string());
                }
            }
            if seen_in_template.is_empty() {
                return Err(format!("template {} has no placeholders", template));
            }
            source.push_str(&regex::escape(&template[last..]));
            source.push('$');
            compiled.push(Regex::new(&source).map_err(|e| e.to_string())?);
        }

        Ok(Self {
            templates: templates.iter().map(|t| t.to_string()).collect(),
            parts,
            compiled,
        })
    }

    /// Captures of the first template matching the whole value.
    pub fn captures(&self, value: &str) -> Option<IndexMap<String, String>> {
        self.compiled.iter().find_map(|re| {
            let captures = re.captures(value)?;
            let fields = self
                .parts
                .iter()
                .filter_map(|part| {
                    captures
                        .name(part)
                        .map(|m| (part.clone(), m.as_str().trim().to_string()))
                })
                .collect();
            Some(fields)
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct UnrestrictedOptions {
    /// Storage keys searched; a match on any of them is a match
    pub targets: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct OrderOptions {
    /// Sort name -> storage key, names lowercase
    pub keys: IndexMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitset_mask_and_letters() {
        let colors = BitsetOptions::new("WUBRG");
        assert_eq!(colors.mask("WU").unwrap(), 0b00011);
        assert_eq!(colors.mask("rg").unwrap(), 0b11000);
        assert_eq!(colors.letters(0b11000), "RG");
        assert_eq!(colors.full_mask(), 0b11111);
        assert!(colors.mask("WX").is_err());
    }

    #[test]
    fn test_bitset_parse_words_and_counts() {
        let mut colors = BitsetOptions::new("WUBRG");
        colors.words.insert("azorius".to_string(), "WU".to_string());
        colors.words.insert("colorless".to_string(), String::new());

        assert_eq!(colors.parse("Azorius"), Ok(BitsetQuery::Mask(0b00011)));
        assert_eq!(colors.parse("colorless"), Ok(BitsetQuery::Mask(0)));
        assert_eq!(colors.parse("2"), Ok(BitsetQuery::Count(2)));
        assert_eq!(colors.parse("ub"), Ok(BitsetQuery::Mask(0b00110)));
        assert!(colors.parse("").is_err());
    }

    #[test]
    fn test_bitset_digits_in_alphabet_are_letters() {
        let runes = BitsetOptions::new("0123");
        assert_eq!(runes.parse("2"), Ok(BitsetQuery::Mask(0b0100)));
    }

    #[test]
    fn test_ladder_contents() {
        let options = HalfNumberOptions::default();
        let labels: Vec<&str> = options.ladder().iter().map(|s| s.label.as_str()).collect();
        for expected in ["-10", "-0.5", "0", "+0", "-0", "0.5", "1", "+1", "1.5", "100", "+100", "∞"] {
            assert!(labels.contains(&expected), "missing {}", expected);
        }
        assert!(!labels.contains(&"+0.5"));
        assert!(!labels.contains(&"100.5"));
        assert!(!labels.contains(&"-10.5"));
        // 221 half steps, 100 positive augments, +0, -0 and infinity
        assert_eq!(labels.len(), 221 + 100 + 2 + 1);
    }

    #[test]
    fn test_pattern_captures() {
        let pattern = PatternOptions::new(&["{{power}}/{{toughness}}"]).unwrap();
        assert_eq!(pattern.parts, vec!["power", "toughness"]);

        let fields = pattern.captures("3/4").unwrap();
        assert_eq!(fields.get("power").map(String::as_str), Some("3"));
        assert_eq!(fields.get("toughness").map(String::as_str), Some("4"));

        assert!(pattern.captures("3").is_none());
    }

    #[test]
    fn test_pattern_first_matching_template_wins() {
        let pattern = PatternOptions::new(&["{{a}}/{{b}}", "{{a}}"]).unwrap();
        let fields = pattern.captures("5").unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.get("a").map(String::as_str), Some("5"));
    }

    #[test]
    fn test_pattern_escapes_literals() {
        let pattern = PatternOptions::new(&["{{a}}.{{b}}"]).unwrap();
        assert!(pattern.captures("1x2").is_none());
        assert!(pattern.captures("1.2").is_some());
    }

    #[test]
    fn test_pattern_rejects_templates_without_placeholders() {
        assert!(PatternOptions::new(&["a/b"]).is_err());
        assert!(PatternOptions::new(&[]).is_err());
        assert!(PatternOptions::new(&["{{a}}/{{a}}"]).is_err());
    }
}
