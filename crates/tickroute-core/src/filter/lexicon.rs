use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::FilterError;

/// Weighted term list used when the local model is enabled.
const BUILTIN_LEXICON: &[(&str, f64)] = &[
    ("earnings", 6.0),
    ("revenue", 5.0),
    ("net profit", 6.0),
    ("guidance", 5.0),
    ("dividend", 4.0),
    ("buyback", 4.0),
    ("acquisition", 5.0),
    ("merger", 5.0),
    ("downgrade", 4.0),
    ("upgrade", 4.0),
    ("lawsuit", 3.0),
    ("investigation", 3.0),
    ("业绩", 6.0),
    ("营收", 5.0),
    ("净利润", 6.0),
    ("分红", 4.0),
    ("回购", 4.0),
    ("重组", 5.0),
    ("增持", 3.0),
    ("减持", 3.0),
    ("horoscope", -8.0),
    ("giveaway", -8.0),
    ("广告", -10.0),
    ("彩票", -10.0),
];

#[derive(Debug, Clone, PartialEq)]
pub struct Lexicon {
    weights: HashMap<String, f64>,
}

impl Lexicon {
    pub fn builtin() -> Self {
        Self {
            weights: BUILTIN_LEXICON
                .iter()
                .map(|(term, weight)| ((*term).to_owned(), *weight))
                .collect(),
        }
    }

    /// Loads `term<TAB>weight` lines. Blank lines and `#` comments are skipped.
    pub fn load(path: &Path) -> Result<Self, FilterError> {
        let raw = fs::read_to_string(path).map_err(|source| FilterError::ModelLoad {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&raw).map_err(|(line, reason)| FilterError::InvalidLexicon {
            path: path.to_path_buf(),
            line,
            reason,
        })
    }

    fn parse(raw: &str) -> Result<Self, (usize, String)> {
        let mut weights = HashMap::new();
        for (index, line) in raw.lines().enumerate() {
            let line_no = index + 1;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((term, weight)) = line.split_once('\t') else {
                return Err((line_no, String::from("expected `term<TAB>weight`")));
            };
            let term = term.trim().to_lowercase();
            if term.is_empty() {
                return Err((line_no, String::from("term is empty")));
            }
            let weight = weight
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|weight| weight.is_finite())
                .ok_or_else(|| (line_no, format!("invalid weight '{}'", weight.trim())))?;
            weights.insert(term, weight);
        }

        if weights.is_empty() {
            return Err((0, String::from("lexicon has no terms")));
        }
        Ok(Self { weights })
    }

    /// Sum of the weights of every term found in `text` (lower-cased).
    pub fn weigh(&self, text: &str) -> f64 {
        self.weights
            .iter()
            .filter(|(term, _)| text.contains(term.as_str()))
            .map(|(_, weight)| weight)
            .sum()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_weighted_lines() {
        let lexicon = Lexicon::parse("# comment\nEarnings\t5\n\nrecall\t-2.5\n").expect("valid");
        assert_eq!(lexicon.len(), 2);
        assert_eq!(lexicon.weigh("earnings beat, partial recall"), 2.5);
    }

    #[test]
    fn rejects_missing_tab_with_line_number() {
        let err = Lexicon::parse("earnings\t5\nrevenue 4\n").expect_err("line 2 is invalid");
        assert_eq!(err.0, 2);
    }

    #[test]
    fn rejects_non_numeric_weight() {
        assert!(Lexicon::parse("earnings\tlots\n").is_err());
        assert!(Lexicon::parse("earnings\tNaN\n").is_err());
    }

    #[test]
    fn empty_lexicon_is_invalid() {
        assert!(Lexicon::parse("# nothing here\n").is_err());
    }
}
