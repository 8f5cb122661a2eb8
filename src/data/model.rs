use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Attribute – a demographic column used for filtering
// ---------------------------------------------------------------------------

/// The demographic columns a viewer can filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Attribute {
    Gender,
    AgeGroup,
    Department,
    Tenure,
}

impl Attribute {
    pub const ALL: [Attribute; 4] = [
        Attribute::Gender,
        Attribute::AgeGroup,
        Attribute::Department,
        Attribute::Tenure,
    ];

    /// Column header in the source CSV.
    pub fn column(self) -> &'static str {
        match self {
            Attribute::Gender => "Gender",
            Attribute::AgeGroup => "AgeGroup",
            Attribute::Department => "Department",
            Attribute::Tenure => "Tenure",
        }
    }

    /// Human-readable label for widgets.
    pub fn label(self) -> &'static str {
        match self {
            Attribute::Gender => "Gender",
            Attribute::AgeGroup => "Age Group",
            Attribute::Department => "Department",
            Attribute::Tenure => "Tenure",
        }
    }

    /// Fixed presentation order, for the attributes that have one.
    pub fn canonical_order(self) -> Option<&'static [&'static str]> {
        match self {
            Attribute::AgeGroup => Some(&["22-29", "30-39", "40-49", "50-60"]),
            Attribute::Tenure => Some(&["0-1 year", "2-5 years", "6-10 years", "10+ years"]),
            Attribute::Gender | Attribute::Department => None,
        }
    }

    pub fn from_column(name: &str) -> Option<Attribute> {
        Attribute::ALL.into_iter().find(|a| a.column() == name)
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

// ---------------------------------------------------------------------------
// Dimension – one PERMA+V score
// ---------------------------------------------------------------------------

/// Number of questionnaire items (`Q1..Q13`).
pub const ITEM_COUNT: usize = 13;

/// One of the six derived wellbeing dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dimension {
    P,
    E,
    R,
    M,
    A,
    V,
}

impl Dimension {
    pub const ALL: [Dimension; 6] = [
        Dimension::P,
        Dimension::E,
        Dimension::R,
        Dimension::M,
        Dimension::A,
        Dimension::V,
    ];

    /// 1-based item numbers averaged into this dimension.
    pub fn items(self) -> &'static [usize] {
        match self {
            Dimension::P => &[1, 2],
            Dimension::E => &[3, 4],
            Dimension::R => &[5, 6],
            Dimension::M => &[7, 8],
            Dimension::A => &[9, 10],
            Dimension::V => &[11, 12, 13],
        }
    }

    /// Single-letter axis label.
    pub fn code(self) -> &'static str {
        match self {
            Dimension::P => "P",
            Dimension::E => "E",
            Dimension::R => "R",
            Dimension::M => "M",
            Dimension::A => "A",
            Dimension::V => "V",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Dimension::P => "Positive Emotion",
            Dimension::E => "Engagement",
            Dimension::R => "Relationships",
            Dimension::M => "Meaning",
            Dimension::A => "Accomplishment",
            Dimension::V => "Vitality",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Header name of item `n` (1-based), e.g. `Q7`.
pub fn item_column(n: usize) -> String {
    format!("Q{n}")
}

/// Parse `Q1`..`Q13` into a 1-based item number.
pub fn parse_item_column(name: &str) -> Option<usize> {
    let n: usize = name.strip_prefix('Q')?.parse().ok()?;
    (1..=ITEM_COUNT).contains(&n).then_some(n)
}

/// The six dimension scores of one respondent; `None` = missing.
pub type DimensionScores = [Option<f64>; 6];

// ---------------------------------------------------------------------------
// Respondent – one row of the survey
// ---------------------------------------------------------------------------

/// A single respondent (one row of the source table).
#[derive(Debug, Clone, PartialEq)]
pub struct Respondent {
    /// Opaque identifier from the `ID` column.
    pub id: String,
    /// Demographic values; an attribute is absent when its cell was empty
    /// or the column does not exist.
    pub attributes: BTreeMap<Attribute, String>,
    /// Raw item scores, `items[0]` is `Q1`.
    pub items: [Option<f64>; ITEM_COUNT],
    /// Columns the pipeline does not interpret, carried through as text.
    pub extra: BTreeMap<String, String>,
    /// Derived PERMA+V scores, filled by [`super::scoring::derive_scores`].
    pub scores: DimensionScores,
}

impl Respondent {
    pub fn new(id: impl Into<String>) -> Self {
        Respondent {
            id: id.into(),
            attributes: BTreeMap::new(),
            items: [None; ITEM_COUNT],
            extra: BTreeMap::new(),
            scores: [None; 6],
        }
    }

    pub fn attribute(&self, attr: Attribute) -> Option<&str> {
        self.attributes.get(&attr).map(String::as_str)
    }

    /// Item score by 1-based number.
    pub fn item(&self, n: usize) -> Option<f64> {
        self.items.get(n.checked_sub(1)?).copied().flatten()
    }

    pub fn score(&self, dim: Dimension) -> Option<f64> {
        self.scores[dim.index()]
    }
}

// ---------------------------------------------------------------------------
// SurveyTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed survey with pre-computed option lists.
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyTable {
    /// All respondents, in source order.
    pub respondents: Vec<Respondent>,
    /// Header row of the source, in source order.
    pub columns: Vec<String>,
    /// 1-based item numbers whose column exists in the source.
    pub item_columns: Vec<usize>,
    /// For each attribute the distinct values in presentation order.
    pub options: BTreeMap<Attribute, Vec<String>>,
}

impl SurveyTable {
    /// Build the option index from the loaded respondents.
    pub fn from_respondents(
        columns: Vec<String>,
        item_columns: Vec<usize>,
        respondents: Vec<Respondent>,
    ) -> Self {
        let mut options: BTreeMap<Attribute, Vec<String>> = BTreeMap::new();

        for r in &respondents {
            for (attr, val) in &r.attributes {
                let seen = options.entry(*attr).or_default();
                if !seen.contains(val) {
                    seen.push(val.clone());
                }
            }
        }
        for (attr, values) in options.iter_mut() {
            if let Some(order) = attr.canonical_order() {
                sort_canonical(values, order);
            }
        }

        SurveyTable {
            respondents,
            columns,
            item_columns,
            options,
        }
    }

    /// Number of respondents.
    pub fn len(&self) -> usize {
        self.respondents.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.respondents.is_empty()
    }

    /// Distinct values of `attr` in presentation order (empty if the
    /// column is absent).
    pub fn options(&self, attr: Attribute) -> &[String] {
        self.options.get(&attr).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }
}

/// Canonical values first in their fixed order, then unknown ones
/// alphabetically.
fn sort_canonical(values: &mut [String], order: &[&str]) {
    values.sort_by(|a, b| {
        let rank = |v: &String| order.iter().position(|o| *o == v.as_str()).unwrap_or(order.len());
        rank(a).cmp(&rank(b)).then_with(|| a.cmp(b))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn respondent(id: &str, age: &str, gender: &str) -> Respondent {
        let mut r = Respondent::new(id);
        r.attributes.insert(Attribute::AgeGroup, age.to_string());
        r.attributes.insert(Attribute::Gender, gender.to_string());
        r
    }

    #[test]
    fn dimension_items_partition_all_questions() {
        let mut seen: Vec<usize> = Dimension::ALL
            .iter()
            .flat_map(|d| d.items().iter().copied())
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, (1..=ITEM_COUNT).collect::<Vec<_>>());
    }

    #[test]
    fn item_column_names_parse_only_in_range() {
        assert_eq!(parse_item_column("Q1"), Some(1));
        assert_eq!(parse_item_column("Q13"), Some(13));
        assert_eq!(parse_item_column("Q14"), None);
        assert_eq!(parse_item_column("Q0"), None);
        assert_eq!(parse_item_column("Gender"), None);
        assert_eq!(item_column(7), "Q7");
    }

    #[test]
    fn age_options_follow_canonical_order_then_unknowns() {
        let table = SurveyTable::from_respondents(
            vec![],
            vec![],
            vec![
                respondent("a", "50-60", "F"),
                respondent("b", "unknown", "M"),
                respondent("c", "22-29", "F"),
                respondent("d", "40-49", "X"),
                respondent("e", "22-29", "M"),
            ],
        );
        assert_eq!(
            table.options(Attribute::AgeGroup),
            ["22-29", "40-49", "50-60", "unknown"]
        );
        // No canonical order: first appearance wins.
        assert_eq!(table.options(Attribute::Gender), ["F", "M", "X"]);
        assert!(table.options(Attribute::Tenure).is_empty());
    }

    #[test]
    fn item_lookup_is_one_based() {
        let mut r = Respondent::new("x");
        r.items[0] = Some(4.0);
        assert_eq!(r.item(1), Some(4.0));
        assert_eq!(r.item(2), None);
        assert_eq!(r.item(0), None);
        assert_eq!(r.item(14), None);
    }
}
