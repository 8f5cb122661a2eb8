use std::collections::{BTreeMap, BTreeSet};

use super::model::{Attribute, Respondent, SurveyTable};

// ---------------------------------------------------------------------------
// Predicate set: which values are accepted per attribute
// ---------------------------------------------------------------------------

/// Per-attribute accepted values.
/// If an attribute is absent or its set is empty, it imposes no constraint.
pub type PredicateSet = BTreeMap<Attribute, BTreeSet<String>>;

/// Single-select widget state: either the "no selection" sentinel or one value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Any,
    Value(String),
}

/// Convert single-select widget states into a [`PredicateSet`].
/// [`Selection::Any`] contributes no constraint.
pub fn predicates_from_selections(
    selections: &BTreeMap<Attribute, Selection>,
) -> PredicateSet {
    selections
        .iter()
        .filter_map(|(attr, sel)| match sel {
            Selection::Any => None,
            Selection::Value(v) => Some((*attr, BTreeSet::from([v.clone()]))),
        })
        .collect()
}

/// Whether a predicate set constrains anything at all.
pub fn is_unconstrained(predicates: &PredicateSet) -> bool {
    predicates.values().all(BTreeSet::is_empty)
}

/// Intersect two predicate sets attribute by attribute.
///
/// An unconstrained side defers to the other. Two non-empty sets with no
/// common value yield a predicate that nothing can satisfy.
pub fn intersect(a: &PredicateSet, b: &PredicateSet) -> Intersection {
    let mut out = PredicateSet::new();
    for attr in Attribute::ALL {
        let left = a.get(&attr).filter(|s| !s.is_empty());
        let right = b.get(&attr).filter(|s| !s.is_empty());
        let merged = match (left, right) {
            (None, None) => continue,
            (Some(s), None) | (None, Some(s)) => s.clone(),
            (Some(l), Some(r)) => {
                let common: BTreeSet<String> = l.intersection(r).cloned().collect();
                if common.is_empty() {
                    return Intersection::Unsatisfiable;
                }
                common
            }
        };
        out.insert(attr, merged);
    }
    Intersection::Predicates(out)
}

/// Result of [`intersect`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intersection {
    Predicates(PredicateSet),
    /// Some attribute would have to match two disjoint value sets.
    Unsatisfiable,
}

/// Whether one respondent passes every active constraint.
///
/// A respondent passes an attribute when:
/// * The attribute is not present in `predicates` → passes (no constraint)
/// * The accepted set is empty → passes (no constraint)
/// * The respondent's value is in the accepted set → passes
///
/// A respondent without a value for a constrained attribute fails.
pub fn matches(respondent: &Respondent, predicates: &PredicateSet) -> bool {
    predicates.iter().all(|(attr, accepted)| {
        accepted.is_empty()
            || respondent
                .attribute(*attr)
                .is_some_and(|v| accepted.contains(v))
    })
}

// ---------------------------------------------------------------------------
// Filtered view
// ---------------------------------------------------------------------------

/// A subset of a [`SurveyTable`], as row indices in source order.
#[derive(Debug, Clone, Copy)]
pub struct FilteredView<'a> {
    table: &'a SurveyTable,
    indices: &'a [usize],
}

/// Owned result of filtering; borrow it as a [`FilteredView`] with
/// [`Selected::view`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selected {
    pub indices: Vec<usize>,
}

impl Selected {
    pub fn view<'a>(&'a self, table: &'a SurveyTable) -> FilteredView<'a> {
        FilteredView {
            table,
            indices: &self.indices,
        }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Select the respondents passing all active predicates.
///
/// With no active predicate every row is selected, in source order.
pub fn apply_filters(table: &SurveyTable, predicates: &PredicateSet) -> Selected {
    let indices = table
        .respondents
        .iter()
        .enumerate()
        .filter(|(_, r)| matches(r, predicates))
        .map(|(i, _)| i)
        .collect();
    Selected { indices }
}

impl<'a> FilteredView<'a> {
    pub fn table(&self) -> &'a SurveyTable {
        self.table
    }

    pub fn indices(&self) -> &'a [usize] {
        self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Respondents in the view, in source order.
    pub fn respondents(&self) -> impl Iterator<Item = &'a Respondent> + 'a {
        let table = self.table;
        let indices = self.indices;
        indices.iter().map(move |&i| &table.respondents[i])
    }

    /// Filter this view further; the result indexes the same table.
    pub fn refine(&self, predicates: &PredicateSet) -> Selected {
        let indices = self
            .indices
            .iter()
            .copied()
            .filter(|&i| matches(&self.table.respondents[i], predicates))
            .collect();
        Selected { indices }
    }
}

/// Select every row of `table`.
pub fn select_all(table: &SurveyTable) -> Selected {
    Selected {
        indices: (0..table.len()).collect(),
    }
}
