use super::model::{Dimension, DimensionScores, Respondent, SurveyTable};

/// Fill the six PERMA+V scores of every respondent.
///
/// Each dimension is the mean of its present items. A dimension whose
/// items are all missing stays missing.
pub fn derive_scores(mut table: SurveyTable) -> SurveyTable {
    for respondent in &mut table.respondents {
        respondent.scores = respondent_scores(respondent);
    }
    log::debug!("Derived PERMA+V scores for {} respondents", table.len());
    table
}

/// Scores of one respondent, computed from its raw items.
pub fn respondent_scores(respondent: &Respondent) -> DimensionScores {
    let mut scores: DimensionScores = [None; 6];
    for dim in Dimension::ALL {
        scores[dim.index()] = mean_present(dim.items().iter().map(|&n| respondent.item(n)));
    }
    scores
}

/// Mean over the `Some` values; `None` when there are none.
pub fn mean_present(values: impl IntoIterator<Item = Option<f64>>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .flatten()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_csv;

    fn with_items(items: &[(usize, f64)]) -> Respondent {
        let mut r = Respondent::new("r");
        for &(n, v) in items {
            r.items[n - 1] = Some(v);
        }
        r
    }

    #[test]
    fn all_items_missing_leaves_every_score_missing() {
        let scores = respondent_scores(&Respondent::new("blank"));
        assert_eq!(scores, [None; 6]);
    }

    #[test]
    fn mean_uses_only_present_items() {
        let r = with_items(&[(1, 4.0), (2, 2.0), (3, 5.0), (11, 1.0), (13, 4.0)]);
        let scores = respondent_scores(&r);

        assert_eq!(scores[Dimension::P.index()], Some(3.0));
        // Q4 missing: E is just Q3.
        assert_eq!(scores[Dimension::E.index()], Some(5.0));
        assert_eq!(scores[Dimension::R.index()], None);
        // Q12 missing: V = mean(Q11, Q13).
        assert_eq!(scores[Dimension::V.index()], Some(2.5));
    }

    #[test]
    fn vitality_averages_three_items() {
        let r = with_items(&[(11, 1.0), (12, 2.0), (13, 4.0)]);
        let v = respondent_scores(&r)[Dimension::V.index()].unwrap();
        assert!((v - 7.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn derive_scores_over_loaded_table() {
        let doc = "ID,Q1,Q2\nA,4,2\nB,,oops\n";
        let table = derive_scores(parse_csv(doc.as_bytes()).unwrap());

        let p: Vec<Option<f64>> = table
            .respondents
            .iter()
            .map(|r| r.score(Dimension::P))
            .collect();
        assert_eq!(p, vec![Some(3.0), None]);
        // Absent columns produce missing scores, not zero.
        assert_eq!(table.respondents[0].score(Dimension::M), None);
    }

    #[test]
    fn derive_scores_keeps_row_order() {
        let doc = "ID,Q1\nz,1\na,2\nm,3\n";
        let table = derive_scores(parse_csv(doc.as_bytes()).unwrap());
        let ids: Vec<&str> = table.respondents.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["z", "a", "m"]);
    }

    #[test]
    fn mean_present_of_nothing_is_none() {
        assert_eq!(mean_present(std::iter::empty()), None);
        assert_eq!(mean_present([None, None]), None);
        assert_eq!(mean_present([Some(1.0), None, Some(2.0)]), Some(1.5));
    }
}
