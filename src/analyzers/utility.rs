use std::collections::BTreeMap;

/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator). `None` below two values.
pub fn sample_stddev(values: &[f64], mean: f64) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;

    Some(variance.sqrt())
}

/// Mean of the values that are present. `None` when all are missing.
pub fn mean_present<'a, I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a Option<f64>>,
{
    let present: Vec<f64> = values.into_iter().filter_map(|v| *v).collect();
    if present.is_empty() {
        None
    } else {
        Some(mean(&present))
    }
}

/// Rounds to one decimal place, halves to even.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

/// Quantile with linear interpolation between closest ranks, ignoring missing
/// values. `q` is clamped to `[0, 1]`.
pub fn quantile(values: &[Option<f64>], q: f64) -> Option<f64> {
    let mut sorted: Vec<f64> = values.iter().filter_map(|v| *v).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Rows sharing one grouping key.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub key: Vec<String>,
    pub rows: Vec<usize>,
}

/// Groups row indices by the values of `keys`. Rows with any missing key are
/// left out, and only rows flagged in `mask` (when given) are considered.
/// Groups come back sorted by key.
pub fn group_by(keys: &[&[Option<String>]], mask: Option<&[bool]>) -> Vec<Group> {
    let len = keys.first().map_or(0, |k| k.len());
    let mut groups: BTreeMap<Vec<String>, Vec<usize>> = BTreeMap::new();

    'rows: for row in 0..len {
        if mask.is_some_and(|m| !m[row]) {
            continue;
        }
        let mut key = Vec::with_capacity(keys.len());
        for column in keys {
            match &column[row] {
                Some(value) => key.push(value.clone()),
                None => continue 'rows,
            }
        }
        groups.entry(key).or_default().push(row);
    }

    groups
        .into_iter()
        .map(|(key, rows)| Group { key, rows })
        .collect()
}

/// Reorders groups by the position of their first key in `order`. Keys not
/// listed go last.
pub fn order_groups(groups: &mut [Group], order: &[&str]) {
    groups.sort_by_key(|g| {
        order
            .iter()
            .position(|o| g.key.first().is_some_and(|k| k.as_str() == *o))
            .unwrap_or(order.len())
    });
}

pub fn group_values(column: &[Option<f64>], rows: &[usize]) -> Vec<f64> {
    rows.iter().filter_map(|r| column[*r]).collect()
}

pub fn group_mean(column: &[Option<f64>], rows: &[usize]) -> Option<f64> {
    let values = group_values(column, rows);
    if values.is_empty() {
        None
    } else {
        Some(mean(&values))
    }
}

pub fn group_max(column: &[Option<f64>], rows: &[usize]) -> Option<f64> {
    group_values(column, rows).into_iter().reduce(f64::max)
}

/// Formats a count with comma thousands separators.
pub fn fmt_count(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Formats an optional value with one decimal, `-` when missing.
pub fn fmt_score(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.1}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> Option<String> {
        Some(v.to_string())
    }

    #[test]
    fn test_mean_and_stddev() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[2.0, 4.0]), 3.0);
        assert_eq!(sample_stddev(&[1.0], 1.0), None);
        let sd = sample_stddev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0], 5.0).unwrap();
        assert!((sd - 2.138).abs() < 1e-3);
    }

    #[test]
    fn test_mean_present_skips_missing() {
        assert_eq!(mean_present(&[Some(1.0), None, Some(3.0)]), Some(2.0));
        assert_eq!(mean_present(&[None, None]), None);
    }

    #[test]
    fn test_quantile_interpolates() {
        let values: Vec<Option<f64>> = (1..=5).map(|v| Some(v as f64)).collect();
        assert_eq!(quantile(&values, 0.0), Some(1.0));
        assert_eq!(quantile(&values, 0.5), Some(3.0));
        assert_eq!(quantile(&values, 1.0), Some(5.0));
        assert!((quantile(&values, 0.95).unwrap() - 4.8).abs() < 1e-9);
        assert_eq!(quantile(&[None], 0.5), None);
    }

    #[test]
    fn test_group_by_drops_missing_keys() {
        let states = vec![s("SP"), s("RJ"), None, s("SP")];
        let groups = group_by(&[&states[..]], None);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key, vec!["RJ"]);
        assert_eq!(groups[1].rows, vec![0, 3]);
    }

    #[test]
    fn test_group_by_with_mask_and_two_keys() {
        let states = vec![s("SP"), s("SP"), s("MG")];
        let regions = vec![s("Sudeste"), s("Sudeste"), None];
        let groups = group_by(&[&states[..], &regions[..]], Some(&[false, true, true][..]));

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].key, vec!["SP", "Sudeste"]);
        assert_eq!(groups[0].rows, vec![1]);
    }

    #[test]
    fn test_order_groups() {
        let labels = vec![s("Alto"), s("Baixo"), s("Outro"), s("Muito Baixo")];
        let mut groups = group_by(&[&labels[..]], None);
        order_groups(&mut groups, &["Muito Baixo", "Baixo", "Alto"]);

        let keys: Vec<_> = groups.iter().map(|g| g.key[0].as_str()).collect();
        assert_eq!(keys, vec!["Muito Baixo", "Baixo", "Alto", "Outro"]);
    }

    #[test]
    fn test_group_aggregates() {
        let column = vec![Some(1.0), None, Some(5.0)];
        assert_eq!(group_mean(&column, &[0, 1, 2]), Some(3.0));
        assert_eq!(group_max(&column, &[0, 1, 2]), Some(5.0));
        assert_eq!(group_mean(&column, &[1]), None);
    }

    #[test]
    fn test_formatting() {
        assert_eq!(fmt_count(0), "0");
        assert_eq!(fmt_count(999), "999");
        assert_eq!(fmt_count(1000), "1,000");
        assert_eq!(fmt_count(1234567), "1,234,567");
        assert_eq!(round1(512.345), 512.3);
        assert_eq!(fmt_score(Some(500.04)), "500.0");
        assert_eq!(fmt_score(None), "-");
    }

    #[test]
    fn test_round1_halves_to_even() {
        assert_eq!(round1(500.25), 500.2);
        assert_eq!(round1(500.75), 500.8);
        assert_eq!(round1(-0.25), -0.2);
        assert_eq!(round1(612.5), 612.5);
    }
}
