use super::{comparison, literal, Predicate, Scalar};
use crate::command::{HalfNumberOptions, INFINITY_LABEL};
use crate::errors::SearchError;
use crate::resolve::ResolvedArgument;
use crate::types::Operator;

/// Stored value of a stat that varies, e.g. a `*` power
const VARIABLE: &str = "*";

pub(super) fn compile(
    arg: &ResolvedArgument<'_>,
    options: &HalfNumberOptions,
) -> Result<Predicate, SearchError> {
    let raw = literal(arg)?;
    let key = arg.key().to_string();
    let id = arg.command.id();

    if raw == VARIABLE {
        return match arg.operator {
            Operator::Match => Ok(outside_ladder(key, options)),
            Operator::Eq => Ok(in_list(key, [VARIABLE])),
            op => Err(SearchError::invalid(
                id,
                raw,
                format!("{} cannot be used with {}", VARIABLE, op),
            )),
        };
    }

    if let Some(sentinel) = options.sentinel(raw) {
        return match arg.operator {
            Operator::Match | Operator::Eq => Ok(in_list(key, [sentinel])),
            op => Err(SearchError::invalid(
                id,
                raw,
                format!("{} cannot be used with {}", sentinel, op),
            )),
        };
    }

    let target = parse(raw).ok_or_else(|| SearchError::invalid(id, raw, "expected a number"))?;
    let cmp = comparison(arg.operator);
    let labels: Vec<&str> = options
        .ladder()
        .iter()
        .filter(|step| {
            step.value
                .partial_cmp(&target)
                .is_some_and(|ordering| cmp.holds(ordering))
        })
        .map(|step| step.label.as_str())
        .collect();
    Ok(in_list(key, labels))
}

/// Present, but not one of the ladder's labels
fn outside_ladder(key: String, options: &HalfNumberOptions) -> Predicate {
    let labels = options.ladder().iter().map(|step| step.label.as_str());
    Predicate::and(vec![
        Predicate::Present { key: key.clone() },
        in_list(key, labels).negate(),
    ])
}

fn in_list<'a>(key: String, labels: impl IntoIterator<Item = &'a str>) -> Predicate {
    Predicate::InList {
        key,
        values: labels
            .into_iter()
            .map(|label| Scalar::Text(label.to_string()))
            .collect(),
    }
}

fn parse(raw: &str) -> Option<f64> {
    if raw == INFINITY_LABEL {
        return Some(f64::INFINITY);
    }
    let value = raw.strip_prefix('+').unwrap_or(raw).parse::<f64>().ok()?;
    // only whole and half steps exist on the ladder
    if value.is_finite() && (value * 2.0).fract() == 0.0 {
        Some(value)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_values() {
        assert_eq!(parse("1"), Some(1.0));
        assert_eq!(parse("+1"), Some(1.0));
        assert_eq!(parse("-0"), Some(0.0));
        assert_eq!(parse("1.5"), Some(1.5));
        assert_eq!(parse("∞"), Some(f64::INFINITY));
        assert_eq!(parse("1.25"), None);
        assert_eq!(parse("inf"), None);
        assert_eq!(parse("X"), None);
    }
}
