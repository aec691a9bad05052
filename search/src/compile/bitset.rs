use super::{comparison, literal, Comparison, Predicate, Scalar};
use crate::command::{BitsetOptions, BitsetQuery};
use crate::errors::SearchError;
use crate::resolve::ResolvedArgument;
use crate::types::Operator;

pub(super) fn compile(
    arg: &ResolvedArgument<'_>,
    options: &BitsetOptions,
) -> Result<Predicate, SearchError> {
    let raw = literal(arg)?;
    let query = options
        .parse(raw)
        .map_err(|reason| SearchError::invalid(arg.command.id(), raw, reason))?;
    let key = arg.key().to_string();

    let predicate = match query {
        BitsetQuery::Mask(mask) => by_mask(key, mask, options.full_mask(), arg.operator),
        BitsetQuery::Count(count) => by_count(key, count, options.full_mask(), arg.operator),
    };
    Ok(predicate)
}

fn exact(key: &str, mask: u64) -> Predicate {
    Predicate::Compare {
        key: key.to_string(),
        cmp: Comparison::Eq,
        value: Scalar::Integer(mask as i64),
    }
}

fn superset(key: &str, mask: u64) -> Predicate {
    Predicate::BitsAllSet {
        key: key.to_string(),
        mask,
    }
}

fn subset(key: &str, mask: u64, full: u64) -> Predicate {
    Predicate::BitsAllClear {
        key: key.to_string(),
        mask: full & !mask,
    }
}

fn by_mask(key: String, mask: u64, full: u64, operator: Operator) -> Predicate {
    match operator {
        Operator::Eq => exact(&key, mask),
        // `c:colorless` asks for no bits at all, not for any card
        Operator::Match if mask == 0 => exact(&key, 0),
        Operator::Match | Operator::Gte => superset(&key, mask),
        Operator::Gt => Predicate::and(vec![superset(&key, mask), exact(&key, mask).negate()]),
        Operator::Lte => subset(&key, mask, full),
        Operator::Lt => Predicate::and(vec![subset(&key, mask, full), exact(&key, mask).negate()]),
    }
}

/// Popcount queries list every mask of the alphabet with a qualifying count
fn by_count(key: String, count: u32, full: u64, operator: Operator) -> Predicate {
    let cmp = comparison(operator);
    let values = (0..=full)
        .filter(|mask| cmp.holds(mask.count_ones().cmp(&count)))
        .map(|mask| Scalar::Integer(mask as i64))
        .collect();
    Predicate::InList { key, values }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn masks(predicate: &Predicate) -> Vec<i64> {
        match predicate {
            Predicate::InList { values, .. } => values
                .iter()
                .map(|v| match v {
                    Scalar::Integer(i) => *i,
                    other => panic!("Expected integer, got {:?}", other),
                })
                .collect(),
            other => panic!("Expected IN list, got {:?}", other),
        }
    }

    #[test]
    fn test_count_lists_masks() {
        let two = by_count("color".to_string(), 2, 0b111, Operator::Eq);
        assert_eq!(masks(&two), vec![0b011, 0b101, 0b110]);

        let at_least_two = by_count("color".to_string(), 2, 0b111, Operator::Gte);
        assert_eq!(masks(&at_least_two), vec![0b011, 0b101, 0b110, 0b111]);

        let none = by_count("color".to_string(), 9, 0b111, Operator::Eq);
        assert!(masks(&none).is_empty());
    }

    #[test]
    fn test_subset_clears_complement() {
        assert_eq!(
            by_mask("color".to_string(), 0b00011, 0b11111, Operator::Lte),
            Predicate::BitsAllClear {
                key: "color".to_string(),
                mask: 0b11100,
            }
        );
    }
}
