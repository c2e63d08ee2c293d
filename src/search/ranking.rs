//! Result ordering
//!
//! Exactly one rank mode applies per search, picked by parameter precedence:
//! displacement target, then price target, then odometer ascending, then
//! year descending, then the default price descending. Records whose sort
//! key does not parse go to the end, whatever the direction.

use super::convert;
use super::filters::RangeParams;
use crate::inventory::Vehicle;
use std::cmp::Ordering;

/// The ordering applied to a filtered candidate list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RankMode {
    /// Ascending distance to the target displacement.
    DisplacementTarget(f64),
    /// Ascending distance to the target price.
    PriceTarget(f64),
    OdometerAscending,
    YearDescending,
    PriceDescending,
}

/// Select the rank mode for the present range parameters.
pub fn mode_for(ranges: &RangeParams) -> RankMode {
    if let Some(target) = ranges.ccmax {
        RankMode::DisplacementTarget(target)
    } else if let Some(target) = ranges.valormax {
        RankMode::PriceTarget(target)
    } else if ranges.kmmax.is_some() {
        RankMode::OdometerAscending
    } else if ranges.anomax.is_some() {
        RankMode::YearDescending
    } else {
        RankMode::PriceDescending
    }
}

/// Order candidates in place. Stable, so ties keep inventory order.
pub fn rank(candidates: &mut [&Vehicle], mode: RankMode) {
    match mode {
        RankMode::DisplacementTarget(target) => {
            sort_ascending(candidates, |v| {
                convert::to_displacement(v.cilindrada.as_ref()).map(|cc| (cc - target).abs())
            });
        }
        RankMode::PriceTarget(target) => {
            sort_ascending(candidates, |v| {
                convert::to_price(v.preco.as_ref()).map(|price| (price - target).abs())
            });
        }
        RankMode::OdometerAscending => {
            sort_ascending(candidates, |v| {
                convert::to_odometer(v.km.as_ref()).map(|km| km as f64)
            });
        }
        RankMode::YearDescending => {
            sort_descending(candidates, |v| {
                convert::to_year(v.ano.as_ref()).map(f64::from)
            });
        }
        RankMode::PriceDescending => {
            sort_descending(candidates, |v| convert::to_price(v.preco.as_ref()));
        }
    }
}

fn sort_ascending<F>(candidates: &mut [&Vehicle], key: F)
where
    F: Fn(&Vehicle) -> Option<f64>,
{
    candidates.sort_by(|a, b| compare(key(a), key(b)));
}

fn sort_descending<F>(candidates: &mut [&Vehicle], key: F)
where
    F: Fn(&Vehicle) -> Option<f64>,
{
    candidates.sort_by(|a, b| compare(key(b), key(a)));
}

// None is the worst key in either direction: for ascending it acts as
// +infinity, and sort_descending flips the operands so None still loses.
fn compare(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
