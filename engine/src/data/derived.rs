// Value-added columns computed from the raw OHLCV fields.
use shared::models::Bar;

/// Fills in `turnover`, `price_change` and `change_ratio` where absent.
///
/// Values already present are kept as stored, even when they disagree with
/// the raw fields. A zero `open` makes `change_ratio` non-finite (`inf`,
/// `-inf` or `NaN`); it is left that way for callers to handle.
pub fn with_derived_fields(bars: Vec<Bar>) -> Vec<Bar> {
    bars.into_iter().map(fill_derived_fields).collect()
}

pub fn fill_derived_fields(mut bar: Bar) -> Bar {
    if bar.has_derived_fields() {
        return bar;
    }
    if bar.turnover.is_none() {
        bar.turnover = Some(bar.close * bar.volume);
    }
    if bar.price_change.is_none() {
        bar.price_change = Some(bar.close - bar.open);
    }
    if bar.change_ratio.is_none() {
        bar.change_ratio = Some((bar.close - bar.open) / bar.open * 100.0);
    }
    bar
}
