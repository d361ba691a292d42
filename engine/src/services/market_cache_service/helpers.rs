// Conversions between domain values and gRPC messages.
use crate::error::EngineError;
use crate::services::ProtoBar;
use chrono::NaiveDate;
use shared::models::Bar as DomainBar;
use shared::utils::{format_date, parse_date};

pub fn to_proto_bar(bar: &DomainBar) -> ProtoBar {
    ProtoBar {
        date: format_date(bar.date),
        open: bar.open,
        high: bar.high,
        low: bar.low,
        close: bar.close,
        volume: bar.volume,
        turnover: bar.turnover,
        price_change: bar.price_change,
        change_ratio: bar.change_ratio,
    }
}

pub fn parse_request_date(field: &str, value: &str) -> Result<NaiveDate, EngineError> {
    parse_date(value).map_err(|e| EngineError::ValidationError(format!("Invalid {}: {}", field, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_proto_bar_keeps_optional_fields() {
        let mut bar = DomainBar::new(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), 1.0, 2.0, 0.5, 1.5, 10.0);
        bar.change_ratio = Some(f64::NAN);
        let proto = to_proto_bar(&bar);
        assert_eq!(proto.date, "2024-01-02");
        assert_eq!(proto.turnover, None);
        assert!(proto.change_ratio.unwrap().is_nan());
    }

    #[test]
    fn test_parse_request_date_names_the_field() {
        let err = parse_request_date("from_date", "2024/01/01").unwrap_err();
        assert!(matches!(err, EngineError::ValidationError(_)));
        assert!(err.to_string().contains("from_date"));
    }
}
