use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{PriceError, Result};

/// Aggregated high/low prices for one historical bucket (one minute or one
/// hour wide). The upstream API encodes `time` as unix seconds.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PricePoint {
    #[serde(with = "chrono::serde::ts_seconds")]
    pub time: DateTime<Utc>,
    pub high: f64,
    pub low: f64,
}

/// Body of the `/histominute` and `/histohour` endpoints.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HistoricalResponse {
    #[serde(rename = "Response")]
    pub response: String,
    #[serde(rename = "Message", default)]
    pub message: String,
    #[serde(rename = "Data", default)]
    pub data: Vec<PricePoint>,
}

impl HistoricalResponse {
    /// Reduces the response to a single price: the simple average of the
    /// high and low of the bucket nearest `t`.
    ///
    /// Nearest means the entry minimizing the signed difference
    /// `t - entry.time`, first minimal entry winning. A bucket after `t`
    /// yields a negative difference and so always beats buckets before it;
    /// the upstream API is not expected to return one, but if it does it is
    /// taken as-is.
    pub fn price_at(&self, t: DateTime<Utc>) -> Result<f64> {
        if self.response != "Success" {
            return Err(PriceError::Upstream {
                response: self.response.clone(),
                message: self.message.clone(),
            });
        }
        let mut points = self.data.iter();
        let mut nearest = points.next().ok_or(PriceError::NoData)?;
        let mut min_diff = t - nearest.time;
        for point in points {
            let diff = t - point.time;
            if diff < min_diff {
                min_diff = diff;
                nearest = point;
            }
        }
        Ok((nearest.high + nearest.low) / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn point(time: DateTime<Utc>, high: f64, low: f64) -> PricePoint {
        PricePoint { time, high, low }
    }

    fn success(data: Vec<PricePoint>) -> HistoricalResponse {
        HistoricalResponse {
            response: "Success".to_string(),
            message: String::new(),
            data,
        }
    }

    #[test]
    fn timestamps_round_trip_as_unix_seconds() {
        let p = point(Utc.timestamp_opt(1_535_000_000, 0).unwrap(), 6.0, 5.0);
        let json = serde_json::to_string(&p).unwrap();
        assert!(json.contains("\"time\":1535000000"), "json: {json}");
        let back: PricePoint = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn decodes_upstream_field_names() {
        let body = r#"{"Response":"Success","Message":"","Data":
            [{"time":1535000000,"high":6.0,"low":5.0}]}"#;
        let r: HistoricalResponse = serde_json::from_str(body).unwrap();
        assert_eq!(r.response, "Success");
        assert_eq!(r.data[0].time.timestamp(), 1_535_000_000);
    }

    #[test]
    fn missing_message_and_data_default() {
        let r: HistoricalResponse =
            serde_json::from_str(r#"{"Response":"Success"}"#).unwrap();
        assert_eq!(r.message, "");
        assert!(r.data.is_empty());
    }

    #[test]
    fn picks_bucket_nearest_query_time() {
        let t0 = Utc.timestamp_opt(1_535_000_000, 0).unwrap();
        let r = success(vec![
            point(t0, 5.0, 4.0),
            point(t0 + chrono::Duration::minutes(1), 6.0, 5.0),
        ]);

        // Exactly at the second bucket.
        let p = r.price_at(t0 + chrono::Duration::minutes(1)).unwrap();
        assert_eq!(p, 5.5);

        // Halfway in: the later bucket has the smaller signed difference
        // (-30s beats +30s), so it wins even though it lies after t.
        let p = r.price_at(t0 + chrono::Duration::seconds(30)).unwrap();
        assert_eq!(p, 5.5);

        // Before both buckets every difference is negative and the later
        // bucket's is the most negative, so the literal rule picks it.
        let p = r.price_at(t0 - chrono::Duration::seconds(30)).unwrap();
        assert_eq!(p, 5.5);
    }

    #[test]
    fn first_minimal_entry_wins_ties() {
        let t0 = Utc.timestamp_opt(1_535_000_000, 0).unwrap();
        let r = success(vec![point(t0, 5.0, 4.0), point(t0, 6.0, 5.0)]);
        assert_eq!(r.price_at(t0).unwrap(), 4.5);
    }

    #[test]
    fn averages_high_and_low() {
        let t0 = Utc.timestamp_opt(1_535_000_000, 0).unwrap();
        let r = success(vec![point(t0, 10.0, 4.0)]);
        assert_eq!(r.price_at(t0).unwrap(), 7.0);
    }

    #[test]
    fn non_success_status_is_upstream_error() {
        let r = HistoricalResponse {
            response: "Error".to_string(),
            message: "bad request".to_string(),
            data: vec![],
        };
        let err = r.price_at(Utc::now()).unwrap_err();
        match err {
            PriceError::Upstream { response, message } => {
                assert_eq!(response, "Error");
                assert_eq!(message, "bad request");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_data_is_no_data_error() {
        let r = success(vec![]);
        assert!(matches!(r.price_at(Utc::now()), Err(PriceError::NoData)));
    }
}
