use eyre::{
    eyre,
    Context as _,
    Result,
};
use std::fmt;

/// A configured latency bucket with optional alerting thresholds on the
/// number of requests observed inside it.
///
/// `low` is always present; an absent `high` means the bucket is unbounded
/// above. Thresholds are `Option` so that an absent threshold can never be
/// confused with a legitimate threshold of zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Range {
    pub low: f64,
    pub high: Option<f64>,
    pub warning: Option<f64>,
    pub critical: Option<f64>,
}

impl Range {
    /// Whether this bucket carries a warning or critical threshold.
    pub fn has_alerts(&self) -> bool {
        self.warning.is_some() || self.critical.is_some()
    }
}

impl fmt::Display for Range {
    /// Renders the originating token spelling, `low[:high[:warning[:critical]]]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut fields = vec![
            self.low.to_string(),
            self.high.map(|v| v.to_string()).unwrap_or_default(),
            self.warning.map(|v| v.to_string()).unwrap_or_default(),
            self.critical.map(|v| v.to_string()).unwrap_or_default(),
        ];
        while fields.len() > 1 && fields.last().is_some_and(|field| field.is_empty()) {
            fields.pop();
        }
        write!(f, "{}", fields.join(":"))
    }
}

/// Parses `--range` values into an ordered list of bucket definitions.
///
/// Icinga does not allow repeating the same argument, so all values are
/// joined back into one whitespace-separated stream and split again; empty
/// tokens are dropped. Each token is `low[:high[:warning[:critical]]]` with
/// trailing fields optional.
pub fn parse_ranges(specs: &[String]) -> Result<Vec<Range>> {
    specs.join(" ").split_whitespace().map(parse_token).collect()
}

fn parse_token(token: &str) -> Result<Range> {
    let mut fields = token.split(':');

    let low = fields
        .next()
        .filter(|raw| !raw.is_empty())
        .ok_or_else(|| eyre!("range '{token}' is missing its lower bound"))?
        .parse::<f64>()
        .wrap_err_with(|| format!("range '{token}' has a malformed lower bound"))?;

    // Fields past the critical threshold are ignored.
    Ok(Range {
        low,
        high: parse_optional(fields.next(), token, "upper bound")?,
        warning: parse_optional(fields.next(), token, "warning threshold")?,
        critical: parse_optional(fields.next(), token, "critical threshold")?,
    })
}

fn parse_optional(field: Option<&str>, token: &str, what: &str) -> Result<Option<f64>> {
    match field {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse::<f64>()
            .map(Some)
            .wrap_err_with(|| format!("range '{token}' has a malformed {what}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn specs(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn parses_a_fully_specified_token() {
        let ranges = parse_ranges(&specs(&["100:200:10:20"])).unwrap();
        assert_eq!(
            ranges,
            vec![Range {
                low: 100.0,
                high: Some(200.0),
                warning: Some(10.0),
                critical: Some(20.0),
            }]
        );
    }

    #[test]
    fn missing_fields_parse_as_absent() {
        let ranges = parse_ranges(&specs(&["0:10"])).unwrap();
        assert_eq!(
            ranges,
            vec![Range {
                low: 0.0,
                high: Some(10.0),
                warning: None,
                critical: None,
            }]
        );
        assert!(!ranges[0].has_alerts());
    }

    #[test]
    fn trailing_empty_fields_parse_as_absent() {
        let ranges = parse_ranges(&specs(&["5:"])).unwrap();
        assert_eq!(ranges[0].high, None);

        let ranges = parse_ranges(&specs(&["5:10:"])).unwrap();
        assert_eq!(ranges[0].high, Some(10.0));
        assert_eq!(ranges[0].warning, None);
    }

    #[test]
    fn fragments_are_joined_and_resplit() {
        let ranges = parse_ranges(&specs(&["0:10 20:30", "40:50"])).unwrap();
        assert_eq!(ranges.len(), 3);
        assert_eq!(ranges[1].low, 20.0);
        assert_eq!(ranges[2].low, 40.0);
    }

    #[test]
    fn empty_tokens_are_dropped() {
        let ranges = parse_ranges(&specs(&["", "  ", "1:2"])).unwrap();
        assert_eq!(ranges.len(), 1);
    }

    #[test]
    fn preserves_input_order() {
        let ranges = parse_ranges(&specs(&["0:10:5:8", "10:20:15:25"])).unwrap();
        assert_eq!(ranges[0].low, 0.0);
        assert_eq!(ranges[1].low, 10.0);
    }

    #[test]
    fn malformed_lower_bound_is_fatal() {
        let err = parse_ranges(&specs(&["abc"])).unwrap_err();
        assert!(err.to_string().contains("'abc'"));
    }

    #[test]
    fn malformed_threshold_is_fatal() {
        let err = parse_ranges(&specs(&["1:2:x"])).unwrap_err();
        assert!(err.to_string().contains("'1:2:x'"));
    }

    #[test]
    fn zero_thresholds_are_not_absent() {
        let ranges = parse_ranges(&specs(&["0:10:0:0"])).unwrap();
        assert_eq!(ranges[0].warning, Some(0.0));
        assert_eq!(ranges[0].critical, Some(0.0));
        assert!(ranges[0].has_alerts());
    }

    #[test]
    fn displays_the_originating_token() {
        let ranges = parse_ranges(&specs(&["100:200:10:20", "5", "1:2::4"])).unwrap();
        assert_eq!(ranges[0].to_string(), "100:200:10:20");
        assert_eq!(ranges[1].to_string(), "5");
        assert_eq!(ranges[2].to_string(), "1:2::4");
    }
}
