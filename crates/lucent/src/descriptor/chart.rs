//! Declarative chart specs, validated here and forwarded unchanged to an
//! external charting surface.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::RenderFailure;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartType {
    Bar,
    Pie,
    Line,
}

impl FromStr for ChartType {
    type Err = RenderFailure;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bar" => Ok(Self::Bar),
            "pie" => Ok(Self::Pie),
            "line" => Ok(Self::Line),
            other => Err(RenderFailure::malformed(format!(
                "unknown chart type `{other}`, valid values: bar, pie, line"
            ))),
        }
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Bar => "bar",
            Self::Pie => "pie",
            Self::Line => "line",
        })
    }
}

/// A numeric chart: category labels plus one or more series.
///
/// `chart_type` stays a string so the config round-trips exactly as given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfig {
    pub chart_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub series: Vec<ChartSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub name: String,
    pub values: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<String>>,
}

impl ChartConfig {
    /// Validates the chart's shape and returns its type.
    ///
    /// # Errors
    ///
    /// Returns [`RenderFailure::MalformedDescriptor`] for an unknown chart
    /// type, no series, a series whose length differs from the label count,
    /// non-finite values, or negative pie values.
    pub fn validate(&self) -> Result<ChartType, RenderFailure> {
        let chart_type: ChartType = self.chart_type.parse()?;

        if self.series.is_empty() {
            return Err(RenderFailure::malformed("chart needs at least one series"));
        }

        for series in &self.series {
            if series.values.len() != self.labels.len() {
                return Err(RenderFailure::malformed(format!(
                    "series `{}` has {} values for {} labels",
                    series.name,
                    series.values.len(),
                    self.labels.len()
                )));
            }
            if let Some(value) = series.values.iter().find(|v| !v.is_finite()) {
                return Err(RenderFailure::malformed(format!(
                    "series `{}` contains non-finite value {value}",
                    series.name
                )));
            }
            if chart_type == ChartType::Pie && series.values.iter().any(|v| *v < 0.0) {
                return Err(RenderFailure::malformed(format!(
                    "pie series `{}` contains a negative value",
                    series.name
                )));
            }
        }

        Ok(chart_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart(chart_type: &str, values: Vec<f64>) -> ChartConfig {
        ChartConfig {
            chart_type: chart_type.to_string(),
            title: None,
            labels: vec!["a".into(), "b".into()],
            series: vec![ChartSeries {
                name: "s".into(),
                values,
                colors: None,
            }],
        }
    }

    #[test]
    fn test_valid_charts() {
        assert_eq!(chart("bar", vec![1.0, -2.0]).validate(), Ok(ChartType::Bar));
        assert_eq!(chart("pie", vec![1.0, 0.0]).validate(), Ok(ChartType::Pie));
        assert_eq!(chart("line", vec![0.5, 3.0]).validate(), Ok(ChartType::Line));
    }

    #[test]
    fn test_invalid_charts() {
        assert!(chart("radar", vec![1.0, 2.0]).validate().is_err());
        assert!(chart("bar", vec![1.0]).validate().is_err());
        assert!(chart("bar", vec![1.0, f64::NAN]).validate().is_err());
        assert!(chart("pie", vec![1.0, -1.0]).validate().is_err());

        let mut empty = chart("bar", vec![]);
        empty.series.clear();
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_forwarded_json_keeps_camel_case() {
        let json = serde_json::to_value(chart("bar", vec![1.0, 2.0])).unwrap();
        assert_eq!(json["chartType"], "bar");
        assert!(json.get("title").is_none());
    }
}
