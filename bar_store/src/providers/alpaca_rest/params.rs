use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    models::{
        interval::{Interval, IntervalUnit},
        request_params::{BarsRequest, ProviderParams},
    },
    providers::ProviderError,
};

/// Specifies the corporate action adjustment for stock data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Adjustment {
    #[default]
    Raw,
    Split,
    Dividend,
    All,
}

impl Adjustment {
    fn as_str(self) -> &'static str {
        match self {
            Adjustment::Raw => "raw",
            Adjustment::Split => "split",
            Adjustment::Dividend => "dividend",
            Adjustment::All => "all",
        }
    }
}

/// Specifies the source feed for stock data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Feed {
    #[default]
    Sip,
    Iex,
    Otc,
}

impl Feed {
    fn as_str(self) -> &'static str {
        match self {
            Feed::Sip => "sip",
            Feed::Iex => "iex",
            Feed::Otc => "otc",
        }
    }
}

/// Specifies the sort order for the bars.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Sort {
    #[default]
    Asc,
    Desc,
}

/// Alpaca-specific parameters for a bars request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
pub struct AlpacaBarsParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adjustment: Option<Adjustment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feed: Option<Feed>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<Sort>,
}

/// Renders an [`Interval`] in Alpaca's `timeframe` syntax, enforcing the
/// amounts the API accepts for each unit.
pub fn alpaca_timeframe(interval: &Interval) -> Result<String, ProviderError> {
    let amount = interval.amount().get();
    let (ok, unit, rule) = match interval.unit() {
        IntervalUnit::Minute => ((1..=59).contains(&amount), "Min", "1-59"),
        IntervalUnit::Hour => ((1..=23).contains(&amount), "Hour", "1-23"),
        IntervalUnit::Day => (amount == 1, "Day", "1"),
        IntervalUnit::Week => (amount == 1, "Week", "1"),
        IntervalUnit::Month => ([1, 2, 3, 6, 12].contains(&amount), "Month", "1, 2, 3, 6 or 12"),
    };
    if !ok {
        return Err(ProviderError::Validation(format!(
            "{unit} intervals only support amounts {rule}, got {amount}"
        )));
    }
    Ok(format!("{amount}{unit}"))
}

/// Builds the query string for `/v2/stocks/bars`. The period is anchored at `now`.
pub fn construct_params(
    request: &BarsRequest,
    now: DateTime<Utc>,
) -> Result<Vec<(String, String)>, ProviderError> {
    if request.tickers.is_empty() {
        return Err(ProviderError::Validation("no tickers requested".into()));
    }

    let mut query = vec![
        ("symbols".to_string(), request.tickers.join(",")),
        ("timeframe".to_string(), alpaca_timeframe(&request.interval)?),
    ];

    if let Some(start) = request.period.cutoff(now.naive_utc()) {
        query.push((
            "start".to_string(),
            start.and_utc().to_rfc3339_opts(SecondsFormat::Secs, true),
        ));
    }

    if let ProviderParams::Alpaca(p) = &request.provider_specific {
        if let Some(adjustment) = p.adjustment {
            query.push(("adjustment".to_string(), adjustment.as_str().to_string()));
        }
        if let Some(feed) = p.feed {
            query.push(("feed".to_string(), feed.as_str().to_string()));
        }
        if let Some(currency) = &p.currency {
            query.push(("currency".to_string(), currency.clone()));
        }
        if let Some(limit) = p.limit {
            query.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(sort) = p.sort {
            let s = match sort {
                Sort::Asc => "asc",
                Sort::Desc => "desc",
            };
            query.push(("sort".to_string(), s.to_string()));
        }
    }

    Ok(query)
}
