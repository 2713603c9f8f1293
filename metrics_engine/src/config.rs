//! Engine configuration.
//!
//! [`EngineSettings`] is the serde shape read from the `[engine]` table of the
//! application config; every field has a default. Converting it into an
//! [`EngineConfig`] validates it:
//!
//! ```toml
//! [engine]
//! exchange_tz = "America/New_York"
//! extended_session = true
//! sparkline_len = 24
//!
//! [engine.session]
//! open = "09:30"
//! close = "16:00"
//!
//! [engine.lookbacks]
//! 1D = 1
//! 1W = 5
//! YTD = "ytd"
//! ```

use chrono_tz::Tz;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{
    error::ConfigError,
    session::SessionWindow,
    sparkline::DEFAULT_SPARKLINE_LEN,
    timeframe::{LookbackRule, LookbackSetting, LookbackTable, Timeframe},
    tz::{DEFAULT_EXCHANGE_TZ, parse_exchange_tz},
};

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub exchange_tz: Tz,
    /// `None` disables extended-session detection.
    pub session: Option<SessionWindow>,
    pub sparkline_len: usize,
    pub lookbacks: LookbackTable,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            exchange_tz: DEFAULT_EXCHANGE_TZ,
            session: Some(SessionWindow::default()),
            sparkline_len: DEFAULT_SPARKLINE_LEN,
            lookbacks: LookbackTable::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineSettings {
    pub exchange_tz: String,
    pub extended_session: bool,
    pub sparkline_len: usize,
    pub session: SessionSettings,
    pub lookbacks: IndexMap<Timeframe, LookbackSetting>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionSettings {
    pub open: String,
    pub close: String,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            open: "09:30".into(),
            close: "16:00".into(),
        }
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            exchange_tz: DEFAULT_EXCHANGE_TZ.name().to_string(),
            extended_session: true,
            sparkline_len: DEFAULT_SPARKLINE_LEN,
            session: SessionSettings::default(),
            lookbacks: LookbackTable::default()
                .iter()
                .map(|(tf, rule)| (tf, rule.into()))
                .collect(),
        }
    }
}

impl TryFrom<EngineSettings> for EngineConfig {
    type Error = ConfigError;

    fn try_from(settings: EngineSettings) -> Result<Self, Self::Error> {
        let exchange_tz = parse_exchange_tz(&settings.exchange_tz)?;

        let window = SessionWindow::parse(&settings.session.open, &settings.session.close)?;
        let session = settings.extended_session.then_some(window);

        if settings.sparkline_len == 0 {
            return Err(ConfigError::ZeroSparklineLength);
        }

        let mut rules = IndexMap::with_capacity(settings.lookbacks.len());
        for (timeframe, setting) in settings.lookbacks {
            let rule = LookbackRule::try_from(setting)
                .map_err(|message| ConfigError::InvalidLookback { timeframe, message })?;
            rules.insert(timeframe, rule);
        }
        let lookbacks = LookbackTable::new(rules)?;

        Ok(Self {
            exchange_tz,
            session,
            sparkline_len: settings.sparkline_len,
            lookbacks,
        })
    }
}
