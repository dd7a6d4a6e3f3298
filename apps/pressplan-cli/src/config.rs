//! # Scenario Configuration
//!
//! Loads a release scenario for the report.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     PRESSPLAN_RELEASE_DATE=2026-03-13                                  │
//! │     PRESSPLAN_UNIT_PRICE=32.50                                         │
//! │                                                                         │
//! │  2. TOML Scenario File                                                 │
//! │     path argument, else $PRESSPLAN_CONFIG, else                        │
//! │     ~/.config/pressplan/release.toml (Linux)                           │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     560 units, $35, 8-month front-loaded curve                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Scenario File Format
//! ```toml
//! [manufacturing]
//! units = 560
//! total_cost = 4294.05
//!
//! [fixed_costs]
//! marketing = 5000
//! mastering = 2000
//! artwork = 1000
//!
//! [fees]
//! percentage_rate = 0.029
//! fixed_fee_per_order = 0.30
//!
//! [sales]
//! unit_price = 35
//! avg_units_per_order = 1.0
//! sell_through = 1.0
//! months = 8
//! # monthly_weights = [4, 3, 2, 1, 1, 1, 1, 1]
//!
//! [schedule]
//! release_date = "2026-03-13"
//! deposit_fraction = 0.5
//! deposit_offset = -4
//! balance_offset = -2
//! mastering_offset = -3
//! artwork_offset = -3
//!
//! [[schedule.marketing]]
//! offset = -1
//! fraction = 0.25
//! ```

use chrono::NaiveDate;
use pressplan_core::{
    CashFlowSchedule, CoreResult, FixedReleaseCosts, ManufacturingCost, MarketingSlice, Money,
    PaymentOffsets, PaymentProcessorFees, Rate, ReleasePlan, SalesPlan,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};

use crate::error::ConfigError;

/// Environment variable naming the scenario file.
pub const CONFIG_PATH_VAR: &str = "PRESSPLAN_CONFIG";

// =============================================================================
// Sections
// =============================================================================

/// `[manufacturing]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManufacturingSection {
    pub units: u32,
    pub total_cost: Decimal,
}

impl Default for ManufacturingSection {
    fn default() -> Self {
        let run = ManufacturingCost::default();
        Self {
            units: run.units(),
            total_cost: run.total_cost().amount(),
        }
    }
}

/// `[fixed_costs]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixedCostsSection {
    pub marketing: Decimal,
    pub mastering: Decimal,
    pub artwork: Decimal,
}

impl Default for FixedCostsSection {
    fn default() -> Self {
        let fixed = FixedReleaseCosts::default();
        Self {
            marketing: fixed.marketing().amount(),
            mastering: fixed.mastering().amount(),
            artwork: fixed.artwork().amount(),
        }
    }
}

/// `[fees]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeesSection {
    /// Fraction of gross, `0.029` = 2.9%.
    pub percentage_rate: Decimal,
    pub fixed_fee_per_order: Decimal,
}

impl Default for FeesSection {
    fn default() -> Self {
        let fees = PaymentProcessorFees::default();
        Self {
            percentage_rate: fees.percentage_rate().fraction(),
            fixed_fee_per_order: fees.fixed_fee_per_order().amount(),
        }
    }
}

/// `[sales]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SalesSection {
    pub unit_price: Decimal,
    pub avg_units_per_order: Decimal,
    pub sell_through: Decimal,
    pub months: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_weights: Option<Vec<Decimal>>,
}

impl Default for SalesSection {
    fn default() -> Self {
        let plan = SalesPlan::default();
        Self {
            unit_price: plan.unit_price().amount(),
            avg_units_per_order: plan.avg_units_per_order(),
            sell_through: plan.sell_through_fraction(),
            months: plan.sales_window_months(),
            monthly_weights: None,
        }
    }
}

/// `[schedule]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleSection {
    /// Defaults to the day the report runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<NaiveDate>,
    pub deposit_fraction: Decimal,
    pub deposit_offset: i32,
    pub balance_offset: i32,
    pub mastering_offset: i32,
    pub artwork_offset: i32,
    pub marketing: Vec<MarketingSlice>,
}

impl Default for ScheduleSection {
    fn default() -> Self {
        let offsets = PaymentOffsets::default();
        Self {
            release_date: None,
            deposit_fraction: Decimal::new(5, 1),
            deposit_offset: offsets.manufacturing_deposit,
            balance_offset: offsets.manufacturing_balance,
            mastering_offset: offsets.mastering,
            artwork_offset: offsets.artwork,
            marketing: MarketingSlice::default_profile(),
        }
    }
}

// =============================================================================
// Scenario
// =============================================================================

/// A complete release scenario as read from disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub manufacturing: ManufacturingSection,
    pub fixed_costs: FixedCostsSection,
    pub fees: FeesSection,
    pub sales: SalesSection,
    pub schedule: ScheduleSection,
}

impl ScenarioConfig {
    /// Loads the scenario from file and environment.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Scenario file, if one is found
    /// 3. `PRESSPLAN_*` environment variables
    ///
    /// A path given explicitly must exist; the platform default path may be
    /// absent.
    pub fn load(explicit_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = match explicit_path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound(path));
                }
                Self::from_file(&path)?
            }
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                path => {
                    debug!(?path, "No scenario file found, using defaults");
                    Self::default()
                }
            },
        };

        config.apply_overrides(|var| std::env::var(var).ok())?;

        Ok(config)
    }

    /// Parses a scenario file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        info!(?path, "Loading scenario file");
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Applies `PRESSPLAN_*` overrides read through `lookup`.
    ///
    /// Values that don't parse are errors, not silently ignored: a typo in a
    /// price would otherwise produce a plausible-looking wrong report.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("PRESSPLAN_RELEASE_DATE") {
            let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                .map_err(|_| invalid("PRESSPLAN_RELEASE_DATE", &raw))?;
            debug!(%date, "Overriding release date from environment");
            self.schedule.release_date = Some(date);
        }

        if let Some(raw) = lookup("PRESSPLAN_UNIT_PRICE") {
            self.sales.unit_price = parse_decimal("PRESSPLAN_UNIT_PRICE", &raw)?;
            debug!(price = %self.sales.unit_price, "Overriding unit price from environment");
        }

        if let Some(raw) = lookup("PRESSPLAN_SELL_THROUGH") {
            self.sales.sell_through = parse_decimal("PRESSPLAN_SELL_THROUGH", &raw)?;
            debug!(sell_through = %self.sales.sell_through, "Overriding sell-through from environment");
        }

        if let Some(raw) = lookup("PRESSPLAN_UNITS") {
            self.manufacturing.units = raw
                .trim()
                .parse()
                .map_err(|_| invalid("PRESSPLAN_UNITS", &raw))?;
            debug!(units = self.manufacturing.units, "Overriding unit count from environment");
        }

        Ok(())
    }

    /// Builds validated domain records. `today` fills in a missing release
    /// date.
    pub fn into_plan(self, today: NaiveDate) -> CoreResult<ReleasePlan> {
        let manufacturing = ManufacturingCost::new(
            self.manufacturing.units,
            Money::from_decimal(self.manufacturing.total_cost),
        )?;

        let fixed_costs = FixedReleaseCosts::new(
            Money::from_decimal(self.fixed_costs.marketing),
            Money::from_decimal(self.fixed_costs.mastering),
            Money::from_decimal(self.fixed_costs.artwork),
        )?;

        let fees = PaymentProcessorFees::new(
            Rate::from_fraction(self.fees.percentage_rate),
            Money::from_decimal(self.fees.fixed_fee_per_order),
        )?;

        let mut sales = SalesPlan::new(
            Money::from_decimal(self.sales.unit_price),
            self.sales.avg_units_per_order,
            self.sales.sell_through,
            self.sales.months,
        )?;
        if let Some(weights) = self.sales.monthly_weights {
            sales = sales.with_monthly_weights(weights)?;
        }

        let release_date = self.schedule.release_date.unwrap_or(today);
        let schedule = CashFlowSchedule::new(
            release_date,
            self.schedule.deposit_fraction,
            PaymentOffsets {
                manufacturing_deposit: self.schedule.deposit_offset,
                manufacturing_balance: self.schedule.balance_offset,
                mastering: self.schedule.mastering_offset,
                artwork: self.schedule.artwork_offset,
            },
            self.schedule.marketing,
        )?;

        Ok(ReleasePlan {
            manufacturing,
            fixed_costs,
            sales,
            fees,
            schedule,
        })
    }

    /// Resolves which scenario file to read: argument, then
    /// `$PRESSPLAN_CONFIG`.
    pub fn explicit_path(argument: Option<PathBuf>) -> Option<PathBuf> {
        argument.or_else(|| std::env::var_os(CONFIG_PATH_VAR).map(PathBuf::from))
    }

    /// Platform config dir, e.g. `~/.config/pressplan/release.toml`.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "pressplan", "pressplan")
            .map(|dirs| dirs.config_dir().join("release.toml"))
    }
}

fn parse_decimal(var: &str, raw: &str) -> Result<Decimal, ConfigError> {
    Decimal::from_str(raw.trim()).map_err(|_| invalid(var, raw))
}

fn invalid(var: &str, raw: &str) -> ConfigError {
    ConfigError::InvalidValue {
        var: var.to_string(),
        value: raw.to_string(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
