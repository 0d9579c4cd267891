/// Decimal precision for valuation calculations
pub const DECIMAL_PRECISION: u32 = 6;

/// Decimal precision for display
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Decimal precision for percentages (returns, intensities)
pub const PERCENT_PRECISION: u32 = 4;

/// Default number of days per year used for term fractions
pub const DEFAULT_DAY_COUNT_BASIS: u32 = 365;

/// Indian rupee currency code
pub const CURRENCY_INR: &str = "INR";

/// US dollar currency code
pub const CURRENCY_USD: &str = "USD";

/// Category label used when an expense's tag id has no matching tag record
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// Longest recurring-deposit schedule accepted (100 years of monthly installments)
pub const MAX_TOTAL_INSTALLMENTS: u32 = 1_200;

/// Longest custom recurring-deposit period, in days
pub const MAX_CUSTOM_FREQUENCY_DAYS: u32 = 3_660;
