use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Individual annual income threshold for accreditation (USD)
pub const INDIVIDUAL_INCOME_THRESHOLD: Decimal = dec!(200000);

/// Joint (spousal) annual income threshold for accreditation (USD)
pub const JOINT_INCOME_THRESHOLD: Decimal = dec!(300000);

/// Net worth threshold for accreditation, excluding primary residence (USD)
pub const NET_WORTH_THRESHOLD: Decimal = dec!(1000000);

/// Net worth at which an individual is classified as a qualified purchaser (USD)
pub const QUALIFIED_PURCHASER_THRESHOLD: Decimal = dec!(5000000);

/// Total assets threshold for entities (USD)
pub const ENTITY_ASSETS_THRESHOLD: Decimal = dec!(5000000);

/// Total assets threshold for trusts (USD)
pub const TRUST_ASSETS_THRESHOLD: Decimal = dec!(5000000);

/// Decimal precision for ownership and dilution percentages
pub const DECIMAL_PRECISION: u32 = 6;

/// Decimal precision for display
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Allowed drift, in percentage points, when summing ownership to 100%
pub const OWNERSHIP_TOLERANCE: Decimal = dec!(0.01);

/// Dilution percent at which severity becomes medium
pub const SEVERITY_MEDIUM_FROM: Decimal = dec!(5);

/// Dilution percent at which severity becomes high
pub const SEVERITY_HIGH_FROM: Decimal = dec!(15);

/// Dilution percent at which severity becomes severe
pub const SEVERITY_SEVERE_FROM: Decimal = dec!(30);

/// Display name used when an issuance has no named incoming investors
pub const UNNAMED_INVESTOR_LABEL: &str = "New investors";
