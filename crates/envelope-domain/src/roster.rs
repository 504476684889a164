//! Reference bucket roster and well-known bucket ids.

use crate::{bucket::*, money::Money};

pub const RENT: &str = "rent";
pub const WIFI: &str = "wifi";
pub const ELEC: &str = "elec";
pub const VAPE: &str = "vape";
pub const DAILY: &str = "daily";
pub const MEAL: &str = "meal";
pub const MAID: &str = "maid";
pub const SAVINGS: &str = "savings";

/// Cap restored on the daily allowance at month reset.
pub const DAILY_DEFAULT_TARGET: Money = Money::from_units(600);

/// The eight-bucket roster a fresh wallet starts with.
pub fn reference_roster() -> BucketSet {
    BucketSet::new(vec![
        Bucket::new(RENT, "Rent", Some(Money::from_units(2150)), 1)
            .with_style("fa-house", "from-blue-500 to-indigo-600"),
        Bucket::new(WIFI, "WiFi/Trash", Some(Money::from_units(115)), 2)
            .with_style("fa-wifi", "from-cyan-500 to-blue-600"),
        Bucket::new(ELEC, "Electricity", Some(Money::from_units(200)), 3)
            .with_style("fa-bolt", "from-amber-400 to-orange-500"),
        Bucket::new(VAPE, "Vape Supplies", Some(Money::from_units(2500)), 4)
            .with_style("fa-wind", "from-purple-500 to-pink-600"),
        Bucket::new(DAILY, "Daily Allowance", Some(DAILY_DEFAULT_TARGET), 5)
            .with_style("fa-wallet", "from-emerald-500 to-teal-600"),
        Bucket::new(MEAL, "Meal/Mess", Some(Money::from_units(3500)), 6)
            .with_style("fa-utensils", "from-rose-500 to-orange-600"),
        Bucket::new(MAID, "Maid/Khala", Some(Money::from_units(600)), 7)
            .with_style("fa-broom", "from-sky-500 to-blue-400"),
        Bucket::new(SAVINGS, "Extra Savings", None, 8)
            .with_style("fa-piggy-bank", "from-yellow-400 to-emerald-500"),
    ])
}
