mod helpers;
mod rupees;
mod secret;

pub use helpers::parse_boolean_flag;
pub use rupees::{Rupees, RupeesConversionError, RUPEE_CURRENCY_CODE, RUPEE_SYMBOL};
pub use secret::Secret;
