mod banxico;
mod exchangerate;

pub use banxico::{BanxicoAdapter, DEFAULT_BANXICO_URL};
pub use exchangerate::{ExchangeRateApiAdapter, DEFAULT_EXCHANGERATE_URL};
