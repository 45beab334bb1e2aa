pub mod pms;
pub mod turnover;
