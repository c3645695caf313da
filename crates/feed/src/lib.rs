//! # `navgate-feed` - 上游基金行情
//!
//! RapidAPI "latest-mutual-fund-nav" 接口的 `FundDataProvider` 实现。

pub mod rapidapi;
