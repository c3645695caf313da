//! # `navgate-cache` - 进程级缓存
//!
//! 启动时写入一次、之后只读的基金家族名称缓存。

pub mod family;
