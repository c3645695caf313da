//! # 凭据校验与 Token 服务

pub mod credential;
pub mod token;
