//! 文件服务模块
//!
//! 本地文件系统后端

pub mod local;

pub use local::LocalFileProvider;
