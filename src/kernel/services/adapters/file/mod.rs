//! 文件服务模块
//!
//! 本地文件系统实现；内存实现只在测试里使用

pub mod local;

pub use local::LocalFileProvider;
