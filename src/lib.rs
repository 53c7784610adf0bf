//! codepad - 单工作区代码编辑器的无界面核心
//!
//! 模块结构：
//! - models: 数据模型（FileTree）
//! - kernel: 状态 / Action / Effect / Store，以及 services（ports + adapters）
//! - app: 应用层（Workbench：执行副作用、订阅）

pub mod app;
pub mod kernel;
pub mod models;
