//! 应用层：连接 kernel 与运行时

mod workbench;

pub use workbench::{Subscription, Workbench, WorkbenchEvent};
