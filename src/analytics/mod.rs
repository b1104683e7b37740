//! 点击分析聚合引擎
//!
//! 拉取驱动的惰性重算：没有后台任务，日汇总行在被读取时按需物化或刷新。
//!
//! - `aggregator`：单个 (链接, 日期) 的取数/刷新算法与过期规则
//! - `range`：按日期区间与 30 天汇总窗口驱动聚合器，一次调用一个事务
//! - `recorder`：跳转成功后的点击事件落库（best-effort）
//! - `response`：对外返回的响应结构

pub mod aggregator;
pub mod range;
pub mod recorder;
pub mod response;

pub use aggregator::DailyAggregator;
pub use range::AnalyticsService;
pub use recorder::InteractionRecorder;
pub use response::{
    AnalyticSummaryResponse, DailyAnalyticResponse, DeviceBreakdownResponse, LinkTotalsResponse,
};
