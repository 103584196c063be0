//! 定时器封装模块
//!
//! 基于 `gloo-timers` 的周期性定时器，以 `Duration` 表示间隔。

use gloo_timers::callback;
use std::time::Duration;

/// 周期性定时器
///
/// 封装 `setInterval` API。当 `Interval` 被 drop 时，自动清除定时器。
pub struct Interval {
    _inner: callback::Interval,
}

impl Interval {
    /// 创建新的周期性定时器
    ///
    /// # 参数
    /// - `period`: 间隔时间
    /// - `callback`: 每次间隔触发的回调函数
    pub fn new<F>(period: Duration, callback: F) -> Self
    where
        F: FnMut() + 'static,
    {
        let millis = u32::try_from(period.as_millis()).unwrap_or(u32::MAX);
        Self {
            _inner: callback::Interval::new(millis, callback),
        }
    }
}
