//! 浏览器环境辅助：panic hook、控制台日志、计时。

pub fn set_panic_hook() {
    // 首次 panic 时把错误信息输出到浏览器控制台。
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// 输出到浏览器控制台；非 wasm 目标（原生测试）下不输出。
pub fn log(message: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::log_1(&message.into());
    #[cfg(not(target_arch = "wasm32"))]
    let _ = message;
}

pub fn warn(message: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::warn_1(&message.into());
    #[cfg(not(target_arch = "wasm32"))]
    let _ = message;
}

/// wasm 中 `std::time::Instant` 不可用，改用 `Date.now()`。
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    #[cfg(target_arch = "wasm32")]
    started_ms: f64,
    #[cfg(not(target_arch = "wasm32"))]
    started: std::time::Instant,
}

impl Stopwatch {
    pub fn start() -> Self {
        Self {
            #[cfg(target_arch = "wasm32")]
            started_ms: web_sys::js_sys::Date::now(),
            #[cfg(not(target_arch = "wasm32"))]
            started: std::time::Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        #[cfg(target_arch = "wasm32")]
        {
            (web_sys::js_sys::Date::now() - self.started_ms).max(0.0) as u64
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            self.started.elapsed().as_millis() as u64
        }
    }
}
