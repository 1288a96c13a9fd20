/*
 * @Date         : 2026-03-02
 * @Description  : 线程内的梯度追踪开关（no_grad 上下文）
 */

use std::cell::Cell;

thread_local! {
    static GRAD_ENABLED: Cell<bool> = const { Cell::new(true) };
}

/// 当前线程是否开启梯度追踪
pub fn is_grad_enabled() -> bool {
    GRAD_ENABLED.with(Cell::get)
}

/// 在 no_grad 上下文中执行闭包，结束后恢复之前的状态（可嵌套）
///
/// # 使用示例
/// ```ignore
/// let y = no_grad(|| &x * 2.0);
/// assert!(!y.requires_grad());
/// ```
pub fn no_grad<F, R>(f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = NoGradGuard::new();
    f()
}

/// RAII 形式的 no_grad：存活期间关闭梯度追踪，drop 时恢复
#[must_use = "guard 被立即 drop 时 no_grad 不会生效"]
pub struct NoGradGuard {
    prev: bool,
}

impl NoGradGuard {
    pub fn new() -> Self {
        let prev = GRAD_ENABLED.with(|enabled| enabled.replace(false));
        Self { prev }
    }
}

impl Default for NoGradGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for NoGradGuard {
    fn drop(&mut self) {
        GRAD_ENABLED.with(|enabled| enabled.set(self.prev));
    }
}
