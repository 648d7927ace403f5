/*
 * @Author       : 老董
 * @Date         : 2026-02-11
 * @Description  : 梯度记录开关与 no-grad 作用域守卫。
 *                 优化器更新参数属于“叶子值的原地修改”，不应被记入微分图，
 *                 因此必须在 NoGradGuard 的作用域内执行。
 */

use std::cell::Cell;

thread_local! {
    static GRAD_ENABLED: Cell<bool> = const { Cell::new(true) };
}

/// 当前线程是否开启梯度记录（默认开启）
pub fn is_grad_enabled() -> bool {
    GRAD_ENABLED.with(Cell::get)
}

/// no-grad 作用域守卫（RAII）
///
/// 构造时关闭当前线程的梯度记录，drop 时恢复到构造前的状态，
/// 因此嵌套使用和提前unwind（panic）都是安全的。
///
/// # 使用示例
/// ```
/// use sparse_torch::nn::{NoGradGuard, is_grad_enabled};
///
/// assert!(is_grad_enabled());
/// {
///     let _guard = NoGradGuard::new();
///     assert!(!is_grad_enabled());
/// }
/// assert!(is_grad_enabled());
/// ```
pub struct NoGradGuard {
    prev: bool,
}

impl NoGradGuard {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let prev = GRAD_ENABLED.with(|flag| flag.replace(false));
        NoGradGuard { prev }
    }
}

impl Drop for NoGradGuard {
    fn drop(&mut self) {
        GRAD_ENABLED.with(|flag| flag.set(self.prev));
    }
}
