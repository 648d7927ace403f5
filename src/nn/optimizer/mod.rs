/*
 * @Author       : 老董
 * @Date         : 2026-02-11
 * @Description  : 优化器模块，实现 PyTorch 风格的稀疏梯度优化算法
 */

mod base;
mod sparse_adam;

pub use base::Optimizer;
pub use sparse_adam::{SparseAdam, SparseAdamOptions};
