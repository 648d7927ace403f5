//! # Sparse Torch
//!
//! `sparse_torch`项目旨在用纯rust实现[pytorch](https://pytorch.org)风格的
//! 稀疏梯度优化器（SparseAdam）：只在梯度的非零坐标处维护一阶/二阶矩滑动平均，
//! 并以偏差修正后的自适应步长原地更新参数。
//! 附带其运转所需的最小张量内核（稠密/稀疏）、参数句柄与优化器状态归档。
//!

pub mod errors;
pub mod nn;
pub mod tensor;
