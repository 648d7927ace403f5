/*
 * @Author       : 老董
 * @Date         : 2026-02-11
 * @Description  : 负责训练侧的构件：参数句柄、梯度、no-grad作用域、
 *                 优化器（SparseAdam）与状态归档
 */

mod archive;
mod autograd;
mod error;
pub mod optimizer;
mod parameter;

pub use archive::{InputArchive, OutputArchive};
pub use autograd::{NoGradGuard, is_grad_enabled};
pub use error::NnError;
pub use optimizer::{Optimizer, SparseAdam, SparseAdamOptions};
pub use parameter::{Grad, Parameter};
