/*
 * @Author       : 老董
 * @Date         : 2026-02-11
 * @Description  : nn 模块的错误类型
 */

use thiserror::Error;

/// 训练侧操作的错误类型
#[derive(Error, Debug, PartialEq, Eq)]
pub enum NnError {
    /// 算法不支持当前输入的形态（如：需要稀疏梯度却拿到了稠密梯度）
    #[error("不支持的操作：{0}")]
    UnsupportedOperation(String),

    /// 在不该执行的上下文中执行了操作（如：梯度记录开启时对叶子参数做原地更新）
    #[error("非法操作：{0}")]
    InvalidOperation(String),

    #[error("形状不一致：期望{expected:?}，实际{got:?}。{message}")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
        message: String,
    },

    /// 归档（序列化/反序列化）失败
    #[error("归档错误：{0}")]
    ArchiveError(String),
}
