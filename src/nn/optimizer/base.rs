/*
 * @Author       : 老董
 * @Date         : 2026-02-11
 * @Description  : 优化器核心 trait
 */

use super::super::archive::{InputArchive, OutputArchive};
use super::super::error::NnError;

/// Optimizer trait（PyTorch 风格）
///
/// # 设计要点
/// - Optimizer 构造时绑定特定参数（句柄克隆），`step()`只更新绑定的参数；
/// - 梯度由外部反向传播生产、经`Parameter::set_grad`附着，
///   `step()`消费之、`zero_grad()`清除之；
/// - 每个优化器家族自管一套状态缓冲，并实现一对save/load与归档层对接。
///
/// # 使用示例
/// ```ignore
/// let mut optimizer = SparseAdam::new(&params, SparseAdamOptions::new(0.01));
///
/// // 训练循环
/// optimizer.zero_grad();
/// // ...（外部反向传播，为每个参数附着稀疏梯度）...
/// optimizer.step()?;
/// ```
pub trait Optimizer {
    /// 清除所有绑定参数的梯度
    fn zero_grad(&mut self);

    /// 执行一次参数更新（消费当前已附着的梯度）
    fn step(&mut self) -> Result<(), NnError>;

    /// 获取学习率
    fn learning_rate(&self) -> f32;

    /// 设置学习率
    fn set_learning_rate(&mut self, lr: f32);

    /// 重置累积状态（如矩估计与步数计数）
    fn reset(&mut self);

    /// 将优化器状态按字段名写入归档
    fn save(&self, archive: &mut OutputArchive) -> Result<(), NnError>;

    /// 从归档整体替换优化器状态（非合并）
    fn load(&mut self, archive: &InputArchive) -> Result<(), NnError>;
}
