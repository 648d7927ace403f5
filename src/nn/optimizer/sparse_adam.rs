/*
 * @Author       : 老董
 * @Date         : 2026-02-11
 * @Description  : SparseAdam优化器实现：Adam的稀疏梯度变体。
 *                 只在梯度的非零坐标处维护一阶/二阶矩滑动平均并更新参数，
 *                 未被触及的坐标（参数与矩缓冲）保持逐位不变。
 */

use super::super::archive::{InputArchive, OutputArchive};
use super::super::autograd::NoGradGuard;
use super::super::error::NnError;
use super::super::parameter::{Grad, Parameter};
use super::base::Optimizer;
use crate::tensor::Tensor;

/// SparseAdam 的配置项
///
/// `learning_rate`无默认值，必须显式给出；其余字段带默认值，可在构造后按需覆盖。
/// 注：`weight_decay`与`amsgrad`目前只作为配置被接受与保存，更新公式尚未使用
/// （对应的`max_exp_average_sq_buffers`缓冲同样处于休眠状态）。
#[derive(Debug, Clone, PartialEq)]
pub struct SparseAdamOptions {
    /// 学习率（必填）
    pub learning_rate: f32,
    /// 一阶矩衰减系数
    pub beta1: f32,
    /// 二阶矩衰减系数
    pub beta2: f32,
    /// 权重衰减（当前算法未使用）
    pub weight_decay: f32,
    /// 数值稳定项
    pub eps: f32,
    /// amsgrad开关（当前算法未使用）
    pub amsgrad: bool,
}

impl SparseAdamOptions {
    pub fn new(learning_rate: f32) -> Self {
        SparseAdamOptions {
            learning_rate,
            beta1: 0.9,
            beta2: 0.999,
            weight_decay: 0.,
            eps: 1e-8,
            amsgrad: false,
        }
    }
}

/// SparseAdam 优化器
///
/// 与普通Adam的区别：梯度必须是稀疏张量，矩估计采用“只在非零坐标处”的
/// 惰性滑动平均——对坐标集中的每个坐标：
/// - m ← m + (g - m) * (1 - β1)
/// - v ← v + (g² - v) * (1 - β2)
/// - θ ← θ - lr * √(1-β2^t)/(1-β1^t) * m / (√v + ε)
///
/// 坐标集之外的条目完全不动。稠密梯度会被整体拒绝（`UnsupportedOperation`），
/// 请改用普通Adam。
///
/// # 状态布局
/// 四组并行集合按参数的注册序号索引（与`params`平行）。参数列表在构造时固定、
/// 只增不删，故按位置索引不会错位。某参数首次参与更新时，集合被零填充增长到
/// 该位置，保证三者（外加休眠的max缓冲）始终等长、从0号起连续无空洞。
///
/// # 使用示例
/// ```ignore
/// let embedding = Parameter::new(Tensor::zeros(&[10000, 8]));
/// let mut optimizer = SparseAdam::new(
///     &[embedding.clone()],
///     SparseAdamOptions::new(0.01),
/// );
///
/// // 训练循环
/// optimizer.zero_grad();
/// embedding.set_grad(Grad::Sparse(batch_grad))?;
/// optimizer.step()?;
/// ```
pub struct SparseAdam {
    /// 绑定的参数（句柄克隆，与状态集合平行）
    params: Vec<Parameter>,
    /// 配置项
    options: SparseAdamOptions,
    /// 每参数的更新步数
    step_buffers: Vec<u64>,
    /// 每参数的一阶矩滑动平均
    exp_average_buffers: Vec<Tensor>,
    /// 每参数的二阶矩滑动平均
    exp_average_sq_buffers: Vec<Tensor>,
    /// amsgrad变体预留的二阶矩最大值缓冲（当前算法不读不写，只随归档往返）
    max_exp_average_sq_buffers: Vec<Tensor>,
}

impl SparseAdam {
    /// 创建新的 SparseAdam 优化器，绑定给定参数
    pub fn new(params: &[Parameter], options: SparseAdamOptions) -> Self {
        SparseAdam {
            params: params.to_vec(),
            options,
            step_buffers: Vec::new(),
            exp_average_buffers: Vec::new(),
            exp_average_sq_buffers: Vec::new(),
            max_exp_average_sq_buffers: Vec::new(),
        }
    }

    /// 获取优化器绑定的参数列表
    pub fn params(&self) -> &[Parameter] {
        &self.params
    }

    /// 获取配置项
    pub fn options(&self) -> &SparseAdamOptions {
        &self.options
    }

    /// 第`index`号参数的更新步数（尚未建立状态时为0）
    pub fn step_count(&self, index: usize) -> u64 {
        self.step_buffers.get(index).copied().unwrap_or(0)
    }

    /// 第`index`号参数的一阶矩估计（尚未建立状态时为None）
    ///
    /// 用于调试和可视化优化过程
    pub fn exp_average(&self, index: usize) -> Option<&Tensor> {
        self.exp_average_buffers.get(index)
    }

    /// 第`index`号参数的二阶矩估计（尚未建立状态时为None）
    ///
    /// 用于调试和可视化优化过程
    pub fn exp_average_sq(&self, index: usize) -> Option<&Tensor> {
        self.exp_average_sq_buffers.get(index)
    }

    /// 将状态集合零填充增长到覆盖`index`号参数。
    /// 不变式：四组集合始终等长，且与参数列表前缀平行。
    fn ensure_state_through(&mut self, index: usize) {
        while self.step_buffers.len() <= index {
            let shape = self.params[self.step_buffers.len()].shape();
            self.step_buffers.push(0);
            self.exp_average_buffers.push(Tensor::zeros(&shape));
            self.exp_average_sq_buffers.push(Tensor::zeros(&shape));
            self.max_exp_average_sq_buffers.push(Tensor::zeros(&shape));
        }
    }
}

impl Optimizer for SparseAdam {
    fn zero_grad(&mut self) {
        for param in &self.params {
            param.zero_grad();
        }
    }

    /// 按注册顺序对每个带梯度的参数执行一次更新。
    ///
    /// 无梯度的参数整体跳过（不建状态、不计步数）；遇到稠密梯度立即以
    /// `UnsupportedOperation`中止整个调用——此时更靠后的参数尚未被访问，
    /// 不会出现“部分参数已更新、部分被静默跳过”的不一致局面。
    fn step(&mut self) -> Result<(), NnError> {
        for i in 0..self.params.len() {
            let param = self.params[i].clone();
            let grad = match param.grad() {
                None => continue,
                Some(grad) => grad,
            };
            let grad = match grad {
                Grad::Sparse(sparse) => sparse,
                Grad::Dense(_) => {
                    return Err(NnError::UnsupportedOperation(
                        "SparseAdam不支持稠密梯度，请考虑改用Adam".to_string(),
                    ));
                }
            };

            self.ensure_state_through(i);
            self.step_buffers[i] += 1;
            let step = self.step_buffers[i];
            let bias_correction1 = 1. - self.options.beta1.powi(step as i32);
            let bias_correction2 = 1. - self.options.beta2.powi(step as i32);

            // 更新参数属于叶子值的原地修改，必须整体处于no-grad作用域内
            let _guard = NoGradGuard::new();

            let grad = grad.coalesce();
            let indices = grad.indices().to_vec();
            let values = grad.values().clone();

            // 一阶矩：m ← m + (g - m) * (1 - β1)，只在坐标集内
            let old_exp_average_values = self.exp_average_buffers[i].sparse_mask(&grad);
            let exp_average_update_values =
                (&values - &old_exp_average_values) * (1. - self.options.beta1);
            let exp_average = &mut self.exp_average_buffers[i];
            for (j, &index) in indices.iter().enumerate() {
                exp_average.row_add_assign(index, &exp_average_update_values.row(j));
            }

            // 二阶矩：v ← v + (g² - v) * (1 - β2)，只在坐标集内
            let old_exp_average_sq_values = self.exp_average_sq_buffers[i].sparse_mask(&grad);
            let exp_average_sq_update_values =
                (&values.pow(2.) - &old_exp_average_sq_values) * (1. - self.options.beta2);
            let exp_average_sq = &mut self.exp_average_sq_buffers[i];
            for (j, &index) in indices.iter().enumerate() {
                exp_average_sq.row_add_assign(index, &exp_average_sq_update_values.row(j));
            }

            // numer/denom即更新后的矩在坐标集内的取值
            let numer = &exp_average_update_values + &old_exp_average_values;
            let denom = (&exp_average_sq_update_values + &old_exp_average_sq_values).sqrt()
                + self.options.eps;
            let step_size =
                self.options.learning_rate * bias_correction2.sqrt() / bias_correction1;
            let divided = &numer / &denom;

            param.update_value(|value| {
                for (j, &index) in indices.iter().enumerate() {
                    value.row_sub_assign(index, &(divided.row(j) * step_size));
                }
            })?;
        }
        Ok(())
    }

    fn learning_rate(&self) -> f32 {
        self.options.learning_rate
    }

    fn set_learning_rate(&mut self, lr: f32) {
        self.options.learning_rate = lr;
    }

    fn reset(&mut self) {
        self.step_buffers.clear();
        self.exp_average_buffers.clear();
        self.exp_average_sq_buffers.clear();
        self.max_exp_average_sq_buffers.clear();
    }

    fn save(&self, archive: &mut OutputArchive) -> Result<(), NnError> {
        archive.write("step_buffers", &self.step_buffers)?;
        archive.write("exp_average_buffers", &self.exp_average_buffers)?;
        archive.write("exp_average_sq_buffers", &self.exp_average_sq_buffers)?;
        archive.write(
            "max_exp_average_sq_buffers",
            &self.max_exp_average_sq_buffers,
        )?;
        Ok(())
    }

    fn load(&mut self, archive: &InputArchive) -> Result<(), NnError> {
        let step_buffers: Vec<u64> = archive.read("step_buffers")?;
        let exp_average_buffers: Vec<Tensor> = archive.read("exp_average_buffers")?;
        let exp_average_sq_buffers: Vec<Tensor> = archive.read("exp_average_sq_buffers")?;
        let max_exp_average_sq_buffers: Vec<Tensor> =
            archive.read("max_exp_average_sq_buffers")?;

        let len = step_buffers.len();
        if exp_average_buffers.len() != len
            || exp_average_sq_buffers.len() != len
            || max_exp_average_sq_buffers.len() != len
        {
            return Err(NnError::ArchiveError(
                "优化器状态的四组集合长度不一致".to_string(),
            ));
        }
        if len > self.params.len() {
            return Err(NnError::ArchiveError(format!(
                "归档中的状态数量（{len}）超过了绑定参数的数量（{}）",
                self.params.len()
            )));
        }
        for (i, buffer) in exp_average_buffers.iter().enumerate() {
            let expected = self.params[i].shape();
            if buffer.shape() != &expected[..] {
                return Err(NnError::ShapeMismatch {
                    expected,
                    got: buffer.shape().to_vec(),
                    message: format!("归档中第{i}号参数的矩缓冲形状与参数不符"),
                });
            }
        }

        // 整体替换而非合并
        self.step_buffers = step_buffers;
        self.exp_average_buffers = exp_average_buffers;
        self.exp_average_sq_buffers = exp_average_sq_buffers;
        self.max_exp_average_sq_buffers = max_exp_average_sq_buffers;
        Ok(())
    }
}
