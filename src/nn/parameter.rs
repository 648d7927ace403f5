/*
 * @Author       : 老董
 * @Date         : 2026-02-11
 * @Description  : 可训练参数句柄与附着其上的梯度。
 *                 参数由训练循环创建并持有，优化器只持句柄（Rc克隆）并原地改写其值。
 */

use std::cell::RefCell;
use std::rc::Rc;

use super::autograd::is_grad_enabled;
use super::error::NnError;
use crate::tensor::{SparseTensor, Tensor};

/// 附着在参数上的梯度，可为稠密或稀疏两种形态
#[derive(Debug, Clone)]
pub enum Grad {
    Dense(Tensor),
    Sparse(SparseTensor),
}

impl Grad {
    /// 梯度的整体（逻辑）形状
    pub fn shape(&self) -> &[usize] {
        match self {
            Grad::Dense(tensor) => tensor.shape(),
            Grad::Sparse(sparse) => sparse.shape(),
        }
    }

    pub fn is_sparse(&self) -> bool {
        matches!(self, Grad::Sparse(_))
    }
}

/// 可训练参数句柄
///
/// # 设计要点
/// - 内部为 `Rc<RefCell<..>>`，Clone 语义（非 Copy）但开销极低（Rc clone），
///   克隆出的句柄指向同一份存储；
/// - 值张量由句柄独占管理，外部只能通过`value()`取快照、
///   或在 no-grad 作用域内经优化器原地更新；
/// - 梯度由反向传播的生产方通过`set_grad()`附着，由`zero_grad()`清除。
#[derive(Debug, Clone)]
pub struct Parameter {
    inner: Rc<RefCell<ParamInner>>,
}

#[derive(Debug)]
struct ParamInner {
    value: Tensor,
    grad: Option<Grad>,
    name: Option<String>,
}

impl Parameter {
    /// 以给定初值创建参数（无名）
    pub fn new(value: Tensor) -> Self {
        Self::create(value, None)
    }

    /// 以给定初值和名称创建参数
    pub fn new_named(value: Tensor, name: &str) -> Self {
        Self::create(value, Some(name.to_string()))
    }

    fn create(value: Tensor, name: Option<String>) -> Self {
        Parameter {
            inner: Rc::new(RefCell::new(ParamInner {
                value,
                grad: None,
                name,
            })),
        }
    }

    pub fn name(&self) -> Option<String> {
        self.inner.borrow().name.clone()
    }

    pub fn shape(&self) -> Vec<usize> {
        self.inner.borrow().value.shape().to_vec()
    }

    /// 取当前值的快照（克隆）
    pub fn value(&self) -> Tensor {
        self.inner.borrow().value.clone()
    }

    /// 取当前梯度的快照（克隆），未附着梯度时返回None
    pub fn grad(&self) -> Option<Grad> {
        self.inner.borrow().grad.clone()
    }

    /// 附着梯度。梯度的整体形状必须与参数形状严格一致。
    pub fn set_grad(&self, grad: Grad) -> Result<(), NnError> {
        let mut inner = self.inner.borrow_mut();
        if grad.shape() != inner.value.shape() {
            return Err(NnError::ShapeMismatch {
                expected: inner.value.shape().to_vec(),
                got: grad.shape().to_vec(),
                message: "梯度形状须与参数形状一致".to_string(),
            });
        }
        inner.grad = Some(grad);
        Ok(())
    }

    /// 清除已附着的梯度（优化器`zero_grad`或训练循环在下次反向前调用）
    pub fn zero_grad(&self) {
        self.inner.borrow_mut().grad = None;
    }

    /// 原地更新参数值。叶子参数的原地修改不允许被微分图记录，
    /// 因此梯度记录开启时调用会失败——调用方须先进入`NoGradGuard`作用域。
    pub(crate) fn update_value(
        &self,
        update: impl FnOnce(&mut Tensor),
    ) -> Result<(), NnError> {
        if is_grad_enabled() {
            return Err(NnError::InvalidOperation(
                "梯度记录开启时不允许对叶子参数做原地更新，请在NoGradGuard作用域内执行"
                    .to_string(),
            ));
        }
        update(&mut self.inner.borrow_mut().value);
        Ok(())
    }
}
