use crate::tensor::Tensor;
use ndarray::Zip;

impl From<f32> for Tensor {
    /// 实现 From<f32> trait 用于将`f32`类型转换为形状为`[1]`的张量
    fn from(scalar: f32) -> Self {
        Tensor::new(&[scalar], &[1])
    }
}

impl PartialEq for Tensor {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl Tensor {
    /// 对张量中的所有元素求和并返回一个形状为[1]的标量。
    pub fn sum(&self) -> Tensor {
        let mut value = 0.0;
        Zip::from(&self.data).for_each(|a| value += a);
        Tensor::from(value)
    }

    /// 逐元素幂运算，返回一个新的张量。如`pow(2.0)`即逐元素平方。
    pub fn pow(&self, exponent: f32) -> Tensor {
        Tensor {
            data: self.data.mapv(|x| x.powf(exponent)),
        }
    }

    /// 逐元素开平方，返回一个新的张量。负数元素会产生NaN（与ndarray/IEEE一致，不做检查）。
    pub fn sqrt(&self) -> Tensor {
        Tensor {
            data: self.data.mapv(f32::sqrt),
        }
    }
}
