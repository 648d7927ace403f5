/*
 * @Author       : 老董
 * @Date         : 2026-02-10
 * @Description  : 沿第0维的行级索引与原地更新。稀疏坐标（每个坐标对应第0维的一行）
 *                 的读取/写回都经由本文件的方法完成。
 */

use super::Tensor;
use ndarray::Axis;

// 克隆式索引
impl Tensor {
    /// 读取单个元素。`indices`的长度必须等于张量的阶数，且逐维在界内，否则panic。
    pub fn get(&self, indices: &[usize]) -> f32 {
        self.data[indices]
    }

    /// 沿第0维取出第`index`行，返回“克隆”的张量，形状为原形状去掉第0维。
    /// 如：形状[5, 3]的张量取行后形状为[3]；形状[5]的张量取行后为标量（形状[]）。
    pub fn row(&self, index: usize) -> Tensor {
        assert!(
            self.dimension() >= 1,
            "标量没有第0维，无法按行索引"
        );
        Tensor {
            data: self.data.index_axis(Axis(0), index).to_owned(),
        }
    }

    /// 沿第0维按`indices`给出的顺序收集多行，返回形状为[indices.len(), ...]的新张量。
    /// `indices`允许重复，重复的行会被克隆多份。
    pub fn select_rows(&self, indices: &[usize]) -> Tensor {
        assert!(
            self.dimension() >= 1,
            "标量没有第0维，无法按行索引"
        );
        Tensor {
            data: self.data.select(Axis(0), indices),
        }
    }
}

// 原地行更新
impl Tensor {
    /// 将`rhs`逐元素加到第`index`行上（原地）。
    /// `rhs`的形状必须与单行的形状严格一致，否则panic。
    pub fn row_add_assign(&mut self, index: usize, rhs: &Tensor) {
        let mut row = self.data.index_axis_mut(Axis(0), index);
        assert!(
            row.shape() == rhs.shape(),
            "行形状不一致，故无法自相加：行的形状为{:?}，右操作数的形状为{:?}",
            row.shape(),
            rhs.shape()
        );
        row += &rhs.data;
    }

    /// 从第`index`行逐元素减去`rhs`（原地）。
    /// `rhs`的形状必须与单行的形状严格一致，否则panic。
    pub fn row_sub_assign(&mut self, index: usize, rhs: &Tensor) {
        let mut row = self.data.index_axis_mut(Axis(0), index);
        assert!(
            row.shape() == rhs.shape(),
            "行形状不一致，故无法自相减：行的形状为{:?}，右操作数的形状为{:?}",
            row.shape(),
            rhs.shape()
        );
        row -= &rhs.data;
    }
}
