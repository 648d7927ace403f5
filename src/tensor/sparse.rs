/*
 * @Author       : 老董
 * @Date         : 2026-02-10
 * @Description  : COO（坐标表）格式的稀疏张量。只沿第0维稀疏：每个坐标对应第0维的
 *                 一个非零行，`values`按行与坐标一一对应。这正是embedding类梯度的
 *                 天然形态（一个batch只触及少数几行）。
 */

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Tensor;
use crate::errors::TensorError;

/// 沿第0维稀疏的COO张量。
///
/// # 表示
/// - `shape`: 整体（逻辑）形状，如[10000, 8]；
/// - `indices`: 非零行在第0维上的坐标列表，允许重复、允许乱序（未规范化）；
/// - `values`: 形状为[nnz, shape[1..]...]的稠密值块，第j行对应坐标`indices[j]`。
///
/// # 规范化（coalesce）
/// 调用`coalesce()`后坐标严格递增、无重复、无显式零行，此后`is_coalesced()`为true。
/// 消费稀疏梯度的算法（如`SparseAdam`）应先规范化再使用。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SparseTensor {
    shape: Vec<usize>,
    indices: Vec<usize>,
    values: Tensor,
    coalesced: bool,
}

impl SparseTensor {
    /// 创建一个稀疏张量。
    ///
    /// # 校验
    /// - `shape`至少为1阶；
    /// - `values`的行数必须等于`indices`的长度；
    /// - `values`去掉第0维后的形状必须与`shape[1..]`一致；
    /// - 每个坐标必须落在`[0, shape[0])`内。
    pub fn new(
        indices: Vec<usize>,
        values: Tensor,
        shape: Vec<usize>,
    ) -> Result<SparseTensor, TensorError> {
        if shape.is_empty() {
            return Err(TensorError::InconsitentShape);
        }
        let value_rows = values.shape().first().copied().unwrap_or(0);
        if values.dimension() == 0 || value_rows != indices.len() {
            return Err(TensorError::SparseIndexValueMismatch {
                index_count: indices.len(),
                value_rows,
            });
        }
        if values.shape()[1..] != shape[1..] {
            return Err(TensorError::SparseValueShapeMismatch {
                values_shape: values.shape().to_vec(),
                shape,
            });
        }
        if let Some(&index) = indices.iter().find(|&&index| index >= shape[0]) {
            return Err(TensorError::SparseIndexOutOfRange {
                index,
                dim0: shape[0],
            });
        }
        Ok(SparseTensor {
            shape,
            indices,
            values,
            coalesced: false,
        })
    }

    /// 整体（逻辑）形状
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// 非零行的坐标列表（规范化前可能含重复坐标）
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// 非零行的值块，形状为[nnz, shape[1..]...]
    pub fn values(&self) -> &Tensor {
        &self.values
    }

    /// 非零行的数量（规范化前按坐标条目数计）
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    /// 是否已规范化（坐标严格递增、无重复、无显式零行）
    pub fn is_coalesced(&self) -> bool {
        self.coalesced
    }

    /// 规范化：重复坐标的值行求和合并、全零行丢弃、坐标按升序排列。
    /// 对已规范化的张量直接返回克隆（幂等）。
    pub fn coalesce(&self) -> SparseTensor {
        if self.coalesced {
            return self.clone();
        }

        // 按坐标归并（BTreeMap保证输出坐标升序）。
        // 注意直接在ndarray层累加：行可能是0维（1阶张量的行是标量），
        // 走运算符重载会把0维结果升成[1]，导致行形状与值块不再一致。
        let mut merged: BTreeMap<usize, Tensor> = BTreeMap::new();
        for (j, &index) in self.indices.iter().enumerate() {
            let row = self.values.row(j);
            merged
                .entry(index)
                .and_modify(|acc| acc.data = &acc.data + &row.data)
                .or_insert(row);
        }
        merged.retain(|_, row| row.data.iter().any(|&x| x != 0.));

        let row_shape = &self.values.shape()[1..];
        let mut values_shape = vec![merged.len()];
        values_shape.extend_from_slice(row_shape);
        let mut values = Tensor::zeros(&values_shape);
        let mut indices = Vec::with_capacity(merged.len());
        for (k, (index, row)) in merged.into_iter().enumerate() {
            values.row_add_assign(k, &row);
            indices.push(index);
        }

        SparseTensor {
            shape: self.shape.clone(),
            indices,
            values,
            coalesced: true,
        }
    }

    /// 展开为稠密张量（坐标处取值行、其余为零；重复坐标累加）。多用于测试与调试。
    pub fn to_dense(&self) -> Tensor {
        let mut dense = Tensor::zeros(&self.shape);
        for (j, &index) in self.indices.iter().enumerate() {
            dense.row_add_assign(index, &self.values.row(j));
        }
        dense
    }
}

impl Tensor {
    /// 稀疏掩码收集：按`mask`的非零坐标从本（稠密）张量中取出对应行，
    /// 返回形状为[mask.nnz(), shape[1..]...]的稠密值块。
    /// 两者的整体形状必须严格一致，否则panic（调用方契约）。
    pub fn sparse_mask(&self, mask: &SparseTensor) -> Tensor {
        assert!(
            self.shape() == mask.shape(),
            "形状不一致，故无法进行稀疏掩码收集：稠密张量的形状为{:?}，稀疏张量的形状为{:?}",
            self.shape(),
            mask.shape()
        );
        self.select_rows(mask.indices())
    }
}
