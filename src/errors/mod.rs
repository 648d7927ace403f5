use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TensorError {
    // 稀疏张量构造
    #[error("稀疏张量的坐标数（{index_count}）与值的行数（{value_rows}）不一致")]
    SparseIndexValueMismatch {
        index_count: usize,
        value_rows: usize,
    },
    #[error("稀疏张量的坐标{index}超出第0维的范围（{dim0}）")]
    SparseIndexOutOfRange { index: usize, dim0: usize },
    #[error("稀疏张量的值块形状{values_shape:?}与整体形状{shape:?}的后续维度不匹配")]
    SparseValueShapeMismatch {
        values_shape: Vec<usize>,
        shape: Vec<usize>,
    },

    #[error("张量形状不一致")]
    InconsitentShape,
}
