/*
 * @Author       : 老董
 * @Date         : 2026-02-11
 * @Description  : 键值式二进制归档：优化器状态等按字段名有序写入/读出。
 *                 载荷带magic与格式版本号，版本不符直接报错而不是猜测兼容。
 */

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::NnError;

/// 归档载荷的magic（"SPTA"）
const ARCHIVE_MAGIC: u32 = 0x5350_5441;
/// 归档格式版本号。字段编码方式变更时递增。
const ARCHIVE_VERSION: u32 = 1;

#[derive(serde::Serialize, serde::Deserialize)]
struct ArchivePayload {
    magic: u32,
    version: u32,
    // 保持写入顺序的键值对（键为字段名，值为该字段的bincode编码）
    entries: Vec<(String, Vec<u8>)>,
}

/// 写端归档：按字段名有序写入可序列化的值
pub struct OutputArchive {
    entries: Vec<(String, Vec<u8>)>,
}

impl OutputArchive {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        OutputArchive {
            entries: Vec::new(),
        }
    }

    /// 以`key`为字段名写入一个值。同名字段后写覆盖先写。
    pub fn write<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), NnError> {
        let bytes = bincode::serialize(value)
            .map_err(|e| NnError::ArchiveError(format!("字段`{key}`序列化失败：{e}")))?;
        self.entries.retain(|(k, _)| k != key);
        self.entries.push((key.to_string(), bytes));
        Ok(())
    }

    /// 编码为完整的归档字节流（含magic与版本号）
    pub fn to_bytes(&self) -> Result<Vec<u8>, NnError> {
        let payload = ArchivePayload {
            magic: ARCHIVE_MAGIC,
            version: ARCHIVE_VERSION,
            entries: self.entries.clone(),
        };
        bincode::serialize(&payload)
            .map_err(|e| NnError::ArchiveError(format!("归档编码失败：{e}")))
    }

    /// 将归档写入本地文件
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), NnError> {
        let bytes = self.to_bytes()?;
        fs::write(path, bytes).map_err(|e| NnError::ArchiveError(format!("归档写盘失败：{e}")))
    }
}

/// 读端归档：按字段名读出先前写入的值
pub struct InputArchive {
    entries: HashMap<String, Vec<u8>>,
}

impl InputArchive {
    /// 从归档字节流解码（校验magic与版本号）
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, NnError> {
        let payload: ArchivePayload = bincode::deserialize(bytes)
            .map_err(|e| NnError::ArchiveError(format!("归档解码失败：{e}")))?;
        if payload.magic != ARCHIVE_MAGIC {
            return Err(NnError::ArchiveError("不是有效的归档字节流".to_string()));
        }
        if payload.version != ARCHIVE_VERSION {
            return Err(NnError::ArchiveError(format!(
                "归档格式版本不符：期望{ARCHIVE_VERSION}，实际{}",
                payload.version
            )));
        }
        Ok(InputArchive {
            entries: payload.entries.into_iter().collect(),
        })
    }

    /// 从本地文件加载归档
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, NnError> {
        let bytes = fs::read(path)
            .map_err(|e| NnError::ArchiveError(format!("归档读盘失败：{e}")))?;
        Self::from_bytes(&bytes)
    }

    /// 读出字段`key`的值。字段缺失或类型不符都报错。
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Result<T, NnError> {
        let bytes = self
            .entries
            .get(key)
            .ok_or_else(|| NnError::ArchiveError(format!("归档中缺少字段`{key}`")))?;
        bincode::deserialize(bytes)
            .map_err(|e| NnError::ArchiveError(format!("字段`{key}`反序列化失败：{e}")))
    }
}
