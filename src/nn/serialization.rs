/*
 * @Date         : 2026-03-06
 * @Description  : 状态字典的文件存取
 *
 * 文件格式：
 * - 魔数 "MTSD"（Module Tree State Dict），4 字节
 * - 版本号，u32 小端
 * - bincode 编码的有序条目列表 `Vec<(名称, 张量记录)>`，记录保留类型、设备、梯度标记、形状和数值
 */

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::nn::{ModuleError, StateDict};
use crate::tensor::{Tensor, TensorRecord};

/// 状态字典文件魔数
const STATE_DICT_MAGIC: &[u8; 4] = b"MTSD";
/// 状态字典文件版本
const STATE_DICT_VERSION: u32 = 1;

/// 把状态字典按顺序写入文件
pub fn save_state_dict<P: AsRef<Path>>(dict: &StateDict, path: P) -> Result<(), ModuleError> {
    let path = path.as_ref();
    let file = File::create(path)
        .map_err(|e| ModuleError::Io(format!("无法创建状态字典文件{}: {e}", path.display())))?;
    let mut writer = BufWriter::new(file);

    writer
        .write_all(STATE_DICT_MAGIC)
        .map_err(|e| ModuleError::Io(format!("写入魔数失败: {e}")))?;
    writer
        .write_all(&STATE_DICT_VERSION.to_le_bytes())
        .map_err(|e| ModuleError::Io(format!("写入版本失败: {e}")))?;

    let entries: Vec<(&String, TensorRecord)> = dict
        .iter()
        .map(|(name, tensor)| (name, TensorRecord::from(tensor)))
        .collect();
    bincode::serialize_into(&mut writer, &entries)
        .map_err(|e| ModuleError::Serialization(format!("编码状态字典失败: {e}")))?;

    writer
        .flush()
        .map_err(|e| ModuleError::Io(format!("刷新缓冲区失败: {e}")))?;
    log::debug!("保存{}个张量到{}", dict.len(), path.display());
    Ok(())
}

/// 从文件读取状态字典（条目顺序与保存时一致）
pub fn load_state_dict<P: AsRef<Path>>(path: P) -> Result<StateDict, ModuleError> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|e| ModuleError::Io(format!("无法打开状态字典文件{}: {e}", path.display())))?;
    let mut reader = BufReader::new(file);

    let mut magic = [0u8; 4];
    reader
        .read_exact(&mut magic)
        .map_err(|e| ModuleError::Io(format!("读取魔数失败: {e}")))?;
    if &magic != STATE_DICT_MAGIC {
        return Err(ModuleError::Serialization(
            "无效的状态字典文件：请确保使用 save_state_dict() 保存的文件".to_string(),
        ));
    }

    let mut version_bytes = [0u8; 4];
    reader
        .read_exact(&mut version_bytes)
        .map_err(|e| ModuleError::Io(format!("读取版本失败: {e}")))?;
    let version = u32::from_le_bytes(version_bytes);
    if version != STATE_DICT_VERSION {
        return Err(ModuleError::Serialization(format!(
            "不支持的状态字典文件版本: {version}"
        )));
    }

    let entries: Vec<(String, TensorRecord)> = bincode::deserialize_from(&mut reader)
        .map_err(|e| ModuleError::Serialization(format!("解码状态字典失败: {e}")))?;
    let dict: StateDict = entries
        .into_iter()
        .map(|(name, record)| (name, Tensor::from(record)))
        .collect();
    log::debug!("从{}读取{}个张量", path.display(), dict.len());
    Ok(dict)
}
