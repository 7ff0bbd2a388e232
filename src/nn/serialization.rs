/*
 * @Author       : 老董
 * @Date         : 2026-03-06
 * @Description  : 模型参数的二进制检查点（save_params/load_params）
 *
 * 文件格式（小端序）：
 *   magic `SEPR` | u32 版本 | u32 参数个数
 *   每个参数：u32 名称长度 | UTF-8 名称 | u32 维数 | u32 × 维数 | f32 × 元素数
 */

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::{debug, warn};

use crate::nn::{Module, ModelError};
use crate::tensor::Tensor;

/// 参数文件魔数
pub const PARAMS_MAGIC: &[u8; 4] = b"SEPR";
/// 参数文件版本
pub const PARAMS_VERSION: u32 = 1;
/// 参数名称的最大字节数，超出即视为文件损坏
const MAX_NAME_LEN: usize = 4096;
/// 参数张量的最大维数
const MAX_RANK: usize = 8;

/// 保存模块的全部参数（含 BatchNorm 滑动统计量）
pub fn save_params<M: Module + ?Sized>(module: &M, path: &Path) -> Result<(), ModelError> {
    let io_err = |source| ModelError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);

    let params = module.named_parameters();
    write_params(&mut writer, &params).map_err(io_err)?;
    writer.flush().map_err(io_err)?;
    debug!("已保存{}个参数到`{}`", params.len(), path.display());
    Ok(())
}

fn write_params<W: Write>(writer: &mut W, params: &[(String, &Tensor)]) -> io::Result<()> {
    writer.write_all(PARAMS_MAGIC)?;
    write_u32(writer, PARAMS_VERSION)?;
    write_u32(writer, params.len() as u32)?;

    for (name, tensor) in params {
        write_u32(writer, name.len() as u32)?;
        writer.write_all(name.as_bytes())?;

        let shape = tensor.shape();
        write_u32(writer, shape.len() as u32)?;
        for &dim in shape {
            write_u32(writer, dim as u32)?;
        }
        for value in tensor.as_array().iter() {
            writer.write_all(&value.to_le_bytes())?;
        }
    }
    Ok(())
}

/// 从检查点载入参数
///
/// 模块的每个参数都必须在文件中出现且形状一致；文件中多余的参数只会给出警告。
/// 任何参数出错时模块保持原样（不会只载入一部分）。
pub fn load_params<M: Module + ?Sized>(module: &mut M, path: &Path) -> Result<(), ModelError> {
    let file = File::open(path).map_err(|source| ModelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = BufReader::new(file);
    let mut entries = read_params(&mut reader, path)?;

    // 先整体校验，再赋值
    let mut params = module.named_parameters_mut();
    for (name, tensor) in &params {
        let (shape, _) = entries
            .get(name)
            .ok_or_else(|| ModelError::MissingParameter(name.clone()))?;
        if shape.as_slice() != tensor.shape() {
            return Err(ModelError::ParameterShapeMismatch {
                name: name.clone(),
                expected: tensor.shape().to_vec(),
                got: shape.clone(),
            });
        }
    }
    for (name, tensor) in params.iter_mut() {
        if let Some((shape, data)) = entries.remove(name.as_str()) {
            **tensor = Tensor::from_vec(data, &shape);
        }
    }

    for name in entries.keys() {
        warn!("检查点`{}`中的参数`{name}`不属于当前模型，已忽略", path.display());
    }
    debug!("已从`{}`载入{}个参数", path.display(), params.len());
    Ok(())
}

type Entries = HashMap<String, (Vec<usize>, Vec<f32>)>;

fn read_params<R: Read>(reader: &mut R, path: &Path) -> Result<Entries, ModelError> {
    let invalid = |message: String| ModelError::InvalidCheckpoint {
        path: path.to_path_buf(),
        message,
    };
    // 读到文件末尾之前就结束说明文件被截断
    let read_err = |source: io::Error| match source.kind() {
        io::ErrorKind::UnexpectedEof => invalid("文件被截断".to_string()),
        _ => ModelError::Io {
            path: path.to_path_buf(),
            source,
        },
    };

    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic).map_err(read_err)?;
    if &magic != PARAMS_MAGIC {
        return Err(invalid(
            "魔数不匹配：需要先将训练得到的权重转换为 steer_eval 检查点（SEPR 格式），\
             不能直接读取 torch.save 保存的 .pt 文件"
                .to_string(),
        ));
    }
    let version = read_u32(reader).map_err(read_err)?;
    if version != PARAMS_VERSION {
        return Err(invalid(format!("不支持的参数文件版本: {version}")));
    }

    let count = read_u32(reader).map_err(read_err)? as usize;
    let mut entries = HashMap::with_capacity(count.min(1024));
    for _ in 0..count {
        let name_len = read_u32(reader).map_err(read_err)? as usize;
        if name_len > MAX_NAME_LEN {
            return Err(invalid(format!("参数名称长度{name_len}异常")));
        }
        let mut name_bytes = vec![0u8; name_len];
        reader.read_exact(&mut name_bytes).map_err(read_err)?;
        let name = String::from_utf8(name_bytes)
            .map_err(|_| invalid("参数名称不是合法的 UTF-8".to_string()))?;

        let rank = read_u32(reader).map_err(read_err)? as usize;
        if rank > MAX_RANK {
            return Err(invalid(format!("参数`{name}`的维数{rank}异常")));
        }
        let shape = (0..rank)
            .map(|_| read_u32(reader).map(|dim| dim as usize))
            .collect::<io::Result<Vec<_>>>()
            .map_err(read_err)?;

        let size = shape
            .iter()
            .try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
            .ok_or_else(|| invalid(format!("参数`{name}`的形状{shape:?}元素个数溢出")))?;
        let mut data = Vec::with_capacity(size.min(1 << 20));
        let mut buf = [0u8; 4];
        for _ in 0..size {
            reader.read_exact(&mut buf).map_err(read_err)?;
            data.push(f32::from_le_bytes(buf));
        }

        if entries.insert(name.clone(), (shape, data)).is_some() {
            return Err(invalid(format!("参数`{name}`重复出现")));
        }
    }
    Ok(entries)
}

fn write_u32<W: Write>(writer: &mut W, value: u32) -> io::Result<()> {
    writer.write_all(&value.to_le_bytes())
}

fn read_u32<R: Read>(reader: &mut R) -> io::Result<u32> {
    let mut bytes = [0u8; 4];
    reader.read_exact(&mut bytes)?;
    Ok(u32::from_le_bytes(bytes))
}
