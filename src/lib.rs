/*
 * @Author       : 老董
 * @Date         : 2023-10-21 03:22:26
 * @LastEditors  : 老董
 * @LastEditTime : 2026-03-08 10:40:12
 * @Description  : 转向角回归模型的蒙特卡洛 Dropout 评估
 *
 * - tensor：基于 ndarray 的 f32 张量
 * - vision / data：图像解码与预处理、转向角测试集、顺序批处理
 * - nn：仅推理的网络层、ResNet8 两个变体与参数检查点
 * - eval：预测聚合、基线、回归报告与完整评估流程
 */

pub mod config;
pub mod data;
pub mod errors;
pub mod eval;
pub mod nn;
pub mod tensor;
pub mod vision;
