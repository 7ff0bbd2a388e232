use std::error::Error;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use steer_eval::config::EvalFlags;
use steer_eval::eval::{EvalConfig, run};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = EvalConfig::from(EvalFlags::parse());
    match run(&config) {
        Ok(summary) => {
            match summary.explained_variance {
                Some(evas) => info!(
                    "评估完成：{}个样本，解释方差{evas:.4}，RMSE {:.4}，结果位于`{}`",
                    summary.num_samples,
                    summary.rmse,
                    summary.output_dir.display()
                ),
                None => info!(
                    "评估完成：{}个样本，RMSE {:.4}，结果位于`{}`",
                    summary.num_samples,
                    summary.rmse,
                    summary.output_dir.display()
                ),
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("评估失败：{err}");
            let mut source = err.source();
            while let Some(cause) = source {
                error!("  原因：{cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}
