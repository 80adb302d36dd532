mod structs;

pub use structs::*;

use std::sync::OnceLock;

static CONFIG: OnceLock<StaticConfig> = OnceLock::new();

/// 初始化全局配置（启动时调用一次）
pub fn init_config(config: StaticConfig) {
    let _ = CONFIG.set(config);
}

/// 获取全局配置，未初始化时按默认路径加载
pub fn get_config() -> &'static StaticConfig {
    CONFIG.get_or_init(StaticConfig::load)
}
