// ==========================================
// 商城数据导入导出 - 商城配置读取 Trait
// ==========================================
// 职责: 定义默认值解析所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::repository::RepositoryResult;

// ==========================================
// ShopConfigReader Trait
// ==========================================
// 用途: 客户默认值（支付方式/密码编码器/客户编号开关）读取
// 实现者: ShopConfigManager（从 config_kv + shop 表读取）
pub trait ShopConfigReader {
    /// 读取全局配置值（scope_id = 'global'）
    ///
    /// # 返回
    /// - Some(String): 存储的原始文本
    /// - None: 配置不存在
    fn global_value(&self, key: &str) -> RepositoryResult<Option<String>>;

    /// 读取指定店铺的配置值（不回退到全局）
    fn shop_value(&self, shop_id: i64, key: &str) -> RepositoryResult<Option<String>>;

    /// 查询子店铺所属主店铺 id
    ///
    /// # 返回
    /// - None: 店铺不存在，或本身即主店铺
    fn main_shop_id(&self, shop_id: i64) -> RepositoryResult<Option<i64>>;
}
