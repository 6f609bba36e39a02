// ==========================================
// 商城数据导入导出 - 字段默认值解析
// ==========================================
// 职责: 为未设置的默认字段补值 + NULL 哨兵替换
// 规则:
// - 每个默认字段有且仅有一种策略（静态值 / 计算值 / 强制置空）
// - 已设置（存在且非 null）的字段保持不变
// - 外部服务失败时降级为空值/全局默认值，仅记录 warn 日志
// ==========================================

use crate::config::{config_keys, parse_flag, ShopConfigReader};
use crate::domain::{EntityType, FieldKind, FieldValue, Record};
use crate::importer::importer_trait::NumberRangeIncrementer;
use tracing::{debug, warn};

// ==========================================
// 默认值策略
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StaticDefault {
    Text(&'static str),
    Int(i64),
    Float(f64),
}

impl StaticDefault {
    pub fn to_value(self) -> FieldValue {
        match self {
            StaticDefault::Text(s) => FieldValue::text(s),
            StaticDefault::Int(i) => FieldValue::Int(i),
            StaticDefault::Float(f) => FieldValue::Float(f),
        }
    }
}

/// 需要外部协作者计算的默认值
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComputedDefault {
    CustomerNumber,  // 客户编号（编号区间自增，需开启托管编号）
    PaymentMethod,   // 默认支付方式（子店铺 → 主店铺 → 全局）
    PasswordEncoder, // 默认密码编码器
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultStrategy {
    Static(StaticDefault),
    Computed(ComputedDefault),
    ForceEmpty, // 无论 defaultValues 给出什么都置为空串
}

use DefaultStrategy::{Computed, ForceEmpty, Static};
use StaticDefault::{Float, Int, Text};

/// 默认字段表（字段 → 策略）
pub type DefaultFieldTable = &'static [(&'static str, DefaultStrategy)];

/// NULL 替换表（类型 → 字段列表）
pub type NullReplacementTable = &'static [(FieldKind, &'static [&'static str])];

// ==========================================
// 默认字段表
// ==========================================
const CUSTOMER_DEFAULTS: DefaultFieldTable = &[
    ("customernnumber", Computed(ComputedDefault::CustomerNumber)),
    ("paymentID", Computed(ComputedDefault::PaymentMethod)),
    ("encoder", Computed(ComputedDefault::PasswordEncoder)),
    ("customergroup", Static(Text("EK"))),
    ("salutation", Static(Text(""))),
    ("firstname", Static(Text(""))),
    ("lastname", Static(Text(""))),
    ("street", Static(Text(""))),
    ("zipcode", Static(Text(""))),
    ("city", Static(Text(""))),
    ("active", Static(Int(1))),
    ("accountmode", Static(Int(0))),
    ("newsletter", Static(Int(0))),
    ("attrBillingText1", ForceEmpty),
    ("attrBillingText2", ForceEmpty),
    ("attrBillingText3", ForceEmpty),
    ("attrBillingText4", ForceEmpty),
    ("attrBillingText5", ForceEmpty),
    ("attrBillingText6", ForceEmpty),
    ("attrShippingText1", ForceEmpty),
    ("attrShippingText2", ForceEmpty),
    ("attrShippingText3", ForceEmpty),
    ("attrShippingText4", ForceEmpty),
    ("attrShippingText5", ForceEmpty),
    ("attrShippingText6", ForceEmpty),
];

const ARTICLE_DEFAULTS: DefaultFieldTable = &[
    ("name", Static(Text(""))),
    ("additionalText", Static(Text(""))),
    ("supplierName", Static(Text(""))),
    ("tax", Static(Text("19"))),
    ("active", Static(Int(1))),
    ("inStock", Static(Int(0))),
    ("stockMin", Static(Int(0))),
    ("lastStock", Static(Int(0))),
    ("minPurchase", Static(Int(1))),
    ("purchaseSteps", Static(Int(1))),
    ("shippingFree", Static(Int(0))),
    ("topSeller", Static(Int(0))),
    ("notification", Static(Int(0))),
    ("weight", Static(Float(0.0))),
];

const ARTICLE_IN_STOCK_DEFAULTS: DefaultFieldTable = &[
    ("inStock", Static(Int(0))),
    ("additionalText", Static(Text(""))),
    ("supplier", Static(Text(""))),
];

const ARTICLE_PRICE_DEFAULTS: DefaultFieldTable = &[
    ("priceGroup", Static(Text("EK"))),
    ("from", Static(Int(1))),
    ("pseudoPrice", Static(Float(0.0))),
    ("purchasePrice", Static(Float(0.0))),
    ("regulationPrice", Static(Float(0.0))),
];

const ARTICLE_IMAGE_DEFAULTS: DefaultFieldTable = &[
    ("description", Static(Text(""))),
    ("main", Static(Int(2))),
    ("position", Static(Int(0))),
    ("thumbnail", Static(Int(1))),
];

const CATEGORY_DEFAULTS: DefaultFieldTable = &[
    ("metaTitle", Static(Text(""))),
    ("metaKeywords", Static(Text(""))),
    ("metaDescription", Static(Text(""))),
    ("active", Static(Int(1))),
    ("position", Static(Int(0))),
    ("blog", Static(Int(0))),
    ("showFilterGroups", Static(Int(1))),
    ("hideFilter", Static(Int(0))),
];

const NEWSLETTER_DEFAULTS: DefaultFieldTable = &[
    ("groupName", Static(Text("Newsletter-Empfänger"))),
    ("salutation", Static(Text(""))),
    ("firstName", Static(Text(""))),
    ("lastName", Static(Text(""))),
];

// ==========================================
// NULL 替换表
// ==========================================
const CUSTOMER_NULLS: NullReplacementTable = &[
    (
        FieldKind::String,
        &[
            "customernnumber", "encoder", "customergroup", "salutation", "title", "firstname",
            "lastname", "company", "department", "street", "zipcode", "city", "phone",
            "additionalAddressLine1", "additionalAddressLine2",
            "attrBillingText1", "attrBillingText2", "attrBillingText3",
            "attrBillingText4", "attrBillingText5", "attrBillingText6",
            "attrShippingText1", "attrShippingText2", "attrShippingText3",
            "attrShippingText4", "attrShippingText5", "attrShippingText6",
        ],
    ),
    (FieldKind::Int, &["paymentID", "active", "accountmode", "newsletter", "countryID", "stateID"]),
    (FieldKind::Date, &["birthday", "firstlogin", "lastlogin"]),
];

const ARTICLE_NULLS: NullReplacementTable = &[
    (
        FieldKind::String,
        &["name", "additionalText", "supplierName", "description", "descriptionLong", "keywords", "metaTitle", "ean"],
    ),
    (
        FieldKind::Int,
        &["active", "inStock", "stockMin", "lastStock", "minPurchase", "purchaseSteps", "shippingFree", "topSeller", "notification"],
    ),
    (FieldKind::Float, &["weight", "width", "height", "length", "purchasePrice", "pseudoPrice"]),
    (FieldKind::Date, &["added", "releaseDate"]),
];

const ARTICLE_IN_STOCK_NULLS: NullReplacementTable = &[
    (FieldKind::String, &["additionalText", "supplier"]),
    (FieldKind::Int, &["inStock"]),
    (FieldKind::Float, &["price"]),
];

const ARTICLE_PRICE_NULLS: NullReplacementTable = &[
    (FieldKind::String, &["priceGroup", "name", "additionalText", "supplierName"]),
    (FieldKind::Int, &["from"]),
    (FieldKind::Float, &["price", "purchasePrice", "pseudoPrice", "regulationPrice"]),
];

const ARTICLE_IMAGE_NULLS: NullReplacementTable = &[
    (FieldKind::String, &["description", "relations"]),
    (FieldKind::Int, &["main", "position", "thumbnail"]),
];

const CATEGORY_NULLS: NullReplacementTable = &[
    (
        FieldKind::String,
        &["metaTitle", "metaKeywords", "metaDescription", "cmsHeadline", "cmsText", "template", "external"],
    ),
    (FieldKind::Int, &["position", "active", "blog", "showFilterGroups", "hideFilter"]),
];

const NEWSLETTER_NULLS: NullReplacementTable = &[
    (
        FieldKind::String,
        &["groupName", "salutation", "firstName", "lastName", "street", "zipCode", "city"],
    ),
    (FieldKind::Bool, &["active"]),
    (FieldKind::Date, &["added", "doubleOptinConfirmed"]),
];

/// 实体类型的默认字段表
pub fn default_fields(entity: EntityType) -> DefaultFieldTable {
    match entity {
        EntityType::Customers => CUSTOMER_DEFAULTS,
        EntityType::Articles => ARTICLE_DEFAULTS,
        EntityType::ArticlesInStock => ARTICLE_IN_STOCK_DEFAULTS,
        EntityType::ArticlesPrices => ARTICLE_PRICE_DEFAULTS,
        EntityType::ArticlesImages => ARTICLE_IMAGE_DEFAULTS,
        EntityType::Categories => CATEGORY_DEFAULTS,
        EntityType::Newsletter => NEWSLETTER_DEFAULTS,
    }
}

/// 实体类型的 NULL 替换表
pub fn null_replacements(entity: EntityType) -> NullReplacementTable {
    match entity {
        EntityType::Customers => CUSTOMER_NULLS,
        EntityType::Articles => ARTICLE_NULLS,
        EntityType::ArticlesInStock => ARTICLE_IN_STOCK_NULLS,
        EntityType::ArticlesPrices => ARTICLE_PRICE_NULLS,
        EntityType::ArticlesImages => ARTICLE_IMAGE_NULLS,
        EntityType::Categories => CATEGORY_NULLS,
        EntityType::Newsletter => NEWSLETTER_NULLS,
    }
}

/// 各类型的规范默认值
pub fn canonical_value(kind: FieldKind) -> FieldValue {
    match kind {
        FieldKind::String | FieldKind::Date => FieldValue::text(""),
        FieldKind::Int | FieldKind::Bool => FieldValue::Int(0),
        FieldKind::Float => FieldValue::Float(0.0),
    }
}

/// 将 NULL 哨兵值替换为所属类型的规范默认值（未登记字段保持不变）
pub fn fix_null_sentinels(record: &mut Record, entity: EntityType) {
    let table = null_replacements(entity);
    for (field, value) in record.iter_mut() {
        if !value.is_null_sentinel() {
            continue;
        }
        if let Some((kind, _)) = table.iter().find(|(_, fields)| fields.contains(&field)) {
            *value = canonical_value(*kind);
        }
    }
}

// ==========================================
// FieldDefaultResolver - 默认值解析器
// ==========================================
pub struct FieldDefaultResolver<'a> {
    config: &'a dyn ShopConfigReader,
    numbers: &'a dyn NumberRangeIncrementer,
}

impl<'a> FieldDefaultResolver<'a> {
    pub fn new(config: &'a dyn ShopConfigReader, numbers: &'a dyn NumberRangeIncrementer) -> Self {
        Self { config, numbers }
    }

    /// 为记录补全默认字段
    ///
    /// # 参数
    /// - record: 待处理记录
    /// - default_values: Profile 配置的默认值（字段 → 值）
    /// - entity: 实体类型
    ///
    /// # 返回
    /// 补全后的记录；每个默认字段都会出现在结果中
    pub fn resolve_defaults(&self, mut record: Record, default_values: &Record, entity: EntityType) -> Record {
        for (field, strategy) in default_fields(entity) {
            if record.is_set(field) {
                continue;
            }

            if let Some(value) = default_values.get(field).filter(|v| !v.is_null()) {
                record.insert(*field, value.clone());
            }

            match strategy {
                Computed(computed) => {
                    let is_empty = record.get(field).map_or(true, FieldValue::is_empty);
                    if is_empty {
                        let value = self.compute(*computed, &record);
                        record.insert(*field, value);
                    }
                }
                ForceEmpty => record.insert(*field, ""),
                Static(value) => {
                    if !record.is_set(field) {
                        record.insert(*field, value.to_value());
                    }
                }
            }
        }

        fix_null_sentinels(&mut record, entity);
        record
    }

    fn compute(&self, computed: ComputedDefault, record: &Record) -> FieldValue {
        match computed {
            ComputedDefault::CustomerNumber => self.customer_number(),
            ComputedDefault::PaymentMethod => self.payment_method(record),
            ComputedDefault::PasswordEncoder => self.password_encoder(),
        }
    }

    /// 托管客户编号开启时从编号区间取号，否则为空串
    fn customer_number(&self) -> FieldValue {
        let managed = match self.config.global_value(config_keys::MANAGED_CUSTOMER_NUMBERS) {
            Ok(value) => value.map_or(false, |v| parse_flag(&v)),
            Err(e) => {
                warn!(error = %e, "读取客户编号托管开关失败");
                false
            }
        };
        if !managed {
            return FieldValue::text("");
        }

        match self.numbers.increment(config_keys::CUSTOMER_NUMBER_RANGE) {
            Ok(number) => FieldValue::Text(number.to_string()),
            Err(e) => {
                warn!(error = %e, "客户编号生成失败，使用空值");
                FieldValue::text("")
            }
        }
    }

    /// 支付方式回退顺序: 子店铺配置 → 主店铺配置 → 全局配置
    fn payment_method(&self, record: &Record) -> FieldValue {
        if !record.is_set("subshopID") {
            return self.global_payment();
        }
        let Some(shop_id) = record.get("subshopID").and_then(FieldValue::as_i64) else {
            warn!("subshopID 不是有效的店铺 ID，使用全局默认支付方式");
            return self.global_payment();
        };

        if let Some(payment) = self.stored_payment(self.config.shop_value(shop_id, config_keys::DEFAULT_PAYMENT)) {
            debug!(shop_id, payment, "使用子店铺默认支付方式");
            return FieldValue::Int(payment);
        }

        let main_shop = match self.config.main_shop_id(shop_id) {
            Ok(main_shop) => main_shop,
            Err(e) => {
                warn!(shop_id, error = %e, "查询主店铺失败");
                None
            }
        };
        if let Some(main_id) = main_shop {
            if let Some(payment) = self.stored_payment(self.config.shop_value(main_id, config_keys::DEFAULT_PAYMENT)) {
                debug!(shop_id, main_id, payment, "使用主店铺默认支付方式");
                return FieldValue::Int(payment);
            }
        }

        self.global_payment()
    }

    fn global_payment(&self) -> FieldValue {
        let payment = self.stored_payment(self.config.global_value(config_keys::DEFAULT_PAYMENT));
        FieldValue::Int(payment.unwrap_or_else(|| {
            warn!("未配置全局默认支付方式");
            0
        }))
    }

    /// 解码存储的支付方式（JSON 序列化值；空串与 "0" 视为未配置）
    fn stored_payment(&self, stored: crate::repository::RepositoryResult<Option<String>>) -> Option<i64> {
        let raw = match stored {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(error = %e, "读取默认支付方式失败");
                return None;
            }
        };
        if raw.is_empty() || raw == "0" {
            return None;
        }

        match serde_json::from_str::<FieldValue>(&raw).ok().and_then(|v| v.as_i64()) {
            Some(payment) => Some(payment),
            None => {
                warn!(raw = %raw, "默认支付方式无法解码");
                None
            }
        }
    }

    fn password_encoder(&self) -> FieldValue {
        match self.config.global_value(config_keys::DEFAULT_PASSWORD_ENCODER) {
            Ok(Some(encoder)) => FieldValue::Text(encoder),
            Ok(None) => {
                warn!("未配置默认密码编码器");
                FieldValue::text("")
            }
            Err(e) => {
                warn!(error = %e, "读取默认密码编码器失败");
                FieldValue::text("")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{RepositoryError, RepositoryResult};
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;

    // ===== 测试替身 =====

    #[derive(Default)]
    struct FakeConfig {
        global: HashMap<&'static str, &'static str>,
        shops: HashMap<(i64, &'static str), &'static str>,
        main_ids: HashMap<i64, i64>,
        lookups: RefCell<Vec<String>>,
    }

    impl ShopConfigReader for FakeConfig {
        fn global_value(&self, key: &str) -> RepositoryResult<Option<String>> {
            self.lookups.borrow_mut().push(format!("global:{}", key));
            Ok(self.global.get(key).map(|v| v.to_string()))
        }

        fn shop_value(&self, shop_id: i64, key: &str) -> RepositoryResult<Option<String>> {
            self.lookups.borrow_mut().push(format!("shop{}:{}", shop_id, key));
            Ok(self.shops.get(&(shop_id, key)).map(|v| v.to_string()))
        }

        fn main_shop_id(&self, shop_id: i64) -> RepositoryResult<Option<i64>> {
            Ok(self.main_ids.get(&shop_id).copied())
        }
    }

    #[derive(Default)]
    struct FakeNumbers {
        next: Cell<i64>,
        broken: bool,
    }

    impl NumberRangeIncrementer for FakeNumbers {
        fn increment(&self, _range_name: &str) -> RepositoryResult<i64> {
            if self.broken {
                return Err(RepositoryError::DatabaseQueryError("offline".to_string()));
            }
            self.next.set(self.next.get() + 1);
            Ok(self.next.get())
        }
    }

    fn payment_config() -> FakeConfig {
        let mut config = FakeConfig::default();
        config.global.insert(config_keys::DEFAULT_PAYMENT, "5");
        config.shops.insert((1, config_keys::DEFAULT_PAYMENT), "\"3\"");
        config.shops.insert((2, config_keys::DEFAULT_PAYMENT), "4");
        config.main_ids.insert(2, 1);
        config.main_ids.insert(3, 1);
        config
    }

    fn customer(fields: &[(&str, FieldValue)]) -> Record {
        fields.iter().cloned().collect()
    }

    // ===== 默认字段表 =====

    #[test]
    fn test_every_default_field_is_present_after_resolution() {
        let config = FakeConfig::default();
        let numbers = FakeNumbers::default();
        let resolver = FieldDefaultResolver::new(&config, &numbers);

        for entity in EntityType::ALL {
            let resolved = resolver.resolve_defaults(Record::new(), &Record::new(), entity);
            for (field, _) in default_fields(entity) {
                let value = resolved.get(field);
                assert!(value.is_some(), "{} 缺少默认字段 {}", entity, field);
                assert!(!value.unwrap().is_null(), "{} 的 {} 仍为 null", entity, field);
            }
        }
    }

    #[test]
    fn test_each_default_field_has_one_strategy() {
        for entity in EntityType::ALL {
            let table = default_fields(entity);
            for (i, (field, _)) in table.iter().enumerate() {
                assert!(
                    !table.iter().skip(i + 1).any(|(other, _)| other == field),
                    "{} 的 {} 重复登记",
                    entity,
                    field
                );
            }
        }
    }

    #[test]
    fn test_set_fields_are_untouched() {
        let config = payment_config();
        let numbers = FakeNumbers::default();
        let resolver = FieldDefaultResolver::new(&config, &numbers);

        let record = customer(&[
            ("paymentID", FieldValue::Int(9)),
            ("attrBillingText1", FieldValue::text("keep")),
            ("customergroup", FieldValue::text("H")),
        ]);
        let resolved = resolver.resolve_defaults(record, &Record::new(), EntityType::Customers);

        assert_eq!(resolved.get("paymentID"), Some(&FieldValue::Int(9)));
        assert_eq!(resolved.get("attrBillingText1"), Some(&FieldValue::text("keep")));
        assert_eq!(resolved.get("customergroup"), Some(&FieldValue::text("H")));
    }

    #[test]
    fn test_profile_default_values_are_applied() {
        let config = FakeConfig::default();
        let numbers = FakeNumbers::default();
        let resolver = FieldDefaultResolver::new(&config, &numbers);

        let defaults = customer(&[
            ("customergroup", FieldValue::text("B2B")),
            ("encoder", FieldValue::text("md5")),
            ("attrShippingText2", FieldValue::text("ignored")),
        ]);
        let resolved = resolver.resolve_defaults(Record::new(), &defaults, EntityType::Customers);

        assert_eq!(resolved.get("customergroup"), Some(&FieldValue::text("B2B")));
        assert_eq!(resolved.get("encoder"), Some(&FieldValue::text("md5")));
        assert_eq!(resolved.get("attrShippingText2"), Some(&FieldValue::text("")));
    }

    // ===== 计算默认值 =====

    #[test]
    fn test_payment_without_subshop_uses_global() {
        let config = payment_config();
        let numbers = FakeNumbers::default();
        let resolver = FieldDefaultResolver::new(&config, &numbers);

        let resolved = resolver.resolve_defaults(Record::new(), &Record::new(), EntityType::Customers);
        assert_eq!(resolved.get("paymentID"), Some(&FieldValue::Int(5)));
        assert!(!config.lookups.borrow().iter().any(|l| l.starts_with("shop")));
    }

    #[test]
    fn test_payment_fallback_order() {
        let config = payment_config();
        let numbers = FakeNumbers::default();
        let resolver = FieldDefaultResolver::new(&config, &numbers);
        let resolve = |shop: i64| {
            resolver
                .resolve_defaults(customer(&[("subshopID", FieldValue::Int(shop))]), &Record::new(), EntityType::Customers)
                .get("paymentID")
                .cloned()
        };

        // 子店铺有配置
        assert_eq!(resolve(2), Some(FieldValue::Int(4)));
        // 子店铺无配置，主店铺有（JSON 字符串）
        assert_eq!(resolve(3), Some(FieldValue::Int(3)));
        // 均无配置，回退全局
        assert_eq!(resolve(7), Some(FieldValue::Int(5)));
    }

    #[test]
    fn test_payment_stops_at_first_hit() {
        let config = payment_config();
        let numbers = FakeNumbers::default();
        let resolver = FieldDefaultResolver::new(&config, &numbers);

        resolver.resolve_defaults(customer(&[("subshopID", FieldValue::Int(2))]), &Record::new(), EntityType::Customers);

        let lookups = config.lookups.borrow();
        let payment_lookups: Vec<&String> = lookups
            .iter()
            .filter(|l| l.ends_with(config_keys::DEFAULT_PAYMENT))
            .collect();
        assert_eq!(payment_lookups, vec!["shop2:defaultpayment"]);
    }

    #[test]
    fn test_customer_number_only_when_managed() {
        let numbers = FakeNumbers::default();

        let config = FakeConfig::default();
        let resolver = FieldDefaultResolver::new(&config, &numbers);
        let resolved = resolver.resolve_defaults(Record::new(), &Record::new(), EntityType::Customers);
        assert_eq!(resolved.get("customernnumber"), Some(&FieldValue::text("")));
        assert_eq!(numbers.next.get(), 0);

        let mut managed = FakeConfig::default();
        managed.global.insert(config_keys::MANAGED_CUSTOMER_NUMBERS, "1");
        let resolver = FieldDefaultResolver::new(&managed, &numbers);
        let first = resolver.resolve_defaults(Record::new(), &Record::new(), EntityType::Customers);
        let second = resolver.resolve_defaults(Record::new(), &Record::new(), EntityType::Customers);
        assert_eq!(first.get("customernnumber"), Some(&FieldValue::text("1")));
        assert_eq!(second.get("customernnumber"), Some(&FieldValue::text("2")));
    }

    #[test]
    fn test_broken_number_service_degrades_to_empty() {
        let mut config = FakeConfig::default();
        config.global.insert(config_keys::MANAGED_CUSTOMER_NUMBERS, "1");
        let numbers = FakeNumbers { broken: true, ..Default::default() };
        let resolver = FieldDefaultResolver::new(&config, &numbers);

        let resolved = resolver.resolve_defaults(Record::new(), &Record::new(), EntityType::Customers);
        assert_eq!(resolved.get("customernnumber"), Some(&FieldValue::text("")));
    }

    #[test]
    fn test_encoder_from_config() {
        let mut config = FakeConfig::default();
        config.global.insert(config_keys::DEFAULT_PASSWORD_ENCODER, "bcrypt");
        let numbers = FakeNumbers::default();
        let resolver = FieldDefaultResolver::new(&config, &numbers);

        let resolved = resolver.resolve_defaults(Record::new(), &Record::new(), EntityType::Customers);
        assert_eq!(resolved.get("encoder"), Some(&FieldValue::text("bcrypt")));
    }

    // ===== NULL 哨兵 =====

    #[test]
    fn test_only_exact_null_text_is_a_sentinel() {
        let config = FakeConfig::default();
        let numbers = FakeNumbers::default();
        let resolver = FieldDefaultResolver::new(&config, &numbers);

        let record = customer(&[
            ("lastname", FieldValue::text("Null")),
            ("company", FieldValue::text("null")),
            ("city", FieldValue::text("NULL")),
        ]);
        let resolved = resolver.resolve_defaults(record, &Record::new(), EntityType::Customers);

        assert_eq!(resolved.get("lastname"), Some(&FieldValue::text("Null")));
        assert_eq!(resolved.get("company"), Some(&FieldValue::text("null")));
        assert_eq!(resolved.get("city"), Some(&FieldValue::text("")));
    }

    #[test]
    fn test_null_sentinels_replaced_by_kind() {
        let mut record = customer(&[
            ("company", FieldValue::text("NULL")),
            ("countryID", FieldValue::Null),
            ("birthday", FieldValue::text("NULL")),
            ("unknownField", FieldValue::text("NULL")),
            ("city", FieldValue::text("Berlin")),
        ]);
        fix_null_sentinels(&mut record, EntityType::Customers);

        assert_eq!(record.get("company"), Some(&FieldValue::text("")));
        assert_eq!(record.get("countryID"), Some(&FieldValue::Int(0)));
        assert_eq!(record.get("birthday"), Some(&FieldValue::text("")));
        assert_eq!(record.get("unknownField"), Some(&FieldValue::text("NULL")));
        assert_eq!(record.get("city"), Some(&FieldValue::text("Berlin")));
    }

    #[test]
    fn test_null_sentinel_float_fields() {
        let mut record = customer(&[("pseudoPrice", FieldValue::text("NULL"))]);
        fix_null_sentinels(&mut record, EntityType::ArticlesPrices);
        assert_eq!(record.get("pseudoPrice"), Some(&FieldValue::Float(0.0)));
    }
}
