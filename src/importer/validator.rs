// ==========================================
// 商城数据导入导出 - 记录校验器
// ==========================================
// 职责: 必填字段检查 + 字段类型映射表（供上游类型转换使用）
// 规则按实体类型静态定义；校验器本身不执行类型映射
// 失败策略: 第一个缺失的必填字段即中止整条记录的校验
// ==========================================

use crate::domain::{EntityType, FieldKind, Record};
use crate::i18n;
use crate::importer::error::{ImportError, ImportResult};

/// 字段类型映射表（类型 → 字段列表）
pub type TypeMap = &'static [(FieldKind, &'static [&'static str])];

/// 必填字段错误提示（字段, 消息 key, 兜底文本）
pub type ErrorMessage = (&'static str, &'static str, &'static str);

// ==========================================
// ValidatorRules - 单个实体类型的规则集
// ==========================================
#[derive(Debug)]
pub struct ValidatorRules {
    pub required_fields: &'static [&'static str],
    pub type_map: TypeMap,
    pub error_messages: &'static [ErrorMessage],
}

impl ValidatorRules {
    /// 必填字段的提示信息（未登记时返回 None）
    pub fn error_message(&self, field: &str) -> Option<&ErrorMessage> {
        self.error_messages.iter().find(|(f, _, _)| *f == field)
    }

    /// 字段声明的基本类型
    pub fn field_kind(&self, field: &str) -> Option<FieldKind> {
        self.type_map
            .iter()
            .find(|(_, fields)| fields.contains(&field))
            .map(|(kind, _)| *kind)
    }
}

const CUSTOMER_RULES: ValidatorRules = ValidatorRules {
    required_fields: &["email"],
    type_map: &[
        (
            FieldKind::String,
            &[
                "customernnumber", "email", "password", "encoder", "customergroup", "salutation",
                "title", "firstname", "lastname", "company", "department", "street", "zipcode",
                "city", "phone", "vatId", "additionalAddressLine1", "additionalAddressLine2",
            ],
        ),
        (
            FieldKind::Int,
            &["paymentID", "subshopID", "countryID", "stateID", "active", "accountmode", "newsletter", "languageId"],
        ),
    ],
    error_messages: &[("email", "adapters.customer.email_required", "User email is required field.")],
};

const ARTICLE_RULES: ValidatorRules = ValidatorRules {
    required_fields: &["orderNumber", "mainNumber"],
    type_map: &[
        (
            FieldKind::String,
            &[
                "orderNumber", "mainNumber", "name", "additionalText", "supplierName", "tax",
                "description", "descriptionLong", "keywords", "metaTitle", "ean", "unit",
                "packUnit", "shippingTime", "configuratorOptions", "configuratorSetName",
            ],
        ),
        (
            FieldKind::Float,
            &["price", "purchasePrice", "pseudoPrice", "weight", "width", "height", "length", "purchaseUnit", "referenceUnit"],
        ),
        (
            FieldKind::Int,
            &[
                "active", "inStock", "stockMin", "lastStock", "minPurchase", "maxPurchase",
                "purchaseSteps", "shippingFree", "topSeller", "notification", "taxId",
            ],
        ),
    ],
    error_messages: &[
        ("orderNumber", "adapters.ordernumber_required", "Order number is required."),
        ("mainNumber", "adapters.mainnumber_required", "Main number is required."),
    ],
};

const ARTICLE_IN_STOCK_RULES: ValidatorRules = ValidatorRules {
    required_fields: &["orderNumber"],
    type_map: &[
        (FieldKind::String, &["orderNumber", "additionalText", "supplier"]),
        (FieldKind::Int, &["inStock"]),
        (FieldKind::Float, &["price"]),
    ],
    error_messages: &[("orderNumber", "adapters.ordernumber_required", "Order number is required")],
};

const ARTICLE_PRICE_RULES: ValidatorRules = ValidatorRules {
    required_fields: &["orderNumber"],
    type_map: &[
        (
            FieldKind::String,
            &["orderNumber", "priceGroup", "name", "additionalText", "supplierName"],
        ),
        (
            FieldKind::Float,
            &["price", "purchasePrice", "pseudoPrice", "regulationPrice"],
        ),
        (FieldKind::Int, &["from"]),
    ],
    error_messages: &[("orderNumber", "adapters.ordernumber_required", "Order number is required.")],
};

const ARTICLE_IMAGE_RULES: ValidatorRules = ValidatorRules {
    required_fields: &["ordernumber", "image"],
    type_map: &[
        (FieldKind::String, &["ordernumber", "image", "description", "relations"]),
        (FieldKind::Int, &["main", "position", "thumbnail"]),
    ],
    error_messages: &[
        ("ordernumber", "adapters.images.ordernumber_required", "Ordernumber is required."),
        ("image", "adapters.images.image_required", "Image is required."),
    ],
};

const CATEGORY_RULES: ValidatorRules = ValidatorRules {
    required_fields: &["categoryId", "name", "parentId"],
    type_map: &[
        (
            FieldKind::String,
            &["name", "metaTitle", "metaKeywords", "metaDescription", "cmsHeadline", "cmsText", "template", "external"],
        ),
        (
            FieldKind::Int,
            &["categoryId", "parentId", "position", "active", "blog", "showFilterGroups", "hideFilter"],
        ),
    ],
    error_messages: &[
        ("categoryId", "adapters.categories.id_required", "Category id is required."),
        ("name", "adapters.categories.name_required", "Category name is required."),
        ("parentId", "adapters.categories.parent_id_required", "Parent id is required."),
    ],
};

const NEWSLETTER_RULES: ValidatorRules = ValidatorRules {
    required_fields: &["email"],
    type_map: &[
        (
            FieldKind::String,
            &["email", "groupName", "salutation", "firstName", "lastName", "street", "zipCode", "city"],
        ),
        (FieldKind::Int, &["userID"]),
    ],
    error_messages: &[("email", "adapters.newsletter.email_required", "Email address is required.")],
};

/// 实体类型对应的规则集
pub fn rules_for(entity: EntityType) -> &'static ValidatorRules {
    match entity {
        EntityType::Customers => &CUSTOMER_RULES,
        EntityType::Articles => &ARTICLE_RULES,
        EntityType::ArticlesInStock => &ARTICLE_IN_STOCK_RULES,
        EntityType::ArticlesPrices => &ARTICLE_PRICE_RULES,
        EntityType::ArticlesImages => &ARTICLE_IMAGE_RULES,
        EntityType::Categories => &CATEGORY_RULES,
        EntityType::Newsletter => &NEWSLETTER_RULES,
    }
}

/// 实体类型的字段类型映射表
pub fn type_map(entity: EntityType) -> TypeMap {
    rules_for(entity).type_map
}

/// 检查必填字段（存在且非 null 即视为已填写）
///
/// # 错误
/// - ImportError::Validation: 第一个缺失的必填字段（消息已本地化）
pub fn check_required_fields(record: &Record, entity: EntityType) -> ImportResult<()> {
    let rules = rules_for(entity);

    for field in rules.required_fields {
        if record.is_set(field) {
            continue;
        }

        let message = match rules.error_message(field) {
            Some((_, key, fallback)) => i18n::t_or(key, fallback),
            None => format!("{} is required", field),
        };
        return Err(ImportError::Validation {
            field: field.to_string(),
            message,
        });
    }

    Ok(())
}
